//! Credential issuance: registration and login.
//!
//! Both operations validate their input before touching the store and answer with a
//! freshly signed token. Login failures never reveal whether the email exists.

use validator::Validate;

use super::password::{hash_password, verify_password};
use super::token::JwtKeys;
use super::{LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::NewUser;
use crate::store::Store;

/// Creates an account and returns a token for it.
pub async fn register(
    store: &dyn Store,
    keys: &JwtKeys,
    request: RegisterRequest,
) -> Result<String, AppError> {
    request.validate()?;

    if store
        .find_credentials_by_email(&request.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password(&request.password)?;
    let user = store
        .insert_user(NewUser {
            name: request.name,
            email: request.email,
            password_hash,
        })
        .await?;

    log::info!("Registered user {}", user.id);
    keys.generate_token(&user.id)
}

/// Checks the credentials and returns a token for the matching account.
pub async fn login(
    store: &dyn Store,
    keys: &JwtKeys,
    request: LoginRequest,
) -> Result<String, AppError> {
    request.validate()?;

    let credentials = store
        .find_credentials_by_email(&request.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&request.password, &credentials.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    keys.generate_token(&credentials.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn keys() -> JwtKeys {
        JwtKeys::new("issuer-test-secret", 360_000)
    }

    fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Grace".to_string(),
            email: email.to_string(),
            password: "hopper1".to_string(),
        }
    }

    fn credentials(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_register_token_resolves_to_new_user() {
        let store = MemoryStore::new();
        let keys = keys();

        let token = register(&store, &keys, registration("grace@example.com"))
            .await
            .unwrap();
        let claims = keys.verify_token(&token).unwrap();

        let user = store.find_user_by_id(&claims.sub).await.unwrap().unwrap();
        assert_eq!(user.email, "grace@example.com");
        assert_eq!(user.name, "Grace");
    }

    #[actix_rt::test]
    async fn test_register_stores_hash_not_password() {
        let store = MemoryStore::new();
        register(&store, &keys(), registration("grace@example.com"))
            .await
            .unwrap();

        let stored = store
            .find_credentials_by_email("grace@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "hopper1");
        assert!(verify_password("hopper1", &stored.password_hash).unwrap());
    }

    #[actix_rt::test]
    async fn test_register_twice_conflicts() {
        let store = MemoryStore::new();
        let keys = keys();
        register(&store, &keys, registration("grace@example.com"))
            .await
            .unwrap();

        match register(&store, &keys, registration("grace@example.com")).await {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "User already exists"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_invalid_registration_touches_nothing() {
        let store = MemoryStore::new();
        let request = RegisterRequest {
            name: String::new(),
            email: "grace@example.com".to_string(),
            password: "abc".to_string(),
        };

        match register(&store, &keys(), request).await {
            Err(AppError::Validation(msgs)) => assert_eq!(
                msgs,
                vec![
                    "Name is required".to_string(),
                    "Please enter a password with 6 or more characters".to_string(),
                ]
            ),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store
            .find_credentials_by_email("grace@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[actix_rt::test]
    async fn test_login_succeeds_with_matching_password() {
        let store = MemoryStore::new();
        let keys = keys();
        let registered = register(&store, &keys, registration("grace@example.com"))
            .await
            .unwrap();

        let token = login(&store, &keys, credentials("grace@example.com", "hopper1"))
            .await
            .unwrap();
        assert_eq!(
            keys.verify_token(&token).unwrap().sub,
            keys.verify_token(&registered).unwrap().sub
        );
    }

    #[actix_rt::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = MemoryStore::new();
        let keys = keys();
        register(&store, &keys, registration("grace@example.com"))
            .await
            .unwrap();

        let wrong_password = login(&store, &keys, credentials("grace@example.com", "nope"))
            .await
            .unwrap_err();
        let unknown_email = login(&store, &keys, credentials("ada@example.com", "hopper1"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[actix_rt::test]
    async fn test_login_validation() {
        let store = MemoryStore::new();
        match login(&store, &keys(), credentials("not-an-email", "")).await {
            Err(AppError::Validation(msgs)) => assert_eq!(
                msgs,
                vec![
                    "Please include a valid email".to_string(),
                    "Password is required".to_string(),
                ]
            ),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
