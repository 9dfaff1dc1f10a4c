use crate::error::AppError;
use crate::models::ObjectId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Message for every token that fails verification, whatever the cause.
pub const INVALID_TOKEN_MESSAGE: &str = "Token is not valid";

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// The user the token was issued to.
    pub sub: ObjectId,
    /// Issue time, seconds since epoch.
    pub iat: i64,
    /// Expiration time, seconds since epoch.
    pub exp: i64,
}

/// Signing and verification keys derived once from the configured secret.
///
/// Shared with handlers and the auth middleware through application data.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Generates a token for `user_id`, valid for the configured window.
    pub fn generate_token(&self, user_id: &ObjectId) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.encode(&claims)
    }

    /// Signs arbitrary claims with these keys.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?)
    }

    /// Verifies the signature and expiry of `token` and decodes its claims.
    ///
    /// A bad signature, an expired token and a payload that is not exactly
    /// `{sub, iat, exp}` with a well-formed `sub` all yield the same `Unauthorized` error.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Rejected token: {}", e);
                AppError::Unauthorized(INVALID_TOKEN_MESSAGE.into())
            })
    }
}
