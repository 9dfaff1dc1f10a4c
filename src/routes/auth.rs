use crate::{
    auth::{self, AuthResponse, AuthenticatedUser, JwtKeys, LoginRequest},
    auth::token::INVALID_TOKEN_MESSAGE,
    error::AppError,
    store::Store,
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Login user
///
/// Authenticates a user and returns an authentication token. A wrong password and an
/// unknown email both answer `400` with `Invalid Credentials`.
#[post("")]
pub async fn login(
    store: web::Data<dyn Store>,
    keys: web::Data<JwtKeys>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let token = auth::login(store.get_ref(), &keys, login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}

/// Current user
///
/// Returns the account the presented token belongs to, without its password.
/// A token for an account that no longer exists is treated as invalid.
#[get("")]
pub async fn current_user(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = store
        .find_user_by_id(user.id())
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_TOKEN_MESSAGE.into()))?;
    Ok(HttpResponse::Ok().json(user))
}
