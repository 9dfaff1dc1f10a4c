use crate::{
    auth::{self, AuthResponse, JwtKeys, RegisterRequest},
    error::AppError,
    store::Store,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new account and returns a token for it.
///
/// ## Responses:
/// - `200 OK`: `{"token": ...}`.
/// - `400 Bad Request`: invalid input or an email that is already registered,
///   as `{"errors": [{"msg": ...}]}`.
#[post("")]
pub async fn register(
    store: web::Data<dyn Store>,
    keys: web::Data<JwtKeys>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let token = auth::register(store.get_ref(), &keys, register_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}
