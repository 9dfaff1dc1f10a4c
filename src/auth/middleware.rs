use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::AuthenticatedUser;
use crate::auth::token::JwtKeys;
use crate::error::AppError;

/// Header carrying the token. Bearer-style `Authorization` is not consulted.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Requests that are reachable without a token: registration and login.
fn is_public(method: &Method, path: &str) -> bool {
    *method == Method::POST && matches!(path, "/api/users" | "/api/auth")
}

/// Verifies the `x-auth-token` header of every request it wraps and stores the
/// authenticated user in the request extensions.
///
/// Holds no state between requests.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S> AuthMiddlewareService<S> {
    fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
        let token = req
            .headers()
            .get(AUTH_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Authorization denied".into()))?;

        let keys = req
            .app_data::<web::Data<JwtKeys>>()
            .ok_or_else(|| AppError::InternalServerError("JwtKeys not registered".into()))?;

        let claims = keys.verify_token(token)?;
        Ok(AuthenticatedUser(claims.sub))
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !is_public(req.method(), req.path()) {
            match Self::authenticate(&req) {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                }
                // Rejections leave as responses, never as `Err`.
                Err(app_err) => {
                    let response = req.error_response(app_err).map_into_right_body();
                    return Box::pin(async move { Ok(response) });
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
