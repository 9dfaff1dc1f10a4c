#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;
use todo_server::auth::{AuthMiddleware, AuthResponse, JwtKeys, AUTH_HEADER};
use todo_server::config::DEFAULT_TOKEN_TTL_SECONDS;
use todo_server::routes;
use todo_server::store::{MemoryStore, Store};

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_keys() -> JwtKeys {
    JwtKeys::new(TEST_SECRET, DEFAULT_TOKEN_TTL_SECONDS)
}

/// Builds the full application over a fresh in-memory store.
pub async fn init_app() -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    test::init_service(
        App::new()
            .app_data(web::Data::from(store))
            .app_data(web::Data::new(test_keys()))
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await
}

/// Sends `req` and returns the status with the parsed JSON body (`Null` when empty).
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: actix_http::Request,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!("non-JSON body: {}", String::from_utf8_lossy(&bytes))
        })
    };
    (status, body)
}

/// Registers an account and returns its token.
pub async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    password: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "registration failed: {}", body);

    let response: AuthResponse = serde_json::from_value(body).expect("token response");
    response.token
}

/// Authenticated request builders.
pub fn get(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(uri)
        .insert_header((AUTH_HEADER, token))
}

pub fn post(uri: &str, token: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((AUTH_HEADER, token))
        .set_json(body)
}

pub fn patch(uri: &str, token: &str, body: Value) -> test::TestRequest {
    test::TestRequest::patch()
        .uri(uri)
        .insert_header((AUTH_HEADER, token))
        .set_json(body)
}

pub fn delete(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::delete()
        .uri(uri)
        .insert_header((AUTH_HEADER, token))
}
