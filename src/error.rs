//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a handler, the credential issuer, the access guard or a store can
//! produce is one of its variants.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers return it
//! directly and Actix renders the JSON body the client expects:
//!
//! - input problems answer `400` with `{"errors": [{"msg": ...}]}`,
//! - authentication and ownership failures answer `401` with `{"msg": ...}`,
//! - unknown or malformed resource ids answer `404` with `{"msg": ...}`,
//! - anything unexpected answers `500` with a generic message; the detail is logged only.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Generic message shown to clients for every server-side failure.
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// Message returned for both an unknown email and a wrong password.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid Credentials";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (HTTP 400). One message per failed check.
    Validation(Vec<String>),
    /// The resource would collide with an existing one, e.g. a registered email (HTTP 400).
    Conflict(String),
    /// Login failed. Same for an unknown email and a wrong password (HTTP 400).
    InvalidCredentials,
    /// Missing, invalid or expired token, or an ownership mismatch (HTTP 401).
    Unauthorized(String),
    /// Absent or malformed resource id (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the persistent store (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    /// Shorthand for a validation failure carrying a single message.
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(vec![msg.into()])
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msgs) => write!(f, "Validation Error: {}", msgs.join("; ")),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InvalidCredentials => write!(f, "{}", INVALID_CREDENTIALS_MESSAGE),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

fn errors_body(msgs: &[String]) -> serde_json::Value {
    json!({
        "errors": msgs.iter().map(|msg| json!({ "msg": msg })).collect::<Vec<_>>()
    })
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) | AppError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            AppError::Validation(msgs) => response.json(errors_body(msgs)),
            AppError::Conflict(msg) => response.json(errors_body(&[msg.clone()])),
            AppError::InvalidCredentials => {
                response.json(errors_body(&[INVALID_CREDENTIALS_MESSAGE.to_string()]))
            }
            AppError::Unauthorized(msg) | AppError::NotFound(msg) => {
                response.json(json!({ "msg": msg }))
            }
            // The detail stays in the server log.
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                response.json(json!({ "msg": SERVER_ERROR_MESSAGE }))
            }
        }
    }
}

/// Unique constraint on `users.email` created by `schema.sql`.
pub const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// Maps a unique violation to `Conflict` only when it is the email constraint.
fn unique_violation(constraint: Option<&str>, detail: String) -> AppError {
    match constraint {
        Some(USERS_EMAIL_CONSTRAINT) => AppError::Conflict("User already exists".into()),
        _ => AppError::DatabaseError(detail),
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// A duplicate email becomes `Conflict`; everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                unique_violation(db.constraint(), error.to_string())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
///
/// Messages are ordered by field name so responses are stable.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let msgs = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for {}", field),
                })
            })
            .collect();
        AppError::Validation(msgs)
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError`.
///
/// Only signing can fail with our own keys, so this is a server error. Verification
/// failures are mapped explicitly by the token module.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::InternalServerError(format!("Failed to sign token: {}", error))
    }
}
