#![doc = "The `todo_server` library crate."]
#![doc = ""]
#![doc = "Domain models, credential issuance, the token-checking access guard, persistence"]
#![doc = "backends, routing configuration and error handling for the todo list API."]
#![doc = "The binary (`main.rs`) assembles these into an Actix Web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::error::AppError;
