use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ObjectId;

/// A registered account as exposed to clients. The password hash is never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to persist a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// The stored secret of an account, looked up by email at login.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: ObjectId,
    pub password_hash: String,
}

impl User {
    pub fn new(input: &NewUser) -> Self {
        Self {
            id: ObjectId::new(),
            name: input.name.clone(),
            email: input.email.clone(),
            created_at: Utc::now(),
        }
    }
}
