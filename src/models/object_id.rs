use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

lazy_static! {
    static ref OBJECT_ID_REGEX: Regex = Regex::new(r"^[0-9a-fA-F]{24}$").unwrap();
}

/// A 24-character hexadecimal identifier shared by users and todos.
///
/// The first four bytes are the creation time in seconds, the remaining eight are random.
/// Parsing accepts either case and stores the lower-case form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "String", into = "String")]
#[sqlx(transparent)]
pub struct ObjectId(String);

/// Returned when a string is not a well-formed `ObjectId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidObjectId;

impl fmt::Display for InvalidObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("id must be 24 hexadecimal characters")
    }
}

impl std::error::Error for InvalidObjectId {}

impl ObjectId {
    pub fn new() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        let random = Uuid::new_v4();

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..].copy_from_slice(&random.as_bytes()[..8]);

        ObjectId(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn parse(value: &str) -> Result<Self, InvalidObjectId> {
        if OBJECT_ID_REGEX.is_match(value) {
            Ok(ObjectId(value.to_ascii_lowercase()))
        } else {
            Err(InvalidObjectId)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = InvalidObjectId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ObjectId::parse(&value)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> String {
        id.0
    }
}
