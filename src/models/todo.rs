use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use super::ObjectId;

/// Maximum number of characters in a todo title.
pub const TITLE_MAX_CHARS: usize = 100;

/// Represents the status of a todo.
/// Corresponds to the `todo_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "todo_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    /// Not started yet.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

fn message_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(message_error("required", "Title is required"));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(message_error("length", "Title can be at most 100 chars"));
    }
    Ok(())
}

/// Payload for `POST /api/todos`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    /// Required, at most 100 characters.
    #[serde(default)]
    #[validate(custom = "validate_title")]
    pub title: String,

    /// Optional, at most 1000 characters.
    #[validate(length(max = 1000, message = "Description can be at most 1000 chars"))]
    pub description: Option<String>,

    /// Defaults to `todo` when absent.
    pub status: Option<TodoStatus>,
}

/// Payload for `PATCH /api/todos/{id}`. Absent fields are left untouched.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TodoUpdate {
    #[validate(custom = "validate_title")]
    pub title: Option<String>,

    #[validate(length(max = 1000, message = "Description can be at most 1000 chars"))]
    pub description: Option<String>,

    pub status: Option<TodoStatus>,
}

/// A todo as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: ObjectId,
    /// The owning user. Never changes after creation.
    pub user_id: ObjectId,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new todo owned by `user_id`, with a fresh id and creation time.
    pub fn new(input: TodoInput, user_id: ObjectId) -> Self {
        Self {
            id: ObjectId::new(),
            user_id,
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }

    /// Applies the non-empty fields of `update`. The owner and id are not touched.
    pub fn apply(&mut self, update: TodoUpdate) {
        if let Some(title) = update.title.filter(|title| !title.is_empty()) {
            self.title = title;
        }
        if let Some(description) = update.description.filter(|d| !d.is_empty()) {
            self.description = Some(description);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }

    pub fn is_owned_by(&self, user_id: &ObjectId) -> bool {
        &self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> TodoInput {
        TodoInput {
            title: title.to_string(),
            description: None,
            status: None,
        }
    }

    #[test]
    fn test_todo_creation_defaults_to_todo() {
        let owner = ObjectId::new();
        let todo = Todo::new(input("Write tests"), owner.clone());
        assert_eq!(todo.title, "Write tests");
        assert_eq!(todo.status, TodoStatus::Todo);
        assert!(todo.is_owned_by(&owner));
        assert!(!todo.is_owned_by(&ObjectId::new()));
    }

    #[test]
    fn test_todo_input_validation() {
        assert!(input("Valid").validate().is_ok());
        assert!(input(&"a".repeat(100)).validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input(&"a".repeat(101)).validate().is_err());

        let long_description = TodoInput {
            title: "Valid".to_string(),
            description: Some("b".repeat(1001)),
            status: Some(TodoStatus::Done),
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_title_limit_counts_characters() {
        assert!(input(&"é".repeat(100)).validate().is_ok());
    }

    #[test]
    fn test_todo_update_validation() {
        assert!(TodoUpdate::default().validate().is_ok());

        let too_long = TodoUpdate {
            title: Some("a".repeat(101)),
            ..Default::default()
        };
        assert!(too_long.validate().is_err());

        let empty = TodoUpdate {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_apply_keeps_absent_fields() {
        let mut todo = Todo::new(input("Keep me"), ObjectId::new());
        let owner = todo.user_id.clone();
        todo.apply(TodoUpdate {
            status: Some(TodoStatus::Done),
            ..Default::default()
        });
        assert_eq!(todo.title, "Keep me");
        assert_eq!(todo.status, TodoStatus::Done);
        assert_eq!(todo.user_id, owner);
    }

    #[test]
    fn test_apply_ignores_empty_description() {
        let mut todo = Todo::new(
            TodoInput {
                title: "T".to_string(),
                description: Some("keep".to_string()),
                status: None,
            },
            ObjectId::new(),
        );
        todo.apply(TodoUpdate {
            description: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(todo.description.as_deref(), Some("keep"));

        todo.apply(TodoUpdate {
            description: Some("replaced".to_string()),
            ..Default::default()
        });
        assert_eq!(todo.description.as_deref(), Some("replaced"));
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TodoStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::from_str::<TodoStatus>("\"done\"").unwrap(),
            TodoStatus::Done
        );
        assert!(serde_json::from_str::<TodoStatus>("\"review\"").is_err());
    }
}
