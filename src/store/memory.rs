use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Store;
use crate::error::AppError;
use crate::models::{NewUser, ObjectId, Todo, User, UserCredentials};

struct StoredUser {
    user: User,
    password_hash: String,
}

/// Keeps users and todos in process memory, in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<StoredUser>>,
    todos: RwLock<Vec<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|stored| &stored.user.id == id)
            .map(|stored| stored.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|stored| stored.user.email == email)
            .map(|stored| UserCredentials {
                id: stored.user.id.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn insert_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|stored| stored.user.email == new_user.email) {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let user = User::new(&new_user);
        users.push(StoredUser {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });
        Ok(user)
    }

    async fn list_todos(&self, user_id: &ObjectId) -> Result<Vec<Todo>, AppError> {
        let todos = self.todos.read().await;
        // Reverse first so equal timestamps keep newest-inserted first after the stable sort.
        let mut owned: Vec<Todo> = todos
            .iter()
            .rev()
            .filter(|todo| todo.is_owned_by(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn insert_todo(&self, todo: Todo) -> Result<Todo, AppError> {
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn find_todo(&self, id: &ObjectId) -> Result<Option<Todo>, AppError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|todo| &todo.id == id).cloned())
    }

    async fn update_todo(&self, todo: &Todo) -> Result<Todo, AppError> {
        let mut todos = self.todos.write().await;
        let stored = todos
            .iter_mut()
            .find(|stored| stored.id == todo.id)
            .ok_or_else(|| AppError::NotFound("Todo not found".into()))?;

        stored.title = todo.title.clone();
        stored.description = todo.description.clone();
        stored.status = todo.status;
        Ok(stored.clone())
    }

    async fn delete_todo(&self, id: &ObjectId) -> Result<bool, AppError> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|todo| &todo.id != id);
        Ok(todos.len() != before)
    }
}
