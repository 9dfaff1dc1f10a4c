use async_trait::async_trait;
use sqlx::PgPool;

use super::Store;
use crate::error::AppError;
use crate::models::{NewUser, ObjectId, Todo, User, UserCredentials};

const TODO_COLUMNS: &str = "id, user_id, title, description, status, created_at";

/// Postgres backend. Expects the tables from `schema.sql`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(credentials)
    }

    async fn insert_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = User::new(&new_user);
        // A concurrent registration with the same email surfaces as a unique violation,
        // which the `sqlx::Error` conversion turns into a conflict.
        let inserted = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, email, created_at",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&new_user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn list_todos(&self, user_id: &ObjectId) -> Result<Vec<Todo>, AppError> {
        let sql = format!(
            "SELECT {} FROM todos WHERE user_id = $1 ORDER BY created_at DESC",
            TODO_COLUMNS
        );
        let todos = sqlx::query_as::<_, Todo>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn insert_todo(&self, todo: Todo) -> Result<Todo, AppError> {
        let sql = format!(
            "INSERT INTO todos (id, user_id, title, description, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            TODO_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Todo>(&sql)
            .bind(&todo.id)
            .bind(&todo.user_id)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.status)
            .bind(todo.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(inserted)
    }

    async fn find_todo(&self, id: &ObjectId) -> Result<Option<Todo>, AppError> {
        let sql = format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS);
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn update_todo(&self, todo: &Todo) -> Result<Todo, AppError> {
        let sql = format!(
            "UPDATE todos SET title = $1, description = $2, status = $3
             WHERE id = $4
             RETURNING {}",
            TODO_COLUMNS
        );
        sqlx::query_as::<_, Todo>(&sql)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.status)
            .bind(&todo.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Todo not found".into()))
    }

    async fn delete_todo(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
