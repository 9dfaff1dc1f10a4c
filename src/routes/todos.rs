use crate::{
    auth::token::INVALID_TOKEN_MESSAGE,
    auth::AuthenticatedUser,
    error::AppError,
    models::{ObjectId, Todo, TodoInput, TodoUpdate},
    store::Store,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

const TODO_NOT_FOUND: &str = "Todo not found";

/// Parses a raw path id. A malformed id answers the same `404` as an unknown one.
fn parse_todo_id(raw_id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse(raw_id).map_err(|_| AppError::NotFound(TODO_NOT_FOUND.into()))
}

async fn find_todo(store: &dyn Store, raw_id: &str) -> Result<Todo, AppError> {
    let id = parse_todo_id(raw_id)?;
    store
        .find_todo(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(TODO_NOT_FOUND.into()))
}

/// Like `find_todo`, but a todo owned by someone else answers `401 User not authorized`.
async fn find_owned_todo(
    store: &dyn Store,
    raw_id: &str,
    user: &AuthenticatedUser,
) -> Result<Todo, AppError> {
    let todo = find_todo(store, raw_id).await?;
    if !todo.is_owned_by(user.id()) {
        return Err(AppError::Unauthorized("User not authorized".into()));
    }
    Ok(todo)
}

/// Retrieves the authenticated user's todos, newest first.
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Todo` objects.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_todos(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todos = store.list_todos(user.id()).await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Creates a new todo for the authenticated user.
///
/// ## Request Body:
/// - `title`: required, at most 100 characters.
/// - `description` (optional): at most 1000 characters.
/// - `status` (optional): `todo`, `in-progress` or `done`. Defaults to `todo`.
///
/// ## Responses:
/// - `200 OK`: the created `Todo`.
/// - `400 Bad Request`: invalid input, as `{"errors": [{"msg": ...}]}`.
/// - `401 Unauthorized`: missing or invalid token, or the account no longer exists.
#[post("")]
pub async fn create_todo(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    todo_data: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;

    if store.find_user_by_id(user.id()).await?.is_none() {
        return Err(AppError::Unauthorized(INVALID_TOKEN_MESSAGE.into()));
    }

    let todo = Todo::new(todo_data.into_inner(), user.0);
    let created = store.insert_todo(todo).await?;
    Ok(HttpResponse::Ok().json(created))
}

/// Retrieves one of the authenticated user's todos.
///
/// ## Responses:
/// - `200 OK`: the `Todo`.
/// - `404 Not Found`: malformed id, unknown id, or a todo owned by someone else.
#[get("/{id}")]
pub async fn get_todo(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    todo_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let todo = find_todo(store.get_ref(), &todo_id).await?;
    if !todo.is_owned_by(user.id()) {
        return Err(AppError::NotFound(TODO_NOT_FOUND.into()));
    }
    Ok(HttpResponse::Ok().json(todo))
}

/// Partially updates a todo. Only non-empty fields present in the body change.
///
/// A malformed id is checked before the body, so it answers `404` even when the body
/// is missing or unreadable.
///
/// ## Responses:
/// - `200 OK`: the updated `Todo`.
/// - `400 Bad Request`: invalid input.
/// - `401 Unauthorized`: the todo belongs to someone else.
/// - `404 Not Found`: malformed or unknown id.
#[patch("/{id}")]
pub async fn update_todo(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    todo_id: web::Path<String>,
    todo_data: Result<web::Json<TodoUpdate>, actix_web::Error>,
) -> Result<impl Responder, actix_web::Error> {
    parse_todo_id(&todo_id)?;
    let todo_data = todo_data?;
    todo_data.validate().map_err(AppError::from)?;

    let mut todo = find_owned_todo(store.get_ref(), &todo_id, &user).await?;
    todo.apply(todo_data.into_inner());

    let updated = store.update_todo(&todo).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a todo.
///
/// ## Responses:
/// - `200 OK`: `{"msg": "Todo removed"}`.
/// - `401 Unauthorized`: the todo belongs to someone else.
/// - `404 Not Found`: malformed or unknown id.
#[delete("/{id}")]
pub async fn delete_todo(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    todo_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let todo = find_owned_todo(store.get_ref(), &todo_id, &user).await?;

    if !store.delete_todo(&todo.id).await? {
        return Err(AppError::NotFound(TODO_NOT_FOUND.into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "msg": "Todo removed" })))
}
