//! Request handlers mapping HTTP verbs on `/todos` to service calls.
//!
//! Repository calls run on the blocking pool because stores do synchronous
//! file and SQLite I/O.

use crate::error::{AppError, MessageBody};
use crate::SharedService;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use todo_core::{RepoResult, Todo, TodoId, TodoPatch, TodoRepository, TodoService};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub completed: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
}

pub async fn list_todos(
    State(service): State<SharedService>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let filter = completed_filter(params.completed.as_deref());
    let todos = blocking(service, move |service| service.list_todos(filter)).await?;
    Ok(Json(todos))
}

pub async fn get_todo(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let id = parse_id(&id)?;
    let todo = blocking(service, move |service| service.get_todo(id)).await?;
    Ok(Json(todo))
}

pub async fn create_todo(
    State(service): State<SharedService>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let todo = blocking(service, move |service| service.create_todo(&input.title)).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(service): State<SharedService>,
    Path(id): Path<String>,
    Json(patch): Json<TodoPatch>,
) -> Result<Json<Todo>, AppError> {
    let id = parse_id(&id)?;
    let todo = blocking(service, move |service| service.update_todo(id, &patch)).await?;
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    let id = parse_id(&id)?;
    blocking(service, move |service| service.delete_todo(id)).await?;
    Ok(Json(MessageBody::new("Todo deleted")))
}

/// `true`/`false` select one partition; anything else lists everything.
fn completed_filter(raw: Option<&str>) -> Option<bool> {
    match raw {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Ids that are not integers can never match a stored todo.
fn parse_id(raw: &str) -> Result<TodoId, AppError> {
    raw.parse().map_err(|_| AppError::NotFound)
}

async fn blocking<T, F>(service: SharedService, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&TodoService<Box<dyn TodoRepository>>) -> RepoResult<T> + Send + 'static,
{
    let output = tokio::task::spawn_blocking(move || op(&service)).await??;
    Ok(output)
}
