//! Todo Handlers
//!
//! Todo CRUD within a list. Viewing needs the viewer role, mutation needs
//! editor or above.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use super::{ApiError, ApiResult, AuthContext};
use crate::auth::Action;
use crate::domain::{DomainError, Todo};
use crate::repository::Repository;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateTodoBody {
    task: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTodoBody {
    task: Option<String>,
    completed: Option<bool>,
}

/// Fetch a todo, checking it belongs to the list in the path
async fn todo_in_list(state: &AppState, list_id: u32, todo_id: u32) -> Result<Todo, ApiError> {
    match state.todos.find_by_id(todo_id).await? {
        Some(todo) if todo.list_id == list_id => Ok(todo),
        _ => Err(ApiError(DomainError::NotFound(format!("todo {}", todo_id)))),
    }
}

pub async fn list_todos(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<u32>,
) -> ApiResult<Json<Vec<Todo>>> {
    let identity = auth.require()?;
    state
        .authz
        .authorize(&identity.id, list_id, Action::ViewTodos)
        .await?;
    Ok(Json(state.todos.list_for_list(list_id).await?))
}

pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<u32>,
    Json(body): Json<CreateTodoBody>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let identity = auth.require()?;
    let task = match body.task.as_deref().map(str::trim) {
        Some(task) if !task.is_empty() => task,
        _ => {
            return Err(ApiError(DomainError::InvalidInput(
                "Task required".to_string(),
            )))
        }
    };

    state
        .authz
        .authorize(&identity.id, list_id, Action::CreateTodo)
        .await?;

    let todo = state
        .todos
        .create(&Todo::new(0, list_id, task.to_string()))
        .await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path((list_id, todo_id)): Path<(u32, u32)>,
    Json(body): Json<UpdateTodoBody>,
) -> ApiResult<Json<Todo>> {
    let identity = auth.require()?;
    state
        .authz
        .authorize(&identity.id, list_id, Action::UpdateTodo)
        .await?;

    let mut todo = todo_in_list(&state, list_id, todo_id).await?;
    if let Some(task) = body.task {
        let task = task.trim().to_string();
        if task.is_empty() {
            return Err(ApiError(DomainError::InvalidInput(
                "Task required".to_string(),
            )));
        }
        todo.task = task;
    }
    if let Some(completed) = body.completed {
        todo.completed = completed;
    }

    let updated = state.todos.update(&todo).await?;
    Ok(Json(updated))
}

pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path((list_id, todo_id)): Path<(u32, u32)>,
) -> ApiResult<StatusCode> {
    let identity = auth.require()?;
    state
        .authz
        .authorize(&identity.id, list_id, Action::DeleteTodo)
        .await?;

    let todo = todo_in_list(&state, list_id, todo_id).await?;
    state.todos.delete(todo.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
