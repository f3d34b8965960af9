//! List Handlers
//!
//! CRUD for lists. Creation makes the caller the owner; everything else is
//! gated by the authorization engine.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use super::{ApiError, ApiResult, AuthContext};
use crate::auth::Action;
use crate::domain::{DomainError, List};
use crate::AppState;

#[derive(Deserialize)]
pub struct ListBody {
    name: Option<String>,
}

fn required_name(body: &ListBody) -> Result<&str, ApiError> {
    match body.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(ApiError(DomainError::InvalidInput(
            "Name required".to_string(),
        ))),
    }
}

/// Lists the caller is a member of
pub async fn list_lists(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<List>>> {
    let identity = auth.require()?;
    Ok(Json(state.lists.list_for_user(&identity.id).await?))
}

pub async fn create_list(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Json(body): Json<ListBody>,
) -> ApiResult<(StatusCode, Json<List>)> {
    let identity = auth.require()?;
    let name = required_name(&body)?;

    let list = state.lists.create(&identity.id, name).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

pub async fn get_list(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<u32>,
) -> ApiResult<Json<List>> {
    let identity = auth.require()?;
    state
        .authz
        .authorize(&identity.id, list_id, Action::ViewList)
        .await?;

    let list = state
        .lists
        .find_by_id(list_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("list {}", list_id)))?;
    Ok(Json(list))
}

pub async fn rename_list(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<u32>,
    Json(body): Json<ListBody>,
) -> ApiResult<StatusCode> {
    let identity = auth.require()?;
    let name = required_name(&body)?;

    state
        .authz
        .authorize(&identity.id, list_id, Action::RenameList)
        .await?;
    state.lists.rename(list_id, name).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_list(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<u32>,
) -> ApiResult<StatusCode> {
    let identity = auth.require()?;
    state
        .authz
        .authorize(&identity.id, list_id, Action::DeleteList)
        .await?;
    state.lists.delete(list_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
