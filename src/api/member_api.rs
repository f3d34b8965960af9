//! Membership Handlers
//!
//! Invite endpoint plus member listing and owner-side member management.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde_json::{json, Value};

use super::{ApiError, ApiResult, AuthContext};
use crate::auth::Action;
use crate::domain::{DomainError, Membership, Role};
use crate::workflow::InviteOutcome;
use crate::AppState;

/// Parse the optional role field; absent means viewer, unknown is an error
fn parse_role(body: &Value) -> Result<Role, ApiError> {
    match body.get("role") {
        None | Some(Value::Null) => Ok(Role::Viewer),
        Some(value) => value
            .as_str()
            .and_then(Role::parse)
            .ok_or_else(|| ApiError(DomainError::InvalidInput("Bad role".to_string()))),
    }
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<u32>,
) -> ApiResult<Json<Vec<Membership>>> {
    let identity = auth.require()?;
    state
        .authz
        .authorize(&identity.id, list_id, Action::ViewList)
        .await?;
    Ok(Json(state.members.list_for_list(list_id).await?))
}

/// POST /lists/{id}/invite
///
/// 201 with the new membership, or 200 with the existing one when the
/// target is already a member.
pub async fn invite_member(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(list_id): Path<u32>,
    Json(body): Json<Value>,
) -> ApiResult<Response> {
    let requester = auth.require()?;

    let email = body
        .get("email")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let role = parse_role(&body)?;

    let outcome = state
        .invites
        .invite(requester, list_id, &email, role)
        .await?;

    Ok(match outcome {
        InviteOutcome::Created(membership) => (
            StatusCode::CREATED,
            Json(json!({ "membership": membership })),
        )
            .into_response(),
        InviteOutcome::AlreadyMember(membership) => (
            StatusCode::OK,
            Json(json!({ "message": "Already member", "membership": membership })),
        )
            .into_response(),
    })
}

pub async fn change_role(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path((list_id, user_id)): Path<(u32, String)>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Membership>> {
    let identity = auth.require()?;
    let role = match body.get("role").and_then(|v| v.as_str()).and_then(Role::parse) {
        Some(role) => role,
        None => return Err(ApiError(DomainError::InvalidInput("Bad role".to_string()))),
    };

    let membership = state
        .member_admin
        .change_role(identity, list_id, &user_id, role)
        .await?;
    Ok(Json(membership))
}

pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path((list_id, user_id)): Path<(u32, String)>,
) -> ApiResult<StatusCode> {
    let identity = auth.require()?;
    state
        .member_admin
        .remove(identity, list_id, &user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
