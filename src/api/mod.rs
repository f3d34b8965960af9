//! API Layer
//!
//! HTTP handlers that bridge requests to repositories and workflows, plus
//! the identity middleware and the domain-error to status-code mapping.

mod list_api;
mod member_api;
mod todo_api;

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::domain::{DomainError, Identity};
use crate::AppState;

/// Identity attached to every request, best-effort. `None` means the
/// caller is anonymous; routes that need a user reject with 401.
#[derive(Clone, Default)]
pub struct AuthContext(pub Option<Identity>);

impl AuthContext {
    pub fn require(&self) -> Result<&Identity, ApiError> {
        self.0
            .as_ref()
            .ok_or_else(|| ApiError(DomainError::Unauthorized("Unauthorized".to_string())))
    }
}

/// Wraps `DomainError` for the HTTP boundary
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Unavailable(_) => StatusCode::BAD_GATEWAY,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Best-effort identity resolution for every request. Failures mean
/// "anonymous", never a hard error.
async fn attach_identity(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_owned());
    let identity = state.resolver.resolve(header.as_deref()).await;
    req.extensions_mut().insert(AuthContext(identity));
    next.run(req).await
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Assemble the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/lists",
            get(list_api::list_lists).post(list_api::create_list),
        )
        .route(
            "/lists/:id",
            get(list_api::get_list)
                .put(list_api::rename_list)
                .delete(list_api::delete_list),
        )
        .route(
            "/lists/:id/todos",
            get(todo_api::list_todos).post(todo_api::create_todo),
        )
        .route(
            "/lists/:id/todos/:todo_id",
            put(todo_api::update_todo).delete(todo_api::delete_todo),
        )
        .route("/lists/:id/members", get(member_api::list_members))
        .route("/lists/:id/invite", post(member_api::invite_member))
        .route(
            "/lists/:id/members/:user_id",
            put(member_api::change_role).delete(member_api::remove_member),
        )
        .layer(middleware::from_fn_with_state(state.clone(), attach_identity))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
