//! 프로젝트 메시지.
//!
//! - `POST /api/messages` - 메시지 전송
//! - `GET /api/projects/{id}/messages` - 프로젝트 메시지 (최신순)
//! - `PATCH /api/messages/{id}/read` - 읽음 표시
//!
//! 모든 작업은 프로젝트 접근 권한을 확인합니다.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use portfolio_core::{Message, NewMessage, Permission};
use tracing::info;
use validator::Validate;

use super::types::CreateMessageRequest;
use crate::auth::{require_permission, AuthUser};
use crate::error::{ApiError, ApiErrorResponse, ApiResult, ApiSuccess};
use crate::extract::{ApiJson, ApiPath};
use crate::services::authorize_project;
use crate::state::AppState;

/// 메시지 전송.
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "전송 완료", body = Message),
        (status = 403, description = "프로젝트 접근 불가", body = ApiErrorResponse),
        (status = 404, description = "프로젝트 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "messages"
)]
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    ApiJson(request): ApiJson<CreateMessageRequest>,
) -> ApiResult<(StatusCode, Json<ApiSuccess<Message>>)> {
    require_permission(Permission::SendMessages, &identity)?;
    request.validate()?;

    let content = request.content.trim().to_string();
    if content.is_empty() {
        return Err(ApiError::validation("Message content is required"));
    }

    let project = authorize_project(state.storage.as_ref(), &identity, request.project_id).await?;

    let message = state
        .storage
        .create_message(NewMessage {
            project_id: project.id,
            sender_id: identity.id,
            sender_role: identity.role,
            content,
        })
        .await?;

    info!(
        message_id = message.id,
        project_id = project.id,
        sender_id = identity.id,
        "Message sent"
    );
    Ok(ApiSuccess::created("Message sent successfully", message))
}

/// 프로젝트 메시지 목록.
#[utoipa::path(
    get,
    path = "/api/projects/{id}/messages",
    params(("id" = i32, Path, description = "프로젝트 ID")),
    responses(
        (status = 200, description = "메시지 목록", body = [Message]),
        (status = 403, description = "프로젝트 접근 불가", body = ApiErrorResponse),
        (status = 404, description = "프로젝트 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "messages"
)]
pub async fn list_project_messages(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    ApiPath(project_id): ApiPath<i32>,
) -> ApiResult<Json<Vec<Message>>> {
    let project = authorize_project(state.storage.as_ref(), &identity, project_id).await?;
    Ok(Json(state.storage.list_messages_by_project(project.id).await?))
}

/// 메시지 읽음 표시.
#[utoipa::path(
    patch,
    path = "/api/messages/{id}/read",
    params(("id" = i32, Path, description = "메시지 ID")),
    responses(
        (status = 200, description = "읽음 처리", body = Message),
        (status = 404, description = "메시지 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "messages"
)]
pub async fn mark_message_read(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<ApiSuccess<Message>>> {
    let message = state
        .storage
        .get_message(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Message not found"))?;

    authorize_project(state.storage.as_ref(), &identity, message.project_id).await?;

    let message = state
        .storage
        .mark_message_read(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Message not found"))?;

    Ok(Json(ApiSuccess::new("Message marked as read", message)))
}

/// 메시지 라우터.
pub fn messages_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/messages", post(create_message))
        .route("/messages/{id}/read", patch(mark_message_read))
        .route("/projects/{id}/messages", get(list_project_messages))
}
