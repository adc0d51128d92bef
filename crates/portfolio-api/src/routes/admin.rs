//! 관리자 endpoint.
//!
//! 모든 핸들러는 [`AdminAuth`]로 관리자 역할을 요구합니다.
//!
//! - `GET /api/admin/clients`, `GET /api/admin/clients/{id}`
//! - `GET /api/admin/projects`, `PATCH /api/admin/projects/{id}/status`
//! - `GET /api/admin/contacts`
//! - `POST /api/register-client` - 고객 포털 계정 생성 + 안내 메일

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use portfolio_core::{Client, Contact, Project, ProjectStatus};
use portfolio_notification::{AccountNotification, DeliveryStatus};
use tracing::{info, warn};
use validator::Validate;

use super::types::{
    ClientAccountResponse, ClientDetailResponse, RegisterClientRequest, StatusUpdateRequest,
};
use crate::auth::AdminAuth;
use crate::error::{ApiError, ApiErrorResponse, ApiResult, ApiSuccess};
use crate::extract::{ApiJson, ApiPath};
use crate::metrics::record_notification;
use crate::services;
use crate::state::AppState;

/// 전체 고객 목록 (최신순).
#[utoipa::path(
    get,
    path = "/api/admin/clients",
    responses(
        (status = 200, description = "고객 목록", body = [Client]),
        (status = 403, description = "관리자 아님", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(state.storage.list_clients().await?))
}

/// 고객 상세 (프로젝트 포함).
#[utoipa::path(
    get,
    path = "/api/admin/clients/{id}",
    params(("id" = i32, Path, description = "고객 ID")),
    responses(
        (status = 200, description = "고객 상세", body = ClientDetailResponse),
        (status = 404, description = "고객 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn get_client(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<ClientDetailResponse>> {
    let client = state
        .storage
        .get_client(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client not found"))?;
    let projects = state.storage.list_projects_by_client(id).await?;

    Ok(Json(ClientDetailResponse { client, projects }))
}

/// 전체 프로젝트 목록 (최신순).
#[utoipa::path(
    get,
    path = "/api/admin/projects",
    responses((status = 200, description = "프로젝트 목록", body = [Project])),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.storage.list_projects().await?))
}

/// 전체 문의 목록 (최신순).
#[utoipa::path(
    get,
    path = "/api/admin/contacts",
    responses((status = 200, description = "문의 목록", body = [Contact])),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
) -> ApiResult<Json<Vec<Contact>>> {
    Ok(Json(state.storage.list_contacts().await?))
}

fn parse_status(request: StatusUpdateRequest) -> ApiResult<ProjectStatus> {
    let raw = request
        .status
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Status is required"))?;

    raw.parse::<ProjectStatus>().map_err(|_| {
        let allowed = ProjectStatus::ALL
            .iter()
            .map(ProjectStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        ApiError::validation(format!("Invalid status '{}'. Expected one of: {}", raw, allowed))
    })
}

/// 프로젝트 상태 변경.
#[utoipa::path(
    patch,
    path = "/api/admin/projects/{id}/status",
    params(("id" = i32, Path, description = "프로젝트 ID")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "상태 변경", body = Project),
        (status = 400, description = "상태 누락/알 수 없음", body = ApiErrorResponse),
        (status = 404, description = "프로젝트 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_project_status(
    State(state): State<Arc<AppState>>,
    AdminAuth(admin): AdminAuth,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<StatusUpdateRequest>,
) -> ApiResult<Json<ApiSuccess<Project>>> {
    let status = parse_status(request)?;

    let project = state
        .storage
        .update_project_status(id, status)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    info!(admin_id = admin.id, project_id = id, status = %status, "Project status updated");
    Ok(Json(ApiSuccess::new("Project status updated", project)))
}

/// 기존 고객에게 포털 계정을 만들고 안내 메일을 보냅니다.
///
/// 메일 전송 실패는 요청을 실패시키지 않고 `notificationSent: false`로 보고됩니다.
#[utoipa::path(
    post,
    path = "/api/register-client",
    request_body = RegisterClientRequest,
    responses(
        (status = 201, description = "계정 생성", body = ClientAccountResponse),
        (status = 404, description = "고객 없음", body = ApiErrorResponse),
        (status = 409, description = "중복 사용자 이름 또는 이미 연결된 고객", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn register_client(
    State(state): State<Arc<AppState>>,
    AdminAuth(admin): AdminAuth,
    ApiJson(request): ApiJson<RegisterClientRequest>,
) -> ApiResult<(StatusCode, Json<ApiSuccess<ClientAccountResponse>>)> {
    request.validate()?;

    let (user, client) = services::register_client_account(
        state.storage.as_ref(),
        request.client_id,
        request.username.trim(),
        &request.password,
    )
    .await?;

    let notification = AccountNotification::new(
        &client.email,
        &client.full_name,
        &user.username,
        &state.portal_url,
    );
    let notification_sent = match state.notifier.send(&notification).await {
        Ok(DeliveryStatus::Sent) => {
            record_notification("sent");
            true
        }
        Ok(DeliveryStatus::Skipped) => {
            record_notification("skipped");
            false
        }
        Err(e) => {
            record_notification("failed");
            warn!(client_id = client.id, error = %e, "Account notification failed");
            false
        }
    };

    info!(
        admin_id = admin.id,
        client_id = client.id,
        user_id = user.id,
        notification_sent,
        "Client account registered"
    );

    Ok(ApiSuccess::created(
        "Client account created",
        ClientAccountResponse {
            user,
            client,
            notification_sent,
        },
    ))
}

/// 관리자 라우터.
pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/clients", get(list_clients))
        .route("/admin/clients/{id}", get(get_client))
        .route("/admin/projects", get(list_projects))
        .route("/admin/projects/{id}/status", patch(update_project_status))
        .route("/admin/contacts", get(list_contacts))
        .route("/register-client", post(register_client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        let ok = parse_status(StatusUpdateRequest {
            status: Some("in-progress".into()),
        })
        .unwrap();
        assert_eq!(ok, ProjectStatus::InProgress);

        let missing = parse_status(StatusUpdateRequest::default()).unwrap_err();
        assert_eq!(missing.to_string(), "Status is required");
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let blank = parse_status(StatusUpdateRequest {
            status: Some("  ".into()),
        })
        .unwrap_err();
        assert_eq!(blank.to_string(), "Status is required");

        let unknown = parse_status(StatusUpdateRequest {
            status: Some("archived".into()),
        })
        .unwrap_err();
        assert!(unknown.to_string().contains("archived"));
    }
}
