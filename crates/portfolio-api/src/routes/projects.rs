//! 역할 범위 프로젝트 목록.
//!
//! `GET /api/projects`: 관리자는 전체, 고객은 자신에게 연결된 고객 레코드의 프로젝트만.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use portfolio_core::Project;

use crate::auth::AuthUser;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::services::visible_projects;
use crate::state::AppState;

/// 호출자가 볼 수 있는 프로젝트 목록.
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "프로젝트 목록", body = [Project]),
        (status = 404, description = "계정에 연결된 고객 레코드 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "projects"
)]
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = visible_projects(state.storage.as_ref(), &identity).await?;
    Ok(Json(projects))
}

/// 프로젝트 라우터.
pub fn projects_router() -> Router<Arc<AppState>> {
    Router::new().route("/projects", get(list_projects))
}
