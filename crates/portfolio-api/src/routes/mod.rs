//! API 라우트.
//!
//! # 라우트 구조
//!
//! 공개:
//! - `/api/health` - 헬스 체크
//! - `/api/login` - 로그인
//! - `/api/client-onboarding`, `/api/contact` - 공개 폼
//! - `/api/github/repos` - GitHub 저장소 목록
//!
//! 토큰 필요 (`require_auth`):
//! - `/api/me`, `/api/register`
//! - `/api/admin/*`, `/api/register-client` - 관리자 전용
//! - `/api/projects` - 역할 범위 프로젝트 목록
//! - `/api/documents`, `/api/upload-document`, `/api/projects/{id}/documents`
//! - `/api/messages`, `/api/projects/{id}/messages`, `/api/messages/{id}/read`

pub mod admin;
pub mod auth;
pub mod documents;
pub mod github;
pub mod health;
pub mod messages;
pub mod onboarding;
pub mod projects;
pub mod types;

pub use admin::admin_router;
pub use auth::{auth_router, public_auth_router};
pub use documents::documents_router;
pub use github::github_router;
pub use health::{
    health_router, ComponentHealth, ComponentState, ComponentStatus, HealthResponse, HealthState,
};
pub use messages::messages_router;
pub use onboarding::onboarding_router;
pub use projects::projects_router;
pub use types::*;

use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::auth::require_auth;
use crate::state::AppState;

/// 전체 API 라우터 생성 (`/api` 하위).
///
/// 보호 라우트에는 `require_auth`가 route layer로 적용되므로
/// 존재하지 않는 경로는 토큰과 무관하게 404입니다.
pub fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public = Router::new()
        .merge(health_router())
        .merge(public_auth_router())
        .merge(onboarding_router())
        .merge(github_router());

    let protected = Router::new()
        .merge(auth_router())
        .merge(admin_router())
        .merge(projects_router())
        .merge(documents_router(&state.upload_policy))
        .merge(messages_router())
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().nest("/api", public.merge(protected))
}

/// API와 업로드 파일 서빙을 합친 애플리케이션 라우터.
///
/// 업로드 파일은 `uploads.public_prefix` 아래에서 정적 파일로 제공됩니다.
pub fn create_router(state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(state.content.root());
    let prefix = state.content.public_prefix().to_string();

    create_api_router(state.clone())
        .nest_service(&prefix, uploads)
        .with_state(state)
}
