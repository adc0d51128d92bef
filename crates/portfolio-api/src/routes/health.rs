//! 헬스 체크 endpoint.
//!
//! `GET /api/health` - 저장소, 업로드 디렉터리, 알림 채널 상태.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 서비스 전체 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    /// 요청은 처리하지만 업로드 등 일부 기능이 불가
    Degraded,
    /// 저장소 연결 불가
    Unhealthy,
}

/// 컴포넌트 상태 값.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComponentState {
    Up,
    Down,
    NotConfigured,
}

/// 헬스 체크 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: HealthState,
    pub version: String,
    pub uptime_secs: i64,
    /// RFC 3339
    pub timestamp: String,
    pub components: ComponentHealth,
}

/// 컴포넌트별 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub storage: ComponentStatus,
    pub uploads: ComponentStatus,
    pub notifications: ComponentStatus,
}

/// 단일 컴포넌트 상태와 부가 정보.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    pub status: ComponentState,
    /// 저장소 구현 이름, 알림 채널 이름, 장애 원인 등
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    fn new(status: ComponentState, message: Option<String>) -> Self {
        Self { status, message }
    }

    pub fn up(info: impl Into<String>) -> Self {
        Self::new(ComponentState::Up, Some(info.into()))
    }

    pub fn down(reason: impl Into<String>) -> Self {
        Self::new(ComponentState::Down, Some(reason.into()))
    }

    pub fn not_configured() -> Self {
        Self::new(ComponentState::NotConfigured, None)
    }

    pub fn is_up(&self) -> bool {
        self.status == ComponentState::Up
    }
}

impl ComponentHealth {
    /// 컴포넌트 상태로부터 전체 상태와 HTTP 상태 코드를 결정합니다.
    ///
    /// 알림 채널은 선택 기능이라 전체 상태에 영향을 주지 않습니다.
    pub fn overall(&self) -> (HealthState, StatusCode) {
        if !self.storage.is_up() {
            (HealthState::Unhealthy, StatusCode::SERVICE_UNAVAILABLE)
        } else if !self.uploads.is_up() {
            (HealthState::Degraded, StatusCode::OK)
        } else {
            (HealthState::Healthy, StatusCode::OK)
        }
    }
}

async fn check_components(state: &AppState) -> ComponentHealth {
    let backend = state.storage.backend();
    let storage = if state.storage.ping().await {
        ComponentStatus::up(backend)
    } else {
        ComponentStatus::down(format!("{backend} unreachable"))
    };

    let uploads = match state.content.ensure_root().await {
        Ok(()) => ComponentStatus::up(state.content.public_prefix()),
        Err(e) => ComponentStatus::down(format!("upload directory unavailable: {e}")),
    };

    let notifications = if state.notifier.is_enabled() {
        ComponentStatus::up(state.notifier.name())
    } else {
        ComponentStatus::not_configured()
    };

    ComponentHealth {
        storage,
        uploads,
        notifications,
    }
}

/// 상세 헬스 체크.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "정상 또는 일부 저하", body = HealthResponse),
        (status = 503, description = "저장소 연결 실패", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let components = check_components(&state).await;
    let (status, code) = components.overall();

    if status != HealthState::Healthy {
        tracing::warn!(?status, ?components, "Health check reports a problem");
    }

    let body = HealthResponse {
        status,
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components,
    };

    (code, Json(body))
}

/// 헬스 체크 라우터.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}
