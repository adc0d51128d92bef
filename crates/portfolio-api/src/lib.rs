//! 포트폴리오 사이트 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (공개 폼, 관리자, 고객 포털)
//! - JWT 인증과 역할 기반 접근 제어
//! - PostgreSQL / 인메모리 저장소
//! - 문서 업로드
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 인증 및 권한 관리
//! - [`repository`]: 저장소 trait 및 구현
//! - [`services`]: 계정/접근 범위 서비스
//! - [`upload`]: 업로드 정책 및 파일 저장소
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod upload;

pub use auth::{
    hash_password, verify_password, AdminAuth, AuthUser, Claims, Identity, JwtAuthError,
    Permission, Role, TokenService,
};
pub use error::{ApiError, ApiErrorResponse, ApiResult, ApiSuccess};
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use repository::{MemStorage, PgStorage, Storage, StoreError};
pub use routes::{create_api_router, create_router};
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::{create_test_state, create_test_state_with, TEST_JWT_SECRET};
