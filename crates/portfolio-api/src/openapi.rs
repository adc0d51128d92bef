//! OpenAPI 문서화 설정.
//!
//! utoipa로 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use portfolio_core::{Client, Contact, Document, Message, Project, ProjectStatus, Role, User};

use crate::auth::Identity;
use crate::error::ApiErrorResponse;
use crate::routes::{
    ClientAccountResponse, ClientDetailResponse, ComponentHealth, ComponentState, ComponentStatus,
    ContactRequest, CreateDocumentRequest, CreateMessageRequest, GithubRepo, HealthResponse,
    HealthState, LoginRequest, LoginResponse, MeResponse, OnboardingRequest, OnboardingResponse,
    RegisterClientRequest, RegisterRequest, StatusUpdateRequest,
};

/// Bearer 토큰 보안 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Portfolio API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portfolio API",
        description = r#"
# Portfolio API

프리랜서 포트폴리오 사이트와 고객 포털을 위한 REST API입니다.

## 주요 기능

- **공개 폼**: 프로젝트 의뢰(온보딩), 문의
- **관리자**: 고객/프로젝트/문의 조회, 프로젝트 상태 변경, 고객 포털 계정 생성
- **고객 포털**: 자신의 프로젝트, 문서 교환, 메시지

## 인증

`POST /api/login`으로 토큰을 받은 뒤 `Authorization: Bearer <token>` 헤더를 포함하세요.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "로컬 개발 서버"),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "헬스 체크"),
        (name = "auth", description = "인증 - 로그인, 현재 사용자, 사용자 생성"),
        (name = "public", description = "공개 - 온보딩, 문의, GitHub 저장소"),
        (name = "admin", description = "관리자 - 고객/프로젝트/문의 관리"),
        (name = "projects", description = "프로젝트 - 역할 범위 목록"),
        (name = "documents", description = "문서 - 등록, 업로드, 조회"),
        (name = "messages", description = "메시지 - 전송, 조회, 읽음 표시")
    ),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            HealthState,
            ComponentHealth,
            ComponentStatus,
            ComponentState,

            // ===== Common =====
            ApiErrorResponse,

            // ===== Domain =====
            Role,
            User,
            Identity,
            Client,
            Project,
            ProjectStatus,
            Document,
            Message,
            Contact,

            // ===== Requests / Responses =====
            LoginRequest,
            LoginResponse,
            MeResponse,
            RegisterRequest,
            RegisterClientRequest,
            ClientAccountResponse,
            OnboardingRequest,
            OnboardingResponse,
            ContactRequest,
            ClientDetailResponse,
            StatusUpdateRequest,
            CreateDocumentRequest,
            CreateMessageRequest,
            GithubRepo,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        crate::routes::health::health_check,

        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::auth::register,

        crate::routes::onboarding::submit_onboarding,
        crate::routes::onboarding::submit_contact,
        crate::routes::github::list_repos,

        crate::routes::admin::list_clients,
        crate::routes::admin::get_client,
        crate::routes::admin::list_projects,
        crate::routes::admin::list_contacts,
        crate::routes::admin::update_project_status,
        crate::routes::admin::register_client,

        crate::routes::projects::list_projects,

        crate::routes::documents::create_document,
        crate::routes::documents::list_documents,
        crate::routes::documents::list_project_documents,
        crate::routes::documents::upload_document,

        crate::routes::messages::create_message,
        crate::routes::messages::list_project_messages,
        crate::routes::messages::mark_message_read,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Portfolio API"));
        assert!(json.contains("/api/login"));
        assert!(json.contains("/api/client-onboarding"));
        assert!(json.contains("/api/admin/projects/{id}/status"));
        assert!(json.contains("/api/upload-document"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("HealthResponse"));
        assert!(json.contains("OnboardingRequest"));
        assert!(json.contains("ApiErrorResponse"));
        assert!(json.contains("ProjectStatus"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
