//! 공개 폼 endpoint.
//!
//! - `POST /api/client-onboarding` - 고객 + 첫 프로젝트 접수
//! - `POST /api/contact` - 문의 접수

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use portfolio_core::Contact;
use tracing::info;
use validator::Validate;

use super::types::{ContactRequest, OnboardingRequest, OnboardingResponse};
use crate::error::{ApiErrorResponse, ApiResult, ApiSuccess};
use crate::extract::ApiJson;
use crate::metrics::{record_contact, record_onboarding};
use crate::state::AppState;

/// 온보딩 폼 제출.
///
/// 고객과 프로젝트는 함께 생성되거나 둘 다 생성되지 않습니다.
#[utoipa::path(
    post,
    path = "/api/client-onboarding",
    request_body = OnboardingRequest,
    responses(
        (status = 201, description = "접수 완료", body = OnboardingResponse),
        (status = 400, description = "검증 실패", body = ApiErrorResponse)
    ),
    tag = "public"
)]
pub async fn submit_onboarding(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<OnboardingRequest>,
) -> ApiResult<(StatusCode, Json<ApiSuccess<OnboardingResponse>>)> {
    request.validate()?;

    let (client, project) = request.into_parts();
    let (client, project) = state
        .storage
        .create_client_with_project(client, project)
        .await?;

    record_onboarding();
    info!(
        client_id = client.id,
        project_id = project.id,
        project_type = %project.project_type,
        "Project request submitted"
    );

    Ok(ApiSuccess::created(
        "Project request submitted successfully",
        OnboardingResponse { client, project },
    ))
}

/// 문의 폼 제출.
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "문의 접수", body = Contact),
        (status = 400, description = "검증 실패", body = ApiErrorResponse)
    ),
    tag = "public"
)]
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ContactRequest>,
) -> ApiResult<(StatusCode, Json<ApiSuccess<Contact>>)> {
    request.validate()?;

    let contact = state.storage.create_contact(request.into()).await?;

    record_contact();
    info!(contact_id = contact.id, "Contact message received");

    Ok(ApiSuccess::created("Message sent successfully", contact))
}

/// 공개 폼 라우터.
pub fn onboarding_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/client-onboarding", post(submit_onboarding))
        .route("/contact", post(submit_contact))
}
