//! 인증 endpoint.
//!
//! - `POST /api/login` - 로그인 (공개)
//! - `GET /api/me` - 현재 사용자
//! - `POST /api/register` - 사용자 생성 (관리자)

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use portfolio_core::{Role, User};
use tracing::info;
use validator::Validate;

use super::types::{LoginRequest, LoginResponse, MeResponse, RegisterRequest};
use crate::auth::{AdminAuth, AuthUser, Identity};
use crate::error::{ApiError, ApiErrorResponse, ApiResult, ApiSuccess};
use crate::extract::ApiJson;
use crate::metrics::record_login;
use crate::services::{self, AccountError, NewAccount};
use crate::state::AppState;

/// 로그인.
///
/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 401, description = "잘못된 자격증명", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    request.validate()?;

    let outcome = services::login(
        state.storage.as_ref(),
        &state.tokens,
        request.username.trim(),
        &request.password,
    )
    .await;

    match outcome {
        Ok(outcome) => {
            record_login("success");
            Ok(Json(LoginResponse {
                user: outcome.user,
                token: outcome.token,
            }))
        }
        Err(AccountError::InvalidCredentials) => {
            record_login("invalid_credentials");
            info!(username = %request.username.trim(), "Login rejected");
            Err(ApiError::InvalidCredentials)
        }
        Err(e) => Err(e.into()),
    }
}

/// 현재 사용자.
///
/// 토큰 발급 이후 삭제되었거나 비활성화된 사용자는 404로 응답합니다.
///
/// GET /api/me
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "현재 사용자", body = MeResponse),
        (status = 401, description = "토큰 없음", body = ApiErrorResponse),
        (status = 403, description = "유효하지 않은 토큰", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음 또는 비활성", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> ApiResult<Json<MeResponse>> {
    let user = state
        .storage
        .get_user(identity.id)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| {
            info!(user_id = identity.id, "Token subject missing or inactive");
            ApiError::not_found("User not found")
        })?;

    Ok(Json(MeResponse {
        user: Identity {
            id: user.id,
            username: user.username,
            role: user.role,
        },
    }))
}

/// 사용자 생성 (관리자 전용).
///
/// POST /api/register
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "사용자 생성", body = User),
        (status = 400, description = "검증 실패", body = ApiErrorResponse),
        (status = 403, description = "관리자 아님", body = ApiErrorResponse),
        (status = 409, description = "중복 사용자 이름", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    AdminAuth(admin): AdminAuth,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<(axum::http::StatusCode, Json<ApiSuccess<User>>)> {
    request.validate()?;

    let user = services::register_user(
        state.storage.as_ref(),
        NewAccount {
            username: request.username.trim().to_string(),
            password: request.password,
            role: request.role.unwrap_or(Role::Client),
        },
    )
    .await?;

    info!(admin_id = admin.id, user_id = user.id, "User created by admin");
    Ok(ApiSuccess::created("User registered successfully", user))
}

/// 공개 인증 라우터 (`/api/login`).
pub fn public_auth_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}

/// 보호된 인증 라우터 (`/api/me`, `/api/register`).
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(me))
        .route("/register", post(register))
}
