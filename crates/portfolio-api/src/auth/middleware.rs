//! Axum용 JWT 인증 미들웨어 및 추출기.
//!
//! 요청별 상태 전이:
//! - 토큰 없음 → 401
//! - 토큰이 있으나 유효하지 않음 → 403
//! - 유효한 토큰 → [`Identity`]를 요청 확장에 넣고 다음 단계로 진행
//!
//! 미들웨어는 역할을 검사하지 않습니다. 역할 검사는 핸들러([`AdminAuth`], [`require_role`])에서 합니다.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::{Identity, Permission, Role, TokenService};
use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// JWT 인증 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtAuthError {
    #[error("Authorization header missing")]
    MissingToken,
    #[error("Token missing")]
    InvalidAuthHeader,
    #[error("Invalid or expired token")]
    InvalidOrExpired,
    #[error("Insufficient permissions")]
    InsufficientRole,
}

impl JwtAuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            JwtAuthError::MissingToken | JwtAuthError::InvalidAuthHeader => {
                StatusCode::UNAUTHORIZED
            }
            JwtAuthError::InvalidOrExpired | JwtAuthError::InsufficientRole => {
                StatusCode::FORBIDDEN
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            JwtAuthError::MissingToken => "MISSING_TOKEN",
            JwtAuthError::InvalidAuthHeader => "INVALID_AUTH_HEADER",
            JwtAuthError::InvalidOrExpired => "INVALID_TOKEN",
            JwtAuthError::InsufficientRole => "FORBIDDEN",
        }
    }
}

impl IntoResponse for JwtAuthError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorResponse::new(self.code(), self.to_string()));
        (self.status(), body).into_response()
    }
}

/// `Authorization: Bearer <token>` 헤더에서 토큰을 꺼냅니다.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, JwtAuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(JwtAuthError::MissingToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(JwtAuthError::InvalidAuthHeader)?;

    Ok(token)
}

fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<Identity, JwtAuthError> {
    let token = bearer_token(headers)?;
    let claims = tokens
        .verify(token)
        .map_err(|_| JwtAuthError::InvalidOrExpired)?;
    Ok(claims.identity())
}

/// 토큰 검증 미들웨어.
///
/// `middleware::from_fn_with_state(state, require_auth)`로 보호 라우트에 적용합니다.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, JwtAuthError> {
    let identity = authenticate(request.headers(), &state.tokens)?;

    tracing::debug!(user_id = identity.id, role = %identity.role, "Request authenticated");
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// 인증된 사용자 추출기 (역할 무관).
///
/// `require_auth`가 넣어 둔 [`Identity`]를 사용하고, 없으면 직접 헤더를 검증합니다.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(AuthUser(identity.clone()));
        }

        let app = Arc::<AppState>::from_ref(state);
        let identity = authenticate(&parts.headers, &app.tokens)?;
        parts.extensions.insert(identity.clone());

        Ok(AuthUser(identity))
    }
}

/// Admin 권한을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub Identity);

impl<S> FromRequestParts<S> for AdminAuth
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        require_role(Role::Admin, &identity)?;
        Ok(AdminAuth(identity))
    }
}

/// 특정 역할을 요구합니다. 관리자는 모든 역할 검사를 통과합니다.
pub fn require_role(required: Role, identity: &Identity) -> Result<(), JwtAuthError> {
    if identity.role == required || identity.is_admin() {
        Ok(())
    } else {
        Err(JwtAuthError::InsufficientRole)
    }
}

/// 특정 권한을 요구합니다.
pub fn require_permission(permission: Permission, identity: &Identity) -> Result<(), JwtAuthError> {
    if identity.has_permission(permission) {
        Ok(())
    } else {
        Err(JwtAuthError::InsufficientRole)
    }
}
