//! API 에러 및 응답 envelope.
//!
//! 모든 엔드포인트는 실패 시 [`ApiErrorResponse`] 형식을 반환합니다.
//! 인프라 에러는 로그에만 상세 내용을 남기고 일반 메시지로 응답합니다.

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use crate::auth::JwtAuthError;
use crate::repository::StoreError;
use crate::services::{AccessError, AccountError};
use crate::upload::UploadRejection;

/// 통합 API 에러 응답.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Project not found",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "VALIDATION_ERROR", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 필드별 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(code: impl Into<String>, message: impl Into<String>, details: Value) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// 쓰기 성공 응답 envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    /// 201 Created 응답.
    pub fn created(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Json(Self::new(message, data)))
    }

    /// 200 OK 응답.
    pub fn ok(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::OK, Json(Self::new(message, data)))
    }
}

/// 핸들러 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 입력 검증 실패 (400)
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    /// 토큰 관련 실패 (401/403)
    #[error(transparent)]
    Auth(#[from] JwtAuthError),

    /// 로그인 실패 (401). 사용자 없음/비밀번호 불일치를 구분하지 않습니다.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// 역할/소유권 불일치 (403)
    #[error("{0}")]
    Forbidden(String),

    /// 대상 없음 (404)
    #[error("{0}")]
    NotFound(String),

    /// 중복 (409)
    #[error("{0}")]
    Conflict(String),

    /// 업로드 거부 (413/415/400)
    #[error(transparent)]
    Upload(#[from] UploadRejection),

    /// 외부 API 실패 (502)
    #[error("{0}")]
    Upstream(String),

    /// 서버 내부 에러 (500). 상세 내용은 로그에만 남깁니다.
    #[error("{0}")]
    Internal(String),
}

/// API 핸들러 Result 타입.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(detail: impl std::fmt::Display) -> Self {
        ApiError::Internal(detail.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Auth(e) => e.status(),
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upload(rejection) => rejection.status(),
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Auth(e) => e.code(),
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Upload(rejection) => rejection.code(),
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match self {
            ApiError::Internal(detail) => {
                error!(detail = %detail, "Internal server error");
                ApiErrorResponse::new(code, "Internal server error")
            }
            ApiError::Validation {
                message,
                details: Some(details),
            } => ApiErrorResponse::with_details(code, message, details),
            other => ApiErrorResponse::new(code, other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => ApiError::Conflict("Username already exists".to_string()),
            StoreError::MissingReference { entity, id } => {
                ApiError::NotFound(format!("{} {} not found", capitalize(entity), id))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidCredentials => ApiError::InvalidCredentials,
            AccountError::WeakPassword(message) => ApiError::validation(message),
            AccountError::ClientNotFound(_) => ApiError::NotFound(err.to_string()),
            AccountError::AlreadyLinked(_) => ApiError::Conflict(err.to_string()),
            AccountError::Store(store) => store.into(),
            AccountError::Password(_) | AccountError::Token(_) => ApiError::internal(err),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NoClientRecord | AccessError::ProjectNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            AccessError::NotOwner(_) => ApiError::Forbidden(err.to_string()),
            AccessError::Store(store) => store.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors.iter().map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: invalid value", field))
            });
            details
                .entry(snake_to_camel(&field))
                .or_default()
                .extend(messages);
        }

        let message = details
            .values()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join("; ");

        ApiError::Validation {
            message,
            details: serde_json::to_value(details).ok(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `full_name` → `fullName`
fn snake_to_camel(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
