//! 에러 envelope을 지키는 요청 extractor.
//!
//! axum 기본 extractor의 거부 응답(422 text/plain 등)을 [`ApiError::Validation`]으로
//! 바꿔 모든 입력 오류가 `ApiErrorResponse` 형식의 400으로 응답되도록 합니다.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON 본문 extractor.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// 경로 파라미터 extractor.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// 쿼리 문자열 extractor.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
