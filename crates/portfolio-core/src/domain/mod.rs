//! 포트폴리오 고객 허브의 도메인 모델.

mod client;
mod contact;
mod document;
mod message;
mod project;
mod role;
mod user;

pub use client::*;
pub use contact::*;
pub use document::*;
pub use message::*;
pub use project::*;
pub use role::*;
pub use user::*;

/// 고정 열거형에 속하지 않는 문자열을 파싱하려 할 때의 에러.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    /// 열거형 이름 (예: "role")
    pub kind: &'static str,
    /// 입력 값
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
