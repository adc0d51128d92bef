//! # Portfolio Notification
//!
//! 고객 계정 생성 알림 서비스.
//!
//! 지원 채널:
//! - E-mail (SMTP)
//!
//! SMTP 자격증명이 없으면 [`DisabledSender`]가 사용되며, 전송은 건너뛰고 로그만 남깁니다.

pub mod email;
pub mod types;

pub use email::*;
pub use types::*;
