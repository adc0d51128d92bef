//! 알림 타입 및 trait 정의.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 고객 포털 계정 생성 알림.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountNotification {
    /// 수신자 이메일
    pub email: String,
    /// 수신자 이름
    pub name: String,
    /// 새로 발급된 로그인 ID
    pub username: String,
    /// 고객 포털 로그인 URL
    pub portal_url: String,
}

impl AccountNotification {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        username: impl Into<String>,
        portal_url: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            username: username.into(),
            portal_url: portal_url.into(),
        }
    }

    /// 메일 제목.
    pub fn subject(&self) -> &'static str {
        "Your Client Portal Account"
    }

    /// HTML 본문.
    pub fn html_body(&self) -> String {
        format!(
            "<p>Hello {name},</p>\
             <p>Your client account has been created. You can now track your projects, \
             exchange documents and message us from your dashboard.</p>\
             <p><strong>Username:</strong> {username}<br/>\
             <strong>Login URL:</strong> <a href=\"{url}\">{url}</a></p>\
             <p>If you have not received your password, please contact us.</p>",
            name = escape_html(&self.name),
            username = escape_html(&self.username),
            url = escape_html(&self.portal_url),
        )
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// 전송 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// 실제로 전송됨
    Sent,
    /// 채널이 비활성화되어 건너뜀
    Skipped,
}

impl DeliveryStatus {
    pub fn was_sent(&self) -> bool {
        *self == DeliveryStatus::Sent
    }
}

/// 알림 작업용 Result 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("알림 전송 실패: {0}")]
    SendFailed(String),

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    #[error("잘못된 주소: {0}")]
    InvalidAddress(String),
}

/// 알림 전송기 trait.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 알림을 전송합니다.
    async fn send(&self, notification: &AccountNotification) -> NotificationResult<DeliveryStatus>;

    /// 전송기가 활성화되어 있는지 확인합니다.
    fn is_enabled(&self) -> bool;

    /// 전송기 이름을 반환합니다.
    fn name(&self) -> &str;
}
