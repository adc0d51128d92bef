//! SMTP 이메일 알림 서비스.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use portfolio_core::MailConfig;
use tracing::{debug, error, info};

use crate::types::{
    AccountNotification, DeliveryStatus, NotificationError, NotificationResult, NotificationSender,
};

/// SMTP 이메일 전송기.
pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailSender {
    /// 메일 설정으로 전송기를 생성합니다.
    ///
    /// 자격증명이 없으면 `None`을 반환합니다.
    pub fn from_config(config: &MailConfig) -> NotificationResult<Option<Self>> {
        let (Some(username), Some(password)) = (
            config.smtp_username.as_deref().filter(|v| !v.is_empty()),
            config.smtp_password.as_deref().filter(|v| !v.is_empty()),
        ) else {
            return Ok(None);
        };

        let from_address = config.from_address.as_deref().unwrap_or(username);
        let from: Mailbox = from_address
            .parse()
            .map_err(|e| NotificationError::InvalidAddress(format!("{}: {}", from_address, e)))?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| NotificationError::InvalidConfig(e.to_string()))?
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

        Ok(Some(Self { mailer, from }))
    }

    fn build_message(&self, notification: &AccountNotification) -> NotificationResult<Message> {
        let to: Mailbox = notification.email.parse().map_err(|e| {
            NotificationError::InvalidAddress(format!("{}: {}", notification.email, e))
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(notification.subject())
            .header(ContentType::TEXT_HTML)
            .body(notification.html_body())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}

#[async_trait]
impl NotificationSender for EmailSender {
    async fn send(&self, notification: &AccountNotification) -> NotificationResult<DeliveryStatus> {
        let message = self.build_message(notification)?;

        debug!(to = %notification.email, "Sending account e-mail");

        match self.mailer.send(message).await {
            Ok(_) => {
                info!(username = %notification.username, "Account e-mail sent");
                Ok(DeliveryStatus::Sent)
            }
            Err(e) => {
                error!(error = %e, username = %notification.username, "Failed to send account e-mail");
                Err(NotificationError::SendFailed(e.to_string()))
            }
        }
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "email"
    }
}

/// 비활성 전송기. 전송 요청을 기록만 하고 건너뜁니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSender;

#[async_trait]
impl NotificationSender for DisabledSender {
    async fn send(&self, notification: &AccountNotification) -> NotificationResult<DeliveryStatus> {
        info!(
            username = %notification.username,
            "Email sending skipped: no email credentials configured"
        );
        Ok(DeliveryStatus::Skipped)
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// 설정에 맞는 전송기를 선택합니다.
///
/// 자격증명이 없거나 SMTP 설정이 잘못되면 [`DisabledSender`]로 대체합니다.
pub fn sender_from_config(config: &MailConfig) -> Arc<dyn NotificationSender> {
    match EmailSender::from_config(config) {
        Ok(Some(sender)) => {
            info!(host = %config.smtp_host, "E-mail notifications enabled");
            Arc::new(sender)
        }
        Ok(None) => {
            info!("E-mail notifications disabled (no SMTP credentials)");
            Arc::new(DisabledSender)
        }
        Err(e) => {
            error!(error = %e, "Invalid mail configuration, notifications disabled");
            Arc::new(DisabledSender)
        }
    }
}
