//! 요청/응답 DTO.
//!
//! 요청 본문은 `validator`로 검증한 뒤 도메인 입력(`New*`)으로 변환합니다.
//! 모든 필드는 camelCase로 직렬화됩니다.

use std::borrow::Cow;

use portfolio_core::{
    Client, NewClient, NewContact, NewProject, Project, Role, User,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::auth::Identity;

fn validate_terms(agreed: &bool) -> Result<(), ValidationError> {
    if *agreed {
        Ok(())
    } else {
        Err(ValidationError::new("terms_agreed")
            .with_message(Cow::Borrowed("You must agree to the terms and conditions")))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ==================== Auth ====================

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// 로그인 응답. `user`에는 비밀번호 해시가 포함되지 않습니다.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// 현재 사용자 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub user: Identity,
}

/// 관리자 사용자 생성 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// 생략하면 client
    #[serde(default)]
    pub role: Option<Role>,
}

/// 고객 포털 계정 생성 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientRequest {
    #[validate(range(min = 1, message = "A valid client id is required"))]
    pub client_id: i32,
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// 고객 포털 계정 생성 결과.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientAccountResponse {
    pub user: User,
    pub client: Client,
    /// 안내 메일이 실제로 전송되었는지
    pub notification_sent: bool,
}

// ==================== Onboarding / Contact ====================

/// 온보딩 폼 제출 (고객 + 첫 프로젝트).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    #[validate(length(min = 2, message = "Full name must be at least 2 characters"))]
    pub full_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 5, message = "Please enter a valid phone number"))]
    pub phone: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "Please select a project type"))]
    pub project_type: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[validate(length(min = 1, message = "Please select a budget range"))]
    pub budget: String,
    #[validate(length(min = 1, message = "Please select a timeline"))]
    pub timeline: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub additional_requirements: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_terms"))]
    pub terms_agreed: bool,
}

impl OnboardingRequest {
    /// 고객/프로젝트 입력으로 분리합니다.
    pub fn into_parts(self) -> (NewClient, NewProject) {
        let client = NewClient {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            company: non_blank(self.company),
            address: non_blank(self.address),
        };
        let project = NewProject {
            project_type: self.project_type,
            description: self.description,
            features: self
                .features
                .into_iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            budget: self.budget,
            timeline: self.timeline,
            start_date: non_blank(self.start_date),
            deadline: non_blank(self.deadline),
            additional_requirements: non_blank(self.additional_requirements),
        };
        (client, project)
    }
}

/// 온보딩 결과.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OnboardingResponse {
    pub client: Client,
    pub project: Project,
}

/// 문의 폼.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContactRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 2, message = "Subject must be at least 2 characters"))]
    pub subject: String,
    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,
}

impl From<ContactRequest> for NewContact {
    fn from(req: ContactRequest) -> Self {
        NewContact {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            subject: req.subject,
            message: req.message,
        }
    }
}

// ==================== Admin ====================

/// 고객 상세 (고객 + 프로젝트 목록).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientDetailResponse {
    pub client: Client,
    pub projects: Vec<Project>,
}

/// 프로젝트 상태 변경 요청.
///
/// 문자열로 받아 핸들러에서 파싱합니다 (누락/알 수 없는 값 모두 400).
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub status: Option<String>,
}

// ==================== Documents / Messages ====================

/// 이미 공개된 파일의 문서 메타데이터 등록.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub project_id: i32,
    #[validate(length(min = 1, max = 255, message = "File name is required"))]
    pub file_name: String,
    #[validate(length(min = 1, max = 255, message = "File type is required"))]
    pub file_type: String,
    #[validate(length(min = 1, message = "File URL is required"))]
    pub file_url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `GET /api/documents` 쿼리.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    pub project_id: Option<i32>,
}

/// 메시지 전송 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub project_id: i32,
    #[validate(length(min = 1, message = "Message content is required"))]
    pub content: String,
}

// ==================== GitHub ====================

/// GitHub 저장소 요약.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepo {
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub homepage: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub topics: Vec<String>,
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn onboarding() -> OnboardingRequest {
        serde_json::from_value(serde_json::json!({
            "fullName": "Jane Doe",
            "email": "jane@x.com",
            "phone": "555-0100",
            "projectType": "website",
            "description": "Need a 10-page site",
            "budget": "1000-3000",
            "timeline": "2-4-weeks",
            "termsAgreed": true
        }))
        .unwrap()
    }

    #[test]
    fn test_onboarding_valid() {
        let req = onboarding();
        assert!(req.validate().is_ok());

        let (client, project) = req.into_parts();
        assert_eq!(client.full_name, "Jane Doe");
        assert!(client.company.is_none());
        assert!(project.features.is_empty());
    }

    #[test]
    fn test_onboarding_requires_terms() {
        let mut req = onboarding();
        req.terms_agreed = false;

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("terms_agreed"));
    }

    #[test]
    fn test_onboarding_field_rules() {
        let mut req = onboarding();
        req.full_name = "J".into();
        req.email = "not-an-email".into();
        req.description = "short".into();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("full_name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("description"));
        assert!(!fields.contains_key("phone"));
    }

    #[test]
    fn test_contact_rules() {
        let req = ContactRequest {
            name: "Al".into(),
            email: "al@x.com".into(),
            subject: "Hi".into(),
            message: "too short".into(),
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
        assert!(errors.field_errors().contains_key("message"));
    }

    #[test]
    fn test_blank_optionals_dropped() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" Acme ".into())), Some("Acme".into()));
    }
}
