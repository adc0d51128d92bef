//! 프로젝트 및 진행 상태.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UnknownVariant;

/// 프로젝트 진행 상태.
///
/// 관리자만 변경할 수 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    /// 접수됨 (검토 전)
    #[default]
    Pending,
    /// 진행 중
    InProgress,
    /// 완료
    Completed,
    /// 취소
    Cancelled,
    /// 보류
    OnHold,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Pending,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
        ProjectStatus::OnHold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
            ProjectStatus::OnHold => "on-hold",
        }
    }

    /// 더 이상 작업이 진행되지 않는 상태인지 확인합니다.
    pub fn is_closed(&self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Cancelled)
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownVariant::new("project status", s))
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 고객이 의뢰한 프로젝트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub client_id: i32,
    pub project_type: String,
    pub description: String,
    /// 요청 기능 목록 (입력 순서 유지)
    pub features: Vec<String>,
    pub budget: String,
    pub timeline: String,
    pub start_date: Option<String>,
    pub deadline: Option<String>,
    pub additional_requirements: Option<String>,
    #[cfg_attr(feature = "sqlx-support", sqlx(try_from = "String"))]
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

/// 프로젝트 생성 입력. `client_id`는 저장 시점에 결정됩니다.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewProject {
    pub project_type: String,
    pub description: String,
    pub features: Vec<String>,
    pub budget: String,
    pub timeline: String,
    pub start_date: Option<String>,
    pub deadline: Option<String>,
    pub additional_requirements: Option<String>,
}
