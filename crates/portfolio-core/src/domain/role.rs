//! 역할 기반 접근 제어 (RBAC).
//!
//! 사용자 역할은 관리자와 고객 두 가지뿐이며 생성 후 바뀌지 않습니다.

use serde::{Deserialize, Serialize};

use super::UnknownVariant;

/// 사용자 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 관리자 - 모든 권한 보유
    Admin,
    /// 고객 - 자기 프로젝트 범위의 문서/메시지 교환만 가능
    Client,
}

impl Role {
    /// 역할이 특정 권한을 가지는지 확인.
    pub fn has_permission(&self, permission: Permission) -> bool {
        match self {
            Role::Admin => true,
            Role::Client => matches!(
                permission,
                Permission::ExchangeDocuments | Permission::SendMessages
            ),
        }
    }

    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "client" => Some(Role::Client),
            _ => None,
        }
    }

    /// 저장소에 기록되는 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
        }
    }

    pub fn is_admin(&self) -> bool {
        *self == Role::Admin
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownVariant::new("role", s))
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 시스템 권한.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// 고객 레코드 조회/관리
    ManageClients,
    /// 프로젝트 상태 변경
    ManageProjects,
    /// 로그인 계정 생성
    ManageAccounts,
    /// 문의 내역 조회
    ViewContacts,
    /// 모든 고객의 프로젝트 조회
    ViewAllProjects,
    /// 프로젝트 문서 교환
    ExchangeDocuments,
    /// 프로젝트 메시지 송수신
    SendMessages,
}

impl Permission {
    /// 권한에 대한 설명 반환.
    pub fn description(&self) -> &'static str {
        match self {
            Permission::ManageClients => "고객 관리",
            Permission::ManageProjects => "프로젝트 상태 관리",
            Permission::ManageAccounts => "계정 관리",
            Permission::ViewContacts => "문의 조회",
            Permission::ViewAllProjects => "전체 프로젝트 조회",
            Permission::ExchangeDocuments => "문서 교환",
            Permission::SendMessages => "메시지 송수신",
        }
    }
}
