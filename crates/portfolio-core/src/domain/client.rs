//! 고객 레코드.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 온보딩 폼으로 접수된 고객.
///
/// `user_id`는 관리자가 로그인 계정을 만들어 연결하기 전까지 비어 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i32,
    pub user_id: Option<i32>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// 로그인 계정이 연결되었는지 확인.
    pub fn has_account(&self) -> bool {
        self.user_id.is_some()
    }

    /// 주어진 사용자에게 연결된 고객인지 확인.
    pub fn is_linked_to(&self, user_id: i32) -> bool {
        self.user_id == Some(user_id)
    }
}

/// 고객 생성 입력.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewClient {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub address: Option<String>,
}
