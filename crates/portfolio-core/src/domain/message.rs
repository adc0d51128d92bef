//! 프로젝트 메시지.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

/// 프로젝트 단위 메시지. 변경 가능한 필드는 `is_read`뿐입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i32,
    pub project_id: i32,
    pub sender_id: i32,
    #[cfg_attr(feature = "sqlx-support", sqlx(try_from = "String"))]
    pub sender_role: Role,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub project_id: i32,
    pub sender_id: i32,
    pub sender_role: Role,
    pub content: String,
}
