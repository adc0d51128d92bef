//! 프로젝트 문서 (생성 후 변경 불가).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i32,
    pub project_id: i32,
    pub file_name: String,
    /// MIME 타입
    pub file_type: String,
    pub file_url: String,
    pub uploaded_by: i32,
    #[cfg_attr(feature = "sqlx-support", sqlx(try_from = "String"))]
    pub uploader_role: Role,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub project_id: i32,
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub uploaded_by: i32,
    pub uploader_role: Role,
    pub description: Option<String>,
}
