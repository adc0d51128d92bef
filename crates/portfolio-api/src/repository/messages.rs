//! Message Repository

use portfolio_core::{Message, NewMessage};
use sqlx::PgPool;

use super::{StoreError, StoreResult};

/// Message Repository
pub struct MessageRepository;

impl MessageRepository {
    pub async fn create(pool: &PgPool, input: NewMessage) -> StoreResult<Message> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (project_id, sender_id, sender_role, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(input.project_id)
        .bind(input.sender_id)
        .bind(input.sender_role.as_str())
        .bind(&input.content)
        .fetch_one(pool)
        .await
        .map_err(|e| StoreError::classify(e, "project", input.project_id))
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> StoreResult<Option<Message>> {
        let message = sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(message)
    }

    /// 프로젝트별 메시지 목록 (최신순)
    pub async fn list_by_project(pool: &PgPool, project_id: i32) -> StoreResult<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE project_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    /// 읽음 표시. 대상이 없으면 `None`.
    pub async fn mark_read(pool: &PgPool, id: i32) -> StoreResult<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            "UPDATE messages SET is_read = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(message)
    }
}
