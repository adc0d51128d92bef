//! Document Repository

use portfolio_core::{Document, NewDocument};
use sqlx::PgPool;

use super::{StoreError, StoreResult};

/// Document Repository
pub struct DocumentRepository;

impl DocumentRepository {
    /// 문서 메타데이터 저장
    pub async fn create(pool: &PgPool, input: NewDocument) -> StoreResult<Document> {
        sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (
                project_id, file_name, file_type, file_url,
                uploaded_by, uploader_role, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(input.project_id)
        .bind(&input.file_name)
        .bind(&input.file_type)
        .bind(&input.file_url)
        .bind(input.uploaded_by)
        .bind(input.uploader_role.as_str())
        .bind(&input.description)
        .fetch_one(pool)
        .await
        .map_err(|e| StoreError::classify(e, "project", input.project_id))
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> StoreResult<Option<Document>> {
        let document = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(document)
    }

    /// 프로젝트별 문서 목록 (최신순)
    pub async fn list_by_project(pool: &PgPool, project_id: i32) -> StoreResult<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE project_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(documents)
    }
}
