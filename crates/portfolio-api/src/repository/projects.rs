//! Project Repository

use portfolio_core::{NewProject, Project, ProjectStatus};
use sqlx::PgPool;

use super::{StoreError, StoreResult};

pub(super) const INSERT_PROJECT: &str = r#"
    INSERT INTO projects (
        client_id, project_type, description, features, budget, timeline,
        start_date, deadline, additional_requirements
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    RETURNING *
"#;

/// Project Repository
pub struct ProjectRepository;

impl ProjectRepository {
    /// 프로젝트 생성 (상태는 항상 pending으로 시작)
    pub async fn create(pool: &PgPool, client_id: i32, input: NewProject) -> StoreResult<Project> {
        sqlx::query_as::<_, Project>(INSERT_PROJECT)
            .bind(client_id)
            .bind(&input.project_type)
            .bind(&input.description)
            .bind(&input.features)
            .bind(&input.budget)
            .bind(&input.timeline)
            .bind(&input.start_date)
            .bind(&input.deadline)
            .bind(&input.additional_requirements)
            .fetch_one(pool)
            .await
            .map_err(|e| StoreError::classify(e, "client", client_id))
    }

    /// ID로 프로젝트 조회
    pub async fn find_by_id(pool: &PgPool, id: i32) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(project)
    }

    /// 전체 프로젝트 목록 (최신순)
    pub async fn list(pool: &PgPool) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// 고객별 프로젝트 목록 (최신순)
    pub async fn list_by_client(pool: &PgPool, client_id: i32) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE client_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(client_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// 상태 변경. 대상이 없으면 `None`.
    pub async fn update_status(
        pool: &PgPool,
        id: i32,
        status: ProjectStatus,
    ) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            "UPDATE projects SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }
}
