//! Client Repository
//!
//! 고객 레코드 및 고객+프로젝트 동시 생성.

use portfolio_core::{Client, NewClient, NewProject, NewUser, Project, User};
use sqlx::PgPool;

use super::projects::INSERT_PROJECT;
use super::users::INSERT_USER;
use super::{StoreError, StoreResult};

const INSERT_CLIENT: &str = r#"
    INSERT INTO clients (full_name, email, phone, company, address)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING *
"#;

const LINK_USER: &str = r#"
    UPDATE clients SET user_id = $2
    WHERE id = $1 AND user_id IS NULL
    RETURNING *
"#;

/// Client Repository
pub struct ClientRepository;

impl ClientRepository {
    /// 고객 생성
    pub async fn create(pool: &PgPool, input: NewClient) -> StoreResult<Client> {
        let client = sqlx::query_as::<_, Client>(INSERT_CLIENT)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.address)
            .fetch_one(pool)
            .await?;

        Ok(client)
    }

    /// 고객과 첫 프로젝트 생성.
    ///
    /// 트랜잭션을 사용하여 둘 다 생성되거나 둘 다 생성되지 않도록 합니다.
    pub async fn create_with_project(
        pool: &PgPool,
        client: NewClient,
        project: NewProject,
    ) -> StoreResult<(Client, Project)> {
        let mut tx = pool.begin().await?;

        let client = sqlx::query_as::<_, Client>(INSERT_CLIENT)
            .bind(&client.full_name)
            .bind(&client.email)
            .bind(&client.phone)
            .bind(&client.company)
            .bind(&client.address)
            .fetch_one(&mut *tx)
            .await?;

        let project = sqlx::query_as::<_, Project>(INSERT_PROJECT)
            .bind(client.id)
            .bind(&project.project_type)
            .bind(&project.description)
            .bind(&project.features)
            .bind(&project.budget)
            .bind(&project.timeline)
            .bind(&project.start_date)
            .bind(&project.deadline)
            .bind(&project.additional_requirements)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StoreError::classify(e, "client", client.id))?;

        tx.commit().await?;

        Ok((client, project))
    }

    /// ID로 고객 조회
    pub async fn find_by_id(pool: &PgPool, id: i32) -> StoreResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(client)
    }

    /// 연결된 사용자로 고객 조회
    pub async fn find_by_user(pool: &PgPool, user_id: i32) -> StoreResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE user_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(client)
    }

    /// 전체 고객 목록 (최신순)
    pub async fn list(pool: &PgPool) -> StoreResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(clients)
    }

    /// 고객용 로그인 계정 생성과 연결을 하나의 트랜잭션으로 처리합니다.
    ///
    /// 고객이 없거나 이미 연결되어 있으면 사용자 삽입을 롤백하고 `Ok(None)`.
    pub async fn create_linked_user(
        pool: &PgPool,
        client_id: i32,
        input: NewUser,
    ) -> StoreResult<Option<(User, Client)>> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, User>(INSERT_USER)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StoreError::classify(e, "user", 0))?;

        let linked = sqlx::query_as::<_, Client>(LINK_USER)
            .bind(client_id)
            .bind(user.id)
            .fetch_optional(&mut *tx)
            .await?;

        match linked {
            Some(client) => {
                tx.commit().await?;
                Ok(Some((user, client)))
            }
            None => {
                tx.rollback().await?;
                Ok(None)
            }
        }
    }
}
