//! User Repository
//!
//! 로그인 계정 조회/생성. 비밀번호는 항상 해시된 상태로 전달받습니다.

use portfolio_core::{NewUser, User};
use sqlx::PgPool;

use super::{StoreError, StoreResult};

pub(super) const INSERT_USER: &str = r#"
    INSERT INTO users (username, password, role, is_active)
    VALUES ($1, $2, $3, $4)
    RETURNING *
"#;

/// User Repository
pub struct UserRepository;

impl UserRepository {
    /// ID로 사용자 조회
    pub async fn find_by_id(pool: &PgPool, id: i32) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// 이름으로 사용자 조회
    pub async fn find_by_username(pool: &PgPool, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// 사용자 생성
    ///
    /// `users.username` 유니크 제약 위반은 `DuplicateUsername`으로 변환됩니다.
    pub async fn create(pool: &PgPool, input: NewUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(INSERT_USER)
        .bind(&input.username)
        .bind(&input.password_hash)
        .bind(input.role.as_str())
        .bind(input.is_active)
        .fetch_one(pool)
        .await
        .map_err(|e| StoreError::classify(e, "user", 0))
    }
}
