//! Contact Repository

use portfolio_core::{Contact, NewContact};
use sqlx::PgPool;

use super::StoreResult;

/// Contact Repository
pub struct ContactRepository;

impl ContactRepository {
    pub async fn create(pool: &PgPool, input: NewContact) -> StoreResult<Contact> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.subject)
        .bind(&input.message)
        .fetch_one(pool)
        .await?;

        Ok(contact)
    }

    /// 문의 목록 (최신순)
    pub async fn list(pool: &PgPool) -> StoreResult<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT * FROM contacts ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(contacts)
    }
}
