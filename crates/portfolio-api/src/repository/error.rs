//! 저장소 에러.

use thiserror::Error;

/// 저장소 작업 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 이미 사용 중인 사용자 이름
    #[error("username already exists")]
    DuplicateUsername,

    /// 참조 대상 레코드가 없음 (외래 키 위반)
    #[error("{entity} {id} does not exist")]
    MissingReference { entity: &'static str, id: i32 },

    /// 데이터베이스 에러
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 저장소를 사용할 수 없음
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// 저장소 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// 삽입 에러를 분류합니다.
    ///
    /// 유니크 위반은 `DuplicateUsername`, 외래 키 위반은 `MissingReference`로 변환합니다.
    pub(crate) fn classify(err: sqlx::Error, entity: &'static str, id: i32) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return StoreError::DuplicateUsername;
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference { entity, id };
            }
        }
        StoreError::Database(err)
    }

    /// 인프라 에러인지 (호출자에게 상세 내용을 숨겨야 하는지) 확인합니다.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, StoreError::Database(_) | StoreError::Unavailable(_))
    }
}
