//! 공통 에러 타입.

use thiserror::Error;

/// 포트폴리오 백엔드 전반에서 사용하는 에러.
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// 설정 에러 (시작 시점의 치명적 조건 포함)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 입력 검증 실패
    #[error("잘못된 입력: {0}")]
    Validation(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 중복 등 충돌
    #[error("충돌: {0}")]
    Conflict(String),

    /// 저장소 에러
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 공통 Result 타입.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

impl PortfolioError {
    /// 호출자에게 그대로 노출해도 되는 에러인지 확인합니다.
    ///
    /// 저장소/내부 에러는 로그에만 남기고 일반 메시지로 응답해야 합니다.
    pub fn is_client_facing(&self) -> bool {
        matches!(
            self,
            PortfolioError::Validation(_) | PortfolioError::NotFound(_) | PortfolioError::Conflict(_)
        )
    }
}

impl From<config::ConfigError> for PortfolioError {
    fn from(err: config::ConfigError) -> Self {
        PortfolioError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for PortfolioError {
    fn from(err: serde_json::Error) -> Self {
        PortfolioError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_facing_errors() {
        assert!(PortfolioError::Validation("email".into()).is_client_facing());
        assert!(PortfolioError::NotFound("project 3".into()).is_client_facing());
        assert!(PortfolioError::Conflict("username".into()).is_client_facing());
        assert!(!PortfolioError::Storage("pool timeout".into()).is_client_facing());
        assert!(!PortfolioError::Internal("boom".into()).is_client_facing());
    }

    #[test]
    fn test_config_error_conversion() {
        let err: PortfolioError = config::ConfigError::NotFound("server.port".into()).into();
        assert!(matches!(err, PortfolioError::Config(_)));
    }
}
