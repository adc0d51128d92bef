//! tracing 기반 로깅 인프라.
//!
//! 출력 형식은 세 가지를 지원합니다:
//! - **pretty**: 개발용
//! - **json**: 운영환경/로그 수집용
//! - **compact**: 한 줄 요약

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 사람이 읽기 쉬운 형식 (개발용)
    #[default]
    Pretty,
    /// JSON 형식 (운영용)
    Json,
    /// 간결한 한 줄 형식
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 필터 표현식 (예: "info", "portfolio_api=debug,tower_http=info")
    pub level: String,
    /// 출력 형식
    pub format: LogFormat,
    /// 파일명/줄 번호 포함 여부
    pub with_file: bool,
    /// 대상(모듈 경로) 포함 여부
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_file: false,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// 레벨만 지정해 설정을 생성합니다.
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// 로그 형식을 설정합니다.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// 애플리케이션 설정의 `logging` 섹션에서 생성합니다.
    ///
    /// 알 수 없는 형식 문자열은 pretty로 취급합니다.
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        Self {
            level: settings.level.clone(),
            format: settings.format.parse().unwrap_or_default(),
            ..Default::default()
        }
    }

    /// `RUST_LOG`, `LOG_FORMAT` 환경 변수에서 생성합니다.
    pub fn from_env() -> Self {
        let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Self {
            level,
            format,
            ..Default::default()
        }
    }
}

/// 주어진 설정으로 전역 subscriber를 설치합니다.
///
/// `RUST_LOG`가 설정되어 있으면 `config.level`보다 우선합니다.
/// 이미 subscriber가 설치된 경우 에러를 반환합니다.
///
/// ```no_run
/// use portfolio_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("debug").with_format(LogFormat::Json)).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_file(config.with_file)
                    .with_line_number(config.with_file)
                    .with_target(config.with_target),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_file(config.with_file)
                    .with_line_number(config.with_file)
                    .with_target(config.with_target),
            )
            .try_init()?,
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_file(config.with_file)
                    .with_line_number(config.with_file)
                    .with_target(config.with_target),
            )
            .try_init()?,
    }

    tracing::info!(format = ?config.format, level = %config.level, "Logging initialized");

    Ok(())
}

/// 환경 변수 기반으로 로깅을 초기화합니다.
pub fn init_logging_from_env() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogConfig::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" compact ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_from_settings_falls_back_to_pretty() {
        let settings = LoggingConfig {
            level: "portfolio_api=debug".to_string(),
            format: "yaml".to_string(),
        };
        let config = LogConfig::from_settings(&settings);

        assert_eq!(config.level, "portfolio_api=debug");
        assert_eq!(config.format, LogFormat::Pretty);
    }
}
