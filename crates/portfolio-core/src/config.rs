//! 설정 관리.
//!
//! 기본값 → 설정 파일(`config/default.toml`, 선택) → 환경 변수 순으로 병합합니다.
//!
//! # 환경 변수
//!
//! - `PORTFOLIO__<SECTION>__<KEY>` 형식 (예: `PORTFOLIO__SERVER__PORT=8080`)
//! - 관례적인 단축 이름도 지원합니다: `APP_ENV`, `PORT`, `DATABASE_URL`, `JWT_SECRET`,
//!   `ADMIN_USERNAME`, `ADMIN_PASSWORD`, `EMAIL_USER`, `EMAIL_PASSWORD`, `SMTP_HOST`,
//!   `CLIENT_PORTAL_URL`, `GITHUB_USERNAME`, `UPLOAD_DIR`

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{PortfolioError, PortfolioResult};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "PORTFOLIO";

/// 개발 환경 전용 JWT 시크릿.
const DEV_JWT_SECRET: &str = "development-secret-key-change-in-production";

/// 개발 환경 전용 관리자 비밀번호.
const DEV_ADMIN_PASSWORD: &str = "admin-dev-password";

/// 단축 환경 변수 → 설정 키 매핑.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("APP_ENV", "environment"),
    ("PORT", "server.port"),
    ("DATABASE_URL", "database.url"),
    ("JWT_SECRET", "auth.jwt_secret"),
    ("ADMIN_USERNAME", "auth.admin_username"),
    ("ADMIN_PASSWORD", "auth.admin_password"),
    ("EMAIL_USER", "mail.smtp_username"),
    ("EMAIL_PASSWORD", "mail.smtp_password"),
    ("SMTP_HOST", "mail.smtp_host"),
    ("CLIENT_PORTAL_URL", "mail.portal_url"),
    ("GITHUB_USERNAME", "github.username"),
    ("UPLOAD_DIR", "uploads.dir"),
];

/// 실행 환경.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 실행 환경
    pub environment: Environment,
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 업로드 설정
    pub uploads: UploadConfig,
    /// 메일 알림 설정
    pub mail: MailConfig,
    /// GitHub 저장소 목록 설정
    pub github: GithubConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// `host:port` 문자열.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 URL. 없으면 개발 환경에서 인메모리 저장소를 사용합니다.
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 10,
        }
    }
}

/// 인증 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 토큰 서명 시크릿
    pub jwt_secret: Option<String>,
    /// 토큰 유효 기간 (일)
    pub token_ttl_days: i64,
    /// 시작 시 보장할 관리자 계정 이름
    pub admin_username: String,
    /// 관리자 계정 최초 비밀번호
    pub admin_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_days: 7,
            admin_username: "admin".to_string(),
            admin_password: None,
        }
    }
}

impl AuthConfig {
    /// 토큰 서명 시크릿을 결정합니다.
    ///
    /// 운영 환경에서 시크릿이 없으면 시작을 중단해야 하는 설정 에러입니다.
    pub fn jwt_secret(&self, environment: Environment) -> PortfolioResult<String> {
        resolve_secret(
            self.jwt_secret.as_deref(),
            environment,
            "JWT_SECRET",
            DEV_JWT_SECRET,
        )
    }

    /// 관리자 최초 비밀번호를 결정합니다.
    pub fn admin_password(&self, environment: Environment) -> PortfolioResult<String> {
        resolve_secret(
            self.admin_password.as_deref(),
            environment,
            "ADMIN_PASSWORD",
            DEV_ADMIN_PASSWORD,
        )
    }
}

fn resolve_secret(
    value: Option<&str>,
    environment: Environment,
    name: &str,
    dev_default: &str,
) -> PortfolioResult<String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Ok(v.to_string()),
        None if environment.is_production() => Err(PortfolioError::Config(format!(
            "{} environment variable is required in production",
            name
        ))),
        None => {
            tracing::warn!(
                variable = name,
                "{} not set, using development default (INSECURE)",
                name
            );
            Ok(dev_default.to_string())
        }
    }
}

/// 문서 업로드 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// 업로드 파일 저장 디렉터리
    pub dir: PathBuf,
    /// 업로드 파일 공개 URL 접두사
    pub public_prefix: String,
    /// 최대 업로드 크기 (바이트)
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            public_prefix: "/uploads".to_string(),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// 계정 알림 메일 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MailConfig {
    /// SMTP 릴레이 호스트
    pub smtp_host: String,
    /// SMTP 계정
    pub smtp_username: Option<String>,
    /// SMTP 비밀번호
    pub smtp_password: Option<String>,
    /// 발신 주소 (없으면 SMTP 계정 사용)
    pub from_address: Option<String>,
    /// 메일에 안내할 고객 포털 로그인 URL
    pub portal_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_username: None,
            smtp_password: None,
            from_address: None,
            portal_url: "http://localhost:5000/client-login".to_string(),
        }
    }
}

impl MailConfig {
    /// SMTP 자격증명이 모두 설정되었는지 확인합니다.
    pub fn has_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.smtp_username) && present(&self.smtp_password)
    }
}

/// GitHub 저장소 목록 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GithubConfig {
    /// 저장소를 나열할 GitHub 사용자
    pub username: Option<String>,
    /// GitHub REST API 기본 URL
    pub api_base: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            username: None,
            api_base: "https://api.github.com".to_string(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 필터
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "portfolio_api=info,tower_http=info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 기본 경로와 프로세스 환경 변수에서 설정을 로드합니다.
    pub fn load() -> PortfolioResult<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH), std::env::vars().collect())
    }

    /// 지정한 파일과 환경 변수 맵에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 건너뜁니다.
    pub fn load_from(path: &Path, vars: HashMap<String, String>) -> PortfolioResult<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            );

        for (var, key) in ENV_ALIASES {
            if let Some(value) = vars.get(*var).filter(|v| !v.is_empty()) {
                builder = builder.set_override(*key, value.as_str())?;
            }
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 값 범위 검증.
    pub fn validate(&self) -> PortfolioResult<()> {
        if self.auth.token_ttl_days <= 0 {
            return Err(PortfolioError::Config(
                "auth.token_ttl_days must be positive".to_string(),
            ));
        }
        if self.uploads.max_bytes == 0 {
            return Err(PortfolioError::Config(
                "uploads.max_bytes must be positive".to_string(),
            ));
        }
        let prefix = self.uploads.public_prefix.trim_end_matches('/');
        if !prefix.starts_with('/') || prefix.len() < 2 {
            return Err(PortfolioError::Config(
                "uploads.public_prefix must be an absolute path such as /uploads".to_string(),
            ));
        }
        if self.environment.is_production() && self.database.url.is_none() {
            return Err(PortfolioError::Config(
                "DATABASE_URL environment variable is required in production".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn missing_file() -> &'static Path {
        Path::new("config/does-not-exist.toml")
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = AppConfig::load_from(missing_file(), HashMap::new()).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.token_ttl_days, 7);
        assert_eq!(config.auth.admin_username, "admin");
        assert_eq!(config.uploads.max_bytes, 5 * 1024 * 1024);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_alias_variables_override() {
        let config = AppConfig::load_from(
            missing_file(),
            vars(&[
                ("PORT", "8080"),
                ("JWT_SECRET", "s3cret"),
                ("ADMIN_USERNAME", "owner"),
                ("GITHUB_USERNAME", "octocat"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.auth.admin_username, "owner");
        assert_eq!(config.github.username.as_deref(), Some("octocat"));
    }

    #[test]
    fn test_prefixed_variables_override() {
        let config = AppConfig::load_from(
            missing_file(),
            vars(&[("PORTFOLIO__SERVER__HOST", "0.0.0.0")]),
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_production_requires_database_url() {
        let result = AppConfig::load_from(missing_file(), vars(&[("APP_ENV", "production")]));
        assert!(matches!(result, Err(PortfolioError::Config(_))));
    }

    #[test]
    fn test_upload_prefix_must_be_absolute() {
        let mut config = AppConfig::default();
        config.uploads.public_prefix = "/".to_string();
        assert!(config.validate().is_err());

        config.uploads.public_prefix = "files".to_string();
        assert!(config.validate().is_err());

        config.uploads.public_prefix = "/files/".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_jwt_secret_resolution() {
        let auth = AuthConfig::default();

        assert_eq!(
            auth.jwt_secret(Environment::Development).unwrap(),
            DEV_JWT_SECRET
        );
        assert!(matches!(
            auth.jwt_secret(Environment::Production),
            Err(PortfolioError::Config(_))
        ));

        let configured = AuthConfig {
            jwt_secret: Some("prod-secret".to_string()),
            ..Default::default()
        };
        assert_eq!(
            configured.jwt_secret(Environment::Production).unwrap(),
            "prod-secret"
        );
    }

    #[test]
    fn test_blank_secret_treated_as_missing() {
        let auth = AuthConfig {
            admin_password: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(auth.admin_password(Environment::Production).is_err());
    }

    #[test]
    fn test_mail_credentials() {
        let mut mail = MailConfig::default();
        assert!(!mail.has_credentials());

        mail.smtp_username = Some("me@example.com".to_string());
        mail.smtp_password = Some(String::new());
        assert!(!mail.has_credentials());

        mail.smtp_password = Some("app-password".to_string());
        assert!(mail.has_credentials());
    }
}
