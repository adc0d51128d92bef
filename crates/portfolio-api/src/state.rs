//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 `Arc`로 래핑되어 Axum의 State extractor로 주입됩니다.

use std::sync::Arc;
use std::time::Duration;

use portfolio_core::{AppConfig, GithubConfig};
use portfolio_notification::{DisabledSender, NotificationSender};

use crate::auth::TokenService;
use crate::repository::Storage;
use crate::upload::{ContentStore, UploadPolicy};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 자격증명 및 도메인 저장소
    pub storage: Arc<dyn Storage>,

    /// 토큰 발급/검증
    pub tokens: TokenService,

    /// 계정 생성 알림 채널
    pub notifier: Arc<dyn NotificationSender>,

    /// 업로드 파일 저장소
    pub content: ContentStore,

    /// 업로드 크기/타입 정책
    pub upload_policy: UploadPolicy,

    /// GitHub 저장소 목록 설정
    pub github: GithubConfig,

    /// 외부 API 호출용 HTTP 클라이언트
    pub http: reqwest::Client,

    /// 알림 메일에 안내할 고객 포털 URL
    pub portal_url: String,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("storage", &self.storage.backend())
            .field("notifier", &self.notifier.name())
            .field("content", &self.content)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// 알림은 비활성, 업로드 설정은 기본값으로 시작합니다.
    pub fn new(storage: Arc<dyn Storage>, tokens: TokenService) -> Self {
        let defaults = AppConfig::default();

        Self {
            storage,
            tokens,
            notifier: Arc::new(DisabledSender),
            content: ContentStore::from_config(&defaults.uploads),
            upload_policy: UploadPolicy::from_config(&defaults.uploads),
            github: defaults.github,
            http: build_http_client(),
            portal_url: defaults.mail.portal_url,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 설정에서 업로드/GitHub/포털 URL을 반영합니다.
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.content = ContentStore::from_config(&config.uploads);
        self.upload_policy = UploadPolicy::from_config(&config.uploads);
        self.github = config.github.clone();
        self.portal_url = config.mail.portal_url.clone();
        self
    }

    /// 알림 전송기 설정.
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSender>) -> Self {
        self.notifier = notifier;
        self
    }

    /// 업로드 저장소 설정.
    pub fn with_content_store(mut self, content: ContentStore) -> Self {
        self.content = content;
        self
    }

    /// GitHub 설정.
    pub fn with_github(mut self, github: GithubConfig) -> Self {
        self.github = github;
        self
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}

fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("portfolio-api/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_default()
}

/// 테스트용 JWT 서명 키.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

/// 테스트용 AppState 생성 헬퍼.
///
/// 인메모리 저장소와 비활성 알림을 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    create_test_state_with(Arc::new(crate::repository::MemStorage::new()))
}

/// 주어진 인메모리 저장소로 테스트용 AppState를 생성합니다.
///
/// 테스트에서 저장소 상태를 직접 확인할 때 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state_with(storage: Arc<crate::repository::MemStorage>) -> AppState {
    AppState::new(storage, TokenService::new(TEST_JWT_SECRET, 7))
}
