//! Portfolio API 서버 진입점.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{extract::State, http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use portfolio_core::{init_logging, AppConfig, LogConfig};
use sqlx::postgres::PgPoolOptions;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use portfolio_api::{
    create_router, metrics_layer,
    openapi::swagger_ui_router,
    repository::{MemStorage, PgStorage, Storage},
    services::{bootstrap_admin, BootstrapOutcome},
    setup_metrics_recorder, AppState, TokenService,
};
use portfolio_notification::sender_from_config;

/// CORS 레이어 생성.
///
/// `CORS_ORIGINS` 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 모든 origin을 허용합니다.
fn cors_layer() -> CorsLayer {
    let configured = std::env::var("CORS_ORIGINS")
        .ok()
        .filter(|origins| !origins.trim().is_empty());

    let allow_origin = match &configured {
        Some(origins) => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        None => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        // 와일드카드 origin과 credentials는 함께 쓸 수 없음
        .allow_credentials(configured.is_some())
        .max_age(Duration::from_secs(3600))
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn build_app(state: Arc<AppState>, metrics_handle: PrometheusHandle, timeout: Duration) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_router(state))
        .merge(swagger_ui_router())
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(cors_layer())
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 `true`를 반환합니다.
fn handle_export_openapi() -> anyhow::Result<bool> {
    use portfolio_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
        println!("{}", json);
        return Ok(true);
    }

    Ok(false)
}

/// 저장소 초기화.
///
/// `DATABASE_URL`이 있으면 PostgreSQL에 연결하고 마이그레이션을 적용합니다.
/// 개발 환경에서 없으면 인메모리 저장소를 사용합니다 (운영 환경은 설정 검증에서 거부됨).
async fn connect_storage(config: &AppConfig) -> anyhow::Result<Arc<dyn Storage>> {
    let Some(url) = config.database.url.as_deref() else {
        warn!("DATABASE_URL not set, using in-memory storage (data is lost on restart)");
        return Ok(Arc::new(MemStorage::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(url)
        .await
        .context("failed to connect to PostgreSQL")?;

    let storage = PgStorage::new(pool);
    storage
        .migrate()
        .await
        .context("failed to apply database migrations")?;
    info!("Database connected and migrations applied");

    Ok(Arc::new(storage))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    if handle_export_openapi()? {
        return Ok(());
    }

    let config = AppConfig::load().context("failed to load configuration")?;

    init_logging(LogConfig::from_settings(&config.logging))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    info!(environment = %config.environment, "Starting Portfolio API server...");

    let metrics_handle = setup_metrics_recorder().context("failed to install metrics recorder")?;
    info!("Prometheus metrics recorder initialized");

    // 운영 환경에서 비밀값이 없으면 여기서 종료
    let jwt_secret = config.auth.jwt_secret(config.environment)?;
    let admin_password = config.auth.admin_password(config.environment)?;

    let storage = connect_storage(&config).await?;

    match bootstrap_admin(storage.as_ref(), &config.auth.admin_username, &admin_password)
        .await
        .context("failed to bootstrap admin account")?
    {
        BootstrapOutcome::Created => {
            info!(username = %config.auth.admin_username, "Admin account bootstrapped")
        }
        BootstrapOutcome::Existing => {
            info!(username = %config.auth.admin_username, "Admin account already exists")
        }
    }

    let state = AppState::new(
        storage,
        TokenService::new(&jwt_secret, config.auth.token_ttl_days),
    )
    .with_config(&config)
    .with_notifier(sender_from_config(&config.mail));

    state
        .content
        .ensure_root()
        .await
        .with_context(|| format!("failed to create upload directory {}", state.content.root().display()))?;

    let state = Arc::new(state);
    info!(
        version = %state.version,
        storage = state.storage.backend(),
        notifications = state.notifier.name(),
        "Application state initialized"
    );

    let app = build_app(
        state,
        metrics_handle,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기 (Ctrl+C 또는 SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
