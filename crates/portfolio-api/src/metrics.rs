//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 계정/업로드 관련 비즈니스 메트릭을 수집하고 `/metrics`로 노출합니다.

use metrics::counter;
use metrics::histogram;
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설치하고 렌더링용 핸들을 반환합니다.
///
/// 레코더가 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 비즈니스 메트릭 헬퍼 함수
// ============================================================================

/// 로그인 시도 결과 ("success" | "invalid_credentials").
pub fn record_login(outcome: &'static str) {
    counter!("portfolio_logins_total", "outcome" => outcome).increment(1);
}

/// 온보딩(고객+프로젝트) 제출 수.
pub fn record_onboarding() {
    counter!("portfolio_onboarding_submissions_total").increment(1);
}

/// 문의 접수 수.
pub fn record_contact() {
    counter!("portfolio_contact_messages_total").increment(1);
}

/// 업로드 결과 ("stored" 또는 거부 코드).
pub fn record_upload(outcome: &'static str) {
    counter!("portfolio_uploads_total", "outcome" => outcome).increment(1);
}

/// 계정 알림 전송 결과 ("sent" | "skipped" | "failed").
pub fn record_notification(outcome: &'static str) {
    counter!("portfolio_account_notifications_total", "outcome" => outcome).increment(1);
}

// ============================================================================
// 경로 정규화 유틸리티
// ============================================================================

/// 경로에서 숫자 ID 세그먼트를 정규화합니다.
///
/// 예: `/api/projects/42/messages` → `/api/projects/:id/messages`
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric() {
        assert_eq!(
            normalize_path("/api/projects/42/messages"),
            "/api/projects/:id/messages"
        );
    }

    #[test]
    fn test_normalize_path_no_params() {
        assert_eq!(normalize_path("/api/admin/clients"), "/api/admin/clients");
    }

    #[test]
    fn test_normalize_path_keeps_mixed_segments() {
        assert_eq!(
            normalize_path("/uploads/3f2a.pdf"),
            "/uploads/3f2a.pdf"
        );
        assert_eq!(normalize_path("/api/messages/7/read"), "/api/messages/:id/read");
    }
}
