//! HTTP 요청 metrics middleware.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::metrics::{
    normalize_path, record_http_duration, record_http_request, record_http_response,
};

/// 스크레이프 요청은 집계하지 않습니다.
const SCRAPE_PATH: &str = "/metrics";

/// 요청의 경로 라벨.
///
/// 라우터가 매칭한 템플릿(`/api/projects/{id}`)을 우선 쓰고,
/// 매칭되지 않은 요청은 숫자 세그먼트를 `:id`로 바꾼 경로를 씁니다.
fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| normalize_path(request.uri().path()))
}

/// HTTP 메트릭을 수집하는 미들웨어 레이어.
///
/// `http_requests_total`, `http_responses_total`, `http_request_duration_seconds`를
/// method/path(/status) 라벨로 기록합니다.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    if request.uri().path() == SCRAPE_PATH {
        return next.run(request).await;
    }

    let started = Instant::now();
    let method = request.method().as_str().to_owned();
    let route = route_label(&request);

    record_http_request(&method, &route);
    let response = next.run(request).await;

    record_http_response(&method, &route, response.status().as_u16());
    record_http_duration(&method, &route, started.elapsed().as_secs_f64());

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::StatusCode,
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    #[test]
    fn test_route_label_falls_back_to_normalized_path() {
        let request = Request::builder()
            .uri("/api/messages/42/read")
            .body(Body::empty())
            .unwrap();

        assert_eq!(route_label(&request), "/api/messages/:id/read");
    }

    #[tokio::test]
    async fn test_layer_passes_matched_and_unmatched_requests() {
        let app = Router::new()
            .route("/api/projects/{id}/documents", get(|| async { "[]" }))
            .route(SCRAPE_PATH, get(|| async { "# metrics" }))
            .layer(middleware::from_fn(metrics_layer));

        for (uri, expected) in [
            ("/api/projects/17/documents", StatusCode::OK),
            ("/metrics", StatusCode::OK),
            ("/api/nowhere/5", StatusCode::NOT_FOUND),
        ] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), expected, "{uri}");
        }
    }
}
