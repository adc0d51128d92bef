//! 전체 라우터를 대상으로 한 API 흐름 테스트.
//!
//! 인메모리 저장소 위에서 공개 폼, 로그인, 역할 범위, 업로드 거부를 검증합니다.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use portfolio_api::{
    create_router,
    services::{bootstrap_admin, BootstrapOutcome},
    upload::ContentStore,
    AppState, MemStorage, Storage, TokenService,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret-with-enough-length";
const ADMIN_PASSWORD: &str = "admin-password-1";

struct TestApp {
    app: Router,
    storage: Arc<MemStorage>,
    _uploads: tempfile::TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let storage = Arc::new(MemStorage::new());
        bootstrap_admin(storage.as_ref(), "admin", ADMIN_PASSWORD)
            .await
            .unwrap();

        let uploads = tempfile::tempdir().unwrap();
        let state = AppState::new(storage.clone(), TokenService::new(SECRET, 7))
            .with_content_store(ContentStore::new(uploads.path(), "/uploads"));

        Self {
            app: create_router(Arc::new(state)),
            storage,
            _uploads: uploads,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(json_request(
                "POST",
                "/api/login",
                None,
                json!({ "username": username, "password": password }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn admin_token(&self) -> String {
        self.login("admin", ADMIN_PASSWORD).await
    }

    /// 온보딩 제출 후 (client id, project id) 반환.
    async fn onboard(&self, name: &str, email: &str) -> (i64, i64) {
        let (status, body) = self
            .send(json_request(
                "POST",
                "/api/client-onboarding",
                None,
                onboarding_body(name, email),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "onboarding failed: {body}");
        (
            body["data"]["client"]["id"].as_i64().unwrap(),
            body["data"]["project"]["id"].as_i64().unwrap(),
        )
    }

    /// 고객 포털 계정을 만들고 토큰을 반환합니다.
    async fn client_token(&self, client_id: i64, username: &str) -> String {
        let admin = self.admin_token().await;
        let (status, body) = self
            .send(json_request(
                "POST",
                "/api/register-client",
                Some(&admin),
                json!({ "clientId": client_id, "username": username, "password": "client-pass" }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register-client failed: {body}");
        self.login(username, "client-pass").await
    }
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn onboarding_body(name: &str, email: &str) -> Value {
    json!({
        "fullName": name,
        "email": email,
        "phone": "555-0100",
        "projectType": "website",
        "description": "Need a 10-page site",
        "features": ["blog", "contact form"],
        "budget": "1000-3000",
        "timeline": "2-4-weeks",
        "termsAgreed": true
    })
}

fn multipart_upload(
    token: &str,
    project_id: i64,
    file_name: &str,
    content_type: &str,
    content: &[u8],
) -> Request<Body> {
    const BOUNDARY: &str = "portfolio-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"projectId\"\r\n\r\n{project_id}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload-document")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_onboarding_creates_pending_project() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/client-onboarding",
            None,
            onboarding_body("Jane Doe", "jane@x.com"),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Project request submitted successfully");
    assert_eq!(body["data"]["project"]["status"], "pending");
    assert_eq!(
        body["data"]["project"]["clientId"],
        body["data"]["client"]["id"]
    );
    assert_eq!(body["data"]["project"]["features"], json!(["blog", "contact form"]));
    assert_eq!(app.storage.client_count().await, 1);
}

#[tokio::test]
async fn test_onboarding_requires_terms() {
    let app = TestApp::new().await;
    let mut request = onboarding_body("Jane Doe", "jane@x.com");
    request["termsAgreed"] = json!(false);

    let (status, body) = app
        .send(json_request("POST", "/api/client-onboarding", None, request))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["termsAgreed"].is_array());
    assert_eq!(app.storage.client_count().await, 0);
}

#[tokio::test]
async fn test_malformed_requests_use_error_envelope() {
    let app = TestApp::new().await;
    let mut request = onboarding_body("Jane Doe", "jane@x.com");
    request.as_object_mut().unwrap().remove("fullName");

    let (status, body) = app
        .send(json_request("POST", "/api/client-onboarding", None, request))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("fullName"));
    assert_eq!(app.storage.client_count().await, 0);

    let (status, body) = app
        .send(json_request("POST", "/api/login", None, json!({ "username": "admin" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let admin = app.admin_token().await;
    let (status, body) = app.send(get("/api/admin/clients/abc", Some(&admin))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;

    let (wrong_status, wrong_body) = app
        .send(json_request(
            "POST",
            "/api/login",
            None,
            json!({ "username": "admin", "password": "not-the-password" }),
        ))
        .await;
    let (unknown_status, unknown_body) = app
        .send(json_request(
            "POST",
            "/api/login",
            None,
            json!({ "username": "nobody", "password": "not-the-password" }),
        ))
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["code"], unknown_body["code"]);
    assert_eq!(wrong_body["message"], unknown_body["message"]);
    assert_eq!(wrong_body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_then_me_returns_identity() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/login",
            None,
            json!({ "username": "admin", "password": ADMIN_PASSWORD }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "admin");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap();
    let (status, me) = app.send(get("/api/me", Some(token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["username"], "admin");
    assert_eq!(me["user"]["role"], "admin");
    assert_eq!(me["user"]["id"], body["user"]["id"]);
}

#[tokio::test]
async fn test_protected_routes_reject_bad_tokens() {
    let app = TestApp::new().await;

    let (status, body) = app.send(get("/api/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "MISSING_TOKEN");

    let (status, body) = app.send(get("/api/me", Some("not.a.token"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "INVALID_TOKEN");

    // 다른 비밀키로 서명된 토큰
    let foreign = TokenService::new("some-other-secret-with-enough-length", 7);
    let user = app
        .storage
        .get_user_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    let token = foreign.issue(&user).unwrap();
    let (status, _) = app.send(get("/api/admin/clients", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_project_listing_is_scoped_by_role() {
    let app = TestApp::new().await;
    let (jane, jane_project) = app.onboard("Jane Doe", "jane@x.com").await;
    let (_bob, bob_project) = app.onboard("Bob Stone", "bob@x.com").await;

    let admin = app.admin_token().await;
    let (status, all) = app.send(get("/api/projects", Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let client = app.client_token(jane, "jane").await;
    let (status, own) = app.send(get("/api/projects", Some(&client))).await;
    assert_eq!(status, StatusCode::OK);
    let own = own.as_array().unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0]["id"].as_i64(), Some(jane_project));

    // 다른 고객의 프로젝트 메시지는 볼 수 없음
    let (status, _) = app
        .send(get(
            &format!("/api/projects/{bob_project}/messages"),
            Some(&client),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 관리자 전용 라우트
    let (status, _) = app.send(get("/api/admin/clients", Some(&client))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_client_without_record_gets_not_found() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/register",
            Some(&admin),
            json!({ "username": "orphan", "password": "orphan-pass" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let token = app.login("orphan", "orphan-pass").await;
    let (status, body) = app.send(get("/api/projects", Some(&token))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No client record for user");
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let request = json!({ "username": "designer", "password": "secret-pass", "role": "client" });

    let (first, _) = app
        .send(json_request("POST", "/api/register", Some(&admin), request.clone()))
        .await;
    let (second, body) = app
        .send(json_request("POST", "/api/register", Some(&admin), request))
        .await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already exists");
}

#[tokio::test]
async fn test_status_update_validation_and_missing_project() {
    let app = TestApp::new().await;
    let (_, project) = app.onboard("Jane Doe", "jane@x.com").await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .send(json_request(
            "PATCH",
            "/api/admin/projects/9999/status",
            Some(&admin),
            json!({ "status": "approved" }),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Project not found");

    let (status, body) = app
        .send(json_request(
            "PATCH",
            &format!("/api/admin/projects/{project}/status"),
            Some(&admin),
            json!({}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Status is required");

    let (status, body) = app
        .send(json_request(
            "PATCH",
            &format!("/api/admin/projects/{project}/status"),
            Some(&admin),
            json!({ "status": "in-progress" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "in-progress");
}

#[tokio::test]
async fn test_messages_between_client_and_admin() {
    let app = TestApp::new().await;
    let (jane, project) = app.onboard("Jane Doe", "jane@x.com").await;
    let client = app.client_token(jane, "jane").await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/messages",
            Some(&client),
            json!({ "projectId": project, "content": "  When can we start?  " }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["content"], "When can we start?");
    assert_eq!(body["data"]["senderRole"], "client");
    let message_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .send(json_request(
            "PATCH",
            &format!("/api/messages/{message_id}/read"),
            Some(&admin),
            json!({}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isRead"], true);

    let (status, list) = app
        .send(get(&format!("/api/projects/{project}/messages"), Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(json_request(
            "PATCH",
            "/api/messages/4242/read",
            Some(&admin),
            json!({}),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_rejections_leave_nothing_behind() {
    let app = TestApp::new().await;
    let (_, project) = app.onboard("Jane Doe", "jane@x.com").await;
    let admin = app.admin_token().await;

    let oversized = vec![b'a'; 6 * 1024 * 1024];
    let (too_large, large_body) = app
        .send(multipart_upload(
            &admin,
            project,
            "brief.pdf",
            "application/pdf",
            &oversized,
        ))
        .await;

    let (bad_type, type_body) = app
        .send(multipart_upload(
            &admin,
            project,
            "setup.exe",
            "application/octet-stream",
            b"MZ",
        ))
        .await;

    assert_eq!(too_large, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(large_body["code"], "FILE_TOO_LARGE");
    assert_eq!(bad_type, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(type_body["code"], "UNSUPPORTED_FILE_TYPE");
    assert_ne!(large_body["message"], type_body["message"]);
    assert_eq!(app.storage.document_count().await, 0);
}

#[tokio::test]
async fn test_upload_stores_document() {
    let app = TestApp::new().await;
    let (jane, project) = app.onboard("Jane Doe", "jane@x.com").await;
    let client = app.client_token(jane, "jane").await;

    let (status, body) = app
        .send(multipart_upload(
            &client,
            project,
            "brief.txt",
            "text/plain",
            b"logo ideas",
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED, "upload failed: {body}");
    assert_eq!(body["data"]["fileName"], "brief.txt");
    assert_eq!(body["data"]["fileType"], "text/plain");
    assert_eq!(body["data"]["uploaderRole"], "client");
    let url = body["data"]["fileUrl"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/"));

    // 저장된 파일은 공개 경로로 제공됨
    let response = app.app.clone().oneshot(get(&url, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"logo ideas");

    let (status, list) = app
        .send(get(
            &format!("/api/documents?projectId={project}"),
            Some(&client),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_bootstrap_admin_is_idempotent() {
    let app = TestApp::new().await;
    assert_eq!(app.storage.user_count().await, 1);

    let outcome = bootstrap_admin(app.storage.as_ref(), "admin", "another-password")
        .await
        .unwrap();

    assert_eq!(outcome, BootstrapOutcome::Existing);
    assert_eq!(app.storage.user_count().await, 1);
    // 기존 비밀번호가 유지됨
    app.login("admin", ADMIN_PASSWORD).await;
}
