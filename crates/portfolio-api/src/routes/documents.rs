//! 문서 교환.
//!
//! - `POST /api/documents` - 이미 공개된 파일의 메타데이터 등록
//! - `GET /api/documents?projectId=` - 프로젝트 문서 목록
//! - `POST /api/upload-document` - multipart 업로드 (`file`, `projectId`, `description`)
//! - `GET /api/projects/{id}/documents` - 프로젝트 문서 목록
//!
//! 업로드가 거부되면 파일도 문서 레코드도 남지 않습니다.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use portfolio_core::{Document, NewDocument, Permission};
use tracing::{error, info, warn};
use validator::Validate;

use super::types::{CreateDocumentRequest, DocumentQuery};
use crate::auth::{require_permission, AuthUser, Identity};
use crate::error::{ApiError, ApiErrorResponse, ApiResult, ApiSuccess};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::metrics::record_upload;
use crate::services::authorize_project;
use crate::state::AppState;
use crate::upload::{UploadPolicy, UploadRejection};

/// multipart 본문에서 읽은 업로드.
#[derive(Debug)]
struct UploadForm {
    project_id: i32,
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
    description: Option<String>,
}

fn multipart_rejection(err: MultipartError, policy: &UploadPolicy) -> UploadRejection {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadRejection::TooLarge {
            size: policy.max_bytes() + 1,
            max: policy.max_bytes(),
        }
    } else {
        UploadRejection::Malformed(err.body_text())
    }
}

/// multipart 필드를 읽으며 타입과 크기를 검사합니다.
///
/// 파일 타입은 본문을 읽기 전에, 크기는 청크를 누적하며 검사합니다.
async fn read_upload_form(
    mut multipart: Multipart,
    policy: &UploadPolicy,
) -> Result<UploadForm, UploadRejection> {
    let mut project_id = None;
    let mut description = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_rejection(e, policy))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let mime = policy.check_type(&file_name, field.content_type())?;

                let mut bytes = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| multipart_rejection(e, policy))?
                {
                    policy.check_size(bytes.len() + chunk.len())?;
                    bytes.extend_from_slice(&chunk);
                }
                file = Some((file_name, mime, bytes));
            }
            Some("projectId") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_rejection(e, policy))?;
                let id = text.trim().parse::<i32>().map_err(|_| {
                    UploadRejection::Malformed("projectId must be an integer".to_string())
                })?;
                project_id = Some(id);
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_rejection(e, policy))?;
                description = Some(text.trim().to_string()).filter(|d| !d.is_empty());
            }
            _ => {}
        }
    }

    let (file_name, mime, bytes) = file.ok_or(UploadRejection::MissingFile)?;
    let project_id = project_id.ok_or(UploadRejection::MissingField("projectId"))?;

    Ok(UploadForm {
        project_id,
        file_name,
        mime,
        bytes,
        description,
    })
}

/// 문서 메타데이터 등록.
#[utoipa::path(
    post,
    path = "/api/documents",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "등록 완료", body = Document),
        (status = 403, description = "프로젝트 접근 불가", body = ApiErrorResponse),
        (status = 404, description = "프로젝트 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn create_document(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    ApiJson(request): ApiJson<CreateDocumentRequest>,
) -> ApiResult<(StatusCode, Json<ApiSuccess<Document>>)> {
    require_permission(Permission::ExchangeDocuments, &identity)?;
    request.validate()?;

    let project = authorize_project(state.storage.as_ref(), &identity, request.project_id).await?;

    let document = state
        .storage
        .create_document(NewDocument {
            project_id: project.id,
            file_name: request.file_name,
            file_type: request.file_type,
            file_url: request.file_url,
            uploaded_by: identity.id,
            uploader_role: identity.role,
            description: request.description.filter(|d| !d.trim().is_empty()),
        })
        .await?;

    info!(document_id = document.id, project_id = project.id, "Document registered");
    Ok(ApiSuccess::created("Document uploaded successfully", document))
}

async fn project_documents(
    state: &AppState,
    identity: &Identity,
    project_id: i32,
) -> ApiResult<Vec<Document>> {
    require_permission(Permission::ExchangeDocuments, identity)?;
    let project = authorize_project(state.storage.as_ref(), identity, project_id).await?;
    Ok(state.storage.list_documents_by_project(project.id).await?)
}

/// 프로젝트 문서 목록 (쿼리 형식).
#[utoipa::path(
    get,
    path = "/api/documents",
    params(("projectId" = i32, Query, description = "프로젝트 ID")),
    responses(
        (status = 200, description = "문서 목록", body = [Document]),
        (status = 400, description = "projectId 누락", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    ApiQuery(query): ApiQuery<DocumentQuery>,
) -> ApiResult<Json<Vec<Document>>> {
    let project_id = query
        .project_id
        .ok_or_else(|| ApiError::validation("projectId is required"))?;
    Ok(Json(project_documents(&state, &identity, project_id).await?))
}

/// 프로젝트 문서 목록.
#[utoipa::path(
    get,
    path = "/api/projects/{id}/documents",
    params(("id" = i32, Path, description = "프로젝트 ID")),
    responses(
        (status = 200, description = "문서 목록", body = [Document]),
        (status = 403, description = "프로젝트 접근 불가", body = ApiErrorResponse),
        (status = 404, description = "프로젝트 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn list_project_documents(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    ApiPath(project_id): ApiPath<i32>,
) -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(project_documents(&state, &identity, project_id).await?))
}

/// 파일 업로드.
///
/// 크기 초과는 413, 허용되지 않는 타입은 415로 거부됩니다.
#[utoipa::path(
    post,
    path = "/api/upload-document",
    request_body(content_type = "multipart/form-data", description = "file, projectId, description"),
    responses(
        (status = 201, description = "업로드 완료", body = Document),
        (status = 413, description = "파일 크기 초과", body = ApiErrorResponse),
        (status = 415, description = "허용되지 않는 파일 타입", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiSuccess<Document>>)> {
    require_permission(Permission::ExchangeDocuments, &identity)?;

    let form = match read_upload_form(multipart, &state.upload_policy).await {
        Ok(form) => form,
        Err(rejection) => {
            record_upload(rejection.code());
            warn!(user_id = identity.id, reason = %rejection, "Upload rejected");
            return Err(rejection.into());
        }
    };

    let project = authorize_project(state.storage.as_ref(), &identity, form.project_id).await?;

    let stored = state
        .content
        .store(&form.file_name, &form.bytes)
        .await
        .map_err(|e| ApiError::internal(format!("failed to store upload: {e}")))?;

    let created = state
        .storage
        .create_document(NewDocument {
            project_id: project.id,
            file_name: form.file_name,
            file_type: form.mime,
            file_url: stored.url.clone(),
            uploaded_by: identity.id,
            uploader_role: identity.role,
            description: form.description,
        })
        .await;

    let document = match created {
        Ok(document) => document,
        Err(e) => {
            error!(file = %stored.name, error = %e, "Document insert failed, removing stored file");
            // 삭제 실패는 remove()에서 로그로 남습니다
            let _ = state.content.remove(&stored.name).await;
            return Err(e.into());
        }
    };

    record_upload("stored");
    info!(
        document_id = document.id,
        project_id = project.id,
        size = form.bytes.len(),
        "Document uploaded"
    );
    Ok(ApiSuccess::created("Document uploaded successfully", document))
}

/// 문서 라우터.
///
/// 업로드 경로의 본문 제한은 multipart 오버헤드를 감안해 파일 제한의 두 배입니다.
pub fn documents_router(policy: &UploadPolicy) -> Router<Arc<AppState>> {
    Router::new()
        .route("/documents", post(create_document).get(list_documents))
        .route(
            "/upload-document",
            post(upload_document).layer(DefaultBodyLimit::max(policy.max_bytes() * 2)),
        )
        .route("/projects/{id}/documents", get(list_project_documents))
}
