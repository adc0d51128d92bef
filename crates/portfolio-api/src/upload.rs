//! 문서 업로드 경로.
//!
//! - [`UploadPolicy`]: 크기 제한과 MIME 허용 목록 검사
//! - [`ContentStore`]: 업로드된 파일을 `<uuid>.<ext>` 이름으로 저장하고 공개 URL을 만듭니다
//!
//! 거부된 파일은 디스크에도, 문서 테이블에도 남지 않습니다.

use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use portfolio_core::UploadConfig;
use tracing::{debug, warn};

/// 허용되는 MIME 타입.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "text/plain",
    "text/csv",
];

const GENERIC_MIME: &str = "application/octet-stream";

/// 업로드 거부 사유.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("File too large: the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("File type {0} is not allowed")]
    UnsupportedType(String),

    #[error("No file uploaded")]
    MissingFile,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Malformed upload: {0}")]
    Malformed(String),
}

impl UploadRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadRejection::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadRejection::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadRejection::MissingFile
            | UploadRejection::MissingField(_)
            | UploadRejection::Malformed(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            UploadRejection::TooLarge { .. } => "FILE_TOO_LARGE",
            UploadRejection::UnsupportedType(_) => "UNSUPPORTED_FILE_TYPE",
            UploadRejection::MissingFile => "MISSING_FILE",
            UploadRejection::MissingField(_) => "MISSING_FIELD",
            UploadRejection::Malformed(_) => "MALFORMED_UPLOAD",
        }
    }
}

/// 업로드 검사 정책.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_bytes: usize,
    allowed: &'static [&'static str],
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(UploadConfig::default().max_bytes)
    }
}

impl UploadPolicy {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            allowed: ALLOWED_MIME_TYPES,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.max_bytes)
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn is_allowed(&self, mime: &str) -> bool {
        self.allowed.contains(&mime)
    }

    /// 크기 검사. 스트리밍 중 누적 크기로도 호출합니다.
    pub fn check_size(&self, size: usize) -> Result<(), UploadRejection> {
        if size > self.max_bytes {
            return Err(UploadRejection::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }

    /// 파일 타입을 결정하고 허용 목록을 검사합니다.
    ///
    /// 선언된 content type이 없거나 `application/octet-stream`이면 확장자로 추론합니다.
    pub fn check_type(
        &self,
        file_name: &str,
        declared: Option<&str>,
    ) -> Result<String, UploadRejection> {
        let mime = resolve_mime(file_name, declared);
        if self.is_allowed(&mime) {
            Ok(mime)
        } else {
            Err(UploadRejection::UnsupportedType(mime))
        }
    }
}

/// 선언된 content type을 정규화하거나 확장자로 MIME 타입을 추론합니다.
pub fn resolve_mime(file_name: &str, declared: Option<&str>) -> String {
    let declared = declared
        .map(|d| d.split(';').next().unwrap_or(d).trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty() && d != GENERIC_MIME);

    match declared {
        Some(mime) => mime,
        None => extension_of(file_name)
            .and_then(|ext| mime_from_extension(&ext))
            .unwrap_or(GENERIC_MIME)
            .to_string(),
    }
}

fn mime_from_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" => "text/plain",
        "csv" => "text/csv",
        _ => return None,
    };
    Some(mime)
}

/// 소문자 영숫자 확장자만 인정합니다.
fn extension_of(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// 저장된 파일 정보.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// 생성된 파일명 (`<uuid>.<ext>`)
    pub name: String,
    /// 공개 URL
    pub url: String,
}

/// 업로드 파일 저장소.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    public_prefix: String,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        let prefix = public_prefix.into();
        Self {
            root: root.into(),
            public_prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.dir.clone(), config.public_prefix.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 공개 URL 접두사 (끝의 `/` 제외).
    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// 저장 디렉터리가 없으면 생성합니다.
    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// 원본 파일명의 확장자를 유지한 채 고유 이름으로 저장합니다.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<StoredFile> {
        self.ensure_root().await?;

        let name = match extension_of(original_name) {
            Some(ext) => format!("{}.{}", uuid::Uuid::new_v4(), ext),
            None => uuid::Uuid::new_v4().to_string(),
        };
        tokio::fs::write(self.root.join(&name), bytes).await?;

        debug!(file = %name, size = bytes.len(), "Upload stored");

        Ok(StoredFile {
            url: format!("{}/{}", self.public_prefix, name),
            name,
        })
    }

    /// 저장된 파일을 삭제합니다.
    pub async fn remove(&self, name: &str) -> std::io::Result<()> {
        let path = self.resolve(name).ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid stored file name")
        })?;

        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(file = %name, error = %e, "Failed to remove stored upload");
            return Err(e);
        }
        Ok(())
    }

    /// 저장소 내부 경로로 변환합니다. 경로 구분자나 `..`가 있으면 `None`.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return None;
        }
        Some(self.root.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limit() {
        let policy = UploadPolicy::new(5 * 1024 * 1024);

        assert!(policy.check_size(5 * 1024 * 1024).is_ok());
        assert_eq!(
            policy.check_size(6 * 1024 * 1024),
            Err(UploadRejection::TooLarge {
                size: 6 * 1024 * 1024,
                max: 5 * 1024 * 1024
            })
        );
    }

    #[test]
    fn test_type_inference() {
        assert_eq!(resolve_mime("report.PDF", None), "application/pdf");
        assert_eq!(
            resolve_mime("photo.jpg", Some("application/octet-stream")),
            "image/jpeg"
        );
        assert_eq!(
            resolve_mime("notes.txt", Some("text/plain; charset=utf-8")),
            "text/plain"
        );
        assert_eq!(resolve_mime("setup.exe", None), GENERIC_MIME);
    }

    #[test]
    fn test_executable_rejected() {
        let policy = UploadPolicy::default();

        let err = policy.check_type("setup.exe", None).unwrap_err();
        assert!(matches!(err, UploadRejection::UnsupportedType(_)));
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let err = policy
            .check_type("setup.exe", Some("application/x-msdownload"))
            .unwrap_err();
        assert_eq!(
            err,
            UploadRejection::UnsupportedType("application/x-msdownload".into())
        );

        assert_eq!(
            policy.check_type("brief.docx", None).unwrap(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[test]
    fn test_rejections_are_distinct() {
        let too_large = UploadRejection::TooLarge { size: 2, max: 1 };
        let bad_type = UploadRejection::UnsupportedType("application/x-msdownload".into());

        assert_ne!(too_large.status(), bad_type.status());
        assert_ne!(too_large.code(), bad_type.code());
        assert_ne!(too_large.to_string(), bad_type.to_string());
    }

    #[test]
    fn test_resolve_refuses_traversal() {
        let store = ContentStore::new("/srv/uploads", "/uploads/");

        assert_eq!(store.public_prefix(), "/uploads");
        assert!(store.resolve("../etc/passwd").is_none());
        assert!(store.resolve("a/b.pdf").is_none());
        assert!(store.resolve("").is_none());
        assert_eq!(
            store.resolve("abc.pdf"),
            Some(PathBuf::from("/srv/uploads/abc.pdf"))
        );
    }

    #[tokio::test]
    async fn test_store_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::new(dir.path().join("files"), "/uploads");

        let stored = store.store("Brief.PDF", b"%PDF-1.4").await.unwrap();
        assert!(stored.name.ends_with(".pdf"));
        assert_eq!(stored.url, format!("/uploads/{}", stored.name));

        let path = dir.path().join("files").join(&stored.name);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.4");

        store.remove(&stored.name).await.unwrap();
        assert!(!path.exists());
    }
}
