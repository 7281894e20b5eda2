//! Ticket copy uploads kept in a local directory.

use api_types::upload::{UploadNew, UploadResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::path::{Path as FsPath, PathBuf};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{Caller, ServerState},
};

const MAX_NAME_CHARS: usize = 100;
const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Stores uploaded files under `dir` and serves them from `public_url`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadStore {
    dir: PathBuf,
    public_url: String,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, public_url: &str) -> Self {
        Self {
            dir: dir.into(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &FsPath {
        &self.dir
    }

    /// Write `content` under a random prefix and return the stored name.
    pub async fn save(&self, file_name: &str, content: &[u8]) -> Result<String, ServerError> {
        let stored = format!("{}-{}", Uuid::new_v4().simple(), sanitize_file_name(file_name));
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&stored), content).await?;
        Ok(stored)
    }

    pub async fn load(&self, stored: &str) -> Result<Vec<u8>, ServerError> {
        if stored.is_empty() || sanitize_file_name(stored) != stored {
            return Err(ServerError::NotFound(format!("upload {stored}")));
        }
        match tokio::fs::read(self.dir.join(stored)).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(ServerError::NotFound(format!("upload {stored}")))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn url_for(&self, stored: &str) -> String {
        format!("{}/{stored}", self.public_url)
    }
}

/// Keep the last path component and replace anything outside `[A-Za-z0-9._-]`.
pub(crate) fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Decode standard base64, tolerating a `data:<mime>;base64,` prefix.
pub(crate) fn decode_content(content: &str) -> Result<Vec<u8>, ServerError> {
    let payload = match content.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => content,
    };
    STANDARD
        .decode(payload.trim())
        .map_err(|err| ServerError::Generic(format!("invalid base64 content: {err}")))
}

fn content_type(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

pub async fn upload(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<UploadNew>,
) -> Result<(StatusCode, Json<UploadResponse>), ServerError> {
    let content = decode_content(&payload.content_base64)?;
    if content.is_empty() {
        return Err(ServerError::Generic("file is empty".to_string()));
    }
    if content.len() > MAX_FILE_BYTES {
        return Err(ServerError::Generic("file is too large".to_string()));
    }

    let stored = state.uploads.save(&payload.file_name, &content).await?;
    tracing::info!(
        "{} uploaded {stored} ({} bytes)",
        caller.user.username,
        content.len()
    );
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            url: state.uploads.url_for(&stored),
            file_name: payload.file_name,
        }),
    ))
}

pub async fn download(
    Extension(_caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let bytes = state.uploads.load(&name).await?;
    Ok(([(header::CONTENT_TYPE, content_type(&name))], bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_lose_directories_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\tickets\\copy 1.pdf"), "copy_1.pdf");
        assert_eq!(sanitize_file_name("..."), "file");
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name("ticket#7.PNG"), "ticket_7.PNG");
    }

    #[test]
    fn data_url_prefix_is_accepted() {
        assert_eq!(decode_content("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(
            decode_content("data:application/pdf;base64,aGVsbG8=").unwrap(),
            b"hello"
        );
        assert!(matches!(
            decode_content("not base64!"),
            Err(ServerError::Generic(_))
        ));
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type("a.PDF"), "application/pdf");
        assert_eq!(content_type("a.jpeg"), "image/jpeg");
        assert_eq!(content_type("noext"), "application/octet-stream");
    }

    #[test]
    fn url_joins_public_prefix() {
        let store = UploadStore::new("uploads", "/uploads/");
        assert_eq!(store.url_for("abc-file.pdf"), "/uploads/abc-file.pdf");
    }

    #[tokio::test]
    async fn saved_file_can_be_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("nested"), "/uploads");

        let stored = store.save("copy.pdf", b"%PDF-1.4").await.unwrap();
        assert!(stored.ends_with("-copy.pdf"));
        assert_eq!(store.load(&stored).await.unwrap(), b"%PDF-1.4");
        assert!(matches!(
            store.load("../secret").await,
            Err(ServerError::NotFound(_))
        ));
        assert!(dir.path().join("nested").join(&stored).is_file());
    }
}
