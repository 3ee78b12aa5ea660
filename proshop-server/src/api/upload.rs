//! Image upload proxy
//!
//! POST /api/upload-image: base64 JSON body is decoded and sent to R2 as a SigV4-signed PUT
//!
//! Objects are stored at `product-images/{brand}/{filename}`. Uploading the
//! same filename again overwrites the object.

use axum::{Router, extract::State, routing::post};
use base64::Engine;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use super::{ApiJson, ApiResult, ok};
use crate::state::AppState;
use crate::storage::product_image_key;

/// Maximum decoded file size (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

pub fn router() -> Router<AppState> {
    Router::new().route("/api/upload-image", post(upload_image))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageRequest {
    pub brand: Option<String>,
    pub filename: Option<String>,
    /// Base64 payload, optionally as a `data:<mime>;base64,` URL
    pub file_data: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub url: String,
    pub key: String,
}

/// Split an optional `data:<mime>;base64,` prefix from the payload
fn split_data_url(data: &str) -> (Option<&str>, &str) {
    if let Some(rest) = data.strip_prefix("data:")
        && let Some((meta, payload)) = rest.split_once(',')
    {
        let mime = meta
            .strip_suffix(";base64")
            .unwrap_or(meta)
            .trim();
        return ((!mime.is_empty()).then_some(mime), payload);
    }
    (None, data)
}

/// Decode the base64 body. Returns the bytes and the MIME type from a data
/// URL prefix, if there was one.
pub fn decode_file_data(data: &str) -> Result<(Vec<u8>, Option<String>), AppError> {
    let (mime, payload) = split_data_url(data.trim());
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| {
            AppError::new(ErrorCode::InvalidFileEncoding).with_detail("reason", e.to_string())
        })?;

    if bytes.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if bytes.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large: {} bytes (max {})",
                bytes.len(),
                MAX_FILE_SIZE
            ),
        ));
    }
    Ok((bytes, mime.map(str::to_string)))
}

/// Explicit type, then the data URL type, then a guess from the extension
fn resolve_content_type(explicit: Option<&str>, from_data_url: Option<String>, filename: &str) -> String {
    shared::util::non_empty(explicit)
        .map(str::to_string)
        .or(from_data_url)
        .or_else(|| mime_guess::from_path(filename).first().map(|m| m.to_string()))
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}

/// POST /api/upload-image
pub async fn upload_image(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UploadImageRequest>,
) -> ApiResult<UploadImageResponse> {
    let filename = shared::util::non_empty(req.filename.as_deref())
        .ok_or_else(|| AppError::new(ErrorCode::NoFilename).with_detail("field", "filename"))?;
    let file_data = req
        .file_data
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::NoFileProvided).with_detail("field", "fileData"))?;

    let (bytes, data_url_type) = decode_file_data(file_data)?;
    let content_type = resolve_content_type(req.content_type.as_deref(), data_url_type, filename);

    let key = product_image_key(req.brand.as_deref(), filename)
        .ok_or_else(|| AppError::new(ErrorCode::NoFilename).with_detail("field", "filename"))?;

    state
        .storage
        .put_object(&key, &content_type, bytes)
        .await
        .map_err(AppError::from)?;

    let url = state.storage.public_url(&key);
    tracing::info!(key = %key, url = %url, "Product image uploaded");

    ok(UploadImageResponse { url, key })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        let (bytes, mime) = decode_file_data("ZmFrZSBwbmcgYnl0ZXM=").unwrap();
        assert_eq!(bytes, b"fake png bytes");
        assert!(mime.is_none());
    }

    #[test]
    fn test_decode_data_url() {
        let (bytes, mime) = decode_file_data("data:image/webp;base64,ZmFrZSBwbmcgYnl0ZXM=").unwrap();
        assert_eq!(bytes, b"fake png bytes");
        assert_eq!(mime.as_deref(), Some("image/webp"));
    }

    #[test]
    fn test_decode_ignores_line_breaks() {
        let (bytes, _) = decode_file_data("ZmFrZSBw\nbmcgYnl0\r\nZXM=").unwrap();
        assert_eq!(bytes, b"fake png bytes");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_file_data("not base64!!").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFileEncoding);
    }

    #[test]
    fn test_decode_rejects_empty_payload() {
        let err = decode_file_data("data:image/png;base64,").unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyFile);
    }

    #[test]
    fn test_decode_rejects_oversized() {
        let big = base64::engine::general_purpose::STANDARD.encode(vec![0u8; MAX_FILE_SIZE + 1]);
        let err = decode_file_data(&big).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);
    }

    #[test]
    fn test_content_type_resolution() {
        assert_eq!(
            resolve_content_type(Some("image/png"), Some("image/webp".into()), "a.jpg"),
            "image/png"
        );
        assert_eq!(
            resolve_content_type(None, Some("image/webp".into()), "a.jpg"),
            "image/webp"
        );
        assert_eq!(resolve_content_type(Some(" "), None, "a.jpg"), "image/jpeg");
        assert_eq!(
            resolve_content_type(None, None, "no-extension"),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_request_uses_camel_case() {
        let req: UploadImageRequest = serde_json::from_str(
            r#"{"brand":"ping","filename":"g430.png","fileData":"AAAA","contentType":"image/png"}"#,
        )
        .unwrap();
        assert_eq!(req.file_data.as_deref(), Some("AAAA"));
        assert_eq!(req.content_type.as_deref(), Some("image/png"));
    }
}
