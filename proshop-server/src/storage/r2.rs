//! R2 object-store client
//!
//! Objects are written with a single signed PUT to
//! `{endpoint}/{bucket}/{key}`. Credentials are resolved per call so a
//! missing value is reported without any network traffic.

use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use thiserror::Error;

use super::sigv4::{self, SigningRequest};
use crate::config::StorageConfig;

/// Folder every product image lives under
const IMAGE_PREFIX: &str = "product-images";
const DEFAULT_BRAND: &str = "general";

#[derive(Debug, Error)]
pub enum StorageError {
    /// One or more of account id, access key, secret key, bucket is unset
    #[error("object storage is not configured (missing {0})")]
    MissingCredentials(&'static str),

    /// The store answered with a non-2xx status
    #[error("object store returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("object store request failed: {0}")]
    Transport(String),
}

/// The four values a signed PUT cannot do without
#[derive(Debug, Clone)]
pub struct R2Credentials {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
}

impl R2Credentials {
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        fn take(value: &Option<String>, name: &'static str) -> Result<String, StorageError> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or(StorageError::MissingCredentials(name))
        }

        Ok(Self {
            account_id: take(&config.account_id, "R2_ACCOUNT_ID")?,
            access_key_id: take(&config.access_key_id, "R2_ACCESS_KEY_ID")?,
            secret_access_key: take(&config.secret_access_key, "R2_SECRET_ACCESS_KEY")?,
            bucket: take(&config.bucket, "R2_BUCKET_NAME")?,
        })
    }
}

/// Drop path separators and surrounding whitespace from one key segment.
/// Dot-only segments come back empty: the HTTP client would collapse them
/// out of the URL after the path was signed.
fn clean_segment(value: &str) -> String {
    let cleaned: String = value.chars().filter(|c| *c != '/' && *c != '\\').collect();
    let cleaned = cleaned.trim();
    if cleaned.chars().all(|c| c == '.') {
        return String::new();
    }
    cleaned.to_string()
}

/// `product-images/{brand}/{filename}`; brand falls back to `general`.
/// `None` when nothing usable is left of the filename.
pub fn product_image_key(brand: Option<&str>, filename: &str) -> Option<String> {
    let filename = clean_segment(filename);
    if filename.is_empty() {
        return None;
    }
    let brand = brand
        .map(clean_segment)
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| DEFAULT_BRAND.to_string());
    Some(format!("{IMAGE_PREFIX}/{brand}/{filename}"))
}

#[derive(Debug, Clone)]
pub struct ObjectStore {
    http: reqwest::Client,
    config: StorageConfig,
}

impl ObjectStore {
    pub fn new(http: reqwest::Client, config: StorageConfig) -> Self {
        Self { http, config }
    }

    /// Endpoint base without trailing slash
    fn endpoint(&self, credentials: &R2Credentials) -> String {
        match self.config.endpoint.as_deref() {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.r2.cloudflarestorage.com", credentials.account_id),
        }
    }

    /// Public URL of an object. Falls back to the R2 dev domain when no
    /// public base is configured.
    pub fn public_url(&self, key: &str) -> String {
        match self.config.public_url.as_deref() {
            Some(base) => format!("{}/{key}", base.trim_end_matches('/')),
            None => format!(
                "https://{}.r2.dev/{key}",
                self.config.bucket.as_deref().unwrap_or_default()
            ),
        }
    }

    /// Sign and PUT one object. Never retried; a non-2xx answer comes back
    /// as [`StorageError::Upstream`] with the store's status and body.
    pub async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), StorageError> {
        let credentials = R2Credentials::from_config(&self.config)?;

        let endpoint = self.endpoint(&credentials);
        let host = endpoint
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&endpoint)
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();
        let canonical_uri = sigv4::canonical_uri(&credentials.bucket, key);
        let payload_hash = sigv4::payload_hash(&bytes);

        let signed = sigv4::sign(&SigningRequest {
            access_key_id: &credentials.access_key_id,
            secret_access_key: &credentials.secret_access_key,
            host: &host,
            canonical_uri: &canonical_uri,
            content_type,
            content_length: bytes.len(),
            payload_hash: &payload_hash,
            timestamp: Utc::now(),
        })
        .map_err(|e| StorageError::Transport(format!("signing failed: {e}")))?;

        let url = format!("{endpoint}{canonical_uri}");
        let content_length = bytes.len();

        let response = self
            .http
            .put(&url)
            .header(AUTHORIZATION, signed.authorization)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, content_length)
            .header("x-amz-content-sha256", signed.content_sha256)
            .header("x-amz-date", signed.amz_date)
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(key = %key, status = status.as_u16(), body = %body, "R2 upload rejected");
            return Err(StorageError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(key = %key, bytes = content_length, "Object uploaded to R2");
        Ok(())
    }
}
