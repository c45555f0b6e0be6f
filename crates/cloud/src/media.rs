//! Image uploads to the media host.
//!
//! [`MediaHost`] is the seam the API layer talks to; [`CloudinaryHost`] posts
//! an unsigned upload (multipart form with an upload preset) and returns the
//! `secure_url` from the response.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A file received from the admin, ready to forward.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Media host returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Media host response has no secure_url")]
    MissingUrl,

    #[error("Media uploads are not configured ({0} is unset)")]
    NotConfigured(&'static str),

    #[error("Upload is empty")]
    EmptyFile,
}

#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Store `file` and return its public HTTPS URL.
    async fn upload(&self, file: UploadFile) -> Result<String, MediaError>;
}

// ---------------------------------------------------------------------------
// Cloudinary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: Option<String>,
    pub upload_preset: Option<String>,
    /// Overridable for tests.
    pub api_base: String,
}

impl CloudinaryConfig {
    /// Read `CLOUDINARY_CLOUD_NAME` and `CLOUDINARY_UPLOAD_PRESET`. Missing
    /// values only fail when an upload is attempted.
    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v: &String| !v.is_empty());
        Self {
            cloud_name: non_empty("CLOUDINARY_CLOUD_NAME"),
            upload_preset: non_empty("CLOUDINARY_UPLOAD_PRESET"),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

pub struct CloudinaryHost {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    fn upload_url(&self) -> Result<String, MediaError> {
        let cloud_name = self
            .config
            .cloud_name
            .as_deref()
            .ok_or(MediaError::NotConfigured("CLOUDINARY_CLOUD_NAME"))?;
        Ok(format!(
            "{}/{}/image/upload",
            self.config.api_base.trim_end_matches('/'),
            cloud_name
        ))
    }
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(&self, file: UploadFile) -> Result<String, MediaError> {
        if file.bytes.is_empty() {
            return Err(MediaError::EmptyFile);
        }
        let url = self.upload_url()?;
        let preset = self
            .config
            .upload_preset
            .clone()
            .ok_or(MediaError::NotConfigured("CLOUDINARY_UPLOAD_PRESET"))?;

        let size = file.bytes.len();
        let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", preset);

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), file = %file.file_name, "Image upload rejected");
            return Err(MediaError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let secure_url = response
            .json::<UploadResponse>()
            .await?
            .secure_url
            .filter(|u| !u.is_empty())
            .ok_or(MediaError::MissingUrl)?;
        tracing::info!(file = %file.file_name, bytes = size, url = %secure_url, "Image uploaded");
        Ok(secure_url)
    }
}
