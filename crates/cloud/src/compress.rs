//! Shrink uploads before they leave the server.
//!
//! Images whose longest side exceeds the limit are scaled down (aspect
//! ratio kept, never scaled up) and everything decodable is re-encoded as
//! JPEG. Input the decoder does not understand is forwarded unchanged.

use std::io::Cursor;

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::media::{MediaError, MediaHost, UploadFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionSettings {
    pub max_dimension: u32,
    /// 1-100.
    pub jpeg_quality: u8,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            max_dimension: 1200,
            jpeg_quality: 80,
        }
    }
}

/// Re-encode `file` according to `settings`.
pub fn compress_image(file: UploadFile, settings: CompressionSettings) -> UploadFile {
    let img = match image::load_from_memory(&file.bytes) {
        Ok(img) => img,
        Err(e) => {
            tracing::debug!(file = %file.file_name, error = %e, "Not a decodable image, uploading as-is");
            return file;
        }
    };

    let (width, height) = img.dimensions();
    let max = settings.max_dimension.max(1);
    let img = if width > max || height > max {
        img.resize(max, max, FilterType::Lanczos3)
    } else {
        img
    };

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), settings.jpeg_quality.clamp(1, 100));
    if let Err(e) = rgb.write_with_encoder(encoder) {
        tracing::warn!(file = %file.file_name, error = %e, "JPEG re-encode failed, uploading original");
        return file;
    }

    tracing::debug!(
        file = %file.file_name,
        before = file.bytes.len(),
        after = bytes.len(),
        width = rgb.width(),
        height = rgb.height(),
        "Compressed upload"
    );
    UploadFile {
        file_name: jpeg_file_name(&file.file_name),
        content_type: Some("image/jpeg".into()),
        bytes,
    }
}

fn jpeg_file_name(name: &str) -> String {
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    let stem = if stem.is_empty() { "upload" } else { stem };
    format!("{stem}.jpg")
}

/// [`MediaHost`] decorator that compresses before delegating.
pub struct CompressingHost<H> {
    inner: H,
    settings: CompressionSettings,
}

impl<H: MediaHost> CompressingHost<H> {
    pub fn new(inner: H, settings: CompressionSettings) -> Self {
        Self { inner, settings }
    }
}

#[async_trait]
impl<H: MediaHost> MediaHost for CompressingHost<H> {
    async fn upload(&self, file: UploadFile) -> Result<String, MediaError> {
        let settings = self.settings;
        let fallback = file.clone();
        // Decoding and resizing are CPU-bound.
        let compressed = tokio::task::spawn_blocking(move || compress_image(file, settings))
            .await
            .unwrap_or(fallback);
        self.inner.upload(compressed).await
    }
}
