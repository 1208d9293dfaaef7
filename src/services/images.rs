use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    services::providers::ImageInput,
};

/// Upload size limit (5 MB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// URL prefix under which stored images are served
const PUBLIC_PREFIX: &str = "/uploads/";

/// Base64-encoded image as sent by clients
#[derive(Debug, Clone, Deserialize)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

fn extension_for(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

impl ImagePayload {
    /// Decodes and validates the payload
    pub fn decode(&self) -> AppResult<ImageInput> {
        if extension_for(&self.mime_type).is_none() {
            return Err(AppError::InvalidInput(format!(
                "Unsupported image type '{}'",
                self.mime_type
            )));
        }

        let data = BASE64
            .decode(self.data.trim())
            .map_err(|e| AppError::InvalidInput(format!("Image is not valid base64: {}", e)))?;

        if data.is_empty() {
            return Err(AppError::InvalidInput("No image file provided".to_string()));
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(AppError::InvalidInput(format!(
                "Image exceeds the {} byte limit",
                MAX_IMAGE_BYTES
            )));
        }

        Ok(ImageInput {
            mime_type: self.mime_type.clone(),
            data,
        })
    }
}

/// Clothing photos on local disk, addressed by `/uploads/<file>` URLs
#[derive(Debug, Clone)]
pub struct ImageStorage {
    upload_dir: PathBuf,
}

impl ImageStorage {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Writes the image under a unique name and returns its public URL
    pub async fn save(&self, image: &ImageInput) -> AppResult<String> {
        let extension = extension_for(&image.mime_type).ok_or_else(|| {
            AppError::InvalidInput(format!("Unsupported image type '{}'", image.mime_type))
        })?;

        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(self.upload_dir.join(&file_name), &image.data).await?;

        tracing::debug!(file = %file_name, bytes = image.data.len(), "Image stored");

        Ok(format!("{}{}", PUBLIC_PREFIX, file_name))
    }

    /// Local path for a public image URL; only plain file names are accepted
    fn path_for(&self, image_url: &str) -> Option<PathBuf> {
        let file_name = image_url.strip_prefix(PUBLIC_PREFIX)?;
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return None;
        }
        Some(self.upload_dir.join(file_name))
    }

    /// Deletes a stored image. Failures are logged, never returned.
    pub async fn remove(&self, image_url: &str) {
        let Some(path) = self.path_for(image_url) else {
            tracing::warn!(image_url = %image_url, "Image URL outside upload directory, not removed");
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::info!(path = %path.display(), "Deleted image file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::error!(error = %e, path = %path.display(), "Error deleting image file"),
        }
    }
}
