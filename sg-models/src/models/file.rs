//! Stored files, upload payloads, and preview options.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sg_core::constants;
use sg_core::error::{SgError, SgResult};

/// Metadata of a file in a storage bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub bucket_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub size_original: u64,
}

/// Bytes to upload, with the name and content type the backend should record.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub fn from_path(path: &Path) -> SgResult<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SgError::Validation(format!("invalid file name: {}", path.display())))?
            .to_string();
        let mime_type = guess_mime_type(&file_name).to_string();
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Content type for common media extensions; `application/octet-stream` otherwise.
pub fn guess_mime_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

/// Image preview transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOptions {
    pub width: u32,
    pub height: u32,
    /// Crop anchor; `None` leaves it to the backend's default.
    pub gravity: Option<String>,
    pub quality: u8,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            width: constants::PREVIEW_SIZE,
            height: constants::PREVIEW_SIZE,
            gravity: None,
            quality: constants::PREVIEW_QUALITY,
        }
    }
}

impl PreviewOptions {
    /// Square preview of `size` pixels at `quality`.
    pub fn square(size: u32, quality: u8) -> Self {
        Self {
            width: size,
            height: size,
            quality: quality.min(100),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("photo.JPG"), "image/jpeg");
        assert_eq!(guess_mime_type("clip.mp4"), "video/mp4");
        assert_eq!(guess_mime_type("noext"), "application/octet-stream");
    }

    #[test]
    fn test_from_path_reads_bytes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cat.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let upload = FileUpload::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "cat.png");
        assert_eq!(upload.mime_type, "image/png");
        assert_eq!(upload.len(), 3);
    }

    #[test]
    fn test_preview_defaults_and_clamp() {
        let default = PreviewOptions::default();
        assert_eq!((default.width, default.height, default.quality), (2000, 2000, 100));
        assert_eq!(PreviewOptions::square(400, 250).quality, 100);
    }
}
