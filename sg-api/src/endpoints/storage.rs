//! Storage endpoints: upload, preview URL, delete.

use reqwest::multipart::{Form, Part};
use reqwest::Url;
use sg_core::error::{SgError, SgResult};
use sg_models::{FileInfo, FileUpload, PreviewOptions};
use tracing::info;

use crate::client::ApiClient;

impl ApiClient {
    fn files_path(&self) -> String {
        format!("/storage/buckets/{}/files", self.storage_id())
    }

    /// Upload a file to the bucket. Uses extended timeout.
    pub async fn create_file(&self, file_id: &str, file: FileUpload) -> SgResult<FileInfo> {
        let size = file.len();
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| SgError::Validation(format!("invalid mime type {}: {e}", file.mime_type)))?;
        let form = Form::new()
            .text("fileId", file_id.to_string())
            .part("file", part);

        let info: FileInfo = self.post_multipart(&self.files_path(), form).await?;
        info!("uploaded {} ({} bytes) as {}", file.file_name, size, info.id);
        Ok(info)
    }

    /// URL of a resized preview. Built locally; no request is made.
    pub fn file_preview_url(&self, file_id: &str, options: &PreviewOptions) -> SgResult<Url> {
        let mut params = vec![
            ("width", options.width.to_string()),
            ("height", options.height.to_string()),
        ];
        if let Some(gravity) = &options.gravity {
            params.push(("gravity", gravity.clone()));
        }
        params.push(("quality", options.quality.to_string()));

        self.public_url(&format!("{}/{file_id}/preview", self.files_path()), &params)
    }

    /// Delete a file from the bucket.
    pub async fn delete_file(&self, file_id: &str) -> SgResult<()> {
        self.delete(&format!("{}/{file_id}", self.files_path())).await
    }
}
