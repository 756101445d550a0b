//! Media service: storage uploads, preview URLs and deletes.
//!
//! Also hosts the upload-then-preview sequence shared by post and profile
//! edits, which removes the uploaded file again when no preview URL can be
//! produced for it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use sg_api::{Backend, Url};
use sg_core::error::SgResult;
use sg_models::{id, FileInfo, FileUpload, PreviewOptions};

use crate::event_bus::{AppEvent, EventBus};
use crate::service::{ok_or_log, Service, ServiceState};

/// Service for files in the storage bucket.
#[derive(Clone)]
pub struct MediaService {
    state: ServiceState,
    backend: Arc<dyn Backend>,
    event_bus: EventBus,
    preview: PreviewOptions,
}

impl MediaService {
    /// Create a new MediaService producing previews with `preview`.
    pub fn new(backend: Arc<dyn Backend>, event_bus: EventBus, preview: PreviewOptions) -> Self {
        Self {
            state: ServiceState::Created,
            backend,
            event_bus,
            preview,
        }
    }

    /// The preview transformation used for post and avatar images.
    pub fn preview_options(&self) -> &PreviewOptions {
        &self.preview
    }

    /// Upload a file under a fresh id.
    pub async fn upload_file(&self, file: FileUpload) -> Option<FileInfo> {
        ok_or_log("upload_file", self.try_upload_file(file).await)
    }

    pub async fn try_upload_file(&self, file: FileUpload) -> SgResult<FileInfo> {
        let info = self.backend.create_file(&id::unique(), file).await?;
        self.event_bus.emit(AppEvent::FileUploaded {
            file_id: info.id.clone(),
        });
        Ok(info)
    }

    /// Preview URL of a stored image.
    pub fn get_file_preview(&self, file_id: &str) -> Option<Url> {
        ok_or_log("get_file_preview", self.try_get_file_preview(file_id))
    }

    pub fn try_get_file_preview(&self, file_id: &str) -> SgResult<Url> {
        self.backend.file_preview_url(file_id, &self.preview)
    }

    /// Delete a stored file.
    pub async fn delete_file(&self, file_id: &str) -> Option<()> {
        ok_or_log("delete_file", self.try_delete_file(file_id).await)
    }

    pub async fn try_delete_file(&self, file_id: &str) -> SgResult<()> {
        self.backend.delete_file(file_id).await?;
        info!("deleted file {file_id}");
        self.event_bus.emit(AppEvent::FileDeleted {
            file_id: file_id.to_string(),
        });
        Ok(())
    }

    /// Upload `file` and build its preview URL.
    ///
    /// The uploaded file is deleted again if the preview URL cannot be built.
    pub(crate) async fn upload_with_preview(&self, file: FileUpload) -> SgResult<(FileInfo, Url)> {
        let info = self.try_upload_file(file).await?;
        match self.try_get_file_preview(&info.id) {
            Ok(url) => Ok((info, url)),
            Err(e) => {
                self.discard_upload(&info.id).await;
                Err(e)
            }
        }
    }

    /// Best-effort delete of a file orphaned by a failed write.
    pub(crate) async fn discard_upload(&self, file_id: &str) {
        debug!("discarding orphaned upload {file_id}");
        if let Err(e) = self.try_delete_file(file_id).await {
            warn!("failed to delete orphaned file {file_id}: {e}");
        }
    }
}

impl Service for MediaService {
    fn name(&self) -> &str {
        "media"
    }

    fn state(&self) -> ServiceState {
        self.state
    }

    fn init(&mut self) -> SgResult<()> {
        self.state = ServiceState::Running;
        info!("media service initialized");
        Ok(())
    }

    fn shutdown(&mut self) -> SgResult<()> {
        self.state = ServiceState::Stopped;
        info!("media service shut down");
        Ok(())
    }
}
