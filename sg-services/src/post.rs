//! Post service: create, edit, delete, like and list posts.
//!
//! Creating or editing a post with a new image is a two-step write: the
//! image is uploaded to storage, then the post document is written. There
//! is no transaction across the two; when the document write fails the new
//! upload is deleted again on a best-effort basis.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use sg_api::{Backend, Collection};
use sg_core::config::FeedConfig;
use sg_core::constants::attributes;
use sg_core::error::{SgError, SgResult};
use sg_models::{id, parse_tags, Document, DocumentList, NewPost, PostRecord, Query, UpdatePost};

use crate::event_bus::{AppEvent, EventBus};
use crate::media::MediaService;
use crate::service::{ok_or_log, Service, ServiceState};

/// Service for the posts collection.
#[derive(Clone)]
pub struct PostService {
    state: ServiceState,
    backend: Arc<dyn Backend>,
    event_bus: EventBus,
    media: MediaService,
    recent_limit: u32,
    page_size: u32,
}

impl PostService {
    /// Create a new PostService with listing sizes from `feed`.
    pub fn new(
        backend: Arc<dyn Backend>,
        event_bus: EventBus,
        media: MediaService,
        feed: &FeedConfig,
    ) -> Self {
        Self {
            state: ServiceState::Created,
            backend,
            event_bus,
            media,
            recent_limit: feed.recent_limit,
            page_size: feed.page_size,
        }
    }

    // --- Writes ---

    /// Upload the image and create the post document.
    ///
    /// The upload is deleted again only when the document write itself is
    /// rejected. A written post whose reply fails to decode keeps its image.
    pub async fn create_post(&self, post: NewPost) -> Option<Document<PostRecord>> {
        ok_or_log("create_post", self.try_create_post(post).await)
    }

    pub async fn try_create_post(&self, post: NewPost) -> SgResult<Document<PostRecord>> {
        if post.user_id.is_empty() {
            return Err(SgError::Validation("post creator is required".into()));
        }
        if post.file.is_empty() {
            return Err(SgError::Validation("post image is empty".into()));
        }

        let (file, image_url) = self.media.upload_with_preview(post.file).await?;

        let data = json!({
            "creator": post.user_id,
            "caption": post.caption,
            "imageUrl": image_url.as_str(),
            "imageId": file.id,
            "location": post.location,
            "tags": parse_tags(post.tags.as_deref()),
        });

        let written = match self
            .backend
            .create_document(Collection::Posts, &id::unique(), data)
            .await
        {
            Ok(doc) => doc,
            Err(e) => {
                self.media.discard_upload(&file.id).await;
                return Err(e);
            }
        };

        // The document references the upload now; a bad reply must not remove it.
        info!("created post {} with image {}", written.id, file.id);
        self.event_bus.emit(AppEvent::PostUpdated {
            post_id: written.id.clone(),
        });
        written.decode()
    }

    /// Update caption, location, tags and optionally the image.
    ///
    /// Without a replacement file the post keeps its current image.
    pub async fn update_post(&self, post: UpdatePost) -> Option<Document<PostRecord>> {
        ok_or_log("update_post", self.try_update_post(post).await)
    }

    pub async fn try_update_post(&self, post: UpdatePost) -> SgResult<Document<PostRecord>> {
        if post.post_id.is_empty() {
            return Err(SgError::Validation("post id is required".into()));
        }

        let UpdatePost {
            post_id,
            caption,
            image_id,
            image_url,
            file,
            location,
            tags,
        } = post;

        let uploaded = match file {
            Some(file) => Some(self.media.upload_with_preview(file).await?),
            None => None,
        };

        let (image_id, image_url) = match &uploaded {
            Some((info, url)) => (info.id.clone(), url.to_string()),
            None => (image_id, image_url),
        };

        let data = json!({
            "caption": caption,
            "imageUrl": image_url,
            "imageId": image_id,
            "location": location,
            "tags": parse_tags(tags.as_deref()),
        });

        let written = match self
            .backend
            .update_document(Collection::Posts, &post_id, data)
            .await
        {
            Ok(doc) => doc,
            Err(e) => {
                if let Some((info, _)) = &uploaded {
                    self.media.discard_upload(&info.id).await;
                }
                return Err(e);
            }
        };

        info!("updated post {}", written.id);
        self.event_bus.emit(AppEvent::PostUpdated {
            post_id: written.id.clone(),
        });
        written.decode()
    }

    /// Delete a post document.
    ///
    /// Both ids are required; a missing one is returned as a validation
    /// error before any request. Backend failures are logged and give
    /// `Ok(None)`. The image file is left in storage.
    pub async fn delete_post(&self, post_id: &str, image_id: &str) -> SgResult<Option<()>> {
        Self::check_delete_ids(post_id, image_id)?;
        Ok(ok_or_log("delete_post", self.remove_post(post_id).await))
    }

    pub async fn try_delete_post(&self, post_id: &str, image_id: &str) -> SgResult<()> {
        Self::check_delete_ids(post_id, image_id)?;
        self.remove_post(post_id).await
    }

    fn check_delete_ids(post_id: &str, image_id: &str) -> SgResult<()> {
        if post_id.is_empty() || image_id.is_empty() {
            return Err(SgError::Validation(
                "post id and image id are required".into(),
            ));
        }
        Ok(())
    }

    async fn remove_post(&self, post_id: &str) -> SgResult<()> {
        self.backend
            .delete_document(Collection::Posts, post_id)
            .await?;
        info!("deleted post {post_id}");
        self.event_bus.emit(AppEvent::PostDeleted {
            post_id: post_id.to_string(),
        });
        Ok(())
    }

    /// Replace the post's likes with `likes` (user document ids).
    pub async fn like_post(&self, post_id: &str, likes: &[String]) -> Option<Document<PostRecord>> {
        ok_or_log("like_post", self.try_like_post(post_id, likes).await)
    }

    pub async fn try_like_post(&self, post_id: &str, likes: &[String]) -> SgResult<Document<PostRecord>> {
        let doc = self
            .backend
            .update_document(Collection::Posts, post_id, json!({ "likes": likes }))
            .await?
            .decode::<PostRecord>()?;
        debug!("post {} now has {} like(s)", doc.id, doc.data.likes.len());
        self.event_bus.emit(AppEvent::PostUpdated {
            post_id: doc.id.clone(),
        });
        Ok(doc)
    }

    // --- Reads ---

    /// A single post.
    pub async fn get_post_by_id(&self, post_id: &str) -> Option<Document<PostRecord>> {
        ok_or_log("get_post_by_id", self.try_get_post_by_id(post_id).await)
    }

    pub async fn try_get_post_by_id(&self, post_id: &str) -> SgResult<Document<PostRecord>> {
        self.backend
            .get_document(Collection::Posts, post_id)
            .await?
            .decode()
    }

    /// Newest posts by creation time.
    ///
    /// Failures are returned to the caller, not logged and dropped.
    pub async fn get_recent_posts(&self) -> SgResult<DocumentList<PostRecord>> {
        self.list(&[
            Query::order_desc(attributes::CREATED_AT),
            Query::limit(self.recent_limit),
        ])
        .await
    }

    /// One page of the feed, most recently updated first, starting after
    /// `cursor` (a post id) when given.
    pub async fn get_infinite_posts(&self, cursor: Option<&str>) -> Option<DocumentList<PostRecord>> {
        ok_or_log("get_infinite_posts", self.try_get_infinite_posts(cursor).await)
    }

    pub async fn try_get_infinite_posts(&self, cursor: Option<&str>) -> SgResult<DocumentList<PostRecord>> {
        let mut queries = vec![
            Query::order_desc(attributes::UPDATED_AT),
            Query::limit(self.page_size),
        ];
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            queries.push(Query::cursor_after(cursor));
        }
        self.list(&queries).await
    }

    /// Full-text search on captions.
    pub async fn search_posts(&self, term: &str) -> Option<DocumentList<PostRecord>> {
        ok_or_log("search_posts", self.try_search_posts(term).await)
    }

    pub async fn try_search_posts(&self, term: &str) -> SgResult<DocumentList<PostRecord>> {
        self.list(&[Query::search(attributes::CAPTION, term)]).await
    }

    /// Posts by one creator, newest first.
    pub async fn get_user_posts(&self, user_id: &str) -> Option<DocumentList<PostRecord>> {
        ok_or_log("get_user_posts", self.try_get_user_posts(user_id).await)
    }

    pub async fn try_get_user_posts(&self, user_id: &str) -> SgResult<DocumentList<PostRecord>> {
        if user_id.is_empty() {
            return Err(SgError::Validation("user id is required".into()));
        }
        self.list(&[
            Query::equal(attributes::CREATOR, user_id),
            Query::order_desc(attributes::CREATED_AT),
        ])
        .await
    }

    async fn list(&self, queries: &[Query]) -> SgResult<DocumentList<PostRecord>> {
        self.backend
            .list_documents(Collection::Posts, queries)
            .await?
            .decode()
    }
}

impl Service for PostService {
    fn name(&self) -> &str {
        "post"
    }

    fn state(&self) -> ServiceState {
        self.state
    }

    fn init(&mut self) -> SgResult<()> {
        self.state = ServiceState::Running;
        info!("post service initialized");
        Ok(())
    }

    fn shutdown(&mut self) -> SgResult<()> {
        self.state = ServiceState::Stopped;
        info!("post service shut down");
        Ok(())
    }
}
