//! Post commands: feed browsing, publishing, editing and likes.

use std::path::PathBuf;

use clap::Subcommand;
use console::style;

use sg_core::config::ConfigHandle;
use sg_core::error::SgResult;
use sg_models::{FileUpload, NewPost, UpdatePost};
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum PostsAction {
    /// Show the most recently created posts.
    Recent,
    /// Page through the feed, newest update first.
    Feed {
        /// Continue after this post ID.
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Search posts by caption.
    Search {
        /// Search term.
        term: String,
    },
    /// Show a single post.
    Get {
        /// Post ID.
        id: String,
    },
    /// Publish a new post.
    Create {
        /// Image to attach.
        #[arg(long)]
        file: PathBuf,
        /// Caption text.
        #[arg(long, default_value = "")]
        caption: String,
        /// Location label.
        #[arg(short, long)]
        location: Option<String>,
        /// Comma-separated tags.
        #[arg(short, long)]
        tags: Option<String>,
        /// Creator profile ID (defaults to the signed-in user).
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Edit an existing post.
    Update {
        /// Post ID.
        id: String,
        /// New caption (keeps the current one when omitted).
        #[arg(long)]
        caption: Option<String>,
        /// Replacement image.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Location label.
        #[arg(short, long)]
        location: Option<String>,
        /// Comma-separated tags.
        #[arg(short, long)]
        tags: Option<String>,
    },
    /// Delete a post document. Its image file stays in storage.
    Delete {
        /// Post ID.
        id: String,
        /// Image file ID (looked up from the post when omitted).
        #[arg(long)]
        image_id: Option<String>,
    },
    /// Like or unlike a post as the signed-in user.
    Like {
        /// Post ID.
        id: String,
        /// Remove the like instead of adding it.
        #[arg(long)]
        unlike: bool,
    },
    /// List posts created by a user.
    User {
        /// Profile ID.
        user_id: String,
    },
}

/// Like list after toggling `user_id` in or out.
fn toggle_like(mut likes: Vec<String>, user_id: &str, unlike: bool) -> Vec<String> {
    likes.retain(|id| id != user_id);
    if !unlike {
        likes.push(user_id.to_string());
    }
    likes
}

pub async fn run(config: ConfigHandle, action: PostsAction, format: OutputFormat) -> SgResult<()> {
    let registry = super::connect(&config).await?;

    match action {
        PostsAction::Recent => {
            let posts = registry.posts.get_recent_posts().await?;
            match format {
                OutputFormat::Json => super::print_json(&posts),
                OutputFormat::Text => super::print_posts(&posts),
            }
        }
        PostsAction::Feed { cursor } => {
            let page = registry.posts.try_get_infinite_posts(cursor.as_deref()).await?;
            match format {
                OutputFormat::Json => super::print_json(&page),
                OutputFormat::Text => {
                    super::print_posts(&page);
                    if let Some(next) = page.next_cursor() {
                        println!("Next page: {}", style(format!("--cursor {next}")).dim());
                    }
                }
            }
        }
        PostsAction::Search { term } => {
            let posts = registry.posts.try_search_posts(&term).await?;
            match format {
                OutputFormat::Json => super::print_json(&posts),
                OutputFormat::Text => super::print_posts(&posts),
            }
        }
        PostsAction::Get { id } => {
            let post = registry.posts.try_get_post_by_id(&id).await?;
            match format {
                OutputFormat::Json => super::print_json(&post),
                OutputFormat::Text => super::print_post(&post),
            }
        }
        PostsAction::Create { file, caption, location, tags, user } => {
            let user_id = match user {
                Some(u) => u,
                None => super::current_user_id(&registry).await?,
            };
            let upload = FileUpload::from_path(&file)?;
            let pb = super::files::upload_spinner(&upload.file_name);
            let result = registry
                .posts
                .try_create_post(NewPost { user_id, caption, file: upload, location, tags })
                .await;
            pb.finish_and_clear();
            let post = result?;

            match format {
                OutputFormat::Json => super::print_json(&post),
                OutputFormat::Text => {
                    println!("{} Published post {}.", style("OK").green().bold(), style(&post.id).cyan());
                    super::print_post(&post);
                }
            }
        }
        PostsAction::Update { id, caption, file, location, tags } => {
            let current = registry.posts.try_get_post_by_id(&id).await?;
            let upload = file.as_deref().map(FileUpload::from_path).transpose()?;
            let update = UpdatePost {
                post_id: id,
                caption: caption.unwrap_or(current.data.caption),
                image_id: current.data.image_id,
                image_url: current.data.image_url,
                file: upload,
                location: location.or(current.data.location),
                tags: tags.or_else(|| Some(current.data.tags.join(","))),
            };
            let post = registry.posts.try_update_post(update).await?;

            match format {
                OutputFormat::Json => super::print_json(&post),
                OutputFormat::Text => {
                    println!("{} Updated post {}.", style("OK").green().bold(), post.id);
                    super::print_post(&post);
                }
            }
        }
        PostsAction::Delete { id, image_id } => {
            let image_id = match image_id {
                Some(i) => i,
                None => registry.posts.try_get_post_by_id(&id).await?.data.image_id,
            };
            let deleted = registry.posts.delete_post(&id, &image_id).await?.is_some();

            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({ "id": id, "deleted": deleted })),
                OutputFormat::Text => {
                    if deleted {
                        println!("{} Deleted post {id}.", style("OK").green().bold());
                    } else {
                        println!("{} Post {id} could not be deleted.", style("FAIL").red().bold());
                    }
                }
            }
        }
        PostsAction::Like { id, unlike } => {
            let user_id = super::current_user_id(&registry).await?;
            let current = registry.posts.try_get_post_by_id(&id).await?;
            let likes = toggle_like(current.data.like_ids(), &user_id, unlike);
            let post = registry.posts.try_like_post(&id, &likes).await?;

            match format {
                OutputFormat::Json => super::print_json(&post),
                OutputFormat::Text => println!(
                    "{} Post {} now has {} like(s).",
                    style("OK").green().bold(),
                    post.id,
                    post.data.likes.len()
                ),
            }
        }
        PostsAction::User { user_id } => {
            let posts = registry.posts.try_get_user_posts(&user_id).await?;
            match format {
                OutputFormat::Json => super::print_json(&posts),
                OutputFormat::Text => super::print_posts(&posts),
            }
        }
    }

    Ok(())
}
