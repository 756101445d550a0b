//! CLI command implementations.

pub mod account;
pub mod config;
pub mod files;
pub mod posts;
pub mod saves;
pub mod users;

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use dialoguer::Password;
use serde::Serialize;

use sg_core::config::ConfigHandle;
use sg_core::error::{SgError, SgResult};
use sg_models::{Document, DocumentList, PostRecord, UserRecord};
use sg_services::ServiceRegistry;

/// Connect to the backend and bring every service up.
pub async fn connect(config: &ConfigHandle) -> SgResult<ServiceRegistry> {
    let mut registry = ServiceRegistry::connect(config.clone()).await?;
    registry.init_all()?;
    Ok(registry)
}

/// Id of the signed-in user's profile document.
pub async fn current_user_id(registry: &ServiceRegistry) -> SgResult<String> {
    Ok(registry.users.try_get_current_user().await?.id)
}

/// Use the given password or prompt for one.
pub fn password_or_prompt(password: Option<String>, prompt: &str) -> SgResult<String> {
    match password {
        Some(p) => Ok(p),
        None => Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(|e| SgError::Internal(e.to_string())),
    }
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// A table with the shared CLI styling.
pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Render a page of posts as a table.
pub fn print_posts(posts: &DocumentList<PostRecord>) {
    if posts.is_empty() {
        println!("No posts found.");
        return;
    }

    let mut table = new_table(vec!["ID", "Caption", "Creator", "Likes", "Tags", "Updated"]);
    for doc in &posts.documents {
        let creator = doc
            .data
            .creator
            .as_ref()
            .and_then(|c| c.document().map(|d| d.data.name.clone()))
            .or_else(|| doc.data.creator_id().map(str::to_string))
            .unwrap_or_else(|| "-".into());
        table.add_row(vec![
            doc.id.clone(),
            truncate(&doc.data.caption, 40),
            truncate(&creator, 20),
            doc.data.likes.len().to_string(),
            doc.data.tags.join(", "),
            format_date(doc),
        ]);
    }
    println!("{table}");
    println!("\n{} of {} posts", posts.documents.len(), posts.total);
}

/// Print one post as a field/value listing.
pub fn print_post(doc: &Document<PostRecord>) {
    let mut table = new_table(vec!["Field", "Value"]);
    table.add_row(vec!["ID".to_string(), doc.id.clone()]);
    table.add_row(vec!["Caption".to_string(), doc.data.caption.clone()]);
    table.add_row(vec![
        "Creator".to_string(),
        doc.data.creator_id().unwrap_or("-").to_string(),
    ]);
    table.add_row(vec![
        "Location".to_string(),
        doc.data.location.clone().unwrap_or_else(|| "-".into()),
    ]);
    table.add_row(vec!["Tags".to_string(), doc.data.tags.join(", ")]);
    table.add_row(vec!["Likes".to_string(), doc.data.like_ids().join(", ")]);
    table.add_row(vec!["Image ID".to_string(), doc.data.image_id.clone()]);
    table.add_row(vec!["Image URL".to_string(), doc.data.image_url.clone()]);
    table.add_row(vec!["Updated".to_string(), format_date(doc)]);
    println!("{table}");
}

/// Print one user profile as a field/value listing.
pub fn print_user(doc: &Document<UserRecord>) {
    let mut table = new_table(vec!["Field", "Value"]);
    let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    table.add_row(vec!["ID".to_string(), doc.id.clone()]);
    table.add_row(vec!["Account".to_string(), doc.data.account_id.clone()]);
    table.add_row(vec!["Name".to_string(), doc.data.name.clone()]);
    table.add_row(vec!["Username".to_string(), opt(&doc.data.username)]);
    table.add_row(vec!["Email".to_string(), doc.data.email.clone()]);
    table.add_row(vec!["Bio".to_string(), opt(&doc.data.bio)]);
    table.add_row(vec!["Avatar".to_string(), opt(&doc.data.image_url)]);
    println!("{table}");
}

/// Short date of a document's last update, or `-`.
pub fn format_date<T>(doc: &Document<T>) -> String {
    doc.updated_at
        .or(doc.created_at)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".into())
}

/// Truncate a string to a maximum number of characters, appending an ellipsis if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_strings_untouched() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn truncate_long_strings_with_ellipsis() {
        assert_eq!(truncate("a very long caption", 10), "a very ...");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("ééééé", 5), "ééééé");
        assert_eq!(truncate("éééééé", 5), "éé...");
    }
}
