//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "Snapgram";

/// Directory name used under the platform data/config dirs.
pub const APP_DIR_NAME: &str = "Snapgram";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend response format version sent with every request.
pub const RESPONSE_FORMAT: &str = "1.5.0";

/// Default request timeout in milliseconds.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;

/// Extended timeout multiplier for file uploads.
pub const EXTENDED_TIMEOUT_MULTIPLIER: u64 = 12;

/// Local storage key holding the fallback session cookies.
pub const COOKIE_FALLBACK_KEY: &str = "cookieFallback";

/// Serialized value of an empty fallback-cookie list.
pub const EMPTY_COOKIE_FALLBACK: &str = "[]";

/// Header carrying fallback session cookies in both directions.
pub const FALLBACK_COOKIES_HEADER: &str = "X-Fallback-Cookies";

/// Session id accepted by the backend for "the session making this request".
pub const CURRENT_SESSION: &str = "current";

/// Page size for the recent-posts listing.
pub const RECENT_POSTS_LIMIT: u32 = 20;

/// Page size for the infinite (cursor-paginated) feed.
pub const INFINITE_POSTS_PAGE_SIZE: u32 = 10;

/// Default page size when listing users.
pub const DEFAULT_USERS_LIMIT: u32 = 10;

/// Preview image width and height.
pub const PREVIEW_SIZE: u32 = 2000;

/// Preview image quality (0-100).
pub const PREVIEW_QUALITY: u8 = 100;

/// Local storage schema version.
pub const DB_SCHEMA_VERSION: i32 = 1;

/// Attribute names used in queries.
pub mod attributes {
    pub const ID: &str = "$id";
    pub const CREATED_AT: &str = "$createdAt";
    pub const UPDATED_AT: &str = "$updatedAt";

    pub const ACCOUNT_ID: &str = "accountId";
    pub const CREATOR: &str = "creator";
    pub const CAPTION: &str = "caption";
}
