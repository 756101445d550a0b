//! Application configuration management.
//!
//! Holds the backend project coordinates (endpoint, project, database,
//! collection and bucket ids) plus local storage, logging and feed settings.
//! Configuration is persisted as TOML on disk; a few values can be overridden
//! from `SNAPGRAM_*` environment variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::constants;
use crate::error::{SgError, SgResult};
use crate::platform::Platform;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend project settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Local storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Feed and media presentation settings.
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Backend project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// API endpoint including the version path (e.g. "https://cloud.appwrite.io/v1").
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Project identifier sent as `X-Appwrite-Project`.
    #[serde(default)]
    pub project_id: String,

    /// Database identifier.
    #[serde(default)]
    pub database_id: String,

    /// Collection holding user profile documents.
    #[serde(default)]
    pub user_collection_id: String,

    /// Collection holding post documents.
    #[serde(default)]
    pub post_collection_id: String,

    /// Collection holding saved-post records.
    #[serde(default)]
    pub saves_collection_id: String,

    /// Collection backing the posts' `likes` relationship.
    #[serde(default)]
    pub likes_collection_id: String,

    /// Storage bucket for uploaded media.
    #[serde(default)]
    pub storage_id: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_api_timeout")]
    pub api_timeout_ms: u64,

    /// Retry attempts for transport failures. Zero disables retrying.
    #[serde(default)]
    pub max_retries: u32,

    /// Extra headers sent with every request.
    #[serde(default)]
    pub custom_headers: HashMap<String, String>,

    /// Accept self-signed TLS certificates (self-hosted development backends).
    #[serde(default)]
    pub accept_self_signed_certs: bool,
}

/// Local storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite file. If empty, uses the default location.
    #[serde(default)]
    pub path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses the default location.
    #[serde(default)]
    pub directory: String,

    /// Write the file log as JSON lines.
    #[serde(default)]
    pub json_output: bool,
}

/// Feed and media settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Number of posts returned by the recent-posts listing.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,

    /// Page size for the cursor-paginated feed.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Preview width and height in pixels.
    #[serde(default = "default_preview_size")]
    pub preview_size: u32,

    /// Preview quality (0-100).
    #[serde(default = "default_preview_quality")]
    pub preview_quality: u8,
}

// Default value functions for serde

fn default_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

fn default_api_timeout() -> u64 {
    constants::DEFAULT_API_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

fn default_pool_size() -> u32 {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_recent_limit() -> u32 {
    constants::RECENT_POSTS_LIMIT
}

fn default_page_size() -> u32 {
    constants::INFINITE_POSTS_PAGE_SIZE
}

fn default_preview_size() -> u32 {
    constants::PREVIEW_SIZE
}

fn default_preview_quality() -> u8 {
    constants::PREVIEW_QUALITY
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            project_id: String::new(),
            database_id: String::new(),
            user_collection_id: String::new(),
            post_collection_id: String::new(),
            saves_collection_id: String::new(),
            likes_collection_id: String::new(),
            storage_id: String::new(),
            api_timeout_ms: default_api_timeout(),
            max_retries: 0,
            custom_headers: HashMap::new(),
            accept_self_signed_certs: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            wal_mode: true,
            pool_size: default_pool_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            page_size: default_page_size(),
            preview_size: default_preview_size(),
            preview_quality: default_preview_quality(),
        }
    }
}

impl BackendConfig {
    /// Names of required fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("endpoint", &self.endpoint),
            ("project_id", &self.project_id),
            ("database_id", &self.database_id),
            ("user_collection_id", &self.user_collection_id),
            ("post_collection_id", &self.post_collection_id),
            ("saves_collection_id", &self.saves_collection_id),
            ("storage_id", &self.storage_id),
        ];
        required
            .into_iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| k)
            .collect()
    }

    /// Fail with `MissingConfig` naming every empty required field.
    pub fn validate(&self) -> SgResult<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SgError::MissingConfig(format!("backend.{}", missing.join(", backend."))))
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file path, falling back to defaults.
    pub fn load_default() -> SgResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> SgResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> SgResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SgError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Save configuration to the default config file path.
    pub fn save_default(&self) -> SgResult<()> {
        let path = Self::default_config_path()?;
        self.save_to_file(&path)
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> SgResult<PathBuf> {
        Ok(Platform::config_dir()?.join("config.toml"))
    }

    /// Get the effective local storage path, using the configured path or the default.
    pub fn effective_storage_path(&self) -> SgResult<PathBuf> {
        if self.storage.path.is_empty() {
            Ok(Platform::data_dir()?.join("local_storage.db"))
        } else {
            Ok(PathBuf::from(&self.storage.path))
        }
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> SgResult<PathBuf> {
        if self.logging.directory.is_empty() {
            Ok(Platform::data_dir()?.join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }

    /// Whether every required backend coordinate is filled in.
    pub fn is_backend_configured(&self) -> bool {
        self.backend.missing_fields().is_empty()
    }

    /// Apply `SNAPGRAM_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::vars());
    }

    /// Apply `SNAPGRAM_*` overrides from an arbitrary key/value source.
    ///
    /// Recognized keys: `SNAPGRAM_ENDPOINT`, `SNAPGRAM_PROJECT_ID`,
    /// `SNAPGRAM_DATABASE_ID`, `SNAPGRAM_STORAGE_ID`, `SNAPGRAM_LOG_LEVEL`.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let value = value.into();
            match key.as_ref() {
                "SNAPGRAM_ENDPOINT" => self.backend.endpoint = Self::sanitize_endpoint(&value),
                "SNAPGRAM_PROJECT_ID" => self.backend.project_id = value,
                "SNAPGRAM_DATABASE_ID" => self.backend.database_id = value,
                "SNAPGRAM_STORAGE_ID" => self.backend.storage_id = value,
                "SNAPGRAM_LOG_LEVEL" => self.logging.level = value,
                _ => {}
            }
        }
    }

    /// Normalize an endpoint URL.
    ///
    /// Strips quotes and whitespace, defaults the scheme to https (http for
    /// localhost), and removes trailing slashes.
    pub fn sanitize_endpoint(endpoint: &str) -> String {
        let trimmed = endpoint.trim().trim_matches('"').trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
            format!("http://{trimmed}")
        } else {
            format!("https://{trimmed}")
        };

        with_scheme.trim_end_matches('/').to_string()
    }
}

/// Thread-safe configuration holder for shared access across services.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<AppConfig>>,
}

impl ConfigHandle {
    /// Create a new configuration handle.
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Read the configuration.
    pub async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, AppConfig> {
        self.inner.read().await
    }

    /// Write/update the configuration.
    pub async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, AppConfig> {
        self.inner.write().await
    }

    /// Clone out the backend section.
    pub async fn backend(&self) -> BackendConfig {
        self.inner.read().await.backend.clone()
    }

    /// Save the current configuration to the given path.
    pub async fn save_to(&self, path: &Path) -> SgResult<()> {
        let config = self.inner.read().await;
        config.save_to_file(path)
    }
}
