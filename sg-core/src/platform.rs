//! Platform-specific directory lookup.

use std::path::PathBuf;
use crate::constants::APP_DIR_NAME;
use crate::error::{SgError, SgResult};

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Detect the current platform at compile time.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    /// Application data directory (local storage database, logs).
    ///
    /// - Windows: `%APPDATA%/Snapgram`
    /// - macOS: `~/Library/Application Support/Snapgram`
    /// - Linux: `~/.local/share/Snapgram`
    pub fn data_dir() -> SgResult<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| SgError::Config("could not determine data directory".into()))?;
        Ok(base.join(APP_DIR_NAME))
    }

    /// Configuration directory (`config.toml`).
    pub fn config_dir() -> SgResult<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| SgError::Config("could not determine config directory".into()))?;
        Ok(base.join(APP_DIR_NAME))
    }

    /// Human-readable platform name.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
