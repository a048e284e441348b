//! Installer configuration
//!
//! One immutable value built at startup and threaded through every stage.

use std::path::PathBuf;

use crate::install::find_elevation_program;

/// Application installed by this tool
pub const APP_NAME: &str = "repeat";

/// Repository publishing the releases, as `owner/name`
pub const DEFAULT_REPO: &str = "repeat-cli/repeat";

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://github.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    pub app_name: String,
    pub repo: String,
    /// Base URL of the release metadata API
    pub api_base: String,
    /// Base URL release assets are downloaded from
    pub download_base: String,
    /// Explicit install directory, replacing the platform default
    pub install_dir: Option<PathBuf>,
    /// Program used to run operations with elevated privileges
    pub elevation: Option<PathBuf>,
    /// Parent directory for the temporary workspace (system temp dir when unset)
    pub workspace_root: Option<PathBuf>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            repo: DEFAULT_REPO.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
            install_dir: None,
            elevation: find_elevation_program(),
            workspace_root: None,
        }
    }
}

impl InstallConfig {
    /// Apply an install directory override; empty values are ignored
    pub fn with_install_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.install_dir = dir.filter(|d| !d.as_os_str().is_empty());
        self
    }
}
