//! Common test infrastructure for installer tests
//!
//! - `archives`: In-memory release archive builders (tar.gz, zip)
//! - `mock_server`: Wiremock setup helpers for the release API and downloads

#![allow(dead_code)]

pub mod archives;
pub mod mock_server;

pub use archives::*;
pub use mock_server::*;

use std::path::PathBuf;

use repeat_install::InstallConfig;

pub const REPO: &str = "repeat-cli/repeat";
pub const TAG: &str = "v1.2.3";
pub const LINUX_BASENAME: &str = "repeat-v1.2.3-x86_64-unknown-linux-gnu";
pub const LINUX_ARCHIVE: &str = "repeat-v1.2.3-x86_64-unknown-linux-gnu.tar.gz";
pub const WINDOWS_BASENAME: &str = "repeat-v1.2.3-x86_64-pc-windows-msvc";
pub const WINDOWS_ARCHIVE: &str = "repeat-v1.2.3-x86_64-pc-windows-msvc.zip";
pub const FAKE_BINARY: &[u8] = b"#!/bin/sh\necho repeat\n";

/// Scratch layout for one pipeline run: an install dir and a workspace root
pub struct Sandbox {
    pub root: tempfile::TempDir,
    pub install_dir: PathBuf,
    pub workspace_root: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let install_dir = root.path().join("bin");
        let workspace_root = root.path().join("work");
        std::fs::create_dir(&workspace_root).unwrap();
        Self {
            root,
            install_dir,
            workspace_root,
        }
    }

    /// Config pointing every endpoint at `server_uri`
    pub fn config(&self, server_uri: &str) -> InstallConfig {
        InstallConfig {
            repo: REPO.to_string(),
            api_base: server_uri.to_string(),
            download_base: server_uri.to_string(),
            install_dir: Some(self.install_dir.clone()),
            elevation: None,
            workspace_root: Some(self.workspace_root.clone()),
            ..InstallConfig::default()
        }
    }

    /// Number of entries left under the workspace root
    pub fn leftover_workspaces(&self) -> usize {
        std::fs::read_dir(&self.workspace_root).unwrap().count()
    }
}

/// Output sink that discards colour codes
pub fn quiet_output() -> termcolor::NoColor<Vec<u8>> {
    termcolor::NoColor::new(Vec::new())
}

/// Well-formed linux release archive for the default tag
pub fn linux_archive() -> Vec<u8> {
    let entry = format!("{LINUX_BASENAME}/repeat");
    tar_gz(&[(entry.as_str(), FAKE_BINARY)])
}
