//! Installer error taxonomy
//!
//! Every variant is fatal. Errors propagate straight to the top of the
//! pipeline, which reports the failing stage and exits non-zero.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the installation pipeline
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    #[error("unsupported operating system: {0}")]
    UnsupportedOperatingSystem(String),

    #[error("unsupported platform combination: {os}/{arch} (no release is published for it)")]
    UnsupportedPlatformCombination { os: String, arch: String },

    #[error("could not determine the home directory for the default install location")]
    HomeDirectoryMissing,

    #[error("release lookup for {repo} failed: {reason}")]
    ReleaseLookupFailed { repo: String, reason: String },

    #[error("no release found for {repo}")]
    NoReleaseFound { repo: String },

    #[error("could not create temporary workspace: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("failed to download {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("malformed checksum file {}: {reason}", path.display())]
    MalformedChecksumFile { path: PathBuf, reason: String },

    #[error("could not read archive {}", path.display())]
    ArchiveUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("checksum mismatch: expected {expected}, computed {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("unsupported archive format: {0}")]
    UnsupportedArchiveFormat(String),

    #[error("failed to extract {}: {reason}", archive.display())]
    ExtractionFailed { archive: PathBuf, reason: String },

    #[error("archive does not contain the expected directory {name}")]
    PayloadDirectoryMissing { name: String },

    #[error("binary {name} not found in {}", dir.display())]
    BinaryNotFound { name: String, dir: PathBuf },

    #[error("insufficient permissions for {}: {reason}", path.display())]
    InsufficientPermissions { path: PathBuf, reason: String },

    #[error("installation interrupted before the binary was placed")]
    Interrupted,

    #[error("{stage} task did not complete: {reason}")]
    BackgroundTask { stage: &'static str, reason: String },
}

impl InstallError {
    /// Pipeline stage the error originated from, used in diagnostics
    pub fn stage(&self) -> &'static str {
        match self {
            Self::UnsupportedArchitecture(_)
            | Self::UnsupportedOperatingSystem(_)
            | Self::UnsupportedPlatformCombination { .. }
            | Self::HomeDirectoryMissing => "platform",
            Self::ReleaseLookupFailed { .. } | Self::NoReleaseFound { .. } => "release",
            Self::Workspace(_) => "workspace",
            Self::DownloadFailed { .. } => "download",
            Self::MalformedChecksumFile { .. }
            | Self::ArchiveUnreadable { .. }
            | Self::ChecksumMismatch { .. } => "verify",
            Self::UnsupportedArchiveFormat(_)
            | Self::ExtractionFailed { .. }
            | Self::PayloadDirectoryMissing { .. }
            | Self::BinaryNotFound { .. }
            | Self::InsufficientPermissions { .. }
            | Self::Interrupted => "install",
            Self::BackgroundTask { stage, .. } => *stage,
        }
    }
}
