//! Installer for `repeat`
//!
//! Detects the host platform, resolves the latest published release,
//! downloads and checksum-verifies the archive, and installs the binary into
//! a directory on the PATH, escalating privileges only when required.

pub mod config;
pub mod install;

pub use config::InstallConfig;
pub use install::{InstallError, InstallReport, run_install, run_install_on};
