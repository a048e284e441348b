//! Release installation pipeline
//!
//! Resolves the host platform, finds the latest release, downloads and
//! verifies its archive, then places the binary on the PATH.

pub mod download;
mod error;
pub mod placement;
pub mod privilege;
mod runners;
pub mod verify;

pub use error::InstallError;
pub use privilege::{AccessMode, find_elevation_program};
pub use runners::{InstallReport, dir_on_path, run_install, run_install_on};
