//! GitHub release download and archive extraction
//!
//! ## Module Organization
//!
//! - `platform` - Platform detection and release target selection
//! - `github` - GitHub API interaction for release discovery
//! - `core` - Artifact naming, scoped workspace and downloads
//! - `extract` - Archive extraction (tar.gz, zip) and payload validation

mod core;
mod extract;
mod github;
mod platform;

// Re-export public API
pub use self::core::{ArtifactSet, FetchedArtifacts, Workspace, build_client, fetch};
pub use extract::{ArchiveFormat, extract_archive, locate_binary};
pub use github::{extract_tag_name, latest_tag};
pub use platform::{Arch, Os, PlatformProfile};
