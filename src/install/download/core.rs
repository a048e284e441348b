//! Release artifact naming, workspace ownership and download

use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

use super::platform::PlatformProfile;
use crate::install::error::InstallError;

const USER_AGENT: &str = concat!("repeat-install/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by release lookup and downloads
pub fn build_client(repo: &str) -> Result<reqwest::Client, InstallError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| InstallError::ReleaseLookupFailed {
            repo: repo.to_string(),
            reason: format!("could not build HTTP client: {e}"),
        })
}

/// Names of every file involved in one release, derived from fixed conventions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    /// `{app}-{tag}-{target}`, also the payload directory inside the archive
    pub basename: String,
    pub archive_name: String,
    pub checksum_name: String,
    pub binary_name: String,
}

impl ArtifactSet {
    pub fn new(app_name: &str, tag: &str, profile: &PlatformProfile) -> Self {
        let basename = format!("{app_name}-{tag}-{}", profile.target_triple);
        let archive_name = format!("{basename}.{}", profile.archive_format.extension());
        let checksum_name = format!("{archive_name}.sha256");
        Self {
            basename,
            archive_name,
            checksum_name,
            binary_name: profile.binary_name.clone(),
        }
    }

    /// Payload directory name expected at the archive root
    pub fn payload_dir(&self) -> &str {
        &self.basename
    }

    pub fn archive_url(&self, download_base: &str, repo: &str, tag: &str) -> String {
        release_download_url(download_base, repo, tag, &self.archive_name)
    }

    pub fn checksum_url(&self, download_base: &str, repo: &str, tag: &str) -> String {
        release_download_url(download_base, repo, tag, &self.checksum_name)
    }
}

fn release_download_url(download_base: &str, repo: &str, tag: &str, file: &str) -> String {
    format!(
        "{}/{}/releases/download/{}/{}",
        download_base.trim_end_matches('/'),
        repo,
        tag,
        file
    )
}

/// Exclusively-owned scratch directory for downloads and extraction
///
/// The directory is removed when the workspace is dropped, which covers
/// success, early returns through `?`, and the pipeline future being dropped
/// on interrupt.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace, under `root` when given, else the system temp dir
    pub fn create(root: Option<&Path>) -> Result<Self, InstallError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("repeat-install-");
        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(InstallError::Workspace)?;

        debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory archives are unpacked into
    pub fn extract_dir(&self) -> PathBuf {
        self.dir.path().join("extracted")
    }

    /// Remove the workspace now, reporting (rather than ignoring) cleanup failures
    pub fn close(self) -> std::io::Result<()> {
        self.dir.close()
    }
}

/// Paths of the downloaded archive and its checksum sidecar
#[derive(Debug, Clone)]
pub struct FetchedArtifacts {
    pub archive: PathBuf,
    pub checksum: PathBuf,
}

/// Download the release archive and its `.sha256` sidecar into the workspace
pub async fn fetch(
    client: &reqwest::Client,
    workspace: &Workspace,
    artifacts: &ArtifactSet,
    download_base: &str,
    repo: &str,
    tag: &str,
) -> Result<FetchedArtifacts, InstallError> {
    let archive = workspace.path().join(&artifacts.archive_name);
    let checksum = workspace.path().join(&artifacts.checksum_name);

    let archive_url = artifacts.archive_url(download_base, repo, tag);
    info!("Downloading {}", artifacts.archive_name);
    download_to(client, &archive_url, &archive).await?;

    let checksum_url = artifacts.checksum_url(download_base, repo, tag);
    info!("Downloading {}", artifacts.checksum_name);
    download_to(client, &checksum_url, &checksum).await?;

    Ok(FetchedArtifacts { archive, checksum })
}

/// Stream a single URL to `dest`, failing on transport errors and non-2xx responses
async fn download_to(client: &reqwest::Client, url: &str, dest: &Path) -> Result<(), InstallError> {
    let failed = |reason: String| InstallError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    debug!("GET {url}");
    // Redirect loops surface here once reqwest's redirect limit is exhausted
    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| failed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(failed(format!("HTTP {status}")));
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| failed(format!("cannot create {}: {e}", dest.display())))?;

    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await.map_err(|e| failed(e.to_string()))? {
        file.write_all(&chunk)
            .await
            .map_err(|e| failed(format!("cannot write {}: {e}", dest.display())))?;
        written += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| failed(format!("cannot write {}: {e}", dest.display())))?;

    debug!("Wrote {written} bytes to {}", dest.display());
    Ok(())
}
