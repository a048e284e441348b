//! Installation pipeline runner
//!
//! Drives the stages strictly in order: platform → release → download →
//! verify → install. The first error aborts the run. Hashing, extraction and
//! the final copy run on the blocking pool so the runtime keeps servicing
//! timers and signals while they work.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use termcolor::{Color, ColorSpec, WriteColor};

use super::download::{self, ArtifactSet, PlatformProfile, Workspace};
use super::error::InstallError;
use super::placement;
use super::verify;
use crate::config::InstallConfig;

/// Summary of a completed installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub tag: String,
    pub target_triple: String,
    pub destination: PathBuf,
    pub digest: String,
}

/// Install the latest release for the running platform
pub async fn run_install<W: WriteColor>(
    config: &InstallConfig,
    out: &mut W,
) -> Result<InstallReport, InstallError> {
    let profile = PlatformProfile::resolve(&config.app_name)?;
    run_pipeline(profile, config, out).await
}

/// Install the latest release for an explicit OS/architecture pair
pub async fn run_install_on<W: WriteColor>(
    os: &str,
    arch: &str,
    config: &InstallConfig,
    out: &mut W,
) -> Result<InstallReport, InstallError> {
    let home = dirs::home_dir();
    let profile = PlatformProfile::from_parts(os, arch, &config.app_name, home.as_deref())?;
    run_pipeline(profile, config, out).await
}

async fn run_pipeline<W: WriteColor>(
    profile: PlatformProfile,
    config: &InstallConfig,
    out: &mut W,
) -> Result<InstallReport, InstallError> {
    stage(out, &format!("Platform: {}", profile.target_triple));

    let client = download::build_client(&config.repo)?;
    let tag = download::latest_tag(&client, &config.api_base, &config.repo).await?;
    stage(out, &format!("Latest release: {tag}"));

    let artifacts = ArtifactSet::new(&config.app_name, &tag, &profile);
    // Blocking tasks hold a clone, so the directory outlives any task still running
    let workspace = Arc::new(Workspace::create(config.workspace_root.as_deref())?);
    let abandoned = AbandonFlag::default();

    stage(out, &format!("Downloading {}", artifacts.archive_name));
    let fetched = download::fetch(
        &client,
        &workspace,
        &artifacts,
        &config.download_base,
        &config.repo,
        &tag,
    )
    .await?;

    stage(out, "Verifying checksum");
    let digest = {
        let workspace = Arc::clone(&workspace);
        let fetched = fetched.clone();
        run_blocking("verify", move || {
            let _workspace = workspace;
            verify::verify(&fetched.archive, &fetched.checksum)
        })
        .await?
    };

    let install_dir = profile.install_dir(config.install_dir.as_deref());
    stage(out, &format!("Installing to {}", install_dir.display()));
    let destination = {
        let workspace = Arc::clone(&workspace);
        let artifacts = artifacts.clone();
        let archive = fetched.archive.clone();
        let install_dir = install_dir.clone();
        let elevation = config.elevation.clone();
        let abandoned = abandoned.watch();
        run_blocking("install", move || {
            let source = placement::unpack_binary(&workspace, &artifacts, &archive)?;
            if abandoned.load(Ordering::SeqCst) {
                return Err(InstallError::Interrupted);
            }
            placement::install_binary(
                &source,
                &install_dir,
                &artifacts.binary_name,
                elevation.as_deref(),
            )
        })
        .await?
    };

    match Arc::try_unwrap(workspace) {
        Ok(workspace) => {
            if let Err(e) = workspace.close() {
                warn!("Failed to remove temporary workspace: {e}");
            }
        }
        Err(_) => debug!("Workspace still shared; removing it on drop"),
    }

    if !dir_on_path(&install_dir) {
        warn!(
            "{} is not on your PATH; add it with: export PATH=\"{}:$PATH\"",
            install_dir.display(),
            install_dir.display()
        );
    }

    done(out, &format!("Installed {} {tag} to {}", config.app_name, destination.display()));
    info!("Installation of {tag} complete");

    Ok(InstallReport {
        tag,
        target_triple: profile.target_triple.to_string(),
        destination,
        digest,
    })
}

/// Run a synchronous pipeline step on the blocking pool
async fn run_blocking<T, F>(stage: &'static str, task: F) -> Result<T, InstallError>
where
    F: FnOnce() -> Result<T, InstallError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| InstallError::BackgroundTask {
            stage,
            reason: e.to_string(),
        })?
}

/// Raised when the pipeline future is dropped before it finishes
///
/// A blocking task that outlives the pipeline checks it before making any
/// change outside the workspace.
#[derive(Debug, Default)]
struct AbandonFlag(Arc<AtomicBool>);

impl AbandonFlag {
    fn watch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

impl Drop for AbandonFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Whether `dir` appears in the `PATH` environment variable
pub fn dir_on_path(dir: &Path) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|p| p == dir))
        .unwrap_or(false)
}

fn stage<W: WriteColor>(out: &mut W, message: &str) {
    let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
    let _ = write!(out, "==> ");
    let _ = out.reset();
    let _ = writeln!(out, "{message}");
}

fn done<W: WriteColor>(out: &mut W, message: &str) {
    let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = writeln!(out, "✓ {message}");
    let _ = out.reset();
}
