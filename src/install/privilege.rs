//! Writability probing and privilege escalation
//!
//! Installation targets such as `/usr/local/bin` are often root-owned. Each
//! filesystem mutation first probes whether the current user can write to the
//! relevant directory and only falls back to the configured elevation program
//! (normally `sudo`) when it cannot.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use super::error::InstallError;

/// How a filesystem mutation will be carried out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessMode {
    /// The current user can write the target directly
    Direct,
    /// The operation runs through the given elevation program
    Elevated(PathBuf),
}

impl AccessMode {
    /// Probe `dir` and pick an access mode for mutating it
    pub fn for_dir(dir: &Path, elevation: Option<&Path>) -> Result<Self, InstallError> {
        Self::choose(is_writable(dir), elevation, dir)
    }

    /// Pure selection logic: direct when writable, else elevated, else an error
    pub fn choose(
        writable: bool,
        elevation: Option<&Path>,
        target: &Path,
    ) -> Result<Self, InstallError> {
        if writable {
            return Ok(AccessMode::Direct);
        }
        match elevation {
            Some(program) => Ok(AccessMode::Elevated(program.to_path_buf())),
            None => Err(InstallError::InsufficientPermissions {
                path: target.to_path_buf(),
                reason: "not writable and no privilege escalation program is available".to_string(),
            }),
        }
    }
}

/// Check whether the current user may create entries in `dir`
#[cfg(unix)]
pub fn is_writable(dir: &Path) -> bool {
    use nix::unistd::{AccessFlags, access};

    access(dir, AccessFlags::W_OK).is_ok()
}

/// Check whether the current user may create entries in `dir`
#[cfg(not(unix))]
pub fn is_writable(dir: &Path) -> bool {
    std::fs::metadata(dir)
        .map(|meta| meta.is_dir() && !meta.permissions().readonly())
        .unwrap_or(false)
}

/// Locate the default elevation program on `PATH`
pub fn find_elevation_program() -> Option<PathBuf> {
    which::which("sudo").ok()
}

/// Run `cmd args...` through the elevation program
///
/// This blocks until the command exits; the elevation program may prompt
/// for credentials on the terminal.
pub fn run_elevated<I, S>(program: &Path, cmd: &str, args: I, target: &Path) -> Result<(), InstallError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    debug!(
        "Elevating via {}: {} {}",
        program.display(),
        cmd,
        args.iter()
            .map(|a| a.as_ref().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    );
    info!("Elevated privileges required for {} (you may be prompted for your password)", target.display());

    let status = Command::new(program)
        .arg(cmd)
        .args(&args)
        .status()
        .map_err(|e| InstallError::InsufficientPermissions {
            path: target.to_path_buf(),
            reason: format!("failed to run {}: {e}", program.display()),
        })?;

    if !status.success() {
        return Err(InstallError::InsufficientPermissions {
            path: target.to_path_buf(),
            reason: format!(
                "elevated `{cmd}` exited with code {}",
                status.code().unwrap_or(-1)
            ),
        });
    }

    Ok(())
}
