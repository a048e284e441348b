//! Extraction of the verified archive and placement of the binary
//!
//! Directory creation and the final copy both go through [`AccessMode`]:
//! direct when the user can write, elevated otherwise.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::download::{ArtifactSet, Workspace, extract_archive, locate_binary};
use super::error::InstallError;
use super::privilege::{AccessMode, run_elevated};

/// Final location of the installed binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub destination_dir: PathBuf,
    pub destination_path: PathBuf,
}

impl InstallTarget {
    pub fn new(install_dir: &Path, binary_name: &str) -> Self {
        Self {
            destination_dir: install_dir.to_path_buf(),
            destination_path: install_dir.join(binary_name),
        }
    }
}

/// Extract `archive` into the workspace and locate the binary in its payload
pub fn unpack_binary(
    workspace: &Workspace,
    artifacts: &ArtifactSet,
    archive: &Path,
) -> Result<PathBuf, InstallError> {
    let extract_root = workspace.extract_dir();
    extract_archive(archive, &extract_root)?;
    let source = locate_binary(&extract_root, artifacts.payload_dir(), &artifacts.binary_name)?;
    debug!("Found binary at {}", source.display());
    Ok(source)
}

/// Copy an unpacked binary into `install_dir`, creating the directory if needed
///
/// Returns the destination path. Re-running with the same inputs overwrites
/// the destination with identical content and permissions.
pub fn install_binary(
    source: &Path,
    install_dir: &Path,
    binary_name: &str,
    elevation: Option<&Path>,
) -> Result<PathBuf, InstallError> {
    let target = InstallTarget::new(install_dir, binary_name);
    prepare_directory(&target.destination_dir, elevation)?;
    place_binary(source, &target, elevation)?;

    info!("Installed {}", target.destination_path.display());
    Ok(target.destination_path)
}

/// Create `dir` if it does not exist yet
///
/// Writability is judged on the immediate parent, the directory the new
/// entry is created in.
pub fn prepare_directory(dir: &Path, elevation: Option<&Path>) -> Result<(), InstallError> {
    if dir.is_dir() {
        return Ok(());
    }

    let mode = AccessMode::for_dir(creation_parent(dir), elevation)?;
    create_directory(dir, &mode)
}

/// Directory a new `dir` entry is created in
///
/// A bare relative name like `bin` has an empty parent, which is the
/// working directory.
fn creation_parent(dir: &Path) -> &Path {
    match dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => dir,
    }
}

/// Create `dir` using an already selected access mode
pub fn create_directory(dir: &Path, mode: &AccessMode) -> Result<(), InstallError> {
    info!("Creating {}", dir.display());
    match mode {
        AccessMode::Direct => fs::create_dir_all(dir).map_err(|e| InstallError::InsufficientPermissions {
            path: dir.to_path_buf(),
            reason: format!("failed to create directory: {e}"),
        }),
        AccessMode::Elevated(program) => {
            run_elevated(program, "mkdir", [OsStr::new("-p"), dir.as_os_str()], dir)
        }
    }
}

/// Copy `source` to the target path with mode 755
pub fn place_binary(
    source: &Path,
    target: &InstallTarget,
    elevation: Option<&Path>,
) -> Result<(), InstallError> {
    let mode = AccessMode::for_dir(&target.destination_dir, elevation)?;
    copy_executable(source, &target.destination_path, &mode)
}

/// Copy `source` to `dest` and mark it executable using an already selected access mode
pub fn copy_executable(source: &Path, dest: &Path, mode: &AccessMode) -> Result<(), InstallError> {
    match mode {
        AccessMode::Direct => copy_direct(source, dest),
        AccessMode::Elevated(program) => {
            run_elevated(
                program,
                "cp",
                [OsStr::new("-f"), source.as_os_str(), dest.as_os_str()],
                dest,
            )?;
            run_elevated(program, "chmod", [OsStr::new("755"), dest.as_os_str()], dest)
        }
    }
}

fn copy_direct(source: &Path, dest: &Path) -> Result<(), InstallError> {
    let denied = |action: &str, e: std::io::Error| InstallError::InsufficientPermissions {
        path: dest.to_path_buf(),
        reason: format!("failed to {action}: {e}"),
    };

    fs::copy(source, dest).map_err(|e| denied("copy binary", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(dest)
            .map_err(|e| denied("read metadata", e))?
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(dest, perms).map_err(|e| denied("set permissions", e))?;
    }

    Ok(())
}
