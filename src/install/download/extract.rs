//! Release archive extraction and payload validation
//!
//! Handles unpacking `.tar.gz` and `.zip` release archives and locating the
//! binary inside the archive's payload directory.

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::debug;
use tar::Archive;
use zip::ZipArchive;

use crate::install::error::InstallError;

/// Archive formats published for release targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl ArchiveFormat {
    /// File extension used in release asset names (without the leading dot)
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::Zip => "zip",
        }
    }

    /// Determine the format from an archive file name
    pub fn from_path(path: &Path) -> Result<Self, InstallError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| InstallError::UnsupportedArchiveFormat(path.display().to_string()))?;

        [ArchiveFormat::TarGz, ArchiveFormat::Zip]
            .into_iter()
            .find(|format| name.ends_with(&format!(".{}", format.extension())))
            .ok_or_else(|| InstallError::UnsupportedArchiveFormat(name.to_string()))
    }
}

/// Extract an archive into `dest`, dispatching on the archive's extension
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<(), InstallError> {
    let format = ArchiveFormat::from_path(archive_path)?;
    debug!("Extracting {} ({:?}) into {}", archive_path.display(), format, dest.display());

    let fail = |reason: String| InstallError::ExtractionFailed {
        archive: archive_path.to_path_buf(),
        reason,
    };

    std::fs::create_dir_all(dest).map_err(|e| fail(format!("cannot create {}: {e}", dest.display())))?;

    match format {
        ArchiveFormat::TarGz => unpack_tar_gz(archive_path, dest).map_err(fail),
        ArchiveFormat::Zip => unpack_zip(archive_path, dest).map_err(fail),
    }
}

/// Streaming gzip decode piped straight into the tar reader
fn unpack_tar_gz(archive_path: &Path, dest: &Path) -> Result<(), String> {
    let file = File::open(archive_path).map_err(|e| e.to_string())?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive.unpack(dest).map_err(|e| e.to_string())
}

fn unpack_zip(archive_path: &Path, dest: &Path) -> Result<(), String> {
    let file = File::open(archive_path).map_err(|e| e.to_string())?;
    let mut archive = ZipArchive::new(file).map_err(|e| e.to_string())?;
    archive.extract(dest).map_err(|e| e.to_string())
}

/// Locate `{payload_dir}/{binary_name}` under the extraction root
///
/// The payload directory must be named exactly as the precomputed basename,
/// so an archive whose layout drifted from the naming convention is reported
/// as such instead of surfacing as a generic I/O error later on.
pub fn locate_binary(
    extract_root: &Path,
    payload_dir: &str,
    binary_name: &str,
) -> Result<PathBuf, InstallError> {
    let payload = extract_root.join(payload_dir);
    if !payload.is_dir() {
        return Err(InstallError::PayloadDirectoryMissing {
            name: payload_dir.to_string(),
        });
    }

    let binary = payload.join(binary_name);
    if !binary.is_file() {
        return Err(InstallError::BinaryNotFound {
            name: binary_name.to_string(),
            dir: payload,
        });
    }

    Ok(binary)
}
