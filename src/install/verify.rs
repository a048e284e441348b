//! SHA-256 integrity check of downloaded release archives

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};
use sha2::{Digest, Sha256};

use super::error::InstallError;

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Read the expected digest from a checksum sidecar
///
/// Only the first whitespace-delimited token is used; a trailing file name
/// (as written by `sha256sum`) is accepted but never required.
pub fn expected_digest(checksum_path: &Path) -> Result<String, InstallError> {
    let contents = std::fs::read_to_string(checksum_path).map_err(|e| {
        InstallError::MalformedChecksumFile {
            path: checksum_path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    contents
        .split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or_else(|| InstallError::MalformedChecksumFile {
            path: checksum_path.to_path_buf(),
            reason: "no digest found".to_string(),
        })
}

/// Lowercase hex SHA-256 of the file at `path`
pub fn sha256_file(path: &Path) -> Result<String, InstallError> {
    let unreadable = |source| InstallError::ArchiveUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(unreadable)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; READ_CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(unreadable)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Verify `archive_path` against the digest in `checksum_path`
///
/// Returns the verified digest. Comparison is exact and case-sensitive.
pub fn verify(archive_path: &Path, checksum_path: &Path) -> Result<String, InstallError> {
    let expected = expected_digest(checksum_path)?;
    let actual = sha256_file(archive_path)?;
    debug!("Expected digest {expected}, computed {actual}");

    if expected != actual {
        return Err(InstallError::ChecksumMismatch { expected, actual });
    }

    info!("Checksum verified for {}", archive_path.display());
    Ok(actual)
}
