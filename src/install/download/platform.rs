//! Platform detection for release target selection

use std::path::{Path, PathBuf};

use log::debug;

use super::extract::ArchiveFormat;
use crate::install::error::InstallError;

/// Operating system families with published release targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Darwin,
    /// Native Windows or a POSIX emulation layer on top of it (MSYS, MinGW, Cygwin)
    Windows,
}

impl Os {
    fn parse(raw: &str) -> Result<Self, InstallError> {
        let lower = raw.to_ascii_lowercase();
        match lower.as_str() {
            "linux" => Ok(Os::Linux),
            "darwin" | "macos" => Ok(Os::Darwin),
            "windows" => Ok(Os::Windows),
            s if ["mingw", "msys", "cygwin"].iter().any(|p| s.starts_with(p)) => Ok(Os::Windows),
            _ => Err(InstallError::UnsupportedOperatingSystem(raw.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
        }
    }
}

/// Normalized CPU architectures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Aarch64,
}

impl Arch {
    fn parse(raw: &str) -> Result<Self, InstallError> {
        match raw.to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" => Ok(Arch::X86_64),
            "arm64" | "aarch64" => Ok(Arch::Aarch64),
            _ => Err(InstallError::UnsupportedArchitecture(raw.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
        }
    }
}

/// Everything about the host that decides which release asset to install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    pub os: Os,
    pub arch: Arch,
    pub target_triple: &'static str,
    pub archive_format: ArchiveFormat,
    pub binary_name: String,
    pub default_install_dir: PathBuf,
}

impl PlatformProfile {
    /// Detect the running platform
    pub fn resolve(app_name: &str) -> Result<Self, InstallError> {
        let home = dirs::home_dir();
        Self::from_parts(
            std::env::consts::OS,
            std::env::consts::ARCH,
            app_name,
            home.as_deref(),
        )
    }

    /// Build a profile from raw OS and architecture names
    ///
    /// Architecture is checked first, so an unknown CPU is reported even on an
    /// unknown OS. `home` is only consulted for targets whose default install
    /// directory is per-user.
    pub fn from_parts(
        os: &str,
        arch: &str,
        app_name: &str,
        home: Option<&Path>,
    ) -> Result<Self, InstallError> {
        let arch = Arch::parse(arch)?;
        let os_kind = Os::parse(os)?;

        let unsupported = || InstallError::UnsupportedPlatformCombination {
            os: os.to_string(),
            arch: arch.as_str().to_string(),
        };

        let profile = match (os_kind, arch) {
            (Os::Linux, Arch::X86_64) => Self::unix(os_kind, arch, "x86_64-unknown-linux-gnu", app_name),
            (Os::Linux, Arch::Aarch64) => Self::unix(os_kind, arch, "aarch64-unknown-linux-gnu", app_name),
            // No Intel macOS builds are published
            (Os::Darwin, Arch::Aarch64) => Self::unix(os_kind, arch, "aarch64-apple-darwin", app_name),
            (Os::Darwin, Arch::X86_64) => return Err(unsupported()),
            (Os::Windows, Arch::X86_64) => {
                // System paths need elevation on Windows, so default to the user's bin dir
                let home = home.ok_or(InstallError::HomeDirectoryMissing)?;
                PlatformProfile {
                    os: os_kind,
                    arch,
                    target_triple: "x86_64-pc-windows-msvc",
                    archive_format: ArchiveFormat::Zip,
                    binary_name: format!("{app_name}.exe"),
                    default_install_dir: home.join(".local").join("bin"),
                }
            }
            (Os::Windows, Arch::Aarch64) => return Err(unsupported()),
        };

        debug!(
            "Resolved platform {}/{} -> {}",
            profile.os.as_str(),
            profile.arch.as_str(),
            profile.target_triple
        );
        Ok(profile)
    }

    fn unix(os: Os, arch: Arch, target_triple: &'static str, app_name: &str) -> Self {
        PlatformProfile {
            os,
            arch,
            target_triple,
            archive_format: ArchiveFormat::TarGz,
            binary_name: app_name.to_string(),
            default_install_dir: PathBuf::from("/usr/local/bin"),
        }
    }

    /// Install directory, honouring an explicit override
    pub fn install_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_install_dir.clone())
    }
}
