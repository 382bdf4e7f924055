//! Package configuration trait for generator binaries
//!
//! Each starter kit implements this trait to describe what it ships:
//! - Package identity (name, display name, version)
//! - The manifest of files and directories
//! - The archive root and default archive name
//! - Post-generation instructions

use crate::manifest::Manifest;
use crate::version;
use std::path::{Path, PathBuf};

/// Configuration trait for different starter kits
pub trait PackageConfig: Clone + Send + Sync + 'static {
    /// Package identity, used for the archive root and default file names
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Package version; semver is normalized, anything else is used verbatim
    fn version(&self) -> &'static str;

    /// The files and directories that make up the package.
    ///
    /// Must return the same manifest on every call.
    fn manifest(&self) -> Manifest;

    /// Top-level directory name inside the archive
    fn root_name(&self) -> &'static str {
        self.name()
    }

    /// Archive file name used when the caller does not pick one
    fn default_output_name(&self) -> String {
        version::archive_file_name(self.name(), self.version())
    }

    /// Scratch directory used when the caller does not pick one
    fn default_staging_dir(&self) -> PathBuf {
        std::env::temp_dir().join(format!("{}-package", self.name()))
    }

    /// Instructions shown once the archive exists
    fn next_steps(&self, archive: &Path) -> Vec<String> {
        vec![
            format!("tar -xzf {}", archive.display()),
            format!("cd {}", self.root_name()),
        ]
    }
}
