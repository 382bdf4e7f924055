//! Staging area: wipe, recreate and populate a directory from a manifest

use crate::error::{PackagerError, Result};
use crate::manifest::{check_relative_path, Manifest};
use crate::report::Reporter;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// A scratch directory and the staging root inside it
///
/// The whole scratch directory belongs to one run and is deleted at the start
/// of the next one.
#[derive(Debug, Clone)]
pub struct StagingArea {
    scratch: PathBuf,
    root_name: String,
}

impl StagingArea {
    /// Stage into `scratch/<root_name>`
    pub fn new(scratch: impl Into<PathBuf>, root_name: impl Into<String>) -> Self {
        Self {
            scratch: scratch.into(),
            root_name: root_name.into(),
        }
    }

    pub fn scratch(&self) -> &Path {
        &self.scratch
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Directory the manifest is written into
    pub fn root(&self) -> PathBuf {
        self.scratch.join(&self.root_name)
    }

    /// Wipe the scratch directory and recreate it with an empty staging root
    pub async fn reset(&self) -> Result<()> {
        check_root_name(&self.root_name)?;
        reset_dir(&self.scratch).await?;

        let root = self.root();
        fs::create_dir_all(&root)
            .await
            .map_err(|source| PackagerError::ResetStaging { path: root, source })
    }
}

/// Delete `path` recursively if it exists, then create it empty.
///
/// A missing directory is not an error. Removal and creation failures are
/// both reported as [`PackagerError::ResetStaging`].
pub async fn reset_dir(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => debug!("removed previous staging directory {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(PackagerError::ResetStaging {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    fs::create_dir_all(path)
        .await
        .map_err(|source| PackagerError::ResetStaging {
            path: path.to_path_buf(),
            source,
        })
}

/// Reset the staging area and write every manifest entry into it.
///
/// Files are written first, in manifest order, then declared directories.
/// Returns the relative paths of the written files. On failure whatever was
/// already staged stays on disk; the next run wipes it.
pub async fn materialize(
    area: &StagingArea,
    manifest: &Manifest,
    reporter: &mut dyn Reporter,
) -> Result<Vec<String>> {
    let root = area.root();
    reporter.staging_started(&root);
    area.reset().await?;
    info!(
        "staging {} files and {} directories in {}",
        manifest.files.len(),
        manifest.directories.len(),
        root.display()
    );

    let mut written = Vec::with_capacity(manifest.files.len());

    for file in &manifest.files {
        let target_path = resolve(&root, &file.path)?;
        if let Some(parent) = target_path.parent() {
            create_dir(parent).await?;
        }

        fs::write(&target_path, file.content.as_bytes())
            .await
            .map_err(|source| PackagerError::WriteFile {
                path: target_path.clone(),
                source,
            })?;
        debug!("wrote {} ({} bytes)", file.path, file.content.len());

        reporter.file_written(&file.path);
        written.push(file.path.clone());
    }

    for dir in &manifest.directories {
        let target_path = resolve(&root, &dir.path)?;
        create_dir(&target_path).await?;
        debug!("ensured directory {}", dir.path);

        reporter.dir_created(dir.path.trim_end_matches('/'));
    }

    Ok(written)
}

/// Join a validated manifest path onto the staging root
fn resolve(root: &Path, relative: &str) -> Result<PathBuf> {
    check_relative_path(relative).map_err(|reason| PackagerError::invalid_path(relative, reason))?;
    Ok(relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment)))
}

async fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|source| PackagerError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
}

fn check_root_name(name: &str) -> Result<()> {
    check_relative_path(name).map_err(|reason| PackagerError::invalid_path(name, reason))?;
    if name.trim_end_matches('/').contains('/') {
        return Err(PackagerError::invalid_path(name, "root name must be a single segment"));
    }
    Ok(())
}
