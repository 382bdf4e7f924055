//! The generation pipeline: manifest → staging → archive → report

use crate::archive::{self, ArchiveArtifact};
use crate::error::{PackagerError, Result};
use crate::product::PackageConfig;
use crate::report::{ConsoleReporter, Reporter};
use crate::staging::{self, StagingArea};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Per-run options
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Scratch directory to stage in; falls back to the package default
    pub staging_dir: Option<PathBuf>,

    /// Read the archive back and compare it with the manifest
    pub verify: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            staging_dir: None,
            verify: true,
        }
    }
}

/// Runs the pipeline for one package
pub struct Generator<C: PackageConfig> {
    config: C,
    options: GenerateOptions,
}

impl<C: PackageConfig> Generator<C> {
    pub fn new(config: C, options: GenerateOptions) -> Self {
        Self { config, options }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Where this generator stages files
    pub fn staging_area(&self) -> StagingArea {
        let scratch = self
            .options
            .staging_dir
            .clone()
            .unwrap_or_else(|| self.config.default_staging_dir());
        StagingArea::new(scratch, self.config.root_name())
    }

    /// Stage the manifest and package it into `output`, or into the package's
    /// default archive name when `output` is `None`.
    ///
    /// Any I/O failure aborts the run. Staging failures happen before the
    /// archive is touched, so no archive file is created for them.
    pub async fn generate(
        &self,
        output: Option<&Path>,
        reporter: &mut dyn Reporter,
    ) -> Result<ArchiveArtifact> {
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(self.config.default_output_name()));
        let manifest = self.config.manifest();
        let area = self.staging_area();

        info!(
            "generating {} {} into {}",
            self.config.display_name(),
            self.config.version(),
            output.display()
        );
        staging::materialize(&area, &manifest, reporter).await?;

        reporter.archive_started(&output);
        let root = area.root();
        let root_name = area.root_name().to_string();
        let verify = self.options.verify;
        let archive_path = output.clone();

        let artifact = tokio::task::spawn_blocking(move || {
            let artifact = archive::create_archive(&root, &archive_path, &root_name)?;
            if verify {
                if let Err(e) = archive::verify_archive(&artifact.path, &root_name, &manifest) {
                    let _ = std::fs::remove_file(&artifact.path);
                    return Err(e);
                }
            }
            Ok::<_, PackagerError>(artifact)
        })
        .await
        .map_err(|e| PackagerError::Archive {
            path: output.clone(),
            source: io::Error::other(e),
        })??;

        reporter.archive_finished(&artifact);
        Ok(artifact)
    }
}

/// Generate a package with default options, printing progress to stdout
pub async fn generate<C: PackageConfig>(
    config: C,
    output: Option<&Path>,
) -> Result<ArchiveArtifact> {
    Generator::new(config, GenerateOptions::default())
        .generate(output, &mut ConsoleReporter)
        .await
}
