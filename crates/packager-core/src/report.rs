//! Progress reporting
//!
//! Reporters only observe the pipeline. Nothing they do can change what ends
//! up in the archive.

use crate::archive::ArchiveArtifact;
use colored::Colorize;
use std::path::Path;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Hooks called as the pipeline progresses
pub trait Reporter: Send {
    /// Staging is about to start at `root`
    fn staging_started(&mut self, _root: &Path) {}

    /// A manifest file was written
    fn file_written(&mut self, _path: &str) {}

    /// A declared directory was ensured
    fn dir_created(&mut self, _path: &str) {}

    /// The archive is about to be written to `output`
    fn archive_started(&mut self, _output: &Path) {}

    /// The archive was written and flushed
    fn archive_finished(&mut self, _artifact: &ArchiveArtifact) {}
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Prints coloured progress lines to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn staging_started(&mut self, root: &Path) {
        println!(
            "{} {}",
            "Creating file structure in".cyan().bold(),
            root.display()
        );
    }

    fn file_written(&mut self, path: &str) {
        println!("  {} {}", "+".green(), path);
    }

    fn dir_created(&mut self, path: &str) {
        println!("  {} {}/", "+".blue(), path);
    }

    fn archive_started(&mut self, output: &Path) {
        println!();
        println!(
            "{} {}",
            "Creating archive:".cyan().bold(),
            output.display()
        );
    }

    fn archive_finished(&mut self, artifact: &ArchiveArtifact) {
        println!(
            "{} {}",
            "Archive created:".green().bold(),
            artifact.path.display()
        );
        println!("  Size: {} MB", format_mib(artifact.size));
    }
}

/// Format a byte count as mebibytes with two decimals
pub fn format_mib(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_MIB)
}
