//! Tar + gzip packaging of a staged tree
//!
//! Entries are written under a single top-level directory name, never under
//! the staging root's real location. Headers are written in deterministic mode
//! and the gzip header carries no timestamp, so the same staged tree always
//! produces the same bytes.

use crate::error::{PackagerError, Result};
use crate::manifest::Manifest;
use flate2::read::GzDecoder;
use flate2::{Compression, GzBuilder};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tar::{Builder, EntryType, HeaderMode};
use tracing::{debug, info};
use walkdir::WalkDir;

/// The finished archive on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveArtifact {
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
}

/// What kind of tar entry was read back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

/// One entry read back from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive, without a trailing slash
    pub path: String,
    pub kind: EntryKind,
    /// File body; empty for directories
    pub content: Vec<u8>,
}

/// Archive the tree under `staging_root` into a `.tar.gz` at `output`.
///
/// Every file and directory below `staging_root` is stored as
/// `<root_name>/<relative path>`, walked depth-first in file-name order with
/// directories ahead of their children. The data goes to `<output>.part`
/// first and is renamed onto `output` once flushed; a failed write removes
/// the partial file.
pub fn create_archive(staging_root: &Path, output: &Path, root_name: &str) -> Result<ArchiveArtifact> {
    let archive_err = |source: io::Error| PackagerError::Archive {
        path: output.to_path_buf(),
        source,
    };

    let partial = partial_path(output);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(archive_err)?;
    }

    let entries = match write_tar_gz(staging_root, &partial, root_name) {
        Ok(count) => count,
        Err(source) => {
            let _ = fs::remove_file(&partial);
            return Err(archive_err(source));
        }
    };

    fs::rename(&partial, output).map_err(|source| {
        let _ = fs::remove_file(&partial);
        archive_err(source)
    })?;
    let size = fs::metadata(output).map_err(archive_err)?.len();

    info!("wrote {} entries to {} ({} bytes)", entries, output.display(), size);
    Ok(ArchiveArtifact {
        path: output.to_path_buf(),
        size,
    })
}

fn write_tar_gz(staging_root: &Path, path: &Path, root_name: &str) -> io::Result<usize> {
    let file = File::create(path)?;
    let encoder = GzBuilder::new()
        .mtime(0)
        .operating_system(255)
        .write(file, Compression::best());

    let mut tar = Builder::new(encoder);
    tar.mode(HeaderMode::Deterministic);
    tar.follow_symlinks(false);

    let mut count = 0;
    for entry in WalkDir::new(staging_root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(staging_root)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let name = archive_name(root_name, relative);

        if entry.file_type().is_dir() {
            tar.append_dir(&name, entry.path())?;
        } else {
            tar.append_path_with_name(entry.path(), &name)?;
        }
        debug!("archived {}", name);
        count += 1;
    }

    let encoder = tar.into_inner()?;
    let file = encoder.finish()?;
    file.sync_all()?;
    Ok(count)
}

/// `<root_name>/<relative>` with forward slashes on every platform
fn archive_name(root_name: &str, relative: &Path) -> String {
    let mut name = root_name.trim_end_matches('/').to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            name.push('/');
            name.push_str(&part.to_string_lossy());
        }
    }
    name
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

/// Read every entry of a `.tar.gz` archive into memory.
///
/// Nothing is unpacked to disk.
pub fn list_entries(path: &Path) -> Result<Vec<ArchiveEntry>> {
    read_entries(path).map_err(|source| PackagerError::Verify {
        path: path.to_path_buf(),
        source,
    })
}

fn read_entries(path: &Path) -> io::Result<Vec<ArchiveEntry>> {
    let file = File::open(path)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    let mut entries = Vec::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?.to_string_lossy().trim_end_matches('/').to_string();
        let kind = match entry.header().entry_type() {
            EntryType::Regular | EntryType::Continuous => EntryKind::File,
            EntryType::Directory => EntryKind::Directory,
            _ => EntryKind::Other,
        };

        let mut content = Vec::new();
        if kind == EntryKind::File {
            entry.read_to_end(&mut content)?;
        }
        entries.push(ArchiveEntry {
            path: entry_path,
            kind,
            content,
        });
    }
    Ok(entries)
}

/// Check an archive against the manifest it was built from.
///
/// Every file must appear exactly once as `<root_name>/<path>` with identical
/// content, every declared directory must appear as a directory entry, and no
/// entry may sit outside `<root_name>/`.
pub fn verify_archive(path: &Path, root_name: &str, manifest: &Manifest) -> Result<()> {
    let entries = list_entries(path)?;
    let mismatch = |message: String| PackagerError::Verify {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, message),
    };

    let root = root_name.trim_end_matches('/');
    let prefix = format!("{}/", root);
    let mut by_path: HashMap<&str, Vec<&ArchiveEntry>> = HashMap::new();
    for entry in &entries {
        if !entry.path.starts_with(&prefix) {
            return Err(mismatch(format!("entry '{}' is outside '{}'", entry.path, prefix)));
        }
        by_path.entry(entry.path.as_str()).or_default().push(entry);
    }

    for file in &manifest.files {
        let expected = format!("{}{}", prefix, file.path);
        match by_path.get(expected.as_str()).map(Vec::as_slice) {
            Some([entry]) if entry.kind == EntryKind::File => {
                if entry.content != file.content.as_bytes() {
                    return Err(mismatch(format!("content of '{}' differs", expected)));
                }
            }
            Some([_]) => return Err(mismatch(format!("'{}' is not a regular file", expected))),
            Some(dupes) if dupes.len() > 1 => {
                return Err(mismatch(format!("'{}' appears {} times", expected, dupes.len())))
            }
            _ => return Err(mismatch(format!("'{}' is missing", expected))),
        }
    }

    for dir in &manifest.directories {
        let expected = format!("{}{}", prefix, dir.path.trim_end_matches('/'));
        let present = by_path
            .get(expected.as_str())
            .is_some_and(|found| found.iter().any(|e| e.kind == EntryKind::Directory));
        if !present {
            return Err(mismatch(format!("directory '{}' is missing", expected)));
        }
    }

    debug!("verified {} entries in {}", entries.len(), path.display());
    Ok(())
}
