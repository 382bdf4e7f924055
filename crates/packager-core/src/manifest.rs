//! Manifest types: the files and directories that make up a package

use serde::Serialize;
use std::collections::HashSet;

/// A file to write into the staging root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Forward-slash path relative to the staging root
    pub path: String,

    /// Full file body
    pub content: String,
}

/// A directory to create even if no file lands in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    /// Forward-slash path relative to the staging root
    pub path: String,
}

/// Ordered description of everything a package contains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    /// Files, in insertion order
    pub files: Vec<FileEntry>,

    /// Directories, in insertion order
    pub directories: Vec<DirEntry>,
}

impl Manifest {
    pub fn builder() -> ManifestBuilder {
        ManifestBuilder::default()
    }

    /// Look up a file's content by its relative path
    pub fn file(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.content.as_str())
    }

    /// Check if a directory was declared explicitly
    pub fn has_dir(&self, path: &str) -> bool {
        self.directories.iter().any(|d| d.path == path)
    }

    /// Every directory the staged tree will contain: declared ones plus the
    /// ancestors of files and declared directories. Sorted, no duplicates.
    pub fn implied_dirs(&self) -> Vec<String> {
        let mut dirs: Vec<String> = self
            .files
            .iter()
            .flat_map(|f| ancestors(&f.path))
            .chain(self.directories.iter().flat_map(|d| {
                let mut all = ancestors(&d.path);
                all.push(d.path.trim_end_matches('/').to_string());
                all
            }))
            .collect();
        dirs.sort();
        dirs.dedup();
        dirs
    }

    /// List invariant violations: bad paths and duplicate file paths.
    ///
    /// Returns an empty list for a well-formed manifest.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();

        for file in &self.files {
            if let Err(reason) = check_relative_path(&file.path) {
                problems.push(format!("file '{}': {}", file.path, reason));
            }
            if !seen.insert(file.path.as_str()) {
                problems.push(format!("file '{}': duplicate path", file.path));
            }
        }
        for dir in &self.directories {
            if let Err(reason) = check_relative_path(&dir.path) {
                problems.push(format!("directory '{}': {}", dir.path, reason));
            }
            if seen.contains(dir.path.trim_end_matches('/')) {
                problems.push(format!("directory '{}': already a file", dir.path));
            }
        }

        problems
    }
}

/// Incrementally assembles a [`Manifest`]
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    manifest: Manifest,
}

impl ManifestBuilder {
    /// Add a file with its full content
    pub fn file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.manifest.files.push(FileEntry {
            path: path.into(),
            content: content.into(),
        });
        self
    }

    /// Add several files at once, keeping their order
    pub fn files<P, C>(mut self, entries: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<String>,
        C: Into<String>,
    {
        for (path, content) in entries {
            self = self.file(path, content);
        }
        self
    }

    /// Add a directory that must exist even when empty
    pub fn dir(mut self, path: impl Into<String>) -> Self {
        self.manifest.directories.push(DirEntry { path: path.into() });
        self
    }

    /// Add several directories at once, keeping their order
    pub fn dirs<P: Into<String>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        for path in paths {
            self = self.dir(path);
        }
        self
    }

    pub fn build(self) -> Manifest {
        self.manifest
    }
}

/// Validate a manifest path: non-empty, relative, forward-slash, and free of
/// `.`/`..`/empty segments. A single trailing slash is tolerated.
pub fn check_relative_path(path: &str) -> Result<(), &'static str> {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Err("empty path");
    }
    if trimmed.starts_with('/') || trimmed.contains('\\') || has_drive_prefix(trimmed) {
        return Err("absolute or non forward-slash path");
    }
    for segment in trimmed.split('/') {
        match segment {
            "" => return Err("empty path segment"),
            "." => return Err("current-directory segment"),
            ".." => return Err("parent traversal"),
            _ => {}
        }
    }
    Ok(())
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Proper ancestors of a relative path, shortest first
fn ancestors(path: &str) -> Vec<String> {
    let trimmed = path.trim_end_matches('/');
    let mut out = Vec::new();
    for (idx, ch) in trimmed.char_indices() {
        if ch == '/' {
            out.push(trimmed[..idx].to_string());
        }
    }
    out
}
