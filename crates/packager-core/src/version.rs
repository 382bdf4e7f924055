//! Package version normalization

use semver::Version;

/// Parse a version string, accepting an optional leading `v`
pub fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.strip_prefix('v').unwrap_or(version_str);
    Version::parse(cleaned).ok()
}

/// Canonical form of a version for use in file names.
///
/// Valid semver is printed in its canonical form without a `v` prefix;
/// anything else is used verbatim.
pub fn normalize_version(version_str: &str) -> String {
    match parse_version(version_str) {
        Some(v) => v.to_string(),
        None => version_str.to_string(),
    }
}

/// `<name>-<version>.tar.gz`
pub fn archive_file_name(name: &str, version: &str) -> String {
    format!("{}-{}.tar.gz", name, normalize_version(version))
}
