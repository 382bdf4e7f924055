//! The pipewire-go starter kit: identity and embedded skeleton
//!
//! Template bodies live under `templates/pipewire-go/` at the workspace root
//! and are compiled in with [`include_str!`]. `gitignore` is stored without
//! its dot so it does not act on the template directory itself.

use packager_core::{Manifest, PackageConfig};
use std::path::Path;

pub const GO_MOD: &str = include_str!("../../../templates/pipewire-go/go.mod");
pub const GITIGNORE: &str = include_str!("../../../templates/pipewire-go/gitignore");
pub const LICENSE: &str = include_str!("../../../templates/pipewire-go/LICENSE");
pub const MAKEFILE: &str = include_str!("../../../templates/pipewire-go/Makefile");

/// Destination path → content, in generation order
pub const FILES: &[(&str, &str)] = &[
    ("go.mod", GO_MOD),
    (".gitignore", GITIGNORE),
    ("LICENSE", LICENSE),
    ("Makefile", MAKEFILE),
];

/// Empty directories for future library modules and commands
pub const DIRECTORIES: &[&str] = &[
    "spa",
    "core",
    "client",
    "verbose",
    "examples",
    "cmd/pw-tui",
    "cmd/pw-gui",
];

/// pipewire-go package configuration
#[derive(Clone)]
pub struct PipewireGoConfig;

impl PackageConfig for PipewireGoConfig {
    fn name(&self) -> &'static str {
        "pipewire-go"
    }

    fn display_name(&self) -> &'static str {
        "PipeWire Go Library"
    }

    fn version(&self) -> &'static str {
        "0.1.0-dev"
    }

    fn manifest(&self) -> Manifest {
        Manifest::builder()
            .files(FILES.iter().copied())
            .dirs(DIRECTORIES.iter().copied())
            .build()
    }

    fn next_steps(&self, archive: &Path) -> Vec<String> {
        vec![
            format!("tar -xzf {}", archive.display()),
            format!("cd {}", self.root_name()),
            "make help".to_string(),
        ]
    }
}
