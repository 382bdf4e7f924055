//! Packager Core - Shared library for starter-kit generators
//!
//! This library materializes a fixed project skeleton onto disk and packages it
//! into a single `.tar.gz` archive. It is designed to be used by small generator
//! binaries that each describe one starter kit through [`PackageConfig`].
//!
//! # Architecture
//!
//! The pipeline is a strict linear sequence:
//!
//! - **Manifest** - Pure, ordered description of files and empty directories
//! - **Staging** - Wipe the scratch directory, then write the manifest into it
//! - **Archive** - Walk the staged tree into a deterministic tar.gz rooted
//!   under the package name, optionally reading it back to verify
//! - **Report** - Observational progress lines; never affects the output
//!
//! # Example Usage
//!
//! ```ignore
//! use packager_core::{Generator, GenerateOptions, Manifest, PackageConfig, SilentReporter};
//!
//! #[derive(Clone)]
//! struct MyKit;
//! impl PackageConfig for MyKit {
//!     fn name(&self) -> &'static str { "mykit" }
//!     fn manifest(&self) -> Manifest {
//!         Manifest::builder().file("README.md", "# mykit\n").dir("src").build()
//!     }
//!     // ... implement other methods
//! }
//!
//! let options = GenerateOptions { staging_dir: Some(tmp), ..Default::default() };
//! let artifact = Generator::new(MyKit, options)
//!     .generate(None, &mut SilentReporter)
//!     .await?;
//! ```

pub mod archive;
pub mod error;
pub mod generate;
pub mod manifest;
pub mod product;
pub mod report;
pub mod staging;
pub mod version;

// Re-export main types for convenience
pub use archive::{create_archive, list_entries, verify_archive, ArchiveArtifact, ArchiveEntry, EntryKind};
pub use error::{PackagerError, Result};
pub use generate::{generate, GenerateOptions, Generator};
pub use manifest::{DirEntry, FileEntry, Manifest, ManifestBuilder};
pub use product::PackageConfig;
pub use report::{ConsoleReporter, Reporter, SilentReporter};
pub use staging::{materialize, reset_dir, StagingArea};
