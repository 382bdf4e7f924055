use packager_core::{
    list_entries, ArchiveArtifact, EntryKind, GenerateOptions, Generator, Manifest, PackageConfig,
    PackagerError, Reporter, SilentReporter,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone)]
struct TestKit;

impl PackageConfig for TestKit {
    fn name(&self) -> &'static str {
        "x"
    }

    fn display_name(&self) -> &'static str {
        "Test Kit"
    }

    fn version(&self) -> &'static str {
        "v1.0.0"
    }

    fn manifest(&self) -> Manifest {
        Manifest::builder()
            .file("go.mod", "module x\n")
            .dir("spa")
            .build()
    }
}

#[derive(Clone)]
struct NestedKit;

impl PackageConfig for NestedKit {
    fn name(&self) -> &'static str {
        "nested"
    }

    fn display_name(&self) -> &'static str {
        "Nested Kit"
    }

    fn version(&self) -> &'static str {
        "0.1.0-dev"
    }

    fn manifest(&self) -> Manifest {
        Manifest::builder()
            .file("go.mod", "module nested\n")
            .file("LICENSE", "MIT\n")
            .file("internal/util/util.go", "package util\n")
            .dirs(["spa", "cmd/pw-tui", "cmd/pw-gui", "internal"])
            .build()
    }
}

fn generator<C: PackageConfig>(config: C, scratch: &Path) -> Generator<C> {
    Generator::new(
        config,
        GenerateOptions {
            staging_dir: Some(scratch.to_path_buf()),
            verify: true,
        },
    )
}

/// Relative path → content for every file under `root`, plus every directory
fn snapshot(root: &Path) -> Vec<(String, Option<Vec<u8>>)> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            let rel = path
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            if path.is_dir() {
                out.push((rel, None));
                stack.push(path);
            } else {
                out.push((rel, Some(fs::read(&path).unwrap())));
            }
        }
    }
    out.sort();
    out
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl Reporter for Recorder {
    fn staging_started(&mut self, _root: &Path) {
        self.events.push("stage".to_string());
    }

    fn file_written(&mut self, path: &str) {
        self.events.push(format!("file {}", path));
    }

    fn dir_created(&mut self, path: &str) {
        self.events.push(format!("dir {}", path));
    }

    fn archive_started(&mut self, _output: &Path) {
        self.events.push("archive".to_string());
    }

    fn archive_finished(&mut self, artifact: &ArchiveArtifact) {
        self.events.push(format!("done {}", artifact.size > 0));
    }
}

#[tokio::test]
async fn test_minimal_scenario() {
    let tmp = tempfile::tempdir().unwrap();
    let scratch = tmp.path().join("scratch");
    let output = tmp.path().join("x.tar.gz");

    let artifact = generator(TestKit, &scratch)
        .generate(Some(&output), &mut SilentReporter)
        .await
        .unwrap();

    assert_eq!(artifact.path, output);
    assert_eq!(artifact.size, fs::metadata(&output).unwrap().len());

    let staged = scratch.join("x");
    assert_eq!(fs::read_to_string(staged.join("go.mod")).unwrap(), "module x\n");
    assert!(staged.join("spa").is_dir());

    let entries = list_entries(&output).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].path, "x/go.mod");
    assert_eq!(entries[0].kind, EntryKind::File);
    assert_eq!(entries[0].content, b"module x\n");
    assert_eq!(entries[1].path, "x/spa");
    assert_eq!(entries[1].kind, EntryKind::Directory);
}

#[tokio::test]
async fn test_every_file_and_directory_archived_once() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("nested.tar.gz");
    let manifest = NestedKit.manifest();

    generator(NestedKit, &tmp.path().join("scratch"))
        .generate(Some(&output), &mut SilentReporter)
        .await
        .unwrap();

    let entries = list_entries(&output).unwrap();
    for file in &manifest.files {
        let expected = format!("nested/{}", file.path);
        let matching: Vec<_> = entries.iter().filter(|e| e.path == expected).collect();
        assert_eq!(matching.len(), 1, "{}", expected);
        assert_eq!(matching[0].content, file.content.as_bytes());
    }
    for dir in &manifest.directories {
        let expected = format!("nested/{}", dir.path);
        assert!(
            entries
                .iter()
                .any(|e| e.path == expected && e.kind == EntryKind::Directory),
            "{}",
            expected
        );
    }
    for entry in &entries {
        assert!(entry.path.starts_with("nested/"), "{}", entry.path);
        assert!(!entry.path.contains(&*tmp.path().to_string_lossy()));
    }
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let scratch = tmp.path().join("scratch");
    let first = tmp.path().join("first.tar.gz");
    let second = tmp.path().join("second.tar.gz");
    let generator = generator(NestedKit, &scratch);

    generator
        .generate(Some(&first), &mut SilentReporter)
        .await
        .unwrap();
    let staged_first = snapshot(&scratch.join("nested"));

    generator
        .generate(Some(&second), &mut SilentReporter)
        .await
        .unwrap();
    let staged_second = snapshot(&scratch.join("nested"));

    assert_eq!(staged_first, staged_second);
    assert_eq!(list_entries(&first).unwrap(), list_entries(&second).unwrap());
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[tokio::test]
async fn test_stray_file_removed_on_rerun() {
    let tmp = tempfile::tempdir().unwrap();
    let scratch = tmp.path().join("scratch");
    let output = tmp.path().join(TestKit.default_output_name());
    let generator = generator(TestKit, &scratch);

    generator
        .generate(Some(&output), &mut SilentReporter)
        .await
        .unwrap();
    fs::write(scratch.join("x/stray.txt"), "left over").unwrap();
    fs::create_dir_all(scratch.join("x/old-dir")).unwrap();

    generator
        .generate(Some(&output), &mut SilentReporter)
        .await
        .unwrap();

    assert!(!scratch.join("x/stray.txt").exists());
    assert!(!scratch.join("x/old-dir").exists());
    let names: Vec<_> = list_entries(&output)
        .unwrap()
        .into_iter()
        .map(|e| e.path)
        .collect();
    assert_eq!(names, ["x/go.mod", "x/spa"]);
}

#[tokio::test]
async fn test_staging_failure_leaves_no_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "regular file").unwrap();
    let output = tmp.path().join("x.tar.gz");
    let mut recorder = Recorder::default();

    let err = generator(TestKit, &blocker.join("scratch"))
        .generate(Some(&output), &mut recorder)
        .await
        .unwrap_err();

    assert!(matches!(err, PackagerError::ResetStaging { .. }));
    assert!(!output.exists());
    assert!(!recorder.events.contains(&"archive".to_string()));
}

#[tokio::test]
async fn test_reporter_sees_every_step_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let mut recorder = Recorder::default();

    generator(NestedKit, &tmp.path().join("scratch"))
        .generate(Some(&tmp.path().join("out.tar.gz")), &mut recorder)
        .await
        .unwrap();

    assert_eq!(
        recorder.events,
        [
            "stage",
            "file go.mod",
            "file LICENSE",
            "file internal/util/util.go",
            "dir spa",
            "dir cmd/pw-tui",
            "dir cmd/pw-gui",
            "dir internal",
            "archive",
            "done true",
        ]
    );
}

#[tokio::test]
async fn test_output_parent_created() {
    let tmp = tempfile::tempdir().unwrap();
    let output: PathBuf = tmp.path().join("dist/kits/x.tar.gz");

    generator(TestKit, &tmp.path().join("scratch"))
        .generate(Some(&output), &mut SilentReporter)
        .await
        .unwrap();

    assert!(output.is_file());
}

#[test]
fn test_default_names() {
    assert_eq!(TestKit.default_output_name(), "x-1.0.0.tar.gz");
    assert_eq!(NestedKit.default_output_name(), "nested-0.1.0-dev.tar.gz");
    assert_eq!(TestKit.root_name(), "x");
    assert!(TestKit
        .default_staging_dir()
        .ends_with("x-package"));
}

#[derive(Clone)]
struct DefaultsKit;

impl PackageConfig for DefaultsKit {
    fn name(&self) -> &'static str {
        "packager-core-defaults-kit"
    }

    fn display_name(&self) -> &'static str {
        "Defaults Kit"
    }

    fn version(&self) -> &'static str {
        "0.0.1"
    }

    fn manifest(&self) -> Manifest {
        Manifest::builder().file("README.md", "# kit\n").dir("src").build()
    }
}

#[tokio::test]
async fn test_generate_with_default_options() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join(DefaultsKit.default_output_name());

    let artifact = packager_core::generate(DefaultsKit, Some(&output))
        .await
        .unwrap();

    assert_eq!(artifact.path, output);
    assert!(DefaultsKit
        .default_staging_dir()
        .join("packager-core-defaults-kit/README.md")
        .is_file());
    let _ = fs::remove_dir_all(DefaultsKit.default_staging_dir());
}
