//! Fixtures shared by unit tests: scratch directories, a local Maven
//! repository populated on the fly, and a stand-in `java` executable.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use crate::core::launch::manifest::{Manifest, MAIN_CLASS, MANIFEST_PATH, MANIFEST_VERSION};
use crate::core::maven::ArtifactCoordinate;

/// File, relative to a fake Java home, where the fake `java` records its
/// arguments one per line.
pub(crate) const FAKE_JAVA_ARGS: &str = "java-args.txt";

/// File, relative to a fake Java home, holding the pid of a fake `java`
/// that was asked to hang.
pub(crate) const FAKE_JAVA_PID: &str = "java.pid";

/// Fresh directory under the system temp dir, removed when the guard drops.
pub(crate) fn scratch_dir(name: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("mvnrun-test-{}-", name))
        .tempdir()
        .unwrap()
}

/// Write a JAR for `coord` into the repository layout under `repo`.
pub(crate) fn write_jar(repo: &Path, coord: &str, main_class: Option<&str>) -> PathBuf {
    let coordinate = ArtifactCoordinate::parse(coord).unwrap();
    let path = repo.join(coordinate.local_path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();

    let mut manifest = Manifest::new();
    manifest.insert(MANIFEST_VERSION, "1.0");
    if let Some(main_class) = main_class {
        manifest.insert(MAIN_CLASS, main_class);
    }

    let mut writer = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
    writer
        .start_file(MANIFEST_PATH, SimpleFileOptions::default())
        .unwrap();
    writer.write_all(&manifest.to_bytes()).unwrap();
    writer
        .start_file(
            format!("{}/Placeholder.class", coordinate.artifact_id),
            SimpleFileOptions::default(),
        )
        .unwrap();
    writer.write_all(&[0xCA, 0xFE, 0xBA, 0xBE]).unwrap();
    writer.finish().unwrap();

    path
}

/// Write the POM for `coord` into the repository layout under `repo`.
pub(crate) fn write_pom(repo: &Path, coord: &str, xml: &str) -> PathBuf {
    let coordinate = ArtifactCoordinate::parse(coord).unwrap().pom();
    let path = repo.join(coordinate.local_path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, xml).unwrap();
    path
}

/// Turn `home` into a Java home whose `bin/java` is a shell script.
///
/// The script records its arguments in [`FAKE_JAVA_ARGS`], then reacts to
/// the first argument that names one of these markers:
///
/// * `Fail`: exit 1.
/// * `Killed`: kill itself with SIGTERM.
/// * `Unlink`: delete the `-cp` path and exit 0.
/// * `Hang`: write its pid to [`FAKE_JAVA_PID`] and sleep for a minute.
///
/// Otherwise it exits 0.
#[cfg(unix)]
pub(crate) fn fake_java_home(home: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let bin = home.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let script = format!(
        r#"#!/bin/sh
printf '%s\n' "$@" > '{args}'
for arg in "$@"; do
  case "$arg" in
    *Fail*) exit 1 ;;
    *Killed*) kill -TERM $$ ;;
    *Unlink*) rm -f "$2"; exit 0 ;;
    *Hang*) echo $$ > '{pid}'; exec sleep 60 ;;
  esac
done
exit 0
"#,
        args = home.join(FAKE_JAVA_ARGS).display(),
        pid = home.join(FAKE_JAVA_PID).display()
    );

    let java = bin.join("java");
    std::fs::write(&java, script).unwrap();
    std::fs::set_permissions(&java, std::fs::Permissions::from_mode(0o755)).unwrap();
    home.to_path_buf()
}
