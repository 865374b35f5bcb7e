use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

fn java_exe() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}

/// The `java` executable inside a Java installation, if present.
///
/// Checks `<home>/bin`, then the macOS bundle layout `<home>/Contents/Home/bin`.
pub fn locate_java_binary(java_home: &Path) -> Option<PathBuf> {
    let primary = java_home.join("bin").join(java_exe());
    if primary.is_file() {
        return Some(primary);
    }

    let mac_layout = java_home
        .join("Contents")
        .join("Home")
        .join("bin")
        .join(java_exe());
    if mac_layout.is_file() {
        return Some(mac_layout);
    }

    None
}

/// Search `PATH` for the `java` executable.
pub fn find_on_path() -> Option<PathBuf> {
    std::env::var_os("PATH").and_then(|paths| find_in_paths(&paths))
}

fn find_in_paths(paths: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(java_exe()))
        .find(|candidate| candidate.is_file())
}

/// Pick the `java` executable for a launch.
///
/// A configured Java home must contain a runtime; without one, `PATH` is
/// searched.
pub fn resolve_java_binary(java_home: Option<&Path>) -> LauncherResult<PathBuf> {
    if let Some(home) = java_home {
        let java = locate_java_binary(home).ok_or_else(|| {
            LauncherError::JavaNotFound(format!("no {} under {:?}", java_exe(), home))
        })?;
        debug!("Using Java from home {:?}: {:?}", home, java);
        return Ok(java);
    }

    let java = find_on_path().ok_or_else(|| {
        LauncherError::JavaNotFound("JAVA_HOME is not set and java is not on PATH".into())
    })?;
    debug!("Using Java from PATH: {:?}", java);
    Ok(java)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::scratch_dir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn locates_bin_java() {
        let scratch = scratch_dir("java-home-bin");
        let home = scratch.path();
        assert_eq!(locate_java_binary(home), None);

        let java = home.join("bin").join(java_exe());
        touch(&java);
        assert_eq!(locate_java_binary(home), Some(java.clone()));
        assert_eq!(resolve_java_binary(Some(home)).unwrap(), java);
    }

    #[test]
    fn falls_back_to_mac_bundle_layout() {
        let scratch = scratch_dir("java-home-mac");
        let home = scratch.path();
        let java = home.join("Contents").join("Home").join("bin").join(java_exe());
        touch(&java);
        assert_eq!(locate_java_binary(home), Some(java));
    }

    #[test]
    fn configured_home_without_java_is_an_error() {
        let scratch = scratch_dir("java-home-empty");
        let home = scratch.path();
        let err = resolve_java_binary(Some(home)).unwrap_err();
        assert!(matches!(err, LauncherError::JavaNotFound(_)));
    }

    #[test]
    fn searches_path_entries_in_order() {
        let scratch = scratch_dir("java-path");
        let root = scratch.path();
        let empty = root.join("empty");
        let first = root.join("first");
        let second = root.join("second");
        std::fs::create_dir_all(&empty).unwrap();
        touch(&first.join(java_exe()));
        touch(&second.join(java_exe()));

        let paths = std::env::join_paths([&empty, &first, &second]).unwrap();
        assert_eq!(find_in_paths(&paths), Some(first.join(java_exe())));

        let paths = std::env::join_paths([&empty]).unwrap();
        assert_eq!(find_in_paths(&paths), None);
    }
}
