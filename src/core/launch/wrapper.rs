// ─── Wrapper JAR ───
// A throwaway JAR whose only content is a manifest listing the real classpath.
// Passing it as `-cp` keeps the command line short no matter how many
// dependencies were resolved.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::write::SimpleFileOptions;

use super::manifest::{Manifest, CLASS_PATH, MANIFEST_PATH, MANIFEST_VERSION};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::file_url::to_file_url;

/// Temporary wrapper JAR. Removed by [`WrapperJar::delete`], or on drop as a
/// fallback when the launch bails out early.
#[derive(Debug)]
pub struct WrapperJar {
    path: PathBuf,
    removed: bool,
}

impl WrapperJar {
    /// Write a new wrapper JAR into the system temp directory.
    pub fn create(classpath: &[PathBuf]) -> LauncherResult<Self> {
        let path = std::env::temp_dir().join(format!("mvnrun-{}.jar", uuid::Uuid::new_v4()));
        Self::create_at(path, classpath)
    }

    pub(crate) fn create_at(path: PathBuf, classpath: &[PathBuf]) -> LauncherResult<Self> {
        let class_path = classpath
            .iter()
            .map(|entry| to_file_url(entry))
            .collect::<Vec<_>>()
            .join(" ");

        let mut manifest = Manifest::new();
        manifest.insert(MANIFEST_VERSION, "1.0");
        manifest.insert(CLASS_PATH, class_path);

        // Guard first, so a half-written file is cleaned up on error.
        let jar = WrapperJar {
            path,
            removed: false,
        };

        let file = std::fs::File::create(&jar.path).map_err(|e| LauncherError::io(&jar.path, e))?;
        let mut writer = zip::ZipWriter::new(file);
        writer.start_file(MANIFEST_PATH, SimpleFileOptions::default())?;
        writer
            .write_all(&manifest.to_bytes())
            .map_err(|e| LauncherError::io(&jar.path, e))?;
        writer.finish()?;

        debug!(
            "Wrote wrapper JAR {:?} with {} classpath entries",
            jar.path,
            classpath.len()
        );
        Ok(jar)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the JAR, reporting failure.
    pub fn delete(mut self) -> LauncherResult<()> {
        self.removed = true;
        std::fs::remove_file(&self.path).map_err(|e| LauncherError::io(&self.path, e))
    }
}

impl Drop for WrapperJar {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(source) = std::fs::remove_file(&self.path) {
            if source.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove wrapper JAR {:?}: {}", self.path, source);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::scratch_dir;

    #[test]
    fn manifest_lists_classpath_as_file_urls() {
        let jar = WrapperJar::create(&[PathBuf::from("/a/x.jar"), PathBuf::from("/b/y.jar")])
            .unwrap();

        let manifest = Manifest::read_from_jar(jar.path()).unwrap().unwrap();
        assert_eq!(manifest.get(MANIFEST_VERSION), Some("1.0"));
        if cfg!(unix) {
            assert_eq!(manifest.get(CLASS_PATH), Some("file:/a/x.jar file:/b/y.jar"));
        }

        let file = std::fs::File::open(jar.path()).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.file_names().next(), Some(MANIFEST_PATH));

        jar.delete().unwrap();
    }

    #[test]
    fn empty_classpath_still_writes_manifest() {
        let jar = WrapperJar::create(&[]).unwrap();
        let manifest = Manifest::read_from_jar(jar.path()).unwrap().unwrap();
        assert_eq!(manifest.get(CLASS_PATH), Some(""));
    }

    #[test]
    fn names_are_unique_and_in_temp_dir() {
        let first = WrapperJar::create(&[]).unwrap();
        let second = WrapperJar::create(&[]).unwrap();
        assert_ne!(first.path(), second.path());
        assert!(first.path().starts_with(std::env::temp_dir()));

        let name = first.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("mvnrun-") && name.ends_with(".jar"));
    }

    #[test]
    fn delete_and_drop_remove_the_file() {
        let scratch = scratch_dir("wrapper-cleanup");
        let dir = scratch.path();

        let jar = WrapperJar::create_at(dir.join("explicit.jar"), &[]).unwrap();
        let path = jar.path().to_path_buf();
        assert!(path.exists());
        jar.delete().unwrap();
        assert!(!path.exists());

        let path = dir.join("dropped.jar");
        {
            let _jar = WrapperJar::create_at(path.clone(), &[]).unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn delete_reports_missing_file() {
        let scratch = scratch_dir("wrapper-missing");
        let dir = scratch.path();
        let jar = WrapperJar::create_at(dir.join("gone.jar"), &[]).unwrap();
        std::fs::remove_file(jar.path()).unwrap();

        let err = jar.delete().unwrap_err();
        assert!(matches!(err, LauncherError::Io { .. }));
    }
}
