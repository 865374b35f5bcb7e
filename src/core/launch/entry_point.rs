use std::path::PathBuf;

use tracing::debug;

use super::manifest::{Manifest, MAIN_CLASS};
use crate::core::error::{LauncherError, LauncherResult};

/// Determine the class to run.
///
/// An explicit, non-empty `class_name` wins and no archive is opened.
/// Otherwise the `Main-Class` attribute of the first classpath entry is used.
pub fn resolve_entry_point(
    class_name: Option<&str>,
    classpath: &[PathBuf],
) -> LauncherResult<String> {
    if let Some(name) = class_name.filter(|n| !n.is_empty()) {
        return Ok(name.to_string());
    }

    let first = classpath.first().ok_or_else(|| {
        LauncherError::EntryPointMissing("no classpath entries to read Main-Class from".into())
    })?;

    debug!("Reading Main-Class from {:?}", first);
    let main_class = Manifest::read_from_jar(first)?
        .and_then(|m| m.get(MAIN_CLASS).map(|v| v.trim().to_string()))
        .filter(|v| !v.is_empty());

    main_class.ok_or_else(|| {
        LauncherError::EntryPointMissing("className not set and Main-Class not found".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{scratch_dir, write_jar};

    #[test]
    fn explicit_name_is_returned_without_opening_archives() {
        let classpath = vec![PathBuf::from("/definitely/not/here.jar")];
        let name = resolve_entry_point(Some("com.example.Explicit"), &classpath).unwrap();
        assert_eq!(name, "com.example.Explicit");

        let name = resolve_entry_point(Some("com.example.Explicit"), &[]).unwrap();
        assert_eq!(name, "com.example.Explicit");
    }

    #[test]
    fn main_class_comes_from_first_entry() {
        let scratch = scratch_dir("entry-point-main");
        let repo = scratch.path();
        let first = write_jar(repo, "org.example:demo:1.0", Some("com.example.Foo"));
        let second = write_jar(repo, "org.example:other:1.0", Some("com.example.Other"));

        let name = resolve_entry_point(None, &[first.clone(), second]).unwrap();
        assert_eq!(name, "com.example.Foo");

        // An empty explicit name counts as absent.
        let name = resolve_entry_point(Some(""), &[first]).unwrap();
        assert_eq!(name, "com.example.Foo");
    }

    #[test]
    fn missing_attribute_is_reported() {
        let scratch = scratch_dir("entry-point-missing");
        let repo = scratch.path();
        let jar = write_jar(repo, "org.example:lib:1.0", None);

        let err = resolve_entry_point(None, &[jar]).unwrap_err();
        assert!(matches!(err, LauncherError::EntryPointMissing(_)));
        assert_eq!(err.to_string(), "className not set and Main-Class not found");
    }

    #[test]
    fn empty_classpath_is_reported() {
        let err = resolve_entry_point(None, &[]).unwrap_err();
        assert!(matches!(err, LauncherError::EntryPointMissing(_)));
    }

    #[test]
    fn unreadable_archive_is_an_io_failure() {
        let scratch = scratch_dir("entry-point-io");
        let repo = scratch.path();
        let missing = resolve_entry_point(None, &[repo.join("absent.jar")]).unwrap_err();
        assert!(matches!(missing, LauncherError::Io { .. }));

        let garbage = repo.join("garbage.jar");
        std::fs::write(&garbage, b"not a zip").unwrap();
        let err = resolve_entry_point(None, &[garbage]).unwrap_err();
        assert!(matches!(err, LauncherError::Zip(_)));
    }
}
