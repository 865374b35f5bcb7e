use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::core::error::{LauncherError, LauncherResult};

/// A fully parsed Maven coordinate.
///
/// Supported formats:
///   `groupId:artifactId:version`
///   `groupId:artifactId:extension:version`
///   `groupId:artifactId:extension:classifier:version`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ArtifactCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    /// File extension. Defaults to `"jar"`.
    pub extension: String,
    /// Empty when the coordinate has no classifier.
    pub classifier: String,
    pub version: String,
}

impl ArtifactCoordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        extension: impl Into<String>,
        classifier: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            extension: extension.into(),
            classifier: classifier.into(),
            version: version.into(),
        }
    }

    /// Parse a coordinate string.
    ///
    /// # Examples
    /// ```
    /// use mvnrun_lib::core::maven::ArtifactCoordinate;
    ///
    /// let a = ArtifactCoordinate::parse("org.example:demo:1.2.3").unwrap();
    /// assert_eq!(a.extension, "jar");
    /// ```
    pub fn parse(coord: &str) -> LauncherResult<Self> {
        let parts: Vec<&str> = coord.split(':').collect();

        match parts.as_slice() {
            [group, artifact, version] => Ok(Self::new(*group, *artifact, "jar", "", *version)),
            [group, artifact, extension, version] => {
                Ok(Self::new(*group, *artifact, *extension, "", *version))
            }
            [group, artifact, extension, classifier, version] => {
                Ok(Self::new(*group, *artifact, *extension, *classifier, *version))
            }
            _ => Err(LauncherError::InvalidMavenCoordinate(coord.to_string())),
        }
    }

    /// Construct the group path portion (`org/example`).
    pub fn group_path(&self) -> String {
        self.group_id.replace('.', "/")
    }

    /// `artifactId-version[-classifier].extension`
    pub fn filename(&self) -> String {
        if self.classifier.is_empty() {
            format!("{}-{}.{}", self.artifact_id, self.version, self.extension)
        } else {
            format!(
                "{}-{}-{}.{}",
                self.artifact_id, self.version, self.classifier, self.extension
            )
        }
    }

    /// Full URL of this artifact under the given repository base.
    ///
    /// Template:
    /// `<repo>/<group_path>/<artifact_id>/<version>/<filename>`
    pub fn url(&self, repo_base: &str) -> String {
        let base = repo_base.trim_end_matches('/');
        format!(
            "{}/{}/{}/{}/{}",
            base,
            self.group_path(),
            self.artifact_id,
            self.version,
            self.filename()
        )
    }

    /// Path relative to the local repository root:
    /// `<group_path>/<artifact_id>/<version>/<filename>`
    pub fn local_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.group_id.split('.') {
            path.push(segment);
        }
        path.join(&self.artifact_id)
            .join(&self.version)
            .join(self.filename())
    }

    /// The POM describing this artifact.
    pub fn pom(&self) -> Self {
        Self::new(
            self.group_id.clone(),
            self.artifact_id.clone(),
            "pom",
            "",
            self.version.clone(),
        )
    }

    pub fn with_extension(&self, extension: &str) -> Self {
        let mut clone = self.clone();
        clone.extension = extension.to_string();
        clone
    }

    pub fn is_pom(&self) -> bool {
        self.extension == "pom"
    }

    /// `groupId:artifactId`, used for exclusions and cycle detection.
    pub fn versionless_key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.classifier.is_empty() {
            write!(
                f,
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.extension, self.version
            )
        } else {
            write!(
                f,
                "{}:{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.extension, self.classifier, self.version
            )
        }
    }
}
