use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{LauncherError, LauncherResult};

/// A remote repository the resolver may download from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteRepository {
    pub id: String,
    pub url: String,
}

impl RemoteRepository {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }

    /// Maven Central, the repository used when none is configured.
    pub fn central() -> Self {
        Self::new("central", super::MAVEN_CENTRAL)
    }

    /// Parse `id::url`, `id::default::url`, or a bare URL.
    ///
    /// Bare URLs get `remote-<index>` as their id.
    pub fn parse(spec: &str, index: usize) -> LauncherResult<Self> {
        let parts: Vec<&str> = spec.split("::").collect();
        let (id, url) = match parts.as_slice() {
            [url] => (format!("remote-{}", index), *url),
            [id, url] => (id.to_string(), *url),
            [id, "default", url] => (id.to_string(), *url),
            [_, layout, _] => {
                return Err(LauncherError::Config(format!(
                    "unsupported repository layout '{}' in {}",
                    layout, spec
                )))
            }
            _ => {
                return Err(LauncherError::Config(format!(
                    "invalid repository '{}', expected id::url",
                    spec
                )))
            }
        };

        if id.is_empty() || url.is_empty() {
            return Err(LauncherError::Config(format!(
                "invalid repository '{}', expected id::url",
                spec
            )));
        }

        Ok(Self::new(id, url))
    }
}

impl fmt::Display for RemoteRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.url)
    }
}
