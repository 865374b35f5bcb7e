use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::maven::RemoteRepository;

const APP_DIR_NAME: &str = "mvnrun";
const SETTINGS_FILE: &str = "settings.json";

/// Persistent defaults read from `settings.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub local_repository: Option<PathBuf>,
    pub repositories: Vec<RemoteRepository>,
    pub java_home: Option<PathBuf>,
    pub offline: bool,
    pub properties: BTreeMap<String, String>,
}

impl Settings {
    /// Load from an explicit path, or from the default location.
    ///
    /// An explicit file must exist and parse. The default file is optional and
    /// a broken one is skipped with a warning.
    pub fn load(explicit: Option<&Path>) -> LauncherResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let Some(path) = default_settings_path() else {
            return Ok(Settings::default());
        };
        if !path.exists() {
            debug!("No settings file at {:?}", path);
            return Ok(Settings::default());
        }

        match Self::load_from(&path) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!("Ignoring settings file {:?}: {}", path, e);
                Ok(Settings::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> LauncherResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            LauncherError::Config(format!("cannot read settings file {:?}: {}", path, e))
        })?;
        let settings = serde_json::from_str(&raw).map_err(|e| {
            LauncherError::Config(format!("malformed settings file {:?}: {}", path, e))
        })?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }
}

/// `<config dir>/mvnrun/settings.json`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE))
}

/// `~/.m2/repository`, shared with Maven itself.
pub fn default_local_repository() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".m2")
        .join("repository")
}
