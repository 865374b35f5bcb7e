use std::path::PathBuf;
use thiserror::Error;

use crate::core::exit_codes;

/// Central error type for the whole pipeline.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {url}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        url: String,
        expected: String,
        actual: String,
    },

    // ── Maven ───────────────────────────────────────────
    #[error("invalid artifact coordinate: {0}")]
    InvalidMavenCoordinate(String),

    #[error("POM parse error: {0}")]
    PomParse(String),

    #[error("Artifact {artifact} not found in repositories [{repositories}]")]
    ArtifactNotFound {
        artifact: String,
        repositories: String,
    },

    #[error("Failed to resolve {artifact}: {source}")]
    Resolution {
        artifact: String,
        #[source]
        source: Box<LauncherError>,
    },

    // ── XML ─────────────────────────────────────────────
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::DeError),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Launch ──────────────────────────────────────────
    #[error("{0}")]
    EntryPointMissing(String),

    #[error("Java runtime not found: {0}")]
    JavaNotFound(String),

    #[error("process exited with code {0}")]
    ProcessExit(i32),

    #[error("interrupted while waiting for the process to exit")]
    Interrupted,

    // ── Archive ─────────────────────────────────────────
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── Configuration ───────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl LauncherError {
    /// Exit code the `mvnrun` process reports for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            LauncherError::InvalidMavenCoordinate(_) => exit_codes::INVALID_COORDINATE,
            LauncherError::Resolution { .. }
            | LauncherError::ArtifactNotFound { .. }
            | LauncherError::DownloadFailed { .. }
            | LauncherError::Http(_)
            | LauncherError::Sha1Mismatch { .. }
            | LauncherError::PomParse(_)
            | LauncherError::Xml(_) => exit_codes::RESOLUTION_FAILURE,
            LauncherError::EntryPointMissing(_) => exit_codes::ENTRY_POINT_MISSING,
            LauncherError::Io { .. }
            | LauncherError::Zip(_)
            | LauncherError::JavaNotFound(_)
            | LauncherError::Other(_) => exit_codes::IO_FAILURE,
            LauncherError::ProcessExit(_) => exit_codes::PROCESS_EXIT,
            LauncherError::Interrupted => exit_codes::INTERRUPTED,
            LauncherError::Config(_) | LauncherError::Json(_) => exit_codes::CONFIG_ERROR,
        }
    }

    /// True when a repository simply does not have the requested file.
    pub fn is_not_found(&self) -> bool {
        match self {
            LauncherError::DownloadFailed { status, .. } => *status == 404,
            LauncherError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            LauncherError::ArtifactNotFound { .. } => true,
            _ => false,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LauncherError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
