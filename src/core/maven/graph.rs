use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::artifact::ArtifactCoordinate;
use super::repository::RemoteRepository;
use crate::core::error::{LauncherError, LauncherResult};

/// Scope requested for the root dependency.
pub const COMPILE_SCOPE: &str = "compile";

/// An artifact the resolver settled on, with its local file when one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub coordinate: ArtifactCoordinate,
    pub file: Option<PathBuf>,
}

/// One node of the resolved dependency tree.
///
/// The root represents the requested artifact; children keep the order in
/// which their POM declared them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyNode {
    pub artifact: Option<ResolvedArtifact>,
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    pub fn new(artifact: Option<ResolvedArtifact>) -> Self {
        Self {
            artifact,
            children: Vec::new(),
        }
    }

    /// Local file of this node, if the artifact materialized one.
    pub fn file(&self) -> Option<&PathBuf> {
        self.artifact.as_ref().and_then(|a| a.file.as_ref())
    }
}

/// A collect-and-resolve request for a single root dependency.
#[derive(Debug, Clone)]
pub struct DependencyRequest {
    pub root: ArtifactCoordinate,
    pub scope: String,
    pub repositories: Vec<RemoteRepository>,
}

/// The resolver service: turns a request into a dependency tree whose
/// artifacts are available on the local filesystem.
#[async_trait]
pub trait DependencyResolver: Send + Sync {
    async fn resolve(&self, request: &DependencyRequest) -> LauncherResult<DependencyNode>;
}

/// Resolve `coordinate` with compile scope against `repositories`.
///
/// Any failure is wrapped in [`LauncherError::Resolution`] with the original
/// error kept as its source. Nothing is retried here.
pub async fn resolve_dependencies(
    resolver: &dyn DependencyResolver,
    coordinate: &ArtifactCoordinate,
    repositories: &[RemoteRepository],
) -> LauncherResult<DependencyNode> {
    let request = DependencyRequest {
        root: coordinate.clone(),
        scope: COMPILE_SCOPE.to_string(),
        repositories: repositories.to_vec(),
    };

    debug!("resolving: {}", coordinate);
    resolver
        .resolve(&request)
        .await
        .map_err(|source| LauncherError::Resolution {
            artifact: coordinate.to_string(),
            source: Box::new(source),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingResolver {
        seen: Mutex<Vec<DependencyRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl DependencyResolver for RecordingResolver {
        async fn resolve(&self, request: &DependencyRequest) -> LauncherResult<DependencyNode> {
            self.seen.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(LauncherError::ArtifactNotFound {
                    artifact: request.root.to_string(),
                    repositories: "central".into(),
                });
            }
            Ok(DependencyNode::new(Some(ResolvedArtifact {
                coordinate: request.root.clone(),
                file: Some(PathBuf::from("/repo/demo.jar")),
            })))
        }
    }

    #[tokio::test]
    async fn submits_compile_scope_request() {
        let resolver = RecordingResolver {
            seen: Mutex::new(Vec::new()),
            fail: false,
        };
        let coordinate = ArtifactCoordinate::parse("org.example:demo:1.2.3").unwrap();
        let repos = vec![RemoteRepository::central()];

        let root = resolve_dependencies(&resolver, &coordinate, &repos)
            .await
            .unwrap();

        assert_eq!(root.file(), Some(&PathBuf::from("/repo/demo.jar")));
        let seen = resolver.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].scope, "compile");
        assert_eq!(seen[0].root, coordinate);
        assert_eq!(seen[0].repositories, repos);
    }

    #[tokio::test]
    async fn wraps_failures_with_cause() {
        let resolver = RecordingResolver {
            seen: Mutex::new(Vec::new()),
            fail: true,
        };
        let coordinate = ArtifactCoordinate::parse("org.example:missing:1.0").unwrap();

        let err = resolve_dependencies(&resolver, &coordinate, &[])
            .await
            .unwrap_err();

        match err {
            LauncherError::Resolution { artifact, source } => {
                assert_eq!(artifact, "org.example:missing:jar:1.0");
                assert!(matches!(*source, LauncherError::ArtifactNotFound { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
