use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::artifact::ArtifactCoordinate;
use super::graph::{DependencyNode, DependencyRequest, DependencyResolver, ResolvedArtifact};
use super::pom::{EffectivePom, PomDocument, PomExclusion};
use super::repository::RemoteRepository;
use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};

/// Parent chains deeper than this are treated as broken metadata.
const MAX_PARENT_DEPTH: usize = 32;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Resolves Maven artifacts transitively against a local repository,
/// downloading missing JARs and POMs from the request's remote repositories.
pub struct MavenResolver {
    /// Root of the local repository (`~/.m2/repository` layout).
    local_repository: PathBuf,
    downloader: Downloader,
    offline: bool,
}

impl MavenResolver {
    pub fn new(local_repository: PathBuf, downloader: Downloader) -> Self {
        let local_repository =
            std::path::absolute(&local_repository).unwrap_or(local_repository);
        Self {
            local_repository,
            downloader,
            offline: false,
        }
    }

    /// Never contact remote repositories; only use what is already local.
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn local_repository(&self) -> &Path {
        &self.local_repository
    }

    /// Local path of `artifact`, downloading it first when missing.
    async fn materialize(
        &self,
        artifact: &ArtifactCoordinate,
        repositories: &[RemoteRepository],
    ) -> LauncherResult<PathBuf> {
        let dest = self.local_repository.join(artifact.local_path());
        if dest.exists() {
            return Ok(dest);
        }

        if self.offline {
            return Err(LauncherError::ArtifactNotFound {
                artifact: artifact.to_string(),
                repositories: "offline".into(),
            });
        }

        self.try_download(artifact, &dest, repositories).await?;
        Ok(dest)
    }

    /// Try each repository until a successful download occurs.
    async fn try_download(
        &self,
        artifact: &ArtifactCoordinate,
        dest: &Path,
        repositories: &[RemoteRepository],
    ) -> LauncherResult<()> {
        let mut last_err: Option<LauncherError> = None;

        for repo in repositories {
            let url = artifact.url(&repo.url);
            match self.downloader.download_checked(&url, dest).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_not_found() => {
                    debug!("{} not in repository {}", artifact, repo.id);
                }
                Err(e) => {
                    debug!("Repository {} failed for {}: {}", repo.id, artifact, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| LauncherError::ArtifactNotFound {
            artifact: artifact.to_string(),
            repositories: repositories
                .iter()
                .map(|r| r.id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }))
    }
}

#[async_trait]
impl DependencyResolver for MavenResolver {
    async fn resolve(&self, request: &DependencyRequest) -> LauncherResult<DependencyNode> {
        debug!(
            "Collecting {} ({} scope) from {} repositories",
            request.root,
            request.scope,
            request.repositories.len()
        );
        let mut session = Session {
            resolver: self,
            repositories: &request.repositories,
            poms: HashMap::new(),
        };
        session.collect(&request.root, Vec::new(), Vec::new()).await
    }
}

/// State for one `resolve` call: the POMs read so far.
struct Session<'r> {
    resolver: &'r MavenResolver,
    repositories: &'r [RemoteRepository],
    /// Effective POMs keyed by coordinate; `None` records a missing POM.
    poms: HashMap<String, Option<Arc<EffectivePom>>>,
}

impl<'r> Session<'r> {
    /// Build the node for `artifact` and, recursively, its runtime
    /// dependencies. `ancestors` holds the `groupId:artifactId` keys on the
    /// path from the root.
    fn collect<'a>(
        &'a mut self,
        artifact: &'a ArtifactCoordinate,
        exclusions: Vec<PomExclusion>,
        mut ancestors: Vec<String>,
    ) -> BoxFuture<'a, LauncherResult<DependencyNode>> {
        Box::pin(async move {
            let file = if artifact.is_pom() {
                None
            } else {
                Some(
                    self.resolver
                        .materialize(artifact, self.repositories)
                        .await?,
                )
            };
            let mut node = DependencyNode::new(Some(ResolvedArtifact {
                coordinate: artifact.clone(),
                file,
            }));

            let Some(pom) = self.effective_pom(&artifact.pom(), 0).await? else {
                warn!(
                    "The POM for {} is missing, no dependency information available",
                    artifact
                );
                return Ok(node);
            };

            ancestors.push(artifact.versionless_key());
            for dep in pom.runtime_dependencies() {
                if exclusions
                    .iter()
                    .any(|ex| ex.matches(&dep.group_id, &dep.artifact_id))
                {
                    debug!("Excluded {}:{} under {}", dep.group_id, dep.artifact_id, artifact);
                    continue;
                }

                let Some(child) = pom.dependency_coordinate(&dep) else {
                    warn!(
                        "Cannot resolve version for {}:{} in {} (skipping)",
                        dep.group_id, dep.artifact_id, artifact
                    );
                    continue;
                };

                if ancestors.contains(&child.versionless_key()) {
                    debug!("Skipping cycle {} -> {}", artifact, child);
                    continue;
                }

                let mut child_exclusions = exclusions.clone();
                child_exclusions.extend(dep.exclusion_list());

                let child_node = self
                    .collect(&child, child_exclusions, ancestors.clone())
                    .await?;
                node.children.push(child_node);
            }

            Ok(node)
        })
    }

    /// Read the POM for `coordinate` with its parents and imported BOMs
    /// merged in. `Ok(None)` when no repository has it.
    fn effective_pom<'a>(
        &'a mut self,
        coordinate: &'a ArtifactCoordinate,
        depth: usize,
    ) -> BoxFuture<'a, LauncherResult<Option<Arc<EffectivePom>>>> {
        Box::pin(async move {
            let key = coordinate.to_string();
            if let Some(cached) = self.poms.get(&key) {
                return Ok(cached.clone());
            }
            if depth > MAX_PARENT_DEPTH {
                return Err(LauncherError::PomParse(format!(
                    "parent chain of {} is too deep",
                    coordinate
                )));
            }

            let path = match self.resolver.materialize(coordinate, self.repositories).await {
                Ok(path) => path,
                Err(e) if e.is_not_found() => {
                    self.poms.insert(key, None);
                    return Ok(None);
                }
                Err(e) => return Err(e),
            };

            let xml = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| LauncherError::io(&path, e))?;
            let doc = PomDocument::parse(&xml)
                .map_err(|e| LauncherError::PomParse(format!("{}: {}", coordinate, e)))?;

            let parent = match doc.parent_coordinate() {
                Some(parent_coord) => {
                    match self.effective_pom(&parent_coord, depth + 1).await? {
                        Some(parent) => Some(parent),
                        None => {
                            return Err(LauncherError::PomParse(format!(
                                "parent {} of {} not found",
                                parent_coord, coordinate
                            )))
                        }
                    }
                }
                None => None,
            };

            let mut effective = EffectivePom::merge(parent.as_deref(), &doc)?;
            for bom in effective.bom_imports() {
                match self.effective_pom(&bom, depth + 1).await? {
                    Some(imported) => effective.import_managed(&imported),
                    None => warn!("Imported BOM {} of {} is missing", bom, coordinate),
                }
            }

            let effective = Arc::new(effective);
            self.poms.insert(key, Some(effective.clone()));
            Ok(Some(effective))
        })
    }
}
