mod artifact;
mod graph;
mod pom;
mod repository;
mod resolver;

pub use artifact::ArtifactCoordinate;
pub use graph::{
    resolve_dependencies, DependencyNode, DependencyRequest, DependencyResolver,
    ResolvedArtifact, COMPILE_SCOPE,
};
pub use pom::{EffectivePom, PomDependency, PomDocument};
pub use repository::RemoteRepository;
pub use resolver::MavenResolver;

/// Default remote repository.
pub const MAVEN_CENTRAL: &str = "https://repo.maven.apache.org/maven2";
