// ─── Invocation Pipeline ───
// parse → resolve → flatten → entry point → wrapper JAR → launch → cleanup

use std::future::Future;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::core::config::InvocationConfig;
use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::java::resolve_java_binary;
use crate::core::launch::{self, flatten_classpath, resolve_entry_point, LaunchSpec, WrapperJar};
use crate::core::maven::{
    resolve_dependencies, ArtifactCoordinate, DependencyResolver, MavenResolver,
};

/// The Maven resolver configured for this run.
pub fn maven_resolver(config: &InvocationConfig) -> LauncherResult<MavenResolver> {
    Ok(
        MavenResolver::new(config.local_repository.clone(), Downloader::new()?)
            .with_offline(config.offline),
    )
}

/// Resolve the configured artifact and return its flattened classpath.
pub async fn resolve_classpath(
    config: &InvocationConfig,
    resolver: &dyn DependencyResolver,
) -> LauncherResult<Vec<PathBuf>> {
    let coordinate = ArtifactCoordinate::parse(&config.artifact)?;
    info!("Resolving {}", coordinate);

    let root = resolve_dependencies(resolver, &coordinate, &config.repositories).await?;
    Ok(flatten_classpath(&root))
}

/// Run the configured artifact to completion.
///
/// Succeeds only when the forked JVM exits with code 0 and the wrapper JAR
/// could be removed afterwards. Ctrl-C stops the JVM.
pub async fn execute(
    config: &InvocationConfig,
    resolver: &dyn DependencyResolver,
) -> LauncherResult<()> {
    execute_until(config, resolver, tokio::signal::ctrl_c()).await
}

/// Like [`execute`], but the JVM is stopped when `interrupt` completes.
pub async fn execute_until<F>(
    config: &InvocationConfig,
    resolver: &dyn DependencyResolver,
    interrupt: F,
) -> LauncherResult<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    let classpath = resolve_classpath(config, resolver).await?;

    let main_class = {
        let class_name = config.class_name.clone();
        let classpath = classpath.clone();
        tokio::task::spawn_blocking(move || {
            resolve_entry_point(class_name.as_deref(), &classpath)
        })
        .await
        .map_err(|e| LauncherError::Other(format!("entry point lookup failed: {}", e)))??
    };
    debug!("Entry point: {}", main_class);

    let java_bin = resolve_java_binary(config.java_home.as_deref())?;
    let wrapper = WrapperJar::create(&classpath)?;

    let spec = LaunchSpec {
        java_bin,
        wrapper_path: wrapper.path().to_path_buf(),
        main_class,
        options: config.resolved_options(),
        arguments: config.resolved_arguments(),
    };
    let outcome = launch::run_until(&spec, interrupt).await;
    let removed = wrapper.delete();

    match outcome {
        Ok(result) => {
            removed?;
            result.into_result()
        }
        Err(e) => {
            // The launch error wins; the cleanup failure is only reported.
            if let Err(cleanup) = removed {
                warn!("{}", cleanup);
            }
            Err(e)
        }
    }
}
