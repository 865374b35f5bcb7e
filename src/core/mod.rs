// ─── mvnrun Core ───
// Resolve a Maven artifact and run it in a forked JVM.
//
// Architecture:
//   core/
//     maven/      Coordinates, POM model, resolver trait + Maven resolver
//     downloader/ Repository fetches with SHA-1 validation
//     launch/     Classpath, entry point, wrapper JAR, process spawner
//     java/       Java executable lookup
//     config/     Settings file + per-run configuration
//     pipeline    Orchestrates one invocation end to end

pub mod config;
pub mod downloader;
pub mod error;
pub mod exit_codes;
pub mod file_url;
pub mod http;
pub mod java;
pub mod launch;
pub mod maven;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;
