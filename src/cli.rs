//! Command-line interface for mvnrun.
//!
//! Flags override environment variables, which override the settings file.

use std::path::PathBuf;

use clap::Parser;

use crate::core::config::{InvocationConfig, Settings};
use crate::core::error::LauncherResult;
use crate::core::maven::RemoteRepository;

/// Resolve a Maven artifact with its runtime dependencies and run it in a
/// forked JVM.
///
/// The main class comes from --class-name or from the Main-Class attribute
/// of the artifact's own JAR.
#[derive(Parser, Debug)]
#[command(name = "mvnrun")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Artifact to run: group:artifact[:extension[:classifier]]:version
    pub artifact: String,

    /// Arguments passed to the program after the main class
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Class to run instead of the JAR's Main-Class
    #[arg(short = 'c', long = "class-name", value_name = "CLASS")]
    pub class_name: Option<String>,

    /// JVM option placed before the main class (repeatable)
    #[arg(
        short = 'O',
        long = "option",
        value_name = "OPTION",
        allow_hyphen_values = true
    )]
    pub options: Vec<String>,

    /// Property, e.g. -D arg.0=value (repeatable)
    #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// Remote repository as id::url (repeatable, replaces the defaults)
    #[arg(short = 'r', long = "repository", value_name = "ID::URL")]
    pub repositories: Vec<String>,

    /// Local repository directory [default: ~/.m2/repository]
    #[arg(long, env = "MVNRUN_LOCAL_REPOSITORY", value_name = "DIR")]
    pub local_repository: Option<PathBuf>,

    /// Java installation to launch with
    #[arg(long, env = "JAVA_HOME", value_name = "DIR")]
    pub java_home: Option<PathBuf>,

    /// Use only the local repository
    #[arg(long, env = "MVNRUN_OFFLINE")]
    pub offline: bool,

    /// Settings file [default: <config dir>/mvnrun/settings.json]
    #[arg(long, env = "MVNRUN_SETTINGS", value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Print the resolved classpath instead of launching
    #[arg(long)]
    pub print_classpath: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Merge the parsed flags over `settings`.
    pub fn into_config(self, settings: Settings) -> LauncherResult<InvocationConfig> {
        let mut config = InvocationConfig::new(self.artifact);
        config.class_name = self.class_name.filter(|name| !name.is_empty());
        config.options = self.options;
        config.arguments = self.args;

        config.properties = settings.properties;
        config.properties.extend(self.properties);

        if !self.repositories.is_empty() {
            config.repositories = self
                .repositories
                .iter()
                .enumerate()
                .map(|(index, spec)| RemoteRepository::parse(spec, index))
                .collect::<LauncherResult<Vec<_>>>()?;
        } else if !settings.repositories.is_empty() {
            config.repositories = settings.repositories;
        }

        if let Some(dir) = non_empty(self.local_repository).or(settings.local_repository) {
            config.local_repository = dir;
        }
        config.java_home = non_empty(self.java_home).or(settings.java_home);
        config.offline = self.offline || settings.offline;
        config.print_classpath = self.print_classpath;

        Ok(config)
    }
}

fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}
