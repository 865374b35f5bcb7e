use std::collections::BTreeMap;
use std::path::PathBuf;

use super::settings::default_local_repository;
use crate::core::maven::RemoteRepository;

const OPTION_PREFIX: &str = "opt.";
const ARGUMENT_PREFIX: &str = "arg.";

/// Everything one `mvnrun` run needs, after flags, environment and the
/// settings file have been merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationConfig {
    /// Coordinate string as given; parsed by the pipeline.
    pub artifact: String,
    pub class_name: Option<String>,
    /// Explicit runtime options. When empty, `opt.N` properties apply.
    pub options: Vec<String>,
    /// Explicit program arguments. When empty, `arg.N` properties apply.
    pub arguments: Vec<String>,
    pub properties: BTreeMap<String, String>,
    pub repositories: Vec<RemoteRepository>,
    pub local_repository: PathBuf,
    pub java_home: Option<PathBuf>,
    pub offline: bool,
    pub print_classpath: bool,
}

impl InvocationConfig {
    pub fn new(artifact: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            class_name: None,
            options: Vec::new(),
            arguments: Vec::new(),
            properties: BTreeMap::new(),
            repositories: vec![RemoteRepository::central()],
            local_repository: default_local_repository(),
            java_home: None,
            offline: false,
            print_classpath: false,
        }
    }

    pub fn resolved_options(&self) -> Vec<String> {
        explicit_or_indexed(&self.options, &self.properties, OPTION_PREFIX)
    }

    pub fn resolved_arguments(&self) -> Vec<String> {
        explicit_or_indexed(&self.arguments, &self.properties, ARGUMENT_PREFIX)
    }
}

fn explicit_or_indexed(
    explicit: &[String],
    properties: &BTreeMap<String, String>,
    prefix: &str,
) -> Vec<String> {
    if explicit.is_empty() {
        indexed_values(properties, prefix)
    } else {
        explicit.to_vec()
    }
}

/// Values of `<prefix>0`, `<prefix>1`, ... up to the first missing index.
pub fn indexed_values(properties: &BTreeMap<String, String>, prefix: &str) -> Vec<String> {
    (0..)
        .map_while(|i| properties.get(&format!("{prefix}{i}")).cloned())
        .collect()
}
