pub mod cli;
pub mod core;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::core::config::Settings;
use crate::core::error::LauncherResult;
use crate::core::launch::join_classpath;
use crate::core::{exit_codes, pipeline};

const LOG_ENV: &str = "MVNRUN_LOG";

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout belongs to the launched program.
    let default_filter = if cli.verbose {
        "debug"
    } else {
        "warn,mvnrun_lib=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            return ExitCode::from(exit_codes::IO_FAILURE as u8);
        }
    };

    match runtime.block_on(dispatch(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

async fn dispatch(cli: Cli) -> LauncherResult<()> {
    let settings = Settings::load(cli.settings.as_deref())?;
    let config = cli.into_config(settings)?;
    let resolver = pipeline::maven_resolver(&config)?;

    if config.print_classpath {
        let classpath = pipeline::resolve_classpath(&config, &resolver).await?;
        println!("{}", join_classpath(&classpath));
        return Ok(());
    }

    pipeline::execute(&config, &resolver).await
}
