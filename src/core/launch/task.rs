// ─── Launch Task ───
// Spawns the JVM with the wrapper JAR as its classpath and waits for it.

use std::future::Future;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::core::error::{LauncherError, LauncherResult};

/// Everything needed to fork the JVM once.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub java_bin: PathBuf,
    pub wrapper_path: PathBuf,
    pub main_class: String,
    /// Runtime options, placed before the main class.
    pub options: Vec<String>,
    /// Program arguments, placed after the main class.
    pub arguments: Vec<String>,
}

impl LaunchSpec {
    /// `<java> -cp <wrapper> [options...] <main-class> [arguments...]`
    pub fn command_line(&self) -> Vec<String> {
        let mut line = Vec::with_capacity(4 + self.options.len() + self.arguments.len());
        line.push(self.java_bin.to_string_lossy().to_string());
        line.push("-cp".to_string());
        line.push(self.wrapper_path.to_string_lossy().to_string());
        line.extend(self.options.iter().cloned());
        line.push(self.main_class.clone());
        line.extend(self.arguments.iter().cloned());
        line
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.java_bin);
        cmd.arg("-cp").arg(&self.wrapper_path);
        cmd.args(&self.options);
        cmd.arg(&self.main_class);
        cmd.args(&self.arguments);
        cmd
    }
}

/// Exit status of the forked process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationResult {
    pub exit_code: i32,
}

impl InvocationResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn into_result(self) -> LauncherResult<()> {
        if self.success() {
            Ok(())
        } else {
            Err(LauncherError::ProcessExit(self.exit_code))
        }
    }
}

/// Fork the JVM with inherited standard streams and wait for it to exit.
///
/// Ctrl-C while waiting kills the child and yields [`LauncherError::Interrupted`].
pub async fn run(spec: &LaunchSpec) -> LauncherResult<InvocationResult> {
    run_until(spec, tokio::signal::ctrl_c()).await
}

/// Like [`run`], but stops the child when `interrupt` completes first.
///
/// An `interrupt` that fails means no interruption can be delivered; the
/// child is then waited for normally.
pub async fn run_until<F>(spec: &LaunchSpec, interrupt: F) -> LauncherResult<InvocationResult>
where
    F: Future<Output = std::io::Result<()>>,
{
    let mut cmd = spec.command();
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());
    cmd.kill_on_drop(true);

    info!("Launching {} with Java: {:?}", spec.main_class, spec.java_bin);
    debug!("Command: {}", quoted_command_line(&spec.command_line()));

    let mut child = cmd
        .spawn()
        .map_err(|e| LauncherError::io(&spec.java_bin, e))?;

    let result = wait_for_exit(&mut child, spec, interrupt).await?;
    debug!("{} exited with code {}", spec.main_class, result.exit_code);
    Ok(result)
}

async fn wait_for_exit<F>(
    child: &mut Child,
    spec: &LaunchSpec,
    interrupt: F,
) -> LauncherResult<InvocationResult>
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(|e| LauncherError::io(&spec.java_bin, e))?;
            Ok(InvocationResult { exit_code: exit_code_of(status) })
        }
        signal = interrupt => {
            if let Err(e) = signal {
                warn!("Cannot listen for Ctrl-C: {}", e);
                let status = child
                    .wait()
                    .await
                    .map_err(|e| LauncherError::io(&spec.java_bin, e))?;
                return Ok(InvocationResult { exit_code: exit_code_of(status) });
            }
            warn!("Interrupted, stopping {}", spec.main_class);
            if let Err(e) = child.kill().await {
                warn!("Failed to kill child process: {}", e);
            }
            Err(LauncherError::Interrupted)
        }
    }
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Render a command line for the debug log, POSIX-quoting words that the
/// shell would otherwise split or expand.
fn quoted_command_line(words: &[String]) -> String {
    words
        .iter()
        .map(|word| quote_word(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_word(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-_.,/:=+@%".contains(&b));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', "'\\''"))
    }
}
