use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

/// Upper bound for a single external invocation (git, ps, lsof, which).
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Stdout of a successful run, `None` otherwise.
    pub fn into_success_stdout(self) -> Option<String> {
        if self.success() {
            Some(self.stdout)
        } else {
            None
        }
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        current_dir: Option<&Path>,
        env: &[(&str, &str)],
    ) -> io::Result<CommandOutput>;
}

/// Runs programs through `tokio::process` with the inherited environment,
/// killing them when they exceed the configured timeout.
#[derive(Debug, Clone)]
pub struct SystemCommandRunner {
    timeout: Duration,
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl SystemCommandRunner {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        current_dir: Option<&Path>,
        env: &[(&str, &str)],
    ) -> io::Result<CommandOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in env {
            cmd.env(key, value);
        }

        log::debug!("Running `{program} {}`", args.join(" "));

        let output = match timeout(self.timeout, cmd.output()).await {
            Ok(result) => result?,
            Err(_) => {
                log::warn!(
                    "`{program}` did not finish within {}ms, killed",
                    self.timeout.as_millis()
                );
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("{program} timed out"),
                ));
            }
        };

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Run a command and collapse every failure mode (spawn error, timeout,
/// non-zero exit) into `None`, logging why.
pub async fn run_for_stdout<R: CommandRunner + ?Sized>(
    runner: &R,
    program: &str,
    args: &[&str],
    current_dir: Option<&Path>,
) -> Option<String> {
    match runner.run(program, args, current_dir, &[]).await {
        Ok(output) if output.success() => Some(output.stdout),
        Ok(output) => {
            log::debug!(
                "`{program} {}` exited with {:?}: {}",
                args.join(" "),
                output.status,
                output.stderr.trim()
            );
            None
        }
        Err(err) => {
            log::warn!("Failed to run `{program} {}`: {err}", args.join(" "));
            None
        }
    }
}
