use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::domains::process::{CommandRunner, run_for_stdout};
use crate::shared::SessionStatus;
use crate::utils::path_utils::standardize_path;

/// Process-name fragments that suggest an agent runtime.
pub const DEFAULT_AGENT_PROCESS_PATTERNS: &[&str] = &["node", "bun", "/pi"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
}

/// How a process's working directory is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CwdLookup {
    /// Read `/proc/<pid>/cwd`, falling back to lsof.
    Procfs,
    /// `lsof -a -p <pid> -d cwd -Fn`.
    Lsof,
}

impl CwdLookup {
    pub fn platform_default() -> Self {
        if cfg!(target_os = "linux") {
            CwdLookup::Procfs
        } else {
            CwdLookup::Lsof
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityReport {
    pub worktree_path: PathBuf,
    pub agent_running: bool,
}

/// Best-effort detection of agent processes working inside a directory.
/// Every lookup failure reads as "not running".
pub struct ProcessActivityProber<R: CommandRunner> {
    runner: Arc<R>,
    patterns: Vec<String>,
    cwd_lookup: CwdLookup,
}

impl<R: CommandRunner + 'static> ProcessActivityProber<R> {
    pub fn new(runner: Arc<R>) -> Self {
        Self {
            runner,
            patterns: DEFAULT_AGENT_PROCESS_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            cwd_lookup: CwdLookup::platform_default(),
        }
    }

    /// Also treat processes named after the configured agent executable as
    /// candidates.
    pub fn with_agent_executable(mut self, executable: &str) -> Self {
        let executable = executable.trim();
        if !executable.is_empty() && !self.patterns.iter().any(|p| p == executable) {
            self.patterns.push(executable.to_string());
        }
        self
    }

    pub fn with_cwd_lookup(mut self, lookup: CwdLookup) -> Self {
        self.cwd_lookup = lookup;
        self
    }

    pub async fn is_agent_running(&self, directory: &Path) -> bool {
        let target = standardize_path(directory);
        let candidates: Vec<ProcessEntry> = self
            .list_processes()
            .await
            .into_iter()
            .filter(|entry| self.is_candidate(&entry.name))
            .collect();

        if candidates.is_empty() {
            return false;
        }
        log::debug!(
            "{} agent-like processes to check against {}",
            candidates.len(),
            target.display()
        );

        for candidate in candidates {
            if let Some(cwd) = self.process_cwd(candidate.pid).await
                && standardize_path(&cwd).starts_with(&target)
            {
                log::debug!(
                    "Process {} ({}) is working in {}",
                    candidate.pid,
                    candidate.name,
                    target.display()
                );
                return true;
            }
        }
        false
    }

    /// `Idle` when an agent-like process works in `directory`, else `Stopped`.
    /// Used for worktrees with no in-app tabs.
    pub async fn external_status(&self, directory: &Path) -> SessionStatus {
        if self.is_agent_running(directory).await {
            SessionStatus::Idle
        } else {
            SessionStatus::Stopped
        }
    }

    /// Probe on a worker task and hand the answer back to the owner.
    pub fn probe_in_background(
        self: &Arc<Self>,
        directory: PathBuf,
        reports: UnboundedSender<ActivityReport>,
    ) -> JoinHandle<()> {
        let prober = Arc::clone(self);
        tokio::spawn(async move {
            let agent_running = prober.is_agent_running(&directory).await;
            if reports
                .send(ActivityReport {
                    worktree_path: directory,
                    agent_running,
                })
                .is_err()
            {
                log::debug!("Activity report dropped: receiver closed");
            }
        })
    }

    fn is_candidate(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| name.contains(pattern))
    }

    async fn list_processes(&self) -> Vec<ProcessEntry> {
        run_for_stdout(self.runner.as_ref(), "ps", &["-eo", "pid,comm"], None)
            .await
            .map(|stdout| parse_process_table(&stdout))
            .unwrap_or_default()
    }

    async fn process_cwd(&self, pid: u32) -> Option<PathBuf> {
        if self.cwd_lookup == CwdLookup::Procfs {
            match std::fs::read_link(format!("/proc/{pid}/cwd")) {
                Ok(path) => return Some(path),
                Err(err) => log::debug!("procfs cwd lookup for {pid} failed: {err}"),
            }
        }

        let pid_arg = pid.to_string();
        run_for_stdout(
            self.runner.as_ref(),
            "lsof",
            &["-a", "-p", &pid_arg, "-d", "cwd", "-Fn"],
            None,
        )
        .await
        .and_then(|stdout| parse_lsof_cwd(&stdout))
    }
}

/// Parse `ps -eo pid,comm` output, skipping the header and malformed rows.
pub fn parse_process_table(output: &str) -> Vec<ProcessEntry> {
    output
        .lines()
        .filter_map(|line| {
            let (pid, name) = line.trim().split_once(char::is_whitespace)?;
            Some(ProcessEntry {
                pid: pid.parse().ok()?,
                name: name.trim().to_string(),
            })
        })
        .collect()
}

/// Extract the `n<path>` field from `lsof -Fn` output.
pub fn parse_lsof_cwd(output: &str) -> Option<PathBuf> {
    output.lines().find_map(|line| {
        let path = line.strip_prefix('n')?;
        if path.is_empty() || path.starts_with(' ') {
            return None;
        }
        Some(PathBuf::from(path))
    })
}
