use serde::{Deserialize, Serialize};

/// Derived activity state of a worktree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    /// An agent tab reported progress (set or indeterminate).
    Running,
    /// Agent present but waiting for input.
    Idle,
    /// No agent, other terminals open.
    TerminalOnly,
    Stopped,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Running => "running",
            SessionStatus::Idle => "idle",
            SessionStatus::TerminalOnly => "terminal-only",
            SessionStatus::Stopped => "stopped",
        }
    }
}
