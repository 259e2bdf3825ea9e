use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of session kinds a worktree tab can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKind {
    Agent,
    Git,
    Diff,
    Shell,
}

impl TabKind {
    /// Kinds backed by a user-configurable tool command (everything but the
    /// plain shell).
    pub const TOOL_KINDS: [TabKind; 3] = [TabKind::Agent, TabKind::Git, TabKind::Diff];

    pub fn display_name(self) -> &'static str {
        match self {
            TabKind::Agent => "agent",
            TabKind::Git => "git",
            TabKind::Diff => "diff",
            TabKind::Shell => "shell",
        }
    }

    pub fn is_tool(self) -> bool {
        !matches!(self, TabKind::Shell)
    }
}

impl fmt::Display for TabKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TabKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "agent" => Ok(TabKind::Agent),
            "git" => Ok(TabKind::Git),
            "diff" => Ok(TabKind::Diff),
            "shell" => Ok(TabKind::Shell),
            other => Err(format!("unknown tab kind '{other}'")),
        }
    }
}
