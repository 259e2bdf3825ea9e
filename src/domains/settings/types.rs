use serde::{Deserialize, Serialize};

use crate::shared::TabKind;

pub const DEFAULT_AGENT_COMMAND: &str = "pi";
pub const DEFAULT_GIT_COMMAND: &str = "lazygit";
pub const DEFAULT_DIFF_COMMAND: &str = "lumen diff";

/// The command line each tool tab launches. Persisted under the
/// `toolCommand.<kind>` keys; missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommands {
    #[serde(rename = "toolCommand.agent", default = "default_agent")]
    pub agent: String,
    #[serde(rename = "toolCommand.git", default = "default_git")]
    pub git: String,
    #[serde(rename = "toolCommand.diff", default = "default_diff")]
    pub diff: String,
}

fn default_agent() -> String {
    DEFAULT_AGENT_COMMAND.to_string()
}

fn default_git() -> String {
    DEFAULT_GIT_COMMAND.to_string()
}

fn default_diff() -> String {
    DEFAULT_DIFF_COMMAND.to_string()
}

impl Default for ToolCommands {
    fn default() -> Self {
        Self {
            agent: default_agent(),
            git: default_git(),
            diff: default_diff(),
        }
    }
}

impl ToolCommands {
    pub fn default_for(kind: TabKind) -> Option<&'static str> {
        match kind {
            TabKind::Agent => Some(DEFAULT_AGENT_COMMAND),
            TabKind::Git => Some(DEFAULT_GIT_COMMAND),
            TabKind::Diff => Some(DEFAULT_DIFF_COMMAND),
            TabKind::Shell => None,
        }
    }

    pub fn get(&self, kind: TabKind) -> Option<&str> {
        match kind {
            TabKind::Agent => Some(&self.agent),
            TabKind::Git => Some(&self.git),
            TabKind::Diff => Some(&self.diff),
            TabKind::Shell => None,
        }
    }

    /// Returns false for `Shell`, which has no configurable command.
    pub fn set(&mut self, kind: TabKind, command: &str) -> bool {
        let slot = match kind {
            TabKind::Agent => &mut self.agent,
            TabKind::Git => &mut self.git,
            TabKind::Diff => &mut self.diff,
            TabKind::Shell => return false,
        };
        *slot = command.to_string();
        true
    }

    /// First whitespace-delimited token of the configured command.
    pub fn executable_name(&self, kind: TabKind) -> Option<&str> {
        self.get(kind).and_then(executable_name)
    }

    /// Terminal input that replaces the login shell with the tool.
    pub fn initial_input(&self, kind: TabKind) -> Option<String> {
        self.get(kind)
            .map(|command| format!("clear && exec {command}\n"))
    }
}

pub fn executable_name(command: &str) -> Option<&str> {
    command.split_whitespace().next()
}
