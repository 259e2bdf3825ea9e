use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::records::SessionRecord;
use crate::shared::{ProjectLayout, WorktreeLayout};
use crate::utils::path_utils::last_component_name;

/// A registered repository root. Only `id`, `rootPath` and `name` are
/// persisted; worktrees are always rediscovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub root_path: PathBuf,
    pub name: String,
    #[serde(skip)]
    pub worktrees: Vec<Worktree>,
}

impl Project {
    pub fn new(root_path: PathBuf) -> Self {
        let name = last_component_name(&root_path);
        Self {
            id: Uuid::new_v4(),
            root_path,
            name,
            worktrees: Vec::new(),
        }
    }

    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout {
            name: self.name.clone(),
            root_path: self.root_path.clone(),
            worktrees: self
                .worktrees
                .iter()
                .map(|w| WorktreeLayout {
                    name: w.name.clone(),
                    path: w.path.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Worktree {
    pub name: String,
    pub path: PathBuf,
    /// `None` until the first slow-phase scan.
    pub added_lines: Option<u32>,
    pub removed_lines: Option<u32>,
    pub sessions: Vec<SessionRecord>,
}

impl Worktree {
    pub fn new(name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            path: path.as_ref().to_path_buf(),
            added_lines: None,
            removed_lines: None,
            sessions: Vec::new(),
        }
    }

    /// Keep stats and records already known for the same path.
    pub fn carry_forward(&mut self, previous: &Worktree) {
        self.added_lines = previous.added_lines;
        self.removed_lines = previous.removed_lines;
        self.sessions = previous.sessions.clone();
    }
}
