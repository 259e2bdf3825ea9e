use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::infrastructure::storage::{read_json, write_json_atomic};
use crate::utils::path_utils::{same_path, standardize_path};

pub const MAX_RECENT_WORKTREES: usize = 20;

/// Receives "worktree opened" notices from the tab manager.
pub trait RecentWorktreeRecorder: Send + Sync {
    fn record_open(&self, path: &Path, project_name: &str, worktree_name: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentWorktree {
    pub path: PathBuf,
    pub project_name: String,
    pub worktree_name: String,
    pub opened_at: DateTime<Utc>,
}

/// Most-recent-first list of opened worktrees, one entry per path.
#[derive(Debug, Default)]
pub struct RecentWorktreeStore {
    file: Option<PathBuf>,
    entries: Mutex<Vec<RecentWorktree>>,
}

impl RecentWorktreeStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn load(file: PathBuf) -> Self {
        let entries = match read_json::<Vec<RecentWorktree>>(&file) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(err) => {
                log::warn!("Ignoring unreadable recents at {}: {err}", file.display());
                Vec::new()
            }
        };
        Self {
            file: Some(file),
            entries: Mutex::new(entries),
        }
    }

    pub fn entries(&self) -> Vec<RecentWorktree> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl RecentWorktreeRecorder for RecentWorktreeStore {
    fn record_open(&self, path: &Path, project_name: &str, worktree_name: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|entry| !same_path(&entry.path, path));
        entries.insert(
            0,
            RecentWorktree {
                path: standardize_path(path),
                project_name: project_name.to_string(),
                worktree_name: worktree_name.to_string(),
                opened_at: Utc::now(),
            },
        );
        entries.truncate(MAX_RECENT_WORKTREES);

        if let Some(file) = &self.file
            && let Err(err) = write_json_atomic(file, &*entries)
        {
            log::warn!("Failed to save recent worktrees: {err}");
        }
    }
}
