use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

use crate::shared::TabKind;

/// One interactive terminal session bound to a worktree. Its surface lives in
/// the manager's ownership table, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: Uuid,
    pub kind: TabKind,
    pub worktree_path: PathBuf,
    pub title: String,
    pub has_notification: bool,
    pub is_running: bool,
}

impl Tab {
    pub fn new(kind: TabKind, worktree_path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            worktree_path,
            title: kind.display_name().to_string(),
            has_notification: false,
            is_running: false,
        }
    }
}
