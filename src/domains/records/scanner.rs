use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::utils::path_utils::{last_component_name, standardize_path};

pub const SESSION_LOG_EXTENSION: &str = "jsonl";
const PATH_DELIMITER: &str = "--";

/// A session log file found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    /// File name without extension.
    pub id: String,
    pub path: PathBuf,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionRecordScanner {
    base_dir: PathBuf,
    extension: String,
}

impl SessionRecordScanner {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            extension: SESSION_LOG_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Session records belonging to `worktree_path`, newest first. A missing
    /// or unreadable base directory yields an empty list.
    pub fn scan(&self, worktree_path: &Path) -> Vec<SessionRecord> {
        let mut records: Vec<SessionRecord> = self
            .matching_directories(worktree_path)
            .iter()
            .flat_map(|dir| self.records_in(dir))
            .collect();
        records.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        records
    }

    fn matching_directories(&self, worktree_path: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::debug!(
                    "Session base {} not readable: {err}",
                    self.base_dir.display()
                );
                return Vec::new();
            }
        };

        entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                if is_hidden(&name) || !directory_matches_worktree(&name, worktree_path) {
                    return None;
                }
                Some(entry.path())
            })
            .collect()
    }

    fn records_in(&self, dir: &Path) -> Vec<SessionRecord> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Failed to list session directory {}: {err}", dir.display());
                return Vec::new();
            }
        };

        entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().to_string();
                if is_hidden(&name)
                    || path.extension().and_then(|ext| ext.to_str()) != Some(self.extension.as_str())
                {
                    return None;
                }
                let id = path.file_stem()?.to_string_lossy().to_string();
                let last_modified = entry
                    .metadata()
                    .and_then(|meta| meta.modified())
                    .map(DateTime::<Utc>::from)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                Some(SessionRecord {
                    id,
                    path,
                    last_modified,
                })
            })
            .collect()
    }
}

/// Whether a session directory named `dir_name` belongs to `worktree_path`.
///
/// Matches when the name contains the absolute worktree path with separators
/// replaced by `--`, or contains the worktree's bare directory name. The
/// second rule is loose: `/w/app` also claims directories of `/w/app-v2` or
/// `/other/app`.
pub fn directory_matches_worktree(dir_name: &str, worktree_path: &Path) -> bool {
    let standardized = standardize_path(worktree_path);
    let encoded = standardized
        .to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, PATH_DELIMITER);
    if !encoded.is_empty() && dir_name.contains(&encoded) {
        return true;
    }

    let bare_name = last_component_name(&standardized);
    !bare_name.is_empty() && bare_name != "/" && dir_name.contains(&bare_name)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
