use std::path::{Path, PathBuf};

use git2::Repository;

/// Work-dir root of the repository containing `path`, if any. Bare
/// repositories have no work-dir and yield `None`.
pub fn discover_repository_root(path: &Path) -> Option<PathBuf> {
    let repo = Repository::discover(path).ok()?;
    repo.workdir().map(|dir| {
        let trimmed = dir.to_string_lossy();
        let trimmed = trimmed.trim_end_matches(std::path::MAIN_SEPARATOR);
        if trimmed.is_empty() {
            dir.to_path_buf()
        } else {
            PathBuf::from(trimmed)
        }
    })
}
