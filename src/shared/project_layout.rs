use std::path::{Path, PathBuf};

use crate::utils::path_utils::{last_component_name, same_path};

/// Display-order snapshot of the project list, handed to consumers that must
/// not own project state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub name: String,
    pub root_path: PathBuf,
    pub worktrees: Vec<WorktreeLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeLayout {
    pub name: String,
    pub path: PathBuf,
}

/// Project and worktree display names for `path`. A worktree match wins over
/// a project-root match; an unknown path uses its last component for both.
pub fn display_names_for(layout: &[ProjectLayout], path: &Path) -> (String, String) {
    for project in layout {
        if let Some(worktree) = project.worktrees.iter().find(|w| same_path(&w.path, path)) {
            return (project.name.clone(), worktree.name.clone());
        }
    }
    if let Some(project) = layout.iter().find(|p| same_path(&p.root_path, path)) {
        return (project.name.clone(), project.name.clone());
    }
    let fallback = last_component_name(path);
    (fallback.clone(), fallback)
}
