use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::domains::git::discover_repository_root;
use crate::domains::process::CommandRunner;
use crate::errors::StellwerkError;
use crate::infrastructure::storage::{read_json, write_json_atomic};
use crate::shared::ProjectLayout;
use crate::utils::path_utils::{same_path, standardize_path};

use super::entity::{Project, Worktree};
use super::refresh::WorkspaceRefresher;

/// Ordered list of registered projects backed by `projects.json`.
#[derive(Debug, Default)]
pub struct ProjectStore {
    path: Option<PathBuf>,
    projects: Vec<Project>,
}

impl ProjectStore {
    /// Missing or unreadable files start an empty list.
    pub fn load(path: PathBuf) -> Self {
        let projects = match read_json::<Vec<Project>>(&path) {
            Ok(Some(projects)) => projects,
            Ok(None) => Vec::new(),
            Err(err) => {
                log::warn!("Failed to load projects from {}: {err}", path.display());
                Vec::new()
            }
        };
        log::debug!("Loaded {} projects from {}", projects.len(), path.display());
        Self {
            path: Some(path),
            projects,
        }
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Register the repository containing `path`. Returns `None` when that
    /// root is already registered.
    pub fn add_project(&mut self, path: &Path) -> Option<Project> {
        let root = discover_repository_root(path)
            .map(|root| standardize_path(&root))
            .unwrap_or_else(|| standardize_path(path));
        if self.projects.iter().any(|p| same_path(&p.root_path, &root)) {
            log::info!("Project {} is already registered", root.display());
            return None;
        }

        let project = Project::new(root);
        log::info!(
            "Registered project {} at {}",
            project.name,
            project.root_path.display()
        );
        self.projects.push(project.clone());
        self.persist();
        Some(project)
    }

    pub fn remove_project(&mut self, id: Uuid) -> Result<Project, StellwerkError> {
        let index = self.index_of(id)?;
        let removed = self.projects.remove(index);
        self.persist();
        Ok(removed)
    }

    /// Move the project at `from` so it ends up at index `to`.
    pub fn move_project(&mut self, from: usize, to: usize) -> bool {
        if from >= self.projects.len() || to >= self.projects.len() {
            return false;
        }
        let project = self.projects.remove(from);
        self.projects.insert(to, project);
        self.persist();
        true
    }

    /// Worktrees are never persisted, so this does not write.
    pub fn update_worktrees(
        &mut self,
        id: Uuid,
        worktrees: Vec<Worktree>,
    ) -> Result<(), StellwerkError> {
        let index = self.index_of(id)?;
        self.projects[index].worktrees = worktrees;
        Ok(())
    }

    pub async fn refresh<R: CommandRunner + 'static>(&mut self, refresher: &WorkspaceRefresher<R>) {
        refresher.refresh_all(&mut self.projects).await;
    }

    pub fn layout(&self) -> Vec<ProjectLayout> {
        self.projects.iter().map(Project::layout).collect()
    }

    pub fn save(&self) -> Result<(), StellwerkError> {
        match &self.path {
            Some(path) => write_json_atomic(path, &self.projects),
            None => Ok(()),
        }
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            log::error!("Failed to save projects: {err}");
        }
    }

    fn index_of(&self, id: Uuid) -> Result<usize, StellwerkError> {
        self.projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StellwerkError::ProjectNotFound {
                project_id: id.to_string(),
            })
    }
}
