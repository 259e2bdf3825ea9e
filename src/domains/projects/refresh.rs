use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;

use crate::domains::git::{DiffStats, diff_stats, list_worktrees};
use crate::domains::process::CommandRunner;
use crate::domains::records::{SessionRecord, SessionRecordScanner};
use crate::utils::path_utils::{same_path, standardize_path};

use super::entity::{Project, Worktree};

/// Per-worktree result of the slow phase, addressed by position.
#[derive(Debug, Clone)]
struct WorktreeScan {
    project_index: usize,
    worktree_index: usize,
    path: PathBuf,
    stats: DiffStats,
    sessions: Vec<SessionRecord>,
}

/// Two-phase scan keeping every project's worktrees current: a cheap
/// sequential listing, then concurrent diff stats and session records.
pub struct WorkspaceRefresher<R: CommandRunner> {
    runner: Arc<R>,
    scanner: SessionRecordScanner,
}

impl<R: CommandRunner + 'static> WorkspaceRefresher<R> {
    pub fn new(runner: Arc<R>, scanner: SessionRecordScanner) -> Self {
        Self { runner, scanner }
    }

    pub async fn refresh_all(&self, projects: &mut [Project]) {
        self.fast_phase(projects).await;
        self.slow_phase(projects).await;
    }

    /// One `git worktree list` per project, awaited in order so a repository
    /// is never listed concurrently. Known stats and records carry over for
    /// paths that are still present.
    pub async fn fast_phase(&self, projects: &mut [Project]) {
        for project in projects.iter_mut() {
            let discovered = list_worktrees(self.runner.as_ref(), &project.root_path).await;
            let mut worktrees: Vec<Worktree> = if discovered.is_empty() {
                vec![Worktree::new(project.name.clone(), &project.root_path)]
            } else {
                discovered
                    .into_iter()
                    .map(|w| Worktree::new(w.name, standardize_path(&w.path)))
                    .collect()
            };

            for worktree in worktrees.iter_mut() {
                if let Some(previous) = project
                    .worktrees
                    .iter()
                    .find(|old| same_path(&old.path, &worktree.path))
                {
                    worktree.carry_forward(previous);
                }
            }
            log::debug!(
                "Project {} has {} worktrees",
                project.name,
                worktrees.len()
            );
            project.worktrees = worktrees;
        }
    }

    /// Fan out one task per worktree, join them all, then write results in
    /// place.
    pub async fn slow_phase(&self, projects: &mut [Project]) {
        let mut tasks = Vec::new();
        for (project_index, project) in projects.iter().enumerate() {
            for (worktree_index, worktree) in project.worktrees.iter().enumerate() {
                let runner = Arc::clone(&self.runner);
                let scanner = self.scanner.clone();
                let path = worktree.path.clone();
                tasks.push(tokio::spawn(async move {
                    let stats = diff_stats(runner.as_ref(), &path).await;
                    let scan_path = path.clone();
                    let sessions =
                        match tokio::task::spawn_blocking(move || scanner.scan(&scan_path)).await {
                            Ok(sessions) => sessions,
                            Err(err) => {
                                log::warn!("Session scan for {} failed: {err}", path.display());
                                Vec::new()
                            }
                        };
                    WorktreeScan {
                        project_index,
                        worktree_index,
                        path,
                        stats,
                        sessions,
                    }
                }));
            }
        }

        let total = tasks.len();
        let mut applied = 0;
        for joined in join_all(tasks).await {
            match joined {
                Ok(scan) => {
                    if apply_scan(projects, scan) {
                        applied += 1;
                    }
                }
                Err(err) => log::warn!("Worktree scan task failed: {err}"),
            }
        }
        log::debug!("Applied {applied}/{total} worktree scans");
    }
}

/// Write one scan result in place. Results whose slot vanished or now holds a
/// different path are dropped.
fn apply_scan(projects: &mut [Project], scan: WorktreeScan) -> bool {
    let Some(worktree) = projects
        .get_mut(scan.project_index)
        .and_then(|p| p.worktrees.get_mut(scan.worktree_index))
    else {
        return false;
    };
    if !same_path(&worktree.path, &scan.path) {
        return false;
    }
    worktree.added_lines = Some(scan.stats.added);
    worktree.removed_lines = Some(scan.stats.removed);
    worktree.sessions = scan.sessions;
    true
}
