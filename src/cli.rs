use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::domains::activity::ProcessActivityProber;
use crate::domains::process::SystemCommandRunner;
use crate::domains::projects::{Project, ProjectStore, WorkspaceRefresher};
use crate::domains::records::SessionRecordScanner;
use crate::domains::settings::FileSettingsRepository;
use crate::domains::tools::ToolChecker;
use crate::errors::StellwerkError;
use crate::infrastructure::AppPaths;
use crate::shared::TabKind;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(
    name = "stellwerk",
    version = VERSION,
    about = "Worktree-aware terminal session orchestration"
)]
pub struct Cli {
    /// Directory holding projects.json, settings.json and recent.json.
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage registered projects.
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Rediscover worktrees, diff stats and session records for every project.
    Refresh {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Report whether an agent process is working in a directory.
    Status { path: PathBuf },
    /// Inspect and edit tool commands.
    Tools {
        #[command(subcommand)]
        action: ToolAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProjectAction {
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    Add {
        path: PathBuf,
    },
    Remove {
        id: Uuid,
    },
}

#[derive(Debug, Subcommand)]
pub enum ToolAction {
    /// Check that every configured tool resolves on the search path.
    Check,
    /// Set the command for a tool kind (agent, git, diff).
    Set { kind: TabKind, command: String },
    /// Restore the built-in command for a tool kind.
    Reset { kind: TabKind },
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut paths = AppPaths::from_env();
    if let Some(data_dir) = cli.data_dir {
        paths = paths.with_data_dir(data_dir);
    }
    log::debug!("Using data directory {}", paths.data_dir.display());

    match cli.command {
        Commands::Projects { action } => run_projects(&paths, action),
        Commands::Refresh { json } => run_refresh(&paths, json).await,
        Commands::Status { path } => run_status(&paths, &path).await,
        Commands::Tools { action } => run_tools(&paths, action).await,
    }
}

fn run_projects(paths: &AppPaths, action: ProjectAction) -> Result<()> {
    let mut store = ProjectStore::load(paths.projects_file());
    match action {
        ProjectAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.projects())?);
            } else if store.projects().is_empty() {
                println!("No projects registered");
            } else {
                for project in store.projects() {
                    println!("{}  {}  {}", project.id, project.name, project.root_path.display());
                }
            }
        }
        ProjectAction::Add { path } => {
            let path = std::path::absolute(&path)
                .with_context(|| format!("resolving {}", path.display()))?;
            if !path.is_dir() {
                return Err(StellwerkError::invalid_input("path", "not a directory").into());
            }
            let project = store.add_project(&path).ok_or_else(|| {
                StellwerkError::ProjectAlreadyExists {
                    root_path: path.display().to_string(),
                }
            })?;
            store.save()?;
            println!("Added {} ({})", project.name, project.id);
        }
        ProjectAction::Remove { id } => {
            let removed = store.remove_project(id)?;
            store.save()?;
            println!("Removed {}", removed.name);
        }
    }
    Ok(())
}

async fn run_refresh(paths: &AppPaths, json: bool) -> Result<()> {
    let mut store = ProjectStore::load(paths.projects_file());
    let refresher = WorkspaceRefresher::new(
        Arc::new(SystemCommandRunner::default()),
        SessionRecordScanner::new(paths.sessions_dir.clone()),
    );
    store.refresh(&refresher).await;

    if json {
        let report: Vec<serde_json::Value> = store.projects().iter().map(project_report).collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    for project in store.projects() {
        println!("{}  {}", project.name, project.root_path.display());
        for worktree in &project.worktrees {
            println!(
                "  {:<24} +{:<6} -{:<6} {:>3} sessions  {}",
                worktree.name,
                worktree.added_lines.unwrap_or_default(),
                worktree.removed_lines.unwrap_or_default(),
                worktree.sessions.len(),
                worktree.path.display()
            );
        }
    }
    Ok(())
}

fn project_report(project: &Project) -> serde_json::Value {
    serde_json::json!({
        "id": project.id,
        "name": project.name,
        "rootPath": project.root_path,
        "worktrees": project.worktrees,
    })
}

async fn run_status(paths: &AppPaths, path: &Path) -> Result<()> {
    let path = std::path::absolute(path).with_context(|| format!("resolving {}", path.display()))?;
    let settings = FileSettingsRepository::new(paths.settings_file());
    let checker = ToolChecker::from_repository(Arc::new(settings));
    let mut prober = ProcessActivityProber::new(Arc::new(SystemCommandRunner::default()));
    if let Some(agent) = checker.executable_name(TabKind::Agent) {
        prober = prober.with_agent_executable(agent);
    }
    let status = prober.external_status(&path).await;
    println!("{}  {}", status.as_str(), path.display());
    Ok(())
}

async fn run_tools(paths: &AppPaths, action: ToolAction) -> Result<()> {
    let settings = FileSettingsRepository::new(paths.settings_file());
    let mut checker = ToolChecker::from_repository(Arc::new(settings));

    match action {
        ToolAction::Check => {
            checker.check_availability();
        }
        ToolAction::Set { kind, command } => {
            if !kind.is_tool() {
                bail!("{kind} has no configurable command");
            }
            if !checker.apply_edit(kind, &command) {
                return Err(StellwerkError::invalid_input("command", "must not be empty").into());
            }
        }
        ToolAction::Reset { kind } => {
            if !checker.reset_to_default(kind) {
                bail!("{kind} has no configurable command");
            }
        }
    }
    checker.wait_for_check().await;

    for kind in TabKind::TOOL_KINDS {
        let command = checker.command_for(kind).unwrap_or_default();
        let state = checker
            .errors()
            .get(&kind)
            .map(String::as_str)
            .unwrap_or("ok");
        println!("{:<6} {:<28} {}", kind.display_name(), command, state);
    }
    Ok(())
}
