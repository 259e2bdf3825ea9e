use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::domains::settings::{SettingsRepository, ToolCommands, executable_name};
use crate::shared::TabKind;

use super::debounce::EditDebouncer;
use super::search_path::current_search_path;

/// Result of one availability pass. Only the pass matching the checker's
/// current generation is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCheckOutcome {
    pub generation: u64,
    pub errors: BTreeMap<TabKind, String>,
}

/// Owns the configured tool commands and which of them resolve on the
/// augmented search path. Checks run off the owner and report back over a
/// channel.
pub struct ToolChecker {
    commands: ToolCommands,
    errors: BTreeMap<TabKind, String>,
    checking: bool,
    generation: u64,
    checks_started: u64,
    search_path: String,
    repository: Option<Arc<dyn SettingsRepository>>,
    outcome_tx: UnboundedSender<ToolCheckOutcome>,
    outcome_rx: UnboundedReceiver<ToolCheckOutcome>,
}

impl ToolChecker {
    pub fn new(commands: ToolCommands, search_path: String) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            commands,
            errors: BTreeMap::new(),
            checking: false,
            generation: 0,
            checks_started: 0,
            search_path,
            repository: None,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Load commands from `repository` and persist every accepted edit back.
    pub fn from_repository(repository: Arc<dyn SettingsRepository>) -> Self {
        let mut checker = Self::new(repository.load(), current_search_path());
        checker.repository = Some(repository);
        checker
    }

    pub fn commands(&self) -> &ToolCommands {
        &self.commands
    }

    pub fn command_for(&self, kind: TabKind) -> Option<&str> {
        self.commands.get(kind)
    }

    pub fn executable_name(&self, kind: TabKind) -> Option<&str> {
        self.commands.executable_name(kind)
    }

    pub fn search_path(&self) -> &str {
        &self.search_path
    }

    pub fn errors(&self) -> &BTreeMap<TabKind, String> {
        &self.errors
    }

    pub fn is_checking(&self) -> bool {
        self.checking
    }

    pub fn checks_started(&self) -> u64 {
        self.checks_started
    }

    /// `Shell` is always available.
    pub fn is_available(&self, kind: TabKind) -> bool {
        !self.errors.contains_key(&kind)
    }

    pub fn unavailable_tools(&self) -> Vec<(TabKind, String)> {
        self.errors
            .iter()
            .map(|(kind, message)| (*kind, message.clone()))
            .collect()
    }

    /// Start a pass over every tool kind. Any pass still in flight becomes
    /// stale and its outcome is dropped on arrival.
    pub fn check_availability(&mut self) -> JoinHandle<()> {
        self.generation += 1;
        self.checks_started += 1;
        self.checking = true;

        let generation = self.generation;
        let search_path = self.search_path.clone();
        let executables: Vec<(TabKind, Option<String>)> = TabKind::TOOL_KINDS
            .iter()
            .map(|kind| {
                (
                    *kind,
                    self.commands.executable_name(*kind).map(str::to_string),
                )
            })
            .collect();
        let outcome_tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let errors = match tokio::task::spawn_blocking(move || {
                resolve_executables(&executables, &search_path)
            })
            .await
            {
                Ok(errors) => errors,
                Err(err) => {
                    log::warn!("Tool availability check did not complete: {err}");
                    return;
                }
            };
            let _ = outcome_tx.send(ToolCheckOutcome { generation, errors });
        })
    }

    /// Returns whether the outcome was current and got applied.
    pub fn apply_outcome(&mut self, outcome: ToolCheckOutcome) -> bool {
        if outcome.generation != self.generation {
            log::debug!(
                "Dropping stale tool check {} (current {})",
                outcome.generation,
                self.generation
            );
            return false;
        }
        for (kind, message) in &outcome.errors {
            log::info!("{kind} tool unavailable: {message}");
        }
        self.errors = outcome.errors;
        self.checking = false;
        true
    }

    /// Apply whatever outcomes have already arrived.
    pub fn process_pending_outcomes(&mut self) -> bool {
        let mut applied = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            applied |= self.apply_outcome(outcome);
        }
        applied
    }

    /// Wait until the current pass has been applied.
    pub async fn wait_for_check(&mut self) {
        while self.checking {
            match self.outcome_rx.recv().await {
                Some(outcome) => {
                    self.apply_outcome(outcome);
                }
                None => break,
            }
        }
    }

    /// Set the command for `kind` and revalidate. A value that trims to empty
    /// is ignored, as is `Shell`.
    pub fn apply_edit(&mut self, kind: TabKind, value: &str) -> bool {
        let trimmed = value.trim();
        if trimmed.is_empty() || !kind.is_tool() {
            return false;
        }
        self.commands.set(kind, trimmed);
        self.persist();
        self.check_availability();
        true
    }

    pub fn reset_to_default(&mut self, kind: TabKind) -> bool {
        match ToolCommands::default_for(kind) {
            Some(default) => self.apply_edit(kind, default),
            None => false,
        }
    }

    /// Apply every edit whose quiet period has elapsed.
    pub fn apply_debounced(&mut self, debouncer: &mut EditDebouncer) -> usize {
        let mut applied = 0;
        while let Some(edit) = debouncer.try_next() {
            if self.apply_edit(edit.kind, &edit.value) {
                applied += 1;
            }
        }
        applied
    }

    fn persist(&self) {
        if let Some(repository) = &self.repository
            && let Err(err) = repository.save(&self.commands)
        {
            log::warn!("Failed to persist tool settings: {err}");
        }
    }
}

/// Resolve each executable on `search_path`; missing ones map to a message.
pub fn resolve_executables(
    executables: &[(TabKind, Option<String>)],
    search_path: &str,
) -> BTreeMap<TabKind, String> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    executables
        .iter()
        .filter_map(|(kind, executable)| {
            let Some(name) = executable.as_deref().and_then(executable_name) else {
                return Some((*kind, format!("no {kind} command configured")));
            };
            match which::which_in(name, Some(search_path), &cwd) {
                Ok(resolved) => {
                    log::debug!("{kind} tool resolved to {}", resolved.display());
                    None
                }
                Err(_) => Some((*kind, format!("{name} not found in PATH"))),
            }
        })
        .collect()
}
