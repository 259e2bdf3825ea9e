use std::path::PathBuf;
use std::sync::Mutex;

use crate::errors::StellwerkError;
use crate::infrastructure::storage::{read_json, write_json_atomic};

use super::types::ToolCommands;

pub trait SettingsRepository: Send + Sync {
    /// Never fails: unreadable settings degrade to defaults.
    fn load(&self) -> ToolCommands;
    fn save(&self, commands: &ToolCommands) -> Result<(), StellwerkError>;
}

/// Tool settings stored as a JSON object in `settings.json`.
#[derive(Debug, Clone)]
pub struct FileSettingsRepository {
    path: PathBuf,
}

impl FileSettingsRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SettingsRepository for FileSettingsRepository {
    fn load(&self) -> ToolCommands {
        match read_json::<ToolCommands>(&self.path) {
            Ok(Some(commands)) => commands,
            Ok(None) => ToolCommands::default(),
            Err(err) => {
                log::warn!(
                    "Ignoring unreadable settings at {}: {err}",
                    self.path.display()
                );
                ToolCommands::default()
            }
        }
    }

    fn save(&self, commands: &ToolCommands) -> Result<(), StellwerkError> {
        write_json_atomic(&self.path, commands)?;
        log::debug!("Saved tool settings to {}", self.path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemorySettingsRepository {
    stored: Mutex<Option<ToolCommands>>,
}

impl InMemorySettingsRepository {
    pub fn stored(&self) -> Option<ToolCommands> {
        self.stored
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl SettingsRepository for InMemorySettingsRepository {
    fn load(&self) -> ToolCommands {
        self.stored().unwrap_or_default()
    }

    fn save(&self, commands: &ToolCommands) -> Result<(), StellwerkError> {
        *self.stored.lock().unwrap_or_else(|e| e.into_inner()) = Some(commands.clone());
        Ok(())
    }
}
