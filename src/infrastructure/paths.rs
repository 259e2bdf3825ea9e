use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "STELLWERK_DATA_DIR";
pub const SESSIONS_DIR_ENV: &str = "STELLWERK_SESSIONS_DIR";

const APP_DIR_NAME: &str = "stellwerk";
const PROJECTS_FILE: &str = "projects.json";
const SETTINGS_FILE: &str = "settings.json";
const RECENT_FILE: &str = "recent.json";

/// Locations of everything stellwerk reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub sessions_dir: PathBuf,
}

impl AppPaths {
    /// Resolve from `STELLWERK_DATA_DIR` / `STELLWERK_SESSIONS_DIR`, falling
    /// back to the platform data dir and `~/.pi/agent/sessions`.
    pub fn from_env() -> Self {
        let data_dir = env_path(DATA_DIR_ENV).unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR_NAME)
        });
        let sessions_dir = env_path(SESSIONS_DIR_ENV).unwrap_or_else(default_sessions_dir);
        Self {
            data_dir,
            sessions_dir,
        }
    }

    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = data_dir;
        self
    }

    pub fn projects_file(&self) -> PathBuf {
        self.data_dir.join(PROJECTS_FILE)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    pub fn recent_file(&self) -> PathBuf {
        self.data_dir.join(RECENT_FILE)
    }
}

pub fn default_sessions_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".pi")
        .join("agent")
        .join("sessions")
}

fn env_path(key: &str) -> Option<PathBuf> {
    let value = std::env::var_os(key)?;
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
