pub mod service;
pub mod types;

pub use service::{FileSettingsRepository, InMemorySettingsRepository, SettingsRepository};
pub use types::*;
