pub mod entity;
pub mod refresh;
pub mod store;

pub use entity::{Project, Worktree};
pub use refresh::WorkspaceRefresher;
pub use store::ProjectStore;
