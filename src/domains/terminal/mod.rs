pub mod entity;
pub mod manager;
pub mod notifier;
pub mod recent;
pub mod surface;
#[cfg(test)]
pub mod testing;

pub use entity::Tab;
pub use manager::TabManager;
pub use notifier::{LogNotifier, Notifier, SystemNotifier};
pub use recent::{MAX_RECENT_WORKTREES, RecentWorktree, RecentWorktreeRecorder, RecentWorktreeStore};
pub use surface::{
    DetachedSurfaceFactory, GotoTab, ProgressState, RenderingSurface, SurfaceCallbacks,
    SurfaceEvent, SurfaceEventKind, SurfaceFactory, SurfaceRequest, TabIntent,
};
