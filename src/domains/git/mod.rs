pub mod repository;
pub mod stats;
pub mod worktrees;

pub use repository::discover_repository_root;
pub use stats::{DiffStats, diff_stats, parse_shortstat};
pub use worktrees::{DiscoveredWorktree, list_worktrees, parse_worktree_porcelain};
