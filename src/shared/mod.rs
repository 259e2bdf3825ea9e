pub mod project_layout;
pub mod session_status;
pub mod tab_kind;

pub use project_layout::{ProjectLayout, WorktreeLayout, display_names_for};
pub use session_status::SessionStatus;
pub use tab_kind::TabKind;
