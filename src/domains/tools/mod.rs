pub mod availability;
pub mod debounce;
pub mod search_path;

pub use availability::{ToolCheckOutcome, ToolChecker, resolve_executables};
pub use debounce::{DebouncedEdit, EDIT_QUIET_PERIOD, EditDebouncer};
pub use search_path::{augmented_search_path, current_search_path, extra_search_dirs};
