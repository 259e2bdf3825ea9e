pub mod scanner;

pub use scanner::{
    SESSION_LOG_EXTENSION, SessionRecord, SessionRecordScanner, directory_matches_worktree,
};
