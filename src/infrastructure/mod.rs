pub mod events;
pub mod paths;
pub mod storage;

pub use events::{EventBus, TabEvent};
pub use paths::AppPaths;
