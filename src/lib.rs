pub mod cli;
pub mod domains;
pub mod errors;
pub mod infrastructure;
pub mod shared;
pub mod utils;

pub use errors::StellwerkError;
