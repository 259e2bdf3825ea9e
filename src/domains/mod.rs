pub mod activity;
pub mod git;
pub mod process;
pub mod projects;
pub mod records;
pub mod settings;
pub mod terminal;
pub mod tools;
