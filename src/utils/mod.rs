pub mod env_adapter;
pub mod path_utils;
