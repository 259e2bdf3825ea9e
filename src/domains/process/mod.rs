pub mod runner;

#[cfg(test)]
pub mod testing;

pub use runner::{
    CommandOutput, CommandRunner, DEFAULT_COMMAND_TIMEOUT, SystemCommandRunner, run_for_stdout,
};
