use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::runner::{CommandOutput, CommandRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLog {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
enum Scripted {
    Output(CommandOutput),
    SpawnError,
}

/// Routes invocations by `program + args + cwd` so concurrent callers get
/// deterministic answers regardless of completion order. Unscripted calls fail
/// as if the program were missing.
#[derive(Default, Clone)]
pub struct MockRunner {
    calls: Arc<Mutex<Vec<CommandLog>>>,
    scripted: Arc<Mutex<HashMap<String, Scripted>>>,
}

fn route_key(program: &str, args: &[&str], cwd: Option<&Path>) -> String {
    format!(
        "{program}|{}|{}",
        args.join(" "),
        cwd.map(|p| p.display().to_string()).unwrap_or_default()
    )
}

pub fn ok_output(stdout: &str) -> CommandOutput {
    CommandOutput {
        status: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn failed_output(status: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        status: Some(status),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

impl MockRunner {
    pub fn respond(&self, program: &str, args: &[&str], cwd: Option<&Path>, output: CommandOutput) {
        self.scripted
            .lock()
            .unwrap()
            .insert(route_key(program, args, cwd), Scripted::Output(output));
    }

    pub fn fail_spawn(&self, program: &str, args: &[&str], cwd: Option<&Path>) {
        self.scripted
            .lock()
            .unwrap()
            .insert(route_key(program, args, cwd), Scripted::SpawnError);
    }

    pub fn calls(&self) -> Vec<CommandLog> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<CommandLog> {
        self.calls()
            .into_iter()
            .filter(|call| call.program == program)
            .collect()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        current_dir: Option<&Path>,
        env: &[(&str, &str)],
    ) -> io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(CommandLog {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: current_dir.map(|p| p.to_path_buf()),
            env: env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        let scripted = self
            .scripted
            .lock()
            .unwrap()
            .get(&route_key(program, args, current_dir))
            .cloned();
        match scripted {
            Some(Scripted::Output(output)) => Ok(output),
            Some(Scripted::SpawnError) | None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{program} not scripted"),
            )),
        }
    }
}
