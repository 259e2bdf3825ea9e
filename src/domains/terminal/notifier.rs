use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domains::process::CommandRunner;

/// Posts desktop notifications on behalf of terminal sessions.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Writes notifications to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        log::info!("Notification: {title}: {body}");
    }
}

/// Delivers through `osascript` on macOS and `notify-send` elsewhere.
/// Fire-and-forget; delivery failures are only logged.
pub struct SystemNotifier<R: CommandRunner> {
    runner: Arc<R>,
}

impl<R: CommandRunner + 'static> SystemNotifier<R> {
    pub fn new(runner: Arc<R>) -> Self {
        Self { runner }
    }

    pub fn post(&self, title: &str, body: &str) -> Option<JoinHandle<()>> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                log::warn!("No async runtime to deliver notification '{title}'");
                return None;
            }
        };
        let (program, args) = notification_command(title, body);
        let runner = Arc::clone(&self.runner);
        Some(handle.spawn(async move {
            let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
            match runner.run(program, &arg_refs, None, &[]).await {
                Ok(output) if output.success() => {}
                Ok(output) => log::debug!(
                    "{program} exited with {:?}: {}",
                    output.status,
                    output.stderr.trim()
                ),
                Err(err) => log::warn!("Failed to post notification via {program}: {err}"),
            }
        }))
    }
}

impl<R: CommandRunner + 'static> Notifier for SystemNotifier<R> {
    fn notify(&self, title: &str, body: &str) {
        let _ = self.post(title, body);
    }
}

pub fn notification_command(title: &str, body: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "macos") {
        let script = format!(
            "display notification \"{}\" with title \"{}\"",
            escape_quotes(body),
            escape_quotes(title)
        );
        ("osascript", vec!["-e".to_string(), script])
    } else {
        ("notify-send", vec![title.to_string(), body.to_string()])
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
