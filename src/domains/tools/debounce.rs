use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::shared::TabKind;

pub const EDIT_QUIET_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebouncedEdit {
    pub kind: TabKind,
    pub value: String,
}

#[derive(Default)]
struct PendingEdit {
    generation: Arc<AtomicU64>,
    timer: Option<JoinHandle<()>>,
}

/// Per-field trailing debounce for tool command edits. Each edit restarts
/// that field's timer; only the last value of a burst is delivered.
pub struct EditDebouncer {
    quiet_period: Duration,
    pending: HashMap<TabKind, PendingEdit>,
    ready_tx: UnboundedSender<DebouncedEdit>,
    ready_rx: UnboundedReceiver<DebouncedEdit>,
}

impl Default for EditDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl EditDebouncer {
    pub fn new() -> Self {
        Self::with_quiet_period(EDIT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(quiet_period: Duration) -> Self {
        let (ready_tx, ready_rx) = mpsc::unbounded_channel();
        Self {
            quiet_period,
            pending: HashMap::new(),
            ready_tx,
            ready_rx,
        }
    }

    pub fn edit(&mut self, kind: TabKind, value: impl Into<String>) {
        let value = value.into();
        let slot = self.pending.entry(kind).or_default();
        let generation = slot.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }

        let latest = Arc::clone(&slot.generation);
        let ready_tx = self.ready_tx.clone();
        let quiet_period = self.quiet_period;
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            // An abort can lose the race with a timer that already woke.
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }
            let _ = ready_tx.send(DebouncedEdit { kind, value });
        }));
    }

    /// Drop any edit still inside its quiet period.
    pub fn cancel(&mut self, kind: TabKind) {
        if let Some(slot) = self.pending.get_mut(&kind) {
            slot.generation.fetch_add(1, Ordering::SeqCst);
            if let Some(timer) = slot.timer.take() {
                timer.abort();
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .values()
            .any(|slot| slot.timer.as_ref().is_some_and(|t| !t.is_finished()))
    }

    pub fn try_next(&mut self) -> Option<DebouncedEdit> {
        self.ready_rx.try_recv().ok()
    }

    pub async fn next(&mut self) -> Option<DebouncedEdit> {
        self.ready_rx.recv().await
    }
}

impl Drop for EditDebouncer {
    fn drop(&mut self) {
        for slot in self.pending.values_mut() {
            if let Some(timer) = slot.timer.take() {
                timer.abort();
            }
        }
    }
}
