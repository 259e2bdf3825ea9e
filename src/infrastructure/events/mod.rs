use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::TabKind;

const EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TabEvent {
    TabCreated {
        tab_id: Uuid,
        kind: TabKind,
        worktree_path: PathBuf,
    },
    TabClosed {
        tab_id: Uuid,
    },
    TabSelected {
        tab_id: Option<Uuid>,
    },
    WorktreeSelected {
        path: Option<PathBuf>,
    },
    TitleChanged {
        tab_id: Uuid,
        title: String,
    },
    ActivityChanged {
        tab_id: Uuid,
        running: bool,
    },
    Notified {
        tab_id: Uuid,
        title: String,
        body: String,
    },
}

impl TabEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TabEvent::TabCreated { .. } => "stellwerk:tab-created",
            TabEvent::TabClosed { .. } => "stellwerk:tab-closed",
            TabEvent::TabSelected { .. } => "stellwerk:tab-selected",
            TabEvent::WorktreeSelected { .. } => "stellwerk:worktree-selected",
            TabEvent::TitleChanged { .. } => "stellwerk:title-changed",
            TabEvent::ActivityChanged { .. } => "stellwerk:activity-changed",
            TabEvent::Notified { .. } => "stellwerk:notified",
        }
    }
}

/// Broadcast fan-out for state-change notifications. Publishing with no
/// subscribers is fine.
#[derive(Debug, Clone)]
pub struct EventBus<E: Clone> {
    sender: broadcast::Sender<E>,
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);
        Self { sender }
    }
}

impl<E: Clone> EventBus<E> {
    pub fn publish(&self, event: E) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }
}
