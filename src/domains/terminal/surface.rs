use std::path::PathBuf;

use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    Set,
    Indeterminate,
    Remove,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GotoTab {
    Previous,
    Next,
    Last,
    Index(usize),
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIntent {
    NewTab,
    CloseTab,
    Goto(GotoTab),
}

impl TabIntent {
    /// Whether the manager acts on this intent. Known without consulting
    /// manager state, so surfaces get their answer immediately.
    pub fn is_handled(self) -> bool {
        !matches!(self, TabIntent::Goto(GotoTab::Unknown))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEventKind {
    TitleChanged(String),
    CloseRequested,
    Progress(ProgressState),
    DesktopNotification { title: String, body: String },
    Intent(TabIntent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceEvent {
    pub tab_id: Uuid,
    pub kind: SurfaceEventKind,
}

/// Callback slots handed to a rendering surface. Safe to call from any
/// thread; every call becomes a message for the tab manager.
#[derive(Debug, Clone)]
pub struct SurfaceCallbacks {
    tab_id: Uuid,
    sender: UnboundedSender<SurfaceEvent>,
}

impl SurfaceCallbacks {
    pub(crate) fn new(tab_id: Uuid, sender: UnboundedSender<SurfaceEvent>) -> Self {
        Self { tab_id, sender }
    }

    pub fn tab_id(&self) -> Uuid {
        self.tab_id
    }

    pub fn title_changed(&self, title: impl Into<String>) {
        self.send(SurfaceEventKind::TitleChanged(title.into()));
    }

    pub fn close_requested(&self) {
        self.send(SurfaceEventKind::CloseRequested);
    }

    pub fn progress(&self, state: ProgressState) {
        self.send(SurfaceEventKind::Progress(state));
    }

    pub fn desktop_notification(&self, title: impl Into<String>, body: impl Into<String>) {
        self.send(SurfaceEventKind::DesktopNotification {
            title: title.into(),
            body: body.into(),
        });
    }

    pub fn tab_intent(&self, intent: TabIntent) -> bool {
        let handled = intent.is_handled();
        if handled {
            self.send(SurfaceEventKind::Intent(intent));
        }
        handled
    }

    fn send(&self, kind: SurfaceEventKind) {
        if self
            .sender
            .send(SurfaceEvent {
                tab_id: self.tab_id,
                kind,
            })
            .is_err()
        {
            log::debug!("Surface callback for {} after manager shut down", self.tab_id);
        }
    }
}

/// Everything a surface needs at construction.
#[derive(Debug, Clone)]
pub struct SurfaceRequest {
    pub tab_id: Uuid,
    pub working_directory: PathBuf,
    pub initial_input: Option<String>,
    pub callbacks: SurfaceCallbacks,
}

/// An externally managed terminal surface owned by exactly one tab.
pub trait RenderingSurface: Send {
    /// Release the surface's resources. Called once, synchronously, when its
    /// tab closes.
    fn close(&mut self);
}

pub trait SurfaceFactory: Send + Sync {
    fn create(&self, request: SurfaceRequest) -> Box<dyn RenderingSurface>;
}

/// Surface for headless use: keeps nothing and renders nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedSurfaceFactory;

struct DetachedSurface {
    tab_id: Uuid,
}

impl RenderingSurface for DetachedSurface {
    fn close(&mut self) {
        log::debug!("Closed detached surface for {}", self.tab_id);
    }
}

impl SurfaceFactory for DetachedSurfaceFactory {
    fn create(&self, request: SurfaceRequest) -> Box<dyn RenderingSurface> {
        log::debug!(
            "Detached surface for {} in {}",
            request.tab_id,
            request.working_directory.display()
        );
        Box::new(DetachedSurface {
            tab_id: request.tab_id,
        })
    }
}
