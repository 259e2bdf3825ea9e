use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::domains::settings::ToolCommands;
use crate::infrastructure::events::{EventBus, TabEvent};
use crate::shared::{ProjectLayout, SessionStatus, TabKind, display_names_for};
use crate::utils::path_utils::{same_path, standardize_path};

use super::entity::Tab;
use super::notifier::{LogNotifier, Notifier};
use super::recent::RecentWorktreeRecorder;
use super::surface::{
    GotoTab, ProgressState, RenderingSurface, SurfaceCallbacks, SurfaceEvent, SurfaceEventKind,
    SurfaceFactory, SurfaceRequest, TabIntent,
};

/// Registry of open terminal tabs and the current tab/worktree selection.
///
/// All mutation happens through `&mut self` on the owning task. Surfaces
/// report back through [`SurfaceCallbacks`], which queue [`SurfaceEvent`]s
/// that the owner applies with [`TabManager::process_pending_events`] or
/// [`TabManager::next_event`].
pub struct TabManager {
    tabs: Vec<Tab>,
    surfaces: HashMap<Uuid, Box<dyn RenderingSurface>>,
    selected_tab_id: Option<Uuid>,
    selected_worktree: Option<PathBuf>,
    launch_commands: ToolCommands,
    project_layout: Option<Vec<ProjectLayout>>,
    surface_factory: Arc<dyn SurfaceFactory>,
    recent_worktrees: Option<Arc<dyn RecentWorktreeRecorder>>,
    notifier: Arc<dyn Notifier>,
    surface_tx: UnboundedSender<SurfaceEvent>,
    surface_rx: UnboundedReceiver<SurfaceEvent>,
    events: EventBus<TabEvent>,
}

impl TabManager {
    pub fn new(surface_factory: Arc<dyn SurfaceFactory>) -> Self {
        let (surface_tx, surface_rx) = mpsc::unbounded_channel();
        Self {
            tabs: Vec::new(),
            surfaces: HashMap::new(),
            selected_tab_id: None,
            selected_worktree: None,
            launch_commands: ToolCommands::default(),
            project_layout: None,
            surface_factory,
            recent_worktrees: None,
            notifier: Arc::new(LogNotifier),
            surface_tx,
            surface_rx,
            events: EventBus::default(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_recent_worktrees(mut self, recorder: Arc<dyn RecentWorktreeRecorder>) -> Self {
        self.recent_worktrees = Some(recorder);
        self
    }

    /// Commands used for tabs created from now on.
    pub fn set_tool_commands(&mut self, commands: ToolCommands) {
        self.launch_commands = commands;
    }

    /// Project/worktree display order, used for worktree indexing and for
    /// naming recent entries.
    pub fn set_project_layout(&mut self, layout: Vec<ProjectLayout>) {
        self.project_layout = Some(layout);
    }

    pub fn clear_project_layout(&mut self) {
        self.project_layout = None;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TabEvent> {
        self.events.subscribe()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab(&self, id: Uuid) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn selected_tab_id(&self) -> Option<Uuid> {
        self.selected_tab_id
    }

    pub fn selected_worktree(&self) -> Option<&Path> {
        self.selected_worktree.as_deref()
    }

    /// Tabs of the selected worktree, in creation order.
    pub fn visible_tabs(&self) -> Vec<&Tab> {
        let Some(worktree) = &self.selected_worktree else {
            return Vec::new();
        };
        self.tabs
            .iter()
            .filter(|t| same_path(&t.worktree_path, worktree))
            .collect()
    }

    pub fn selected_tab(&self) -> Option<&Tab> {
        let id = self.selected_tab_id?;
        self.visible_tabs().into_iter().find(|t| t.id == id)
    }

    pub fn has_running_terminals(&self) -> bool {
        !self.tabs.is_empty()
    }

    /// Select `path`, keeping the current tab when it already belongs there,
    /// else the worktree's first tab, else a new agent tab. Returns the
    /// selected tab.
    pub fn select_worktree(&mut self, path: &Path) -> Uuid {
        let worktree = standardize_path(path);
        self.set_selected_worktree(Some(worktree.clone()));
        self.record_recent(&worktree);

        if let Some(current) = self.selected_tab_id.and_then(|id| self.tab(id))
            && same_path(&current.worktree_path, &worktree)
        {
            return current.id;
        }

        let existing = self
            .tabs
            .iter()
            .find(|t| same_path(&t.worktree_path, &worktree))
            .map(|t| t.id);
        match existing {
            Some(id) => {
                self.select_tab(id);
                id
            }
            None => self.create_tab(TabKind::Agent, &worktree),
        }
    }

    /// Open a new tab in `working_directory` and select it.
    pub fn create_tab(&mut self, kind: TabKind, working_directory: &Path) -> Uuid {
        let worktree = standardize_path(working_directory);
        let tab = Tab::new(kind, worktree.clone());
        let tab_id = tab.id;

        let surface = self.surface_factory.create(SurfaceRequest {
            tab_id,
            working_directory: worktree.clone(),
            initial_input: self.launch_commands.initial_input(kind),
            callbacks: SurfaceCallbacks::new(tab_id, self.surface_tx.clone()),
        });
        self.surfaces.insert(tab_id, surface);
        self.tabs.push(tab);
        log::info!("Opened {kind} tab {tab_id} in {}", worktree.display());

        self.events.publish(TabEvent::TabCreated {
            tab_id,
            kind,
            worktree_path: worktree.clone(),
        });
        self.set_selected_worktree(Some(worktree));
        self.set_selected_tab(Some(tab_id));
        tab_id
    }

    /// Remove the tab and release its surface. Unknown ids are ignored.
    pub fn close_tab(&mut self, id: Uuid) -> bool {
        let Some(index) = self.tabs.iter().position(|t| t.id == id) else {
            return false;
        };
        let closed = self.tabs.remove(index);
        if let Some(mut surface) = self.surfaces.remove(&id) {
            surface.close();
        }
        log::info!("Closed {} tab {id}", closed.kind);
        self.events.publish(TabEvent::TabClosed { tab_id: id });

        if self.selected_tab_id == Some(id) {
            let next = self.visible_tabs().first().map(|t| t.id);
            self.set_selected_tab(next);
            if next.is_none()
                && let Some(worktree) = self.selected_worktree.clone()
                && !self.tabs.iter().any(|t| same_path(&t.worktree_path, &worktree))
            {
                self.set_selected_worktree(None);
            }
        }
        true
    }

    /// Select a tab by id, moving the worktree selection with it and
    /// clearing its notification flag.
    pub fn select_tab(&mut self, id: Uuid) -> bool {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        tab.has_notification = false;
        let worktree = tab.worktree_path.clone();
        if !self
            .selected_worktree
            .as_deref()
            .is_some_and(|current| same_path(current, &worktree))
        {
            self.set_selected_worktree(Some(worktree));
        }
        self.set_selected_tab(Some(id));
        true
    }

    pub fn select_next(&mut self) -> bool {
        self.rotate_selection(1)
    }

    pub fn select_previous(&mut self) -> bool {
        self.rotate_selection(-1)
    }

    pub fn select_by_index(&mut self, index: usize) -> bool {
        let target = self.visible_tabs().get(index).map(|t| t.id);
        target.is_some_and(|id| self.select_tab(id))
    }

    pub fn select_last(&mut self) -> bool {
        let target = self.visible_tabs().last().map(|t| t.id);
        target.is_some_and(|id| self.select_tab(id))
    }

    /// Worktrees with at least one tab, in project display order. Projects
    /// without discovered worktrees stand in with their root. Without a
    /// layout, first-seen tab order is used.
    pub fn active_worktree_paths(&self) -> Vec<PathBuf> {
        let Some(layout) = &self.project_layout else {
            let mut seen = HashSet::new();
            return self
                .tabs
                .iter()
                .filter(|t| seen.insert(t.worktree_path.clone()))
                .map(|t| t.worktree_path.clone())
                .collect();
        };

        let active: HashSet<PathBuf> = self
            .tabs
            .iter()
            .map(|t| standardize_path(&t.worktree_path))
            .collect();
        let mut paths = Vec::new();
        for project in layout {
            let candidates: Vec<&Path> = if project.worktrees.is_empty() {
                vec![project.root_path.as_path()]
            } else {
                project.worktrees.iter().map(|w| w.path.as_path()).collect()
            };
            paths.extend(
                candidates
                    .into_iter()
                    .filter(|path| active.contains(&standardize_path(path)))
                    .map(Path::to_path_buf),
            );
        }
        paths
    }

    pub fn select_worktree_by_index(&mut self, index: usize) -> Option<Uuid> {
        let path = self.active_worktree_paths().into_iter().nth(index)?;
        Some(self.select_worktree(&path))
    }

    pub fn session_status(&self, worktree_path: &Path) -> SessionStatus {
        let mut has_tabs = false;
        let mut has_agent = false;
        for tab in self
            .tabs
            .iter()
            .filter(|t| same_path(&t.worktree_path, worktree_path))
        {
            has_tabs = true;
            if tab.kind == TabKind::Agent {
                if tab.is_running {
                    return SessionStatus::Running;
                }
                has_agent = true;
            }
        }
        match (has_agent, has_tabs) {
            (true, _) => SessionStatus::Idle,
            (false, true) => SessionStatus::TerminalOnly,
            (false, false) => SessionStatus::Stopped,
        }
    }

    /// Apply every surface event queued so far. Returns how many were taken.
    pub fn process_pending_events(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.surface_rx.try_recv() {
            self.handle_surface_event(event);
            processed += 1;
        }
        processed
    }

    /// Wait for the next surface event and apply it.
    pub async fn next_event(&mut self) -> bool {
        match self.surface_rx.recv().await {
            Some(event) => {
                self.handle_surface_event(event);
                true
            }
            None => false,
        }
    }

    fn handle_surface_event(&mut self, event: SurfaceEvent) {
        let tab_id = event.tab_id;
        if !self.surfaces.contains_key(&tab_id) {
            log::debug!("Dropping surface event for released tab {tab_id}");
            return;
        }

        match event.kind {
            SurfaceEventKind::TitleChanged(title) => {
                if let Some(tab) = self.tab_mut(tab_id) {
                    tab.title = title.clone();
                    self.events.publish(TabEvent::TitleChanged { tab_id, title });
                }
            }
            SurfaceEventKind::CloseRequested => {
                self.close_tab(tab_id);
            }
            SurfaceEventKind::Progress(state) => self.apply_progress(tab_id, state),
            SurfaceEventKind::DesktopNotification { title, body } => {
                let selected = self.selected_tab_id == Some(tab_id);
                if let Some(tab) = self.tab_mut(tab_id)
                    && !selected
                {
                    tab.has_notification = true;
                }
                self.notifier.notify(&title, &body);
                self.events.publish(TabEvent::Notified {
                    tab_id,
                    title,
                    body,
                });
            }
            SurfaceEventKind::Intent(intent) => self.apply_intent(tab_id, intent),
        }
    }

    fn apply_progress(&mut self, tab_id: Uuid, state: ProgressState) {
        let running = match state {
            ProgressState::Set | ProgressState::Indeterminate => true,
            ProgressState::Remove => false,
            ProgressState::Other => return,
        };
        if let Some(tab) = self.tab_mut(tab_id)
            && tab.is_running != running
        {
            tab.is_running = running;
            self.events
                .publish(TabEvent::ActivityChanged { tab_id, running });
        }
    }

    fn apply_intent(&mut self, tab_id: Uuid, intent: TabIntent) {
        match intent {
            TabIntent::NewTab => {
                if let Some(directory) = self.tab(tab_id).map(|t| t.worktree_path.clone()) {
                    self.create_tab(TabKind::Shell, &directory);
                }
            }
            TabIntent::CloseTab => {
                self.close_tab(tab_id);
            }
            TabIntent::Goto(GotoTab::Previous) => {
                self.select_previous();
            }
            TabIntent::Goto(GotoTab::Next) => {
                self.select_next();
            }
            TabIntent::Goto(GotoTab::Last) => {
                self.select_last();
            }
            TabIntent::Goto(GotoTab::Index(index)) => {
                self.select_by_index(index);
            }
            TabIntent::Goto(GotoTab::Unknown) => {}
        }
    }

    fn rotate_selection(&mut self, step: isize) -> bool {
        let visible: Vec<Uuid> = self.visible_tabs().iter().map(|t| t.id).collect();
        if visible.len() < 2 {
            return false;
        }
        let Some(current) = self
            .selected_tab_id
            .and_then(|id| visible.iter().position(|v| *v == id))
        else {
            return false;
        };
        let len = visible.len() as isize;
        let target = (current as isize + step).rem_euclid(len) as usize;
        self.select_tab(visible[target])
    }

    fn record_recent(&self, worktree: &Path) {
        let Some(recorder) = &self.recent_worktrees else {
            return;
        };
        let layout = self.project_layout.as_deref().unwrap_or_default();
        let (project_name, worktree_name) = display_names_for(layout, worktree);
        recorder.record_open(worktree, &project_name, &worktree_name);
    }

    fn tab_mut(&mut self, id: Uuid) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    fn set_selected_tab(&mut self, id: Option<Uuid>) {
        if self.selected_tab_id != id {
            self.selected_tab_id = id;
            self.events.publish(TabEvent::TabSelected { tab_id: id });
        }
    }

    fn set_selected_worktree(&mut self, path: Option<PathBuf>) {
        if self.selected_worktree != path {
            self.selected_worktree = path.clone();
            self.events.publish(TabEvent::WorktreeSelected { path });
        }
    }
}

impl Drop for TabManager {
    fn drop(&mut self) {
        for (_, mut surface) in self.surfaces.drain() {
            surface.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::terminal::recent::RecentWorktreeStore;
    use crate::domains::terminal::testing::{RecordingNotifier, RecordingSurfaceFactory};
    use crate::shared::WorktreeLayout;

    fn manager() -> (TabManager, RecordingSurfaceFactory) {
        let factory = RecordingSurfaceFactory::default();
        (TabManager::new(Arc::new(factory.clone())), factory)
    }

    fn path(p: &str) -> PathBuf {
        PathBuf::from(p)
    }

    #[test]
    fn selecting_empty_worktree_opens_agent_tab() {
        let (mut manager, factory) = manager();
        let id = manager.select_worktree(Path::new("/w/app"));

        let tab = manager.selected_tab().unwrap();
        assert_eq!(tab.id, id);
        assert_eq!(tab.kind, TabKind::Agent);
        assert_eq!(tab.title, "agent");
        let request = &factory.requests()[0];
        assert_eq!(request.working_directory, path("/w/app"));
        assert_eq!(request.initial_input.as_deref(), Some("clear && exec pi\n"));
    }

    #[test]
    fn select_worktree_is_idempotent() {
        let (mut manager, _) = manager();
        let first = manager.select_worktree(Path::new("/w/app"));
        let second = manager.select_worktree(Path::new("/w/app/."));
        assert_eq!(first, second);
        assert_eq!(manager.tabs().len(), 1);
    }

    #[test]
    fn returning_to_worktree_selects_its_first_tab() {
        let (mut manager, _) = manager();
        let first = manager.create_tab(TabKind::Agent, Path::new("/w/app"));
        manager.create_tab(TabKind::Git, Path::new("/w/app"));
        manager.select_worktree(Path::new("/w/other"));

        assert_eq!(manager.select_worktree(Path::new("/w/app")), first);
        assert_eq!(manager.tabs().len(), 3);
    }

    #[test]
    fn closing_last_tab_clears_selection() {
        let (mut manager, factory) = manager();
        let id = manager.select_worktree(Path::new("/w/app"));

        assert!(manager.close_tab(id));
        assert_eq!(manager.selected_tab_id(), None);
        assert_eq!(manager.selected_worktree(), None);
        assert_eq!(factory.closed(), vec![id]);
        assert!(!manager.close_tab(id));
    }

    #[test]
    fn closing_one_of_several_keeps_worktree_selected() {
        let (mut manager, _) = manager();
        let first = manager.create_tab(TabKind::Agent, Path::new("/w/app"));
        let second = manager.create_tab(TabKind::Diff, Path::new("/w/app"));
        let third = manager.create_tab(TabKind::Shell, Path::new("/w/app"));
        manager.select_tab(second);

        manager.close_tab(second);
        assert_eq!(manager.selected_tab_id(), Some(first));
        assert_eq!(manager.selected_worktree(), Some(Path::new("/w/app")));

        manager.close_tab(third);
        assert_eq!(manager.selected_tab_id(), Some(first));
    }

    #[test]
    fn closing_unselected_tab_keeps_selection() {
        let (mut manager, _) = manager();
        let first = manager.create_tab(TabKind::Agent, Path::new("/w/app"));
        let second = manager.create_tab(TabKind::Git, Path::new("/w/app"));

        manager.close_tab(first);
        assert_eq!(manager.selected_tab_id(), Some(second));
    }

    #[test]
    fn next_and_previous_cycle_through_visible_tabs() {
        let (mut manager, _) = manager();
        manager.create_tab(TabKind::Agent, Path::new("/w/other"));
        let ids: Vec<Uuid> = [TabKind::Agent, TabKind::Git, TabKind::Diff]
            .into_iter()
            .map(|kind| manager.create_tab(kind, Path::new("/w/app")))
            .collect();
        manager.select_tab(ids[0]);

        for _ in 0..ids.len() {
            assert!(manager.select_next());
        }
        assert_eq!(manager.selected_tab_id(), Some(ids[0]));

        manager.select_previous();
        assert_eq!(manager.selected_tab_id(), Some(ids[2]));
    }

    #[test]
    fn rotation_with_single_tab_is_noop() {
        let (mut manager, _) = manager();
        let id = manager.select_worktree(Path::new("/w/app"));
        assert!(!manager.select_next());
        assert!(!manager.select_previous());
        assert_eq!(manager.selected_tab_id(), Some(id));
    }

    #[test]
    fn index_selection_ignores_out_of_range() {
        let (mut manager, _) = manager();
        let first = manager.create_tab(TabKind::Agent, Path::new("/w/app"));
        let second = manager.create_tab(TabKind::Git, Path::new("/w/app"));

        assert!(manager.select_by_index(0));
        assert_eq!(manager.selected_tab_id(), Some(first));
        assert!(!manager.select_by_index(2));
        assert_eq!(manager.selected_tab_id(), Some(first));
        assert!(manager.select_last());
        assert_eq!(manager.selected_tab_id(), Some(second));
    }

    #[test]
    fn session_status_covers_all_states() {
        let (mut manager, factory) = manager();
        let running = manager.create_tab(TabKind::Agent, Path::new("/w/running"));
        manager.create_tab(TabKind::Agent, Path::new("/w/idle"));
        manager.create_tab(TabKind::Git, Path::new("/w/idle"));
        manager.create_tab(TabKind::Shell, Path::new("/w/terminal"));

        factory
            .callbacks_for(running)
            .progress(ProgressState::Indeterminate);
        manager.process_pending_events();

        assert_eq!(
            manager.session_status(Path::new("/w/running")),
            SessionStatus::Running
        );
        assert_eq!(manager.session_status(Path::new("/w/idle")), SessionStatus::Idle);
        assert_eq!(
            manager.session_status(Path::new("/w/terminal")),
            SessionStatus::TerminalOnly
        );
        assert_eq!(
            manager.session_status(Path::new("/w/nothing")),
            SessionStatus::Stopped
        );
    }

    #[test]
    fn progress_reports_toggle_running_flag() {
        let (mut manager, factory) = manager();
        let id = manager.select_worktree(Path::new("/w/app"));
        let callbacks = factory.callbacks_for(id);

        callbacks.progress(ProgressState::Set);
        manager.process_pending_events();
        assert!(manager.tab(id).unwrap().is_running);

        callbacks.progress(ProgressState::Other);
        manager.process_pending_events();
        assert!(manager.tab(id).unwrap().is_running);

        callbacks.progress(ProgressState::Remove);
        manager.process_pending_events();
        assert!(!manager.tab(id).unwrap().is_running);
    }

    #[test]
    fn title_changes_apply_to_originating_tab() {
        let (mut manager, factory) = manager();
        let id = manager.select_worktree(Path::new("/w/app"));
        factory.callbacks_for(id).title_changed("pi: refactor");
        assert_eq!(manager.process_pending_events(), 1);
        assert_eq!(manager.tab(id).unwrap().title, "pi: refactor");
    }

    #[test]
    fn notifications_flag_only_unselected_tabs() {
        let factory = RecordingSurfaceFactory::default();
        let notifier = RecordingNotifier::default();
        let mut manager =
            TabManager::new(Arc::new(factory.clone())).with_notifier(Arc::new(notifier.clone()));
        let background = manager.create_tab(TabKind::Agent, Path::new("/w/app"));
        let foreground = manager.create_tab(TabKind::Shell, Path::new("/w/app"));

        factory
            .callbacks_for(background)
            .desktop_notification("pi", "done");
        factory
            .callbacks_for(foreground)
            .desktop_notification("shell", "bell");
        manager.process_pending_events();

        assert!(manager.tab(background).unwrap().has_notification);
        assert!(!manager.tab(foreground).unwrap().has_notification);
        assert_eq!(notifier.posted().len(), 2);

        manager.select_tab(background);
        assert!(!manager.tab(background).unwrap().has_notification);
    }

    #[test]
    fn new_tab_intent_opens_shell_in_same_directory() {
        let (mut manager, factory) = manager();
        let agent = manager.select_worktree(Path::new("/w/app"));

        assert!(factory.callbacks_for(agent).tab_intent(TabIntent::NewTab));
        manager.process_pending_events();

        let shell = manager.selected_tab().unwrap();
        assert_eq!(shell.kind, TabKind::Shell);
        assert_eq!(shell.worktree_path, path("/w/app"));
        assert_eq!(factory.requests()[1].initial_input, None);
    }

    #[test]
    fn goto_and_close_intents_dispatch_to_selection() {
        let (mut manager, factory) = manager();
        let first = manager.create_tab(TabKind::Agent, Path::new("/w/app"));
        let second = manager.create_tab(TabKind::Git, Path::new("/w/app"));
        let callbacks = factory.callbacks_for(second);

        assert!(callbacks.tab_intent(TabIntent::Goto(GotoTab::Index(0))));
        manager.process_pending_events();
        assert_eq!(manager.selected_tab_id(), Some(first));

        assert!(callbacks.tab_intent(TabIntent::Goto(GotoTab::Last)));
        manager.process_pending_events();
        assert_eq!(manager.selected_tab_id(), Some(second));

        assert!(!callbacks.tab_intent(TabIntent::Goto(GotoTab::Unknown)));
        assert!(callbacks.tab_intent(TabIntent::CloseTab));
        manager.process_pending_events();
        assert!(manager.tab(second).is_none());
        assert_eq!(manager.selected_tab_id(), Some(first));
    }

    #[test]
    fn close_request_releases_surface_once_and_later_callbacks_are_dropped() {
        let (mut manager, factory) = manager();
        let id = manager.select_worktree(Path::new("/w/app"));
        let callbacks = factory.callbacks_for(id);

        callbacks.close_requested();
        callbacks.title_changed("late");
        callbacks.close_requested();
        manager.process_pending_events();

        assert!(manager.tabs().is_empty());
        assert_eq!(factory.close_counts().get(&id), Some(&1));
    }

    #[test]
    fn active_worktrees_follow_project_order() {
        let (mut manager, _) = manager();
        manager.create_tab(TabKind::Agent, Path::new("/w/b-feature"));
        manager.create_tab(TabKind::Agent, Path::new("/w/a"));
        manager.create_tab(TabKind::Shell, Path::new("/w/b"));

        assert_eq!(
            manager.active_worktree_paths(),
            vec![path("/w/b-feature"), path("/w/a"), path("/w/b")]
        );

        manager.set_project_layout(vec![
            ProjectLayout {
                name: "a".into(),
                root_path: path("/w/a"),
                worktrees: Vec::new(),
            },
            ProjectLayout {
                name: "b".into(),
                root_path: path("/w/b"),
                worktrees: vec![
                    WorktreeLayout {
                        name: "main".into(),
                        path: path("/w/b"),
                    },
                    WorktreeLayout {
                        name: "feature".into(),
                        path: path("/w/b-feature"),
                    },
                ],
            },
        ]);
        assert_eq!(
            manager.active_worktree_paths(),
            vec![path("/w/a"), path("/w/b"), path("/w/b-feature")]
        );

        let selected = manager.select_worktree_by_index(2).unwrap();
        assert_eq!(manager.tab(selected).unwrap().worktree_path, path("/w/b-feature"));
        assert!(manager.select_worktree_by_index(3).is_none());
    }

    #[test]
    fn selecting_worktree_records_recent_names() {
        let factory = RecordingSurfaceFactory::default();
        let recent = Arc::new(RecentWorktreeStore::in_memory());
        let mut manager =
            TabManager::new(Arc::new(factory)).with_recent_worktrees(recent.clone());
        manager.set_project_layout(vec![ProjectLayout {
            name: "app".into(),
            root_path: path("/w/app"),
            worktrees: vec![WorktreeLayout {
                name: "login".into(),
                path: path("/w/app-login"),
            }],
        }]);

        manager.select_worktree(Path::new("/w/app-login"));
        manager.select_worktree(Path::new("/tmp/scratch"));

        let entries = recent.entries();
        assert_eq!(entries[0].project_name, "scratch");
        assert_eq!(entries[1].project_name, "app");
        assert_eq!(entries[1].worktree_name, "login");
    }

    #[test]
    fn state_changes_are_published() {
        let (mut manager, _) = manager();
        let mut events = manager.subscribe();
        let id = manager.select_worktree(Path::new("/w/app"));
        manager.close_tab(id);

        let mut names = Vec::new();
        while let Ok(event) = events.try_recv() {
            names.push(event.as_str());
        }
        assert_eq!(
            names,
            vec![
                "stellwerk:worktree-selected",
                "stellwerk:tab-created",
                "stellwerk:tab-selected",
                "stellwerk:tab-closed",
                "stellwerk:tab-selected",
                "stellwerk:worktree-selected",
            ]
        );
    }

    #[test]
    fn dropping_manager_releases_remaining_surfaces() {
        let (mut manager, factory) = manager();
        manager.create_tab(TabKind::Agent, Path::new("/w/a"));
        manager.create_tab(TabKind::Agent, Path::new("/w/b"));
        drop(manager);
        assert_eq!(factory.closed().len(), 2);
    }
}
