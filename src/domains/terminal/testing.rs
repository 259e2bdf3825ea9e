use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use super::notifier::Notifier;
use super::surface::{RenderingSurface, SurfaceCallbacks, SurfaceFactory, SurfaceRequest};

/// Keeps every request and records which surfaces were closed.
#[derive(Default, Clone)]
pub struct RecordingSurfaceFactory {
    requests: Arc<Mutex<Vec<SurfaceRequest>>>,
    closed: Arc<Mutex<Vec<Uuid>>>,
}

struct RecordingSurface {
    tab_id: Uuid,
    closed: Arc<Mutex<Vec<Uuid>>>,
}

impl RenderingSurface for RecordingSurface {
    fn close(&mut self) {
        self.closed.lock().unwrap().push(self.tab_id);
    }
}

impl SurfaceFactory for RecordingSurfaceFactory {
    fn create(&self, request: SurfaceRequest) -> Box<dyn RenderingSurface> {
        let tab_id = request.tab_id;
        self.requests.lock().unwrap().push(request);
        Box::new(RecordingSurface {
            tab_id,
            closed: Arc::clone(&self.closed),
        })
    }
}

impl RecordingSurfaceFactory {
    pub fn requests(&self) -> Vec<SurfaceRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn callbacks_for(&self, tab_id: Uuid) -> SurfaceCallbacks {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.tab_id == tab_id)
            .map(|r| r.callbacks.clone())
            .expect("surface was created for tab")
    }

    pub fn closed(&self) -> Vec<Uuid> {
        self.closed.lock().unwrap().clone()
    }

    pub fn close_counts(&self) -> HashMap<Uuid, usize> {
        let mut counts = HashMap::new();
        for id in self.closed() {
            *counts.entry(id).or_default() += 1;
        }
        counts
    }
}

#[derive(Default, Clone)]
pub struct RecordingNotifier {
    posted: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn posted(&self) -> Vec<(String, String)> {
        self.posted.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str) {
        self.posted
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}
