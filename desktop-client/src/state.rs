use std::sync::{Arc, Mutex};

use serpent_engine::game::RenderSnapshot;
use serpent_engine::session::SnapshotSink;

/// Mailbox between the game-loop thread and the UI thread: the loop writes
/// the latest snapshot, the UI reads it every frame.
pub struct SharedState {
    snapshot: Arc<Mutex<Option<RenderSnapshot>>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_snapshot(&self, snapshot: RenderSnapshot) {
        *self.snapshot.lock().unwrap() = Some(snapshot);
    }

    pub fn get_snapshot(&self) -> Option<RenderSnapshot> {
        self.snapshot.lock().unwrap().clone()
    }
}

impl Clone for SharedState {
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

pub struct LocalSink {
    shared_state: SharedState,
}

impl LocalSink {
    pub fn new(shared_state: SharedState) -> Self {
        Self { shared_state }
    }
}

impl SnapshotSink for LocalSink {
    fn publish(&self, snapshot: RenderSnapshot) {
        self.shared_state.set_snapshot(snapshot);
    }
}
