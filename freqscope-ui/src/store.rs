use std::sync::Arc;

use freqscope_messages::Snapshot;

type Subscriber = Box<dyn FnMut(&Snapshot)>;

/// Holds the single current snapshot and tells subscribers when it changes.
#[derive(Default)]
pub struct SnapshotStore {
    current: Option<Arc<Snapshot>>,
    subscribers: Vec<Subscriber>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Snapshot) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Replace the current snapshot and notify every subscriber, in
    /// subscription order. Identical snapshots still notify.
    pub fn set(&mut self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        self.current = Some(Arc::clone(&snapshot));
        for subscriber in &mut self.subscribers {
            subscriber(&snapshot);
        }
    }

    /// The latest snapshot, or `None` before the first one arrives.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.clone()
    }
}
