use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use freqscope_messages::{ConnectionState, Event, Snapshot};
use log::info;

use crate::chart::ChartBackend;
use crate::render::RenderTrigger;
use crate::store::SnapshotStore;

/// Local UI state derived from stream events.
///
/// Snapshots go into the store, and the store drives the render trigger.
pub struct UiState<B: ChartBackend> {
    store: SnapshotStore,
    trigger: Rc<RefCell<RenderTrigger<B>>>,
    connection: ConnectionState,
}

impl<B: ChartBackend + 'static> UiState<B> {
    pub fn new(backend: B) -> Self {
        let trigger = Rc::new(RefCell::new(RenderTrigger::new(backend)));
        let mut store = SnapshotStore::new();

        let subscribed = Rc::clone(&trigger);
        store.subscribe(move |snapshot| {
            subscribed.borrow_mut().on_snapshot_changed(snapshot);
        });

        Self {
            store,
            trigger,
            connection: ConnectionState::Closed,
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Snapshot(snapshot) => self.store.set(snapshot),
            Event::ConnectionChanged(state) => {
                if state != self.connection {
                    info!("Connection {} -> {}", self.connection, state);
                    self.connection = state;
                }
            }
        }
    }

    /// Apply a batch of events, rendering only the newest snapshot in it.
    pub fn handle_events(&mut self, events: impl IntoIterator<Item = Event>) {
        let mut latest = None;
        for event in events {
            match event {
                Event::Snapshot(snapshot) => latest = Some(snapshot),
                other => self.handle_event(other),
            }
        }
        if let Some(snapshot) = latest {
            self.store.set(snapshot);
        }
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.store.current()
    }

    /// Last connection state reported by the stream worker.
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn trigger(&self) -> Ref<'_, RenderTrigger<B>> {
        self.trigger.borrow()
    }
}
