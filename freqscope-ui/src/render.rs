use freqscope_messages::Snapshot;
use log::{debug, trace};

use crate::chart::{ChartBackend, ChartSpec};

/// Keeps exactly one chart instance in step with the latest snapshot.
///
/// Every accepted snapshot tears the old instance down and builds a fresh one,
/// so no scale or interaction state from an earlier snapshot survives.
pub struct RenderTrigger<B: ChartBackend> {
    backend: B,
    slot: Option<B::Instance>,
    builds: u64,
}

impl<B: ChartBackend> RenderTrigger<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            slot: None,
            builds: 0,
        }
    }

    /// Rebuild the chart from `snapshot`. Returns false, leaving the current
    /// chart alone, when there is nothing to draw.
    pub fn on_snapshot_changed(&mut self, snapshot: &Snapshot) -> bool {
        if snapshot.frequencies().is_empty() || snapshot.magnitudes().is_empty() {
            trace!("Skipping render of empty snapshot");
            return false;
        }

        self.release();
        let instance = self.backend.create(ChartSpec::from_snapshot(snapshot));
        self.slot = Some(instance);
        self.builds += 1;
        debug!("Built chart #{} with {} points", self.builds, snapshot.len());
        true
    }

    /// Destroy the live chart, if any.
    pub fn release(&mut self) {
        if let Some(old) = self.slot.take() {
            self.backend.destroy(old);
        }
    }

    pub fn live(&self) -> Option<&B::Instance> {
        self.slot.as_ref()
    }

    /// Charts built so far.
    pub fn builds(&self) -> u64 {
        self.builds
    }
}

impl<B: ChartBackend> Drop for RenderTrigger<B> {
    fn drop(&mut self) {
        self.release();
    }
}
