use crate::core::store::Store;
use crate::core::types::HistoryEntry;

/// Appends flagged scans to the SQLite log, keeping at most `capacity` rows.
pub struct Recorder {
    store: Store,
    capacity: usize,
}

impl Recorder {
    pub fn new(store: Store, capacity: usize) -> Self {
        Self { store, capacity }
    }

    /// A store failure is logged and counts as nothing recorded.
    pub fn record(&mut self, entries: &[HistoryEntry]) -> usize {
        if entries.is_empty() {
            return 0;
        }
        let recorded = match self.store.record_all(entries) {
            Ok(n) => n,
            Err(err) => {
                tracing::error!("failed to persist {} entries: {}", entries.len(), err);
                return 0;
            }
        };
        match self.store.trim_to(self.capacity) {
            Ok(0) => {}
            Ok(evicted) => tracing::trace!("history full; evicted {} oldest entries", evicted),
            Err(err) => tracing::error!("failed to trim history: {}", err),
        }
        recorded
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}
