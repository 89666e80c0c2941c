use crate::application::ports::{PersistenceError, SignalStore};
use crate::domain::Signal;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory signal store
///
/// Keeps the last saved collection in process memory. Suitable for tests
/// and ephemeral runs; it can be told to fail to exercise the registry's
/// recovery paths.
pub struct InMemorySignalStore {
    signals: Arc<RwLock<Vec<Signal>>>,
    save_count: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl InMemorySignalStore {
    pub fn new() -> Self {
        Self::with_signals(Vec::new())
    }

    /// Create a store that already holds `signals`
    pub fn with_signals(signals: Vec<Signal>) -> Self {
        Self {
            signals: Arc::new(RwLock::new(signals)),
            save_count: Arc::new(AtomicUsize::new(0)),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent load and save fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// The collection as last saved (or seeded)
    pub fn stored(&self) -> Vec<Signal> {
        self.signals.read().clone()
    }

    fn check_available(&self) -> Result<(), PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(
                "in-memory store set to fail".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemorySignalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemorySignalStore {
    fn clone(&self) -> Self {
        Self {
            signals: Arc::clone(&self.signals),
            save_count: Arc::clone(&self.save_count),
            failing: Arc::clone(&self.failing),
        }
    }
}

#[async_trait]
impl SignalStore for InMemorySignalStore {
    async fn load(&self) -> Result<Vec<Signal>, PersistenceError> {
        self.check_available()?;
        Ok(self.stored())
    }

    async fn save(&self, signals: &[Signal]) -> Result<(), PersistenceError> {
        self.check_available()?;
        *self.signals.write() = signals.to_vec();
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
