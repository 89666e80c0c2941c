//! The signal registry: latest signal per id, closed by sentinel lot, swept
//! on read, persisted on every write.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::application::ports::SignalStore;
use crate::domain::entities::UNIQUE_ID;
use crate::domain::{Clock, IngestError, Signal};

/// Default time a closed signal stays visible before a read sweeps it away.
pub const DEFAULT_CLOSE_RETENTION_SECS: u64 = 120;

/// How long closed (`lot <= 0`) records survive before being swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    pub close_retention: Duration,
}

impl ExpirationPolicy {
    pub fn new(close_retention: Duration) -> Self {
        Self { close_retention }
    }
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CLOSE_RETENTION_SECS))
    }
}

/// What an accepted upsert did to the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new signal was appended
    Inserted,
    /// An existing signal with the same id was replaced wholesale
    Replaced,
    /// A close request; `removed` is false when no signal had that id
    Closed { removed: bool },
}

/// Process-wide signal collection.
///
/// All access goes through [`upsert`](Self::upsert) and
/// [`snapshot`](Self::snapshot). A single lock is held across
/// mutate-then-persist and sweep-then-sort, so at most one record per id
/// exists and file writes never interleave.
pub struct SignalRegistry<C, S>
where
    C: Clock,
    S: SignalStore,
{
    clock: Arc<C>,
    store: Arc<S>,
    policy: ExpirationPolicy,
    signals: Mutex<Vec<Signal>>,
}

impl<C, S> SignalRegistry<C, S>
where
    C: Clock,
    S: SignalStore,
{
    /// Seed the registry from `store`. A failed load is logged and the
    /// registry starts empty.
    pub async fn open(clock: Arc<C>, store: Arc<S>, policy: ExpirationPolicy) -> Self {
        let signals = match store.load().await {
            Ok(signals) => {
                info!(count = signals.len(), "Loaded persisted signals");
                signals
            }
            Err(e) => {
                error!(error = %e, "Error loading signals, starting with empty list");
                Vec::new()
            }
        };

        Self {
            clock,
            store,
            policy,
            signals: Mutex::new(signals),
        }
    }

    pub fn policy(&self) -> ExpirationPolicy {
        self.policy
    }

    /// Accept a signal from a producer.
    ///
    /// The record is stamped with `timestamp_received`. A positive lot
    /// inserts or replaces the record for its id; a zero or negative lot
    /// removes it. The whole collection is then persisted; a failed save is
    /// logged and does not fail the call.
    pub async fn upsert(&self, payload: Value) -> Result<UpsertOutcome, IngestError> {
        let mut signal = Signal::from_value(payload)?;
        let Some(id) = signal.unique_id() else {
            return Err(IngestError::MissingField(UNIQUE_ID));
        };

        let mut signals = self.signals.lock().await;
        // Stamp under the lock so stamp order follows write order
        signal.stamp_received(self.clock.now_secs_f64());

        let outcome = if signal.is_close_request() {
            let before = signals.len();
            signals.retain(|s| !s.has_id(&id));
            let removed = signals.len() < before;
            info!(unique_id = %id, removed, "Removed signal due to lot <= 0");
            UpsertOutcome::Closed { removed }
        } else {
            let lot = signal.lot().unwrap_or_default();
            let outcome = match signals.iter().position(|s| s.has_id(&id)) {
                Some(index) => {
                    signals[index] = signal;
                    UpsertOutcome::Replaced
                }
                None => {
                    signals.push(signal);
                    UpsertOutcome::Inserted
                }
            };
            info!(unique_id = %id, lot, "Received signal");
            outcome
        };

        match self.store.save(signals.as_slice()).await {
            Ok(()) => debug!(count = signals.len(), "Signals saved"),
            Err(e) => error!(error = %e, "Error saving signals"),
        }

        Ok(outcome)
    }

    /// Current signals sorted ascending by `open_time`.
    ///
    /// Expired closed records are swept from the live collection first. The
    /// sweep is not persisted.
    pub async fn snapshot(&self) -> Vec<Signal> {
        let mut signals = self.signals.lock().await;
        self.sweep_locked(&mut signals);

        let mut sorted = signals.clone();
        sorted.sort_by_key(Signal::open_time_key);
        sorted
    }

    /// Run the expiration sweep alone. Returns the number of records removed.
    pub async fn sweep_expired(&self) -> usize {
        let mut signals = self.signals.lock().await;
        self.sweep_locked(&mut signals)
    }

    pub async fn len(&self) -> usize {
        self.signals.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.signals.lock().await.is_empty()
    }

    fn sweep_locked(&self, signals: &mut Vec<Signal>) -> usize {
        let now = self.clock.now_secs_f64();
        let retention = self.policy.close_retention.as_secs_f64();

        let before = signals.len();
        signals.retain(|s| !s.is_expired(now, retention));
        let swept = before - signals.len();

        if swept > 0 {
            debug!(swept, "Swept expired closed signals");
        }
        swept
    }
}
