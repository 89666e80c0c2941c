use crate::domain::{Clock, Timestamp};
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// Clock that only moves when told to
///
/// Shares state across clones, so a test can hold one handle while the
/// registry reads through another.
#[derive(Debug)]
pub struct ManualClock {
    inner: Arc<RwLock<Timestamp>>,
}

impl ManualClock {
    /// Create a clock frozen at the current wall-clock time
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Create a clock frozen at a specific time
    pub fn at(time: Timestamp) -> Self {
        ManualClock {
            inner: Arc::new(RwLock::new(time)),
        }
    }

    pub fn advance(&self, duration: Duration) {
        *self.inner.write() += duration;
    }

    pub fn set_time(&self, time: Timestamp) {
        *self.inner.write() = time;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ManualClock {
    fn clone(&self) -> Self {
        ManualClock {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.inner.read()
    }
}
