use chrono::{DateTime, Utc};

pub type Timestamp = DateTime<Utc>;

/// Basic clock trait - provides current time
///
/// The registry stamps and expires signals against this clock so that tests
/// can move time without sleeping.
pub trait Clock: Send + Sync {
    /// Get current time from this clock's perspective
    fn now(&self) -> Timestamp;

    /// Get current time as fractional seconds since Unix epoch
    fn now_secs_f64(&self) -> f64 {
        self.now().timestamp_micros() as f64 / 1_000_000.0
    }
}
