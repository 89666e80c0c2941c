use crate::domain::Signal;
use async_trait::async_trait;
use thiserror::Error;

/// Durable storage failures.
///
/// The registry logs these and carries on; they never reach an HTTP caller.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to read signals from '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse signals from '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode signals: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write signals to '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("signal store unavailable: {0}")]
    Unavailable(String),
}

/// Storage for the whole signal collection
///
/// The collection is always read and written wholesale: `load` once at
/// startup, `save` after every accepted upsert.
#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Read the persisted collection. A store that has never been written
    /// returns an empty collection rather than an error.
    async fn load(&self) -> Result<Vec<Signal>, PersistenceError>;

    /// Replace the persisted collection with `signals`
    async fn save(&self, signals: &[Signal]) -> Result<(), PersistenceError>;
}
