pub mod ports;
pub mod registry;

pub use ports::{PersistenceError, SignalStore};
pub use registry::{ExpirationPolicy, SignalRegistry, UpsertOutcome};
