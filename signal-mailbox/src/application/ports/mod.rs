mod signal_store;

pub use signal_store::{PersistenceError, SignalStore};
