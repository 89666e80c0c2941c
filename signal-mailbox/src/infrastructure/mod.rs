pub mod clock;
pub mod config;
pub mod persistence;

pub use clock::{ManualClock, SystemClock};
pub use config::{ConfigError, MailboxConfig};
pub use persistence::{InMemorySignalStore, JsonFileStore};
