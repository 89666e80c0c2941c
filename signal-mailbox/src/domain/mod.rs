pub mod entities;
pub mod errors;
pub mod services;

// Re-export entity types
pub use entities::{REQUIRED_FIELDS, Signal, SignalId};

// Re-export errors
pub use errors::IngestError;

// Re-export services
pub use services::{Clock, Timestamp};
