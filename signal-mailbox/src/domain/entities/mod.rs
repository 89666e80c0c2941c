mod signal;

pub use signal::{
    LOT, OPEN_TIME, REQUIRED_FIELDS, Signal, SignalId, TIMESTAMP_RECEIVED, UNIQUE_ID,
};
