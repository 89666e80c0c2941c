mod clock;

pub use clock::{Clock, Timestamp};
