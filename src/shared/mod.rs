/// Shared utilities used by every layer
pub mod clock;
pub mod error;
pub mod result;
pub mod security;

pub use clock::{Clock, FixedClock, SystemClock};
pub use result::Result;
