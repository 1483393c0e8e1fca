//! Clock adapters.
//!
//! - `TokioClock` - Runtime timer, follows tokio's paused clock in tests
//! - `ManualClock` - Explicitly advanced timeline for deterministic tests

mod manual_clock;
mod tokio_clock;

pub use manual_clock::ManualClock;
pub use tokio_clock::TokioClock;
