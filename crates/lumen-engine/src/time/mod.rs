//! Time subsystem.
//!
//! Converts wall-clock samples into a monotonic stream of simulation steps.
//! Intended usage:
//! - one `FrameClock` per render loop
//! - call `advance()` once per pump opportunity; it invokes the simulate
//!   callback zero or more times
//! - call `reset_elapsed_time()` after intentional pauses

mod frame_clock;
mod source;

pub use frame_clock::{FrameClock, FrameTime, TICKS_PER_SECOND, seconds_to_ticks, ticks_to_seconds};
pub use source::{ClockSource, ManualClockSource, MonotonicSource};
