use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic wall-clock counter sampled by [`FrameClock`](super::FrameClock).
///
/// `now()` is expressed in native units; `frequency()` is the number of native
/// units per second and must be non-zero.
pub trait ClockSource {
    fn frequency(&self) -> u64;
    fn now(&self) -> u64;
}

/// `Instant`-backed source counting nanoseconds since construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for MonotonicSource {
    fn frequency(&self) -> u64 {
        1_000_000_000
    }

    fn now(&self) -> u64 {
        // u64 nanoseconds cover ~584 years of uptime.
        self.origin.elapsed().as_nanos() as u64
    }
}

/// Manually driven source for deterministic replays.
///
/// Clones share the same counter, so a test can keep one handle and hand the
/// other to the clock.
#[derive(Debug, Clone)]
pub struct ManualClockSource {
    frequency: u64,
    now: Rc<Cell<u64>>,
}

impl ManualClockSource {
    /// Creates a source with the given native frequency, starting at zero.
    pub fn new(frequency: u64) -> Self {
        assert!(frequency > 0, "clock frequency must be non-zero");
        Self {
            frequency,
            now: Rc::new(Cell::new(0)),
        }
    }

    /// Moves the counter forward by `units` native units.
    pub fn advance(&self, units: u64) {
        self.now.set(self.now.get().saturating_add(units));
    }

    /// Sets the counter to an absolute value.
    pub fn set(&self, units: u64) {
        self.now.set(units);
    }
}

impl ClockSource for ManualClockSource {
    fn frequency(&self) -> u64 {
        self.frequency
    }

    fn now(&self) -> u64 {
        self.now.get()
    }
}
