use super::source::{ClockSource, MonotonicSource};

/// Canonical tick rate used for all internal time arithmetic.
pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// Converts canonical ticks to seconds.
#[inline]
pub fn ticks_to_seconds(ticks: u64) -> f64 {
    ticks as f64 / TICKS_PER_SECOND as f64
}

/// Converts seconds to canonical ticks, truncating toward zero.
#[inline]
pub fn seconds_to_ticks(seconds: f64) -> u64 {
    (seconds.max(0.0) * TICKS_PER_SECOND as f64) as u64
}

/// Frame timing snapshot handed to the simulate callback.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameTime {
    /// Ticks covered by this simulation step.
    pub elapsed_ticks: u64,

    /// Sum of every step emitted so far.
    pub total_ticks: u64,

    /// Number of simulation steps emitted so far.
    pub frame_count: u64,

    /// Most recently published frames-per-second figure.
    pub frames_per_second: u32,
}

impl FrameTime {
    #[inline]
    pub fn elapsed_seconds(&self) -> f64 {
        ticks_to_seconds(self.elapsed_ticks)
    }

    #[inline]
    pub fn total_seconds(&self) -> f64 {
        ticks_to_seconds(self.total_ticks)
    }
}

/// Converts irregular wall-clock samples into a deterministic stream of
/// simulation steps.
///
/// In variable-step mode every [`advance`](Self::advance) emits exactly one step
/// covering the measured delta. In fixed-step mode the delta is accumulated and
/// drained in `target_elapsed_ticks` increments, so one call may emit zero steps
/// (frame faster than the step) or several (catch-up after a stall).
///
/// Deltas are clamped to a tenth of a second so a debugger pause or a long
/// stall does not turn into a runaway catch-up burst.
#[derive(Debug, Clone)]
pub struct FrameClock<S: ClockSource = MonotonicSource> {
    source: S,
    frequency: u64,
    max_delta: u64,

    last_sample: u64,
    remainder: u64,

    elapsed_ticks: u64,
    total_ticks: u64,
    frame_count: u64,

    frames_per_second: u32,
    frames_this_second: u32,
    second_counter: u64,

    fixed_time_step: bool,
    target_elapsed_ticks: u64,
}

impl FrameClock<MonotonicSource> {
    /// Creates a variable-step clock on the monotonic wall clock.
    pub fn new() -> Self {
        Self::with_source(MonotonicSource::new())
    }
}

impl Default for FrameClock<MonotonicSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ClockSource> FrameClock<S> {
    /// Creates a clock sampling `source`. The current sample becomes the baseline.
    pub fn with_source(source: S) -> Self {
        let frequency = source.frequency().max(1);
        let last_sample = source.now();

        Self {
            source,
            frequency,
            max_delta: (frequency / 10).max(1),
            last_sample,
            remainder: 0,
            elapsed_ticks: 0,
            total_ticks: 0,
            frame_count: 0,
            frames_per_second: 0,
            frames_this_second: 0,
            second_counter: 0,
            fixed_time_step: false,
            target_elapsed_ticks: TICKS_PER_SECOND / 60,
        }
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    pub fn elapsed_seconds(&self) -> f64 {
        ticks_to_seconds(self.elapsed_ticks)
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn total_seconds(&self) -> f64 {
        ticks_to_seconds(self.total_ticks)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn frames_per_second(&self) -> u32 {
        self.frames_per_second
    }

    /// Native units per second of the underlying source.
    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn is_fixed_time_step(&self) -> bool {
        self.fixed_time_step
    }

    pub fn target_elapsed_ticks(&self) -> u64 {
        self.target_elapsed_ticks
    }

    pub fn set_fixed_time_step(&mut self, fixed: bool) {
        self.fixed_time_step = fixed;
    }

    /// Sets the fixed step length. Zero is raised to one tick.
    pub fn set_target_elapsed_ticks(&mut self, ticks: u64) {
        self.target_elapsed_ticks = ticks.max(1);
    }

    pub fn set_target_elapsed_seconds(&mut self, seconds: f64) {
        self.set_target_elapsed_ticks(seconds_to_ticks(seconds));
    }

    /// Returns the current timing state as a copyable snapshot.
    pub fn snapshot(&self) -> FrameTime {
        FrameTime {
            elapsed_ticks: self.elapsed_ticks,
            total_ticks: self.total_ticks,
            frame_count: self.frame_count,
            frames_per_second: self.frames_per_second,
        }
    }

    /// Discards time accumulated since the last sample.
    ///
    /// Call after any intentional blocking pause (resize, resume from suspend)
    /// so the next [`advance`](Self::advance) does not simulate the pause.
    pub fn reset_elapsed_time(&mut self) {
        self.last_sample = self.source.now();
        self.remainder = 0;
        self.frames_per_second = 0;
        self.frames_this_second = 0;
        self.second_counter = 0;
    }

    /// Samples the clock and invokes `simulate` once per emitted step.
    pub fn advance<F>(&mut self, mut simulate: F)
    where
        F: FnMut(&FrameTime),
    {
        let now = self.source.now();
        let mut delta = now.saturating_sub(self.last_sample);
        self.last_sample = now;
        self.second_counter = self.second_counter.saturating_add(delta);

        if delta > self.max_delta {
            delta = self.max_delta;
        }

        // Multiply before dividing; the clamp above bounds the product.
        delta = delta * TICKS_PER_SECOND / self.frequency;

        let last_frame_count = self.frame_count;

        if self.fixed_time_step {
            let target = self.target_elapsed_ticks;

            // Snap deltas within a quarter millisecond of the target. Keeps a
            // 59.94 Hz display from slowly drifting behind a 60 Hz step.
            if delta.abs_diff(target) < TICKS_PER_SECOND / 4000 {
                delta = target;
            }

            self.remainder += delta;

            while self.remainder >= target {
                self.elapsed_ticks = target;
                self.total_ticks += target;
                self.remainder -= target;
                self.frame_count += 1;

                simulate(&self.snapshot());
            }
        } else {
            self.elapsed_ticks = delta;
            self.total_ticks += delta;
            self.remainder = 0;
            self.frame_count += 1;

            simulate(&self.snapshot());
        }

        if self.frame_count != last_frame_count {
            self.frames_this_second += 1;
        }

        if self.second_counter >= self.frequency {
            self.frames_per_second = self.frames_this_second;
            self.frames_this_second = 0;
            self.second_counter %= self.frequency;
        }
    }
}
