use std::time::Instant;

/// Monotonic wall-clock with millisecond readings, anchored at loop creation.
///
/// Readings are `f64` milliseconds, the same shape `performance.now()` gives
/// page script, so trace timestamps read naturally next to a profiler
/// capture.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock was created. Never goes backwards.
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
