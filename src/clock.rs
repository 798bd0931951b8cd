//! Frame clock - wall-clock delta-time source for the host render loop.
//!
//! Produces a non-negative delta in seconds per invocation, clamped to an
//! upper bound so a suspended or backgrounded host does not inject a huge
//! jump into the simulation.

use std::time::Instant;

/// Default upper clamp on a single frame delta, in seconds.
pub const DEFAULT_MAX_FRAME: f64 = 1.0;

/// Wall-clock-derived tick source.
///
/// `start()` primes the last-observed instant; each `tick()` returns the
/// clamped elapsed time since the previous call and re-primes. Negative
/// deltas cannot occur: `Instant` is monotonic and the subtraction
/// saturates at zero.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_frame: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_frame(DEFAULT_MAX_FRAME)
    }

    /// Clock with a custom upper clamp, in seconds.
    pub fn with_max_frame(max_frame: f64) -> Self {
        Self {
            last: None,
            max_frame: max_frame.max(0.0),
        }
    }

    /// Prime the clock. Must be called before the first `tick()`; calling
    /// `tick()` first merely primes and yields 0.
    pub fn start(&mut self) {
        self.last = Some(Instant::now());
    }

    /// Seconds elapsed since the previous call, in `[0, max_frame]`.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let dt = match self.last {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f64(),
            None => 0.0,
        };
        self.last = Some(now);
        dt.min(self.max_frame)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_unstarted_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 0.0);
    }

    #[test]
    fn test_tick_measures_elapsed_time() {
        let mut clock = FrameClock::new();
        clock.start();
        std::thread::sleep(Duration::from_millis(10));
        let dt = clock.tick();
        assert!(dt > 0.0);
        assert!(dt <= DEFAULT_MAX_FRAME);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = FrameClock::with_max_frame(0.005);
        clock.start();
        std::thread::sleep(Duration::from_millis(20));
        let dt = clock.tick();
        assert!(dt <= 0.005);
    }

    #[test]
    fn test_back_to_back_ticks_are_small() {
        let mut clock = FrameClock::new();
        clock.start();
        let first = clock.tick();
        let second = clock.tick();
        assert!(first >= 0.0);
        assert!(second >= 0.0);
        assert!(second < 0.5);
    }
}
