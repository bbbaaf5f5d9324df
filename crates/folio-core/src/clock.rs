#![forbid(unsafe_code)]

//! Host-controlled monotonic time.
//!
//! Nothing in `folio-core` reads a wall clock. The host (the browser frame
//! loop, or a test) sets the current monotonic time and every state machine
//! compares its deadlines against it.

use std::time::Duration;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    ///
    /// Time never runs backwards: an earlier value than the current one is
    /// ignored, which keeps every deadline comparison monotonic even when the
    /// host feeds jittery timestamps.
    pub fn set(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// Convert a host timestamp in fractional milliseconds (as produced by
/// `performance.now()`) to a [`Duration`]. Negative and non-finite inputs map
/// to zero.
#[must_use]
pub fn duration_from_millis_f64(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_zero() {
        assert_eq!(DeterministicClock::new().now(), Duration::ZERO);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut clock = DeterministicClock::new();
        clock.set(Duration::from_millis(500));
        clock.set(Duration::from_millis(200));
        assert_eq!(clock.now(), Duration::from_millis(500));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(516));
    }

    #[test]
    fn host_millis_conversion() {
        assert_eq!(duration_from_millis_f64(1500.0), Duration::from_millis(1500));
        assert_eq!(duration_from_millis_f64(-3.0), Duration::ZERO);
        assert_eq!(duration_from_millis_f64(f64::NAN), Duration::ZERO);
    }
}
