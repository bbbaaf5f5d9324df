#![forbid(unsafe_code)]

//! Time-based tweening.
//!
//! A [`Tween`] is anchored at the page time it started and sampled against
//! absolute page time, never advanced by frame deltas. Dropped or late frames
//! therefore land on the same curve.

use std::time::Duration;

/// Maps normalized time in [0, 1] to normalized progress in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Constant velocity.
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-out, `1 - (1 - t)^3`.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let rest = 1.0 - t.clamp(0.0, 1.0);
    1.0 - rest * rest * rest
}

/// A fixed-length run starting at a known page time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    start: Duration,
    length: Duration,
    easing: EasingFn,
}

impl Tween {
    /// Tween of `length` starting at `start`, eased with [`linear`].
    ///
    /// A zero length completes on its first sample.
    #[must_use]
    pub fn starting_at(start: Duration, length: Duration) -> Self {
        Self {
            start,
            length,
            easing: linear,
        }
    }

    #[must_use]
    pub fn with_easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn length(&self) -> Duration {
        self.length
    }

    /// Normalized time at `now`, before easing.
    #[must_use]
    pub fn time(&self, now: Duration) -> f32 {
        if self.length.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.length.as_secs_f64()).clamp(0.0, 1.0) as f32
    }

    /// Eased progress at `now`.
    #[must_use]
    pub fn sample(&self, now: Duration) -> f32 {
        (self.easing)(self.time(now))
    }

    /// Whether the run has ended by `now`.
    #[must_use]
    pub fn is_finished(&self, now: Duration) -> bool {
        now.saturating_sub(self.start) >= self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn cubic_curve() {
        assert!(close(ease_out_cubic(0.0), 0.0));
        assert!(close(ease_out_cubic(0.5), 0.875));
        assert!(close(ease_out_cubic(1.0), 1.0));
        assert!(close(ease_out_cubic(-3.0), 0.0));
        assert!(close(ease_out_cubic(7.0), 1.0));
    }

    #[test]
    fn samples_against_absolute_time() {
        let tween = Tween::starting_at(ms(1_000), ms(800));
        assert!(close(tween.sample(ms(500)), 0.0));
        assert!(close(tween.sample(ms(1_400)), 0.5));
        assert!(!tween.is_finished(ms(1_799)));
        assert!(tween.is_finished(ms(1_800)));
        assert!(close(tween.sample(ms(9_000)), 1.0));
    }

    #[test]
    fn easing_applies_to_sample_not_time() {
        let tween = Tween::starting_at(Duration::ZERO, ms(800)).with_easing(ease_out_cubic);
        assert!(close(tween.time(ms(400)), 0.5));
        assert!(close(tween.sample(ms(400)), 0.875));
    }

    #[test]
    fn zero_length_is_done_at_once() {
        let tween = Tween::starting_at(ms(50), Duration::ZERO);
        assert!(tween.is_finished(ms(50)));
        assert!(close(tween.sample(ms(50)), 1.0));
    }
}
