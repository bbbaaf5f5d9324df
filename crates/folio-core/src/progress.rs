#![forbid(unsafe_code)]

//! Skill progress animator.
//!
//! Drives the circular skill cards from 0% to their target percentage once
//! they are revealed. Each run is a [`Tween`] sampled against the host
//! clock on every display frame, so frame pacing never changes the curve.
//!
//! # Invariants
//!
//! 1. At most one run per element, ever: the "already animated" side-table is
//!    never cleared, not even by [`ProgressAnimator::cancel`].
//! 2. Rendered percentages are monotonically non-decreasing within a run.
//! 3. The final frame of a run renders exactly the target percentage.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use crate::animation::{Tween, ease_out_cubic};
use crate::element::ElementId;
use crate::logging::{debug, trace};

/// Default run length.
pub const DEFAULT_PROGRESS_DURATION: Duration = Duration::from_millis(800);

/// Progress animation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Length of one run.
    #[serde(rename = "duration_ms", with = "crate::config::millis")]
    pub duration: Duration,
    /// Color of the filled part of the sweep.
    pub fill_color: String,
    /// Color of the remainder of the circle.
    pub track_color: String,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_PROGRESS_DURATION,
            fill_color: "var(--brand)".to_owned(),
            track_color: "rgba(255,255,255,0.06)".to_owned(),
        }
    }
}

/// Percentage shown at eased `progress` of a run towards `target`.
#[must_use]
pub fn scaled_percent(progress: f32, target: u8) -> u8 {
    let current = (progress * f32::from(target)).round();
    current.clamp(0.0, f32::from(target)) as u8
}

/// Angular span of the conic sweep for `percent`, in whole degrees.
#[must_use]
pub fn sweep_degrees(percent: u8) -> u16 {
    let pct = f32::from(percent.min(100));
    (pct / 100.0 * 360.0).round() as u16
}

/// One rendered frame of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressFrame {
    /// The card being animated.
    pub element: ElementId,
    /// Percentage to display.
    pub percent: u8,
    /// Whether this is the final frame of the run.
    pub finished: bool,
}

impl ProgressFrame {
    /// Numeric label, e.g. `"42%"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}%", self.percent)
    }

    /// Sweep span in degrees.
    #[must_use]
    pub fn degrees(&self) -> u16 {
        sweep_degrees(self.percent)
    }

    /// CSS background for the circular indicator.
    #[must_use]
    pub fn conic_gradient(&self, config: &ProgressConfig) -> String {
        let deg = self.degrees();
        format!(
            "conic-gradient({} {deg}deg, {} {deg}deg)",
            config.fill_color, config.track_color
        )
    }
}

#[derive(Debug, Clone)]
struct ProgressRun {
    element: ElementId,
    target: u8,
    tween: Tween,
    current: u8,
    finished: bool,
}

impl ProgressRun {
    fn sample(&mut self, now: Duration) -> ProgressFrame {
        let finished = self.tween.is_finished(now);
        let percent = if finished {
            self.target
        } else {
            scaled_percent(self.tween.sample(now), self.target)
        };
        self.finished = finished;
        // Never step backwards, even if the host clock jitters.
        self.current = self.current.max(percent);
        ProgressFrame {
            element: self.element,
            percent: self.current,
            finished,
        }
    }
}

/// Registry of in-flight progress runs keyed by element.
#[derive(Debug, Clone, Default)]
pub struct ProgressAnimator {
    config: ProgressConfig,
    runs: Vec<ProgressRun>,
    animated: HashSet<ElementId>,
}

impl ProgressAnimator {
    /// Create an animator with the given settings.
    #[must_use]
    pub fn new(config: ProgressConfig) -> Self {
        Self {
            config,
            runs: Vec::new(),
            animated: HashSet::new(),
        }
    }

    /// Settings in use.
    #[must_use]
    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    /// Start a run for `element` towards `target` percent (clamped to 100).
    ///
    /// Returns `false` if the element was already animated at any point.
    pub fn animate(&mut self, element: ElementId, target: u8, now: Duration) -> bool {
        if !self.animated.insert(element) {
            trace!(%element, "progress already animated");
            return false;
        }
        let target = target.min(100);
        debug!(%element, target, "progress run started");
        self.runs.push(ProgressRun {
            element,
            target,
            tween: Tween::starting_at(now, self.config.duration).with_easing(ease_out_cubic),
            current: 0,
            finished: false,
        });
        true
    }

    /// Produce one frame for every active run. Runs that finish in this frame
    /// are dropped afterwards; no further frames are produced for them.
    pub fn frame(&mut self, now: Duration) -> Vec<ProgressFrame> {
        let frames: Vec<ProgressFrame> = self.runs.iter_mut().map(|run| run.sample(now)).collect();
        self.runs.retain(|run| !run.finished);
        frames
    }

    /// Drop the active run for `element`, if any. The element stays marked as
    /// animated.
    pub fn cancel(&mut self, element: ElementId) -> bool {
        let before = self.runs.len();
        self.runs.retain(|run| run.element != element);
        let cancelled = self.runs.len() != before;
        if cancelled {
            debug!(%element, "progress run cancelled");
        }
        cancelled
    }

    /// Whether any run still needs frames.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.runs.is_empty()
    }

    /// Number of runs still in flight.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.runs.len()
    }

    /// Whether `element` has ever been animated.
    #[must_use]
    pub fn was_animated(&self, element: ElementId) -> bool {
        self.animated.contains(&element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: ElementId = ElementId(7);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn scaled_percent_rounds_and_clamps() {
        assert_eq!(scaled_percent(0.0, 90), 0);
        assert_eq!(scaled_percent(1.0, 90), 90);
        assert_eq!(scaled_percent(0.875, 80), 70);
        assert_eq!(scaled_percent(1.5, 40), 40);
    }

    #[test]
    fn midpoint_frame_follows_ease_out() {
        let mut animator = ProgressAnimator::default();
        animator.animate(CARD, 80, ms(0));
        // ease_out_cubic(0.5) = 0.875
        assert_eq!(animator.frame(ms(400))[0].percent, 70);
    }

    #[test]
    fn sweep_degrees_rounding() {
        assert_eq!(sweep_degrees(0), 0);
        assert_eq!(sweep_degrees(50), 180);
        assert_eq!(sweep_degrees(33), 119);
        assert_eq!(sweep_degrees(100), 360);
        assert_eq!(sweep_degrees(250), 360);
    }

    #[test]
    fn first_frame_is_zero() {
        let mut animator = ProgressAnimator::default();
        assert!(animator.animate(CARD, 85, ms(1000)));
        let frames = animator.frame(ms(1000));
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].percent, 0);
        assert_eq!(frames[0].label(), "0%");
        assert!(!frames[0].finished);
    }

    #[test]
    fn final_frame_hits_target_and_stops() {
        let mut animator = ProgressAnimator::default();
        animator.animate(CARD, 85, ms(0));
        animator.frame(ms(400));
        let last = animator.frame(ms(800));
        assert_eq!(last[0].percent, 85);
        assert!(last[0].finished);
        assert!(!animator.is_active());
        assert!(animator.frame(ms(900)).is_empty());
    }

    #[test]
    fn second_animate_is_rejected() {
        let mut animator = ProgressAnimator::default();
        assert!(animator.animate(CARD, 40, ms(0)));
        assert!(!animator.animate(CARD, 40, ms(10)));
        animator.frame(ms(2000));
        assert!(!animator.animate(CARD, 40, ms(3000)));
        assert!(animator.was_animated(CARD));
    }

    #[test]
    fn cancel_keeps_one_shot_marker() {
        let mut animator = ProgressAnimator::default();
        animator.animate(CARD, 40, ms(0));
        assert!(animator.cancel(CARD));
        assert!(!animator.cancel(CARD));
        assert!(!animator.is_active());
        assert!(!animator.animate(CARD, 40, ms(10)));
    }

    #[test]
    fn target_is_clamped() {
        let mut animator = ProgressAnimator::default();
        animator.animate(CARD, 250, ms(0));
        let frames = animator.frame(ms(800));
        assert_eq!(frames[0].percent, 100);
    }

    #[test]
    fn clock_jitter_never_steps_backwards() {
        let mut animator = ProgressAnimator::default();
        animator.animate(CARD, 100, ms(100));
        let a = animator.frame(ms(500))[0].percent;
        let b = animator.frame(ms(300))[0].percent;
        assert!(b >= a);
    }

    #[test]
    fn conic_gradient_format() {
        let frame = ProgressFrame {
            element: CARD,
            percent: 50,
            finished: false,
        };
        assert_eq!(
            frame.conic_gradient(&ProgressConfig::default()),
            "conic-gradient(var(--brand) 180deg, rgba(255,255,255,0.06) 180deg)"
        );
    }
}
