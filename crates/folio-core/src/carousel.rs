#![forbid(unsafe_code)]

//! Auto-rotating carousel state.
//!
//! A [`Carousel`] cycles a single active index across `len` items. Rotation is
//! driven by one pending deadline at a time; every transition clears the
//! deadline before it schedules a new one, so an instance can never run two
//! competing timers.
//!
//! ```text
//!            tick (interval)                 hover enter
//!   ┌──────────┐ ───────────▶ ┌──────────┐ ───────────▶ ┌────────┐
//!   │ Advance  │              │ Advance  │              │ Paused │
//!   └──────────┘ ◀─────────── └──────────┘              └────────┘
//!        ▲          resume                                   │
//!        │  (after grace, or interval after a click)         │
//!        └───────────────── Resume ◀─────────────────────────┘
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::logging::trace;

/// Default rotation interval.
pub const DEFAULT_CAROUSEL_INTERVAL: Duration = Duration::from_millis(3500);

/// Carousel timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Time between automatic advances.
    #[serde(rename = "interval_ms", with = "crate::config::millis")]
    pub interval: Duration,
    /// Delay before rotation resumes after the pointer leaves.
    #[serde(rename = "resume_grace_ms", with = "crate::config::millis")]
    pub resume_grace: Duration,
}

impl CarouselConfig {
    /// Highlights strip: resumes as soon as the pointer leaves.
    #[must_use]
    pub const fn highlights() -> Self {
        Self {
            interval: DEFAULT_CAROUSEL_INTERVAL,
            resume_grace: Duration::ZERO,
        }
    }

    /// Skill mini cards: waits half a second before resuming.
    #[must_use]
    pub const fn skill_minis() -> Self {
        Self {
            interval: DEFAULT_CAROUSEL_INTERVAL,
            resume_grace: Duration::from_millis(500),
        }
    }

    /// Set the rotation interval.
    #[must_use]
    pub const fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the hover-leave grace delay.
    #[must_use]
    pub const fn resume_grace(mut self, grace: Duration) -> Self {
        self.resume_grace = grace;
        self
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self::highlights()
    }
}

/// The single pending timer of a carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deadline {
    /// Advance to the next item.
    Advance(Duration),
    /// Restart rotation (first advance one interval later).
    Resume(Duration),
}

/// Index change produced by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveChange {
    /// Previously active index.
    pub from: usize,
    /// Newly active index.
    pub to: usize,
}

/// Carousel state machine.
#[derive(Debug, Clone)]
pub struct Carousel {
    config: CarouselConfig,
    len: usize,
    index: usize,
    deadline: Option<Deadline>,
}

impl Carousel {
    /// Create a stopped carousel over `len` items with item 0 active.
    #[must_use]
    pub fn new(config: CarouselConfig, len: usize) -> Self {
        Self {
            config,
            len,
            index: 0,
            deadline: None,
        }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the carousel has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Active index, `None` when empty.
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }

    /// Whether item `i` is the active one.
    #[must_use]
    pub fn is_active(&self, i: usize) -> bool {
        self.active() == Some(i)
    }

    /// Whether rotation is scheduled (running or about to resume).
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.deadline.is_some()
    }

    /// Next time this carousel needs a tick.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.deadline.map(|d| match d {
            Deadline::Advance(at) | Deadline::Resume(at) => at,
        })
    }

    /// Start rotating: first advance one interval from `now`.
    pub fn start(&mut self, now: Duration) {
        self.stop();
        if self.len > 1 {
            self.deadline = Some(Deadline::Advance(now + self.config.interval));
        }
    }

    /// Cancel any pending timer.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// Pointer entered the carousel: pause.
    pub fn hover_enter(&mut self) {
        trace!("carousel paused");
        self.stop();
    }

    /// Pointer left the carousel: resume after the grace delay.
    pub fn hover_leave(&mut self, now: Duration) {
        self.resume_after(now, self.config.resume_grace);
    }

    /// Direct activation of item `i` (click, Enter, Space).
    ///
    /// Pauses, jumps to `i`, and resumes after a full interval. Out-of-range
    /// indices are ignored.
    pub fn activate(&mut self, i: usize, now: Duration) -> Option<ActiveChange> {
        if i >= self.len {
            return None;
        }
        self.stop();
        let change = self.set_index(i);
        self.resume_after(now, self.config.interval);
        change
    }

    /// Fire a due deadline, if any. At most one advance happens per call;
    /// a host that fell behind (e.g. a throttled background tab) skips the
    /// missed advances instead of replaying them.
    pub fn tick(&mut self, now: Duration) -> Option<ActiveChange> {
        if let Some(Deadline::Resume(at)) = self.deadline
            && at <= now
        {
            self.deadline = Some(Deadline::Advance(at + self.config.interval));
        }
        match self.deadline {
            Some(Deadline::Advance(at)) if at <= now => {
                let mut next = at + self.config.interval;
                if next <= now {
                    next = now + self.config.interval;
                }
                self.deadline = Some(Deadline::Advance(next));
                self.set_index((self.index + 1) % self.len)
            }
            _ => None,
        }
    }

    fn resume_after(&mut self, now: Duration, delay: Duration) {
        self.stop();
        if self.len > 1 {
            self.deadline = Some(Deadline::Resume(now + delay));
        }
    }

    fn set_index(&mut self, to: usize) -> Option<ActiveChange> {
        let from = self.index;
        self.index = to;
        (from != to).then_some(ActiveChange { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn config() -> CarouselConfig {
        CarouselConfig::highlights().interval(ms(1000))
    }

    #[test]
    fn empty_carousel_is_noop() {
        let mut c = Carousel::new(config(), 0);
        c.start(ms(0));
        assert_eq!(c.active(), None);
        assert_eq!(c.tick(ms(5000)), None);
        assert_eq!(c.activate(0, ms(0)), None);
        assert!(!c.is_scheduled());
    }

    #[test]
    fn single_item_never_schedules() {
        let mut c = Carousel::new(config(), 1);
        c.start(ms(0));
        assert_eq!(c.active(), Some(0));
        assert!(!c.is_scheduled());
    }

    #[test]
    fn advances_once_per_interval_and_wraps() {
        let mut c = Carousel::new(config(), 3);
        c.start(ms(0));
        assert_eq!(c.tick(ms(999)), None);
        assert_eq!(c.tick(ms(1000)), Some(ActiveChange { from: 0, to: 1 }));
        assert_eq!(c.tick(ms(2000)), Some(ActiveChange { from: 1, to: 2 }));
        assert_eq!(c.tick(ms(3000)), Some(ActiveChange { from: 2, to: 0 }));
    }

    #[test]
    fn late_tick_does_not_replay() {
        let mut c = Carousel::new(config(), 4);
        c.start(ms(0));
        assert_eq!(c.tick(ms(10_500)), Some(ActiveChange { from: 0, to: 1 }));
        assert_eq!(c.next_deadline(), Some(ms(11_500)));
        assert_eq!(c.tick(ms(10_600)), None);
    }

    #[test]
    fn hover_pauses_and_resumes_immediately_for_highlights() {
        let mut c = Carousel::new(config(), 3);
        c.start(ms(0));
        c.hover_enter();
        assert_eq!(c.tick(ms(5000)), None);
        c.hover_leave(ms(5000));
        assert_eq!(c.tick(ms(5999)), None);
        assert_eq!(c.tick(ms(6000)), Some(ActiveChange { from: 0, to: 1 }));
    }

    #[test]
    fn skill_minis_wait_for_grace() {
        let mut c = Carousel::new(CarouselConfig::skill_minis().interval(ms(1000)), 3);
        c.start(ms(0));
        c.hover_enter();
        c.hover_leave(ms(2000));
        assert_eq!(c.next_deadline(), Some(ms(2500)));
        assert_eq!(c.tick(ms(3499)), None);
        assert_eq!(c.tick(ms(3500)), Some(ActiveChange { from: 0, to: 1 }));
    }

    #[test]
    fn activate_jumps_and_resumes_after_interval() {
        let mut c = Carousel::new(config(), 5);
        c.start(ms(0));
        assert_eq!(c.activate(3, ms(400)), Some(ActiveChange { from: 0, to: 3 }));
        assert_eq!(c.active(), Some(3));
        assert_eq!(c.next_deadline(), Some(ms(1400)));
        assert_eq!(c.tick(ms(1400)), None);
        assert_eq!(c.tick(ms(2400)), Some(ActiveChange { from: 3, to: 4 }));
    }

    #[test]
    fn activate_current_reports_no_change() {
        let mut c = Carousel::new(config(), 2);
        assert_eq!(c.activate(0, ms(0)), None);
        assert!(c.is_scheduled());
        assert_eq!(c.activate(9, ms(0)), None);
    }
}
