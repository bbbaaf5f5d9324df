#![forbid(unsafe_code)]

//! Transient notice surface.
//!
//! One toast slot per page. Showing a notice replaces whatever is on screen
//! and restarts the hide timer. Pages without a toast element fall back to a
//! blocking alert.

use std::time::Duration;

/// How long a notice stays up by default.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(2600);

/// How a notice was presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Shown in the toast element.
    Toast(String),
    /// No toast element: present as a blocking alert.
    Alert(String),
}

#[derive(Debug, Clone)]
struct Shown {
    message: String,
    hide_at: Duration,
}

/// Single-slot toast state.
#[derive(Debug, Clone)]
pub struct ToastSlot {
    has_surface: bool,
    shown: Option<Shown>,
}

impl ToastSlot {
    /// Create a slot; `has_surface` is whether the page has a toast element.
    #[must_use]
    pub fn new(has_surface: bool) -> Self {
        Self {
            has_surface,
            shown: None,
        }
    }

    /// Show `message` for `duration`.
    pub fn show(&mut self, message: impl Into<String>, duration: Duration, now: Duration) -> Notice {
        let message = message.into();
        if !self.has_surface {
            return Notice::Alert(message);
        }
        self.shown = Some(Shown {
            message: message.clone(),
            hide_at: now + duration,
        });
        Notice::Toast(message)
    }

    /// Message currently on screen.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.shown.as_ref().map(|s| s.message.as_str())
    }

    /// Whether a toast is on screen.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.shown.is_some()
    }

    /// Next time the slot needs a tick.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.shown.as_ref().map(|s| s.hide_at)
    }

    /// Hide the toast if its time is up. Returns `true` when it was hidden.
    pub fn tick(&mut self, now: Duration) -> bool {
        if self.shown.as_ref().is_some_and(|s| s.hide_at <= now) {
            self.shown = None;
            true
        } else {
            false
        }
    }
}
