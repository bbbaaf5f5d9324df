#![forbid(unsafe_code)]

//! Hero typing loop.
//!
//! Types each phrase forward one grapheme at a time, holds the full phrase,
//! deletes it at roughly double speed, then moves on to the next phrase,
//! wrapping around forever. The loop is a plain state machine with one pending
//! deadline; the host advances it with [`TypingSequencer::tick`].

use std::time::Duration;

use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

/// Floor for the per-grapheme delete delay.
pub const MIN_DELETE_DELAY: Duration = Duration::from_millis(20);

/// Typing loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Phrases, typed in order and repeated forever.
    pub phrases: Vec<String>,
    /// Delay between typed graphemes.
    #[serde(rename = "type_delay_ms", with = "crate::config::millis")]
    pub type_delay: Duration,
    /// Hold time once a phrase is fully shown.
    #[serde(rename = "pause_ms", with = "crate::config::millis")]
    pub pause: Duration,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            phrases: [
                "DevOps Engineer",
                "Cloud Platform Engineer",
                "Kubernetes, Helm & ArgoCD",
                "Infrastructure as Code",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            type_delay: Duration::from_millis(60),
            pause: Duration::from_millis(1600),
        }
    }
}

impl TypingConfig {
    /// Delay between deleted graphemes: half the type delay, never below
    /// [`MIN_DELETE_DELAY`].
    #[must_use]
    pub fn delete_delay(&self) -> Duration {
        (self.type_delay / 2).max(MIN_DELETE_DELAY)
    }
}

/// Direction the loop is currently moving in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    /// Adding graphemes.
    Typing,
    /// Removing graphemes.
    Deleting,
}

/// Typing loop state.
#[derive(Debug, Clone)]
pub struct TypingSequencer {
    config: TypingConfig,
    /// Grapheme byte offsets per phrase; `bounds[w][n]` ends the first `n`
    /// graphemes of phrase `w`.
    bounds: Vec<Vec<usize>>,
    word: usize,
    shown: usize,
    phase: TypingPhase,
    next_at: Option<Duration>,
}

impl TypingSequencer {
    /// Build a sequencer. Empty phrases are skipped; with none left the
    /// sequencer is inert.
    #[must_use]
    pub fn new(mut config: TypingConfig) -> Self {
        config.phrases.retain(|p| !p.is_empty());
        let bounds = config
            .phrases
            .iter()
            .map(|p| {
                p.grapheme_indices(true)
                    .map(|(i, g)| i + g.len())
                    .collect()
            })
            .collect();
        Self {
            config,
            bounds,
            word: 0,
            shown: 0,
            phase: TypingPhase::Typing,
            next_at: None,
        }
    }

    /// Whether there is anything to type.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.config.phrases.is_empty()
    }

    /// Whether the loop has been started.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.next_at.is_some()
    }

    /// Index of the phrase being typed or deleted.
    #[must_use]
    pub fn word_index(&self) -> usize {
        self.word
    }

    /// Current phrase, if any.
    #[must_use]
    pub fn current_phrase(&self) -> Option<&str> {
        self.config.phrases.get(self.word).map(String::as_str)
    }

    /// Current direction.
    #[must_use]
    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    /// Next time the loop needs a tick.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.next_at
    }

    /// Text currently displayed.
    #[must_use]
    pub fn text(&self) -> &str {
        match self.current_phrase() {
            Some(phrase) if self.shown > 0 => &phrase[..self.bounds[self.word][self.shown - 1]],
            _ => "",
        }
    }

    /// Start the loop: the first grapheme is typed immediately.
    ///
    /// Returns the text to display, or `None` if inert or already running.
    pub fn start(&mut self, now: Duration) -> Option<&str> {
        if self.is_inert() || self.is_running() {
            return None;
        }
        self.step(now);
        Some(self.text())
    }

    /// Fire the pending step if due. Returns the new text when it changed.
    pub fn tick(&mut self, now: Duration) -> Option<&str> {
        match self.next_at {
            Some(at) if at <= now => {
                self.step(now);
                Some(self.text())
            }
            _ => None,
        }
    }

    fn step(&mut self, now: Duration) {
        let len = self.bounds[self.word].len();
        let delay = match self.phase {
            TypingPhase::Typing => {
                self.shown = (self.shown + 1).min(len);
                if self.shown == len {
                    self.phase = TypingPhase::Deleting;
                    self.config.pause
                } else {
                    self.config.type_delay
                }
            }
            TypingPhase::Deleting => {
                self.shown = self.shown.saturating_sub(1);
                if self.shown == 0 {
                    self.phase = TypingPhase::Typing;
                    self.word = (self.word + 1) % self.bounds.len();
                    self.config.type_delay
                } else {
                    self.config.delete_delay()
                }
            }
        };
        self.next_at = Some(now + delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn config(phrases: &[&str]) -> TypingConfig {
        TypingConfig {
            phrases: phrases.iter().map(|p| (*p).to_owned()).collect(),
            type_delay: ms(60),
            pause: ms(1600),
        }
    }

    #[test]
    fn delete_delay_is_half_with_floor() {
        assert_eq!(config(&["a"]).delete_delay(), ms(30));
        let mut fast = config(&["a"]);
        fast.type_delay = ms(10);
        assert_eq!(fast.delete_delay(), ms(20));
    }

    #[test]
    fn empty_list_is_inert() {
        let mut seq = TypingSequencer::new(config(&[]));
        assert!(seq.is_inert());
        assert_eq!(seq.start(ms(0)), None);
        assert_eq!(seq.tick(ms(1000)), None);
    }

    #[test]
    fn empty_phrases_are_skipped() {
        let mut seq = TypingSequencer::new(config(&["", "ok", ""]));
        assert_eq!(seq.start(ms(0)), Some("o"));
    }

    #[test]
    fn full_cycle_timing() {
        let mut seq = TypingSequencer::new(config(&["ab", "c"]));
        assert_eq!(seq.start(ms(0)), Some("a"));
        assert_eq!(seq.tick(ms(59)), None);
        assert_eq!(seq.tick(ms(60)), Some("ab"));
        assert_eq!(seq.phase(), TypingPhase::Deleting);
        // held for the pause
        assert_eq!(seq.tick(ms(1659)), None);
        assert_eq!(seq.tick(ms(1660)), Some("a"));
        assert_eq!(seq.tick(ms(1690)), Some(""));
        assert_eq!(seq.word_index(), 1);
        assert_eq!(seq.tick(ms(1750)), Some("c"));
        assert_eq!(seq.tick(ms(3350)), Some(""));
        assert_eq!(seq.word_index(), 0);
        assert_eq!(seq.tick(ms(3410)), Some("a"));
    }

    #[test]
    fn steps_by_grapheme() {
        let mut seq = TypingSequencer::new(config(&["e\u{301}x"]));
        assert_eq!(seq.start(ms(0)), Some("e\u{301}"));
        assert_eq!(seq.tick(ms(60)), Some("e\u{301}x"));
    }

    #[test]
    fn start_twice_is_noop() {
        let mut seq = TypingSequencer::new(config(&["abc"]));
        assert!(seq.start(ms(0)).is_some());
        assert_eq!(seq.start(ms(5)), None);
        assert_eq!(seq.text(), "a");
    }
}
