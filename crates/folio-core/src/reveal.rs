#![forbid(unsafe_code)]

//! One-shot reveal observer.
//!
//! The host watches registered elements with its viewport-intersection
//! capability and forwards every entry to [`RevealObserver::report`]. The
//! first entry that shows an element at least [`RevealConfig::threshold`]
//! visible reveals it; the element is then dropped from the watch set and the
//! host is told to stop observing it.
//!
//! # Deferred registration
//!
//! Circular skill cards are not watched up front. They are handed to the
//! observer with [`RevealObserver::defer_cards`] and only registered once a
//! [`WatchKind::SkillsGroup`] container is revealed, so off-screen grids cost
//! nothing until the reader scrolls near them.
//!
//! A card may also match a plain reveal selector and be watched under
//! another kind from the start. Whatever kind revealed it, an element known
//! as a card always gets its progress run.
//!
//! # Invariants
//!
//! 1. An element is reported at most once over the observer's lifetime.
//! 2. No element is reported below the visibility threshold.
//! 3. A revealed element can never be registered again.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Deserialize;

use crate::element::ElementId;
use crate::logging::{debug, trace};

/// Minimum visible-area ratio that counts as "in view".
pub const DEFAULT_REVEAL_THRESHOLD: f32 = 0.12;

/// Reveal observer settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Visible-area ratio at or above which an element is revealed.
    pub threshold: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_REVEAL_THRESHOLD,
        }
    }
}

/// What a watched element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchKind {
    /// Plain entrance transition (`.reveal`, `.card`).
    Generic,
    /// A linear skill bar (`.skill`).
    LinearSkill,
    /// A container of circular skill cards (`.skills`, `.skills-grid`).
    SkillsGroup,
    /// A circular skill card (`.skill-card`).
    CircularSkillCard,
}

/// One report from the host's intersection capability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// The element the entry is about.
    pub element: ElementId,
    /// Fraction of the element's area inside the viewport.
    pub ratio: f32,
    /// Whether the host considers the element intersecting at all.
    pub intersecting: bool,
}

impl IntersectionEntry {
    /// Convenience constructor for an intersecting entry.
    #[must_use]
    pub const fn visible(element: ElementId, ratio: f32) -> Self {
        Self {
            element,
            ratio,
            intersecting: true,
        }
    }
}

/// Side effect requested by a reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealAction {
    /// Add the `visible` marker to the element.
    MarkVisible(ElementId),
    /// Set a linear skill bar's width immediately.
    SetBarWidth {
        /// The `.skill` element.
        skill: ElementId,
        /// Width in percent.
        percent: u8,
    },
    /// Start observing a newly registered element.
    Observe(ElementId),
    /// Stop observing an element.
    Unobserve(ElementId),
    /// Run the progress animation for a circular card.
    AnimateCard {
        /// The `.skill-card` element.
        card: ElementId,
        /// Target percent.
        percent: u8,
    },
}

#[derive(Debug, Clone, Copy)]
struct Watched {
    kind: WatchKind,
    target_percent: u8,
}

/// Watch set plus the per-element side-tables the reveal logic needs.
#[derive(Debug, Clone, Default)]
pub struct RevealObserver {
    config: RevealConfig,
    watched: BTreeMap<ElementId, Watched>,
    revealed: HashSet<ElementId>,
    skill_percent: HashMap<ElementId, u8>,
    skill_children: HashMap<ElementId, Vec<ElementId>>,
    deferred_cards: Vec<(ElementId, u8)>,
    card_percent: HashMap<ElementId, u8>,
}

impl RevealObserver {
    /// Create an empty observer.
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Record the target percent of a linear skill bar.
    ///
    /// This is the side-table the bar widths are read from, whether the skill
    /// is revealed on its own or as the child of a revealed container.
    pub fn define_skill(&mut self, skill: ElementId, percent: u8) {
        self.skill_percent.insert(skill, percent.min(100));
    }

    /// Declare the linear skills nested inside `container`.
    pub fn attach_children(&mut self, container: ElementId, skills: Vec<ElementId>) {
        if !skills.is_empty() {
            self.skill_children.insert(container, skills);
        }
    }

    /// Hand over circular skill cards for deferred registration.
    pub fn defer_cards(&mut self, cards: impl IntoIterator<Item = (ElementId, u8)>) {
        for (card, percent) in cards {
            self.card_percent.insert(card, percent.min(100));
            self.deferred_cards.push((card, percent));
        }
    }

    /// Add `element` to the watch set.
    ///
    /// Returns `false` if it is already watched or was revealed before; the
    /// caller must only start observing on `true`.
    pub fn register(&mut self, element: ElementId, kind: WatchKind, target_percent: u8) -> bool {
        if self.revealed.contains(&element) || self.watched.contains_key(&element) {
            return false;
        }
        let target_percent = match kind {
            WatchKind::LinearSkill => {
                let pct = self
                    .skill_percent
                    .get(&element)
                    .copied()
                    .unwrap_or(target_percent.min(100));
                self.skill_percent.insert(element, pct);
                pct
            }
            _ => target_percent.min(100),
        };
        trace!(%element, ?kind, "watching");
        self.watched.insert(
            element,
            Watched {
                kind,
                target_percent,
            },
        );
        true
    }

    /// Feed one intersection entry. Returns the actions the reveal requires,
    /// in application order; empty if nothing happened.
    pub fn report(&mut self, entry: IntersectionEntry) -> Vec<RevealAction> {
        let mut actions = Vec::new();
        if !entry.intersecting || entry.ratio < self.config.threshold {
            return actions;
        }
        let Some(watched) = self.watched.remove(&entry.element) else {
            return actions;
        };
        let element = entry.element;
        self.revealed.insert(element);
        debug!(%element, kind = ?watched.kind, ratio = entry.ratio, "revealed");

        actions.push(RevealAction::MarkVisible(element));
        match watched.kind {
            WatchKind::Generic | WatchKind::CircularSkillCard => {}
            WatchKind::LinearSkill => actions.push(RevealAction::SetBarWidth {
                skill: element,
                percent: watched.target_percent,
            }),
            WatchKind::SkillsGroup => {
                let cards = std::mem::take(&mut self.deferred_cards);
                for (card, percent) in cards {
                    if self.register(card, WatchKind::CircularSkillCard, percent) {
                        actions.push(RevealAction::Observe(card));
                    }
                }
            }
        }
        let card_percent = self.card_percent.get(&element).copied();
        if watched.kind == WatchKind::CircularSkillCard || card_percent.is_some() {
            actions.push(RevealAction::AnimateCard {
                card: element,
                percent: card_percent.unwrap_or(watched.target_percent),
            });
        }

        if let Some(children) = self.skill_children.get(&element) {
            for &skill in children {
                let percent = self.skill_percent.get(&skill).copied().unwrap_or(0);
                actions.push(RevealAction::SetBarWidth { skill, percent });
            }
        }

        actions.push(RevealAction::Unobserve(element));
        actions
    }

    /// Drop every trace of a detached element from the watch set.
    ///
    /// Returns `true` if it was still being watched.
    pub fn forget(&mut self, element: ElementId) -> bool {
        self.deferred_cards.retain(|(card, _)| *card != element);
        self.card_percent.remove(&element);
        self.watched.remove(&element).is_some()
    }

    /// Whether `element` is currently watched.
    #[must_use]
    pub fn is_watched(&self, element: ElementId) -> bool {
        self.watched.contains_key(&element)
    }

    /// Whether `element` has been revealed.
    #[must_use]
    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.revealed.contains(&element)
    }

    /// Number of watched elements.
    #[must_use]
    pub fn watched_len(&self) -> usize {
        self.watched.len()
    }

    /// Threshold in use.
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.config.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id(n: u32) -> ElementId {
        ElementId(n)
    }

    #[test]
    fn generic_reveal_marks_and_unobserves() {
        let mut obs = RevealObserver::default();
        assert!(obs.register(id(1), WatchKind::Generic, 0));
        let actions = obs.report(IntersectionEntry::visible(id(1), 0.5));
        assert_eq!(
            actions,
            vec![
                RevealAction::MarkVisible(id(1)),
                RevealAction::Unobserve(id(1)),
            ]
        );
        assert!(!obs.is_watched(id(1)));
        assert!(obs.is_revealed(id(1)));
    }

    #[test]
    fn below_threshold_is_ignored() {
        let mut obs = RevealObserver::default();
        obs.register(id(1), WatchKind::Generic, 0);
        assert!(obs.report(IntersectionEntry::visible(id(1), 0.11)).is_empty());
        assert!(
            obs.report(IntersectionEntry {
                element: id(1),
                ratio: 0.9,
                intersecting: false,
            })
            .is_empty()
        );
        assert!(obs.is_watched(id(1)));
        assert!(!obs.report(IntersectionEntry::visible(id(1), 0.12)).is_empty());
    }

    #[test]
    fn reveal_is_one_shot() {
        let mut obs = RevealObserver::default();
        obs.register(id(1), WatchKind::Generic, 0);
        assert!(!obs.report(IntersectionEntry::visible(id(1), 1.0)).is_empty());
        assert!(obs.report(IntersectionEntry::visible(id(1), 1.0)).is_empty());
        assert!(!obs.register(id(1), WatchKind::Generic, 0));
    }

    #[test]
    fn linear_skill_sets_width_from_side_table() {
        let mut obs = RevealObserver::default();
        obs.define_skill(id(3), 82);
        obs.register(id(3), WatchKind::LinearSkill, 0);
        let actions = obs.report(IntersectionEntry::visible(id(3), 0.2));
        assert_eq!(
            actions,
            vec![
                RevealAction::MarkVisible(id(3)),
                RevealAction::SetBarWidth {
                    skill: id(3),
                    percent: 82,
                },
                RevealAction::Unobserve(id(3)),
            ]
        );
    }

    #[test]
    fn group_registers_deferred_cards_once() {
        let mut obs = RevealObserver::default();
        obs.register(id(10), WatchKind::SkillsGroup, 0);
        obs.register(id(11), WatchKind::SkillsGroup, 0);
        obs.defer_cards([(id(20), 90), (id(21), 75)]);
        assert!(!obs.is_watched(id(20)));

        let actions = obs.report(IntersectionEntry::visible(id(10), 0.3));
        assert_eq!(
            actions,
            vec![
                RevealAction::MarkVisible(id(10)),
                RevealAction::Observe(id(20)),
                RevealAction::Observe(id(21)),
                RevealAction::Unobserve(id(10)),
            ]
        );

        let second = obs.report(IntersectionEntry::visible(id(11), 0.3));
        assert!(!second.iter().any(|a| matches!(a, RevealAction::Observe(_))));
    }

    #[test]
    fn card_reveal_requests_animation() {
        let mut obs = RevealObserver::default();
        obs.register(id(10), WatchKind::SkillsGroup, 0);
        obs.defer_cards([(id(20), 90)]);
        obs.report(IntersectionEntry::visible(id(10), 0.3));
        let actions = obs.report(IntersectionEntry::visible(id(20), 0.5));
        assert!(actions.contains(&RevealAction::AnimateCard {
            card: id(20),
            percent: 90,
        }));
    }

    #[test]
    fn container_updates_nested_skills() {
        let mut obs = RevealObserver::default();
        obs.define_skill(id(5), 60);
        obs.define_skill(id(6), 45);
        obs.attach_children(id(4), vec![id(5), id(6)]);
        obs.register(id(4), WatchKind::Generic, 0);
        let actions = obs.report(IntersectionEntry::visible(id(4), 0.5));
        assert_eq!(
            actions,
            vec![
                RevealAction::MarkVisible(id(4)),
                RevealAction::SetBarWidth {
                    skill: id(5),
                    percent: 60,
                },
                RevealAction::SetBarWidth {
                    skill: id(6),
                    percent: 45,
                },
                RevealAction::Unobserve(id(4)),
            ]
        );
    }

    #[test]
    fn forget_drops_watch_and_deferred_card() {
        let mut obs = RevealObserver::default();
        obs.register(id(1), WatchKind::Generic, 0);
        obs.register(id(10), WatchKind::SkillsGroup, 0);
        obs.defer_cards([(id(20), 50)]);
        assert!(obs.forget(id(1)));
        assert!(!obs.forget(id(1)));
        obs.forget(id(20));
        let actions = obs.report(IntersectionEntry::visible(id(10), 1.0));
        assert!(!actions.contains(&RevealAction::Observe(id(20))));
    }

    #[test]
    fn card_watched_as_generic_still_animates() {
        let mut obs = RevealObserver::default();
        obs.register(id(10), WatchKind::SkillsGroup, 0);
        obs.register(id(30), WatchKind::Generic, 0);
        obs.defer_cards([(id(30), 90)]);

        let group = obs.report(IntersectionEntry::visible(id(10), 1.0));
        assert!(!group.contains(&RevealAction::Observe(id(30))));

        let card = obs.report(IntersectionEntry::visible(id(30), 1.0));
        assert_eq!(
            card,
            vec![
                RevealAction::MarkVisible(id(30)),
                RevealAction::AnimateCard {
                    card: id(30),
                    percent: 90,
                },
                RevealAction::Unobserve(id(30)),
            ]
        );
    }

    #[test]
    fn card_revealed_before_its_group_is_not_rewatched() {
        let mut obs = RevealObserver::default();
        obs.register(id(10), WatchKind::SkillsGroup, 0);
        obs.register(id(30), WatchKind::Generic, 0);
        obs.defer_cards([(id(30), 40)]);

        let card = obs.report(IntersectionEntry::visible(id(30), 1.0));
        assert!(card.contains(&RevealAction::AnimateCard {
            card: id(30),
            percent: 40,
        }));
        let group = obs.report(IntersectionEntry::visible(id(10), 1.0));
        assert!(!group.contains(&RevealAction::Observe(id(30))));
        assert!(!obs.is_watched(id(30)));
    }

    #[test]
    fn unknown_element_is_ignored() {
        let mut obs = RevealObserver::default();
        assert!(obs.report(IntersectionEntry::visible(id(99), 1.0)).is_empty());
    }
}
