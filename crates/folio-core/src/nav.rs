#![forbid(unsafe_code)]

//! Site navigation: mobile menu, header shadow, in-page anchors, and the
//! scroll-spy that highlights the nav link of the section being read.

use serde::Deserialize;

use crate::element::ElementId;

/// Navigation settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Scroll offset (px) beyond which the header gets its shadow.
    pub shadow_after: f64,
    /// Distance (px) below the viewport top at which a section counts as
    /// current.
    pub spy_offset: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            shadow_after: 20.0,
            spy_offset: 120.0,
        }
    }
}

/// A page section tracked by the scroll-spy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    /// Nav link pointing at the section.
    pub link: ElementId,
    /// Document offset of the section's top edge (px).
    pub top: f64,
}

/// What a scroll position changed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollUpdate {
    /// New header shadow state, if it flipped.
    pub scrolled: Option<bool>,
    /// Link that lost the highlight.
    pub deactivated: Option<ElementId>,
    /// Link that gained the highlight.
    pub activated: Option<ElementId>,
}

/// Fragment id of an in-page link, if it is one worth handling.
///
/// `"#about"` → `Some("about")`; a bare `"#"` or an external link → `None`.
#[must_use]
pub fn anchor_fragment(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|frag| !frag.is_empty())
}

/// Navigation state.
#[derive(Debug, Clone, Default)]
pub struct NavController {
    config: NavConfig,
    menu_open: bool,
    scrolled: bool,
    sections: Vec<Section>,
    active: Option<ElementId>,
}

impl NavController {
    /// Create a closed, unscrolled navigation.
    #[must_use]
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Whether the mobile menu is open.
    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Whether the header currently has its shadow.
    #[must_use]
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Highlighted nav link.
    #[must_use]
    pub fn active_link(&self) -> Option<ElementId> {
        self.active
    }

    /// Flip the mobile menu. Returns the new open state.
    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    /// Close the mobile menu. Returns `true` if it was open.
    pub fn close_menu(&mut self) -> bool {
        std::mem::replace(&mut self.menu_open, false)
    }

    /// Replace the tracked sections (after load or a layout change).
    pub fn set_sections(&mut self, mut sections: Vec<Section>) {
        sections.sort_by(|a, b| a.top.total_cmp(&b.top));
        self.sections = sections;
    }

    /// Apply a new vertical scroll offset.
    pub fn scroll_to(&mut self, scroll_y: f64) -> ScrollUpdate {
        let mut update = ScrollUpdate::default();

        let scrolled = scroll_y > self.config.shadow_after;
        if scrolled != self.scrolled {
            self.scrolled = scrolled;
            update.scrolled = Some(scrolled);
        }

        let probe = scroll_y + self.config.spy_offset;
        let current = self
            .sections
            .iter()
            .take_while(|s| s.top <= probe)
            .last()
            .or_else(|| self.sections.first())
            .map(|s| s.link);
        if current != self.active {
            update.deactivated = self.active;
            update.activated = current;
            self.active = current;
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<Section> {
        vec![
            Section {
                link: ElementId(2),
                top: 800.0,
            },
            Section {
                link: ElementId(1),
                top: 0.0,
            },
            Section {
                link: ElementId(3),
                top: 1600.0,
            },
        ]
    }

    #[test]
    fn anchor_fragments() {
        assert_eq!(anchor_fragment("#about"), Some("about"));
        assert_eq!(anchor_fragment("#"), None);
        assert_eq!(anchor_fragment("https://x.dev/#a"), None);
    }

    #[test]
    fn menu_toggle_and_close() {
        let mut nav = NavController::default();
        assert!(nav.toggle_menu());
        assert!(nav.close_menu());
        assert!(!nav.close_menu());
        assert!(!nav.is_menu_open());
    }

    #[test]
    fn header_shadow_threshold() {
        let mut nav = NavController::new(NavConfig::default());
        assert_eq!(nav.scroll_to(20.0).scrolled, None);
        assert_eq!(nav.scroll_to(21.0).scrolled, Some(true));
        assert_eq!(nav.scroll_to(400.0).scrolled, None);
        assert_eq!(nav.scroll_to(0.0).scrolled, Some(false));
    }

    #[test]
    fn spy_tracks_single_active_link() {
        let mut nav = NavController::new(NavConfig::default());
        nav.set_sections(sections());

        let first = nav.scroll_to(0.0);
        assert_eq!(first.activated, Some(ElementId(1)));
        assert_eq!(first.deactivated, None);

        let second = nav.scroll_to(700.0);
        assert_eq!(second.activated, Some(ElementId(2)));
        assert_eq!(second.deactivated, Some(ElementId(1)));

        assert_eq!(nav.scroll_to(750.0).activated, None);
        assert_eq!(nav.scroll_to(5000.0).activated, Some(ElementId(3)));
        assert_eq!(nav.active_link(), Some(ElementId(3)));
    }

    #[test]
    fn spy_without_sections_is_quiet() {
        let mut nav = NavController::default();
        let update = nav.scroll_to(100.0);
        assert_eq!(update.activated, None);
        assert_eq!(update.deactivated, None);
    }
}
