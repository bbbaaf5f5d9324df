#![forbid(unsafe_code)]

//! Project details modal.
//!
//! The modal owns whatever guard keeps its global Escape listener alive. The
//! guard is handed in on [`ModalController::open`] and lives inside the open
//! state, so every way out of that state (close button, backdrop, Escape,
//! replacing the controller) drops it. Listener lifetime is therefore exactly
//! the open lifetime, no matter how many open/close cycles happen.

use crate::element::ElementId;
use crate::logging::debug;

/// Title used when the trigger and its card provide none.
pub const FALLBACK_TITLE: &str = "Project details";

/// Key name that dismisses the modal.
pub const ESCAPE: &str = "Escape";

/// What the modal shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalContent {
    /// Plain-text title.
    pub title: String,
    /// Markup fragment for the body.
    pub body: String,
}

impl ModalContent {
    /// Resolve content from a trigger link.
    ///
    /// Explicit `data-title` / `data-body` attributes win; otherwise the
    /// nearest card's heading and description are used.
    #[must_use]
    pub fn from_trigger(
        data_title: Option<&str>,
        data_body: Option<&str>,
        card_heading: Option<&str>,
        card_description: Option<&str>,
    ) -> Self {
        let pick = |primary: Option<&str>, fallback: Option<&str>| {
            primary
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .or_else(|| fallback.map(str::trim).filter(|s| !s.is_empty()))
                .map(str::to_owned)
        };
        Self {
            title: pick(data_title, card_heading).unwrap_or_else(|| FALLBACK_TITLE.to_owned()),
            body: pick(data_body, card_description).unwrap_or_default(),
        }
    }
}

/// State held while the modal is open.
#[derive(Debug)]
pub struct OpenModal<G> {
    content: ModalContent,
    restore_focus: Option<ElementId>,
    _escape: G,
}

impl<G> OpenModal<G> {
    /// Content being shown.
    #[must_use]
    pub fn content(&self) -> &ModalContent {
        &self.content
    }
}

/// Result of closing the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalClosed {
    /// Element that had focus before the modal opened.
    pub restore_focus: Option<ElementId>,
}

/// Modal open/closed state, generic over the Escape listener guard.
#[derive(Debug)]
pub struct ModalController<G> {
    open: Option<OpenModal<G>>,
}

impl<G> Default for ModalController<G> {
    fn default() -> Self {
        Self { open: None }
    }
}

impl<G> ModalController<G> {
    /// Create a closed modal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the modal is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Content currently shown.
    #[must_use]
    pub fn content(&self) -> Option<&ModalContent> {
        self.open.as_ref().map(OpenModal::content)
    }

    /// Open with `content`, taking ownership of the Escape listener guard.
    ///
    /// If the modal is already open only the content is replaced; the new
    /// guard is dropped so exactly one listener stays attached. Returns
    /// `true` when the modal went from closed to open.
    pub fn open(
        &mut self,
        content: ModalContent,
        restore_focus: Option<ElementId>,
        escape_guard: G,
    ) -> bool {
        if let Some(open) = self.open.as_mut() {
            open.content = content;
            drop(escape_guard);
            return false;
        }
        debug!(title = %content.title, "modal opened");
        self.open = Some(OpenModal {
            content,
            restore_focus,
            _escape: escape_guard,
        });
        true
    }

    /// Close the modal, releasing the Escape guard. `None` if already closed.
    pub fn close(&mut self) -> Option<ModalClosed> {
        let open = self.open.take()?;
        debug!("modal closed");
        Some(ModalClosed {
            restore_focus: open.restore_focus,
        })
    }

    /// Handle a global key press. Only Escape while open does anything.
    pub fn handle_key(&mut self, key: &str) -> Option<ModalClosed> {
        if key == ESCAPE { self.close() } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Guard that counts live listeners.
    struct Listener(Rc<Cell<i32>>);

    impl Listener {
        fn attach(live: &Rc<Cell<i32>>) -> Self {
            live.set(live.get() + 1);
            Self(Rc::clone(live))
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    fn content(title: &str) -> ModalContent {
        ModalContent {
            title: title.to_owned(),
            body: "<p>body</p>".to_owned(),
        }
    }

    #[test]
    fn open_close_releases_listener() {
        let live = Rc::new(Cell::new(0));
        let mut modal = ModalController::new();
        assert!(modal.open(content("A"), Some(ElementId(3)), Listener::attach(&live)));
        assert_eq!(live.get(), 1);
        assert_eq!(
            modal.close(),
            Some(ModalClosed {
                restore_focus: Some(ElementId(3)),
            })
        );
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn double_close_is_noop() {
        let live = Rc::new(Cell::new(0));
        let mut modal = ModalController::new();
        modal.open(content("A"), None, Listener::attach(&live));
        assert!(modal.close().is_some());
        assert!(modal.close().is_none());
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn escape_while_closed_does_nothing() {
        let mut modal: ModalController<()> = ModalController::new();
        assert!(modal.handle_key(ESCAPE).is_none());
        assert!(!modal.is_open());
    }

    #[test]
    fn escape_closes_and_other_keys_do_not() {
        let live = Rc::new(Cell::new(0));
        let mut modal = ModalController::new();
        modal.open(content("A"), None, Listener::attach(&live));
        assert!(modal.handle_key("Enter").is_none());
        assert!(modal.is_open());
        assert!(modal.handle_key(ESCAPE).is_some());
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn reopen_keeps_single_listener() {
        let live = Rc::new(Cell::new(0));
        let mut modal = ModalController::new();
        modal.open(content("A"), None, Listener::attach(&live));
        assert!(!modal.open(content("B"), None, Listener::attach(&live)));
        assert_eq!(live.get(), 1);
        assert_eq!(modal.content().map(|c| c.title.as_str()), Some("B"));
    }

    #[test]
    fn many_cycles_do_not_leak() {
        let live = Rc::new(Cell::new(0));
        let mut modal = ModalController::new();
        for _ in 0..50 {
            modal.open(content("A"), None, Listener::attach(&live));
            modal.handle_key(ESCAPE);
        }
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn content_fallbacks() {
        let explicit = ModalContent::from_trigger(Some("Mesh"), Some("<p>x</p>"), Some("Card"), None);
        assert_eq!(explicit.title, "Mesh");
        assert_eq!(explicit.body, "<p>x</p>");

        let from_card = ModalContent::from_trigger(None, Some("  "), Some(" Card "), Some("desc"));
        assert_eq!(from_card.title, "Card");
        assert_eq!(from_card.body, "desc");

        let bare = ModalContent::from_trigger(None, None, None, None);
        assert_eq!(bare.title, FALLBACK_TITLE);
        assert!(bare.body.is_empty());
    }
}
