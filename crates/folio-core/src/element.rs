#![forbid(unsafe_code)]

//! Element identity and render targets.
//!
//! The host owns the real page nodes. `folio-core` only ever sees opaque
//! [`ElementId`] handles handed out by the host's node table, and keeps any
//! per-element state (revealed, animated, filled) in its own side-tables keyed
//! by those handles.

use std::fmt;

/// Opaque handle to a page node, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl ElementId {
    /// Create a new element handle.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw handle value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where an effect lands.
///
/// Singleton page fixtures are named; everything else goes through an
/// [`ElementId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The document root (`<html>`), carrier of `data-theme`.
    Root,
    /// `<body>`, carrier of the modal scroll lock.
    Body,
    /// `.site-header`.
    Header,
    /// `.main-nav`.
    MainNav,
    /// `.nav-toggle`.
    NavToggle,
    /// The hero text node the typing loop writes into (`#typed`).
    Typed,
    /// The notice surface (`#toast`).
    Toast,
    /// The contact form submit button (`.send-btn`).
    SendButton,
    /// The label span inside the submit button (`.send-btn .btn-text`).
    SendLabel,
    /// The theme toggle control (`#theme-toggle`).
    ThemeToggle,
    /// The modal overlay.
    Modal,
    /// The modal title slot.
    ModalTitle,
    /// The modal body slot.
    ModalBody,
    /// The modal close button.
    ModalClose,
    /// Any other registered node.
    Element(ElementId),
}

impl From<ElementId> for Target {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}
