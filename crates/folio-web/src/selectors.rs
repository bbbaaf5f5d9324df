#![forbid(unsafe_code)]

//! CSS selectors and ids the frontend binds to.
//!
//! Every binding is optional: a selector that matches nothing skips the
//! widget it belongs to.

use folio_core::reveal::WatchKind;

pub const SITE_HEADER: &str = ".site-header";
pub const NAV_TOGGLE: &str = ".nav-toggle";
pub const MAIN_NAV: &str = ".main-nav";
pub const NAV_LINKS: &str = ".main-nav a[href^=\"#\"]";
pub const ANCHORS: &str = "a[href^=\"#\"]";

pub const TYPED: &str = "typed";
pub const TOAST: &str = "toast";
pub const THEME_TOGGLE: &str = "theme-toggle";

/// Elements observed for reveal from the start.
pub const REVEAL: &str = ".reveal, .card, .skill, .skills-grid";
pub const SKILL: &str = ".skill";
pub const SKILL_CARD: &str = ".skill-card";
pub const SKILL_CARD_CIRCLE: &str = ".circle";
pub const SKILL_CARD_PCT: &str = ".pct";
pub const BAR: &str = ".bar";

/// Markup appended to every `.skill`: `(tag, class)` for the bar track, the
/// bar, and the percent label.
pub const SKILL_BAR_WRAP: (&str, &str) = ("div", "bar-wrap");
pub const SKILL_BAR_FILL: (&str, &str) = ("div", "bar");
pub const SKILL_BAR_LABEL: (&str, &str) = ("div", "percent");

pub const HIGHLIGHTS: &str = ".highlights";
pub const HIGHLIGHT_ITEM: &str = ".highlight";
pub const SKILL_MINIS: &str = ".skill-minis";
pub const SKILL_MINI_ITEM: &str = ".skill-mini";

pub const CONTACT_FORM: &str = "contact-form";
pub const CONTACT_NAME: &str = "contact-name";
pub const CONTACT_EMAIL: &str = "contact-email";
pub const CONTACT_MESSAGE: &str = "contact-message";
pub const CONTACT_CONTEXT: &str = "contact-context";
pub const CLEAR_FORM: &str = "clear-form";
pub const SEND_BUTTON: &str = ".send-btn";
pub const SEND_LABEL: &str = ".send-btn .btn-text";
pub const FIELD: &str = ".field";
pub const FIELD_INPUTS: &str = "input, textarea";

pub const COPY_EMAIL: &str = ".copy-email";

pub const MODAL: &str = "project-modal";
pub const MODAL_TITLE: &str = "modal-title";
pub const MODAL_BODY: &str = "modal-body";
pub const MODAL_CLOSE: &str = ".modal-close";
pub const MODAL_BACKDROP: &str = ".modal-backdrop";
pub const PROJECT_LINK: &str = ".project-link";
pub const PROJECT_CARD: &str = ".card";
pub const PROJECT_CARD_HEADING: &str = "h3";
pub const PROJECT_CARD_DESCRIPTION: &str = "p";

/// Class lists that mark a reveal target as a skills container.
pub const SKILLS_GROUP_CLASSES: [&str; 2] = ["skills", "skills-grid"];

/// Classify a reveal target by its classes.
///
/// A `.skill-card` counts as a card even when it also carries a plain reveal
/// class, so it gets its progress run.
pub fn watch_kind(has_class: impl Fn(&str) -> bool) -> WatchKind {
    if has_class("skill") {
        WatchKind::LinearSkill
    } else if has_class("skill-card") {
        WatchKind::CircularSkillCard
    } else if SKILLS_GROUP_CLASSES.iter().any(|class| has_class(class)) {
        WatchKind::SkillsGroup
    } else {
        WatchKind::Generic
    }
}
