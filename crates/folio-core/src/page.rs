#![forbid(unsafe_code)]

//! Page aggregate.
//!
//! [`Page`] owns every widget state machine and translates host input into
//! [`Effect`]s for the host to apply to the document.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes events (clicks,
//!   scrolls, intersection entries) and reads back effects.
//! - **Deterministic time**: the host advances a monotonic clock explicitly
//!   with [`Page::tick`]; no widget reads a wall clock.
//! - **No blocking**: the one suspension point, the email send, is split into
//!   [`Page::submit`] and [`Page::finish_submit`].
//!
//! Widgets do not share mutable state. The only cross-widget link is the
//! reveal observer starting progress runs for circular skill cards.

use std::time::Duration;

use crate::carousel::{ActiveChange, Carousel};
use crate::clipboard::{ClipboardError, copy_notice};
use crate::clock::DeterministicClock;
use crate::config::PageConfig;
use crate::contact::{
    ContactFields, ContactForm, DeliveryError, EmailPayload, LABEL_IDLE, SubmitOutcome,
};
use crate::element::{ElementId, Target};
use crate::fields::FieldTracker;
use crate::logging::{debug, info};
use crate::modal::{ModalClosed, ModalContent, ModalController};
use crate::nav::{NavController, Section};
use crate::progress::ProgressAnimator;
use crate::reveal::{IntersectionEntry, RevealAction, RevealObserver, WatchKind};
use crate::theme::{Theme, ThemeController, ThemeStore};
use crate::toast::{Notice, ToastSlot};
use crate::typing::TypingSequencer;

/// Notice shown after the form is cleared by hand.
pub const NOTICE_FORM_CLEARED: &str = "Form cleared";

/// A document mutation the host must apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AddClass {
        target: Target,
        class: &'static str,
    },
    RemoveClass {
        target: Target,
        class: &'static str,
    },
    SetAttribute {
        target: Target,
        name: &'static str,
        value: String,
    },
    RemoveAttribute {
        target: Target,
        name: &'static str,
    },
    SetText {
        target: Target,
        text: String,
    },
    /// Replace the children of `target` with a markup fragment.
    SetHtml {
        target: Target,
        html: String,
    },
    SetDisabled {
        target: Target,
        disabled: bool,
    },
    Focus(Target),
    /// Smooth-scroll an element to the top of the viewport.
    ScrollIntoView(ElementId),
    /// Start watching an element for intersection.
    Observe(ElementId),
    /// Stop watching an element for intersection.
    Unobserve(ElementId),
    /// Append `.bar-wrap > .bar` and a `.percent` label to a `.skill`.
    BuildSkillBar {
        skill: ElementId,
        percent: u8,
    },
    /// Set the width of a `.skill`'s `.bar`.
    SkillBarWidth {
        skill: ElementId,
        percent: u8,
    },
    /// Render one progress frame on a `.skill-card`: `.pct` label and
    /// `.circle` background.
    CardProgress {
        card: ElementId,
        label: String,
        background: String,
    },
    /// Reset the contact form's inputs.
    ResetForm,
    /// Blocking alert (no toast surface on the page).
    Alert(String),
}

/// Everything a [`Page`] hands back to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOutputs {
    /// Document mutations, oldest first.
    pub effects: Vec<Effect>,
    /// Email accepted by the form and waiting to be delivered. The host
    /// reports the outcome with [`PageEvent::Delivered`].
    pub outgoing: Option<EmailPayload>,
}

/// Host input, for hosts that queue events before applying them.
///
/// `G` is the Escape listener guard handed over when the modal opens.
#[derive(Debug)]
pub enum PageEvent<G> {
    ToggleNav,
    Scroll(f64),
    Sections(Vec<Section>),
    Anchor(ElementId),
    Intersect(IntersectionEntry),
    Detach(ElementId),
    CarouselHover {
        kind: CarouselKind,
        entered: bool,
    },
    CarouselActivate {
        kind: CarouselKind,
        index: usize,
    },
    FieldInput {
        field: ElementId,
        value: String,
    },
    ClearForm,
    Submit(ContactFields),
    Delivered(Result<(), DeliveryError>),
    Copied {
        email: String,
        result: Result<(), ClipboardError>,
    },
    ToggleTheme,
    OpenModal {
        content: ModalContent,
        restore_focus: Option<ElementId>,
        escape_guard: G,
    },
    CloseModal,
    Key(String),
}

/// The two carousel instances on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarouselKind {
    Highlights,
    SkillMinis,
}

/// Everything the host found in the document at load time.
///
/// Raw attribute strings are passed through untouched; parsing them is the
/// page's job.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    /// Whether `#toast` exists.
    pub has_toast: bool,
    /// Whether `#typed` exists.
    pub has_typed: bool,
    /// Elements observed from the start (`.reveal`, `.card`, `.skill`,
    /// `.skills-grid`).
    pub watched: Vec<(ElementId, WatchKind)>,
    /// Every `.skill` with its raw `data-percent`.
    pub skills: Vec<(ElementId, Option<String>)>,
    /// `.skill` descendants of each watched element.
    pub skill_children: Vec<(ElementId, Vec<ElementId>)>,
    /// Every `.skill-card` with its raw `data-percent`.
    pub skill_cards: Vec<(ElementId, Option<String>)>,
    /// Highlight carousel items, in order.
    pub highlights: Vec<ElementId>,
    /// Skill mini carousel items, in order.
    pub skill_minis: Vec<ElementId>,
    /// `.field` wrappers with their input's initial value.
    pub fields: Vec<(ElementId, String)>,
    /// Sections tracked by the nav scroll-spy.
    pub sections: Vec<Section>,
}

/// Page state: every widget plus the pending effects.
///
/// `G` is the guard type that keeps the modal's Escape listener attached.
pub struct Page<G> {
    config: PageConfig,
    clock: DeterministicClock,
    layout: PageLayout,
    reveal: RevealObserver,
    progress: ProgressAnimator,
    highlights: Carousel,
    skill_minis: Carousel,
    typing: TypingSequencer,
    contact: ContactForm,
    modal: ModalController<G>,
    theme: ThemeController,
    toast: ToastSlot,
    nav: NavController,
    fields: FieldTracker,
    outputs: PageOutputs,
    started: bool,
}

impl<G> Page<G> {
    /// Build the page from its configuration, scanned layout, and theme store.
    ///
    /// The persisted theme is read here; nothing is emitted until
    /// [`Page::start`].
    pub fn new(config: PageConfig, layout: PageLayout, store: Box<dyn ThemeStore>) -> Self {
        let mut reveal = RevealObserver::new(config.reveal);
        for (skill, raw) in &layout.skills {
            reveal.define_skill(*skill, config.parse_percent(raw.as_deref()));
        }
        for (container, children) in &layout.skill_children {
            reveal.attach_children(*container, children.clone());
        }
        reveal.defer_cards(
            layout
                .skill_cards
                .iter()
                .map(|(card, raw)| (*card, parse_card_percent(raw.as_deref()))),
        );

        let typing = if layout.has_typed {
            TypingSequencer::new(config.typing.clone())
        } else {
            TypingSequencer::new(crate::typing::TypingConfig {
                phrases: Vec::new(),
                ..config.typing.clone()
            })
        };

        let mut nav = NavController::new(config.nav);
        nav.set_sections(layout.sections.clone());

        Self {
            progress: ProgressAnimator::new(config.progress.clone()),
            highlights: Carousel::new(config.highlights, layout.highlights.len()),
            skill_minis: Carousel::new(config.skill_minis, layout.skill_minis.len()),
            typing,
            contact: ContactForm::new(config.contact.clone()),
            modal: ModalController::new(),
            theme: ThemeController::load(store),
            toast: ToastSlot::new(layout.has_toast),
            nav,
            fields: FieldTracker::new(),
            clock: DeterministicClock::new(),
            outputs: PageOutputs::default(),
            started: false,
            reveal,
            layout,
            config,
        }
    }

    /// Wire everything up: apply the persisted theme, build skill bars,
    /// start observing, render and start carousels, start typing, and sync
    /// field markers. Calling it again does nothing.
    pub fn start(&mut self, now: Duration) {
        if self.started {
            return;
        }
        self.started = true;
        self.clock.set(now);
        let now = self.clock.now();
        info!("page started");

        self.apply_theme(self.theme.current());

        for (skill, raw) in &self.layout.skills {
            let percent = self.config.parse_percent(raw.as_deref());
            self.outputs.effects.push(Effect::BuildSkillBar {
                skill: *skill,
                percent,
            });
        }

        for (element, kind) in self.layout.watched.clone() {
            if self.reveal.register(element, kind, 0) {
                self.outputs.effects.push(Effect::Observe(element));
            }
        }

        for kind in [CarouselKind::Highlights, CarouselKind::SkillMinis] {
            let (carousel, items) = self.carousel(kind);
            let active = carousel.active();
            let render: Vec<Effect> = items
                .iter()
                .enumerate()
                .map(|(i, &item)| {
                    if Some(i) == active {
                        add_class(item, "active")
                    } else {
                        remove_class(item, "active")
                    }
                })
                .collect();
            self.outputs.effects.extend(render);
            self.carousel_mut(kind).start(now);
        }

        if let Some(text) = self.typing.start(now) {
            self.outputs.effects.push(Effect::SetText {
                target: Target::Typed,
                text: text.to_owned(),
            });
        }

        for (field, value) in self.layout.fields.clone() {
            if let Some(filled) = self.fields.update(field, &value) {
                self.outputs.effects.push(filled_effect(field, filled));
            }
        }
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Current page time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Move the page clock without firing deadlines (event timestamps).
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Advance to `now` and fire everything that is due: progress frames,
    /// carousel rotations, typing steps, the form reset, and toast expiry.
    pub fn tick(&mut self, now: Duration) {
        self.clock.set(now);
        let now = self.clock.now();

        for frame in self.progress.frame(now) {
            self.outputs.effects.push(Effect::CardProgress {
                card: frame.element,
                label: frame.label(),
                background: frame.conic_gradient(self.progress.config()),
            });
        }

        for kind in [CarouselKind::Highlights, CarouselKind::SkillMinis] {
            if let Some(change) = self.carousel_mut(kind).tick(now) {
                self.render_carousel(kind, change);
            }
        }

        if let Some(text) = self.typing.tick(now) {
            self.outputs.effects.push(Effect::SetText {
                target: Target::Typed,
                text: text.to_owned(),
            });
        }

        let was_sent = self.contact.label() != LABEL_IDLE;
        if self.contact.tick(now) && was_sent {
            self.outputs.effects.push(remove_class(Target::SendButton, "sent"));
            self.outputs.effects.push(Effect::SetText {
                target: Target::SendLabel,
                text: LABEL_IDLE.to_owned(),
            });
            self.outputs.effects.push(Effect::SetDisabled {
                target: Target::SendButton,
                disabled: false,
            });
        }

        if self.toast.tick(now) {
            self.outputs.effects.push(remove_class(Target::Toast, "show"));
        }
    }

    /// Whether some animation wants a frame on the next display refresh.
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        self.progress.is_active()
    }

    /// Earliest pending timer across all widgets.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.highlights.next_deadline(),
            self.skill_minis.next_deadline(),
            self.typing.next_deadline(),
            self.contact.next_deadline(),
            self.toast.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // ------------------------------------------------------------------
    // Effects
    // ------------------------------------------------------------------

    /// Pending outputs.
    #[must_use]
    pub const fn outputs(&self) -> &PageOutputs {
        &self.outputs
    }

    /// Take pending outputs, leaving empty defaults.
    pub fn take_outputs(&mut self) -> PageOutputs {
        std::mem::take(&mut self.outputs)
    }

    /// Pending effects, oldest first.
    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.outputs.effects
    }

    /// Drain pending effects, leaving any outgoing email in place.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.outputs.effects)
    }

    /// Apply one host event.
    pub fn handle(&mut self, event: PageEvent<G>) {
        match event {
            PageEvent::ToggleNav => self.toggle_nav(),
            PageEvent::Scroll(y) => self.scroll(y),
            PageEvent::Sections(sections) => self.set_sections(sections),
            PageEvent::Anchor(target) => self.anchor_clicked(target),
            PageEvent::Intersect(entry) => self.intersect(entry),
            PageEvent::Detach(element) => self.detach(element),
            PageEvent::CarouselHover { kind, entered } => self.carousel_hover(kind, entered),
            PageEvent::CarouselActivate { kind, index } => self.carousel_activate(kind, index),
            PageEvent::FieldInput { field, value } => self.field_input(field, &value),
            PageEvent::ClearForm => self.clear_form(),
            PageEvent::Submit(fields) => {
                if let Some(payload) = self.submit(&fields) {
                    self.outputs.outgoing = Some(payload);
                }
            }
            PageEvent::Delivered(result) => self.finish_submit(result),
            PageEvent::Copied { email, result } => self.copied(&email, result),
            PageEvent::ToggleTheme => {
                self.toggle_theme();
            }
            PageEvent::OpenModal {
                content,
                restore_focus,
                escape_guard,
            } => self.open_modal(content, restore_focus, escape_guard),
            PageEvent::CloseModal => self.close_modal(),
            PageEvent::Key(key) => self.key(&key),
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Mobile menu button clicked.
    pub fn toggle_nav(&mut self) {
        let open = self.nav.toggle_menu();
        self.render_menu(open);
    }

    /// Window scrolled to `scroll_y`.
    pub fn scroll(&mut self, scroll_y: f64) {
        let update = self.nav.scroll_to(scroll_y);
        match update.scrolled {
            Some(true) => self.outputs.effects.push(add_class(Target::Header, "scrolled")),
            Some(false) => self.outputs.effects.push(remove_class(Target::Header, "scrolled")),
            None => {}
        }
        if let Some(link) = update.deactivated {
            self.outputs.effects.push(remove_class(link, "active"));
        }
        if let Some(link) = update.activated {
            self.outputs.effects.push(add_class(link, "active"));
        }
    }

    /// Section offsets changed (resize, late images).
    pub fn set_sections(&mut self, sections: Vec<Section>) {
        self.nav.set_sections(sections);
    }

    /// An in-page anchor with a resolvable target was clicked.
    pub fn anchor_clicked(&mut self, target: ElementId) {
        self.outputs.effects.push(Effect::ScrollIntoView(target));
        if self.nav.close_menu() {
            self.render_menu(false);
        }
    }

    // ------------------------------------------------------------------
    // Reveal and progress
    // ------------------------------------------------------------------

    /// Intersection entry from the host observer.
    pub fn intersect(&mut self, entry: IntersectionEntry) {
        let now = self.clock.now();
        for action in self.reveal.report(entry) {
            match action {
                RevealAction::MarkVisible(element) => {
                    self.outputs.effects.push(add_class(element, "visible"));
                }
                RevealAction::SetBarWidth { skill, percent } => {
                    self.outputs.effects.push(Effect::SkillBarWidth { skill, percent });
                }
                RevealAction::Observe(element) => self.outputs.effects.push(Effect::Observe(element)),
                RevealAction::Unobserve(element) => self.outputs.effects.push(Effect::Unobserve(element)),
                RevealAction::AnimateCard { card, percent } => {
                    self.progress.animate(card, percent, now);
                }
            }
        }
    }

    /// An element left the document: stop watching and animating it.
    pub fn detach(&mut self, element: ElementId) {
        if self.reveal.forget(element) {
            self.outputs.effects.push(Effect::Unobserve(element));
        }
        self.progress.cancel(element);
    }

    // ------------------------------------------------------------------
    // Carousels
    // ------------------------------------------------------------------

    /// Pointer entered (`true`) or left (`false`) a carousel.
    pub fn carousel_hover(&mut self, kind: CarouselKind, entered: bool) {
        let now = self.clock.now();
        let carousel = self.carousel_mut(kind);
        if entered {
            carousel.hover_enter();
        } else {
            carousel.hover_leave(now);
        }
    }

    /// Item `index` clicked or activated with Enter/Space.
    pub fn carousel_activate(&mut self, kind: CarouselKind, index: usize) {
        let now = self.clock.now();
        if let Some(change) = self.carousel_mut(kind).activate(index, now) {
            self.render_carousel(kind, change);
        }
    }

    /// Active index of a carousel.
    #[must_use]
    pub fn carousel_active(&self, kind: CarouselKind) -> Option<usize> {
        self.carousel(kind).0.active()
    }

    // ------------------------------------------------------------------
    // Contact form
    // ------------------------------------------------------------------

    /// Form submitted. Returns the payload to deliver when the submission
    /// was accepted; the host must report back with
    /// [`Page::finish_submit`].
    pub fn submit(&mut self, fields: &ContactFields) -> Option<EmailPayload> {
        match self.contact.submit(fields) {
            Ok(payload) => {
                self.outputs.effects.push(add_class(Target::SendButton, "sending"));
                self.outputs.effects.push(Effect::SetDisabled {
                    target: Target::SendButton,
                    disabled: true,
                });
                Some(payload)
            }
            Err(err) => {
                debug!(error = %err, "submission rejected");
                if let Some(notice) = err.notice() {
                    self.notify(notice);
                }
                None
            }
        }
    }

    /// Outcome of the delivery started by [`Page::submit`].
    pub fn finish_submit(&mut self, result: Result<(), DeliveryError>) {
        let now = self.clock.now();
        let Some(outcome) = self.contact.finish(result, now) else {
            return;
        };
        self.outputs.effects.push(remove_class(Target::SendButton, "sending"));
        match outcome {
            SubmitOutcome::Sent => {
                self.outputs.effects.push(add_class(Target::SendButton, "sent"));
                self.outputs.effects.push(Effect::SetText {
                    target: Target::SendLabel,
                    text: self.contact.label().to_owned(),
                });
                self.notify(outcome.notice());
                self.reset_form();
            }
            SubmitOutcome::Failed(_) => {
                self.outputs.effects.push(Effect::SetDisabled {
                    target: Target::SendButton,
                    disabled: false,
                });
                self.notify(outcome.notice());
            }
        }
    }

    /// "Clear form" clicked.
    pub fn clear_form(&mut self) {
        self.reset_form();
        self.notify(NOTICE_FORM_CLEARED);
    }

    /// A field's input changed or lost focus.
    pub fn field_input(&mut self, field: ElementId, value: &str) {
        if let Some(filled) = self.fields.update(field, value) {
            self.outputs.effects.push(filled_effect(field, filled));
        }
    }

    /// Contact form state, for diagnostics and tests.
    #[must_use]
    pub fn contact(&self) -> &ContactForm {
        &self.contact
    }

    // ------------------------------------------------------------------
    // Clipboard, theme, notices
    // ------------------------------------------------------------------

    /// Outcome of a copy-email attempt.
    pub fn copied(&mut self, email: &str, result: Result<(), ClipboardError>) {
        let notice = copy_notice(email, &result);
        self.notify(notice);
    }

    /// Theme toggle clicked.
    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.theme.toggle();
        self.apply_theme(next);
        next
    }

    /// Current theme.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    /// Show a notice for the configured duration.
    pub fn notify(&mut self, message: impl Into<String>) {
        let now = self.clock.now();
        match self.toast.show(message, self.config.toast_duration, now) {
            Notice::Toast(message) => {
                self.outputs.effects.push(Effect::SetText {
                    target: Target::Toast,
                    text: message,
                });
                self.outputs.effects.push(add_class(Target::Toast, "show"));
            }
            Notice::Alert(message) => self.outputs.effects.push(Effect::Alert(message)),
        }
    }

    // ------------------------------------------------------------------
    // Modal
    // ------------------------------------------------------------------

    /// Open the project modal, taking ownership of the Escape listener guard.
    pub fn open_modal(
        &mut self,
        content: ModalContent,
        restore_focus: Option<ElementId>,
        escape_guard: G,
    ) {
        let title = content.title.clone();
        let body = content.body.clone();
        let opened = self.modal.open(content, restore_focus, escape_guard);
        self.outputs.effects.push(Effect::SetText {
            target: Target::ModalTitle,
            text: title,
        });
        self.outputs.effects.push(Effect::SetHtml {
            target: Target::ModalBody,
            html: body,
        });
        if opened {
            self.outputs.effects.push(add_class(Target::Modal, "open"));
            self.outputs.effects.push(Effect::SetAttribute {
                target: Target::Modal,
                name: "aria-hidden",
                value: "false".to_owned(),
            });
            self.outputs.effects.push(add_class(Target::Body, "modal-open"));
            self.outputs.effects.push(Effect::Focus(Target::ModalClose));
        }
    }

    /// Close button or backdrop clicked.
    pub fn close_modal(&mut self) {
        if let Some(closed) = self.modal.close() {
            self.render_modal_closed(closed);
        }
    }

    /// Global key press (only Escape matters, and only while open).
    pub fn key(&mut self, key: &str) {
        if let Some(closed) = self.modal.handle_key(key) {
            self.render_modal_closed(closed);
        }
    }

    /// Whether the modal is open.
    #[must_use]
    pub fn modal_is_open(&self) -> bool {
        self.modal.is_open()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn carousel(&self, kind: CarouselKind) -> (&Carousel, &[ElementId]) {
        match kind {
            CarouselKind::Highlights => (&self.highlights, &self.layout.highlights),
            CarouselKind::SkillMinis => (&self.skill_minis, &self.layout.skill_minis),
        }
    }

    fn carousel_mut(&mut self, kind: CarouselKind) -> &mut Carousel {
        match kind {
            CarouselKind::Highlights => &mut self.highlights,
            CarouselKind::SkillMinis => &mut self.skill_minis,
        }
    }

    fn render_carousel(&mut self, kind: CarouselKind, change: ActiveChange) {
        let (_, items) = self.carousel(kind);
        let (from, to) = (items.get(change.from).copied(), items.get(change.to).copied());
        if let Some(from) = from {
            self.outputs.effects.push(remove_class(from, "active"));
        }
        if let Some(to) = to {
            self.outputs.effects.push(add_class(to, "active"));
        }
    }

    fn render_menu(&mut self, open: bool) {
        self.outputs.effects.push(if open {
            add_class(Target::MainNav, "open")
        } else {
            remove_class(Target::MainNav, "open")
        });
        self.outputs.effects.push(Effect::SetAttribute {
            target: Target::NavToggle,
            name: "aria-expanded",
            value: open.to_string(),
        });
    }

    fn render_modal_closed(&mut self, closed: ModalClosed) {
        self.outputs.effects.push(remove_class(Target::Modal, "open"));
        self.outputs.effects.push(Effect::SetAttribute {
            target: Target::Modal,
            name: "aria-hidden",
            value: "true".to_owned(),
        });
        self.outputs.effects.push(remove_class(Target::Body, "modal-open"));
        if let Some(element) = closed.restore_focus {
            self.outputs.effects.push(Effect::Focus(Target::Element(element)));
        }
    }

    fn apply_theme(&mut self, theme: Theme) {
        self.outputs.effects.push(match theme.root_attribute() {
            Some(value) => Effect::SetAttribute {
                target: Target::Root,
                name: "data-theme",
                value: value.to_owned(),
            },
            None => Effect::RemoveAttribute {
                target: Target::Root,
                name: "data-theme",
            },
        });
        self.outputs.effects.push(Effect::SetText {
            target: Target::ThemeToggle,
            text: theme.glyph().to_owned(),
        });
    }

    fn reset_form(&mut self) {
        self.outputs.effects.push(Effect::ResetForm);
        for field in self.fields.clear_all() {
            self.outputs.effects.push(filled_effect(field, false));
        }
    }
}

/// Circular cards default to 0% when `data-percent` is missing.
fn parse_card_percent(raw: Option<&str>) -> u8 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .map_or(0, |p| p.min(100) as u8)
}

fn add_class(target: impl Into<Target>, class: &'static str) -> Effect {
    Effect::AddClass {
        target: target.into(),
        class,
    }
}

fn remove_class(target: impl Into<Target>, class: &'static str) -> Effect {
    Effect::RemoveClass {
        target: target.into(),
        class,
    }
}

fn filled_effect(field: ElementId, filled: bool) -> Effect {
    if filled {
        add_class(field, "filled")
    } else {
        remove_class(field, "filled")
    }
}
