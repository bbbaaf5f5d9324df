#![forbid(unsafe_code)]

//! DOM listeners.
//!
//! Listeners never touch the page directly: they translate DOM events into
//! [`PageEvent`]s and queue them for the next frame. That keeps every page
//! mutation on the frame loop, including dropping the modal's Escape
//! listener, which would otherwise happen inside its own callback.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use folio_core::clipboard::copy_text;
use folio_core::contact::ContactFields;
use folio_core::modal::ModalContent;
use folio_core::nav::anchor_fragment;
use folio_core::{CarouselKind, PageEvent};
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, KeyboardEvent, Window};

use crate::clipboard;
use crate::dom::{Dom, NodeTable, input_value, query_all};
use crate::selectors;

/// Guard keeping the modal's Escape listener attached.
pub(crate) type Guard = EventListener;

/// Events waiting for the next frame.
pub(crate) type Queue = Rc<RefCell<VecDeque<PageEvent<Guard>>>>;

fn push(queue: &Queue, event: PageEvent<Guard>) {
    queue.borrow_mut().push_back(event);
}

/// Options for listeners that may call `preventDefault`.
fn cancelable() -> EventListenerOptions {
    EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive: false,
    }
}

/// Install every page listener. Dropping the returned listeners detaches
/// them.
pub(crate) fn install(window: &Window, dom: &Rc<Dom>, queue: &Queue) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    let document = &dom.document;

    navigation(window, dom, queue, &mut listeners);
    carousels(document, queue, &mut listeners);
    contact_form(document, queue, &mut listeners);

    for button in query_all(document, selectors::COPY_EMAIL) {
        let queue = Rc::clone(queue);
        let source = button.clone();
        listeners.push(EventListener::new(&button, "click", move |_event: &Event| {
            let email = copy_text(
                source.get_attribute("data-email").as_deref(),
                &source.text_content().unwrap_or_default(),
            );
            let queue = Rc::clone(&queue);
            spawn_local(async move {
                let result = clipboard::write_text(&email).await;
                push(&queue, PageEvent::Copied { email, result });
            });
        }));
    }

    if let Some(toggle) = document.get_element_by_id(selectors::THEME_TOGGLE) {
        let queue = Rc::clone(queue);
        listeners.push(EventListener::new(&toggle, "click", move |_event: &Event| {
            push(&queue, PageEvent::ToggleTheme);
        }));
    }

    modal(dom, queue, &mut listeners);
    listeners
}

fn navigation(window: &Window, dom: &Rc<Dom>, queue: &Queue, listeners: &mut Vec<EventListener>) {
    let document = &dom.document;

    if let Ok(Some(toggle)) = document.query_selector(selectors::NAV_TOGGLE) {
        let queue = Rc::clone(queue);
        listeners.push(EventListener::new(&toggle, "click", move |_event: &Event| {
            push(&queue, PageEvent::ToggleNav);
        }));
    }

    {
        let queue = Rc::clone(queue);
        let scroller = window.clone();
        listeners.push(EventListener::new(window, "scroll", move |_event: &Event| {
            let y = scroller.scroll_y().unwrap_or(0.0);
            push(&queue, PageEvent::Scroll(y));
        }));
    }

    for event in ["resize", "load"] {
        let queue = Rc::clone(queue);
        let dom = Rc::clone(dom);
        listeners.push(EventListener::new(window, event, move |_event: &Event| {
            push(&queue, PageEvent::Sections(dom.sections()));
        }));
    }

    for anchor in query_all(document, selectors::ANCHORS) {
        let queue = Rc::clone(queue);
        let dom = Rc::clone(dom);
        let source = anchor.clone();
        listeners.push(EventListener::new_with_options(
            &anchor,
            "click",
            cancelable(),
            move |event: &Event| {
                let Some(href) = source.get_attribute("href") else {
                    return;
                };
                let Some(fragment) = anchor_fragment(&href) else {
                    return;
                };
                let Some(target) = dom.document.get_element_by_id(fragment) else {
                    return;
                };
                event.prevent_default();
                let id = dom.nodes.borrow_mut().register(&target);
                push(&queue, PageEvent::Anchor(id));
            },
        ));
    }
}

fn carousels(document: &Document, queue: &Queue, listeners: &mut Vec<EventListener>) {
    for (kind, container, item) in [
        (
            CarouselKind::Highlights,
            selectors::HIGHLIGHTS,
            selectors::HIGHLIGHT_ITEM,
        ),
        (
            CarouselKind::SkillMinis,
            selectors::SKILL_MINIS,
            selectors::SKILL_MINI_ITEM,
        ),
    ] {
        let Ok(Some(container)) = document.query_selector(container) else {
            continue;
        };
        for (event, entered) in [("mouseenter", true), ("mouseleave", false)] {
            let queue = Rc::clone(queue);
            listeners.push(EventListener::new(&container, event, move |_event: &Event| {
                push(&queue, PageEvent::CarouselHover { kind, entered });
            }));
        }

        let items = container
            .query_selector_all(item)
            .map(|list| crate::dom::elements(&list))
            .unwrap_or_default();
        for (index, item) in items.iter().enumerate() {
            let click_queue = Rc::clone(queue);
            listeners.push(EventListener::new(item, "click", move |_event: &Event| {
                push(&click_queue, PageEvent::CarouselActivate { kind, index });
            }));

            let key_queue = Rc::clone(queue);
            listeners.push(EventListener::new_with_options(
                item,
                "keydown",
                cancelable(),
                move |event: &Event| {
                    let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                        return;
                    };
                    if key == "Enter" || key == " " {
                        event.prevent_default();
                        push(&key_queue, PageEvent::CarouselActivate { kind, index });
                    }
                },
            ));
        }
    }
}

fn contact_form(document: &Document, queue: &Queue, listeners: &mut Vec<EventListener>) {
    for field in query_all(document, selectors::FIELD) {
        let Some(id) = NodeTable::id_of(&field) else {
            continue;
        };
        let Ok(Some(input)) = field.query_selector(selectors::FIELD_INPUTS) else {
            continue;
        };
        for event in ["input", "blur"] {
            let queue = Rc::clone(queue);
            let source = input.clone();
            listeners.push(EventListener::new(&input, event, move |_event: &Event| {
                push(
                    &queue,
                    PageEvent::FieldInput {
                        field: id,
                        value: input_value(&source),
                    },
                );
            }));
        }
    }

    if let Some(clear) = document.get_element_by_id(selectors::CLEAR_FORM) {
        let queue = Rc::clone(queue);
        listeners.push(EventListener::new(&clear, "click", move |_event: &Event| {
            push(&queue, PageEvent::ClearForm);
        }));
    }

    if let Some(form) = document.get_element_by_id(selectors::CONTACT_FORM) {
        let queue = Rc::clone(queue);
        let document = document.clone();
        listeners.push(EventListener::new_with_options(
            &form,
            "submit",
            cancelable(),
            move |event: &Event| {
                event.prevent_default();
                let value = |id: &str| {
                    document
                        .get_element_by_id(id)
                        .map(|el| input_value(&el))
                        .unwrap_or_default()
                };
                push(
                    &queue,
                    PageEvent::Submit(ContactFields {
                        name: value(selectors::CONTACT_NAME),
                        email: value(selectors::CONTACT_EMAIL),
                        message: value(selectors::CONTACT_MESSAGE),
                        context: value(selectors::CONTACT_CONTEXT),
                    }),
                );
            },
        ));
    }
}

fn modal(dom: &Rc<Dom>, queue: &Queue, listeners: &mut Vec<EventListener>) {
    let document = &dom.document;
    if document.get_element_by_id(selectors::MODAL).is_none() {
        return;
    }

    for link in query_all(document, selectors::PROJECT_LINK) {
        let queue = Rc::clone(queue);
        let dom = Rc::clone(dom);
        let source = link.clone();
        listeners.push(EventListener::new_with_options(
            &link,
            "click",
            cancelable(),
            move |event: &Event| {
                event.prevent_default();
                let content = modal_content(&source);
                let restore_focus = Some(dom.nodes.borrow_mut().register(&source));
                let key_queue = Rc::clone(&queue);
                let escape_guard =
                    EventListener::new(&dom.document, "keydown", move |event: &Event| {
                        if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                            push(&key_queue, PageEvent::Key(event.key()));
                        }
                    });
                push(
                    &queue,
                    PageEvent::OpenModal {
                        content,
                        restore_focus,
                        escape_guard,
                    },
                );
            },
        ));
    }

    let closers = query_all(document, selectors::MODAL_CLOSE)
        .into_iter()
        .chain(query_all(document, selectors::MODAL_BACKDROP));
    for closer in closers {
        let queue = Rc::clone(queue);
        listeners.push(EventListener::new(&closer, "click", move |_event: &Event| {
            push(&queue, PageEvent::CloseModal);
        }));
    }
}

/// Modal content for a project link: its own data attributes, else the
/// enclosing card's heading and description.
fn modal_content(link: &Element) -> ModalContent {
    let card = link.closest(selectors::PROJECT_CARD).ok().flatten();
    let card_part = |selector: &str| {
        card.as_ref()
            .and_then(|c| c.query_selector(selector).ok().flatten())
    };
    let heading = card_part(selectors::PROJECT_CARD_HEADING).and_then(|h| h.text_content());
    let description = card_part(selectors::PROJECT_CARD_DESCRIPTION).map(|p| p.inner_html());
    ModalContent::from_trigger(
        link.get_attribute("data-title").as_deref(),
        link.get_attribute("data-body").as_deref(),
        heading.as_deref(),
        description.as_deref(),
    )
}
