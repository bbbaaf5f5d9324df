#![forbid(unsafe_code)]

//! Document binding: node handles, page fixtures, layout scan, and effect
//! application.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::element::{ElementId, Target};
use folio_core::nav::Section;
use folio_core::{Effect, PageLayout};
use tracing::{debug, trace};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, NodeList, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition,
};

use crate::selectors;

/// Attribute carrying the handle of a registered node.
pub(crate) const ID_ATTRIBUTE: &str = "data-folio-id";

/// Side-table from [`ElementId`] to the real node.
///
/// Registered nodes are stamped with [`ID_ATTRIBUTE`] so event targets map
/// back to their handle without a search.
#[derive(Debug, Default)]
pub(crate) struct NodeTable {
    nodes: Vec<Element>,
}

impl NodeTable {
    /// Handle for `element`, registering it on first sight.
    pub(crate) fn register(&mut self, element: &Element) -> ElementId {
        if let Some(id) = Self::id_of(element)
            && self.get(id).is_some_and(|known| known == element)
        {
            return id;
        }
        let id = ElementId::new(self.nodes.len() as u32);
        self.nodes.push(element.clone());
        if let Err(e) = element.set_attribute(ID_ATTRIBUTE, &id.get().to_string()) {
            debug!(%id, error = ?e, "node id stamp failed");
        }
        id
    }

    /// Handle stamped on `element`, if any.
    pub(crate) fn id_of(element: &Element) -> Option<ElementId> {
        element
            .get_attribute(ID_ATTRIBUTE)
            .and_then(|raw| raw.parse().ok())
            .map(ElementId::new)
    }

    pub(crate) fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id.get() as usize)
    }
}

/// Singleton nodes, each optional.
#[derive(Debug, Default)]
pub(crate) struct Fixtures {
    root: Option<Element>,
    body: Option<Element>,
    header: Option<Element>,
    main_nav: Option<Element>,
    nav_toggle: Option<Element>,
    typed: Option<Element>,
    toast: Option<Element>,
    send_button: Option<Element>,
    send_label: Option<Element>,
    theme_toggle: Option<Element>,
    modal: Option<Element>,
    modal_title: Option<Element>,
    modal_body: Option<Element>,
    modal_close: Option<Element>,
    form: Option<HtmlFormElement>,
}

impl Fixtures {
    fn find(document: &Document) -> Self {
        let by_id = |id: &str| document.get_element_by_id(id);
        let query = |selector: &str| document.query_selector(selector).ok().flatten();
        Self {
            root: document.document_element(),
            body: document.body().map(Element::from),
            header: query(selectors::SITE_HEADER),
            main_nav: query(selectors::MAIN_NAV),
            nav_toggle: query(selectors::NAV_TOGGLE),
            typed: by_id(selectors::TYPED),
            toast: by_id(selectors::TOAST),
            send_button: query(selectors::SEND_BUTTON),
            send_label: query(selectors::SEND_LABEL),
            theme_toggle: by_id(selectors::THEME_TOGGLE),
            modal: by_id(selectors::MODAL),
            modal_title: by_id(selectors::MODAL_TITLE),
            modal_body: by_id(selectors::MODAL_BODY),
            modal_close: query(selectors::MODAL_CLOSE),
            form: by_id(selectors::CONTACT_FORM).and_then(|f| f.dyn_into().ok()),
        }
    }

    fn get(&self, target: Target) -> Option<&Element> {
        match target {
            Target::Root => self.root.as_ref(),
            Target::Body => self.body.as_ref(),
            Target::Header => self.header.as_ref(),
            Target::MainNav => self.main_nav.as_ref(),
            Target::NavToggle => self.nav_toggle.as_ref(),
            Target::Typed => self.typed.as_ref(),
            Target::Toast => self.toast.as_ref(),
            Target::SendButton => self.send_button.as_ref(),
            Target::SendLabel => self.send_label.as_ref(),
            Target::ThemeToggle => self.theme_toggle.as_ref(),
            Target::Modal => self.modal.as_ref(),
            Target::ModalTitle => self.modal_title.as_ref(),
            Target::ModalBody => self.modal_body.as_ref(),
            Target::ModalClose => self.modal_close.as_ref(),
            Target::Element(_) => None,
        }
    }
}

/// The bound document.
pub(crate) struct Dom {
    pub(crate) document: Document,
    pub(crate) nodes: Rc<RefCell<NodeTable>>,
    fixtures: Fixtures,
}

impl Dom {
    pub(crate) fn bind(document: Document) -> Self {
        let fixtures = Fixtures::find(&document);
        Self {
            document,
            nodes: Rc::new(RefCell::new(NodeTable::default())),
            fixtures,
        }
    }

    /// Node behind a handle.
    pub(crate) fn node(&self, id: ElementId) -> Option<Element> {
        self.nodes.borrow().get(id).cloned()
    }

    fn resolve(&self, target: Target) -> Option<Element> {
        match target {
            Target::Element(id) => self.node(id),
            fixture => self.fixtures.get(fixture).cloned(),
        }
    }

    pub(crate) fn form(&self) -> Option<&HtmlFormElement> {
        self.fixtures.form.as_ref()
    }

    /// Scan the document into a page layout, registering every node the page
    /// will refer to.
    pub(crate) fn scan(&self) -> PageLayout {
        let mut nodes = self.nodes.borrow_mut();
        let mut layout = PageLayout {
            has_toast: self.fixtures.toast.is_some(),
            has_typed: self.fixtures.typed.is_some(),
            ..PageLayout::default()
        };

        for skill in query_all(&self.document, selectors::SKILL) {
            let id = nodes.register(&skill);
            layout.skills.push((id, skill.get_attribute("data-percent")));
        }

        for element in query_all(&self.document, selectors::REVEAL) {
            let id = nodes.register(&element);
            let classes = element.class_list();
            let kind = selectors::watch_kind(|class| classes.contains(class));
            layout.watched.push((id, kind));
            let children: Vec<ElementId> = element
                .query_selector_all(selectors::SKILL)
                .map(|list| elements(&list))
                .unwrap_or_default()
                .iter()
                .map(|skill| nodes.register(skill))
                .collect();
            if !children.is_empty() {
                layout.skill_children.push((id, children));
            }
        }

        for card in query_all(&self.document, selectors::SKILL_CARD) {
            let id = nodes.register(&card);
            layout.skill_cards.push((id, card.get_attribute("data-percent")));
        }

        layout.highlights = carousel_items(
            &self.document,
            &mut nodes,
            selectors::HIGHLIGHTS,
            selectors::HIGHLIGHT_ITEM,
        );
        layout.skill_minis = carousel_items(
            &self.document,
            &mut nodes,
            selectors::SKILL_MINIS,
            selectors::SKILL_MINI_ITEM,
        );

        for field in query_all(&self.document, selectors::FIELD) {
            let value = field
                .query_selector(selectors::FIELD_INPUTS)
                .ok()
                .flatten()
                .map(|input| input_value(&input))
                .unwrap_or_default();
            layout.fields.push((nodes.register(&field), value));
        }

        drop(nodes);
        layout.sections = self.sections();
        debug!(
            watched = layout.watched.len(),
            skills = layout.skills.len(),
            cards = layout.skill_cards.len(),
            sections = layout.sections.len(),
            "document scanned"
        );
        layout
    }

    /// Nav links with a resolvable section, at their current document offset.
    pub(crate) fn sections(&self) -> Vec<Section> {
        let scroll_y = self
            .document
            .default_view()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or(0.0);
        let mut nodes = self.nodes.borrow_mut();
        query_all(&self.document, selectors::NAV_LINKS)
            .into_iter()
            .filter_map(|link| {
                let href = link.get_attribute("href")?;
                let fragment = folio_core::nav::anchor_fragment(&href)?;
                let section = self.document.get_element_by_id(fragment)?;
                Some(Section {
                    link: nodes.register(&link),
                    top: section.get_bounding_client_rect().top() + scroll_y,
                })
            })
            .collect()
    }

    /// Apply a document effect. Effects aimed at missing nodes are skipped.
    ///
    /// Observer, alert, and form-reset effects belong to the runtime and are
    /// ignored here.
    pub(crate) fn apply(&self, effect: Effect) {
        let result = match effect {
            Effect::AddClass { target, class } => self
                .with(target, |el| el.class_list().add_1(class)),
            Effect::RemoveClass { target, class } => self
                .with(target, |el| el.class_list().remove_1(class)),
            Effect::SetAttribute {
                target,
                name,
                value,
            } => self.with(target, |el| el.set_attribute(name, &value)),
            Effect::RemoveAttribute { target, name } => {
                self.with(target, |el| el.remove_attribute(name))
            }
            Effect::SetText { target, text } => self.with(target, |el| {
                el.set_text_content(Some(&text));
                Ok(())
            }),
            Effect::SetHtml { target, html } => self.with(target, |el| {
                el.set_inner_html(&html);
                Ok(())
            }),
            Effect::SetDisabled { target, disabled } => self.with(target, |el| {
                if disabled {
                    el.set_attribute("disabled", "")
                } else {
                    el.remove_attribute("disabled")
                }
            }),
            Effect::Focus(target) => self.with(target, |el| match el.dyn_ref::<HtmlElement>() {
                Some(el) => el.focus(),
                None => Ok(()),
            }),
            Effect::ScrollIntoView(id) => self.with(Target::Element(id), |el| {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                options.set_block(ScrollLogicalPosition::Start);
                el.scroll_into_view_with_scroll_into_view_options(&options);
                Ok(())
            }),
            Effect::BuildSkillBar { skill, percent } => {
                self.with(Target::Element(skill), |el| self.build_skill_bar(el, percent))
            }
            Effect::SkillBarWidth { skill, percent } => {
                self.with(Target::Element(skill), |el| {
                    set_style(el, selectors::BAR, "width", &format!("{percent}%"))
                })
            }
            Effect::CardProgress {
                card,
                label,
                background,
            } => self.with(Target::Element(card), |el| {
                if let Some(pct) = el.query_selector(selectors::SKILL_CARD_PCT)? {
                    pct.set_text_content(Some(&label));
                }
                set_style(el, selectors::SKILL_CARD_CIRCLE, "background", &background)
            }),
            Effect::Observe(_) | Effect::Unobserve(_) | Effect::ResetForm | Effect::Alert(_) => {
                Ok(())
            }
        };
        if let Err(e) = result {
            debug!(error = ?e, "effect failed");
        }
    }

    fn with(
        &self,
        target: Target,
        f: impl FnOnce(&Element) -> Result<(), JsValue>,
    ) -> Result<(), JsValue> {
        match self.resolve(target) {
            Some(element) => f(&element),
            None => {
                trace!(?target, "effect target missing");
                Ok(())
            }
        }
    }

    fn build_skill_bar(&self, skill: &Element, percent: u8) -> Result<(), JsValue> {
        let part = |(tag, class): (&str, &str)| -> Result<Element, JsValue> {
            let el = self.document.create_element(tag)?;
            el.set_class_name(class);
            Ok(el)
        };
        let wrap = part(selectors::SKILL_BAR_WRAP)?;
        wrap.append_child(&part(selectors::SKILL_BAR_FILL)?)?;
        let label = part(selectors::SKILL_BAR_LABEL)?;
        label.set_text_content(Some(&format!("{percent}%")));
        skill.append_child(&wrap)?;
        skill.append_child(&label)?;
        Ok(())
    }
}

/// Value of a form control, whatever its element type.
pub(crate) fn input_value(element: &Element) -> String {
    js_sys::Reflect::get(element, &JsValue::from_str("value"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

pub(crate) fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(|list| elements(&list))
        .unwrap_or_default()
}

pub(crate) fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn carousel_items(
    document: &Document,
    nodes: &mut NodeTable,
    container: &str,
    item: &str,
) -> Vec<ElementId> {
    document
        .query_selector(container)
        .ok()
        .flatten()
        .and_then(|c| c.query_selector_all(item).ok())
        .map(|list| elements(&list))
        .unwrap_or_default()
        .iter()
        .map(|el| nodes.register(el))
        .collect()
}

fn set_style(root: &Element, selector: &str, property: &str, value: &str) -> Result<(), JsValue> {
    if let Some(el) = root.query_selector(selector)?
        && let Some(el) = el.dyn_ref::<HtmlElement>()
    {
        el.style().set_property(property, value)?;
    }
    Ok(())
}
