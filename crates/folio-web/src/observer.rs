#![forbid(unsafe_code)]

//! Browser observers: intersection (reveal) and subtree removal (detach).
//!
//! Both only translate browser records into queued page events; the page
//! decides what they mean.

use folio_core::reveal::IntersectionEntry;
use folio_core::PageEvent;
use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MutationObserver, MutationObserverInit, MutationRecord, Node,
};

use crate::dom::{ID_ATTRIBUTE, NodeTable, elements};
use crate::listeners::Queue;

/// `IntersectionObserver` feeding [`PageEvent::Intersect`].
pub(crate) struct RevealWatcher {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl RevealWatcher {
    pub(crate) fn new(threshold: f32, queue: Queue) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            let mut queue = queue.borrow_mut();
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let Some(element) = NodeTable::id_of(&entry.target()) else {
                    continue;
                };
                queue.push_back(PageEvent::Intersect(IntersectionEntry {
                    element,
                    ratio: entry.intersection_ratio() as f32,
                    intersecting: entry.is_intersecting(),
                }));
            }
        });
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(f64::from(threshold)));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub(crate) fn observe(&self, element: &Element) {
        self.observer.observe(element);
    }

    pub(crate) fn unobserve(&self, element: &Element) {
        self.observer.unobserve(element);
    }

    pub(crate) fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for RevealWatcher {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// `MutationObserver` reporting registered nodes that left the document.
pub(crate) struct DetachWatcher {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl DetachWatcher {
    pub(crate) fn new(root: &Node, queue: Queue) -> Result<Self, JsValue> {
        let selector = format!("[{ID_ATTRIBUTE}]");
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |records: js_sys::Array| {
            let mut queue = queue.borrow_mut();
            for record in records.iter() {
                let Ok(record) = record.dyn_into::<MutationRecord>() else {
                    continue;
                };
                let removed = record.removed_nodes();
                for node in (0..removed.length()).filter_map(|i| removed.item(i)) {
                    let Ok(element) = node.dyn_into::<Element>() else {
                        continue;
                    };
                    // A node moved elsewhere in the document is still connected.
                    if element.is_connected() {
                        continue;
                    }
                    let nested = element
                        .query_selector_all(&selector)
                        .map(|list| elements(&list))
                        .unwrap_or_default();
                    for detached in std::iter::once(element).chain(nested) {
                        if let Some(id) = NodeTable::id_of(&detached) {
                            debug!(%id, "node detached");
                            queue.push_back(PageEvent::Detach(id));
                        }
                    }
                }
            }
        });
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(root, &init)?;
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for DetachWatcher {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
