#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use folio_core::contact::{DeliveryError, EmailPayload};
use folio_core::reveal::IntersectionEntry;
use folio_core::{Effect, Page, PageEvent};
use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Window};
use web_time::Instant;

use crate::console;
use crate::dom::{Dom, describe};
use crate::listeners::{self, Guard, Queue};
use crate::mailer::Mailer;
use crate::observer::{DetachWatcher, RevealWatcher};
use crate::options::WebOptions;
use crate::storage::LocalThemeStore;

/// Portfolio page controller.
///
/// Constructing it binds the current document, installs every listener, and
/// starts the frame loop. `destroy()` (or dropping the JS handle) detaches
/// all of it again.
#[wasm_bindgen]
pub struct FolioWeb {
    runtime: Option<Rc<Runtime>>,
}

#[wasm_bindgen]
impl FolioWeb {
    /// Bind the page. `options` is an optional JSON options object.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<String>) -> Result<FolioWeb, JsValue> {
        let options = WebOptions::from_json(options.as_deref().unwrap_or_default())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        console::install(options.level());

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let runtime = Runtime::boot(window, document, options);
        Ok(Self {
            runtime: Some(runtime),
        })
    }

    /// Whether the page is still bound.
    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.runtime.as_ref().is_some_and(|rt| rt.running.get())
    }

    /// Detach listeners and observers and stop the frame loop.
    pub fn destroy(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.stop();
        }
    }
}

impl Drop for FolioWeb {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Everything one bound page owns.
struct Runtime {
    window: Window,
    page: RefCell<Page<Guard>>,
    queue: Queue,
    dom: Rc<Dom>,
    reveal: Option<RevealWatcher>,
    detach: RefCell<Option<DetachWatcher>>,
    mailer: Option<Rc<Mailer>>,
    listeners: RefCell<Vec<EventListener>>,
    frame: RefCell<Option<AnimationFrame>>,
    origin: Instant,
    running: Cell<bool>,
}

impl Runtime {
    fn boot(window: Window, document: Document, options: WebOptions) -> Rc<Self> {
        let dom = Rc::new(Dom::bind(document));
        let layout = dom.scan();
        let queue: Queue = Rc::default();

        let reveal = RevealWatcher::new(options.page.reveal.threshold, Rc::clone(&queue))
            .map_err(|e| warn!(error = %describe(&e), "IntersectionObserver unavailable"))
            .ok();
        let detach = DetachWatcher::new(&dom.document, Rc::clone(&queue))
            .map_err(|e| warn!(error = %describe(&e), "MutationObserver unavailable"))
            .ok();
        let mailer = match options.emailjs {
            Some(config) => {
                let mailer = Mailer::connect(config);
                if mailer.is_none() {
                    warn!("emailjs SDK not loaded; contact form sends will fail");
                }
                mailer.map(Rc::new)
            }
            None => None,
        };

        let origin = Instant::now();
        let mut page = Page::new(options.page, layout, Box::new(LocalThemeStore::open()));
        page.start(origin.elapsed());
        page.scroll(window.scroll_y().unwrap_or(0.0));

        let listeners = listeners::install(&window, &dom, &queue);
        info!(listeners = listeners.len(), "folio bound");

        let runtime = Rc::new(Self {
            window,
            page: RefCell::new(page),
            queue,
            dom,
            reveal,
            detach: RefCell::new(detach),
            mailer,
            listeners: RefCell::new(listeners),
            frame: RefCell::new(None),
            origin,
            running: Cell::new(true),
        });
        runtime.step();
        runtime.schedule();
        runtime
    }

    fn schedule(self: &Rc<Self>) {
        if !self.running.get() {
            return;
        }
        let runtime = Rc::clone(self);
        let handle = request_animation_frame(move |_timestamp| {
            runtime.frame.borrow_mut().take();
            runtime.step();
            runtime.schedule();
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    /// One frame: replay queued events, fire due timers, apply the results.
    fn step(&self) {
        if !self.running.get() {
            return;
        }
        let now = self.origin.elapsed();
        let outputs = {
            let mut page = self.page.borrow_mut();
            page.set_time(now);
            loop {
                let next = self.queue.borrow_mut().pop_front();
                match next {
                    Some(event) => page.handle(event),
                    None => break,
                }
            }
            page.tick(now);
            page.take_outputs()
        };

        for effect in outputs.effects {
            self.apply(effect);
        }
        if let Some(payload) = outputs.outgoing {
            self.deliver(payload);
        }
    }

    fn apply(&self, effect: Effect) {
        match effect {
            Effect::Observe(id) => match (&self.reveal, self.dom.node(id)) {
                (Some(watcher), Some(element)) => watcher.observe(&element),
                // Without an observer everything counts as seen.
                (None, Some(_)) => self.queue.borrow_mut().push_back(PageEvent::Intersect(
                    IntersectionEntry {
                        element: id,
                        ratio: 1.0,
                        intersecting: true,
                    },
                )),
                _ => {}
            },
            Effect::Unobserve(id) => {
                if let (Some(watcher), Some(element)) = (&self.reveal, self.dom.node(id)) {
                    watcher.unobserve(&element);
                }
            }
            Effect::Alert(message) => {
                if let Err(e) = self.window.alert_with_message(&message) {
                    warn!(error = %describe(&e), "alert failed");
                }
            }
            Effect::ResetForm => {
                if let Some(form) = self.dom.form() {
                    form.reset();
                }
            }
            other => self.dom.apply(other),
        }
    }

    /// Hand an accepted email to the service; the verdict comes back as a
    /// queued event.
    fn deliver(&self, payload: EmailPayload) {
        let queue = Rc::clone(&self.queue);
        let Some(mailer) = self.mailer.clone() else {
            queue.borrow_mut().push_back(PageEvent::Delivered(Err(DeliveryError::new(
                None,
                "email service unavailable",
            ))));
            return;
        };
        spawn_local(async move {
            let result = mailer.send(&payload).await;
            queue.borrow_mut().push_back(PageEvent::Delivered(result));
        });
    }

    fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        self.frame.borrow_mut().take();
        self.listeners.borrow_mut().clear();
        self.detach.borrow_mut().take();
        if let Some(watcher) = &self.reveal {
            watcher.disconnect();
        }
        self.queue.borrow_mut().clear();
        self.page.borrow_mut().close_modal();
        info!("folio unbound");
    }
}
