#![forbid(unsafe_code)]

//! Tracing layer that writes events to the browser console.
//!
//! Each level maps to the matching `console` method so devtools filtering
//! works as usual.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use wasm_bindgen::JsValue;

/// Extracts message and structured fields from a tracing event.
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: String,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }
}

/// Console sink with a maximum level.
pub(crate) struct BrowserConsoleLayer {
    max_level: Level,
}

impl BrowserConsoleLayer {
    pub(crate) fn new(max_level: Level) -> Self {
        Self { max_level }
    }
}

impl<S: Subscriber> Layer<S> for BrowserConsoleLayer {
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        *metadata.level() <= self.max_level
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        let line = JsValue::from_str(&format!(
            "[{} {}] {}{}",
            meta.level(),
            meta.target(),
            visitor.message.unwrap_or_default(),
            visitor.fields
        ));
        match *meta.level() {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            Level::DEBUG => web_sys::console::debug_1(&line),
            Level::TRACE => web_sys::console::log_1(&line),
        }
    }
}

/// Install the console layer as the global subscriber.
///
/// Only the first call wins; later calls (a second `FolioWeb` on the same
/// page) keep the existing subscriber.
pub(crate) fn install(max_level: Level) {
    let subscriber = tracing_subscriber::registry().with(BrowserConsoleLayer::new(max_level));
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("console subscriber already installed");
    }
}
