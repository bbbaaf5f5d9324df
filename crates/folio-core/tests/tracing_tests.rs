#![forbid(unsafe_code)]

//! Structured logging integration tests.
//!
//! With events enabled:
//!   cargo test -p folio-core --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p folio-core --test tracing_tests -- zero_overhead

use std::sync::{Arc, Mutex};
use std::time::Duration;

use folio_core::contact::{ContactFields, DeliveryError};
use folio_core::reveal::{IntersectionEntry, WatchKind};
use folio_core::theme::{StorageError, StorageResult, ThemeStore};
use folio_core::{ElementId, Page, PageConfig, PageLayout};

use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured event: level, message, and recorded fields.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: Vec<(String, String)>,
}

/// A tracing Layer that records every event.
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

/// Visitor that extracts event fields, splitting out `message`.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

fn with_capture(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: events.clone(),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

/// Store whose writes always fail.
struct ReadOnlyStore;

impl ThemeStore for ReadOnlyStore {
    fn name(&self) -> &str {
        "ReadOnlyStore"
    }

    fn load(&self) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn save(&mut self, _value: Option<&str>) -> StorageResult<()> {
        Err(StorageError::Write("quota exceeded".into()))
    }
}

fn session() {
    let layout = PageLayout {
        has_toast: true,
        watched: vec![(ElementId(1), WatchKind::SkillsGroup)],
        skill_cards: vec![(ElementId(2), Some("50".into()))],
        ..PageLayout::default()
    };
    let mut page: Page<()> = Page::new(PageConfig::default(), layout, Box::new(ReadOnlyStore));
    page.start(Duration::ZERO);
    page.intersect(IntersectionEntry::visible(ElementId(1), 0.5));
    page.intersect(IntersectionEntry::visible(ElementId(2), 0.5));
    page.tick(Duration::from_millis(900));
    page.toggle_theme();
    let fields = ContactFields {
        name: "Ann".into(),
        email: "a@b.c".into(),
        message: "hi".into(),
        context: String::new(),
    };
    page.submit(&fields);
    page.finish_submit(Err(DeliveryError::new(Some(500), "boom")));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(feature = "tracing")]
#[test]
fn session_emits_state_transitions() {
    let events = with_capture(session);
    let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();

    for expected in [
        "page started",
        "revealed",
        "progress run started",
        "contact form sending",
    ] {
        assert!(
            messages.contains(&expected),
            "missing {expected:?} in {messages:?}"
        );
    }
}

#[cfg(feature = "tracing")]
#[test]
fn failures_are_warnings() {
    let events = with_capture(session);
    let warnings: Vec<&CapturedEvent> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();

    assert!(
        warnings
            .iter()
            .any(|e| e.message == "failed to persist theme preference")
    );
    let delivery = warnings
        .iter()
        .find(|e| e.message == "contact form delivery failed")
        .expect("delivery failure warning");
    assert!(
        delivery
            .fields
            .iter()
            .any(|(k, v)| k == "failure" && v == "ServiceUnavailable")
    );
}

#[cfg(not(feature = "tracing"))]
#[test]
fn zero_overhead_without_feature() {
    let events = with_capture(session);
    assert!(events.is_empty(), "unexpected events: {events:?}");
}
