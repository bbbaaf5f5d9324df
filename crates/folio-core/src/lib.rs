#![forbid(unsafe_code)]

//! `folio-core` holds the interaction logic of the folio portfolio page as
//! plain, deterministic state machines.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (the browser glue in
//!   `folio-web`, or a test) pushes events and applies the returned effects.
//! - **Deterministic time**: every timer is a deadline on a monotonic clock
//!   the host advances explicitly.
//! - **No DOM types**: page nodes are opaque [`element::ElementId`] handles, so
//!   everything here runs and tests natively.
//!
//! [`page::Page`] ties the widgets together; each widget module can also be
//! driven on its own.
//!
//! # Feature Flags
//!
//! - `tracing`: emit `tracing` events for state transitions (reveals,
//!   progress runs, submissions, storage failures).

pub mod animation;
pub mod carousel;
pub mod clipboard;
pub mod clock;
pub mod config;
pub mod contact;
pub mod element;
pub mod fields;
pub(crate) mod logging;
pub mod modal;
pub mod nav;
pub mod page;
pub mod progress;
pub mod reveal;
pub mod theme;
pub mod toast;
pub mod typing;

pub use config::{ConfigError, PageConfig};
pub use element::{ElementId, Target};
pub use page::{CarouselKind, Effect, Page, PageEvent, PageLayout, PageOutputs};
