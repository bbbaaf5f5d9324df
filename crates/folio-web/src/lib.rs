#![forbid(unsafe_code)]

//! WASM frontend for the folio portfolio page.
//!
//! This crate is host-specific (web/WASM). It owns everything `folio-core`
//! deliberately does not:
//! - scanning the document into a [`folio_core::PageLayout`],
//! - installing DOM listeners that queue [`folio_core::PageEvent`]s,
//! - driving a `requestAnimationFrame` loop that feeds the page clock,
//! - applying the emitted [`folio_core::Effect`]s to real nodes,
//! - the browser capabilities: `IntersectionObserver`, `localStorage`, the
//!   clipboard, and the EmailJS client.
//!
//! Options parsing, selectors, and EmailJS payload mapping are plain Rust and
//! compile on every target.

pub mod emailjs;
pub mod options;
pub mod selectors;

#[cfg(target_arch = "wasm32")]
mod clipboard;
#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod listeners;
#[cfg(target_arch = "wasm32")]
mod mailer;
#[cfg(target_arch = "wasm32")]
mod observer;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::FolioWeb;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct FolioWeb;

#[cfg(not(target_arch = "wasm32"))]
impl FolioWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
