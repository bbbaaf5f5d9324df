#![forbid(unsafe_code)]

//! Copy-to-clipboard helper for the contact email buttons.
//!
//! Writing to the clipboard is the host's job. This module decides what to
//! copy and what to tell the reader; a failed write still shows the address
//! so the reader can copy it by hand.

use std::fmt;

/// Notice after a successful copy.
pub const NOTICE_COPIED: &str = "Email copied to clipboard";

/// Clipboard errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard capability (insecure context, old browser).
    NotAvailable,
    /// The write was rejected (permission denied, document not focused).
    WriteError(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => write!(f, "clipboard not available"),
            Self::WriteError(msg) => write!(f, "clipboard write failed: {msg}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Address a copy button should copy: its `data-email` attribute, else its
/// trimmed text.
#[must_use]
pub fn copy_text(data_email: Option<&str>, text_content: &str) -> String {
    data_email
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| text_content.trim())
        .to_owned()
}

/// Notice to show after a copy attempt.
#[must_use]
pub fn copy_notice(email: &str, result: &Result<(), ClipboardError>) -> String {
    match result {
        Ok(()) => NOTICE_COPIED.to_owned(),
        Err(_) => format!("Copied: {email}"),
    }
}
