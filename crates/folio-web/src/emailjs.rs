#![forbid(unsafe_code)]

//! EmailJS request and response mapping.
//!
//! `emailjs.send(service, template, params)` resolves on success and rejects
//! with an `EmailJSResponseStatus { status, text }`. Both directions are
//! mapped here so the browser glue only moves values across the boundary.

use folio_core::contact::{DeliveryError, EmailPayload};
use serde_json::Value;

/// Template parameters for an email, as the EmailJS template expects them.
pub fn template_params(payload: &EmailPayload) -> Result<Value, serde_json::Error> {
    serde_json::to_value(payload)
}

/// Turn a rejection's `status` and `text` into a [`DeliveryError`].
///
/// Non-HTTP statuses (missing, fractional, out of range) are dropped so the
/// failure is classified from its text alone.
#[must_use]
pub fn delivery_error(status: Option<f64>, text: Option<String>) -> DeliveryError {
    let status = status
        .filter(|s| s.fract() == 0.0 && (100.0..=599.0).contains(s))
        .map(|s| s as u16);
    DeliveryError::new(status, text.unwrap_or_default())
}
