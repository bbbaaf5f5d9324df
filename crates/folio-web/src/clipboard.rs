#![forbid(unsafe_code)]

//! Async Clipboard API access.

use folio_core::clipboard::ClipboardError;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::dom::describe;

/// Write `text` with `navigator.clipboard.writeText`.
pub(crate) async fn write_text(text: &str) -> Result<(), ClipboardError> {
    let promise = start_write(text)?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| ClipboardError::WriteError(describe(&e)))
}

fn start_write(text: &str) -> Result<Promise, ClipboardError> {
    let navigator = web_sys::window()
        .map(|w| JsValue::from(w.navigator()))
        .ok_or(ClipboardError::NotAvailable)?;
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .ok()
        .filter(|c| !c.is_undefined() && !c.is_null())
        .ok_or(ClipboardError::NotAvailable)?;
    let write = Reflect::get(&clipboard, &JsValue::from_str("writeText"))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or(ClipboardError::NotAvailable)?;
    write
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(|e| ClipboardError::WriteError(describe(&e)))?
        .dyn_into::<Promise>()
        .map_err(|_| ClipboardError::WriteError("writeText did not return a promise".into()))
}
