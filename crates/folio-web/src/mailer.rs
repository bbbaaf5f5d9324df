#![forbid(unsafe_code)]

//! EmailJS browser SDK client.

use folio_core::contact::{DeliveryError, EmailPayload};
use js_sys::{Function, JSON, Promise, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::dom::describe;
use crate::emailjs::{delivery_error, template_params};
use crate::options::EmailJsConfig;

/// Handle to the page's `emailjs` global.
pub(crate) struct Mailer {
    config: EmailJsConfig,
    sdk: JsValue,
}

impl Mailer {
    /// Bind to `window.emailjs`, initializing it with the public key when one
    /// is configured. `None` when the SDK is not loaded.
    pub(crate) fn connect(config: EmailJsConfig) -> Option<Self> {
        let window = web_sys::window()?;
        let sdk = Reflect::get(&window, &JsValue::from_str("emailjs"))
            .ok()
            .filter(|sdk| sdk.is_object())?;
        if let Some(key) = &config.public_key {
            match method(&sdk, "init") {
                Some(init) => {
                    if let Err(e) = init.call1(&sdk, &JsValue::from_str(key)) {
                        warn!(error = %describe(&e), "emailjs.init failed");
                    }
                }
                None => warn!("emailjs.init is missing"),
            }
        }
        debug!(service = %config.service_id, "email service bound");
        Some(Self { config, sdk })
    }

    /// Send one email and wait for the service's verdict.
    pub(crate) async fn send(&self, payload: &EmailPayload) -> Result<(), DeliveryError> {
        let promise = self.start(payload)?;
        match JsFuture::from(promise).await {
            Ok(_) => Ok(()),
            Err(rejection) => Err(delivery_error(
                field(&rejection, "status").and_then(|s| s.as_f64()),
                field(&rejection, "text")
                    .and_then(|t| t.as_string())
                    .or_else(|| Some(describe(&rejection))),
            )),
        }
    }

    fn start(&self, payload: &EmailPayload) -> Result<Promise, DeliveryError> {
        let params = template_params(payload)
            .map_err(|e| DeliveryError::new(None, format!("invalid template params: {e}")))?;
        let params = JSON::parse(&params.to_string())
            .map_err(|e| DeliveryError::new(None, describe(&e)))?;
        let send = method(&self.sdk, "send")
            .ok_or_else(|| DeliveryError::new(None, "email service unavailable"))?;
        send.call3(
            &self.sdk,
            &JsValue::from_str(&self.config.service_id),
            &JsValue::from_str(&self.config.template_id),
            &params,
        )
        .map_err(|e| DeliveryError::new(None, describe(&e)))?
        .dyn_into::<Promise>()
        .map_err(|_| DeliveryError::new(None, "emailjs.send did not return a promise"))
    }
}

fn method(target: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into().ok())
}

fn field(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined())
}
