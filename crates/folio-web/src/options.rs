#![forbid(unsafe_code)]

//! Options object accepted by `FolioWeb::new`.
//!
//! ```json
//! {
//!   "page": { "typing": { "phrases": ["Rust", "WASM"] } },
//!   "emailjs": { "service_id": "svc", "template_id": "tpl" },
//!   "log_level": "debug"
//! }
//! ```

use serde::Deserialize;
use tracing::Level;

use folio_core::{ConfigError, PageConfig};

/// EmailJS identifiers. The EmailJS browser SDK must be loaded on the page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub template_id: String,
    /// Passed to `emailjs.init` when set; otherwise the page is expected to
    /// have initialized the SDK itself.
    #[serde(default)]
    pub public_key: Option<String>,
}

/// Frontend options.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WebOptions {
    pub page: PageConfig,
    /// Without it the contact form validates but reports every send as
    /// failed.
    pub emailjs: Option<EmailJsConfig>,
    /// Console log level (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: Option<String>,
}

impl WebOptions {
    /// Parse options. An empty or blank string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let options: Self = serde_json::from_str(json)?;
        options.page.validate()?;
        if let Some(level) = &options.log_level
            && level.parse::<Level>().is_err()
        {
            return Err(ConfigError::Invalid(format!("unknown log_level {level:?}")));
        }
        Ok(options)
    }

    /// Console log level, `info` unless configured.
    #[must_use]
    pub fn level(&self) -> Level {
        self.log_level
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or(Level::INFO)
    }
}
