#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Every tunable lives in one [`PageConfig`] tree with working defaults. The
//! host may pass a JSON options object; any key it omits keeps its default.
//! Durations are spelled in milliseconds (`*_ms` keys).
//!
//! ```
//! use folio_core::config::PageConfig;
//!
//! let config = PageConfig::from_json(r#"{ "typing": { "pause_ms": 900 } }"#).unwrap();
//! assert_eq!(config.typing.pause.as_millis(), 900);
//! assert_eq!(config.typing.type_delay.as_millis(), 60);
//! ```

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::carousel::CarouselConfig;
use crate::contact::ContactConfig;
use crate::nav::NavConfig;
use crate::progress::ProgressConfig;
use crate::reveal::RevealConfig;
use crate::toast::DEFAULT_TOAST_DURATION;
use crate::typing::TypingConfig;

/// Errors from parsing host options.
#[derive(Debug)]
pub enum ConfigError {
    /// The options object is not valid JSON for [`PageConfig`].
    Parse(serde_json::Error),
    /// A value parsed but makes no sense.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "invalid page options: {e}"),
            Self::Invalid(msg) => write!(f, "invalid page options: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Complete page configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub reveal: RevealConfig,
    pub progress: ProgressConfig,
    pub typing: TypingConfig,
    pub highlights: CarouselConfig,
    /// Missing keys fall back to [`CarouselConfig::skill_minis`].
    #[serde(deserialize_with = "skill_minis")]
    pub skill_minis: CarouselConfig,
    pub contact: ContactConfig,
    pub nav: NavConfig,
    /// How long notices stay up.
    #[serde(rename = "toast_ms", with = "millis")]
    pub toast_duration: Duration,
    /// Percent assumed for a `.skill` without `data-percent`.
    pub default_skill_percent: u8,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            reveal: RevealConfig::default(),
            progress: ProgressConfig::default(),
            typing: TypingConfig::default(),
            highlights: CarouselConfig::highlights(),
            skill_minis: CarouselConfig::skill_minis(),
            contact: ContactConfig::default(),
            nav: NavConfig::default(),
            toast_duration: DEFAULT_TOAST_DURATION,
            default_skill_percent: 70,
        }
    }
}

impl PageConfig {
    /// Parse host options. An empty or blank string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no widget can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(ConfigError::Invalid(format!(
                "reveal.threshold must be within 0..=1 (got {})",
                self.reveal.threshold
            )));
        }
        if self.default_skill_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "default_skill_percent must be at most 100 (got {})",
                self.default_skill_percent
            )));
        }
        for (name, carousel) in [
            ("highlights", &self.highlights),
            ("skill_minis", &self.skill_minis),
        ] {
            if carousel.interval.is_zero() {
                return Err(ConfigError::Invalid(format!(
                    "{name}.interval_ms must be positive"
                )));
            }
        }
        Ok(())
    }

    /// Parse a `data-percent` attribute the way the page markup uses it:
    /// leading integer, clamped to 100, default when absent or unparsable.
    #[must_use]
    pub fn parse_percent(&self, raw: Option<&str>) -> u8 {
        raw.and_then(|s| {
            let s = s.trim();
            let end = s
                .char_indices()
                .find(|(_, c)| !c.is_ascii_digit())
                .map_or(s.len(), |(i, _)| i);
            s[..end].parse::<u32>().ok()
        })
        .map_or(self.default_skill_percent, |p| p.min(100) as u8)
    }
}

/// Deserialize the mini-card carousel over its own defaults rather than
/// [`CarouselConfig::default`].
fn skill_minis<'de, D>(deserializer: D) -> Result<CarouselConfig, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Partial {
        interval_ms: Option<u64>,
        resume_grace_ms: Option<u64>,
    }

    let base = CarouselConfig::skill_minis();
    let partial = Partial::deserialize(deserializer)?;
    Ok(CarouselConfig {
        interval: partial.interval_ms.map_or(base.interval, Duration::from_millis),
        resume_grace: partial
            .resume_grace_ms
            .map_or(base.resume_grace, Duration::from_millis),
    })
}

/// Serde adapter for millisecond durations.
pub(crate) mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
