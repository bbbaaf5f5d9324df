#![forbid(unsafe_code)]

//! Light/dark theme preference.
//!
//! The preference lives under one key in the host's durable key-value
//! storage. Only the non-default value is written: `"light"` is stored, dark
//! removes the key. An unset or unrecognized value means dark.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Unavailable` | Storage disabled (private mode, sandbox) | Default theme, toggles still apply for the session |
//! | `StorageError::Write` | Quota or permission error on save | Logged, in-memory preference still flips |

use std::fmt;

use crate::logging::{debug, warn};

/// Storage key holding the preference.
pub const THEME_KEY: &str = "theme";

/// Theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Parse a stored value. Anything but `"light"` / `"dark"` is `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Stored / attribute spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Glyph shown on the toggle control.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Light => "☀️",
            Self::Dark => "🌙",
        }
    }

    /// Value of the root `data-theme` attribute; `None` means remove it.
    #[must_use]
    pub const fn root_attribute(self) -> Option<&'static str> {
        match self {
            Self::Light => Some("light"),
            Self::Dark => None,
        }
    }

    /// Value to persist; `None` means remove the key.
    #[must_use]
    pub const fn stored_value(self) -> Option<&'static str> {
        self.root_attribute()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the preference store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Storage is not available at all.
    Unavailable(String),
    /// Reading the key failed.
    Read(String),
    /// Writing or removing the key failed.
    Write(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            Self::Read(msg) => write!(f, "storage read failed: {msg}"),
            Self::Write(msg) => write!(f, "storage write failed: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable single-key preference storage.
pub trait ThemeStore {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read the raw stored value, `None` if unset.
    fn load(&self) -> StorageResult<Option<String>>;

    /// Store `value`, or remove the key when `None`.
    fn save(&mut self, value: Option<&str>) -> StorageResult<()>;
}

/// In-memory store for tests and storage-less hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    value: Option<String>,
}

impl MemoryThemeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `value`.
    #[must_use]
    pub fn with_value(value: &str) -> Self {
        Self {
            value: Some(value.to_owned()),
        }
    }

    /// Raw stored value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl ThemeStore for MemoryThemeStore {
    fn name(&self) -> &str {
        "MemoryThemeStore"
    }

    fn load(&self) -> StorageResult<Option<String>> {
        Ok(self.value.clone())
    }

    fn save(&mut self, value: Option<&str>) -> StorageResult<()> {
        self.value = value.map(str::to_owned);
        Ok(())
    }
}

/// Theme controller: the in-memory preference plus its store.
pub struct ThemeController {
    store: Box<dyn ThemeStore>,
    current: Theme,
}

impl ThemeController {
    /// Read the persisted preference. Read failures fall back to the default.
    pub fn load(store: Box<dyn ThemeStore>) -> Self {
        let current = match store.load() {
            Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_default(),
            Ok(None) => Theme::default(),
            Err(_e) => {
                warn!(store = store.name(), error = %_e, "failed to load theme preference");
                Theme::default()
            }
        };
        debug!(theme = %current, "theme loaded");
        Self { store, current }
    }

    /// Current preference.
    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip the preference and persist it. Returns the new theme.
    ///
    /// A failed save is logged; the new theme still applies for this session.
    pub fn toggle(&mut self) -> Theme {
        let next = self.current.toggled();
        self.current = next;
        if let Err(_e) = self.store.save(next.stored_value()) {
            warn!(store = self.store.name(), error = %_e, "failed to persist theme preference");
        }
        debug!(theme = %next, "theme toggled");
        next
    }

    /// Raw value the store currently holds, for diagnostics.
    pub fn persisted(&self) -> StorageResult<Option<String>> {
        self.store.load()
    }
}

impl fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("store", &self.store.name())
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl ThemeStore for BrokenStore {
        fn name(&self) -> &str {
            "BrokenStore"
        }

        fn load(&self) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("disabled".into()))
        }

        fn save(&mut self, _value: Option<&str>) -> StorageResult<()> {
            Err(StorageError::Write("quota".into()))
        }
    }

    #[test]
    fn default_is_dark() {
        let theme = ThemeController::load(Box::new(MemoryThemeStore::new()));
        assert_eq!(theme.current(), Theme::Dark);
    }

    #[test]
    fn persisted_light_is_restored() {
        let theme = ThemeController::load(Box::new(MemoryThemeStore::with_value("light")));
        assert_eq!(theme.current(), Theme::Light);
    }

    #[test]
    fn garbage_value_means_dark() {
        let theme = ThemeController::load(Box::new(MemoryThemeStore::with_value("sepia")));
        assert_eq!(theme.current(), Theme::Dark);
    }

    #[test]
    fn toggle_persists_light_and_clears_dark() {
        let mut theme = ThemeController::load(Box::new(MemoryThemeStore::new()));
        assert_eq!(theme.toggle(), Theme::Light);
        assert_eq!(theme.persisted(), Ok(Some("light".to_owned())));
        assert_eq!(theme.toggle(), Theme::Dark);
        assert_eq!(theme.persisted(), Ok(None));
    }

    #[test]
    fn toggle_twice_is_identity() {
        for start in [None, Some("light")] {
            let store = start.map_or_else(MemoryThemeStore::new, MemoryThemeStore::with_value);
            let mut theme = ThemeController::load(Box::new(store));
            let before = (theme.current(), theme.persisted(), theme.current().glyph());
            theme.toggle();
            theme.toggle();
            let after = (theme.current(), theme.persisted(), theme.current().glyph());
            assert_eq!(before, after);
        }
    }

    #[test]
    fn broken_store_degrades_gracefully() {
        let mut theme = ThemeController::load(Box::new(BrokenStore));
        assert_eq!(theme.current(), Theme::Dark);
        assert_eq!(theme.toggle(), Theme::Light);
    }

    #[test]
    fn glyphs_and_attributes() {
        assert_eq!(Theme::Light.glyph(), "☀️");
        assert_eq!(Theme::Dark.glyph(), "🌙");
        assert_eq!(Theme::Light.root_attribute(), Some("light"));
        assert_eq!(Theme::Dark.root_attribute(), None);
    }
}
