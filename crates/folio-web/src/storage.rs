#![forbid(unsafe_code)]

//! `localStorage`-backed theme preference.

use folio_core::theme::{StorageError, StorageResult, THEME_KEY, ThemeStore};
use web_sys::Storage;

use crate::dom::describe;

/// Theme store over `window.localStorage`.
///
/// Values are stored raw (no JSON quoting) so the stylesheet bootstrap
/// snippet and this crate agree on the format.
pub(crate) struct LocalThemeStore {
    storage: Option<Storage>,
}

impl LocalThemeStore {
    /// Bind to `localStorage`. Private browsing modes may deny access; the
    /// store then reports [`StorageError::Unavailable`] on every call.
    pub(crate) fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        Self { storage }
    }

    fn storage(&self) -> StorageResult<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage is not accessible".into()))
    }
}

impl ThemeStore for LocalThemeStore {
    fn name(&self) -> &str {
        "LocalThemeStore"
    }

    fn load(&self) -> StorageResult<Option<String>> {
        self.storage()?
            .get_item(THEME_KEY)
            .map_err(|e| StorageError::Read(describe(&e)))
    }

    fn save(&mut self, value: Option<&str>) -> StorageResult<()> {
        let storage = self.storage()?;
        match value {
            Some(value) => storage.set_item(THEME_KEY, value),
            None => storage.remove_item(THEME_KEY),
        }
        .map_err(|e| StorageError::Write(describe(&e)))
    }
}
