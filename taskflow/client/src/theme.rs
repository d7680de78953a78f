//! Light/dark theme preference, persisted as a JSON boolean under a fixed key.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// Key the dark mode flag is stored under.
pub const DARK_MODE_KEY: &str = "darkMode";

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Failed to serialize preference")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write preference: {0}")]
    Storage(String),
}

/// A key/value store holding JSON-encoded preferences.
pub trait PreferenceStore {
    /// Returns the stored value, or `None` if it is absent or unreadable.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T>;
    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PreferenceError>;
}

/// In-process preference store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw JSON stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Stores `raw` verbatim, without encoding it.
    pub fn insert_raw(&self, key: &str, raw: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.borrow();
        serde_json::from_str(entries.get(key)?).ok()
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PreferenceError> {
        let raw = serde_json::to_string(value)?;
        self.entries.borrow_mut().insert(key.to_string(), raw);
        Ok(())
    }
}

/// Browser local storage.
#[cfg(feature = "web")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPreferenceStore;

#[cfg(feature = "web")]
impl PreferenceStore for LocalPreferenceStore {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::get(key).ok()
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PreferenceError> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::set(key, value).map_err(|err| PreferenceError::Storage(err.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// The stored preference if there is a readable one, otherwise the
    /// system's preference.
    pub fn load<P: PreferenceStore>(store: &P, system_prefers_dark: bool) -> Self {
        let dark_mode = store
            .get::<bool>(DARK_MODE_KEY)
            .unwrap_or(system_prefers_dark);
        Self::from_dark_mode(dark_mode)
    }

    pub fn save<P: PreferenceStore>(self, store: &P) -> Result<(), PreferenceError> {
        store.set(DARK_MODE_KEY, &self.is_dark())
    }
}
