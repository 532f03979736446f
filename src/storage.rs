use std::collections::HashMap;

use crate::error::StoreError;

/// A string key-value store the problem list is persisted in.
///
/// [`MemoryStorage`] is the built-in implementation; the browser build adds one over `localStorage`.
pub trait Storage {
    /// Read the value under `key`, or [`None`] if nothing was ever written there.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Replace the value under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// A [`Storage`] living only as long as the value itself.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

#[cfg(feature = "wasm")]
pub use browser::BrowserStorage;

#[cfg(feature = "wasm")]
mod browser {
    use wasm_bindgen::JsValue;

    use super::{MemoryStorage, Storage};
    use crate::error::StoreError;

    fn js_err(err: JsValue) -> StoreError {
        StoreError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }

    /// The window's `localStorage`, or memory when the page has none (private browsing, or outside a browser).
    pub enum BrowserStorage {
        Local(web_sys::Storage),
        Memory(MemoryStorage),
    }

    impl BrowserStorage {
        pub fn open() -> Self {
            match web_sys::window().and_then(|window| window.local_storage().ok().flatten()) {
                Some(storage) => Self::Local(storage),
                None => {
                    tracing::warn!("localStorage unavailable, problems will not persist");
                    Self::Memory(MemoryStorage::new())
                }
            }
        }
    }

    impl Storage for BrowserStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            match self {
                Self::Local(storage) => storage.get_item(key).map_err(js_err),
                Self::Memory(memory) => memory.get(key),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            match self {
                Self::Local(storage) => storage.set_item(key, value).map_err(js_err),
                Self::Memory(memory) => memory.set(key, value),
            }
        }
    }
}
