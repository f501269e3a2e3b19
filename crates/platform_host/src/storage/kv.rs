//! Synchronous key/value storage contracts and adapters.
//!
//! The window-manager session subscriber writes after every registry mutation and must finish
//! before the next one starts, so this boundary is synchronous (matching `window.localStorage`).

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Host side channel storing raw text values by key.
pub trait KeyValueStore {
    /// Loads the raw text stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, String>;

    /// Stores `raw` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage rejects the write (quota, disabled storage).
    fn set_item(&self, key: &str, raw: &str) -> Result<(), String>;

    /// Removes the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage rejects the delete.
    fn remove_item(&self, key: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op store for unsupported targets and baseline tests. Always empty, accepts every write.
pub struct NoopKeyValueStore;

impl KeyValueStore for NoopKeyValueStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _raw: &str) -> Result<(), String> {
        Ok(())
    }

    fn remove_item(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string.
///
/// Clones share the same backing map, so a test can keep a handle while the runtime owns another.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
    writes: Rc<RefCell<usize>>,
}

impl MemoryKeyValueStore {
    /// Creates a store pre-populated with a single entry.
    pub fn with_item(key: impl Into<String>, raw: impl Into<String>) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().insert(key.into(), raw.into());
        store
    }

    /// Number of successful `set_item` calls observed by this store (shared across clones).
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }

    /// Returns the raw value for `key` without going through the trait.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, raw: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, raw: &str) -> Result<(), String> {
        (**self).set_item(key, raw)
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        (**self).remove_item(key)
    }
}

/// Loads and deserializes a typed value through a [`KeyValueStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub fn load_json_with<S: KeyValueStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.get_item(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed value through a [`KeyValueStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_json_with<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.set_item(key, &raw)
}
