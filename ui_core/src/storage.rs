// Key-value persistence seam. The browser build hands in a localStorage-backed
// store from JS; tests use the in-memory one.

use std::collections::HashMap;

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use crate::error::UiError;

/// String key-value store (localStorage shaped).
pub trait KeyValueStore {
    /// `None` when the key is absent or the store cannot be read.
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), UiError>;
}

/// Process-local store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), UiError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), UiError> {
        (**self).set(key, value)
    }
}

/// Store backed by a JS object exposing `get(key)` and `set(key, value)`,
/// typically a thin wrapper over `localStorage`.
pub struct JsStore {
    target: JsValue,
}

impl JsStore {
    pub fn new(target: JsValue) -> Self {
        JsStore { target }
    }

    fn method(&self, name: &str) -> Option<Function> {
        Reflect::get(&self.target, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }
}

impl KeyValueStore for JsStore {
    fn get(&self, key: &str) -> Option<String> {
        let get = self.method("get")?;
        get.call1(&self.target, &JsValue::from_str(key))
            .ok()?
            .as_string()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), UiError> {
        let storage_error = |message: String| UiError::Storage {
            key: key.to_string(),
            message,
        };
        let set = self
            .method("set")
            .ok_or_else(|| storage_error("store has no set()".to_string()))?;
        set.call2(&self.target, &JsValue::from_str(key), &JsValue::from_str(value))
            .map(|_| ())
            .map_err(|err| storage_error(format!("{:?}", err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }
}
