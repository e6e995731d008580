//! Browser `localStorage` backend.

use wasm_bindgen::JsValue;

use super::KeyValueStore;
use crate::error::{Result, TableditError};

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// The window's `localStorage`, if the page has one and it is accessible.
    pub fn from_window() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

fn storage_err(op: &str, e: &JsValue) -> TableditError {
    TableditError::Storage(format!("localStorage.{op}: {e:?}"))
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| storage_err("getItem", &e))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| storage_err("setItem", &e))
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| storage_err("removeItem", &e))
    }
}
