//! Persistence adapter.
//!
//! The whole [`Collection`] lives under one key of a synchronous key-value
//! store and is replaced as a single value on every write. Reads are lenient:
//! a missing or unreadable value yields an empty collection.

mod file;
#[cfg(target_arch = "wasm32")]
mod local;
mod memory;

pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;
pub use memory::MemoryStore;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::Collection;

/// A local, synchronous, string-to-string store (browser `localStorage` or
/// an equivalent).
pub trait KeyValueStore {
    /// Read the value under `key`, `None` if absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key`. Removing an absent key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// Serialize the whole collection under `key`.
pub fn save<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    collection: &Collection,
) -> Result<()> {
    let raw = serde_json::to_string(collection)?;
    store.set_item(key, &raw)?;
    debug!(
        key,
        tables = collection.len(),
        bytes = raw.len(),
        "collection persisted"
    );
    Ok(())
}

/// Load the collection stored under `key`.
///
/// Never fails: an absent key, a storage error, or a value that is not a JSON
/// object all produce an empty collection. Inside an object each table is
/// decoded on its own, so one odd entry never drops the rest; entries are
/// coerced and normalized, and only non-object entries are skipped.
pub fn load<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Collection {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Collection::new(),
        Err(e) => {
            warn!(key, error = %e, "could not read persisted tables, starting empty");
            return Collection::new();
        }
    };

    let entries = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(entries)) => entries,
        Ok(Value::Null) => return Collection::new(),
        Ok(_) => {
            warn!(key, "persisted tables are not a JSON object, starting empty");
            return Collection::new();
        }
        Err(e) => {
            warn!(key, error = %e, "persisted tables are malformed, starting empty");
            return Collection::new();
        }
    };

    let (collection, skipped) = Collection::from_entries(entries);
    if !skipped.is_empty() {
        warn!(key, skipped = skipped.len(), "dropped persisted entries that are not tables");
    }
    debug!(key, tables = collection.len(), "collection loaded");
    collection
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::Table;

    fn sample() -> Collection {
        let mut c = Collection::new();
        let mut t = Table::new("Budget", vec!["Item".into(), "Cost".into()]);
        t.rows.push(vec!["Rent".into(), "1200".into()]);
        t.numeric_column = Some(1);
        c.insert("table_1", t);
        c.insert("table_2", Table::new("Empty", vec!["A".into()]));
        c
    }

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        let c = sample();
        save(&mut store, "tablesData", &c).unwrap();
        assert_eq!(load(&store, "tablesData"), c);
    }

    #[test]
    fn test_absent_key_is_empty() {
        let store = MemoryStore::new();
        assert!(load(&store, "tablesData").is_empty());
    }

    #[test]
    fn test_malformed_value_is_empty() {
        let mut store = MemoryStore::new();
        store.set_item("tablesData", "{not json").unwrap();
        assert!(load(&store, "tablesData").is_empty());

        store.set_item("tablesData", "[1,2,3]").unwrap();
        assert!(load(&store, "tablesData").is_empty());

        store.set_item("tablesData", "null").unwrap();
        assert!(load(&store, "tablesData").is_empty());
    }

    #[test]
    fn test_one_odd_table_does_not_empty_the_rest() {
        let mut store = MemoryStore::new();
        store
            .set_item(
                "tablesData",
                r#"{"good":{"title":"Keep me","columns":["A"],"numericColumn":null,"rows":[["1"]]},"odd":{"title":42,"columns":["A"],"rows":[[{"v":1}]]},"junk":"text"}"#,
            )
            .unwrap();
        let loaded = load(&store, "tablesData");
        assert_eq!(loaded.ids().collect::<Vec<_>>(), vec!["good", "odd"]);
        assert_eq!(loaded.get("good").unwrap().title, "Keep me");
        assert_eq!(loaded.get("odd").unwrap().rows[0], vec![r#"{"v":1}"#]);
    }

    #[test]
    fn test_save_replaces_whole_value() {
        let mut store = MemoryStore::new();
        let mut c = sample();
        save(&mut store, "tablesData", &c).unwrap();
        c.remove("table_1");
        save(&mut store, "tablesData", &c).unwrap();
        let loaded = load(&store, "tablesData");
        assert_eq!(loaded.len(), 1);
        assert!(!loaded.contains("table_1"));
    }
}
