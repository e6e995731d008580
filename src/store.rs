//! Table collection store: the in-memory source of truth for a session.

use tracing::debug;

use crate::config::AppConfig;
use crate::error::{Result, TableditError};
use crate::types::{Collection, Table};

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub(crate) fn now_ms() -> u64 {
    let ms = js_sys::Date::now();
    if ms.is_finite() && ms > 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let ms = ms as u64;
        ms
    } else {
        0
    }
}

/// Milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Produces `table_<millis>` ids that never repeat within a session.
///
/// If the clock has not moved past the last id handed out, or the candidate is
/// already taken, the suffix is bumped until it is free.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn next_id(&mut self, now_ms: u64, taken: impl Fn(&str) -> bool) -> String {
        let mut stamp = now_ms.max(self.last.saturating_add(1));
        loop {
            let id = format!("table_{stamp}");
            if !taken(&id) {
                self.last = stamp;
                return id;
            }
            stamp = stamp.saturating_add(1);
        }
    }
}

/// Holds every table plus the id of the table currently open, if any.
#[derive(Debug, Default)]
pub struct TableStore {
    collection: Collection,
    current: Option<String>,
    ids: IdGenerator,
}

impl TableStore {
    #[must_use]
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            current: None,
            ids: IdGenerator::default(),
        }
    }

    /// Insert a fresh table with the configured defaults and return its id.
    pub fn create(&mut self, config: &AppConfig) -> String {
        let collection = &self.collection;
        let id = self.ids.next_id(now_ms(), |id| collection.contains(id));
        let table = Table::new(config.default_title.clone(), config.default_columns());
        self.collection.insert(id.clone(), table);
        debug!(%id, "table created");
        id
    }

    pub fn get(&self, id: &str) -> Result<&Table> {
        self.collection
            .get(id)
            .ok_or_else(|| TableditError::NotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut Table> {
        self.collection
            .get_mut(id)
            .ok_or_else(|| TableditError::NotFound(id.to_string()))
    }

    /// Remove a table. Clears the current selection if it pointed at it.
    pub fn delete(&mut self, id: &str) -> Result<Table> {
        let table = self
            .collection
            .remove(id)
            .ok_or_else(|| TableditError::NotFound(id.to_string()))?;
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        debug!(%id, "table deleted");
        Ok(table)
    }

    pub fn set_current(&mut self, id: &str) -> Result<()> {
        if !self.collection.contains(id) {
            return Err(TableditError::NotFound(id.to_string()));
        }
        self.current = Some(id.to_string());
        Ok(())
    }

    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// `(id, title)` for every table, in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<(String, String)> {
        self.collection
            .iter()
            .map(|(id, t)| (id.to_string(), t.title.clone()))
            .collect()
    }

    /// Swap in a whole new collection. Nothing stays selected.
    pub fn replace(&mut self, collection: Collection) {
        self.collection = collection;
        self.current = None;
    }

    #[must_use]
    pub fn collection(&self) -> &Collection {
        &self.collection
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generator_is_monotonic() {
        let mut ids = IdGenerator::default();
        assert_eq!(ids.next_id(1000, |_| false), "table_1000");
        // Same millisecond
        assert_eq!(ids.next_id(1000, |_| false), "table_1001");
        // Clock went backwards
        assert_eq!(ids.next_id(10, |_| false), "table_1002");
        // Later clock wins
        assert_eq!(ids.next_id(5000, |_| false), "table_5000");
    }

    #[test]
    fn test_id_generator_skips_taken_ids() {
        let mut ids = IdGenerator::default();
        let id = ids.next_id(7, |id| id == "table_7" || id == "table_8");
        assert_eq!(id, "table_9");
    }

    #[test]
    fn test_create_uses_defaults() {
        let mut store = TableStore::default();
        let id = store.create(&AppConfig::default());
        let t = store.get(&id).unwrap();
        assert_eq!(t.title, "New Table");
        assert_eq!(t.columns, vec!["Column 1", "Column 2"]);
        assert_eq!(t.numeric_column, None);
        assert!(t.rows.is_empty());
    }

    #[test]
    fn test_rapid_creates_do_not_collide() {
        let mut store = TableStore::default();
        let config = AppConfig::default();
        let ids: Vec<_> = (0..50).map(|_| store.create(&config)).collect();
        assert_eq!(store.collection().len(), 50);
        let listed: Vec<_> = store.all().into_iter().map(|(id, _)| id).collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = TableStore::default();
        assert!(matches!(store.get("nope"), Err(TableditError::NotFound(id)) if id == "nope"));
    }

    #[test]
    fn test_delete_clears_current() {
        let mut store = TableStore::default();
        let config = AppConfig::default();
        let a = store.create(&config);
        let b = store.create(&config);
        store.set_current(&a).unwrap();

        store.delete(&b).unwrap();
        assert_eq!(store.current(), Some(a.as_str()));

        store.delete(&a).unwrap();
        assert_eq!(store.current(), None);
        assert!(store.delete(&a).is_err());
    }

    #[test]
    fn test_set_current_requires_known_id() {
        let mut store = TableStore::default();
        assert!(store.set_current("missing").is_err());
        assert_eq!(store.current(), None);
    }

    #[test]
    fn test_replace_clears_current() {
        let mut store = TableStore::default();
        let id = store.create(&AppConfig::default());
        store.set_current(&id).unwrap();
        store.replace(Collection::new());
        assert_eq!(store.current(), None);
        assert!(store.all().is_empty());
    }
}
