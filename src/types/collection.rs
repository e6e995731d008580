use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::Table;

/// Every table in the session, keyed by id, in insertion order.
///
/// Serializes as a single JSON object so the whole collection can be written
/// and read back as one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    tables: IndexMap<String, Table>,
}

impl Collection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.tables.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Table> {
        self.tables.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Table> {
        self.tables.get_mut(id)
    }

    /// Insert or replace a table. A new id goes to the end of the order.
    pub fn insert(&mut self, id: impl Into<String>, table: Table) -> Option<Table> {
        self.tables.insert(id.into(), table)
    }

    /// Remove a table, keeping the order of the others.
    pub fn remove(&mut self, id: &str) -> Option<Table> {
        self.tables.shift_remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(id, t)| (id.as_str(), t))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Normalize every table. Returns the number of tables that changed.
    pub fn normalize(&mut self) -> usize {
        self.tables
            .values_mut()
            .map(Table::normalize)
            .filter(|changed| *changed)
            .count()
    }
}

impl Collection {
    /// Decode the entries of a top-level JSON object one table at a time.
    ///
    /// A bad entry never costs the others: every object entry becomes a
    /// normalized table, and only entries that are not objects at all are
    /// skipped. Returns the collection and the skipped ids.
    pub fn from_entries(entries: Map<String, Value>) -> (Self, Vec<String>) {
        let mut collection = Self::new();
        let mut skipped = Vec::new();
        for (id, entry) in entries {
            match serde_json::from_value::<Table>(entry) {
                Ok(mut table) => {
                    table.normalize();
                    collection.insert(id, table);
                }
                Err(e) => {
                    warn!(%id, error = %e, "skipping entry that is not a table");
                    skipped.push(id);
                }
            }
        }
        (collection, skipped)
    }
}

impl FromIterator<(String, Table)> for Collection {
    fn from_iter<I: IntoIterator<Item = (String, Table)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
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
    fn test_insertion_order_survives_removal_and_json() {
        let mut c = Collection::new();
        for id in ["table_3", "table_1", "table_2"] {
            c.insert(id, Table::new(id, vec!["A".into()]));
        }
        c.remove("table_1");
        let ids: Vec<_> = c.ids().collect();
        assert_eq!(ids, vec!["table_3", "table_2"]);

        let json = serde_json::to_string(&c).unwrap();
        let back: Collection = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ids().collect::<Vec<_>>(), ids);
        assert_eq!(back, c);
    }

    #[test]
    fn test_normalize_counts_changed_tables() {
        let mut c = Collection::new();
        let mut bad = Table::new("bad", vec!["A".into(), "B".into()]);
        bad.rows.push(vec!["only one".into()]);
        c.insert("bad", bad);
        c.insert("good", Table::new("good", vec!["A".into()]));
        assert_eq!(c.normalize(), 1);
        assert_eq!(c.get("bad").unwrap().rows[0], vec!["only one", ""]);
    }

    #[test]
    fn test_from_entries_keeps_good_tables_around_bad_ones() {
        let Value::Object(entries) = serde_json::json!({
            "good": {"title": "Keep me", "columns": ["A"], "rows": [["1"]]},
            "odd": {"title": 42, "columns": ["A", "B"], "rows": [[{"v": 1}]]},
            "scalar": 5,
            "last": {"title": "Also kept", "columns": ["Z"]}
        }) else {
            panic!("literal is an object");
        };
        let (c, skipped) = Collection::from_entries(entries);

        assert_eq!(c.ids().collect::<Vec<_>>(), vec!["good", "odd", "last"]);
        assert_eq!(skipped, vec!["scalar"]);
        assert_eq!(c.get("good").unwrap().title, "Keep me");
        let odd = c.get("odd").unwrap();
        assert_eq!(odd.title, "42");
        assert_eq!(odd.rows[0], vec![r#"{"v":1}"#, ""]);
    }
}
