//! Table list view model.

use serde::Serialize;

use crate::store::TableStore;

/// One entry of the table list: a label and the id it opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableListEntry {
    pub id: String,
    pub title: String,
}

/// Entries for every table, in collection order.
#[must_use]
pub fn table_list(store: &TableStore) -> Vec<TableListEntry> {
    store
        .all()
        .into_iter()
        .map(|(id, title)| TableListEntry { id, title })
        .collect()
}
