//! Table editor: the draft being edited and the view model rendered from it.
//!
//! The view never holds state of its own. Inputs write into [`TableDraft`]
//! as the user types, and every render is rebuilt from [`TableView`].

mod draft;
pub mod list;

pub use draft::TableDraft;
pub use list::{table_list, TableListEntry};

use serde::Serialize;

/// Label of the selector entry meaning "no numeric column".
pub const NONE_OPTION_LABEL: &str = "-- None --";

/// One option of the numeric-column selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOption {
    /// Column index, `None` for the sentinel.
    pub value: Option<usize>,
    pub label: String,
    pub selected: bool,
}

/// Everything needed to render an open table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub id: String,
    pub title: String,
    pub header: Vec<String>,
    pub body: Vec<Vec<String>>,
    pub footer: Vec<String>,
    pub numeric_options: Vec<SelectorOption>,
    pub dirty: bool,
}

impl TableView {
    #[must_use]
    pub fn from_draft(draft: &TableDraft) -> Self {
        let table = draft.table();
        Self {
            id: draft.id().to_string(),
            title: table.title.clone(),
            header: table.columns.clone(),
            body: table.rows.clone(),
            footer: draft.footer(),
            numeric_options: numeric_options(&table.columns, table.numeric_column),
            dirty: draft.is_dirty(),
        }
    }
}

/// The `-- None --` sentinel followed by one option per column, with the
/// current selection marked.
#[must_use]
pub fn numeric_options(columns: &[String], selected: Option<usize>) -> Vec<SelectorOption> {
    std::iter::once(SelectorOption {
        value: None,
        label: NONE_OPTION_LABEL.to_string(),
        selected: selected.is_none(),
    })
    .chain(columns.iter().enumerate().map(|(i, name)| SelectorOption {
        value: Some(i),
        label: name.clone(),
        selected: selected == Some(i),
    }))
    .collect()
}
