//! Application configuration.
//!
//! All fields have defaults matching the shipped page, so `AppConfig::default()`
//! is what both the browser surface and the CLI normally run with. A page can
//! override them by passing a JSON object to the wasm constructor.

use serde::{Deserialize, Serialize};

/// Key under which the whole collection is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "tablesData";

/// File name offered for exports.
pub const DEFAULT_EXPORT_FILENAME: &str = "tablesData.json";

/// MIME type of exported files.
pub const EXPORT_MIME_TYPE: &str = "application/json";

/// Title given to freshly created tables.
pub const DEFAULT_TABLE_TITLE: &str = "New Table";

/// Runtime configuration for the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub storage_key: String,
    pub export_filename: String,
    pub default_title: String,
    /// Number of columns a new table starts with. Clamped to at least 1.
    pub default_column_count: usize,
    pub dom: DomIds,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            default_title: DEFAULT_TABLE_TITLE.to_string(),
            default_column_count: 2,
            dom: DomIds::default(),
        }
    }
}

impl AppConfig {
    /// Column names for a new table: `Column 1`, `Column 2`, ...
    #[must_use]
    pub fn default_columns(&self) -> Vec<String> {
        (1..=self.default_column_count.max(1))
            .map(column_name)
            .collect()
    }
}

/// Default name of the `n`th column (1-based).
#[must_use]
pub fn column_name(n: usize) -> String {
    format!("Column {n}")
}

/// Element ids the browser surface mounts onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomIds {
    /// `<ul>` holding one entry per table.
    pub table_list: String,
    /// Container shown while a table is open.
    pub editor: String,
    /// Editable title element.
    pub title: String,
    /// `<table>` with thead/tbody/tfoot sections.
    pub grid: String,
    /// `<select>` choosing the summed column.
    pub numeric_selector: String,
}

impl Default for DomIds {
    fn default() -> Self {
        Self {
            table_list: "tables".to_string(),
            editor: "table-editor".to_string(),
            title: "table-title".to_string(),
            grid: "table-grid".to_string(),
            numeric_selector: "numeric-column-selector".to_string(),
        }
    }
}
