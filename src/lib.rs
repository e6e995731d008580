//! tabledit - a spreadsheet-like table editor for the web
//!
//! Users create named tables, edit headers and cells in place, and can pick
//! one column whose values are summed in the footer:
//! - Tables persist as one JSON value in `localStorage`
//! - Export/import of the whole collection as `tablesData.json`
//! - Edits are staged in a draft and committed on save
//! - Destructive actions (delete, import) are confirmation-gated
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TablEdit } from 'tabledit';
//! await init();
//! const app = new TablEdit();
//! document.getElementById('new-table').onclick = () => app.new_table();
//! ```
//!
//! Natively, the same behavior is available through [`app::TableApp`] over
//! any [`storage::KeyValueStore`], which is what the tests and the
//! `tabledit_cli` binary use.

pub mod aggregate;
pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod interchange;
pub mod storage;
pub mod store;
pub mod types;

// Browser surface (DOM + localStorage)
#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use app::{Decision, Notice, TableApp};
pub use error::{Result, TableditError};
#[cfg(target_arch = "wasm32")]
pub use viewer::TablEdit;

pub use types::*;

/// Sum a column of cell strings the way the footer does.
///
/// Exposed for pages that want a total outside an open table.
#[wasm_bindgen]
#[must_use]
#[allow(clippy::needless_pass_by_value)]
pub fn sum_cells(cells: Vec<String>) -> f64 {
    aggregate::sum_cells(cells.iter().map(String::as_str))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
