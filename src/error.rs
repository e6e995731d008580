//! Structured error types for tabledit.
//!
//! Every fallible operation in the crate returns [`Result`]. Nothing here is
//! fatal to the application: callers handle the error at the operation that
//! triggered it and fall back to a "no change made" state.

/// Why an import file was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    /// The file is not valid JSON.
    #[error("file is not valid JSON: {0}")]
    InvalidJson(String),

    /// The file is valid JSON but the top-level value is not an object.
    #[error("top-level JSON value is not an object")]
    NotAnObject,
}

/// All errors that can occur in tabledit.
#[derive(Debug, thiserror::Error)]
pub enum TableditError {
    /// A table id that is not in the collection.
    #[error("table not found: {0}")]
    NotFound(String),

    /// An editor operation was issued with no table open.
    #[error("no table is open")]
    NoTableOpen,

    /// A row or column index outside the open table.
    #[error("cell out of range: row {row:?}, column {col:?}")]
    CellOutOfRange {
        row: Option<usize>,
        col: Option<usize>,
    },

    /// A table must keep at least one column.
    #[error("cannot remove the last column")]
    LastColumn,

    /// An uploaded file could not be imported. No state was changed.
    #[error("import rejected: {0}")]
    MalformedImport(#[from] ImportError),

    /// The key-value store refused a read or write.
    #[error("storage: {0}")]
    Storage(String),

    /// JSON serialization failure.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableditError>;

impl TableditError {
    pub(crate) fn column_out_of_range(col: usize) -> Self {
        Self::CellOutOfRange {
            row: None,
            col: Some(col),
        }
    }

    pub(crate) fn row_out_of_range(row: usize) -> Self {
        Self::CellOutOfRange {
            row: Some(row),
            col: None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<TableditError> for wasm_bindgen::JsValue {
    fn from(e: TableditError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
