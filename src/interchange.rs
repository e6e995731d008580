//! JSON snapshot import and export.
//!
//! Export writes the whole collection as pretty-printed JSON (2-space
//! indent), the same shape as the persisted value. Import accepts any text
//! whose top-level JSON value is an object of tables; it never touches state
//! itself, the controller decides whether to apply the result.

use serde::Serialize;
use tracing::warn;

use crate::config::EXPORT_MIME_TYPE;
use crate::error::{ImportError, Result};
use crate::types::Collection;

/// A file ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: String,
    pub contents: String,
}

/// Serialize the collection for download.
pub fn export(collection: &Collection, filename: &str) -> Result<ExportFile> {
    Ok(ExportFile {
        filename: filename.to_string(),
        mime_type: EXPORT_MIME_TYPE.to_string(),
        contents: serde_json::to_string_pretty(collection)?,
    })
}

/// Parse an uploaded snapshot.
///
/// Rejects only text that is not JSON and JSON whose top level is not an
/// object (arrays and `null` included). Inside the object every entry is
/// taken as a table: odd field types become text, missing fields default,
/// and rows are normalized to the column count. Entries that are not
/// objects at all are skipped.
pub fn parse_import(text: &str) -> Result<Collection> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
    let serde_json::Value::Object(entries) = value else {
        return Err(ImportError::NotAnObject.into());
    };

    let (collection, skipped) = Collection::from_entries(entries);
    if !skipped.is_empty() {
        warn!(?skipped, "import skipped entries that are not tables");
    }
    Ok(collection)
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
    use crate::error::TableditError;
    use crate::types::Table;
    use test_case::test_case;

    #[test]
    fn test_export_is_pretty_with_two_spaces() {
        let mut c = Collection::new();
        c.insert("t1", Table::new("X", vec!["A".into()]));
        let file = export(&c, "tablesData.json").unwrap();
        assert_eq!(file.filename, "tablesData.json");
        assert_eq!(file.mime_type, "application/json");
        assert!(file.contents.starts_with("{\n  \"t1\": {\n    \"title\": \"X\""));
    }

    #[test]
    fn test_export_then_import_preserves_collection() {
        let mut c = Collection::new();
        let mut t = Table::new("Budget", vec!["Item".into(), "Cost".into()]);
        t.rows.push(vec!["Rent".into(), "1200".into()]);
        t.numeric_column = Some(1);
        c.insert("table_2", t);
        c.insert("table_1", Table::new("Other", vec!["A".into()]));

        let file = export(&c, "tablesData.json").unwrap();
        assert_eq!(parse_import(&file.contents).unwrap(), c);
    }

    #[test]
    fn test_import_accepts_example_document() {
        let c = parse_import(
            r#"{"t1":{"title":"X","columns":["A"],"numericColumn":null,"rows":[["1"]]}}"#,
        )
        .unwrap();
        assert_eq!(c.len(), 1);
        let t = c.get("t1").unwrap();
        assert_eq!(t.title, "X");
        assert_eq!(t.rows, vec![vec!["1".to_string()]]);
    }

    #[test]
    fn test_import_strips_bom() {
        assert!(parse_import("\u{feff}{}").unwrap().is_empty());
    }

    #[test_case("not json at all"; "garbage")]
    #[test_case("{\"t1\": "; "truncated")]
    #[test_case(""; "empty file")]
    fn test_import_rejects_invalid_json(text: &str) {
        assert!(matches!(
            parse_import(text),
            Err(TableditError::MalformedImport(ImportError::InvalidJson(_)))
        ));
    }

    #[test_case("\"not an object\""; "string")]
    #[test_case("[]"; "array")]
    #[test_case("null"; "null")]
    #[test_case("42"; "number")]
    fn test_import_rejects_non_objects(text: &str) {
        assert!(matches!(
            parse_import(text),
            Err(TableditError::MalformedImport(ImportError::NotAnObject))
        ));
    }

    #[test]
    fn test_import_accepts_odd_table_shapes() {
        let c = parse_import(
            r#"{"good":{"title":"A","columns":["x"]},"odd":{"title":3},"cells":{"title":"X","columns":["A"],"numericColumn":null,"rows":[[{"v":1}]]},"scalar":5}"#,
        )
        .unwrap();
        assert_eq!(c.ids().collect::<Vec<_>>(), vec!["good", "odd", "cells"]);

        let odd = c.get("odd").unwrap();
        assert_eq!(odd.title, "3");
        assert_eq!(odd.columns, vec!["Column 1"]);
        assert!(odd.rows.is_empty());

        assert_eq!(c.get("cells").unwrap().rows[0], vec![r#"{"v":1}"#]);
    }

    #[test]
    fn test_import_normalizes_ragged_rows() {
        let c = parse_import(
            r#"{"t":{"title":"T","columns":["A","B"],"numericColumn":5,"rows":[["1"],["1","2","3"]]}}"#,
        )
        .unwrap();
        let t = c.get("t").unwrap();
        assert_eq!(t.rows, vec![vec!["1", ""], vec!["1", "2"]]);
        assert_eq!(t.numeric_column, None);
    }
}
