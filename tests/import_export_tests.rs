//! Tests for exporting and importing `tablesData.json` snapshots.

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use tabledit::app::{Decision, Notice, TableApp};
    use tabledit::config::DEFAULT_STORAGE_KEY;
    use tabledit::error::ImportError;
    use tabledit::interchange;
    use tabledit::storage::MemoryStore;
    use tabledit::TableditError;
    use test_case::test_case;

    const SINGLE_TABLE: &str =
        r#"{"t1":{"title":"X","columns":["a"],"numericColumn":null,"rows":[]}}"#;

    fn app_with_tables(n: usize) -> TableApp<MemoryStore> {
        let mut app = TableApp::new(MemoryStore::new());
        for _ in 0..n {
            app.create_table().unwrap();
        }
        app
    }

    // ================================================================
    // Export
    // ================================================================

    #[test]
    fn test_export_file_metadata() {
        let app = app_with_tables(1);
        let file = app.export().unwrap();
        assert_eq!(file.filename, "tablesData.json");
        assert_eq!(file.mime_type, "application/json");
    }

    #[test]
    fn test_export_is_pretty_with_two_space_indent() {
        let app = app_with_tables(1);
        let file = app.export().unwrap();
        assert!(file.contents.starts_with("{\n  \"table_"));
        assert!(file.contents.contains("\n    \"title\": \"New Table\""));
    }

    #[test]
    fn test_export_then_import_restores_collection() {
        let mut source = app_with_tables(3);
        source.set_title("Renamed").unwrap();
        source.save().unwrap();
        let file = source.export().unwrap();

        let mut target = app_with_tables(1);
        let pending = target.stage_import(&file.contents).unwrap();
        assert_eq!(pending.table_count(), 3);
        target.resolve_import(pending, Decision::Accept).unwrap();

        assert_eq!(
            target.tables().collection(),
            source.tables().collection()
        );
    }

    // ================================================================
    // Import
    // ================================================================

    #[test]
    fn test_import_replaces_everything() {
        let mut app = app_with_tables(2);
        let pending = app.stage_import(SINGLE_TABLE).unwrap();
        assert_eq!(
            pending.prompt(),
            "This will overwrite existing data. Continue?"
        );
        let notice = app.resolve_import(pending, Decision::Accept).unwrap();

        assert_eq!(notice, Some(Notice::Imported { tables: 1 }));
        assert_eq!(notice.unwrap().message(), "Data imported!");
        let list = app.table_list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "t1");
        assert_eq!(list[0].title, "X");
        assert!(app.draft().is_none());

        let blob: serde_json::Value =
            serde_json::from_str(app.storage().raw(DEFAULT_STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(blob, serde_json::from_str::<serde_json::Value>(SINGLE_TABLE).unwrap());
    }

    #[test]
    fn test_import_declined_changes_nothing() {
        let mut app = app_with_tables(2);
        let before = app.storage().raw(DEFAULT_STORAGE_KEY).unwrap().to_string();
        let pending = app.stage_import(SINGLE_TABLE).unwrap();
        let notice = app.resolve_import(pending, Decision::Decline).unwrap();

        assert_eq!(notice, None);
        assert_eq!(app.table_list().len(), 2);
        assert!(app.draft().is_some());
        assert_eq!(app.storage().raw(DEFAULT_STORAGE_KEY).unwrap(), before);
    }

    #[test]
    fn test_import_empty_object_clears_tables() {
        let mut app = app_with_tables(2);
        let pending = app.stage_import("{}").unwrap();
        app.resolve_import(pending, Decision::Accept).unwrap();
        assert!(app.table_list().is_empty());
        assert_eq!(app.storage().raw(DEFAULT_STORAGE_KEY), Some("{}"));
    }

    #[test_case("not json at all" ; "garbage")]
    #[test_case("{\"t1\": " ; "truncated")]
    fn test_import_rejects_invalid_json(text: &str) {
        let app = app_with_tables(1);
        assert!(matches!(
            app.stage_import(text),
            Err(TableditError::MalformedImport(ImportError::InvalidJson(_)))
        ));
    }

    #[test_case("\"not an object\"" ; "string")]
    #[test_case("[1, 2]" ; "array")]
    #[test_case("null" ; "null")]
    #[test_case("42" ; "number")]
    fn test_import_rejects_non_object(text: &str) {
        let app = app_with_tables(1);
        assert!(matches!(
            app.stage_import(text),
            Err(TableditError::MalformedImport(ImportError::NotAnObject))
        ));
    }

    #[test]
    fn test_import_accepts_object_cells_as_text() {
        let mut app = app_with_tables(1);
        let pending = app
            .stage_import(
                r#"{"t1":{"title":"X","columns":["A"],"numericColumn":null,"rows":[[{"v":1}]]}}"#,
            )
            .unwrap();
        app.resolve_import(pending, Decision::Accept).unwrap();

        let table = app.tables().get("t1").unwrap();
        assert_eq!(table.rows[0], vec![r#"{"v":1}"#]);
        assert_eq!(app.table_list()[0].title, "X");
    }

    #[test]
    fn test_import_coerces_foreign_table_shapes() {
        let collection = interchange::parse_import(
            r#"{"n":{"title":7,"columns":[1,true],"rows":[[2.5,null]]},"bare":{},"skip":5}"#,
        )
        .unwrap();
        assert_eq!(collection.ids().collect::<Vec<_>>(), vec!["n", "bare"]);

        let n = collection.get("n").unwrap();
        assert_eq!(n.title, "7");
        assert_eq!(n.columns, vec!["1", "true"]);
        assert_eq!(n.rows[0], vec!["2.5", ""]);

        let bare = collection.get("bare").unwrap();
        assert_eq!(bare.columns, vec!["Column 1"]);
        assert!(bare.rows.is_empty());
    }

    #[test]
    fn test_rejected_import_leaves_store_alone() {
        let mut app = app_with_tables(1);
        let before = app.storage().raw(DEFAULT_STORAGE_KEY).unwrap().to_string();
        assert!(app.stage_import("\"not an object\"").is_err());
        app.close();
        assert_eq!(app.table_list().len(), 1);
        assert_eq!(app.storage().raw(DEFAULT_STORAGE_KEY).unwrap(), before);
    }

    #[test]
    fn test_import_accepts_byte_order_mark() {
        let text = format!("\u{feff}{SINGLE_TABLE}");
        let collection = interchange::parse_import(&text).unwrap();
        assert_eq!(collection.get("t1").unwrap().title, "X");
    }

    #[test]
    fn test_imported_ragged_table_is_normalized() {
        let collection = interchange::parse_import(
            r#"{"t":{"title":"T","columns":["a","b"],"numericColumn":4,"rows":[["1"]]}}"#,
        )
        .unwrap();
        let table = collection.get("t").unwrap();
        assert_eq!(table.rows[0], vec!["1", ""]);
        assert_eq!(table.numeric_column, None);
    }
}
