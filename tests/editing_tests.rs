//! Tests for the editing session: create, edit, save, delete.
//!
//! Everything runs through `TableApp` over an in-memory store, so the
//! persisted blob can be inspected after each step.

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use tabledit::app::{Decision, Notice, TableApp};
    use tabledit::config::DEFAULT_STORAGE_KEY;
    use tabledit::storage::{self, MemoryStore};
    use tabledit::TableditError;

    // ================================================================
    // Test helpers
    // ================================================================

    fn new_app() -> TableApp<MemoryStore> {
        TableApp::new(MemoryStore::new())
    }

    /// The collection as it currently sits in storage.
    fn persisted(app: &TableApp<MemoryStore>) -> serde_json::Value {
        let raw = app
            .storage()
            .raw(DEFAULT_STORAGE_KEY)
            .expect("collection should be persisted");
        serde_json::from_str(raw).unwrap()
    }

    // ================================================================
    // Create
    // ================================================================

    #[test]
    fn test_new_table_defaults() {
        let mut app = new_app();
        let id = app.create_table().unwrap();

        assert!(id.starts_with("table_"));
        let table = app.tables().get(&id).unwrap();
        assert_eq!(table.title, "New Table");
        assert_eq!(table.columns, vec!["Column 1", "Column 2"]);
        assert!(table.rows.is_empty());
        assert_eq!(table.numeric_column, None);
    }

    #[test]
    fn test_new_table_is_persisted_and_opened() {
        let mut app = new_app();
        let id = app.create_table().unwrap();

        let blob = persisted(&app);
        assert_eq!(blob[&id]["title"], "New Table");
        assert_eq!(app.draft().unwrap().id(), id);
        assert!(!app.is_dirty());
    }

    #[test]
    fn test_new_table_ids_are_unique() {
        let mut app = new_app();
        let ids: Vec<String> = (0..20).map(|_| app.create_table().unwrap()).collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
        assert_eq!(app.table_list().len(), 20);
    }

    // ================================================================
    // Structure edits
    // ================================================================

    #[test]
    fn test_add_column_extends_every_row() {
        let mut app = new_app();
        app.create_table().unwrap();
        app.add_row().unwrap();
        app.add_row().unwrap();
        let col = app.add_column().unwrap();

        let table = app.draft().unwrap().table();
        assert_eq!(col, 2);
        assert_eq!(table.columns[2], "Column 3");
        assert_eq!(table.column_count(), 3);
        for row in &table.rows {
            assert_eq!(row.len(), 3);
            assert_eq!(row[2], "");
        }
    }

    #[test]
    fn test_added_row_is_blank() {
        let mut app = new_app();
        app.create_table().unwrap();
        app.add_column().unwrap();
        let row = app.add_row().unwrap();

        let table = app.draft().unwrap().table();
        assert_eq!(row, 0);
        assert_eq!(table.rows[0], vec!["", "", ""]);
    }

    #[test]
    fn test_structure_edits_stay_in_draft_until_save() {
        let mut app = new_app();
        let id = app.create_table().unwrap();
        app.add_row().unwrap();
        app.add_column().unwrap();

        assert!(app.is_dirty());
        assert!(persisted(&app)[&id]["rows"].as_array().unwrap().is_empty());
        assert_eq!(app.tables().get(&id).unwrap().column_count(), 2);

        assert_eq!(app.save().unwrap(), Notice::Saved);
        assert!(!app.is_dirty());
        assert_eq!(persisted(&app)[&id]["columns"].as_array().unwrap().len(), 3);
        assert_eq!(persisted(&app)[&id]["rows"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_last_column_is_refused() {
        let mut app = new_app();
        app.create_table().unwrap();
        app.remove_column(1).unwrap();
        assert!(matches!(
            app.remove_column(0),
            Err(TableditError::LastColumn)
        ));
        assert_eq!(app.draft().unwrap().table().column_count(), 1);
    }

    #[test]
    fn test_remove_numeric_column_clears_selection() {
        let mut app = new_app();
        app.create_table().unwrap();
        app.add_column().unwrap();
        app.select_numeric_column(Some(1)).unwrap();
        app.remove_column(1).unwrap();
        assert_eq!(app.draft().unwrap().table().numeric_column, None);
    }

    #[test]
    fn test_remove_column_before_numeric_shifts_selection() {
        let mut app = new_app();
        app.create_table().unwrap();
        app.add_column().unwrap();
        app.select_numeric_column(Some(2)).unwrap();
        app.remove_column(0).unwrap();
        assert_eq!(app.draft().unwrap().table().numeric_column, Some(1));
    }

    // ================================================================
    // Content edits
    // ================================================================

    #[test]
    fn test_cell_and_header_edits_round_trip_through_save() {
        let mut app = new_app();
        let id = app.create_table().unwrap();
        app.set_title("Groceries").unwrap();
        app.set_header(0, "Item").unwrap();
        app.set_header(1, "Price").unwrap();
        app.add_row().unwrap();
        app.set_cell(0, 0, "Milk").unwrap();
        app.set_cell(0, 1, "1.25").unwrap();
        app.save().unwrap();

        let blob = persisted(&app);
        assert_eq!(blob[&id]["title"], "Groceries");
        assert_eq!(blob[&id]["columns"][1], "Price");
        assert_eq!(blob[&id]["rows"][0][0], "Milk");
        assert_eq!(blob[&id]["rows"][0][1], "1.25");
        assert_eq!(app.table_list()[0].title, "Groceries");
    }

    #[test]
    fn test_out_of_range_cell_is_rejected() {
        let mut app = new_app();
        app.create_table().unwrap();
        app.add_row().unwrap();
        assert!(matches!(
            app.set_cell(1, 0, "x"),
            Err(TableditError::CellOutOfRange { .. })
        ));
        assert!(matches!(
            app.set_cell(0, 2, "x"),
            Err(TableditError::CellOutOfRange { .. })
        ));
        assert!(app.set_header(5, "x").is_err());
        assert!(!app.is_dirty());
    }

    #[test]
    fn test_unsaved_edits_are_dropped_on_open() {
        let mut app = new_app();
        let a = app.create_table().unwrap();
        app.set_title("Draft only").unwrap();
        app.create_table().unwrap();
        app.open_table(&a).unwrap();
        assert_eq!(app.draft().unwrap().table().title, "New Table");
    }

    #[test]
    fn test_close_drops_draft() {
        let mut app = new_app();
        let id = app.create_table().unwrap();
        app.set_title("Gone").unwrap();
        app.close();

        assert!(app.draft().is_none());
        assert_eq!(app.tables().current(), None);
        assert_eq!(app.tables().get(&id).unwrap().title, "New Table");
    }

    // ================================================================
    // Footer
    // ================================================================

    #[test]
    fn test_footer_sums_numeric_column() {
        let mut app = new_app();
        app.create_table().unwrap();
        for (row, value) in ["3", "abc", "2.5"].iter().enumerate() {
            app.add_row().unwrap();
            app.set_cell(row, 0, value).unwrap();
        }
        app.select_numeric_column(Some(0)).unwrap();

        let view = app.view().unwrap();
        assert_eq!(view.footer, vec!["Total: 5.5", ""]);
    }

    #[test]
    fn test_footer_blank_without_numeric_column() {
        let mut app = new_app();
        app.create_table().unwrap();
        app.add_row().unwrap();
        app.set_cell(0, 0, "7").unwrap();

        let view = app.view().unwrap();
        assert!(view.footer.iter().all(String::is_empty));
    }

    #[test]
    fn test_footer_tracks_live_edits() {
        let mut app = new_app();
        app.create_table().unwrap();
        app.select_numeric_column(Some(1)).unwrap();
        app.add_row().unwrap();
        app.set_cell(0, 1, "10").unwrap();
        assert_eq!(app.draft().unwrap().footer()[1], "Total: 10");
        app.set_cell(0, 1, "12px").unwrap();
        assert_eq!(app.draft().unwrap().footer()[1], "Total: 12");
    }

    #[test]
    fn test_selector_marks_current_choice() {
        let mut app = new_app();
        app.create_table().unwrap();
        app.select_numeric_column(Some(1)).unwrap();

        let options = app.view().unwrap().numeric_options;
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].value, None);
        assert_eq!(options[0].label, "-- None --");
        assert!(options[2].selected);
        assert!(!options[0].selected);
    }

    // ================================================================
    // Delete
    // ================================================================

    #[test]
    fn test_delete_accepted_removes_and_persists() {
        let mut app = new_app();
        let keep = app.create_table().unwrap();
        let doomed = app.create_table().unwrap();

        let pending = app.request_delete().unwrap();
        assert_eq!(pending.id(), doomed);
        assert_eq!(pending.prompt(), "Delete this table?");
        let notice = app.resolve_delete(pending, Decision::Accept).unwrap();

        assert_eq!(notice, Some(Notice::Deleted));
        assert!(app.draft().is_none());
        let ids: Vec<String> = app.table_list().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![keep.clone()]);
        let blob = persisted(&app);
        assert!(blob.get(&doomed).is_none());
        assert!(blob.get(&keep).is_some());
    }

    #[test]
    fn test_delete_declined_changes_nothing() {
        let mut app = new_app();
        let id = app.create_table().unwrap();
        let before = app.storage().raw(DEFAULT_STORAGE_KEY).unwrap().to_string();

        let pending = app.request_delete().unwrap();
        let notice = app.resolve_delete(pending, Decision::Decline).unwrap();

        assert_eq!(notice, None);
        assert_eq!(app.draft().unwrap().id(), id);
        assert_eq!(app.storage().raw(DEFAULT_STORAGE_KEY).unwrap(), before);
    }

    #[test]
    fn test_session_survives_restart() {
        let mut app = new_app();
        let id = app.create_table().unwrap();
        app.set_title("Budget").unwrap();
        app.add_row().unwrap();
        app.set_cell(0, 1, "42").unwrap();
        app.select_numeric_column(Some(1)).unwrap();
        app.save().unwrap();

        let store = app.into_storage();
        let reloaded = storage::load(&store, DEFAULT_STORAGE_KEY);
        let mut app = TableApp::new(store);
        assert_eq!(app.tables().collection(), &reloaded);

        app.open_table(&id).unwrap();
        let view = app.view().unwrap();
        assert_eq!(view.title, "Budget");
        assert_eq!(view.footer[1], "Total: 42");
    }
}
