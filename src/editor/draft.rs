//! The open table's working copy.
//!
//! Every edit made in the view lands here first. Nothing reaches the
//! collection until the controller commits the draft on save, so rows and
//! columns added in the editor are both staged until then.

use crate::aggregate;
use crate::error::{Result, TableditError};
use crate::types::Table;

/// Working copy of one table plus the snapshot it was opened from.
#[derive(Debug, Clone)]
pub struct TableDraft {
    id: String,
    table: Table,
    /// Last committed state, for dirty tracking.
    saved: Table,
}

impl TableDraft {
    pub(crate) fn open(id: impl Into<String>, table: &Table) -> Self {
        Self {
            id: id.into(),
            table: table.clone(),
            saved: table.clone(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Whether the draft differs from the last committed state.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.table != self.saved
    }

    pub(crate) fn mark_saved(&mut self) {
        self.saved = self.table.clone();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.table.title = title.into();
    }

    pub fn set_header(&mut self, col: usize, text: impl Into<String>) -> Result<()> {
        let slot = self
            .table
            .columns
            .get_mut(col)
            .ok_or_else(|| TableditError::column_out_of_range(col))?;
        *slot = text.into();
        Ok(())
    }

    pub fn set_cell(&mut self, row: usize, col: usize, text: impl Into<String>) -> Result<()> {
        let slot = self
            .table
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(TableditError::CellOutOfRange {
                row: Some(row),
                col: Some(col),
            })?;
        *slot = text.into();
        Ok(())
    }

    /// Append an empty row. Returns its index.
    pub fn add_row(&mut self) -> usize {
        self.table.push_empty_row();
        self.table.rows.len() - 1
    }

    /// Append a default-named column, extending every row. Returns its index.
    pub fn add_column(&mut self) -> usize {
        self.table.push_default_column()
    }

    pub fn remove_row(&mut self, row: usize) -> Result<()> {
        self.table.remove_row(row).map(|_| ())
    }

    pub fn remove_column(&mut self, col: usize) -> Result<()> {
        self.table.remove_column(col).map(|_| ())
    }

    pub fn select_numeric_column(&mut self, col: Option<usize>) -> Result<()> {
        self.table.set_numeric_column(col)
    }

    /// Footer cells computed from the current draft.
    #[must_use]
    pub fn footer(&self) -> Vec<String> {
        aggregate::footer_row(
            self.table.column_count(),
            &self.table.rows,
            self.table.numeric_column,
        )
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

    fn draft() -> TableDraft {
        let mut t = Table::new("T", vec!["Item".into(), "Cost".into()]);
        t.rows.push(vec!["Rent".into(), "1200".into()]);
        TableDraft::open("table_1", &t)
    }

    #[test]
    fn test_fresh_draft_is_clean() {
        assert!(!draft().is_dirty());
    }

    #[test]
    fn test_edits_mark_dirty_until_saved() {
        let mut d = draft();
        d.set_cell(0, 1, "1300").unwrap();
        assert!(d.is_dirty());
        d.mark_saved();
        assert!(!d.is_dirty());
        d.set_cell(0, 1, "1300").unwrap();
        assert!(!d.is_dirty());
    }

    #[test]
    fn test_add_column_keeps_rows_rectangular() {
        let mut d = draft();
        d.add_row();
        let col = d.add_column();
        assert_eq!(col, 2);
        let t = d.table();
        assert_eq!(t.columns[2], "Column 3");
        for row in &t.rows {
            assert_eq!(row.len(), t.columns.len());
            assert_eq!(row[2], "");
        }
    }

    #[test]
    fn test_out_of_range_edits_are_rejected() {
        let mut d = draft();
        assert!(matches!(
            d.set_cell(3, 0, "x"),
            Err(TableditError::CellOutOfRange {
                row: Some(3),
                col: Some(0)
            })
        ));
        assert!(d.set_header(9, "x").is_err());
        assert!(d.select_numeric_column(Some(2)).is_err());
        assert!(!d.is_dirty());
    }

    #[test]
    fn test_footer_tracks_selection() {
        let mut d = draft();
        let r = d.add_row();
        d.set_cell(r, 1, "50.5").unwrap();
        assert_eq!(d.footer(), vec!["", ""]);
        d.select_numeric_column(Some(1)).unwrap();
        assert_eq!(d.footer(), vec!["", "Total: 1250.5"]);
        d.remove_column(1).unwrap();
        assert_eq!(d.footer(), vec![""]);
    }
}
