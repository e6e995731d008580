//! Top-level controller.
//!
//! `TableApp` owns every piece of session state: the table store, the
//! backing key-value store, the configuration and the draft of the open
//! table. Presentation layers (the browser surface, the CLI) only call its
//! methods and render what it returns.
//!
//! Destructive actions are two-phase. `request_delete` and `stage_import`
//! return a pending action carrying the prompt to show; the presentation
//! layer asks the user however it likes and hands the answer back through
//! `resolve_delete` / `resolve_import`.

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::editor::{table_list, TableDraft, TableListEntry, TableView};
use crate::error::{Result, TableditError};
use crate::interchange::{self, ExportFile};
use crate::storage::{self, KeyValueStore};
use crate::store::TableStore;
use crate::types::Collection;

/// Prompt shown before deleting the open table.
pub const DELETE_PROMPT: &str = "Delete this table?";

/// Prompt shown before an import replaces every table.
pub const IMPORT_PROMPT: &str = "This will overwrite existing data. Continue?";

/// The user's answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Decline,
}

impl From<bool> for Decision {
    fn from(accepted: bool) -> Self {
        if accepted {
            Self::Accept
        } else {
            Self::Decline
        }
    }
}

/// Outcome worth telling the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved,
    Deleted,
    Imported { tables: usize },
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Saved => "Table saved!",
            Self::Deleted => "Table deleted.",
            Self::Imported { .. } => "Data imported!",
        }
    }
}

/// A delete waiting for confirmation.
#[derive(Debug)]
#[must_use = "a pending delete does nothing until resolved"]
pub struct PendingDelete {
    id: String,
}

impl PendingDelete {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> &'static str {
        DELETE_PROMPT
    }
}

/// A parsed import waiting for confirmation.
#[derive(Debug)]
#[must_use = "a pending import does nothing until resolved"]
pub struct PendingImport {
    collection: Collection,
}

impl PendingImport {
    pub fn prompt(&self) -> &'static str {
        IMPORT_PROMPT
    }

    /// Number of tables the import would install.
    pub fn table_count(&self) -> usize {
        self.collection.len()
    }
}

/// Application state and every user-facing operation.
pub struct TableApp<S: KeyValueStore> {
    config: AppConfig,
    storage: S,
    tables: TableStore,
    draft: Option<TableDraft>,
}

impl<S: KeyValueStore> TableApp<S> {
    /// Start a session from whatever `storage` holds, with default config.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, AppConfig::default())
    }

    /// Start a session from whatever `storage` holds.
    pub fn with_config(storage: S, config: AppConfig) -> Self {
        let collection = storage::load(&storage, &config.storage_key);
        debug!(tables = collection.len(), "session started");
        Self {
            config,
            storage,
            tables: TableStore::new(collection),
            draft: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn tables(&self) -> &TableStore {
        &self.tables
    }

    pub fn table_list(&self) -> Vec<TableListEntry> {
        table_list(&self.tables)
    }

    fn persist(&mut self) -> Result<()> {
        storage::save(
            &mut self.storage,
            &self.config.storage_key,
            self.tables.collection(),
        )
    }

    /// Create a default table, persist, and open it.
    pub fn create_table(&mut self) -> Result<String> {
        let id = self.tables.create(&self.config);
        self.persist()?;
        self.open_table(&id)?;
        info!(%id, "new table");
        Ok(id)
    }

    /// Open a table for editing, discarding any other open draft.
    pub fn open_table(&mut self, id: &str) -> Result<&TableDraft> {
        let table = self.tables.get(id)?;
        let draft = TableDraft::open(id, table);
        self.tables.set_current(id)?;
        Ok(self.draft.insert(draft))
    }

    pub fn draft(&self) -> Option<&TableDraft> {
        self.draft.as_ref()
    }

    fn draft_mut(&mut self) -> Result<&mut TableDraft> {
        self.draft.as_mut().ok_or(TableditError::NoTableOpen)
    }

    /// The open table as it should be rendered.
    pub fn view(&self) -> Option<TableView> {
        self.draft.as_ref().map(TableView::from_draft)
    }

    pub fn is_dirty(&self) -> bool {
        self.draft.as_ref().is_some_and(TableDraft::is_dirty)
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.draft_mut()?.set_title(title);
        Ok(())
    }

    pub fn set_header(&mut self, col: usize, text: &str) -> Result<()> {
        self.draft_mut()?.set_header(col, text)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, text: &str) -> Result<()> {
        self.draft_mut()?.set_cell(row, col, text)
    }

    /// Stage an empty row. Returns its index.
    pub fn add_row(&mut self) -> Result<usize> {
        Ok(self.draft_mut()?.add_row())
    }

    /// Stage a default-named column. Returns its index.
    pub fn add_column(&mut self) -> Result<usize> {
        Ok(self.draft_mut()?.add_column())
    }

    pub fn remove_row(&mut self, row: usize) -> Result<()> {
        self.draft_mut()?.remove_row(row)
    }

    pub fn remove_column(&mut self, col: usize) -> Result<()> {
        self.draft_mut()?.remove_column(col)
    }

    pub fn select_numeric_column(&mut self, col: Option<usize>) -> Result<()> {
        self.draft_mut()?.select_numeric_column(col)
    }

    /// Commit the draft to the collection and persist everything.
    pub fn save(&mut self) -> Result<Notice> {
        let draft = self.draft.as_ref().ok_or(TableditError::NoTableOpen)?;
        let id = draft.id().to_string();
        *self.tables.get_mut(&id)? = draft.table().clone();
        self.persist()?;
        if let Some(draft) = self.draft.as_mut() {
            draft.mark_saved();
        }
        info!(%id, "table saved");
        Ok(Notice::Saved)
    }

    /// Close the editor. Unsaved draft edits are dropped.
    pub fn close(&mut self) {
        if let Some(draft) = self.draft.take() {
            if draft.is_dirty() {
                debug!(id = draft.id(), "closed with unsaved edits");
            }
        }
        self.tables.clear_current();
    }

    /// Ask to delete the open table.
    pub fn request_delete(&self) -> Result<PendingDelete> {
        let draft = self.draft.as_ref().ok_or(TableditError::NoTableOpen)?;
        Ok(PendingDelete {
            id: draft.id().to_string(),
        })
    }

    /// Apply or drop a pending delete. Declining changes nothing.
    pub fn resolve_delete(
        &mut self,
        pending: PendingDelete,
        decision: Decision,
    ) -> Result<Option<Notice>> {
        if decision == Decision::Decline {
            debug!(id = %pending.id, "delete declined");
            return Ok(None);
        }
        self.tables.delete(&pending.id)?;
        self.persist()?;
        if self.draft.as_ref().is_some_and(|d| d.id() == pending.id) {
            self.close();
        }
        info!(id = %pending.id, "table deleted");
        Ok(Some(Notice::Deleted))
    }

    /// Snapshot of every table, ready for download.
    pub fn export(&self) -> Result<ExportFile> {
        interchange::export(self.tables.collection(), &self.config.export_filename)
    }

    /// Parse an uploaded snapshot without applying it.
    pub fn stage_import(&self, text: &str) -> Result<PendingImport> {
        let collection = interchange::parse_import(text)?;
        Ok(PendingImport { collection })
    }

    /// Replace every table with a staged import, or drop it.
    pub fn resolve_import(
        &mut self,
        pending: PendingImport,
        decision: Decision,
    ) -> Result<Option<Notice>> {
        if decision == Decision::Decline {
            debug!("import declined");
            return Ok(None);
        }
        let tables = pending.collection.len();
        self.close();
        self.tables.replace(pending.collection);
        self.persist()?;
        info!(tables, "collection imported");
        Ok(Some(Notice::Imported { tables }))
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
    use crate::storage::MemoryStore;

    #[test]
    fn test_edits_require_open_table() {
        let mut app = TableApp::new(MemoryStore::new());
        assert!(matches!(app.add_row(), Err(TableditError::NoTableOpen)));
        assert!(matches!(app.save(), Err(TableditError::NoTableOpen)));
        assert!(app.request_delete().is_err());
        assert!(app.view().is_none());
    }

    #[test]
    fn test_open_replaces_previous_draft() {
        let mut app = TableApp::new(MemoryStore::new());
        let a = app.create_table().unwrap();
        app.add_row().unwrap();
        let b = app.create_table().unwrap();
        assert_eq!(app.draft().unwrap().id(), b);
        assert_eq!(app.tables().current(), Some(b.as_str()));
        app.open_table(&a).unwrap();
        assert!(app.tables().get(&a).unwrap().rows.is_empty());
    }

    #[test]
    fn test_open_unknown_table_keeps_state() {
        let mut app = TableApp::new(MemoryStore::new());
        let id = app.create_table().unwrap();
        assert!(matches!(
            app.open_table("missing"),
            Err(TableditError::NotFound(_))
        ));
        assert_eq!(app.draft().unwrap().id(), id);
    }

    #[test]
    fn test_decision_from_bool() {
        assert_eq!(Decision::from(true), Decision::Accept);
        assert_eq!(Decision::from(false), Decision::Decline);
    }
}
