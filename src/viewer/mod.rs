//! Main `TablEdit` struct - the browser entry point.
//!
//! This module provides the WASM-exported `TablEdit` struct that handles:
//! - Loading the collection from `localStorage` on startup
//! - Rendering the table list and the open table into existing page elements
//! - Binding cell/header/title edits and the numeric-column selector to the draft
//! - Export downloads and confirmation-gated import and delete
//!
//! Static page controls (new table, add row, save, ...) call the exported
//! methods; listeners for elements the viewer creates itself are registered
//! here and dropped whenever those elements are rebuilt.

mod console;
mod dialogs;
mod events;
mod files;
mod render;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::Event;

use crate::app::TableApp;
use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::{KeyValueStore, LocalStorage, MemoryStore};

/// `localStorage` when the page allows it, memory otherwise (private mode,
/// sandboxed iframes). The in-memory fallback loses data on reload.
pub(crate) enum BrowserStore {
    Local(LocalStorage),
    Memory(MemoryStore),
}

impl BrowserStore {
    fn detect() -> Self {
        match LocalStorage::from_window() {
            Some(local) => Self::Local(local),
            None => {
                warn!("localStorage unavailable, tables will not survive a reload");
                Self::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match self {
            Self::Local(s) => s.get_item(key),
            Self::Memory(s) => s.get_item(key),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::Local(s) => s.set_item(key, value),
            Self::Memory(s) => s.set_item(key, value),
        }
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        match self {
            Self::Local(s) => s.remove_item(key),
            Self::Memory(s) => s.remove_item(key),
        }
    }
}

/// State shared between the exported struct and DOM listeners.
pub(crate) struct Shared {
    pub(crate) app: RefCell<TableApp<BrowserStore>>,
    /// Listeners on list entries; replaced on every list render.
    pub(crate) list_closures: RefCell<Vec<Closure<dyn FnMut(Event)>>>,
    /// Listeners on editor cells and the selector; replaced on every editor render.
    pub(crate) editor_closures: RefCell<Vec<Closure<dyn FnMut(Event)>>>,
}

/// The table editor exported to JavaScript.
#[wasm_bindgen]
pub struct TablEdit {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl TablEdit {
    /// Mount onto the page using the default element ids.
    #[wasm_bindgen(constructor)]
    pub fn new() -> TablEdit {
        Self::build(AppConfig::default())
    }

    /// Mount with a partial configuration object (`{ storageKey, dom: {...} }`).
    #[wasm_bindgen(js_name = "withConfig")]
    pub fn with_config(config: JsValue) -> std::result::Result<TablEdit, JsValue> {
        let config: AppConfig = if config.is_undefined() || config.is_null() {
            AppConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?
        };
        Ok(Self::build(config))
    }

    fn build(config: AppConfig) -> TablEdit {
        console_error_panic_hook::set_once();
        console::init();
        let app = TableApp::with_config(BrowserStore::detect(), config);
        let shared = Rc::new(Shared {
            app: RefCell::new(app),
            list_closures: RefCell::new(Vec::new()),
            editor_closures: RefCell::new(Vec::new()),
        });
        render::render_list(&shared);
        render::hide_editor(&shared);
        TablEdit { shared }
    }

    /// Create a table and open it.
    #[wasm_bindgen]
    pub fn new_table(&self) -> std::result::Result<String, JsValue> {
        let id = self.shared.app.borrow_mut().create_table()?;
        render::render_list(&self.shared);
        render::render_editor(&self.shared);
        Ok(id)
    }

    /// Open a table by id.
    #[wasm_bindgen]
    pub fn open_table(&self, id: &str) -> std::result::Result<(), JsValue> {
        events::open_table(&self.shared, id)
    }

    #[wasm_bindgen]
    pub fn add_row(&self) -> std::result::Result<(), JsValue> {
        self.shared.app.borrow_mut().add_row()?;
        render::render_editor(&self.shared);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn add_column(&self) -> std::result::Result<(), JsValue> {
        self.shared.app.borrow_mut().add_column()?;
        render::render_editor(&self.shared);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn remove_row(&self, row: usize) -> std::result::Result<(), JsValue> {
        self.shared.app.borrow_mut().remove_row(row)?;
        render::render_editor(&self.shared);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn remove_column(&self, col: usize) -> std::result::Result<(), JsValue> {
        self.shared.app.borrow_mut().remove_column(col)?;
        render::render_editor(&self.shared);
        Ok(())
    }

    /// Commit the open table and persist.
    #[wasm_bindgen]
    pub fn save_table(&self) -> std::result::Result<(), JsValue> {
        let notice = self.shared.app.borrow_mut().save()?;
        dialogs::alert(notice.message());
        render::render_list(&self.shared);
        render::render_footer(&self.shared);
        Ok(())
    }

    /// Delete the open table after confirmation.
    #[wasm_bindgen]
    pub fn delete_current_table(&self) -> std::result::Result<(), JsValue> {
        let pending = self.shared.app.borrow().request_delete()?;
        let decision = dialogs::confirm(pending.prompt());
        let outcome = self
            .shared
            .app
            .borrow_mut()
            .resolve_delete(pending, decision)?;
        if outcome.is_some() {
            render::hide_editor(&self.shared);
            render::render_list(&self.shared);
        }
        Ok(())
    }

    /// Hide the editor. Unsaved edits are dropped.
    #[wasm_bindgen]
    pub fn close_editor(&self) {
        self.shared.app.borrow_mut().close();
        render::hide_editor(&self.shared);
    }

    /// Download every table as `tablesData.json`.
    #[wasm_bindgen]
    pub fn export_json(&self) -> std::result::Result<(), JsValue> {
        let file = self.shared.app.borrow().export()?;
        files::download_text(&file.filename, &file.mime_type, &file.contents)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Import a user-selected file. Resolves once the file has been read and
    /// the user has answered the overwrite prompt.
    #[wasm_bindgen]
    pub fn import_file(&self, file: web_sys::File) -> js_sys::Promise {
        let shared = Rc::clone(&self.shared);
        wasm_bindgen_futures::future_to_promise(async move {
            events::import_file(&shared, file).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// `[{ id, title }, ...]` for every table.
    #[wasm_bindgen]
    pub fn table_list(&self) -> std::result::Result<JsValue, JsValue> {
        let list = self.shared.app.borrow().table_list();
        serde_wasm_bindgen::to_value(&list)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// The open table's view model, or `undefined` if none is open.
    #[wasm_bindgen]
    pub fn view(&self) -> std::result::Result<JsValue, JsValue> {
        match self.shared.app.borrow().view() {
            Some(view) => serde_wasm_bindgen::to_value(&view)
                .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}"))),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Check if the open table has unsaved edits.
    #[wasm_bindgen]
    pub fn is_dirty(&self) -> bool {
        self.shared.app.borrow().is_dirty()
    }
}

impl Default for TablEdit {
    fn default() -> Self {
        Self::new()
    }
}
