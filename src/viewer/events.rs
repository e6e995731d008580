//! Handlers behind DOM listeners and the async import flow.
//!
//! Each handler takes the mutable borrow of the app only for the edit itself
//! and releases it before re-rendering, since rendering borrows it again.

use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::JsValue;

use super::{dialogs, files, render, Shared};

pub(crate) fn open_table(shared: &Rc<Shared>, id: &str) -> Result<(), JsValue> {
    shared.app.borrow_mut().open_table(id)?;
    render::render_editor(shared);
    Ok(())
}

pub(crate) fn title_input(shared: &Rc<Shared>, text: &str) {
    if let Err(e) = shared.app.borrow_mut().set_title(text) {
        warn!(error = %e, "title edit ignored");
    }
}

pub(crate) fn header_input(shared: &Rc<Shared>, col: usize, text: &str) {
    if let Err(e) = shared.app.borrow_mut().set_header(col, text) {
        warn!(error = %e, col, "header edit ignored");
        return;
    }
    render::rename_selector_option(shared, col, text);
}

pub(crate) fn cell_input(shared: &Rc<Shared>, row: usize, col: usize, text: &str) {
    if let Err(e) = shared.app.borrow_mut().set_cell(row, col, text) {
        warn!(error = %e, row, col, "cell edit ignored");
        return;
    }
    render::render_footer(shared);
}

/// Selector values are `""` for none, otherwise the column index.
pub(crate) fn numeric_selector_change(shared: &Rc<Shared>, value: &str) {
    let col = if value.is_empty() {
        None
    } else {
        match value.parse::<usize>() {
            Ok(col) => Some(col),
            Err(_) => {
                warn!(value, "unexpected numeric selector value");
                return;
            }
        }
    };
    if let Err(e) = shared.app.borrow_mut().select_numeric_column(col) {
        warn!(error = %e, "numeric column selection ignored");
        return;
    }
    render::render_footer(shared);
}

pub(crate) async fn import_file(shared: &Rc<Shared>, file: web_sys::File) {
    let text = match files::read_file_text(file).await {
        Ok(text) => text,
        Err(e) => {
            dialogs::alert(&format!("Error reading file: {e}"));
            return;
        }
    };

    let staged = shared.app.borrow().stage_import(&text);
    let pending = match staged {
        Ok(pending) => pending,
        Err(e) => {
            dialogs::alert(&format!("Invalid JSON file: {e}"));
            return;
        }
    };

    let decision = dialogs::confirm(pending.prompt());
    let resolved = shared.app.borrow_mut().resolve_import(pending, decision);
    match resolved {
        Ok(Some(notice)) => {
            render::render_list(shared);
            render::hide_editor(shared);
            dialogs::alert(notice.message());
        }
        Ok(None) => {}
        Err(e) => dialogs::alert(&format!("Import failed: {e}")),
    }
}
