//! DOM rendering of the table list and the open table.
//!
//! Everything is rebuilt from the controller's view model; the DOM never
//! holds state that is not already in the draft.

use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlOptionElement, HtmlSelectElement, HtmlTableElement,
};

use super::{dialogs, events, Shared};
use crate::editor::TableView;

type Listener = Closure<dyn FnMut(Event)>;

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{id} has the wrong type")))
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, JsValue> {
    document
        .create_element(tag)?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("<{tag}> cast failed")))
}

fn listen(target: &Element, event: &str, listener: Listener, keep: &mut Vec<Listener>) {
    target
        .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
        .ok();
    keep.push(listener);
}

fn log_failure(what: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        warn!(error = ?e, "{what} failed");
    }
}

/// Rebuild the table list, one button per table.
pub(crate) fn render_list(shared: &Rc<Shared>) {
    log_failure("render list", try_render_list(shared));
}

fn try_render_list(shared: &Rc<Shared>) -> Result<(), JsValue> {
    let document = document()?;
    let (entries, list_id) = {
        let app = shared.app.borrow();
        (app.table_list(), app.config().dom.table_list.clone())
    };
    let list: Element = element_by_id(&document, &list_id)?;
    list.set_inner_html("");

    let mut closures = Vec::with_capacity(entries.len());
    for entry in entries {
        let li: Element = create(&document, "li")?;
        let button: HtmlElement = create(&document, "button")?;
        button.set_inner_text(&entry.title);

        let weak = Rc::downgrade(shared);
        let id = entry.id;
        let on_click = Closure::wrap(Box::new(move |_event: Event| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            if let Err(e) = events::open_table(&shared, &id) {
                dialogs::alert(&e.as_string().unwrap_or_else(|| "could not open table".into()));
            }
        }) as Box<dyn FnMut(Event)>);
        listen(&button, "click", on_click, &mut closures);

        li.append_child(&button)?;
        list.append_child(&li)?;
    }

    *shared.list_closures.borrow_mut() = closures;
    Ok(())
}

fn set_editor_visible(shared: &Rc<Shared>, visible: bool) -> Result<(), JsValue> {
    let document = document()?;
    let editor_id = shared.app.borrow().config().dom.editor.clone();
    let editor: HtmlElement = element_by_id(&document, &editor_id)?;
    editor
        .style()
        .set_property("display", if visible { "block" } else { "none" })
}

pub(crate) fn hide_editor(shared: &Rc<Shared>) {
    log_failure("hide editor", set_editor_visible(shared, false));
    log_failure("detach editor handlers", detach_static_handlers(shared));
    shared.editor_closures.borrow_mut().clear();
}

/// The title and selector outlive a render; unhook them before their
/// closures are dropped.
fn detach_static_handlers(shared: &Rc<Shared>) -> Result<(), JsValue> {
    let document = document()?;
    let ids = shared.app.borrow().config().dom.clone();
    let title: HtmlElement = element_by_id(&document, &ids.title)?;
    title.set_oninput(None);
    let selector: HtmlSelectElement = element_by_id(&document, &ids.numeric_selector)?;
    selector.set_onchange(None);
    Ok(())
}

/// Rebuild title, header, body, footer and the numeric selector.
pub(crate) fn render_editor(shared: &Rc<Shared>) {
    let view = shared.app.borrow().view();
    match view {
        Some(view) => log_failure("render editor", try_render_editor(shared, &view)),
        None => hide_editor(shared),
    }
}

fn try_render_editor(shared: &Rc<Shared>, view: &TableView) -> Result<(), JsValue> {
    let document = document()?;
    let ids = shared.app.borrow().config().dom.clone();
    let mut closures = Vec::new();

    let title: HtmlElement = element_by_id(&document, &ids.title)?;
    title.set_inner_text(&view.title);
    title.set_content_editable("true");
    {
        let weak = Rc::downgrade(shared);
        let el = title.clone();
        let on_input = Closure::wrap(Box::new(move |_event: Event| {
            if let Some(shared) = weak.upgrade() {
                events::title_input(&shared, &el.inner_text());
            }
        }) as Box<dyn FnMut(Event)>);
        title.set_oninput(Some(on_input.as_ref().unchecked_ref()));
        closures.push(on_input);
    }

    let grid: HtmlTableElement = element_by_id(&document, &ids.grid)?;
    grid.set_inner_html("");

    // Header
    let thead: Element = create(&document, "thead")?;
    let header_row: Element = create(&document, "tr")?;
    for (col, name) in view.header.iter().enumerate() {
        let th: HtmlElement = create(&document, "th")?;
        th.set_content_editable("true");
        th.set_inner_text(name);
        let weak = Rc::downgrade(shared);
        let el = th.clone();
        let on_input = Closure::wrap(Box::new(move |_event: Event| {
            if let Some(shared) = weak.upgrade() {
                events::header_input(&shared, col, &el.inner_text());
            }
        }) as Box<dyn FnMut(Event)>);
        listen(&th, "input", on_input, &mut closures);
        header_row.append_child(&th)?;
    }
    thead.append_child(&header_row)?;
    grid.append_child(&thead)?;

    // Rows
    let tbody: Element = create(&document, "tbody")?;
    for (row, cells) in view.body.iter().enumerate() {
        let tr: Element = create(&document, "tr")?;
        for (col, text) in cells.iter().enumerate() {
            let td: HtmlElement = create(&document, "td")?;
            td.set_content_editable("true");
            td.set_inner_text(text);
            let weak = Rc::downgrade(shared);
            let el = td.clone();
            let on_input = Closure::wrap(Box::new(move |_event: Event| {
                if let Some(shared) = weak.upgrade() {
                    events::cell_input(&shared, row, col, &el.inner_text());
                }
            }) as Box<dyn FnMut(Event)>);
            listen(&td, "input", on_input, &mut closures);
            tr.append_child(&td)?;
        }
        tbody.append_child(&tr)?;
    }
    grid.append_child(&tbody)?;

    let tfoot: Element = create(&document, "tfoot")?;
    grid.append_child(&tfoot)?;
    fill_footer(&document, &tfoot, &view.footer)?;

    // Numeric column selector
    let selector: HtmlSelectElement = element_by_id(&document, &ids.numeric_selector)?;
    selector.set_inner_html("");
    for option in &view.numeric_options {
        let value = option.value.map(|v| v.to_string()).unwrap_or_default();
        let el = HtmlOptionElement::new_with_text_and_value(&option.label, &value)?;
        el.set_selected(option.selected);
        selector.append_child(&el)?;
    }
    {
        let weak = Rc::downgrade(shared);
        let el = selector.clone();
        let on_change = Closure::wrap(Box::new(move |_event: Event| {
            if let Some(shared) = weak.upgrade() {
                events::numeric_selector_change(&shared, &el.value());
            }
        }) as Box<dyn FnMut(Event)>);
        selector.set_onchange(Some(on_change.as_ref().unchecked_ref()));
        closures.push(on_change);
    }

    *shared.editor_closures.borrow_mut() = closures;
    set_editor_visible(shared, true)
}

fn fill_footer(document: &Document, tfoot: &Element, footer: &[String]) -> Result<(), JsValue> {
    tfoot.set_inner_html("");
    let tr: Element = create(document, "tr")?;
    for text in footer {
        let td: HtmlElement = create(document, "td")?;
        td.set_inner_text(text);
        tr.append_child(&td)?;
    }
    tfoot.append_child(&tr)?;
    Ok(())
}

/// Recompute only the footer, leaving editable cells (and focus) alone.
pub(crate) fn render_footer(shared: &Rc<Shared>) {
    let (footer, grid_id) = {
        let app = shared.app.borrow();
        let Some(draft) = app.draft() else {
            return;
        };
        (draft.footer(), app.config().dom.grid.clone())
    };
    let result = document().and_then(|document| {
        let grid: HtmlTableElement = element_by_id(&document, &grid_id)?;
        let tfoot = grid
            .t_foot()
            .ok_or_else(|| JsValue::from_str("table has no footer"))?;
        fill_footer(&document, &tfoot, &footer)
    });
    log_failure("render footer", result);
}

/// Keep the selector label in step with an edited header.
pub(crate) fn rename_selector_option(shared: &Rc<Shared>, col: usize, text: &str) {
    let selector_id = shared.app.borrow().config().dom.numeric_selector.clone();
    let Ok(index) = u32::try_from(col + 1) else {
        return;
    };
    let result = document().and_then(|document| {
        let selector: HtmlSelectElement = element_by_id(&document, &selector_id)?;
        if let Some(option) = selector.item(index) {
            option.set_text_content(Some(text));
        }
        Ok(())
    });
    log_failure("rename selector option", result);
}
