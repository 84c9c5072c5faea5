//! Native formatting commands.
//!
//! Inline styles and lists go through `document.execCommand`. Block formats
//! toggle through `formatBlock`, falling back to a paragraph when the block
//! already has the requested tag. Inline code has no native command and is
//! done with range surgery.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlDocument, Node, Selection};
use weaver_toolbar_core::{FormatKind, HostError};

use crate::dom::{element_of, js_err};

/// Elements treated as the "block" a selection starts in.
pub const BLOCK_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6, blockquote, li, pre, div";

fn html_document(document: &Document) -> Result<&HtmlDocument, HostError> {
    document
        .dyn_ref::<HtmlDocument>()
        .ok_or_else(|| HostError::from("document does not support execCommand"))
}

fn run(doc: &HtmlDocument, command: &str, value: Option<&str>) -> Result<(), HostError> {
    let ran = match value {
        Some(value) => doc
            .exec_command_with_show_ui_and_value(command, false, value)
            .map_err(js_err)?,
        None => doc.exec_command(command).map_err(js_err)?,
    };
    if ran {
        Ok(())
    } else {
        Err(HostError(format!("{command} was not executed")))
    }
}

fn native_command(kind: FormatKind) -> Option<&'static str> {
    match kind {
        FormatKind::Bold => Some("bold"),
        FormatKind::Italic => Some("italic"),
        FormatKind::Underline => Some("underline"),
        FormatKind::Strikethrough => Some("strikeThrough"),
        FormatKind::BulletList => Some("insertUnorderedList"),
        FormatKind::NumberedList => Some("insertOrderedList"),
        FormatKind::HorizontalRule => Some("insertHorizontalRule"),
        FormatKind::ClearFormatting => Some("removeFormat"),
        _ => None,
    }
}

fn block_tag(kind: FormatKind) -> Option<&'static str> {
    match kind {
        FormatKind::Heading1 => Some("h1"),
        FormatKind::Heading2 => Some("h2"),
        FormatKind::Heading3 => Some("h3"),
        FormatKind::Quote => Some("blockquote"),
        _ => None,
    }
}

fn current_block(doc: &HtmlDocument) -> String {
    doc.query_command_value("formatBlock")
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn enclosing_code(selection: Option<&Selection>) -> Option<Element> {
    let anchor = selection?.anchor_node()?;
    element_of(&anchor)?.closest("code").ok().flatten()
}

/// Apply `kind` to the live selection.
pub fn exec(
    document: &Document,
    selection: Option<&Selection>,
    kind: FormatKind,
) -> Result<(), HostError> {
    if kind == FormatKind::Code {
        return toggle_code(document, selection);
    }
    let doc = html_document(document)?;
    if let Some(command) = native_command(kind) {
        return run(doc, command, None);
    }
    if let Some(tag) = block_tag(kind) {
        let target = if current_block(doc) == tag { "p" } else { tag };
        return run(doc, "formatBlock", Some(&format!("<{target}>")));
    }
    Err(HostError(format!("{} has no native command", kind.as_str())))
}

/// Whether `kind` is on for the live selection.
pub fn query(document: &Document, selection: Option<&Selection>, kind: FormatKind) -> bool {
    if kind == FormatKind::Code {
        return enclosing_code(selection).is_some();
    }
    let Ok(doc) = html_document(document) else {
        return false;
    };
    if let Some(tag) = block_tag(kind) {
        return current_block(doc) == tag;
    }
    match native_command(kind) {
        Some(command) => doc.query_command_state(command).unwrap_or(false),
        None => false,
    }
}

fn toggle_code(document: &Document, selection: Option<&Selection>) -> Result<(), HostError> {
    let selection = selection.ok_or("no selection object")?;
    if let Some(code) = enclosing_code(Some(selection)) {
        return unwrap_element(&code);
    }
    if selection.range_count() == 0 {
        return Err("selection has no range".into());
    }
    let range = selection.get_range_at(0).map_err(js_err)?;
    let code = document.create_element("code").map_err(js_err)?;
    // Throws when the range only partially covers a non-text node.
    range.surround_contents(&code).map_err(js_err)?;
    selection.remove_all_ranges().map_err(js_err)?;
    selection.select_all_children(&code).map_err(js_err)?;
    Ok(())
}

/// Replace `element` with its children.
fn unwrap_element(element: &Element) -> Result<(), HostError> {
    let parent: Node = element.parent_node().ok_or("element has no parent")?;
    while let Some(child) = element.first_child() {
        parent.insert_before(&child, Some(element)).map_err(js_err)?;
    }
    parent.remove_child(element).map_err(js_err)?;
    parent.normalize();
    Ok(())
}
