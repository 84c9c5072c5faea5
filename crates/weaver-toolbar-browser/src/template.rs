//! Toolbar markup and stylesheet.
//!
//! Creates the root, both view panels, every enabled button and the link
//! input under the configured container, with ids derived from the toolbar
//! id so `ToolbarElements::bind` finds them. Skipped entirely when the page
//! ships its own markup.

use web_sys::{Document, Element, Window};
use weaver_toolbar_core::{HostError, ToolbarConfig, ToolbarRole, style};

use crate::dom::{as_html, js_err};

fn label(role: ToolbarRole) -> Option<(&'static str, &'static str)> {
    let pair = match role {
        ToolbarRole::Bold => ("B", "Bold"),
        ToolbarRole::Italic => ("I", "Italic"),
        ToolbarRole::Underline => ("U", "Underline"),
        ToolbarRole::Strikethrough => ("S", "Strikethrough"),
        ToolbarRole::Heading1 => ("H1", "Heading 1"),
        ToolbarRole::Heading2 => ("H2", "Heading 2"),
        ToolbarRole::Heading3 => ("H3", "Heading 3"),
        ToolbarRole::Quote => ("\u{201C}", "Quote"),
        ToolbarRole::Code => ("</>", "Code"),
        ToolbarRole::BulletList => ("\u{2022}", "Bulleted list"),
        ToolbarRole::NumberedList => ("1.", "Numbered list"),
        ToolbarRole::HorizontalRule => ("\u{2015}", "Horizontal rule"),
        ToolbarRole::DropCap => ("A\u{2193}", "Drop cap"),
        ToolbarRole::ClearFormatting => ("T\u{2093}", "Clear formatting"),
        ToolbarRole::Link => ("\u{1F517}", "Link"),
        ToolbarRole::SaveLink => ("\u{2713}", "Save link"),
        ToolbarRole::CancelLink => ("\u{2715}", "Cancel"),
        ToolbarRole::RemoveLink => ("\u{232B}", "Remove link"),
        ToolbarRole::VisitLink => ("\u{2197}", "Open link"),
        _ => return None,
    };
    Some(pair)
}

const INITIAL_BUTTONS: [ToolbarRole; 15] = [
    ToolbarRole::Bold,
    ToolbarRole::Italic,
    ToolbarRole::Underline,
    ToolbarRole::Strikethrough,
    ToolbarRole::Heading1,
    ToolbarRole::Heading2,
    ToolbarRole::Heading3,
    ToolbarRole::Quote,
    ToolbarRole::Code,
    ToolbarRole::BulletList,
    ToolbarRole::NumberedList,
    ToolbarRole::HorizontalRule,
    ToolbarRole::DropCap,
    ToolbarRole::ClearFormatting,
    ToolbarRole::Link,
];

const LINK_BUTTONS: [ToolbarRole; 4] = [
    ToolbarRole::SaveLink,
    ToolbarRole::VisitLink,
    ToolbarRole::RemoveLink,
    ToolbarRole::CancelLink,
];

/// Stylesheet for one toolbar instance, scoped by its root id.
pub fn stylesheet(toolbar_id: &str) -> String {
    let root = format!("#{toolbar_id}");
    format!(
        "{root} {{ position: absolute; z-index: 1000; display: flex; align-items: center; \
gap: 2px; padding: 4px; box-sizing: border-box; border-radius: 6px; \
min-width: var({width}, auto); visibility: hidden; opacity: 0; pointer-events: none; \
transition: opacity 120ms ease; background: #fff; color: #222; \
box-shadow: 0 2px 8px rgba(0, 0, 0, 0.18); }}
{root}.dark {{ background: #222; color: #eee; }}
{root}.{visible} {{ visibility: visible; opacity: 1; pointer-events: auto; }}
{root} .{hidden} {{ display: none !important; }}
{root} > div {{ display: flex; align-items: center; gap: 2px; }}
{root} button {{ border: 0; background: transparent; color: inherit; font: inherit; \
min-width: 28px; height: 28px; border-radius: 4px; cursor: pointer; }}
{root} button:hover {{ background: rgba(127, 127, 127, 0.2); }}
{root} button.{active} {{ background: rgba(127, 127, 127, 0.35); }}
{root} input {{ flex: 1; min-width: 0; height: 28px; border: 1px solid rgba(127, 127, 127, 0.4); \
border-radius: 4px; padding: 0 6px; font: inherit; }}
{root}::after {{ content: ''; position: absolute; left: 50%; bottom: -6px; margin-left: -6px; \
border: 6px solid transparent; border-bottom: 0; border-top-color: inherit; }}
{root}.{below}::after {{ top: -6px; bottom: auto; border: 6px solid transparent; \
border-top: 0; border-bottom-color: inherit; }}
{root}.{following} {{ transition: opacity 120ms ease, top 80ms linear, left 80ms linear; }}
.{drop_cap}::first-letter {{ float: left; font-size: 3.2em; line-height: 0.9; \
padding-right: 0.08em; }}
",
        width = style::WIDTH_VAR,
        visible = style::VISIBLE,
        hidden = style::HIDDEN,
        active = style::ACTIVE,
        below = style::BELOW,
        following = style::FOLLOWING,
        drop_cap = style::DROP_CAP,
    )
}

/// DOM this crate added for one toolbar; removed again on teardown.
#[derive(Debug, Default)]
pub struct ToolbarMarkup {
    root: Option<Element>,
    stylesheet: Option<Element>,
    /// Container whose `position` we overrode.
    positioned: Option<Element>,
}

impl ToolbarMarkup {
    /// Create whatever the config asks for.
    ///
    /// With `use_existing_toolbar` only the stylesheet is injected. A missing
    /// container is not an error here; binding reports it and the toolbar
    /// stays inert.
    pub fn create(
        window: &Window,
        document: &Document,
        config: &ToolbarConfig,
    ) -> Result<Self, HostError> {
        let mut markup = ToolbarMarkup {
            stylesheet: Some(inject_stylesheet(document, &config.toolbar_id)?),
            ..Default::default()
        };

        let Some(container) = document.query_selector(&config.container).ok().flatten() else {
            return Ok(markup);
        };
        if ensure_positioned(window, &container) {
            markup.positioned = Some(container.clone());
        }
        if config.use_existing_toolbar || document.get_element_by_id(&config.toolbar_id).is_some()
        {
            return Ok(markup);
        }

        let root = build_root(document, config)?;
        container.append_child(&root).map_err(js_err)?;
        markup.root = Some(root);
        tracing::debug!(target: "weaver::toolbar", toolbar_id = %config.toolbar_id, "toolbar markup created");
        Ok(markup)
    }

    pub fn created_root(&self) -> bool {
        self.root.is_some()
    }

    /// Take back everything `create` added.
    pub fn remove(&mut self) {
        if let Some(root) = self.root.take() {
            root.remove();
        }
        if let Some(sheet) = self.stylesheet.take() {
            sheet.remove();
        }
        if let Some(container) = self.positioned.take() {
            if let Some(html) = as_html(&container) {
                let _ = html.style().remove_property("position");
            }
        }
    }
}

fn inject_stylesheet(document: &Document, toolbar_id: &str) -> Result<Element, HostError> {
    let id = format!("{toolbar_id}-styles");
    if let Some(existing) = document.get_element_by_id(&id) {
        existing.remove();
    }
    let sheet = document.create_element("style").map_err(js_err)?;
    sheet.set_id(&id);
    sheet.set_text_content(Some(&stylesheet(toolbar_id)));
    let head = document.head().ok_or("document has no head")?;
    head.append_child(&sheet).map_err(js_err)?;
    Ok(sheet)
}

/// Absolute positioning needs a positioned container. Returns whether the
/// inline style was changed.
fn ensure_positioned(window: &Window, container: &Element) -> bool {
    let computed = window
        .get_computed_style(container)
        .ok()
        .flatten()
        .and_then(|style| style.get_property_value("position").ok());
    if !matches!(computed.as_deref(), Some("static") | Some("")) {
        return false;
    }
    match as_html(container) {
        Some(html) => html.style().set_property("position", "relative").is_ok(),
        None => false,
    }
}

fn build_root(document: &Document, config: &ToolbarConfig) -> Result<Element, HostError> {
    let root = document.create_element("div").map_err(js_err)?;
    root.set_id(&config.toolbar_id);
    let class = if config.theme.is_empty() {
        "selection-toolbar".to_string()
    } else {
        format!("selection-toolbar {}", config.theme)
    };
    root.set_class_name(&class);
    root.set_attribute("role", "toolbar").map_err(js_err)?;

    let initial = panel(document, config, ToolbarRole::InitialView)?;
    for role in INITIAL_BUTTONS {
        if config.buttons.is_enabled(role) {
            let control: Element = button(document, config, role)?;
            initial.append_child(&control).map_err(js_err)?;
        }
    }
    root.append_child(&initial).map_err(js_err)?;

    if config.buttons.link {
        let link_view = panel(document, config, ToolbarRole::LinkView)?;
        link_view.set_class_name(style::HIDDEN);

        let input = document.create_element("input").map_err(js_err)?;
        set_role_id(&input, config, ToolbarRole::LinkInput);
        input.set_attribute("type", "url").map_err(js_err)?;
        input.set_attribute("placeholder", "https://").map_err(js_err)?;
        input.set_attribute("spellcheck", "false").map_err(js_err)?;
        link_view.append_child(&input).map_err(js_err)?;

        for role in LINK_BUTTONS {
            let control = button(document, config, role)?;
            if matches!(role, ToolbarRole::RemoveLink | ToolbarRole::VisitLink) {
                control.set_class_name(style::HIDDEN);
            }
            link_view.append_child(&control).map_err(js_err)?;
        }
        root.append_child(&link_view).map_err(js_err)?;
    }

    Ok(root)
}

fn set_role_id(element: &Element, config: &ToolbarConfig, role: ToolbarRole) {
    if let Some(id) = config.element_id(role) {
        element.set_id(&id);
    }
}

fn panel(document: &Document, config: &ToolbarConfig, role: ToolbarRole) -> Result<Element, HostError> {
    let panel = document.create_element("div").map_err(js_err)?;
    set_role_id(&panel, config, role);
    Ok(panel)
}

fn button(document: &Document, config: &ToolbarConfig, role: ToolbarRole) -> Result<Element, HostError> {
    let button = document.create_element("button").map_err(js_err)?;
    set_role_id(&button, config, role);
    button.set_attribute("type", "button").map_err(js_err)?;
    if let Some((text, title)) = label(role) {
        button.set_text_content(Some(text));
        button.set_attribute("title", title).map_err(js_err)?;
        button.set_attribute("aria-label", title).map_err(js_err)?;
    }
    Ok(button)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_button_has_a_label() {
        for role in INITIAL_BUTTONS.into_iter().chain(LINK_BUTTONS) {
            assert!(label(role).is_some(), "{role:?} has no label");
        }
        assert!(label(ToolbarRole::LinkInput).is_none());
    }

    #[test]
    fn test_stylesheet_is_scoped() {
        let css = stylesheet("tb");
        assert!(css.contains("#tb.visible"));
        assert!(css.contains("#tb .hidden"));
        assert!(css.contains("var(--toolbar-width, auto)"));
        assert!(css.contains(".drop-cap::first-letter"));
    }
}
