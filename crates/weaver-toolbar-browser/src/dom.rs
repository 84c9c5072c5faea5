//! Small DOM helpers shared by the host, template and wiring modules.

use wasm_bindgen::{JsCast, JsValue};
use weaver_toolbar_core::{HostError, Rect};

/// Convert a `DOMRect` into a core rect.
pub fn rect_from_dom(rect: &web_sys::DomRect) -> Rect {
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

/// Turn a thrown JS value into a host error, keeping the message when there
/// is one.
pub fn js_err(value: JsValue) -> HostError {
    let fallback = value.as_string();
    match gloo_utils::errors::JsError::try_from(value) {
        Ok(err) => HostError(err.to_string()),
        Err(_) => HostError(fallback.unwrap_or_else(|| "unknown javascript error".to_string())),
    }
}

/// `node` itself if it is an element, otherwise its parent element.
///
/// Selection anchors are usually text nodes; anything that needs
/// `closest()` goes through here first.
pub fn element_of(node: &web_sys::Node) -> Option<web_sys::Element> {
    match node.dyn_ref::<web_sys::Element>() {
        Some(element) => Some(element.clone()),
        None => node.parent_element(),
    }
}

/// The event target as a node, if it is one.
pub fn event_node(event: &web_sys::Event) -> Option<web_sys::Node> {
    event.target()?.dyn_into::<web_sys::Node>().ok()
}

pub fn as_html(element: &web_sys::Element) -> Option<&web_sys::HtmlElement> {
    element.dyn_ref::<web_sys::HtmlElement>()
}
