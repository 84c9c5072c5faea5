//! `ToolbarHost` over the live browser document.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, Node, Range, Window};
use weaver_toolbar_core::{
    FormatKind, HostError, Rect, ScheduledTask, SelectionSnapshot, Size, TimerId, Toolbar,
    ToolbarHandle, ToolbarHost, Viewport,
};

use crate::commands;
use crate::dom::{as_html, element_of, js_err, rect_from_dom};

/// Timers and frames waiting to be handed back to a toolbar.
///
/// Owns every pending `Timeout`, so dropping the queue cancels them. Timers
/// that have fired are only dropped on the next `schedule` call, never from
/// inside their own callback.
#[derive(Default)]
struct TaskQueue {
    target: RefCell<Option<Weak<RefCell<Toolbar<BrowserHost>>>>>,
    timers: RefCell<HashMap<u64, Timeout>>,
    fired: RefCell<Vec<u64>>,
    next_id: Cell<u64>,
}

impl TaskQueue {
    fn deliver(&self, task: ScheduledTask) {
        let toolbar = self.target.borrow().as_ref().and_then(Weak::upgrade);
        let Some(toolbar) = toolbar else {
            return;
        };
        match toolbar.try_borrow_mut() {
            Ok(mut toolbar) => toolbar.run_task(task),
            Err(_) => {
                tracing::trace!(target: "weaver::toolbar", ?task, "toolbar busy, task dropped");
            }
        }
    }

    fn sweep(&self) {
        let fired = std::mem::take(&mut *self.fired.borrow_mut());
        let mut timers = self.timers.borrow_mut();
        for id in fired {
            timers.remove(&id);
        }
    }
}

/// Browser implementation of [`ToolbarHost`].
///
/// Cheap to clone; clones share the task queue.
#[derive(Clone)]
pub struct BrowserHost {
    window: Window,
    document: Document,
    tasks: Rc<TaskQueue>,
}

impl BrowserHost {
    pub fn new() -> Result<Self, HostError> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        Ok(Self {
            window,
            document,
            tasks: Rc::new(TaskQueue::default()),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Route scheduled tasks to `toolbar`. Call once after attaching.
    pub fn bind(&self, toolbar: &ToolbarHandle<BrowserHost>) {
        *self.tasks.target.borrow_mut() = Some(Rc::downgrade(toolbar));
    }

    /// Drop every pending timer and stop delivering tasks.
    pub fn shutdown(&self) {
        self.tasks.target.borrow_mut().take();
        self.tasks.timers.borrow_mut().clear();
        self.tasks.fired.borrow_mut().clear();
    }

    fn selection(&self) -> Option<web_sys::Selection> {
        self.window.get_selection().ok().flatten()
    }
}

impl ToolbarHost for BrowserHost {
    type Node = Node;
    type Element = Element;
    type Range = Range;

    fn query_selector(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn contains(&self, ancestor: &Element, node: &Node) -> bool {
        ancestor.contains(Some(node))
    }

    fn read_selection(&self) -> Option<SelectionSnapshot<Node, Range>> {
        let selection = self.selection()?;
        if selection.range_count() == 0 {
            return None;
        }
        let range = selection.get_range_at(0).ok()?;
        let anchor = selection.anchor_node()?;
        Some(SelectionSnapshot {
            text: String::from(selection.to_string()),
            anchor,
            rect: rect_from_dom(&range.get_bounding_client_rect()),
            range: range.clone_range(),
            collapsed: selection.is_collapsed(),
        })
    }

    fn restore_selection(&self, range: &Range) -> Result<(), HostError> {
        let selection = self.selection().ok_or("no selection object")?;
        selection.remove_all_ranges().map_err(js_err)?;
        selection.add_range(range).map_err(js_err)
    }

    fn clear_selection(&self) {
        if let Some(selection) = self.selection() {
            let _ = selection.remove_all_ranges();
        }
    }

    fn range_rect(&self, range: &Range) -> Rect {
        rect_from_dom(&range.get_bounding_client_rect())
    }

    fn range_container(&self, range: &Range) -> Node {
        range
            .common_ancestor_container()
            .unwrap_or_else(|_| self.document.clone().unchecked_into())
    }

    fn closest_link(&self, node: &Node) -> Option<Element> {
        element_of(node)?.closest("a").ok().flatten()
    }

    fn block_element(&self, range: &Range) -> Option<Element> {
        let start = range.start_container().ok()?;
        element_of(&start)?.closest(commands::BLOCK_SELECTOR).ok().flatten()
    }

    fn link_href(&self, link: &Element) -> Option<String> {
        link.get_attribute("href")
    }

    fn set_link_href(&self, link: &Element, href: &str) -> Result<(), HostError> {
        link.set_attribute("href", href).map_err(js_err)
    }

    fn insert_link(&self, range: &Range, href: &str, text: &str) -> Result<Element, HostError> {
        let link = self.document.create_element("a").map_err(js_err)?;
        link.set_attribute("href", href).map_err(js_err)?;
        link.set_attribute("target", "_blank").map_err(js_err)?;
        link.set_attribute("rel", "noopener noreferrer").map_err(js_err)?;
        link.set_text_content(Some(text));

        range.delete_contents().map_err(js_err)?;
        range.insert_node(&link).map_err(js_err)?;
        if let Some(parent) = link.parent_node() {
            parent.normalize();
        }
        Ok(link)
    }

    fn unwrap_link(&self, link: &Element) -> Result<(), HostError> {
        let parent = link.parent_node().ok_or("link has no parent")?;
        let text = self
            .document
            .create_text_node(&link.text_content().unwrap_or_default());
        parent.replace_child(&text, link).map_err(js_err)?;
        parent.normalize();
        Ok(())
    }

    fn open_url(&self, url: &str) {
        if let Err(err) =
            self.window
                .open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer")
        {
            tracing::warn!(target: "weaver::toolbar", error = %js_err(err), "could not open link");
        }
    }

    fn viewport(&self) -> Viewport {
        let dimension = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        Viewport::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    fn bounding_rect(&self, element: &Element) -> Rect {
        rect_from_dom(&element.get_bounding_client_rect())
    }

    fn measure(&self, element: &Element) -> Size {
        match as_html(element) {
            Some(html) => Size::new(html.offset_width() as f64, html.offset_height() as f64),
            None => {
                let rect = element.get_bounding_client_rect();
                Size::new(rect.width(), rect.height())
            }
        }
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) {
        if let Some(html) = as_html(element) {
            let _ = html.style().set_property(property, value);
        }
    }

    fn remove_style(&self, element: &Element, property: &str) {
        if let Some(html) = as_html(element) {
            let _ = html.style().remove_property(property);
        }
    }

    fn set_class(&self, element: &Element, class: &str, enabled: bool) {
        let _ = element.class_list().toggle_with_force(class, enabled);
    }

    fn input_value(&self, input: &Element) -> String {
        input
            .dyn_ref::<HtmlInputElement>()
            .map(HtmlInputElement::value)
            .unwrap_or_default()
    }

    fn set_input_value(&self, input: &Element, value: &str) {
        if let Some(input) = input.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        }
    }

    fn focus_input(&self, input: &Element, select_all: bool) {
        let Some(input) = input.dyn_ref::<HtmlInputElement>() else {
            return;
        };
        let _ = input.focus();
        if select_all {
            input.select();
        }
    }

    fn exec_format(&self, kind: FormatKind) -> Result<(), HostError> {
        commands::exec(&self.document, self.selection().as_ref(), kind)
    }

    fn query_format(&self, kind: FormatKind) -> bool {
        commands::query(&self.document, self.selection().as_ref(), kind)
    }

    fn schedule(&self, delay_ms: u32, task: ScheduledTask) -> TimerId {
        self.tasks.sweep();
        let id = self.tasks.next_id.get() + 1;
        self.tasks.next_id.set(id);

        let queue = Rc::downgrade(&self.tasks);
        let timeout = Timeout::new(delay_ms, move || {
            if let Some(queue) = queue.upgrade() {
                queue.fired.borrow_mut().push(id);
                queue.deliver(task);
            }
        });
        self.tasks.timers.borrow_mut().insert(id, timeout);
        TimerId(id)
    }

    fn cancel(&self, timer: TimerId) {
        // Dropping a gloo Timeout clears it.
        self.tasks.timers.borrow_mut().remove(&timer.0);
    }

    fn request_frame(&self, task: ScheduledTask) {
        let queue = Rc::downgrade(&self.tasks);
        let closure = Closure::once(move || {
            if let Some(queue) = queue.upgrade() {
                queue.deliver(task);
            }
        });
        if self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::warn!(target: "weaver::toolbar", ?task, "requestAnimationFrame failed");
            return;
        }
        closure.forget();
    }
}
