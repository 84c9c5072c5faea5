//! Scripted in-memory host for unit tests.
//!
//! A tiny node tree with page-absolute rects, a settable live selection, and
//! timers/frames that only run when a test fires them. The fixture is a
//! `body` holding a `#container` (placement anchor, 1024x2000 at the page
//! origin) with an `#editor` content region and a `#p1` paragraph inside it,
//! plus an `#outside` node elsewhere. Toolbar markup is created on demand by
//! [`TestHost::standard_config`].

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::rc::Rc;

use crate::config::{ToolbarConfig, ToolbarMode};
use crate::elements::ToolbarRole;
use crate::error::HostError;
use crate::format::FormatKind;
use crate::geometry::{Rect, Size, Viewport};
use crate::host::{ScheduledTask, SelectionSnapshot, TimerId, ToolbarHost};
use crate::selection::ToolbarEvent;
use crate::toolbar::Toolbar;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug, PartialEq)]
pub struct TestRange {
    node: NodeId,
    text: String,
}

const BLOCK_TAGS: [&str; 7] = ["p", "div", "h1", "h2", "h3", "blockquote", "li"];

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    id: Option<String>,
    parent: Option<NodeId>,
    text: String,
    rect: Rect,
    size: Size,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    style_writes: BTreeMap<String, usize>,
    attrs: BTreeMap<String, String>,
    value: String,
}

#[derive(Debug)]
struct LiveSelection {
    anchor: NodeId,
    text: String,
    collapsed: bool,
}

#[derive(Debug, Default)]
struct TestDom {
    nodes: Vec<NodeData>,
    viewport: Viewport,
    /// Document scroll offset; node rects are stored in document coordinates.
    scroll_y: f64,
    selection: Option<LiveSelection>,
    active_formats: HashSet<FormatKind>,
    exec_log: Vec<FormatKind>,
    fail_exec: bool,
    timers: Vec<(TimerId, u32, ScheduledTask)>,
    next_timer: u64,
    frames: Vec<ScheduledTask>,
    opened: Vec<String>,
    focused: Option<(NodeId, bool)>,
    focus_count: usize,
}

impl TestDom {
    fn add(&mut self, tag: &str, id: Option<&str>, parent: Option<NodeId>, rect: Rect) -> NodeId {
        self.nodes.push(NodeData {
            tag: tag.to_string(),
            id: id.map(str::to_string),
            parent,
            rect,
            size: Size::new(rect.width, rect.height),
            ..Default::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.id.as_deref() == Some(id) && !self.is_detached_index(n))
            .map(NodeId)
    }

    fn is_detached_index(&self, node: &NodeData) -> bool {
        node.parent.is_none() && node.tag != "body"
    }

    fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |n| self.node(*n).parent)
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.ancestors(node).any(|n| self.node(n).tag == "body")
    }

    fn viewport_rect(&self, node: NodeId) -> Rect {
        let rect = self.node(node).rect;
        Rect::new(
            rect.x,
            rect.y - self.scroll_y,
            rect.width,
            rect.height,
        )
    }
}

#[derive(Clone, Debug)]
pub struct TestHost {
    dom: Rc<RefCell<TestDom>>,
}

impl TestHost {
    pub fn new() -> Self {
        let mut dom = TestDom {
            viewport: Viewport::new(1024.0, 768.0),
            scroll_y: 0.0,
            ..Default::default()
        };
        let body = dom.add("body", None, None, Rect::new(0.0, 0.0, 1024.0, 2000.0));
        let container = dom.add(
            "div",
            Some("container"),
            Some(body),
            Rect::new(0.0, 0.0, 1024.0, 2000.0),
        );
        let editor = dom.add(
            "div",
            Some("editor"),
            Some(container),
            Rect::new(100.0, 100.0, 800.0, 1500.0),
        );
        dom.add("p", Some("p1"), Some(editor), Rect::new(100.0, 100.0, 800.0, 600.0));
        dom.add("div", Some("outside"), Some(body), Rect::new(0.0, 1900.0, 1024.0, 100.0));
        Self {
            dom: Rc::new(RefCell::new(dom)),
        }
    }

    /// Config bound to the fixture, creating markup for `toolbar_id`.
    pub fn standard_config(&self, toolbar_id: &str) -> ToolbarConfig {
        self.standard_config_without(toolbar_id, &[])
    }

    /// Like [`standard_config`](Self::standard_config) but leaves out the
    /// markup for `missing`.
    pub fn standard_config_without(&self, toolbar_id: &str, missing: &[ToolbarRole]) -> ToolbarConfig {
        let config = ToolbarConfig {
            container: "#container".into(),
            content: "#editor".into(),
            toolbar_id: toolbar_id.into(),
            ..Default::default()
        };
        let mut dom = self.dom.borrow_mut();
        if dom.by_id(toolbar_id).is_none() {
            let container = dom.by_id("container");
            let root = dom.add("div", Some(toolbar_id), container, Rect::new(0.0, 0.0, 300.0, 40.0));
            for role in ToolbarRole::CONTROLS {
                if role == ToolbarRole::Toolbar || missing.contains(&role) {
                    continue;
                }
                let Some(id) = config.element_id(role) else {
                    continue;
                };
                let tag = if role == ToolbarRole::LinkInput { "input" } else { "button" };
                dom.add(tag, Some(id.as_str()), Some(root), Rect::new(0.0, 0.0, 36.0, 36.0));
            }
        }
        config
    }

    pub fn floating_toolbar(&self, toolbar_id: &str) -> Toolbar<TestHost> {
        Toolbar::new(self.standard_config(toolbar_id), self.clone())
    }

    pub fn fixed_toolbar(&self, toolbar_id: &str) -> Toolbar<TestHost> {
        let mut config = self.standard_config(toolbar_id);
        config.mode = ToolbarMode::Fixed;
        Toolbar::new(config, self.clone())
    }

    /// Another content region inside the container, 300px tall at `top`.
    pub fn add_region(&self, id: &str, top: f64) -> NodeId {
        let mut dom = self.dom.borrow_mut();
        let container = dom.by_id("container");
        dom.add("div", Some(id), container, Rect::new(100.0, top, 800.0, 300.0))
    }

    /// Text node under `parent`, 8px per character, 20px tall at `top`.
    pub fn add_text(&self, parent: &str, text: &str, top: f64) -> NodeId {
        let width = 8.0 * text.chars().count() as f64;
        self.add_text_rect(parent, text, Rect::new(200.0, top, width, 20.0))
    }

    pub fn add_text_rect(&self, parent: &str, text: &str, rect: Rect) -> NodeId {
        let mut dom = self.dom.borrow_mut();
        let parent = dom.by_id(parent);
        let node = dom.add("#text", None, parent, rect);
        dom.node_mut(node).text = text.to_string();
        node
    }

    pub fn add_link(&self, parent: &str, href: &str, text: &str, top: f64) -> NodeId {
        let link = self.add_text(parent, text, top);
        let mut dom = self.dom.borrow_mut();
        let data = dom.node_mut(link);
        data.tag = "a".into();
        data.attrs.insert("href".into(), href.into());
        link
    }

    pub fn select(&self, anchor: NodeId, text: &str) {
        self.dom.borrow_mut().selection = Some(LiveSelection {
            anchor,
            text: text.to_string(),
            collapsed: false,
        });
    }

    pub fn collapse(&self, anchor: NodeId) {
        self.dom.borrow_mut().selection = Some(LiveSelection {
            anchor,
            text: String::new(),
            collapsed: true,
        });
    }

    pub fn clear_live_selection(&self) {
        self.dom.borrow_mut().selection = None;
    }

    pub fn pointer_up(&self, target: NodeId) -> ToolbarEvent<NodeId> {
        ToolbarEvent::PointerUp { target }
    }

    pub fn key_up(&self, target: NodeId) -> ToolbarEvent<NodeId> {
        ToolbarEvent::KeyUp { target }
    }

    pub fn scroll_by(&self, dy: f64) {
        self.dom.borrow_mut().scroll_y += dy;
    }

    /// Take `node` out of the tree.
    pub fn detach(&self, node: NodeId) {
        self.dom.borrow_mut().node_mut(node).parent = None;
    }

    pub fn is_detached(&self, node: NodeId) -> bool {
        !self.dom.borrow().is_attached(node)
    }

    pub fn set_size_id(&self, id: &str, size: Size) {
        let node = self.id_of(id);
        self.dom.borrow_mut().node_mut(node).size = size;
    }

    pub fn id_of(&self, id: &str) -> NodeId {
        self.dom
            .borrow()
            .by_id(id)
            .unwrap_or_else(|| panic!("no element #{id}"))
    }

    pub fn has_class_id(&self, id: &str, class: &str) -> bool {
        let node = self.id_of(id);
        self.dom.borrow().node(node).classes.contains(class)
    }

    pub fn style_id(&self, id: &str, property: &str) -> Option<String> {
        let node = self.id_of(id);
        self.dom.borrow().node(node).styles.get(property).cloned()
    }

    pub fn style_writes_id(&self, id: &str, property: &str) -> usize {
        let node = self.id_of(id);
        self.dom
            .borrow()
            .node(node)
            .style_writes
            .get(property)
            .copied()
            .unwrap_or(0)
    }

    pub fn input_value_id(&self, id: &str) -> String {
        let node = self.id_of(id);
        self.dom.borrow().node(node).value.clone()
    }

    pub fn set_input_value_id(&self, id: &str, value: &str) {
        let node = self.id_of(id);
        self.dom.borrow_mut().node_mut(node).value = value.to_string();
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.dom.borrow().node(node).attrs.get(name).cloned()
    }

    pub fn text(&self, node: NodeId) -> String {
        self.dom.borrow().node(node).text.clone()
    }

    /// Attached `<a>` nodes, in creation order.
    pub fn links(&self) -> Vec<NodeId> {
        let dom = self.dom.borrow();
        (0..dom.nodes.len())
            .map(NodeId)
            .filter(|n| dom.node(*n).tag == "a" && dom.is_attached(*n))
            .collect()
    }

    /// Text of every attached text node directly under `#parent`.
    pub fn texts_under(&self, parent: &str) -> Vec<String> {
        let parent = self.id_of(parent);
        let dom = self.dom.borrow();
        dom.nodes
            .iter()
            .filter(|n| n.tag == "#text" && n.parent == Some(parent))
            .map(|n| n.text.clone())
            .collect()
    }

    pub fn set_format_active(&self, kind: FormatKind, active: bool) {
        let mut dom = self.dom.borrow_mut();
        if active {
            dom.active_formats.insert(kind);
        } else {
            dom.active_formats.remove(&kind);
        }
    }

    /// Successfully executed format commands.
    pub fn exec_log(&self) -> Vec<FormatKind> {
        self.dom.borrow().exec_log.clone()
    }

    pub fn fail_exec(&self, fail: bool) {
        self.dom.borrow_mut().fail_exec = fail;
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.dom.borrow().opened.clone()
    }

    pub fn focused(&self) -> Option<(NodeId, bool)> {
        self.dom.borrow().focused
    }

    pub fn focus_count(&self) -> usize {
        self.dom.borrow().focus_count
    }

    /// Tasks waiting on a timer, shortest delay first.
    pub fn pending_timers(&self) -> Vec<ScheduledTask> {
        let mut timers = self.dom.borrow().timers.clone();
        timers.sort_by_key(|(_, delay, _)| *delay);
        timers.into_iter().map(|(_, _, task)| task).collect()
    }

    /// Fire every pending timer, returning their tasks in firing order.
    pub fn fire_timers(&self) -> Vec<ScheduledTask> {
        let tasks = self.pending_timers();
        self.dom.borrow_mut().timers.clear();
        tasks
    }

    pub fn take_frames(&self) -> Vec<ScheduledTask> {
        std::mem::take(&mut self.dom.borrow_mut().frames)
    }

    /// Run frames and timers into `toolbar` until nothing is left.
    pub fn drain(&self, toolbar: &mut Toolbar<TestHost>) {
        for _ in 0..16 {
            let mut tasks = self.take_frames();
            tasks.extend(self.fire_timers());
            if tasks.is_empty() {
                return;
            }
            for task in tasks {
                toolbar.run_task(task);
            }
        }
        panic!("scheduled tasks never settled");
    }
}

impl ToolbarHost for TestHost {
    type Node = NodeId;
    type Element = NodeId;
    type Range = TestRange;

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let dom = self.dom.borrow();
        match selector.strip_prefix('#') {
            Some(id) => dom.by_id(id),
            None if selector == "body" => Some(NodeId(0)),
            None => None,
        }
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.dom.borrow().by_id(id)
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.dom.borrow().ancestors(*node).any(|n| n == *ancestor)
    }

    fn read_selection(&self) -> Option<SelectionSnapshot<NodeId, TestRange>> {
        let dom = self.dom.borrow();
        let live = dom.selection.as_ref()?;
        let rect = if live.collapsed {
            Rect::default()
        } else {
            dom.viewport_rect(live.anchor)
        };
        Some(SelectionSnapshot {
            text: live.text.clone(),
            anchor: live.anchor,
            range: TestRange {
                node: live.anchor,
                text: live.text.clone(),
            },
            rect,
            collapsed: live.collapsed,
        })
    }

    fn restore_selection(&self, range: &TestRange) -> Result<(), HostError> {
        let mut dom = self.dom.borrow_mut();
        if !dom.is_attached(range.node) {
            return Err("range is detached".into());
        }
        dom.selection = Some(LiveSelection {
            anchor: range.node,
            text: range.text.clone(),
            collapsed: false,
        });
        Ok(())
    }

    fn clear_selection(&self) {
        self.dom.borrow_mut().selection = None;
    }

    fn range_rect(&self, range: &TestRange) -> Rect {
        let dom = self.dom.borrow();
        if dom.is_attached(range.node) {
            dom.viewport_rect(range.node)
        } else {
            Rect::default()
        }
    }

    fn range_container(&self, range: &TestRange) -> NodeId {
        range.node
    }

    fn closest_link(&self, node: &NodeId) -> Option<NodeId> {
        let dom = self.dom.borrow();
        dom.ancestors(*node).find(|n| dom.node(*n).tag == "a")
    }

    fn block_element(&self, range: &TestRange) -> Option<NodeId> {
        let dom = self.dom.borrow();
        dom.ancestors(range.node)
            .find(|n| BLOCK_TAGS.contains(&dom.node(*n).tag.as_str()))
    }

    fn link_href(&self, link: &NodeId) -> Option<String> {
        self.attr(*link, "href")
    }

    fn set_link_href(&self, link: &NodeId, href: &str) -> Result<(), HostError> {
        let mut dom = self.dom.borrow_mut();
        if dom.node(*link).tag != "a" {
            return Err("not a link".into());
        }
        dom.node_mut(*link).attrs.insert("href".into(), href.into());
        Ok(())
    }

    fn insert_link(&self, range: &TestRange, href: &str, text: &str) -> Result<NodeId, HostError> {
        let mut dom = self.dom.borrow_mut();
        if !dom.is_attached(range.node) {
            return Err("range is detached".into());
        }
        let old = dom.node(range.node);
        let (parent, rect) = (old.parent, old.rect);
        let link = dom.add("a", None, parent, rect);
        let data = dom.node_mut(link);
        data.text = text.to_string();
        data.attrs.insert("href".into(), href.into());
        data.attrs.insert("target".into(), "_blank".into());
        data.attrs.insert("rel".into(), "noopener noreferrer".into());
        dom.node_mut(range.node).parent = None;
        Ok(link)
    }

    fn unwrap_link(&self, link: &NodeId) -> Result<(), HostError> {
        let mut dom = self.dom.borrow_mut();
        if !dom.is_attached(*link) {
            return Err("link is detached".into());
        }
        let old = dom.node(*link);
        let (parent, rect, text) = (old.parent, old.rect, old.text.clone());
        let replacement = dom.add("#text", None, parent, rect);
        dom.node_mut(replacement).text = text;
        dom.node_mut(*link).parent = None;
        Ok(())
    }

    fn open_url(&self, url: &str) {
        self.dom.borrow_mut().opened.push(url.to_string());
    }

    fn viewport(&self) -> Viewport {
        self.dom.borrow().viewport
    }

    fn bounding_rect(&self, element: &NodeId) -> Rect {
        self.dom.borrow().viewport_rect(*element)
    }

    fn measure(&self, element: &NodeId) -> Size {
        let dom = self.dom.borrow();
        let node = dom.node(*element);
        let width = node
            .styles
            .get("width")
            .and_then(|w| w.strip_suffix("px"))
            .and_then(|w| w.parse().ok())
            .unwrap_or(node.size.width);
        Size::new(width, node.size.height)
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) {
        let mut dom = self.dom.borrow_mut();
        let node = dom.node_mut(*element);
        node.styles.insert(property.into(), value.into());
        *node.style_writes.entry(property.into()).or_default() += 1;
    }

    fn remove_style(&self, element: &NodeId, property: &str) {
        self.dom.borrow_mut().node_mut(*element).styles.remove(property);
    }

    fn set_class(&self, element: &NodeId, class: &str, enabled: bool) {
        let mut dom = self.dom.borrow_mut();
        let classes = &mut dom.node_mut(*element).classes;
        if enabled {
            classes.insert(class.into());
        } else {
            classes.remove(class);
        }
    }

    fn input_value(&self, input: &NodeId) -> String {
        self.dom.borrow().node(*input).value.clone()
    }

    fn set_input_value(&self, input: &NodeId, value: &str) {
        self.dom.borrow_mut().node_mut(*input).value = value.to_string();
    }

    fn focus_input(&self, input: &NodeId, select_all: bool) {
        let mut dom = self.dom.borrow_mut();
        dom.focused = Some((*input, select_all));
        dom.focus_count += 1;
    }

    fn exec_format(&self, kind: FormatKind) -> Result<(), HostError> {
        let mut dom = self.dom.borrow_mut();
        if dom.fail_exec {
            return Err(format!("{} failed", kind.as_str()).into());
        }
        dom.exec_log.push(kind);
        Ok(())
    }

    fn query_format(&self, kind: FormatKind) -> bool {
        self.dom.borrow().active_formats.contains(&kind)
    }

    fn schedule(&self, delay_ms: u32, task: ScheduledTask) -> TimerId {
        let mut dom = self.dom.borrow_mut();
        dom.next_timer += 1;
        let id = TimerId(dom.next_timer);
        dom.timers.push((id, delay_ms, task));
        id
    }

    fn cancel(&self, timer: TimerId) {
        self.dom.borrow_mut().timers.retain(|(id, _, _)| *id != timer);
    }

    fn request_frame(&self, task: ScheduledTask) {
        self.dom.borrow_mut().frames.push(task);
    }
}
