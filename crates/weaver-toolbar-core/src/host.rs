//! Platform abstraction for the toolbar.
//!
//! The state machine never touches the DOM directly. Everything it needs from
//! the host document (selection reads, layout measurement, class toggles,
//! link surgery, timers) goes through [`ToolbarHost`]. The browser crate
//! implements it over `web-sys`; tests implement it in memory.

use std::fmt;

use crate::error::HostError;
use crate::format::FormatKind;
use crate::geometry::{Rect, Size, Viewport};

/// Handle to a pending timer, issued by [`ToolbarHost::schedule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Deferred work the toolbar asked the host to run later.
///
/// When the timer or frame fires the host hands the task back through
/// [`Toolbar::run_task`](crate::Toolbar::run_task). Tasks carry no captured
/// state; the toolbar re-reads its own state when they arrive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduledTask {
    /// Debounced reposition after a window resize.
    ResizeRecompute,
    /// First animation frame after the link button was clicked.
    LinkClickFrame,
    /// Zero-delay follow-up that releases the link-click guard.
    LinkClickRelease,
    /// Focus the link input, if the request is still current.
    FocusLinkInput { generation: u64 },
}

/// The live selection as read at one instant.
#[derive(Clone, Debug)]
pub struct SelectionSnapshot<N, R> {
    /// Raw selection text, untrimmed.
    pub text: String,
    /// Node where the selection started.
    pub anchor: N,
    /// Clone of the first range; safe to store.
    pub range: R,
    /// Viewport-relative bounding rect of `range`.
    pub rect: Rect,
    pub collapsed: bool,
}

/// Everything the toolbar needs from its host document.
pub trait ToolbarHost {
    type Node: Clone + fmt::Debug;
    type Element: Clone + PartialEq + fmt::Debug;
    type Range: Clone + fmt::Debug;

    // === Lookup ===

    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Inclusive containment: an element contains itself.
    fn contains(&self, ancestor: &Self::Element, node: &Self::Node) -> bool;

    // === Selection ===

    /// Read the document selection. `None` when there is no selection object
    /// or it has no ranges.
    fn read_selection(&self) -> Option<SelectionSnapshot<Self::Node, Self::Range>>;

    /// Make `range` the document selection again.
    fn restore_selection(&self, range: &Self::Range) -> Result<(), HostError>;

    fn clear_selection(&self);

    /// Current viewport-relative rect of a stored range.
    fn range_rect(&self, range: &Self::Range) -> Rect;

    /// Common ancestor container of a stored range.
    fn range_container(&self, range: &Self::Range) -> Self::Node;

    /// Nearest `<a>` at or above `node`.
    fn closest_link(&self, node: &Self::Node) -> Option<Self::Element>;

    /// Nearest block-level element at or above the start of `range`.
    fn block_element(&self, range: &Self::Range) -> Option<Self::Element>;

    // === Links ===

    fn link_href(&self, link: &Self::Element) -> Option<String>;

    fn set_link_href(&self, link: &Self::Element, href: &str) -> Result<(), HostError>;

    /// Replace the contents of `range` with a new `<a>` carrying `text`.
    ///
    /// Implementations open the link in a new context (`target=_blank`,
    /// `rel="noopener noreferrer"`) and normalize the parent afterwards.
    fn insert_link(
        &self,
        range: &Self::Range,
        href: &str,
        text: &str,
    ) -> Result<Self::Element, HostError>;

    /// Replace `link` with a plain text node of its text content.
    fn unwrap_link(&self, link: &Self::Element) -> Result<(), HostError>;

    /// Open `url` in a new browsing context without leaking the referrer.
    fn open_url(&self, url: &str);

    // === Layout ===

    fn viewport(&self) -> Viewport;

    /// Viewport-relative bounding rect of an element.
    fn bounding_rect(&self, element: &Self::Element) -> Rect;

    /// Rendered size (offsetWidth/offsetHeight) of an element.
    fn measure(&self, element: &Self::Element) -> Size;

    // === Style ===

    fn set_style(&self, element: &Self::Element, property: &str, value: &str);

    fn remove_style(&self, element: &Self::Element, property: &str);

    fn set_class(&self, element: &Self::Element, class: &str, enabled: bool);

    // === Link input ===

    fn input_value(&self, input: &Self::Element) -> String;

    fn set_input_value(&self, input: &Self::Element, value: &str);

    fn focus_input(&self, input: &Self::Element, select_all: bool);

    // === Formatting ===

    /// Apply a native formatting command to the current selection.
    fn exec_format(&self, kind: FormatKind) -> Result<(), HostError>;

    /// Whether a native command is on for the current selection.
    fn query_format(&self, kind: FormatKind) -> bool;

    // === Scheduling ===

    /// Run `task` after `delay_ms`. Zero means the next macrotask.
    fn schedule(&self, delay_ms: u32, task: ScheduledTask) -> TimerId;

    /// Cancel a pending timer. Unknown or already-fired ids are ignored.
    fn cancel(&self, timer: TimerId);

    /// Run `task` on the next animation frame.
    fn request_frame(&self, task: ScheduledTask);
}
