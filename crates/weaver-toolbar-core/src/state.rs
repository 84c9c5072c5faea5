//! Mutable per-instance toolbar state.
//!
//! Plain data. The selection handler, positioning engine and link handler
//! are the only writers, and they never run concurrently.

use std::collections::BTreeSet;

use crate::format::{DropCapTable, FormatKind};
use crate::geometry::Rect;
use crate::host::TimerId;

/// Which toolbar panel is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolbarView {
    /// Format buttons.
    #[default]
    Initial,
    /// URL input with save/cancel/visit/remove.
    LinkInput,
}

impl ToolbarView {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolbarView::Initial => "initial",
            ToolbarView::LinkInput => "link-input",
        }
    }
}

/// A request to focus the link input once the next macrotask runs.
///
/// Only one can be outstanding. Any view change clears it, so a late timer
/// finds either nothing or a newer generation and drops out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingFocus {
    pub generation: u64,
    pub select_all: bool,
}

/// State of one toolbar instance. `E` is the host element type, `R` the host
/// range type.
#[derive(Debug)]
pub struct ToolbarState<E, R> {
    current_view: ToolbarView,
    pub is_visible: bool,
    pub is_fixed: bool,
    pub is_at_fixed_position: bool,
    /// Trimmed selection text; empty when nothing is selected.
    pub selected_text: String,
    /// Untrimmed text of `selection_range`. Anything that replaces the
    /// range's contents writes this back, so surrounding whitespace survives.
    pub range_text: String,
    pub selection_range: Option<R>,
    /// Last known viewport-relative selection rect. Goes stale between events.
    pub selection_rect: Option<Rect>,
    /// Link the selection sits inside. Not owned; the DOM may drop it.
    pub existing_link: Option<E>,
    /// Set from a link-button click until one frame plus one timer later.
    pub is_processing_link_click: bool,
    pub active_formats: BTreeSet<FormatKind>,
    pub drop_caps: DropCapTable<E>,
    pub resize_timeout: Option<TimerId>,
    /// Toolbar width pinned for the lifetime of the current selection.
    pub cached_width: Option<f64>,
    /// Toolbar width just before the link view opened.
    pub link_width_before: Option<f64>,
    /// Last placement was below the selection.
    pub is_below: bool,
    pending_focus: Option<PendingFocus>,
    focus_generation: u64,
}

impl<E, R> ToolbarState<E, R> {
    pub fn new(is_fixed: bool) -> Self {
        Self {
            current_view: ToolbarView::Initial,
            is_visible: is_fixed,
            is_fixed,
            is_at_fixed_position: is_fixed,
            selected_text: String::new(),
            range_text: String::new(),
            selection_range: None,
            selection_rect: None,
            existing_link: None,
            is_processing_link_click: false,
            active_formats: BTreeSet::new(),
            drop_caps: DropCapTable::default(),
            resize_timeout: None,
            cached_width: None,
            link_width_before: None,
            is_below: false,
            pending_focus: None,
            focus_generation: 0,
        }
    }

    pub fn current_view(&self) -> ToolbarView {
        self.current_view
    }

    /// Switch views. Always drops any outstanding focus request.
    pub fn set_view(&mut self, view: ToolbarView) {
        if self.current_view != view {
            tracing::debug!(
                target: "weaver::toolbar",
                from = self.current_view.as_str(),
                to = view.as_str(),
                "view change"
            );
        }
        self.current_view = view;
        self.pending_focus = None;
    }

    pub fn has_selection(&self) -> bool {
        !self.selected_text.is_empty() && self.selection_range.is_some()
    }

    /// Store a fresh selection. `selected_text` gets the trimmed `text`,
    /// `range_text` keeps it as is.
    pub fn store_selection(&mut self, text: &str, range: R, rect: Rect) {
        self.selected_text = text.trim().to_string();
        self.range_text = text.to_string();
        self.selection_range = Some(range);
        self.selection_rect = Some(rect);
    }

    /// Forget the selection and the link it was in.
    pub fn clear_selection(&mut self) {
        self.selected_text.clear();
        self.range_text.clear();
        self.selection_range = None;
        self.selection_rect = None;
        self.existing_link = None;
    }

    /// Queue a focus request, replacing any older one.
    pub fn request_focus(&mut self, select_all: bool) -> PendingFocus {
        self.focus_generation += 1;
        let request = PendingFocus {
            generation: self.focus_generation,
            select_all,
        };
        self.pending_focus = Some(request);
        request
    }

    /// Take the pending focus request if it is still `generation`.
    pub fn take_focus(&mut self, generation: u64) -> Option<PendingFocus> {
        match self.pending_focus {
            Some(pending) if pending.generation == generation => self.pending_focus.take(),
            _ => None,
        }
    }

    pub fn pending_focus(&self) -> Option<PendingFocus> {
        self.pending_focus
    }

    /// Drop every reference and timer handle. Returns the timer the caller
    /// must cancel, if any.
    pub fn teardown(&mut self) -> Option<TimerId> {
        self.clear_selection();
        self.current_view = ToolbarView::Initial;
        self.pending_focus = None;
        self.is_processing_link_click = false;
        self.active_formats.clear();
        self.drop_caps.clear();
        self.cached_width = None;
        self.link_width_before = None;
        self.is_visible = false;
        self.resize_timeout.take()
    }
}
