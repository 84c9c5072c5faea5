//! Link editing: the second toolbar view.
//!
//! Opening the form spans two scheduling boundaries. The click guard stays up
//! for one animation frame plus one zero-delay timer so the selection events
//! the click itself causes can't close the form again, and the input is
//! focused on the next macrotask through the single pending-focus slot in
//! [`ToolbarState`](crate::ToolbarState). Both callbacks re-check state when
//! they fire.

use crate::elements::ToolbarRole;
use crate::host::{ScheduledTask, ToolbarHost};
use crate::state::ToolbarView;
use crate::style;
use crate::toolbar::{Toolbar, px};
use crate::url::{is_valid_url, normalize_url};

pub const LINK_INPUT_MIN_WIDTH: f64 = 180.0;
pub const LINK_BUTTON_WIDTH: f64 = 36.0;
pub const LINK_BUTTON_GAP: f64 = 4.0;
pub const LINK_VIEW_PADDING: f64 = 16.0;
/// Widest the link view grows to when inheriting the toolbar's width.
pub const LINK_VIEW_MAX_WIDTH: f64 = 450.0;

/// Smallest toolbar width that fits the URL input plus `buttons` actions.
pub fn link_view_min_width(buttons: usize) -> f64 {
    LINK_INPUT_MIN_WIDTH + buttons as f64 * (LINK_BUTTON_WIDTH + LINK_BUTTON_GAP) + LINK_VIEW_PADDING
}

/// Width of the link view given the toolbar's width before it opened.
pub fn link_view_width(previous: f64, buttons: usize) -> f64 {
    link_view_min_width(buttons).max(previous.min(LINK_VIEW_MAX_WIDTH))
}

/// What the caller should do with a key event from the link input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    PreventDefault,
    PassThrough,
}

impl<H: ToolbarHost> Toolbar<H> {
    /// Link button clicked: switch to the link form.
    pub fn open_link_editor(&mut self) {
        let Some(root) = self.elements.root().cloned() else {
            return;
        };

        self.state.is_processing_link_click = true;
        self.host.request_frame(ScheduledTask::LinkClickFrame);

        let previous = self
            .state
            .cached_width
            .unwrap_or_else(|| self.host.measure(&root).width);
        self.state.link_width_before = Some(previous);

        if self.state.selection_range.is_none() {
            if let Some(content) = self.elements.content().cloned() {
                if let Some(snapshot) = self.read_active_selection(&content) {
                    self.state
                        .store_selection(&snapshot.text, snapshot.range, snapshot.rect);
                }
            }
        }

        let link = self.state.existing_link.clone().or_else(|| {
            self.state.selection_range.as_ref().and_then(|range| {
                let container = self.host.range_container(range);
                self.host.closest_link(&container)
            })
        });
        let href = link
            .as_ref()
            .and_then(|link| self.host.link_href(link))
            .unwrap_or_default();
        // save, cancel, visit; remove only when editing
        let buttons = if link.is_some() { 4 } else { 3 };
        self.state.existing_link = link;

        if let Some(input) = self.elements.get(ToolbarRole::LinkInput) {
            self.host.set_input_value(input, &href);
        }
        let width = link_view_width(previous, buttons);
        self.host.set_style(&root, "width", &px(width));

        self.state.set_view(ToolbarView::LinkInput);
        let focus = self.state.request_focus(!href.is_empty());
        self.host.schedule(
            0,
            ScheduledTask::FocusLinkInput {
                generation: focus.generation,
            },
        );

        tracing::debug!(
            target: "weaver::toolbar",
            editing = self.state.existing_link.is_some(),
            width,
            "link editor opened"
        );
        self.update_view();
    }

    pub(crate) fn on_link_click_frame(&mut self) {
        self.host.schedule(0, ScheduledTask::LinkClickRelease);
    }

    pub(crate) fn on_link_click_release(&mut self) {
        self.state.is_processing_link_click = false;
    }

    pub(crate) fn on_focus_timer(&mut self, generation: u64) {
        if self.state.current_view() != ToolbarView::LinkInput {
            tracing::trace!(target: "weaver::toolbar", generation, "view changed, focus dropped");
            return;
        }
        let Some(request) = self.state.take_focus(generation) else {
            tracing::trace!(target: "weaver::toolbar", generation, "stale focus request");
            return;
        };
        if let Some(input) = self.elements.get(ToolbarRole::LinkInput) {
            self.host.focus_input(input, request.select_all);
        }
    }

    /// Create a link over the stored selection, or retarget the existing one.
    pub fn save_link(&mut self) {
        let Some(input) = self.elements.get(ToolbarRole::LinkInput) else {
            return;
        };
        let value = self.host.input_value(input);
        let value = value.trim();
        if value.is_empty() {
            tracing::debug!(target: "weaver::toolbar", "empty url, link not saved");
            return;
        }
        if !is_valid_url(value) {
            tracing::debug!(target: "weaver::toolbar", url = value, "invalid url, link not saved");
            return;
        }
        let Some(range) = self.state.selection_range.clone() else {
            tracing::debug!(target: "weaver::toolbar", "no stored selection, link not saved");
            return;
        };

        let href = normalize_url(value);
        let result = match &self.state.existing_link {
            Some(link) => self.host.set_link_href(link, &href),
            None => self
                .host
                .insert_link(&range, &href, &self.state.range_text)
                .map(|_| ()),
        };
        if let Err(err) = result {
            tracing::warn!(target: "weaver::toolbar", error = %err, "could not save link");
            return;
        }

        tracing::debug!(target: "weaver::toolbar", href = %href, "link saved");
        self.finish_link_edit();
    }

    /// Close the form, leaving the document and the stored selection alone.
    pub fn cancel_link(&mut self) {
        self.clear_link_input();
        self.release_width();
        self.state.set_view(ToolbarView::Initial);
        self.update_view();
    }

    /// Unwrap the link the selection sits in.
    pub fn remove_link(&mut self) {
        let Some(link) = self.state.existing_link.clone() else {
            tracing::debug!(target: "weaver::toolbar", "no link to remove");
            return;
        };
        if let Err(err) = self.host.unwrap_link(&link) {
            tracing::warn!(target: "weaver::toolbar", error = %err, "could not remove link");
            return;
        }
        tracing::debug!(target: "weaver::toolbar", "link removed");
        self.finish_link_edit();
    }

    /// Open the typed URL in a new browsing context.
    pub fn visit_link(&self) {
        let Some(input) = self.elements.get(ToolbarRole::LinkInput) else {
            return;
        };
        let value = self.host.input_value(input);
        if is_valid_url(&value) {
            self.host.open_url(&normalize_url(&value));
        }
    }

    /// Keystroke in the link input: keep the visit button in step.
    pub fn on_link_input(&self) {
        self.sync_visit_button();
    }

    /// Key press in the link input.
    pub fn handle_link_key(&mut self, key: &str) -> KeyOutcome {
        match key {
            // URLs don't contain raw spaces.
            " " => KeyOutcome::PreventDefault,
            "Enter" => {
                self.save_link();
                KeyOutcome::PreventDefault
            }
            "Escape" => {
                self.cancel_link();
                KeyOutcome::PreventDefault
            }
            _ => KeyOutcome::PassThrough,
        }
    }

    pub(crate) fn sync_visit_button(&self) {
        let (Some(input), Some(visit)) = (
            self.elements.get(ToolbarRole::LinkInput),
            self.elements.get(ToolbarRole::VisitLink),
        ) else {
            return;
        };
        let valid = is_valid_url(&self.host.input_value(input));
        self.host.set_class(visit, style::HIDDEN, !valid);
    }

    fn finish_link_edit(&mut self) {
        self.host.clear_selection();
        self.state.clear_selection();
        self.state.set_view(ToolbarView::Initial);
        self.clear_link_input();
        self.release_width();
        self.state.is_visible = self.state.is_fixed;
        self.refresh_formats();
        self.update_view();
    }
}
