//! Selection handler: turns pointer-up, key-up and selection-change events
//! into toolbar state.
//!
//! This runs on every such event in the document, most of which have nothing
//! to do with this toolbar. Nothing here may panic, and "no selection" covers
//! every way the selection can be missing or unusable.

use crate::elements::ToolbarRole;
use crate::host::{SelectionSnapshot, ToolbarHost};
use crate::registry;
use crate::state::ToolbarView;
use crate::toolbar::Toolbar;

/// A raw UI event relevant to selection tracking.
#[derive(Clone, Debug)]
pub enum ToolbarEvent<N> {
    PointerUp { target: N },
    KeyUp { target: N },
    SelectionChange,
}

impl<N> ToolbarEvent<N> {
    pub fn target(&self) -> Option<&N> {
        match self {
            ToolbarEvent::PointerUp { target } | ToolbarEvent::KeyUp { target } => Some(target),
            ToolbarEvent::SelectionChange => None,
        }
    }

    pub fn is_pointer_up(&self) -> bool {
        matches!(self, ToolbarEvent::PointerUp { .. })
    }
}

impl<H: ToolbarHost> Toolbar<H> {
    /// Process one selection-related event.
    pub fn handle_selection(&mut self, event: &ToolbarEvent<H::Node>) {
        let (Some(content), Some(root)) = (
            self.elements.content().cloned(),
            self.elements.root().cloned(),
        ) else {
            return;
        };

        let target = event.target();
        let in_content = target.is_some_and(|node| self.host.contains(&content, node));
        let in_toolbar = target.is_some_and(|node| self.host.contains(&root, node));

        // Only one toolbar follows a selection at a time.
        if event.is_pointer_up() && in_content {
            registry::deactivate_peers(self.id);
        }

        if in_toolbar {
            tracing::trace!(target: "weaver::toolbar", "event inside toolbar ignored");
            return;
        }

        if self.state.is_processing_link_click {
            tracing::trace!(target: "weaver::toolbar", "link click in progress, event ignored");
            return;
        }

        let snapshot = self.host.read_selection();

        // Focusing the link input moves the document selection into the
        // toolbar; that is not the user deselecting their text.
        if target.is_none()
            && snapshot
                .as_ref()
                .is_some_and(|s| self.host.contains(&root, &s.anchor))
        {
            tracing::trace!(target: "weaver::toolbar", "selection moved into toolbar, ignored");
            return;
        }

        if event.is_pointer_up() && !in_content {
            self.dismiss();
        } else {
            match snapshot.filter(|s| self.is_active_selection(s, &content)) {
                Some(snapshot) => self.on_active_selection(snapshot),
                None => self.on_empty_selection(),
            }
        }

        self.refresh_formats();
        self.update_view();
    }

    /// Read the live selection, keeping it only if it is active and inside
    /// `content`.
    pub(crate) fn read_active_selection(
        &self,
        content: &H::Element,
    ) -> Option<SelectionSnapshot<H::Node, H::Range>> {
        self.host
            .read_selection()
            .filter(|s| self.is_active_selection(s, content))
    }

    fn is_active_selection(
        &self,
        snapshot: &SelectionSnapshot<H::Node, H::Range>,
        content: &H::Element,
    ) -> bool {
        !snapshot.collapsed
            && !snapshot.text.trim().is_empty()
            && !snapshot.rect.is_degenerate()
            && self.host.contains(content, &snapshot.anchor)
    }

    fn on_active_selection(&mut self, snapshot: SelectionSnapshot<H::Node, H::Range>) {
        // Measure before anything below changes the toolbar's content.
        self.capture_width();

        let link = self.host.closest_link(&snapshot.anchor);
        self.state
            .store_selection(&snapshot.text, snapshot.range, snapshot.rect);
        self.state.is_visible = true;

        tracing::trace!(
            target: "weaver::toolbar",
            len = self.state.selected_text.len(),
            in_link = link.is_some(),
            "active selection"
        );

        match link {
            Some(link) => {
                let href = self.host.link_href(&link).unwrap_or_default();
                self.state.existing_link = Some(link);
                if self.state.current_view() != ToolbarView::LinkInput {
                    self.state.set_view(ToolbarView::LinkInput);
                }
                if let Some(input) = self.elements.get(ToolbarRole::LinkInput) {
                    self.host.set_input_value(input, &href);
                }
            }
            None => {
                self.state.existing_link = None;
                if self.state.current_view() != ToolbarView::Initial {
                    self.state.set_view(ToolbarView::Initial);
                }
                self.clear_link_input();
            }
        }
    }

    fn on_empty_selection(&mut self) {
        self.state.clear_selection();
        self.state.is_visible = self.state.is_fixed;
        self.state.set_view(ToolbarView::Initial);
        self.clear_link_input();
        self.release_width();
    }

    /// Pointer-up outside both the content region and the toolbar.
    fn dismiss(&mut self) {
        tracing::trace!(target: "weaver::toolbar", "click outside, dismissing");
        self.state.clear_selection();
        self.state.set_view(ToolbarView::Initial);
        self.clear_link_input();
        self.state.active_formats.clear();
        self.state.is_visible = self.state.is_fixed;
        self.release_width();
    }
}
