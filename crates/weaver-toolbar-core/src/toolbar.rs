//! The toolbar instance: owns config, host, element cache and state, and
//! routes events and scheduled tasks to the handlers.
//!
//! Handler bodies live next to the concern they implement (`selection`,
//! `position`, `link`, `format`); this module holds construction, teardown
//! and the view refresh they all finish with.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ToolbarConfig;
use crate::elements::{ToolbarElements, ToolbarRole};
use crate::format::FormatKind;
use crate::host::{ScheduledTask, ToolbarHost};
use crate::registry::{self, PeerToolbar, ToolbarId};
use crate::state::{ToolbarState, ToolbarView};
use crate::style;

/// Shared handle to a registered toolbar.
pub type ToolbarHandle<H> = Rc<RefCell<Toolbar<H>>>;

/// One toolbar instance bound to one content region.
pub struct Toolbar<H: ToolbarHost> {
    pub(crate) id: ToolbarId,
    pub(crate) config: ToolbarConfig,
    pub(crate) host: H,
    pub(crate) elements: ToolbarElements<H::Element>,
    pub(crate) state: ToolbarState<H::Element, H::Range>,
}

impl<H: ToolbarHost> Toolbar<H> {
    /// Bind to the host document and put the toolbar in its resting state.
    ///
    /// A bad config or missing markup does not fail construction: the
    /// problem is logged and the instance stays inert.
    pub fn new(config: ToolbarConfig, host: H) -> Self {
        let elements = match config
            .validate()
            .and_then(|()| ToolbarElements::bind(&host, &config))
        {
            Ok(elements) => elements,
            Err(err) => {
                tracing::warn!(
                    target: "weaver::toolbar",
                    toolbar_id = %config.toolbar_id,
                    error = %err,
                    "toolbar disabled"
                );
                ToolbarElements::empty()
            }
        };
        let state = ToolbarState::new(config.is_fixed());

        let mut toolbar = Self {
            id: ToolbarId::next(),
            config,
            host,
            elements,
            state,
        };
        toolbar.update_view();
        toolbar
    }

    /// Wrap in a shared handle and register with the peer registry.
    pub fn attach(self) -> ToolbarHandle<H>
    where
        H: 'static,
    {
        let id = self.id;
        let handle = Rc::new(RefCell::new(self));
        let peer: Rc<dyn PeerToolbar> = handle.clone();
        registry::register(id, Rc::downgrade(&peer));
        handle
    }

    pub fn id(&self) -> ToolbarId {
        self.id
    }

    pub fn config(&self) -> &ToolbarConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn elements(&self) -> &ToolbarElements<H::Element> {
        &self.elements
    }

    pub fn state(&self) -> &ToolbarState<H::Element, H::Range> {
        &self.state
    }

    pub fn is_inert(&self) -> bool {
        self.elements.is_inert()
    }

    /// Detach from the registry and drop every reference.
    ///
    /// Cancels the pending resize timer and strips the classes and inline
    /// styles this instance put on its root. Afterwards every handler is a
    /// no-op. Calling it twice is harmless.
    pub fn destroy(&mut self) {
        registry::unregister(self.id);
        if let Some(timer) = self.state.teardown() {
            self.host.cancel(timer);
        }
        if let Some(root) = self.elements.root() {
            for class in [style::VISIBLE, style::FOLLOWING, style::BELOW] {
                self.host.set_class(root, class, false);
            }
            for property in ["left", "top", "transform", "width", style::WIDTH_VAR] {
                self.host.remove_style(root, property);
            }
        }
        self.elements = ToolbarElements::empty();
        tracing::debug!(target: "weaver::toolbar", toolbar_id = %self.config.toolbar_id, "toolbar destroyed");
    }

    /// Handle a click on one of the toolbar's buttons.
    pub fn handle_click(&mut self, role: ToolbarRole) {
        if self.is_inert() || !self.config.buttons.is_enabled(role) {
            return;
        }
        match role {
            ToolbarRole::Link => self.open_link_editor(),
            ToolbarRole::SaveLink => self.save_link(),
            ToolbarRole::CancelLink => self.cancel_link(),
            ToolbarRole::RemoveLink => self.remove_link(),
            ToolbarRole::VisitLink => self.visit_link(),
            other => {
                if let Some(kind) = FormatKind::from_role(other) {
                    self.apply_format(kind);
                }
            }
        }
    }

    /// Entry point for timers and animation frames handed back by the host.
    pub fn run_task(&mut self, task: ScheduledTask) {
        if self.is_inert() {
            tracing::trace!(target: "weaver::toolbar", ?task, "task after teardown dropped");
            return;
        }
        match task {
            ScheduledTask::ResizeRecompute => self.on_resize_timer(),
            ScheduledTask::LinkClickFrame => self.on_link_click_frame(),
            ScheduledTask::LinkClickRelease => self.on_link_click_release(),
            ScheduledTask::FocusLinkInput { generation } => self.on_focus_timer(generation),
        }
    }

    /// Focus entered the content region.
    pub fn on_content_focus(&mut self) {
        if self.is_inert() || !self.config.is_fixed() {
            return;
        }
        self.state.is_visible = true;
        self.update_view();
    }

    /// Focus left the content region for `related`.
    ///
    /// Moving into the toolbar (the link input, a button) keeps everything.
    /// Anywhere else sends a fixed toolbar home.
    pub fn on_content_blur(&mut self, related: Option<&H::Node>) {
        if self.is_inert() || !self.config.is_fixed() {
            return;
        }
        let into_toolbar = match (self.elements.root(), related) {
            (Some(root), Some(node)) => self.host.contains(root, node),
            _ => false,
        };
        if into_toolbar || self.state.is_processing_link_click {
            return;
        }
        if self.state.current_view() == ToolbarView::LinkInput {
            return;
        }
        self.state.clear_selection();
        self.refresh_formats();
        self.reset_to_anchor();
    }

    /// Forced back to the resting look by a peer that took over.
    pub fn deactivate(&mut self) {
        if self.is_inert() {
            return;
        }
        tracing::trace!(target: "weaver::toolbar", toolbar_id = %self.config.toolbar_id, "deactivated by peer");
        self.cancel_resize();
        self.state.clear_selection();
        self.state.set_view(ToolbarView::Initial);
        self.clear_link_input();
        if self.config.is_fixed() {
            self.reset_to_anchor();
        } else {
            self.state.is_visible = false;
            self.release_width();
            self.update_view();
        }
    }

    /// Whether this instance is tracking a selection right now.
    pub fn is_following(&self) -> bool {
        if self.is_inert() {
            return false;
        }
        if self.config.is_fixed() {
            !self.state.is_at_fixed_position
        } else {
            self.state.is_visible && self.state.has_selection()
        }
    }

    /// Bring the DOM in line with the current view and visibility, then
    /// reposition.
    pub fn update_view(&mut self) {
        let Some(root) = self.elements.root() else {
            return;
        };
        let view = self.state.current_view();
        if let Some(panel) = self.elements.get(ToolbarRole::InitialView) {
            self.host
                .set_class(panel, style::HIDDEN, view != ToolbarView::Initial);
        }
        if let Some(panel) = self.elements.get(ToolbarRole::LinkView) {
            self.host
                .set_class(panel, style::HIDDEN, view != ToolbarView::LinkInput);
        }
        if let Some(remove) = self.elements.get(ToolbarRole::RemoveLink) {
            self.host
                .set_class(remove, style::HIDDEN, self.state.existing_link.is_none());
        }

        let visible = self.state.is_visible || self.state.is_fixed;
        self.host.set_class(root, style::VISIBLE, visible);
        if !visible {
            self.host.set_class(root, style::FOLLOWING, false);
        }

        self.sync_visit_button();
        if visible {
            self.update_position();
        }
    }

    /// Pin the current rendered width so view changes don't make it jump.
    /// Only the first call per selection measures.
    pub(crate) fn capture_width(&mut self) {
        if self.state.cached_width.is_some() {
            return;
        }
        let Some(root) = self.elements.root() else {
            return;
        };
        let width = self.host.measure(root).width;
        if width.is_finite() && width > 0.0 {
            self.state.cached_width = Some(width);
            self.host.set_style(root, style::WIDTH_VAR, &px(width));
        }
    }

    /// Drop every width override.
    pub(crate) fn release_width(&mut self) {
        self.state.cached_width = None;
        self.state.link_width_before = None;
        if let Some(root) = self.elements.root() {
            self.host.remove_style(root, style::WIDTH_VAR);
            self.host.remove_style(root, "width");
        }
    }

    pub(crate) fn clear_link_input(&self) {
        if let Some(input) = self.elements.get(ToolbarRole::LinkInput) {
            self.host.set_input_value(input, "");
        }
    }
}

impl<H: ToolbarHost> PeerToolbar for RefCell<Toolbar<H>> {
    fn deactivate(&self) {
        match self.try_borrow_mut() {
            Ok(mut toolbar) => toolbar.deactivate(),
            Err(_) => {
                tracing::trace!(target: "weaver::toolbar", "peer busy, skipping deactivate");
            }
        }
    }

    fn is_following(&self) -> bool {
        self.try_borrow()
            .map(|toolbar| toolbar.is_following())
            .unwrap_or(false)
    }
}

/// Format a length for an inline style.
pub(crate) fn px(value: f64) -> String {
    format!("{value}px")
}
