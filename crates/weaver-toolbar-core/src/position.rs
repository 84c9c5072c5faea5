//! Positioning engine.
//!
//! The toolbar is absolutely positioned inside the placement anchor (the
//! configured container), so every calculation here happens in the anchor's
//! coordinate frame. The flip decision and the final clamp both use the part
//! of the anchor that is actually on screen, expressed in that same frame,
//! which keeps above/below choices consistent when the anchor is scrolled
//! partly out of view.

use crate::config::{FixedPosition, Offset};
use crate::geometry::{Rect, Size, Viewport, fits_above, space_below};
use crate::host::{ScheduledTask, ToolbarHost};
use crate::state::ToolbarView;
use crate::style;
use crate::toolbar::{Toolbar, px};

/// Size assumed when the toolbar measures as zero (not laid out yet, or
/// `display: none` mid-transition).
pub const FALLBACK_TOOLBAR_SIZE: Size = Size {
    width: 320.0,
    height: 40.0,
};

/// Which point of the toolbar `left`/`top` refer to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementTransform {
    /// Horizontal center of the top edge.
    CenterTop,
    /// Horizontal center of the bottom edge.
    CenterBottom,
    /// Top-left corner.
    None,
}

impl PlacementTransform {
    pub fn as_css(self) -> &'static str {
        match self {
            PlacementTransform::CenterTop => "translate(-50%, 0)",
            PlacementTransform::CenterBottom => "translate(-50%, -100%)",
            PlacementTransform::None => "none",
        }
    }

}

/// Anchor-relative toolbar position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub transform: PlacementTransform,
    pub below: bool,
}

impl Placement {
    fn is_finite(&self) -> bool {
        self.left.is_finite() && self.top.is_finite()
    }
}

/// The stretch of `[lo, hi)` that is also inside `[view_lo, view_hi)`.
///
/// Falls back to the viewport stretch when the intersection can't hold
/// `need` pixels.
fn visible_band(lo: f64, hi: f64, view_lo: f64, view_hi: f64, need: f64) -> (f64, f64) {
    let band = (lo.max(view_lo), hi.min(view_hi));
    if band.1 - band.0 >= need {
        band
    } else {
        (view_lo, view_hi)
    }
}

/// Place the toolbar next to `selection`.
///
/// `selection` and `anchor` are viewport rects; the result is relative to
/// `anchor`. Above is preferred. Below is used when the space above can't
/// hold the toolbar plus the gap but the space below can. Returns `None` for
/// unusable input.
pub fn compute_floating_placement(
    selection: &Rect,
    anchor: &Rect,
    viewport: &Viewport,
    toolbar: Size,
    offset: Offset,
) -> Option<Placement> {
    if selection.is_degenerate()
        || !anchor.is_finite()
        || !(toolbar.width > 0.0 && toolbar.height > 0.0)
        || !toolbar.width.is_finite()
        || !toolbar.height.is_finite()
        || !offset.x.is_finite()
        || !offset.y.is_finite()
    {
        return None;
    }

    let sel = selection.relative_to(anchor);
    let (height, half) = (toolbar.height, toolbar.width / 2.0);

    let (band_top, band_bottom) = visible_band(
        0.0,
        anchor.height,
        -anchor.y,
        viewport.height - anchor.y,
        height,
    );
    // Same rect and viewport, shifted so the band starts at zero.
    let in_band = Rect::new(sel.x, sel.y - band_top, sel.width, sel.height);
    let band = Viewport::new(viewport.width, band_bottom - band_top);
    let below = !fits_above(&in_band, height, offset.y)
        && space_below(&in_band, &band) >= height + offset.y;

    let top = if below {
        (sel.bottom() + offset.y)
            .min(band_bottom - height)
            .max(band_top)
    } else {
        (sel.top() - offset.y)
            .max(band_top + height)
            .min(band_bottom)
    };

    let (band_left, band_right) = visible_band(
        0.0,
        anchor.width,
        -anchor.x,
        viewport.width - anchor.x,
        toolbar.width,
    );
    let center = sel.center_x() + offset.x;
    let left = if band_right - band_left >= toolbar.width {
        center.max(band_left + half).min(band_right - half)
    } else {
        band_left + half
    };

    let placement = Placement {
        left,
        top,
        transform: if below {
            PlacementTransform::CenterTop
        } else {
            PlacementTransform::CenterBottom
        },
        below,
    };
    placement.is_finite().then_some(placement)
}

/// The fixed-mode resting slot inside `anchor`.
pub fn compute_anchor_slot(anchor: &Rect, slot: &FixedPosition) -> Placement {
    let (left, transform) = if slot.center {
        (anchor.width / 2.0, PlacementTransform::CenterTop)
    } else {
        (0.0, PlacementTransform::None)
    };
    Placement {
        left: if left.is_finite() { left } else { 0.0 },
        top: slot.top,
        transform,
        below: false,
    }
}

impl<H: ToolbarHost> Toolbar<H> {
    /// Move the toolbar to wherever the current state says it belongs.
    ///
    /// Fixed mode with no selection goes back to the anchor slot; fixed mode
    /// with a selection follows it. Floating mode only moves while visible.
    pub fn update_position(&mut self) {
        if self.is_inert() {
            return;
        }
        if self.state.is_fixed {
            if !self.state.has_selection() {
                self.reset_to_anchor();
            } else if self.place_near_selection() {
                self.state.is_at_fixed_position = false;
            }
        } else if self.state.is_visible && self.state.has_selection() {
            self.place_near_selection();
        }
    }

    /// Re-read the stored range's rect, then reposition.
    pub fn reposition(&mut self) {
        if let Some(range) = &self.state.selection_range {
            let rect = self.host.range_rect(range);
            if !rect.is_degenerate() {
                self.state.selection_rect = Some(rect);
            }
        }
        self.update_view();
    }

    /// Park the toolbar in its resting place: the anchor slot in fixed
    /// mode, hidden in floating mode.
    pub fn reset_to_anchor(&mut self) {
        let Some(root) = self.elements.root().cloned() else {
            return;
        };
        self.host.set_class(&root, style::FOLLOWING, false);

        if !self.state.is_fixed {
            self.state.is_visible = false;
            self.host.set_class(&root, style::VISIBLE, false);
            return;
        }

        let anchor = self
            .elements
            .container()
            .map(|container| self.host.bounding_rect(container))
            .unwrap_or_default();
        let slot = compute_anchor_slot(&anchor, &self.config.fixed_position);
        self.apply_placement(&root, &slot);

        // The link form keeps its width until it closes.
        if self.state.current_view() == ToolbarView::Initial {
            self.release_width();
        }
        self.state.is_at_fixed_position = true;
        self.state.is_visible = true;
        self.host.set_class(&root, style::VISIBLE, true);
    }

    /// Window resized. Debounced; only the last of a burst recomputes.
    pub fn on_resize(&mut self) {
        if self.is_inert() || !self.state.is_visible {
            return;
        }
        self.cancel_resize();
        let timer = self
            .host
            .schedule(self.config.resize_debounce_ms, ScheduledTask::ResizeRecompute);
        self.state.resize_timeout = Some(timer);
    }

    pub(crate) fn cancel_resize(&mut self) {
        if let Some(timer) = self.state.resize_timeout.take() {
            self.host.cancel(timer);
        }
    }

    pub(crate) fn on_resize_timer(&mut self) {
        self.state.resize_timeout = None;
        let Some(content) = self.elements.content() else {
            return;
        };

        let range = self.state.selection_range.as_ref().filter(|range| {
            let container = self.host.range_container(range);
            self.host.contains(content, &container)
        });
        let Some(range) = range else {
            tracing::trace!(target: "weaver::toolbar", "resize: selection gone, skipping recompute");
            if self.state.is_fixed {
                self.state.clear_selection();
                self.reset_to_anchor();
            }
            return;
        };

        let rect = self.host.range_rect(range);
        if rect.is_degenerate() {
            return;
        }
        self.state.selection_rect = Some(rect);
        self.update_position();
    }

    /// Scroll tick. Not debounced; tracks the selection continuously.
    pub fn on_scroll(&mut self) {
        if self.is_inert() || !self.state.has_selection() {
            return;
        }
        let Some(range) = &self.state.selection_range else {
            return;
        };
        let rect = self.host.range_rect(range);
        let viewport = self.host.viewport();

        if rect.is_degenerate() || !rect.intersects_vertically(&viewport) {
            if self.state.is_visible || !self.state.is_at_fixed_position {
                tracing::trace!(target: "weaver::toolbar", "selection scrolled out of view");
            }
            if self.state.is_fixed {
                self.reset_to_anchor();
            } else {
                self.state.is_visible = false;
                self.update_view();
            }
            return;
        }

        self.state.selection_rect = Some(rect);
        self.capture_width();
        self.state.is_visible = true;
        self.update_view();
    }

    fn place_near_selection(&mut self) -> bool {
        let (Some(root), Some(container)) = (
            self.elements.root().cloned(),
            self.elements.container().cloned(),
        ) else {
            return false;
        };
        let Some(selection) = self.state.selection_rect else {
            return false;
        };

        let anchor = self.host.bounding_rect(&container);
        let viewport = self.host.viewport();
        let size = self.toolbar_size(&root);
        let Some(placement) =
            compute_floating_placement(&selection, &anchor, &viewport, size, self.config.offset)
        else {
            tracing::trace!(target: "weaver::toolbar", ?selection, ?anchor, "no usable placement");
            return false;
        };

        self.apply_placement(&root, &placement);
        self.host.set_class(&root, style::FOLLOWING, true);
        true
    }

    fn toolbar_size(&self, root: &H::Element) -> Size {
        let measured = self.host.measure(root);
        let usable = |v: f64| v.is_finite() && v > 0.0;
        let width = if usable(measured.width) {
            measured.width
        } else {
            self.state
                .cached_width
                .filter(|w| usable(*w))
                .unwrap_or(FALLBACK_TOOLBAR_SIZE.width)
        };
        let height = if usable(measured.height) {
            measured.height
        } else {
            FALLBACK_TOOLBAR_SIZE.height
        };
        Size::new(width, height)
    }

    fn apply_placement(&mut self, root: &H::Element, placement: &Placement) {
        self.host.set_style(root, "left", &px(placement.left));
        self.host.set_style(root, "top", &px(placement.top));
        self.host
            .set_style(root, "transform", placement.transform.as_css());
        self.host.set_class(root, style::BELOW, placement.below);
        self.state.is_below = placement.below;
    }
}
