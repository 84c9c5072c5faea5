//! Rectangle and viewport math used by the positioning engine.
//!
//! Everything here is pure. Rectangles are in CSS pixels; whether they are
//! viewport-relative or anchor-relative is up to the caller, and
//! [`Rect::relative_to`] converts between the two.

/// Axis-aligned rectangle, DOMRect-style.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// A rect that can't be positioned against.
    ///
    /// Collapsed selections report an all-zero rect in most browsers, and a
    /// detached range reports NaN in some. Both mean "no selection".
    pub fn is_degenerate(&self) -> bool {
        !self.is_finite() || (self.width <= 0.0 && self.height <= 0.0)
    }

    /// Express this rect in the coordinate frame whose origin is `anchor`'s
    /// top-left corner.
    pub fn relative_to(&self, anchor: &Rect) -> Rect {
        Rect::new(self.x - anchor.x, self.y - anchor.y, self.width, self.height)
    }

    /// Whether any part of the rect is inside the viewport's vertical extent.
    pub fn intersects_vertically(&self, viewport: &Viewport) -> bool {
        self.bottom() > 0.0 && self.top() < viewport.height
    }
}

/// The visible window area. Rects are viewport-relative, so scroll offsets
/// never enter the math.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Rendered toolbar dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Space between the viewport top and the rect top.
pub fn space_above(rect: &Rect) -> f64 {
    rect.top()
}

/// Space between the rect bottom and the viewport bottom.
pub fn space_below(rect: &Rect, viewport: &Viewport) -> f64 {
    viewport.height - rect.bottom()
}

/// Whether a toolbar of `toolbar_height` plus `offset` gap fits above `rect`.
pub fn fits_above(rect: &Rect, toolbar_height: f64, offset: f64) -> bool {
    space_above(rect) >= toolbar_height + offset
}
