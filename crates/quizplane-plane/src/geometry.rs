//! Coordinate mapping and label placement.
//!
//! Data space is a square `[min, max]²`; pixel space is the image inset by
//! `padding` on every side, with the y axis flipped so data-up is pixel-up.

/// A position in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Width and height of a box in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Placement of a text label relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    Center,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Align {
    fn is_left(self) -> bool {
        matches!(self, Align::Left | Align::TopLeft | Align::BottomLeft)
    }

    fn is_right(self) -> bool {
        matches!(self, Align::Right | Align::TopRight | Align::BottomRight)
    }

    fn is_top(self) -> bool {
        matches!(self, Align::Top | Align::TopLeft | Align::TopRight)
    }

    fn is_bottom(self) -> bool {
        matches!(self, Align::Bottom | Align::BottomLeft | Align::BottomRight)
    }

    /// Short code (`tr`, `bl`, `c`, ...).
    pub fn code(self) -> &'static str {
        match self {
            Align::Center => "c",
            Align::Left => "l",
            Align::Right => "r",
            Align::Top => "t",
            Align::Bottom => "b",
            Align::TopLeft => "tl",
            Align::TopRight => "tr",
            Align::BottomLeft => "bl",
            Align::BottomRight => "br",
        }
    }

    /// SVG `text-anchor` keeping the text on the aligned side of the anchor.
    pub fn text_anchor(self) -> &'static str {
        if self.is_left() {
            "end"
        } else if self.is_right() {
            "start"
        } else {
            "middle"
        }
    }

    /// SVG `dominant-baseline` keeping the text on the aligned side.
    pub fn dominant_baseline(self) -> &'static str {
        if self.is_top() {
            "text-after-edge"
        } else if self.is_bottom() {
            "text-before-edge"
        } else {
            "middle"
        }
    }

    /// Pixel offset of the text origin from the anchor.
    pub fn offset(self, margin: f64) -> (f64, f64) {
        let dx = if self.is_left() {
            -margin
        } else if self.is_right() {
            margin
        } else {
            0.0
        };
        let dy = if self.is_top() {
            -margin
        } else if self.is_bottom() {
            margin
        } else {
            0.0
        };
        (dx, dy)
    }
}

/// Pick the corner for a label of `size` anchored at `anchor`.
///
/// Corners are tried in the order top-right, bottom-right, bottom-left,
/// top-left; the first with room against `bound` on both axes wins, and
/// bottom-right is the fallback. Other labels are not considered.
pub fn get_align(size: Size, anchor: Point, bound: Bounds) -> Align {
    let can_top = anchor.y - bound.top >= size.height;
    let can_bottom = bound.bottom - anchor.y >= size.height;
    let can_left = anchor.x - bound.left >= size.width;
    let can_right = bound.right - anchor.x >= size.width;

    if can_top && can_right {
        Align::TopRight
    } else if can_bottom && can_right {
        Align::BottomRight
    } else if can_bottom && can_left {
        Align::BottomLeft
    } else if can_top && can_left {
        Align::TopLeft
    } else {
        Align::BottomRight
    }
}

/// Upper bound on gridlines per axis.
pub const MAX_GRID_LINES: usize = 1000;

/// Largest coordinate magnitude at which unit steps stay exact.
const MAX_EXACT_COORD: f64 = 9_007_199_254_740_992.0;

/// Affine map between data space and pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneMapping {
    pub min: f64,
    pub max: f64,
    /// Pixel rectangle the data square maps onto.
    pub inner: Bounds,
}

impl PlaneMapping {
    pub fn new(min: f64, max: f64, width: f64, height: f64, padding: f64) -> Self {
        Self {
            min,
            max,
            inner: Bounds {
                left: padding,
                top: padding,
                right: width - padding,
                bottom: height - padding,
            },
        }
    }

    fn range(&self) -> f64 {
        self.max - self.min
    }

    pub fn map_x(&self, x: f64) -> f64 {
        let t = (x - self.min) / self.range();
        self.inner.left + t * (self.inner.right - self.inner.left)
    }

    pub fn map_y(&self, y: f64) -> f64 {
        let t = (y - self.min) / self.range();
        self.inner.top + (1.0 - t) * (self.inner.bottom - self.inner.top)
    }

    pub fn map(&self, x: f64, y: f64) -> Point {
        Point {
            x: self.map_x(x),
            y: self.map_y(y),
        }
    }

    /// Inverse of [`map_x`](Self::map_x).
    pub fn unmap_x(&self, px: f64) -> f64 {
        let t = (px - self.inner.left) / (self.inner.right - self.inner.left);
        self.min + t * self.range()
    }

    /// Inverse of [`map_y`](Self::map_y).
    pub fn unmap_y(&self, py: f64) -> f64 {
        let t = 1.0 - (py - self.inner.top) / (self.inner.bottom - self.inner.top);
        self.min + t * self.range()
    }

    /// Clamp a data coordinate into range.
    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }

    /// Whether both coordinates lie within `[min, max]`.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.clamp(x) == x && self.clamp(y) == y
    }

    /// One grid cell less a pixel, the room a point label needs.
    pub fn label_size(&self) -> Size {
        Size {
            width: (self.map_x(1.0) - self.map_x(0.0)).abs() - 1.0,
            height: (self.map_y(1.0) - self.map_y(0.0)).abs() - 1.0,
        }
    }

    /// Pixel rectangle of the data square.
    pub fn plot_bounds(&self) -> Bounds {
        Bounds {
            left: self.map_x(self.min),
            top: self.map_y(self.max),
            right: self.map_x(self.max),
            bottom: self.map_y(self.min),
        }
    }

    /// Whether `[min, max]` is a non-empty finite range whose integer
    /// grid is exact and at most [`MAX_GRID_LINES`] long.
    pub fn is_drawable_range(min: f64, max: f64) -> bool {
        min.is_finite()
            && max.is_finite()
            && min < max
            && min.abs().max(max.abs()) < MAX_EXACT_COORD
            && max - min < MAX_GRID_LINES as f64
    }

    /// Integer coordinates within range, ascending, capped at
    /// [`MAX_GRID_LINES`].
    pub fn grid_values(&self) -> Vec<f64> {
        let first = self.min.ceil();
        let last = self.max.floor();
        if first.is_nan() || last.is_nan() || first > last {
            return Vec::new();
        }
        let span = last - first;
        let count = if span < MAX_GRID_LINES as f64 {
            span as usize + 1
        } else {
            MAX_GRID_LINES
        };
        (0..count).map(|i| first + i as f64).collect()
    }
}
