//! Geometry in layout units: rectangles, regions and the layout bounding box.

use serde::{Deserialize, Serialize};

/// A point in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Creates a new `Point`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Bottom edge (layout space grows upwards)
    pub y: f64,
    /// Width
    pub w: f64,
    /// Height
    pub h: f64,
}

impl Rect {
    /// Creates a new `Rect`.
    #[must_use]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (`x + w`).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Top edge (`y + h`).
    #[must_use]
    pub fn top(&self) -> f64 {
        self.y + self.h
    }

    /// Half-open containment: `x <= px < x + w` and `y <= py < y + h`.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.x <= point.x && point.x < self.right() && self.y <= point.y && point.y < self.top()
    }
}

/// A named rectangle rendered to represent one bit's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Position and size in layout units
    pub bounds: Rect,
    /// Name shown to the user (tooltips, listings)
    pub display_name: String,
}

impl Region {
    /// Creates a new `Region`.
    pub fn new(bounds: Rect, display_name: impl Into<String>) -> Self {
        Self {
            bounds,
            display_name: display_name.into(),
        }
    }
}

/// Smallest axis-aligned rectangle covering every registered region.
///
/// Grows monotonically while regions are registered. An empty layout reports
/// the unit rectangle at the origin so renderers never divide by zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutBounds {
    extent: Option<Extent>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl LayoutBounds {
    /// Creates empty bounds.
    #[must_use]
    pub const fn new() -> Self {
        Self { extent: None }
    }

    /// Expands the bounds to cover `rect`.
    pub fn expand(&mut self, rect: &Rect) {
        self.extent = Some(match self.extent {
            None => Extent {
                min_x: rect.x,
                min_y: rect.y,
                max_x: rect.right(),
                max_y: rect.top(),
            },
            Some(extent) => Extent {
                min_x: extent.min_x.min(rect.x),
                min_y: extent.min_y.min(rect.y),
                max_x: extent.max_x.max(rect.right()),
                max_y: extent.max_y.max(rect.top()),
            },
        });
    }

    /// Returns true if no region has been registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    /// The covering rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        match self.extent {
            Some(e) => Rect::new(e.min_x, e.min_y, e.max_x - e.min_x, e.max_y - e.min_y),
            None => Rect::new(0.0, 0.0, 1.0, 1.0),
        }
    }
}
