//! Geometric primitives for sequence layout.
//!
//! Coordinates follow the SVG convention: the origin is the top-left corner,
//! x grows to the right (one slot per application) and y grows downward
//! (sequence order).
//!
//! - [`Point`] - a position in diagram space
//! - [`Size`] - width and height of an element
//! - [`Bounds`] - an axis-aligned rectangle
//! - [`Interval`] - a closed range on one axis, used to clamp dragged markers

use serde::Serialize;

/// A position in diagram space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns the same point moved to `y`.
    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }
}

/// Extent of a positioned element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }
}

/// An axis-aligned rectangle.
///
/// # Examples
///
/// ```
/// # use procession_core::geometry::{Bounds, Point, Size};
/// let header = Bounds::new(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
/// let lane = Bounds::new(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
///
/// let both = header.merge(lane);
/// assert_eq!(both.width(), 130.0);
/// assert_eq!(both.height(), 120.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    origin: Point,
    far: Point,
}

impl Bounds {
    /// A rectangle with its top-left corner at `origin`.
    pub fn new(origin: Point, size: Size) -> Self {
        Self {
            origin,
            far: Point::new(origin.x + size.width, origin.y + size.height),
        }
    }

    pub fn min_y(self) -> f32 {
        self.origin.y
    }

    pub fn max_y(self) -> f32 {
        self.far.y
    }

    pub fn width(self) -> f32 {
        self.far.x - self.origin.x
    }

    pub fn height(self) -> f32 {
        self.far.y - self.origin.y
    }

    /// Smallest rectangle covering both.
    pub fn merge(self, other: Self) -> Self {
        Self {
            origin: Point::new(
                self.origin.x.min(other.origin.x),
                self.origin.y.min(other.origin.y),
            ),
            far: Point::new(self.far.x.max(other.far.x), self.far.y.max(other.far.y)),
        }
    }
}

/// A closed interval `[min, max]` on one axis.
///
/// Narrowing an interval past itself leaves it *inverted* (`min > max`). An
/// inverted interval holds no value, and [`Interval::clamp`] refuses it.
///
/// # Examples
///
/// ```
/// # use procession_core::geometry::Interval;
/// let lane = Interval::new(100.0, 400.0);
/// assert_eq!(lane.clamp(50.0), Some(100.0));
/// assert_eq!(lane.clamp(250.0), Some(250.0));
///
/// let squeezed = lane.raise_min(500.0);
/// assert!(squeezed.is_inverted());
/// assert_eq!(squeezed.clamp(250.0), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    min: f32,
    max: f32,
}

impl Interval {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn min(self) -> f32 {
        self.min
    }

    pub fn max(self) -> f32 {
        self.max
    }

    /// Narrows the lower end to at least `min`.
    pub fn raise_min(self, min: f32) -> Self {
        Self {
            min: self.min.max(min),
            ..self
        }
    }

    /// Narrows the upper end to at most `max`.
    pub fn lower_max(self, max: f32) -> Self {
        Self {
            max: self.max.min(max),
            ..self
        }
    }

    pub fn is_inverted(self) -> bool {
        self.min > self.max
    }

    pub fn contains(self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Moves `value` into the interval.
    ///
    /// Returns `None` if the interval is inverted or anything involved is NaN.
    pub fn clamp(self, value: f32) -> Option<f32> {
        if self.is_inverted() || value.is_nan() || self.min.is_nan() || self.max.is_nan() {
            return None;
        }
        Some(value.clamp(self.min, self.max))
    }
}
