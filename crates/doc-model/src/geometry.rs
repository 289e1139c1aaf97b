//! Geometry primitives in view space.
//!
//! All coordinates share the coordinate system of the page's rendering
//! surface: origin at the top-left, x to the right, y downward, units in pixels.

use serde::{Deserialize, Serialize};

/// A point on the page surface
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Neither coordinate is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Euclidean distance between two points
pub fn distance(p1: Point, p2: Point) -> f32 {
    p1.distance_to(&p2)
}

/// Minimum distance from `point` to the segment `start..end`
///
/// The projection is clamped to the segment, so points beyond either end
/// measure against the nearest endpoint.
pub fn distance_to_segment(point: Point, start: Point, end: Point) -> f32 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < 1e-6 {
        // Degenerate segment
        return point.distance_to(&start);
    }

    let t = ((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq;
    let t = t.clamp(0.0, 1.0);

    let closest = Point::new(start.x + t * dx, start.y + t * dy);
    point.distance_to(&closest)
}

/// Axis-aligned rectangle
///
/// Width and height may be negative while a box is being dragged up or to the
/// left. Use [`Rect::normalized`] before storing or hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanned by a drag from `anchor` to `current`
    pub fn from_corners(anchor: Point, current: Point) -> Self {
        Self { x: anchor.x, y: anchor.y, width: current.x - anchor.x, height: current.y - anchor.y }
    }

    /// Equivalent rectangle with a top-left origin and non-negative size
    pub fn normalized(self) -> Rect {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Rect { x, y, width, height }
    }

    /// Rectangle padded by `threshold` on every side
    pub fn expand(self, threshold: f32) -> Rect {
        Rect {
            x: self.x - threshold,
            y: self.y - threshold,
            width: self.width + threshold * 2.0,
            height: self.height + threshold * 2.0,
        }
    }

    /// Inclusive containment test; expects a normalized rectangle
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn is_finite(&self) -> bool {
        self.origin().is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    pub fn translate(self, dx: f32, dy: f32) -> Rect {
        Rect { x: self.x + dx, y: self.y + dy, ..self }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }
}

/// Smallest rectangle covering every point, or `None` for an empty slice
pub fn bounding_rect(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for point in points.iter().skip(1) {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }
    Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}
