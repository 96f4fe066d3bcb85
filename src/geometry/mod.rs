pub mod bezier;
mod line_segment;
mod point_shape;
mod rect;
mod triangle;

pub use bezier::{CubicBezier, QuadraticBezier};
pub use line_segment::{LineIntersection, LineSegment2, LineSegmentEqOptions, NEAR_VERTICAL_THRESHOLD};
pub use point_shape::PointShape2D;
pub use rect::Rect2;
pub use triangle::Triangle;

use crate::math::{Point2, Vec2};

/// Small distance under which a point counts as lying on a shape.
pub const SMALL_VALUE: f64 = 1e-12;

/// The closest point on a parameterized shape to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPoint {
    /// The closest point itself.
    pub point: Point2,
    /// The shape's parameter at `point`, in `[0, 1]`.
    pub parameter_value: f64,
}

/// Minimal contract shared by every planar shape.
pub trait Abstract2DShape {
    /// Distance from `point` to the shape's boundary, negative inside.
    ///
    /// Shapes without an interior (segments, curves, points) never return a
    /// negative value.
    fn signed_distance(&self, point: Point2) -> f64;

    /// Points where `line` crosses the shape.
    fn intersects_line_segment(&self, line: &LineSegment2) -> Vec<Point2>;

    /// Smallest axis-aligned rectangle containing the shape.
    fn tight_bounding_box(&self) -> Rect2;

    /// Whether `point` is within `epsilon` of the shape (or inside it).
    fn contains_point(&self, point: Point2, epsilon: f64) -> bool {
        self.signed_distance(point) < epsilon
    }
}

/// A shape traced by a continuous map from `t ∈ [0, 1]` to the plane.
pub trait Parameterized2DShape: Abstract2DShape {
    /// Point at parameter `t`. Values outside `[0, 1]` extrapolate.
    fn at(&self, t: f64) -> Point2;

    /// Unit tangent at `t`.
    fn tangent_at(&self, t: f64) -> Vec2;

    /// Unit normal at `t`, a quarter turn counter-clockwise from the tangent.
    fn normal_at(&self, t: f64) -> Vec2;

    /// Parameter values at which `line` crosses the shape.
    fn arg_intersects_line_segment(&self, line: &LineSegment2) -> Vec<f64>;

    /// Closest point on the shape to `point`.
    fn nearest_point_to(&self, point: Point2) -> NearestPoint;

    /// Splits at `t`: one piece if `t` is outside `(0, 1)`, two otherwise.
    fn split_at(&self, t: f64) -> Vec<Self>
    where
        Self: Sized;
}
