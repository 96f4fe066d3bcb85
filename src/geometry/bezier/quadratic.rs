use std::fmt;

use super::BezierCore;
use crate::geometry::{Abstract2DShape, LineSegment2, NearestPoint, Parameterized2DShape, Rect2};
use crate::math::{solve_quadratic, vec2, Mat33, Point2, Vec2};

/// A quadratic Bézier curve: start point, one control point, end point.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticBezier {
    core: BezierCore<3>,
}

impl QuadraticBezier {
    #[must_use]
    pub fn new(p0: Point2, p1: Point2, p2: Point2) -> Self {
        Self {
            core: BezierCore::new([p0, p1, p2]),
        }
    }

    /// Returns the start point of the curve.
    #[must_use]
    pub fn p0(&self) -> Point2 {
        self.core.points()[0]
    }

    /// Returns the control point.
    #[must_use]
    pub fn p1(&self) -> Point2 {
        self.core.points()[1]
    }

    /// Returns the end point of the curve.
    #[must_use]
    pub fn p2(&self) -> Point2 {
        self.core.points()[2]
    }

    #[must_use]
    pub fn get_points(&self) -> [Point2; 3] {
        *self.core.points()
    }

    // B(t) = p0 + t(-2p0 + 2p1) + t²(p0 - 2p1 + p2), per component.
    fn component_at(t: f64, p0: f64, p1: f64, p2: f64) -> f64 {
        p0 + t * (-2.0 * p0 + 2.0 * p1) + t * t * (p0 - 2.0 * p1 + p2)
    }

    fn component_derivative_at(t: f64, p0: f64, p1: f64, p2: f64) -> f64 {
        -2.0 * p0 + 2.0 * p1 + 2.0 * t * (p0 - 2.0 * p1 + p2)
    }

    fn component_second_derivative_at(p0: f64, p1: f64, p2: f64) -> f64 {
        2.0 * (p0 - 2.0 * p1 + p2)
    }

    #[must_use]
    pub fn derivative_at(&self, t: f64) -> Vec2 {
        let [p0, p1, p2] = self.get_points();
        vec2(
            Self::component_derivative_at(t, p0.x, p1.x, p2.x),
            Self::component_derivative_at(t, p0.y, p1.y, p2.y),
        )
    }

    #[must_use]
    pub fn second_derivative_at(&self, _t: f64) -> Vec2 {
        let [p0, p1, p2] = self.get_points();
        vec2(
            Self::component_second_derivative_at(p0.x, p1.x, p2.x),
            Self::component_second_derivative_at(p0.y, p1.y, p2.y),
        )
    }

    /// Cheap estimate of the distance from `point` to the curve.
    ///
    /// Drops the cubic term of `d/dt |B(t) - point|²` and solves the
    /// remaining quadratic for two candidate parameters, falling back to
    /// `0.25` and `0.75` when it has no real roots. Always at least the true
    /// distance; only loosely bounded above.
    #[must_use]
    pub fn approximate_distance(&self, point: Point2) -> f64 {
        let [p0, p1, p2] = self.get_points();
        let a = p0 - point;
        let b = (p1 - p0) * 2.0;
        let c = p0 - p1 * 2.0 + p2;

        let (t1, t2) = solve_quadratic(3.0 * b.dot(c), b.dot(b) + 2.0 * a.dot(c), a.dot(b))
            .unwrap_or((0.25, 0.75));
        let candidate = |t: f64| self.at(t.clamp(0.0, 1.0)).square_distance_to(point);

        [candidate(t1), candidate(t2), p0.square_distance_to(point), p2.square_distance_to(point)]
            .into_iter()
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }

    #[must_use]
    pub fn transformed_by(&self, affine_transform: &Mat33) -> Self {
        let [p0, p1, p2] = self.core.transformed_points(affine_transform);
        Self::new(p0, p1, p2)
    }

    /// Approximate arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.core.length()
    }

    /// Bounding box of the control points. Contains, but may exceed, the curve.
    #[must_use]
    pub fn get_loose_bounding_box(&self) -> Rect2 {
        self.core.control_point_bbox()
    }
}

impl Abstract2DShape for QuadraticBezier {
    fn signed_distance(&self, point: Point2) -> f64 {
        self.core.distance_to(point)
    }

    fn intersects_line_segment(&self, line: &LineSegment2) -> Vec<Point2> {
        self.core.intersects_line_segment(line)
    }

    fn tight_bounding_box(&self) -> Rect2 {
        self.core.tight_bounding_box()
    }
}

impl Parameterized2DShape for QuadraticBezier {
    fn at(&self, t: f64) -> Point2 {
        let [p0, p1, p2] = self.get_points();
        vec2(
            Self::component_at(t, p0.x, p1.x, p2.x),
            Self::component_at(t, p0.y, p1.y, p2.y),
        )
    }

    fn tangent_at(&self, t: f64) -> Vec2 {
        self.derivative_at(t).normalized()
    }

    fn normal_at(&self, t: f64) -> Vec2 {
        self.derivative_at(t).orthog()
    }

    fn arg_intersects_line_segment(&self, line: &LineSegment2) -> Vec<f64> {
        self.core.arg_intersects_line_segment(line)
    }

    fn nearest_point_to(&self, point: Point2) -> NearestPoint {
        self.core.nearest_point_to(point)
    }

    fn split_at(&self, t: f64) -> Vec<Self> {
        match self.core.split_at(t) {
            Some(([a0, a1, a2], [b0, b1, b2])) => vec![Self::new(a0, a1, a2), Self::new(b0, b1, b2)],
            None => vec![self.clone()],
        }
    }
}

impl fmt::Display for QuadraticBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuadraticBezier({}, {}, {})", self.p0(), self.p1(), self.p2())
    }
}
