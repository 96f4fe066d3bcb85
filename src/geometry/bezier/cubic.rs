use std::fmt;

use super::BezierCore;
use crate::geometry::{Abstract2DShape, LineSegment2, NearestPoint, Parameterized2DShape, Rect2};
use crate::math::{Mat33, Point2, Vec2};

/// A cubic Bézier curve: start point, two control points, end point.
///
/// Evaluation goes through the cached power-basis polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicBezier {
    core: BezierCore<4>,
}

impl CubicBezier {
    #[must_use]
    pub fn new(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self {
            core: BezierCore::new([p0, p1, p2, p3]),
        }
    }

    /// Returns the start point of the curve.
    #[must_use]
    pub fn p0(&self) -> Point2 {
        self.core.points()[0]
    }

    /// Returns the control point pulling away from `p0`.
    #[must_use]
    pub fn p1(&self) -> Point2 {
        self.core.points()[1]
    }

    /// Returns the control point pulling into `p3`.
    #[must_use]
    pub fn p2(&self) -> Point2 {
        self.core.points()[2]
    }

    /// Returns the end point of the curve.
    #[must_use]
    pub fn p3(&self) -> Point2 {
        self.core.points()[3]
    }

    #[must_use]
    pub fn get_points(&self) -> [Point2; 4] {
        *self.core.points()
    }

    #[must_use]
    pub fn derivative_at(&self, t: f64) -> Vec2 {
        self.core.derivative_at(t)
    }

    #[must_use]
    pub fn second_derivative_at(&self, t: f64) -> Vec2 {
        self.core.second_derivative_at(t)
    }

    #[must_use]
    pub fn transformed_by(&self, affine_transform: &Mat33) -> Self {
        let [p0, p1, p2, p3] = self.core.transformed_points(affine_transform);
        Self::new(p0, p1, p2, p3)
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

impl Abstract2DShape for CubicBezier {
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

impl Parameterized2DShape for CubicBezier {
    fn at(&self, t: f64) -> Point2 {
        self.core.at(t)
    }

    fn tangent_at(&self, t: f64) -> Vec2 {
        self.core.tangent_at(t)
    }

    fn normal_at(&self, t: f64) -> Vec2 {
        self.core.normal_at(t)
    }

    fn arg_intersects_line_segment(&self, line: &LineSegment2) -> Vec<f64> {
        self.core.arg_intersects_line_segment(line)
    }

    fn nearest_point_to(&self, point: Point2) -> NearestPoint {
        self.core.nearest_point_to(point)
    }

    fn split_at(&self, t: f64) -> Vec<Self> {
        match self.core.split_at(t) {
            Some(([a0, a1, a2, a3], [b0, b1, b2, b3])) => {
                vec![Self::new(a0, a1, a2, a3), Self::new(b0, b1, b2, b3)]
            }
            None => vec![self.clone()],
        }
    }
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CubicBezier({}, {}, {}, {})",
            self.p0(),
            self.p1(),
            self.p2(),
            self.p3()
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::vec2;

    fn s_curve() -> CubicBezier {
        CubicBezier::new(vec2(0.0, 0.0), vec2(1.0, 2.0), vec2(2.0, -2.0), vec2(3.0, 0.0))
    }

    #[test]
    fn endpoints_and_midpoint() {
        let curve = s_curve();
        assert_eq!(curve.at(0.0), vec2(0.0, 0.0));
        assert!(curve.at(1.0).fuzzy_eq(vec2(3.0, 0.0), 1e-12));
        assert!(curve.at(0.5).fuzzy_eq(vec2(1.5, 0.0), 1e-12));
        assert!(curve.derivative_at(0.0).fuzzy_eq(vec2(3.0, 6.0), 1e-12));
        assert_eq!([curve.p0(), curve.p1(), curve.p2(), curve.p3()], curve.get_points());
        assert_eq!(curve.p2(), vec2(2.0, -2.0));
    }

    #[test]
    fn crossing_its_own_chord() {
        let curve = s_curve();
        let chord = LineSegment2::new(vec2(-1.0, 0.0), vec2(4.0, 0.0));
        let params = curve.arg_intersects_line_segment(&chord);
        assert_eq!(params.len(), 3);
        assert_abs_diff_eq!(params[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(params[1], 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(params[2], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn vertical_line_hits_once() {
        let curve = s_curve();
        let line = LineSegment2::new(vec2(1.0, -5.0), vec2(1.0, 5.0));
        let hits = curve.intersects_line_segment(&line);
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn nearest_point_beats_dense_samples() {
        let curve = s_curve();
        for query in [vec2(0.5, 1.5), vec2(2.5, -1.0), vec2(4.0, 1.0), vec2(1.5, 0.1)] {
            let nearest = curve.nearest_point_to(query);
            assert!(curve.at(nearest.parameter_value).fuzzy_eq(nearest.point, 1e-12));
            let best = nearest.point.distance_to(query);
            for i in 0..=300 {
                let sample = curve.at(f64::from(i) / 300.0);
                assert!(sample.distance_to(query) >= best - 1e-6, "{query} beaten at {i}");
            }
        }
    }

    #[test]
    fn collinear_cubic_uses_line_path() {
        let curve = CubicBezier::new(vec2(0.0, 0.0), vec2(1.0, 1.0), vec2(2.0, 2.0), vec2(3.0, 3.0));
        let line = LineSegment2::new(vec2(0.0, 2.0), vec2(2.0, 0.0));
        let hits = curve.intersects_line_segment(&line);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].fuzzy_eq(vec2(1.0, 1.0), 1e-9));
    }

    #[test]
    fn split_keeps_shape() {
        let curve = s_curve();
        let pieces = curve.split_at(0.3);
        assert_eq!(pieces.len(), 2);
        assert!(pieces[0].at(1.0).fuzzy_eq(curve.at(0.3), 1e-12));
        assert!(pieces[1].at(0.5).fuzzy_eq(curve.at(0.65), 1e-12));
        assert_eq!(curve.split_at(-0.1).len(), 1);
    }

    #[test]
    fn bounding_boxes() {
        let curve = s_curve();
        let tight = curve.tight_bounding_box();
        assert!(tight.h < curve.get_loose_bounding_box().h);
        assert_abs_diff_eq!(tight.w, 3.0, epsilon = 1e-12);
        // Extrema of y(t) = 6t - 18t² + 12t³ at t = (3 ± √3) / 6.
        let t = (3.0 - 3.0_f64.sqrt()) / 6.0;
        assert_abs_diff_eq!(tight.y + tight.h, curve.at(t).y, epsilon = 1e-9);
    }

    #[test]
    fn transform_moves_every_point() {
        let curve = s_curve().transformed_by(&Mat33::translation(vec2(1.0, 1.0)));
        assert_eq!(curve.p0(), vec2(1.0, 1.0));
        assert_eq!(curve.p3(), vec2(4.0, 1.0));
    }
}
