use super::{Abstract2DShape, LineSegment2, NearestPoint, Parameterized2DShape, Rect2};
use crate::math::{Point2, Vec2, Vec3, TOLERANCE};

/// A single point treated as a degenerate parameterized shape.
///
/// Every parameter maps to the point itself, so splitting is a no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointShape2D {
    pub p: Point2,
}

impl PointShape2D {
    #[must_use]
    pub fn new(p: Point2) -> Self {
        Self { p }
    }
}

impl Abstract2DShape for PointShape2D {
    fn signed_distance(&self, point: Point2) -> f64 {
        self.p.distance_to(point)
    }

    fn intersects_line_segment(&self, line: &LineSegment2) -> Vec<Point2> {
        if line.contains_point(self.p, TOLERANCE) {
            vec![self.p]
        } else {
            Vec::new()
        }
    }

    fn tight_bounding_box(&self) -> Rect2 {
        Rect2::new(self.p.x, self.p.y, 0.0, 0.0)
    }
}

impl Parameterized2DShape for PointShape2D {
    fn at(&self, _t: f64) -> Point2 {
        self.p
    }

    // Arbitrary: a point has no tangent.
    fn tangent_at(&self, _t: f64) -> Vec2 {
        Vec3::UNIT_Y
    }

    fn normal_at(&self, _t: f64) -> Vec2 {
        Vec3::UNIT_X
    }

    fn arg_intersects_line_segment(&self, line: &LineSegment2) -> Vec<f64> {
        if line.contains_point(self.p, TOLERANCE) {
            vec![0.0]
        } else {
            Vec::new()
        }
    }

    fn nearest_point_to(&self, _point: Point2) -> NearestPoint {
        NearestPoint {
            point: self.p,
            parameter_value: 0.0,
        }
    }

    fn split_at(&self, _t: f64) -> Vec<Self> {
        vec![*self]
    }
}
