use super::{Abstract2DShape, LineSegment2, Rect2};
use crate::math::{Mat33, Point2, Vec3};

/// A triangle with vertices in any winding order.
///
/// Vertices are [`Vec3`]s so the same type can carry a `z` through
/// [`Triangle::transformed_by`]; the 2D operations ignore `z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertex1: Vec3,
    pub vertex2: Vec3,
    pub vertex3: Vec3,
}

impl Triangle {
    #[must_use]
    pub fn from_vertices(vertex1: Vec3, vertex2: Vec3, vertex3: Vec3) -> Self {
        Self {
            vertex1,
            vertex2,
            vertex3,
        }
    }

    #[must_use]
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.vertex1, self.vertex2, self.vertex3]
    }

    #[must_use]
    pub fn map(&self, f: impl Fn(Vec3) -> Vec3) -> Self {
        Self::from_vertices(f(self.vertex1), f(self.vertex2), f(self.vertex3))
    }

    /// Applies `affine_transform` to each vertex as a 2D point.
    #[must_use]
    pub fn transformed_2d_by(&self, affine_transform: &Mat33) -> Self {
        self.map(|v| affine_transform.transform_vec2(v))
    }

    /// Applies `linear_transform` to each vertex as a 3-vector.
    #[must_use]
    pub fn transformed_by(&self, linear_transform: &Mat33) -> Self {
        self.map(|v| linear_transform.transform_vec3(v))
    }

    /// Edges in vertex order: 1→2, 2→3, 3→1.
    #[must_use]
    pub fn get_edges(&self) -> [LineSegment2; 3] {
        [
            LineSegment2::new(self.vertex1, self.vertex2),
            LineSegment2::new(self.vertex2, self.vertex3),
            LineSegment2::new(self.vertex3, self.vertex1),
        ]
    }
}

impl Abstract2DShape for Triangle {
    /// Distance to the nearest edge, negated inside.
    fn signed_distance(&self, point: Point2) -> f64 {
        let distance = self
            .get_edges()
            .iter()
            .map(|edge| edge.distance(point))
            .fold(f64::INFINITY, f64::min);
        if self.contains_point(point, 0.0) {
            -distance
        } else {
            distance
        }
    }

    fn intersects_line_segment(&self, line: &LineSegment2) -> Vec<Point2> {
        self.get_edges()
            .iter()
            .filter_map(|edge| edge.intersection(line))
            .map(|i| i.point)
            .collect()
    }

    fn tight_bounding_box(&self) -> Rect2 {
        Rect2::bbox_of(&self.vertices(), 0.0)
    }

    /// Separating-axis test: `point` is inside unless some edge normal
    /// separates it from all three vertices by more than `epsilon`.
    fn contains_point(&self, point: Point2, epsilon: f64) -> bool {
        let vertices = self.vertices();
        for edge in self.get_edges() {
            let axis = edge.direction().orthog();
            let (min, max) = vertices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                let projection = axis.dot(*v);
                (lo.min(projection), hi.max(projection))
            });
            let projected_point = axis.dot(point);
            if projected_point < min - epsilon || projected_point > max + epsilon {
                return false;
            }
        }
        true
    }
}
