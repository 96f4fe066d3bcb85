use std::fmt;

use super::{Abstract2DShape, NearestPoint, Parameterized2DShape, Rect2};
use crate::math::{vec2, Mat33, Point2, Vec2, TOLERANCE};

/// Below this `|direction.x|` a segment is intersected as if vertical.
pub const NEAR_VERTICAL_THRESHOLD: f64 = 4e-13;

/// Where two segments cross.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineIntersection {
    pub point: Point2,
    /// Distance from the first segment's `p1` to `point`, along its direction.
    pub t: f64,
}

/// Options for [`LineSegment2::fuzzy_eq`].
#[derive(Debug, Clone, Copy)]
pub struct LineSegmentEqOptions {
    pub tolerance: f64,
    /// Treat `a → b` and `b → a` as equal.
    pub ignore_direction: bool,
}

impl Default for LineSegmentEqOptions {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
            ignore_direction: true,
        }
    }
}

/// A straight segment from `p1` to `p2`.
///
/// `direction` is a unit vector except for zero-length segments, where it
/// is the zero vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment2 {
    p1: Point2,
    p2: Point2,
    direction: Vec2,
    length: f64,
    bbox: Rect2,
}

impl LineSegment2 {
    #[must_use]
    pub fn new(p1: Point2, p2: Point2) -> Self {
        let delta = p2 - p1;
        let length = delta.magnitude();
        let direction = if length > 0.0 { delta * (1.0 / length) } else { delta };
        Self {
            p1,
            p2,
            direction,
            length,
            bbox: Rect2::bbox_of(&[p1, p2], 0.0),
        }
    }

    /// The shortest segment containing all of `points`, if they are collinear.
    ///
    /// Returns `None` for fewer than two points or if any point is off the line.
    #[must_use]
    pub fn of_smallest_containing_points(points: &[Point2]) -> Option<Self> {
        if points.len() <= 1 {
            return None;
        }
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        let line = Self::new(sorted[0], sorted[sorted.len() - 1]);
        sorted
            .iter()
            .all(|&point| line.contains_point(point, TOLERANCE))
            .then_some(line)
    }

    /// Returns the start point of the segment.
    #[must_use]
    pub fn p1(&self) -> Point2 {
        self.p1
    }

    /// Returns the end point of the segment.
    #[must_use]
    pub fn p2(&self) -> Point2 {
        self.p2
    }

    /// Returns the unit vector from `p1` towards `p2`.
    ///
    /// The zero vector for a zero-length segment.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Returns the distance from `p1` to `p2`.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns the axis-aligned bounds of the two endpoints.
    #[must_use]
    pub fn bbox(&self) -> Rect2 {
        self.bbox
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        self.p1.lerp(self.p2, 0.5)
    }

    /// The point `distance` units from `p1` along the segment's direction.
    #[must_use]
    pub fn get(&self, distance: f64) -> Point2 {
        self.p1 + self.direction * distance
    }

    /// Where this segment crosses `other`, or `None` if the segments are
    /// parallel or only their extensions meet.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<LineIntersection> {
        let (o1, d1) = (self.p1, self.direction);
        let (o2, d2) = (other.p1, other.direction);

        let (point, t) = if d1.x.abs() < NEAR_VERTICAL_THRESHOLD {
            // Where does `other` reach x = o1.x?
            if d2.x.abs() < NEAR_VERTICAL_THRESHOLD || d1.y == 0.0 {
                return None;
            }
            let x = o1.x;
            let y = o2.y - d2.y * (o2.x - x) / d2.x;
            (vec2(x, y), (y - o1.y) / d1.y)
        } else {
            // Solve o1 + t·d1 = o2 + s·d2 for t.
            let numerator = (o1.y - o2.y) * d2.x + (o2.x - o1.x) * d2.y;
            let denominator = d2.y * d1.x - d2.x * d1.y;
            if denominator == 0.0 {
                return None;
            }
            let t = numerator / denominator;
            (o1 + d1 * t, t)
        };

        let on_self = point.distance_to(self.p1) <= self.length
            && point.distance_to(self.p2) <= self.length;
        let on_other = point.distance_to(other.p1) <= other.length
            && point.distance_to(other.p2) <= other.length;
        (on_self && on_other).then_some(LineIntersection { point, t })
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.intersection(other).is_some()
    }

    /// Closest point on the segment to `target`.
    #[must_use]
    pub fn closest_point_to(&self, target: Point2) -> Point2 {
        self.nearest_point_to(target).point
    }

    /// Unsigned distance from `target` to the segment.
    #[must_use]
    pub fn distance(&self, target: Point2) -> f64 {
        self.closest_point_to(target).distance_to(target)
    }

    /// Maps both endpoints through `affine_transform`.
    #[must_use]
    pub fn transformed_by(&self, affine_transform: &Mat33) -> Self {
        Self::new(
            affine_transform.transform_vec2(self.p1),
            affine_transform.transform_vec2(self.p2),
        )
    }

    /// Endpoint-wise comparison, optionally ignoring which end is which.
    #[must_use]
    pub fn fuzzy_eq(&self, other: &Self, options: LineSegmentEqOptions) -> bool {
        let tolerance = options.tolerance;
        let same = self.p1.fuzzy_eq(other.p1, tolerance) && self.p2.fuzzy_eq(other.p2, tolerance);
        if same || !options.ignore_direction {
            return same;
        }
        self.p1.fuzzy_eq(other.p2, tolerance) && self.p2.fuzzy_eq(other.p1, tolerance)
    }
}

impl Abstract2DShape for LineSegment2 {
    fn signed_distance(&self, point: Point2) -> f64 {
        self.distance(point)
    }

    fn intersects_line_segment(&self, line: &LineSegment2) -> Vec<Point2> {
        self.intersection(line).map(|i| i.point).into_iter().collect()
    }

    fn tight_bounding_box(&self) -> Rect2 {
        self.bbox
    }

    fn contains_point(&self, point: Point2, epsilon: f64) -> bool {
        self.distance(point) <= epsilon
    }
}

impl Parameterized2DShape for LineSegment2 {
    fn at(&self, t: f64) -> Point2 {
        self.get(t * self.length)
    }

    fn tangent_at(&self, _t: f64) -> Vec2 {
        self.direction
    }

    fn normal_at(&self, _t: f64) -> Vec2 {
        self.direction.orthog()
    }

    fn arg_intersects_line_segment(&self, line: &LineSegment2) -> Vec<f64> {
        self.intersection(line)
            .map(|i| i.t / self.length)
            .into_iter()
            .collect()
    }

    /// Projects `target` onto the line and snaps to the nearer endpoint when
    /// the projection falls outside the segment.
    fn nearest_point_to(&self, target: Point2) -> NearestPoint {
        let from_p1 = (target - self.p1).dot(self.direction);
        let from_p2 = self.length - from_p1;

        if from_p1 > 0.0 && from_p1 < self.length {
            return NearestPoint {
                point: self.get(from_p1),
                parameter_value: from_p1 / self.length,
            };
        }
        if from_p2.abs() < from_p1.abs() {
            NearestPoint {
                point: self.p2,
                parameter_value: 1.0,
            }
        } else {
            NearestPoint {
                point: self.p1,
                parameter_value: 0.0,
            }
        }
    }

    fn split_at(&self, t: f64) -> Vec<Self> {
        if t <= 0.0 || t >= 1.0 {
            return vec![*self];
        }
        let split_point = self.at(t);
        vec![Self::new(self.p1, split_point), Self::new(split_point, self.p2)]
    }
}

impl fmt::Display for LineSegment2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineSegment({}, {})", self.p1, self.p2)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn perpendicular_segments_meet_at_origin() {
        let horizontal = LineSegment2::new(vec2(-10.0, 0.0), vec2(10.0, 0.0));
        let vertical = LineSegment2::new(vec2(0.0, -10.0), vec2(0.0, 10.0));

        let a = horizontal.intersection(&vertical).unwrap();
        assert_eq!(a.point, vec2(0.0, 0.0));
        assert_abs_diff_eq!(a.t, 10.0);

        let b = vertical.intersection(&horizontal).unwrap();
        assert_eq!(b.point, vec2(0.0, 0.0));
    }

    #[test]
    fn intersection_is_symmetric() {
        let segments = [
            LineSegment2::new(vec2(0.0, 0.0), vec2(4.0, 3.0)),
            LineSegment2::new(vec2(1.0, 5.0), vec2(3.0, -2.0)),
            LineSegment2::new(vec2(-2.0, 1.0), vec2(6.0, 1.5)),
            LineSegment2::new(vec2(5.0, 5.0), vec2(5.0, 6.0)),
            LineSegment2::new(vec2(2.0, -1.0), vec2(2.0, 4.0)),
            LineSegment2::new(vec2(10.0, 10.0), vec2(11.0, 12.0)),
        ];
        for a in &segments {
            for b in &segments {
                assert_eq!(a.intersects(b), b.intersects(a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn parallel_and_disjoint_segments() {
        let a = LineSegment2::new(vec2(0.0, 0.0), vec2(1.0, 1.0));
        let b = LineSegment2::new(vec2(0.0, 1.0), vec2(1.0, 2.0));
        assert!(a.intersection(&b).is_none());

        // The infinite lines cross at (2, 0), outside both segments.
        let c = LineSegment2::new(vec2(0.0, 0.0), vec2(1.0, 0.0));
        let d = LineSegment2::new(vec2(2.0, 1.0), vec2(2.0, 5.0));
        assert!(c.intersection(&d).is_none());
    }

    #[test]
    fn near_vertical_segment() {
        let nearly_vertical = LineSegment2::new(vec2(1.0, -5.0), vec2(1.0 + 1e-14, 5.0));
        let horizontal = LineSegment2::new(vec2(-5.0, 2.0), vec2(5.0, 2.0));
        let hit = nearly_vertical.intersection(&horizontal).unwrap();
        assert!(hit.point.fuzzy_eq(vec2(1.0, 2.0), 1e-9));
    }

    #[test]
    fn normalized_intersection_parameter() {
        let a = LineSegment2::new(vec2(0.0, 0.0), vec2(4.0, 0.0));
        let b = LineSegment2::new(vec2(1.0, -1.0), vec2(1.0, 1.0));
        let args = a.arg_intersects_line_segment(&b);
        assert_eq!(args.len(), 1);
        assert_abs_diff_eq!(args[0], 0.25);
    }

    #[test]
    fn nearest_point_clamps_to_endpoints() {
        let line = LineSegment2::new(vec2(0.0, 0.0), vec2(2.0, 0.0));

        let inside = line.nearest_point_to(vec2(0.5, 3.0));
        assert_eq!(inside.point, vec2(0.5, 0.0));
        assert_abs_diff_eq!(inside.parameter_value, 0.25);

        let before = line.nearest_point_to(vec2(-3.0, 1.0));
        assert_eq!(before.point, vec2(0.0, 0.0));
        assert_abs_diff_eq!(before.parameter_value, 0.0);

        let after = line.nearest_point_to(vec2(7.0, -1.0));
        assert_eq!(after.point, vec2(2.0, 0.0));
        assert_abs_diff_eq!(after.parameter_value, 1.0);
    }

    #[test]
    fn accessors_describe_the_segment() {
        let segment = LineSegment2::new(vec2(4.0, 1.0), vec2(1.0, 5.0));
        assert_eq!(segment.p1(), vec2(4.0, 1.0));
        assert_eq!(segment.p2(), vec2(1.0, 5.0));
        assert_abs_diff_eq!(segment.length(), 5.0);
        assert!(segment.direction().fuzzy_eq(vec2(-0.6, 0.8), 1e-12));
        assert_eq!(segment.bbox(), Rect2::new(1.0, 1.0, 3.0, 4.0));
    }

    #[test]
    fn zero_length_segment() {
        let point = LineSegment2::new(vec2(1.0, 1.0), vec2(1.0, 1.0));
        assert_eq!(point.direction(), vec2(0.0, 0.0));
        assert_abs_diff_eq!(point.distance(vec2(4.0, 5.0)), 5.0);
        assert_eq!(point.nearest_point_to(vec2(4.0, 5.0)).parameter_value, 0.0);
    }

    #[test]
    fn split_at_interior_and_boundary() {
        let line = LineSegment2::new(vec2(0.0, 0.0), vec2(10.0, 0.0));
        assert_eq!(line.split_at(0.0).len(), 1);
        assert_eq!(line.split_at(1.0).len(), 1);
        assert_eq!(line.split_at(-3.0).len(), 1);

        let parts = line.split_at(0.3);
        assert_eq!(parts.len(), 2);
        assert!(parts[0].p2().fuzzy_eq(vec2(3.0, 0.0), 1e-12));
        assert_eq!(parts[0].p2(), parts[1].p1());
        assert_eq!(parts[1].p2(), vec2(10.0, 0.0));
    }

    #[test]
    fn eq_ignores_direction_by_default() {
        let a = LineSegment2::new(vec2(0.0, 0.0), vec2(1.0, 2.0));
        let b = LineSegment2::new(vec2(1.0, 2.0), vec2(0.0, 0.0));
        assert!(a.fuzzy_eq(&b, LineSegmentEqOptions::default()));
        assert!(!a.fuzzy_eq(
            &b,
            LineSegmentEqOptions {
                ignore_direction: false,
                ..LineSegmentEqOptions::default()
            }
        ));
    }

    #[test]
    fn smallest_containing_segment() {
        let line = LineSegment2::of_smallest_containing_points(&[
            vec2(1.0, 1.0),
            vec2(3.0, 3.0),
            vec2(0.0, 0.0),
        ])
        .unwrap();
        assert!(line.fuzzy_eq(
            &LineSegment2::new(vec2(0.0, 0.0), vec2(3.0, 3.0)),
            LineSegmentEqOptions::default()
        ));
        assert!(LineSegment2::of_smallest_containing_points(&[
            vec2(0.0, 0.0),
            vec2(1.0, 0.5),
            vec2(2.0, 0.0)
        ])
        .is_none());
        assert!(LineSegment2::of_smallest_containing_points(&[vec2(0.0, 0.0)]).is_none());
    }

    #[test]
    fn transform_moves_endpoints() {
        let line = LineSegment2::new(vec2(0.0, 0.0), vec2(1.0, 0.0));
        let moved = line.transformed_by(&Mat33::translation(vec2(2.0, 3.0)));
        assert_eq!(moved.p1(), vec2(2.0, 3.0));
        assert_eq!(moved.p2(), vec2(3.0, 3.0));
        assert_abs_diff_eq!(moved.length(), 1.0);
    }
}
