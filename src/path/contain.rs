use super::{IntersectionResult, Path};
use crate::geometry::{LineSegment2, Rect2};
use crate::math::{vec2, Point2, TOLERANCE};

/// Parameters this close to a segment end count as that end.
const SHARED_ENDPOINT_TOLERANCE: f64 = 1e-8;

impl Path {
    /// Even-odd containment, treating the path as closed.
    ///
    /// A ray is cast from `point` to beyond the right edge of the path's
    /// bounds. A crossing at the end of one segment and the start of the
    /// next is counted once.
    #[must_use]
    pub fn closed_contains_point(&self, point: Point2) -> bool {
        let bbox = self.get_exact_bbox();
        if !bbox.contains_point(point) {
            return false;
        }

        let point_outside = point + vec2(bbox.w, 0.0);
        let ray = LineSegment2::new(point, point_outside);
        let closed = self.as_closed();
        let last_index = closed.parts.len().saturating_sub(1);
        let hits = closed.intersection(&ray, 0.0);

        let joins = |previous: &IntersectionResult, next: &IntersectionResult| {
            let consecutive = next.curve_index == previous.curve_index + 1
                || (previous.curve_index == last_index && next.curve_index == 0);
            consecutive
                && previous.parameter_value >= 1.0 - SHARED_ENDPOINT_TOLERANCE
                && next.parameter_value <= SHARED_ENDPOINT_TOLERANCE
        };

        let mut count = 0;
        let mut previous: Option<&IntersectionResult> = None;
        for hit in &hits {
            if !previous.is_some_and(|previous| joins(previous, hit)) {
                count += 1;
            }
            previous = Some(hit);
        }
        // A crossing at the shared start and end point shows up first and last.
        if let [first, .., last] = hits.as_slice() {
            if joins(last, first) {
                count -= 1;
            }
        }
        count % 2 == 1
    }

    /// Whether every point of `rect` is inside the closed path.
    #[must_use]
    pub fn closed_contains_rect(&self, rect: &Rect2) -> bool {
        if !self.bbox.contains_rect(rect) {
            return false;
        }
        if !rect.corners().iter().all(|&corner| self.closed_contains_point(corner)) {
            return false;
        }
        rect.edges()
            .iter()
            .all(|edge| self.intersection(edge, 0.0).is_empty())
    }

    /// A cheap, conservative overlap test against `rect`.
    ///
    /// Uses control-point bounds, so it may report overlap where there is
    /// none. Closed paths without a stroke are tested as filled shapes.
    #[must_use]
    pub fn roughly_intersects(&self, rect: &Rect2, stroke_width: f64) -> bool {
        if self.parts.is_empty() {
            return rect.contains_point(self.start_point);
        }
        let is_closed = self.start_point.fuzzy_eq(self.end_point(), TOLERANCE);
        if is_closed && stroke_width == 0.0 {
            return self.closed_roughly_intersects(rect);
        }
        if rect.contains_rect(&self.bbox) {
            return true;
        }

        let mut segment_start = self.start_point;
        for part in &self.parts {
            let bbox = Self::compute_bbox_for_segment(segment_start, part).grown_by(stroke_width);
            segment_start = part.end_point();
            if rect.intersects(&bbox) {
                return true;
            }
        }
        false
    }

    /// Rough overlap test of `rect` against the filled polyline approximation.
    #[must_use]
    pub fn closed_roughly_intersects(&self, rect: &Rect2) -> bool {
        if rect.contains_rect(&self.bbox) {
            return true;
        }

        // Any corner inside the polygon?
        let outside = self.bbox.top_left() - vec2(1.0, 1.0);
        let polygon = self.polyline_approximation();
        for corner in rect.corners() {
            let test_line = LineSegment2::new(corner, outside);
            let crossings = polygon.iter().filter(|line| line.intersects(&test_line)).count();
            if crossings % 2 == 1 {
                return true;
            }
        }

        // Any edge crossing the polygon? A grid on a slightly larger rect
        // catches thin slivers between the corners.
        let grown = rect.grown_by(rect.w.min(rect.h));
        grown
            .divide_into_grid(4, 4)
            .iter()
            .flat_map(Rect2::edges)
            .any(|edge| polygon.iter().any(|line| edge.intersects(line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathCommand;

    fn triangle() -> Path {
        Path::new(
            vec2(0.0, 0.0),
            vec![
                PathCommand::LineTo(vec2(4.0, 0.0)),
                PathCommand::LineTo(vec2(0.0, 4.0)),
                PathCommand::LineTo(vec2(0.0, 0.0)),
            ],
        )
    }

    #[test]
    fn contains_points_of_a_triangle() {
        let path = triangle();
        assert!(path.closed_contains_point(vec2(1.0, 1.0)));
        assert!(path.closed_contains_point(vec2(0.5, 3.0)));
        assert!(!path.closed_contains_point(vec2(3.0, 3.0)));
        assert!(!path.closed_contains_point(vec2(-1.0, 1.0)));
    }

    fn diamond_from(corners: [Point2; 4]) -> Path {
        let mut parts: Vec<PathCommand> =
            corners[1..].iter().map(|&corner| PathCommand::LineTo(corner)).collect();
        parts.push(PathCommand::LineTo(corners[0]));
        Path::new(corners[0], parts)
    }

    #[test]
    fn ray_through_a_shared_vertex_counts_once() {
        let diamond = diamond_from([vec2(0.0, -1.0), vec2(1.0, 0.0), vec2(0.0, 1.0), vec2(-1.0, 0.0)]);
        // Each of these rays leaves through the corner at (1, 0).
        assert!(diamond.closed_contains_point(vec2(0.0, 0.0)));
        assert!(diamond.closed_contains_point(vec2(-0.99, 0.0)));
        assert!(diamond.closed_contains_point(vec2(0.0, 0.5)));
        assert!(!diamond.closed_contains_point(vec2(0.99, 0.5)));
    }

    #[test]
    fn ray_through_the_start_point_counts_once() {
        let diamond = diamond_from([vec2(1.0, 0.0), vec2(0.0, 1.0), vec2(-1.0, 0.0), vec2(0.0, -1.0)]);
        let closed = diamond.as_closed();
        let hits = closed.intersection(&LineSegment2::new(vec2(0.0, 0.0), vec2(2.0, 0.0)), 0.0);
        assert_eq!(hits.len(), 2);
        assert_eq!((hits[0].curve_index, hits[1].curve_index), (0, 3));

        assert!(diamond.closed_contains_point(vec2(0.0, 0.0)));
        assert!(diamond.closed_contains_point(vec2(0.5, 0.0)));
        assert!(diamond.closed_contains_point(vec2(-0.5, 0.0)));
    }

    #[test]
    fn curved_boundary() {
        let path = Path::new(
            vec2(0.0, 0.0),
            vec![
                PathCommand::LineTo(vec2(4.0, 0.0)),
                PathCommand::QuadraticBezierTo {
                    control_point: vec2(4.0, 4.0),
                    end_point: vec2(0.0, 4.0),
                },
            ],
        );
        assert!(path.closed_contains_point(vec2(3.0, 2.0)));
        assert!(path.closed_contains_point(vec2(1.0, 1.0)));
        assert!(!path.closed_contains_point(vec2(3.5, 3.5)));
    }

    #[test]
    fn open_path_is_closed_implicitly() {
        let open = Path::new(
            vec2(0.0, 0.0),
            vec![
                PathCommand::LineTo(vec2(4.0, 0.0)),
                PathCommand::LineTo(vec2(4.0, 4.0)),
            ],
        );
        assert!(open.closed_contains_point(vec2(3.0, 1.0)));
        assert!(!open.closed_contains_point(vec2(1.0, 3.0)));
    }

    #[test]
    fn contains_rect() {
        let path = Path::from_rect(&Rect2::new(0.0, 0.0, 10.0, 10.0), None);
        assert!(path.closed_contains_rect(&Rect2::new(2.0, 2.0, 3.0, 3.0)));
        assert!(!path.closed_contains_rect(&Rect2::new(8.0, 8.0, 3.0, 3.0)));
        assert!(!triangle().closed_contains_rect(&Rect2::new(0.5, 0.5, 3.0, 3.0)));
    }

    #[test]
    fn rough_intersection() {
        let path = triangle();
        assert!(path.roughly_intersects(&Rect2::new(0.5, 0.5, 0.5, 0.5), 0.0));
        assert!(path.roughly_intersects(&Rect2::new(-1.0, -1.0, 10.0, 10.0), 0.0));
        assert!(!path.roughly_intersects(&Rect2::new(6.0, 1.0, 1.0, 1.0), 0.0));

        let open = Path::new(vec2(0.0, 0.0), vec![PathCommand::LineTo(vec2(4.0, 0.0))]);
        assert!(!open.roughly_intersects(&Rect2::new(0.0, 1.0, 1.0, 1.0), 0.0));
        assert!(open.roughly_intersects(&Rect2::new(0.0, 1.0, 1.0, 1.0), 1.0));

        let dot = Path::new(vec2(1.0, 1.0), Vec::new());
        assert!(dot.roughly_intersects(&Rect2::UNIT_SQUARE, 0.0));
    }
}
