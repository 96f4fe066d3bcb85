use super::vec3::Point2;

const DUPLICATE_TOLERANCE: f64 = 1e-10;

/// Convex hull of `points` by gift wrapping.
///
/// Starts at the lowest point (smallest `y`, then smallest `x`) and walks
/// counter-clockwise. Points lying on a hull edge between two vertices are
/// left out. Duplicate points are ignored.
#[must_use]
pub fn convex_hull_2_of(points: &[Point2]) -> Vec<Point2> {
    let Some(start) = points
        .iter()
        .copied()
        .min_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
    else {
        return Vec::new();
    };

    let mut hull = vec![start];
    let mut current = start;
    for _ in 0..points.len() {
        let mut candidate: Option<Point2> = None;
        for &point in points {
            if point.fuzzy_eq(current, DUPLICATE_TOLERANCE) {
                continue;
            }
            let Some(best) = candidate else {
                candidate = Some(point);
                continue;
            };

            // Negative: `point` is clockwise of `best` as seen from `current`.
            let turn = (best - current).cross(point - current).z;
            let further = current.square_distance_to(point) > current.square_distance_to(best);
            if turn < 0.0 || (turn == 0.0 && further) {
                candidate = Some(point);
            }
        }

        let Some(next) = candidate else {
            break;
        };
        if next.fuzzy_eq(start, DUPLICATE_TOLERANCE) {
            break;
        }
        hull.push(next);
        current = next;
    }

    hull
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2;

    #[test]
    fn square_with_interior_points() {
        let points = [
            vec2(0.5, 0.5),
            vec2(1.0, 1.0),
            vec2(0.0, 0.0),
            vec2(0.2, 0.7),
            vec2(1.0, 0.0),
            vec2(0.0, 1.0),
        ];
        let hull = convex_hull_2_of(&points);
        assert_eq!(
            hull,
            vec![vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(1.0, 1.0), vec2(0.0, 1.0)]
        );
    }

    #[test]
    fn collinear_edge_points_are_skipped() {
        let points = [vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(2.0, 0.0), vec2(1.0, 2.0)];
        let hull = convex_hull_2_of(&points);
        assert_eq!(hull, vec![vec2(0.0, 0.0), vec2(2.0, 0.0), vec2(1.0, 2.0)]);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(convex_hull_2_of(&[]).is_empty());
        assert_eq!(convex_hull_2_of(&[vec2(3.0, 4.0)]), vec![vec2(3.0, 4.0)]);
        assert_eq!(
            convex_hull_2_of(&[vec2(3.0, 4.0), vec2(3.0, 4.0)]),
            vec![vec2(3.0, 4.0)]
        );
        let line = convex_hull_2_of(&[vec2(0.0, 0.0), vec2(1.0, 1.0), vec2(2.0, 2.0)]);
        assert_eq!(line, vec![vec2(0.0, 0.0), vec2(2.0, 2.0)]);
    }
}
