//! Nearest-point lookup, splitting and splicing.

use super::{CurveIndexRecord, IntersectionResult, Path, PathCommand, PathGeometry, PathUnionOptions};
use crate::geometry::Parameterized2DShape;
use crate::math::Point2;

/// Options for [`Path::split_at`] and friends.
#[derive(Default, Clone, Copy)]
pub struct PathSplitOptions<'a> {
    /// Applied to each newly created cut point, on both sides of the cut.
    pub map_new_point: Option<&'a dyn Fn(Point2) -> Point2>,
}

impl std::fmt::Debug for PathSplitOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathSplitOptions")
            .field("map_new_point", &self.map_new_point.is_some())
            .finish()
    }
}

impl PathSplitOptions<'_> {
    fn map(&self, point: Point2) -> Point2 {
        self.map_new_point.map_or(point, |f| f(point))
    }
}

/// One segment cut at a local parameter.
struct SegmentCut {
    /// Command ending the piece before the cut, if anything precedes it.
    head: Option<PathCommand>,
    cut_point: Point2,
    /// What remains of the segment after the cut.
    tail: Option<PathGeometry>,
}

fn cut_segment(geometry: &PathGeometry, t: f64) -> SegmentCut {
    if let PathGeometry::Point(shape) = geometry {
        return SegmentCut {
            head: (t > 0.0).then_some(PathCommand::MoveTo(shape.p)),
            cut_point: shape.p,
            tail: None,
        };
    }
    if t <= 0.0 {
        return SegmentCut {
            head: None,
            cut_point: geometry.start_point(),
            tail: Some(geometry.clone()),
        };
    }
    if t >= 1.0 {
        return SegmentCut {
            head: Some(geometry.to_command()),
            cut_point: geometry.end_point(),
            tail: None,
        };
    }
    let mut pieces = geometry.split_at(t).into_iter();
    match (pieces.next(), pieces.next()) {
        (Some(first), Some(second)) => SegmentCut {
            head: Some(first.to_command()),
            cut_point: second.start_point(),
            tail: Some(second),
        },
        _ => SegmentCut {
            head: Some(geometry.to_command()),
            cut_point: geometry.end_point(),
            tail: None,
        },
    }
}

fn with_end_point(command: PathCommand, end_point: Point2) -> PathCommand {
    match command {
        PathCommand::MoveTo(_) => PathCommand::MoveTo(end_point),
        PathCommand::LineTo(_) => PathCommand::LineTo(end_point),
        PathCommand::QuadraticBezierTo { control_point, .. } => PathCommand::QuadraticBezierTo {
            control_point,
            end_point,
        },
        PathCommand::CubicBezierTo {
            control_point1,
            control_point2,
            ..
        } => PathCommand::CubicBezierTo {
            control_point1,
            control_point2,
            end_point,
        },
    }
}

impl Path {
    /// The point on the path closest to `point`.
    #[must_use]
    pub fn nearest_point_to(&self, point: Point2) -> IntersectionResult {
        let mut best = IntersectionResult {
            curve_index: 0,
            parameter_value: 0.0,
            point: self.start_point,
        };
        let mut best_square_distance = f64::INFINITY;
        for (curve_index, part) in self.geometry().iter().enumerate() {
            let nearest = part.nearest_point_to(point);
            let square_distance = nearest.point.square_distance_to(point);
            if square_distance < best_square_distance {
                best_square_distance = square_distance;
                best = IntersectionResult {
                    curve_index,
                    parameter_value: nearest.parameter_value,
                    point: nearest.point,
                };
            }
        }
        best
    }

    /// Cuts the path at each of `split_at`.
    ///
    /// Cuts at the very start or end of the path are ignored. Otherwise
    /// exactly one more path than there are cuts is returned; consecutive
    /// pieces share their cut point.
    #[must_use]
    pub fn split_at(&self, split_at: &[CurveIndexRecord], options: &PathSplitOptions<'_>) -> Vec<Self> {
        let Some(last_index) = self.parts.len().checked_sub(1) else {
            return vec![self.clone()];
        };

        let mut splits: Vec<CurveIndexRecord> = split_at
            .iter()
            .map(|index| {
                if index.curve_index > last_index {
                    CurveIndexRecord::new(last_index, 1.0)
                } else {
                    *index
                }
            })
            .collect();
        splits.sort_by(Self::compare_curve_indices);
        while splits
            .last()
            .is_some_and(|s| s.curve_index >= last_index && s.parameter_value >= 1.0)
        {
            splits.pop();
        }
        let leading = splits
            .iter()
            .take_while(|s| s.curve_index == 0 && s.parameter_value <= 0.0)
            .count();
        splits.drain(..leading);
        if splits.is_empty() {
            return vec![self.clone()];
        }
        let expected_count = splits.len() + 1;

        let geometry = self.geometry();
        let mut result = Vec::with_capacity(expected_count);
        let mut current_start = self.start_point;
        let mut current_parts: Vec<PathCommand> = Vec::new();
        let mut pending = splits.iter().peekable();

        for (i, part) in self.parts.iter().enumerate() {
            if !pending.peek().is_some_and(|s| s.curve_index == i) {
                current_parts.push(*part);
                continue;
            }

            // The part of segment `i` not yet emitted.
            let mut remaining = geometry[i].clone();
            let mut first_cut = true;
            while let Some(split) = pending.next_if(|s| s.curve_index == i) {
                let t = if first_cut {
                    split.parameter_value
                } else {
                    remaining.nearest_point_to(self.at(*split)).parameter_value
                };
                first_cut = false;

                let cut = cut_segment(&remaining, t);
                let cut_point = options.map(cut.cut_point);
                if let Some(head) = cut.head {
                    current_parts.push(with_end_point(head, cut_point));
                }
                result.push(Self::new(current_start, std::mem::take(&mut current_parts)));
                current_start = cut_point;

                match cut.tail {
                    Some(tail) => remaining = tail,
                    None => break,
                }
                if !pending.peek().is_some_and(|s| s.curve_index == i) {
                    current_parts.push(remaining.to_command());
                    break;
                }
            }

            // Cuts left on this segment after it was used up.
            while pending.next_if(|s| s.curve_index == i).is_some() {
                result.push(Self::new(current_start, Vec::new()));
            }
        }
        result.push(Self::new(current_start, current_parts));

        debug_assert_eq!(result.len(), expected_count, "wrong number of split pieces");
        result
    }

    /// Splits at the point of the path nearest to `point`.
    #[must_use]
    pub fn split_near(&self, point: Point2, options: &PathSplitOptions<'_>) -> Vec<Self> {
        let nearest = self.nearest_point_to(point);
        self.split_at(&[nearest.curve_index_record()], options)
    }

    /// Removes the part of the path between `delete_from` and `delete_to`,
    /// putting `insert` (if any) in its place.
    ///
    /// When `delete_to` comes before `delete_from`, the deleted range wraps
    /// around the ends of the path and only the stretch from `delete_to` to
    /// `delete_from` is kept.
    #[must_use]
    pub fn spliced(
        &self,
        delete_from: CurveIndexRecord,
        delete_to: CurveIndexRecord,
        insert: Option<&Self>,
        options: &PathSplitOptions<'_>,
    ) -> Self {
        let union_options = PathUnionOptions::default();
        let is_before_or_equal = Self::compare_curve_indices(&delete_from, &delete_to).is_le();

        if is_before_or_equal {
            let before = self.split_at(&[delete_from], options).swap_remove(0);
            let after = self
                .split_at(&[delete_to], options)
                .pop()
                .unwrap_or_else(|| self.clone());
            let before = match insert {
                Some(insert) => before.union(insert, union_options),
                None => before,
            };
            return before.union(&after, union_options);
        }

        // Indices shift after the first cut, so the second cut is found by position.
        let before = self.split_at(&[delete_from], options).swap_remove(0);
        let kept = before
            .split_near(self.at(delete_to), options)
            .pop()
            .unwrap_or(before);
        match insert {
            Some(insert) => kept.union(insert, union_options),
            None => kept,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::vec2;

    fn polyline() -> Path {
        Path::new(
            vec2(0.0, 0.0),
            vec![
                PathCommand::LineTo(vec2(4.0, 0.0)),
                PathCommand::LineTo(vec2(4.0, 4.0)),
                PathCommand::LineTo(vec2(0.0, 4.0)),
            ],
        )
    }

    fn curve() -> Path {
        Path::new(
            vec2(0.0, 0.0),
            vec![
                PathCommand::QuadraticBezierTo {
                    control_point: vec2(1.0, 2.0),
                    end_point: vec2(2.0, 0.0),
                },
                PathCommand::CubicBezierTo {
                    control_point1: vec2(3.0, -2.0),
                    control_point2: vec2(4.0, 2.0),
                    end_point: vec2(5.0, 0.0),
                },
            ],
        )
    }

    #[test]
    fn split_at_ends_returns_original() {
        let path = polyline();
        let options = PathSplitOptions::default();
        assert_eq!(path.split_at(&[CurveIndexRecord::new(0, 0.0)], &options), vec![path.clone()]);
        assert_eq!(path.split_at(&[CurveIndexRecord::new(2, 1.0)], &options), vec![path.clone()]);
        assert_eq!(path.split_at(&[], &options), vec![path.clone()]);
    }

    #[test]
    fn split_in_the_middle_of_a_line() {
        let path = polyline();
        let pieces = path.split_at(&[CurveIndexRecord::new(1, 0.25)], &PathSplitOptions::default());
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].start_point(), vec2(0.0, 0.0));
        assert_eq!(pieces[0].parts().len(), 2);
        assert!(pieces[0].end_point().fuzzy_eq(vec2(4.0, 1.0), 1e-12));
        assert!(pieces[1].start_point().fuzzy_eq(vec2(4.0, 1.0), 1e-12));
        assert_eq!(pieces[1].parts().len(), 2);
        assert_eq!(pieces[1].end_point(), vec2(0.0, 4.0));
    }

    #[test]
    fn several_cuts_on_one_segment() {
        let path = polyline();
        let cuts = [
            CurveIndexRecord::new(0, 0.75),
            CurveIndexRecord::new(0, 0.25),
            CurveIndexRecord::new(2, 0.5),
        ];
        let pieces = path.split_at(&cuts, &PathSplitOptions::default());
        assert_eq!(pieces.len(), 4);
        assert!(pieces[0].end_point().fuzzy_eq(vec2(1.0, 0.0), 1e-9));
        assert!(pieces[1].start_point().fuzzy_eq(vec2(1.0, 0.0), 1e-9));
        assert!(pieces[1].end_point().fuzzy_eq(vec2(3.0, 0.0), 1e-9));
        assert!(pieces[2].end_point().fuzzy_eq(vec2(2.0, 4.0), 1e-9));
        assert_eq!(pieces[3].end_point(), vec2(0.0, 4.0));
    }

    #[test]
    fn cuts_at_segment_boundaries() {
        let path = polyline();
        let pieces = path.split_at(
            &[CurveIndexRecord::new(0, 1.0), CurveIndexRecord::new(2, 0.0)],
            &PathSplitOptions::default(),
        );
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0].parts(), &[PathCommand::LineTo(vec2(4.0, 0.0))]);
        assert_eq!(pieces[1].start_point(), vec2(4.0, 0.0));
        assert_eq!(pieces[1].parts(), &[PathCommand::LineTo(vec2(4.0, 4.0))]);
        assert_eq!(pieces[2].start_point(), vec2(4.0, 4.0));
        assert_eq!(pieces[2].parts(), &[PathCommand::LineTo(vec2(0.0, 4.0))]);
    }

    #[test]
    fn split_curves_rejoin_to_the_original() {
        let path = curve();
        for cut in [CurveIndexRecord::new(0, 0.3), CurveIndexRecord::new(1, 0.6)] {
            let pieces = path.split_at(&[cut], &PathSplitOptions::default());
            assert_eq!(pieces.len(), 2);
            assert!(pieces[0].end_point().fuzzy_eq(path.at(cut), 1e-12));

            let rejoined = pieces[0].union(&pieces[1], PathUnionOptions::default());
            assert_eq!(rejoined.parts().len(), path.parts().len() + 1);
            let (ci, tc) = (cut.curve_index, cut.parameter_value);
            for k in 0..rejoined.parts().len() {
                for j in 0..=10 {
                    let s = f64::from(j) / 10.0;
                    let original = match k {
                        k if k < ci => CurveIndexRecord::new(k, s),
                        k if k == ci => CurveIndexRecord::new(ci, tc * s),
                        k if k == ci + 1 => CurveIndexRecord::new(ci, tc + (1.0 - tc) * s),
                        k => CurveIndexRecord::new(k - 1, s),
                    };
                    let sample = rejoined.at(CurveIndexRecord::new(k, s));
                    assert!(sample.fuzzy_eq(path.at(original), 1e-9), "{k} at {s}");
                }
            }
        }
    }

    #[test]
    fn map_new_point_moves_both_sides() {
        let path = polyline();
        let shift = |p: Point2| p + vec2(0.0, 10.0);
        let options = PathSplitOptions {
            map_new_point: Some(&shift),
        };
        let pieces = path.split_at(&[CurveIndexRecord::new(0, 0.5)], &options);
        assert!(pieces[0].end_point().fuzzy_eq(vec2(2.0, 10.0), 1e-12));
        assert!(pieces[1].start_point().fuzzy_eq(vec2(2.0, 10.0), 1e-12));
    }

    #[test]
    fn nearest_point_and_split_near() {
        let path = polyline();
        let nearest = path.nearest_point_to(vec2(5.0, 2.0));
        assert_eq!(nearest.curve_index, 1);
        assert_abs_diff_eq!(nearest.parameter_value, 0.5);
        assert_eq!(nearest.point, vec2(4.0, 2.0));

        let pieces = path.split_near(vec2(5.0, 2.0), &PathSplitOptions::default());
        assert_eq!(pieces.len(), 2);
        assert!(pieces[1].start_point().fuzzy_eq(vec2(4.0, 2.0), 1e-12));
    }

    #[test]
    fn splice_replaces_the_middle() {
        let path = polyline();
        let patch = Path::new(vec2(4.0, 1.0), vec![PathCommand::LineTo(vec2(4.0, 3.0))]);
        let spliced = path.spliced(
            CurveIndexRecord::new(1, 0.25),
            CurveIndexRecord::new(1, 0.75),
            Some(&patch),
            &PathSplitOptions::default(),
        );
        assert_eq!(spliced.start_point(), vec2(0.0, 0.0));
        assert!(spliced.end_point().fuzzy_eq(vec2(0.0, 4.0), 1e-12));
        assert!(!spliced.parts().iter().any(|p| matches!(p, PathCommand::MoveTo(_))));

        let removed = path.spliced(
            CurveIndexRecord::new(1, 0.25),
            CurveIndexRecord::new(1, 0.75),
            None,
            &PathSplitOptions::default(),
        );
        assert!(removed.parts().iter().any(|p| matches!(p, PathCommand::MoveTo(_))));
    }

    #[test]
    fn wrapping_splice_keeps_the_inner_stretch() {
        let path = polyline();
        let kept = path.spliced(
            CurveIndexRecord::new(2, 0.5),
            CurveIndexRecord::new(0, 0.5),
            None,
            &PathSplitOptions::default(),
        );
        assert!(kept.start_point().fuzzy_eq(vec2(2.0, 0.0), 1e-9));
        assert!(kept.end_point().fuzzy_eq(vec2(2.0, 4.0), 1e-9));
        assert_eq!(kept.parts().len(), 3);
    }
}
