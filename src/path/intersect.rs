//! Line intersection, exact and against a stroked outline.
//!
//! With a positive stroke radius the stroked outline is never built.
//! Instead the line is sphere traced against the path's signed distance
//! field, starting from the line's endpoints and from every exact crossing
//! of the path's centerline.

use tracing::{debug, trace};

use super::{CurveIndexRecord, Path, PathCommand, PathGeometry};
use crate::geometry::{Abstract2DShape, LineSegment2, Parameterized2DShape, Rect2};
use crate::math::{Point2, Vec2};

/// Sphere-tracing steps taken from each seed in each direction.
pub const MAX_RAYMARCH_STEPS: usize = 8;

/// Below this stroke radius intersections are computed against the
/// centerline only.
const MIN_RAYMARCH_STROKE_RADIUS: f64 = 1e-8;

/// A point where a line meets a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionResult {
    /// Index of the command whose shape was hit.
    pub curve_index: usize,
    /// That shape's parameter nearest to `point`.
    pub parameter_value: f64,
    pub point: Point2,
}

impl IntersectionResult {
    #[must_use]
    pub fn curve_index_record(&self) -> CurveIndexRecord {
        CurveIndexRecord::new(self.curve_index, self.parameter_value)
    }
}

struct PartDistance<'a> {
    curve_index: usize,
    part: &'a PathGeometry,
    bbox: Rect2,
}

/// Signed distance from the stroke to points of one line.
struct StrokeField<'a> {
    parts: Vec<PartDistance<'a>>,
    stroke_radius: f64,
}

impl StrokeField<'_> {
    /// Distance to the nearest stroke edge and the part it belongs to.
    ///
    /// Parts whose box contains `point` go first; the rest are skipped when
    /// their box, grown by the best distance so far, cannot reach `point`.
    fn distance(&self, point: Point2) -> (Option<&PartDistance<'_>>, f64) {
        let mut min_distance = f64::INFINITY;
        let mut min_part = None;
        let mut unchecked = Vec::new();

        for record in &self.parts {
            if !record.bbox.contains_point(point) {
                unchecked.push(record);
                continue;
            }
            let distance = record.part.signed_distance(point);
            if distance <= min_distance {
                min_distance = distance;
                min_part = Some(record);
            }
        }

        for record in unchecked {
            if min_distance.is_finite() && !record.bbox.grown_by(min_distance).contains_point(point) {
                continue;
            }
            let distance = record.part.signed_distance(point);
            if distance <= min_distance {
                min_distance = distance;
                min_part = Some(record);
            }
        }

        (min_part, min_distance - self.stroke_radius)
    }
}

impl Path {
    /// Where `line` crosses this path, or, with a positive `stroke_radius`,
    /// where it crosses the outline of this path stroked by that radius.
    ///
    /// Results from each segment are in ascending parameter order. Stroke
    /// results are approximate: each lies within `stroke_radius / 1000` of
    /// the outline.
    #[must_use]
    pub fn intersection(&self, line: &LineSegment2, stroke_radius: f64) -> Vec<IntersectionResult> {
        if !line.bbox().intersects(&self.bbox.grown_by(stroke_radius)) {
            return Vec::new();
        }
        if self.parts.is_empty() {
            let as_point = Self::new(self.start_point, vec![PathCommand::MoveTo(self.start_point)]);
            return as_point.intersection(line, stroke_radius);
        }

        let exact: Vec<IntersectionResult> = self
            .geometry()
            .iter()
            .enumerate()
            .flat_map(|(curve_index, part)| {
                let mut params = part.arg_intersects_line_segment(line);
                params.sort_by(f64::total_cmp);
                params.into_iter().map(move |parameter_value| IntersectionResult {
                    curve_index,
                    parameter_value,
                    point: part.at(parameter_value),
                })
            })
            .collect();

        if stroke_radius > MIN_RAYMARCH_STROKE_RADIUS {
            let seeds: Vec<Point2> = exact.iter().map(|hit| hit.point).collect();
            return self.raymarch_intersection_with(line, stroke_radius, &seeds);
        }
        exact
    }

    fn raymarch_intersection_with(
        &self,
        line: &LineSegment2,
        stroke_radius: f64,
        additional_start_points: &[Point2],
    ) -> Vec<IntersectionResult> {
        if !line.bbox().intersects(&self.bbox.grown_by(stroke_radius)) {
            return Vec::new();
        }
        let line_length = line.length();

        let parts: Vec<PartDistance<'_>> = self
            .geometry()
            .iter()
            .enumerate()
            .filter_map(|(curve_index, part)| {
                let bbox = part.tight_bounding_box().grown_by(stroke_radius);
                if !bbox.intersects(&line.bbox()) {
                    return None;
                }
                let stroke_distance = |point: Point2| part.signed_distance(point) - stroke_radius;
                if stroke_distance(line.p1()) > line_length && stroke_distance(line.p2()) > line_length {
                    return None;
                }
                Some(PartDistance {
                    curve_index,
                    part,
                    bbox,
                })
            })
            .collect();
        if parts.is_empty() {
            return Vec::new();
        }
        let field = StrokeField {
            parts,
            stroke_radius,
        };

        // Only meaningful for points on the line.
        let point_to_parameter = |point: Point2| (point - line.p1()).dot(line.direction());

        let mut start_points = Vec::with_capacity(additional_start_points.len() + 2);
        start_points.push(line.p1());
        start_points.extend_from_slice(additional_start_points);
        start_points.push(line.p2());
        start_points.sort_by(|a, b| point_to_parameter(*a).total_cmp(&point_to_parameter(*b)));

        let stopping_threshold = stroke_radius / 1000.0;
        let mut results: Vec<IntersectionResult> = Vec::new();

        // Marches from `start_point` along `direction`. Returns the furthest
        // line parameter reached, or `None` if the march diverged.
        let mut raymarch_from = |start_point: Point2, direction: Vec2, min_parameter: f64| -> Option<f64> {
            let mut current_point = start_point;
            let (mut last_part, mut last_distance) = field.distance(current_point);
            let mut last_parameter = point_to_parameter(current_point);
            if last_distance > line_length {
                return Some(last_parameter);
            }

            for _ in 0..MAX_RAYMARCH_STEPS {
                current_point = current_point + direction * last_distance;
                last_parameter = point_to_parameter(current_point);
                if last_parameter <= min_parameter {
                    return Some(last_parameter);
                }

                let (part, distance) = field.distance(current_point);
                // Starting inside the stroke, the distance climbs towards zero.
                if distance.abs() > last_distance.abs() {
                    trace!(%current_point, distance, "raymarch diverged");
                    return None;
                }
                last_distance = distance;
                last_part = part;
                if last_distance.abs() < stopping_threshold {
                    break;
                }
            }

            let on_segment = (0.0..=line_length).contains(&last_parameter);
            if let Some(record) = last_part.filter(|_| on_segment && last_distance.abs() < stopping_threshold) {
                let duplicate = results
                    .iter()
                    .any(|hit| hit.point.distance_to(current_point) < stroke_radius / 20.0);
                if !duplicate {
                    trace!(%current_point, curve_index = record.curve_index, "raymarch hit");
                    results.push(IntersectionResult {
                        curve_index: record.curve_index,
                        parameter_value: record.part.nearest_point_to(current_point).parameter_value,
                        point: current_point,
                    });
                }
                let parameter_increase = stroke_radius / 20.0 / line_length;
                if parameter_increase.is_finite() {
                    last_parameter += parameter_increase;
                }
            }
            Some(last_parameter)
        };

        let mut max_line_t: f64 = 0.0;
        for start_point in start_points {
            for direction in [line.direction(), -line.direction()] {
                if let Some(reached) = raymarch_from(start_point, direction, max_line_t) {
                    max_line_t = max_line_t.max(reached);
                }
            }
        }

        debug!(hits = results.len(), stroke_radius, "raymarched stroke intersection");
        results
    }
}
