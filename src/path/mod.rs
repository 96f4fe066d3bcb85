//! Composite paths built from move, line and Bézier commands.
//!
//! A [`Path`] is immutable: every operation that changes it returns a new
//! value. The concrete shape for each command and the string form are
//! computed on first use and cached.

mod contain;
mod intersect;
mod split;
mod svg;

use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

pub use intersect::{IntersectionResult, MAX_RAYMARCH_STEPS};
pub use split::PathSplitOptions;

use crate::geometry::{
    Abstract2DShape, CubicBezier, LineSegment2, NearestPoint, Parameterized2DShape, PointShape2D,
    QuadraticBezier, Rect2,
};
use crate::math::{convex_hull_2_of, vec2, Mat33, Point2, Vec2, TOLERANCE};

/// One drawing instruction. Each command starts where the previous one ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point2),
    LineTo(Point2),
    QuadraticBezierTo {
        control_point: Point2,
        end_point: Point2,
    },
    CubicBezierTo {
        control_point1: Point2,
        control_point2: Point2,
        end_point: Point2,
    },
}

impl PathCommand {
    #[must_use]
    pub fn end_point(&self) -> Point2 {
        match *self {
            Self::MoveTo(point) | Self::LineTo(point) => point,
            Self::QuadraticBezierTo { end_point, .. } | Self::CubicBezierTo { end_point, .. } => {
                end_point
            }
        }
    }

    /// Control points followed by the end point.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        match *self {
            Self::MoveTo(point) | Self::LineTo(point) => vec![point],
            Self::QuadraticBezierTo {
                control_point,
                end_point,
            } => vec![control_point, end_point],
            Self::CubicBezierTo {
                control_point1,
                control_point2,
                end_point,
            } => vec![control_point1, control_point2, end_point],
        }
    }

    #[must_use]
    pub fn map_points(&self, f: impl Fn(Point2) -> Point2) -> Self {
        match *self {
            Self::MoveTo(point) => Self::MoveTo(f(point)),
            Self::LineTo(point) => Self::LineTo(f(point)),
            Self::QuadraticBezierTo {
                control_point,
                end_point,
            } => Self::QuadraticBezierTo {
                control_point: f(control_point),
                end_point: f(end_point),
            },
            Self::CubicBezierTo {
                control_point1,
                control_point2,
                end_point,
            } => Self::CubicBezierTo {
                control_point1: f(control_point1),
                control_point2: f(control_point2),
                end_point: f(end_point),
            },
        }
    }

    /// Same kind of command with every point within `tolerance`.
    #[must_use]
    pub fn fuzzy_eq(&self, other: &Self, tolerance: f64) -> bool {
        if std::mem::discriminant(self) != std::mem::discriminant(other) {
            return false;
        }
        self.points()
            .iter()
            .zip(other.points())
            .all(|(a, b)| a.fuzzy_eq(b, tolerance))
    }
}

/// Addresses a point on a path: a command index and that segment's own parameter.
///
/// Records order lexicographically by `(curve_index, parameter_value)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveIndexRecord {
    pub curve_index: usize,
    pub parameter_value: f64,
}

impl CurveIndexRecord {
    #[must_use]
    pub fn new(curve_index: usize, parameter_value: f64) -> Self {
        Self {
            curve_index,
            parameter_value,
        }
    }
}

/// The concrete shape drawn by one [`PathCommand`].
#[derive(Debug, Clone, PartialEq)]
pub enum PathGeometry {
    Point(PointShape2D),
    Line(LineSegment2),
    Quadratic(QuadraticBezier),
    Cubic(CubicBezier),
}

impl PathGeometry {
    fn from_command(start_point: Point2, command: &PathCommand) -> Self {
        match *command {
            PathCommand::MoveTo(point) => Self::Point(PointShape2D::new(point)),
            PathCommand::LineTo(point) => Self::Line(LineSegment2::new(start_point, point)),
            PathCommand::QuadraticBezierTo {
                control_point,
                end_point,
            } => Self::Quadratic(QuadraticBezier::new(start_point, control_point, end_point)),
            PathCommand::CubicBezierTo {
                control_point1,
                control_point2,
                end_point,
            } => Self::Cubic(CubicBezier::new(
                start_point,
                control_point1,
                control_point2,
                end_point,
            )),
        }
    }

    /// The command that draws this shape from its start point.
    #[must_use]
    pub fn to_command(&self) -> PathCommand {
        match self {
            Self::Point(shape) => PathCommand::MoveTo(shape.p),
            Self::Line(line) => PathCommand::LineTo(line.p2()),
            Self::Quadratic(curve) => PathCommand::QuadraticBezierTo {
                control_point: curve.p1(),
                end_point: curve.p2(),
            },
            Self::Cubic(curve) => PathCommand::CubicBezierTo {
                control_point1: curve.p1(),
                control_point2: curve.p2(),
                end_point: curve.p3(),
            },
        }
    }

    #[must_use]
    pub fn start_point(&self) -> Point2 {
        match self {
            Self::Point(shape) => shape.p,
            Self::Line(line) => line.p1(),
            Self::Quadratic(curve) => curve.p0(),
            Self::Cubic(curve) => curve.p0(),
        }
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        self.to_command().end_point()
    }
}

impl Abstract2DShape for PathGeometry {
    fn signed_distance(&self, point: Point2) -> f64 {
        match self {
            Self::Point(shape) => shape.signed_distance(point),
            Self::Line(line) => line.signed_distance(point),
            Self::Quadratic(curve) => curve.signed_distance(point),
            Self::Cubic(curve) => curve.signed_distance(point),
        }
    }

    fn intersects_line_segment(&self, line: &LineSegment2) -> Vec<Point2> {
        match self {
            Self::Point(shape) => shape.intersects_line_segment(line),
            Self::Line(segment) => segment.intersects_line_segment(line),
            Self::Quadratic(curve) => curve.intersects_line_segment(line),
            Self::Cubic(curve) => curve.intersects_line_segment(line),
        }
    }

    fn tight_bounding_box(&self) -> Rect2 {
        match self {
            Self::Point(shape) => shape.tight_bounding_box(),
            Self::Line(line) => line.tight_bounding_box(),
            Self::Quadratic(curve) => curve.tight_bounding_box(),
            Self::Cubic(curve) => curve.tight_bounding_box(),
        }
    }
}

impl Parameterized2DShape for PathGeometry {
    fn at(&self, t: f64) -> Point2 {
        match self {
            Self::Point(shape) => shape.at(t),
            Self::Line(line) => line.at(t),
            Self::Quadratic(curve) => curve.at(t),
            Self::Cubic(curve) => curve.at(t),
        }
    }

    fn tangent_at(&self, t: f64) -> Vec2 {
        match self {
            Self::Point(shape) => shape.tangent_at(t),
            Self::Line(line) => line.tangent_at(t),
            Self::Quadratic(curve) => curve.tangent_at(t),
            Self::Cubic(curve) => curve.tangent_at(t),
        }
    }

    fn normal_at(&self, t: f64) -> Vec2 {
        match self {
            Self::Point(shape) => shape.normal_at(t),
            Self::Line(line) => line.normal_at(t),
            Self::Quadratic(curve) => curve.normal_at(t),
            Self::Cubic(curve) => curve.normal_at(t),
        }
    }

    fn arg_intersects_line_segment(&self, line: &LineSegment2) -> Vec<f64> {
        match self {
            Self::Point(shape) => shape.arg_intersects_line_segment(line),
            Self::Line(segment) => segment.arg_intersects_line_segment(line),
            Self::Quadratic(curve) => curve.arg_intersects_line_segment(line),
            Self::Cubic(curve) => curve.arg_intersects_line_segment(line),
        }
    }

    fn nearest_point_to(&self, point: Point2) -> NearestPoint {
        match self {
            Self::Point(shape) => shape.nearest_point_to(point),
            Self::Line(line) => line.nearest_point_to(point),
            Self::Quadratic(curve) => curve.nearest_point_to(point),
            Self::Cubic(curve) => curve.nearest_point_to(point),
        }
    }

    fn split_at(&self, t: f64) -> Vec<Self> {
        match self {
            Self::Point(shape) => shape.split_at(t).into_iter().map(Self::Point).collect(),
            Self::Line(line) => line.split_at(t).into_iter().map(Self::Line).collect(),
            Self::Quadratic(curve) => curve.split_at(t).into_iter().map(Self::Quadratic).collect(),
            Self::Cubic(curve) => curve.split_at(t).into_iter().map(Self::Cubic).collect(),
        }
    }
}

/// Options for [`Path::union`].
#[derive(Debug, Clone, Copy)]
pub struct PathUnionOptions {
    /// Reverse one of the paths if that joins them without a `MoveTo`.
    pub allow_reverse: bool,
}

impl Default for PathUnionOptions {
    fn default() -> Self {
        Self {
            allow_reverse: true,
        }
    }
}

/// A start point followed by a sequence of commands.
#[derive(Debug, Clone)]
pub struct Path {
    start_point: Point2,
    parts: Vec<PathCommand>,
    bbox: Rect2,
    geometry: OnceLock<Vec<PathGeometry>>,
    cached_string: OnceLock<String>,
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.start_point == other.start_point && self.parts == other.parts
    }
}

impl Path {
    #[must_use]
    pub fn new(start_point: Point2, parts: Vec<PathCommand>) -> Self {
        let mut bbox = Rect2::bbox_of(&[start_point], 0.0);
        let mut segment_start = start_point;
        for part in &parts {
            bbox = bbox.union(&Self::compute_bbox_for_segment(segment_start, part));
            segment_start = part.end_point();
        }
        Self {
            start_point,
            parts,
            bbox,
            geometry: OnceLock::new(),
            cached_string: OnceLock::new(),
        }
    }

    /// A path at the origin with no commands.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec2::ZERO, Vec::new())
    }

    /// Bounding box of `start_point` and every control point of `part`.
    #[must_use]
    pub fn compute_bbox_for_segment(start_point: Point2, part: &PathCommand) -> Rect2 {
        let mut points = vec![start_point];
        points.extend(part.points());
        Rect2::bbox_of(&points, 0.0)
    }

    #[must_use]
    pub fn start_point(&self) -> Point2 {
        self.start_point
    }

    #[must_use]
    pub fn parts(&self) -> &[PathCommand] {
        &self.parts
    }

    /// A fast overestimate of the path's extent, from control points.
    #[must_use]
    pub fn bbox(&self) -> Rect2 {
        self.bbox
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        self.parts
            .last()
            .map_or(self.start_point, PathCommand::end_point)
    }

    /// One shape per command, in order.
    pub fn geometry(&self) -> &[PathGeometry] {
        self.geometry.get_or_init(|| {
            let mut segment_start = self.start_point;
            self.parts
                .iter()
                .map(|part| {
                    let shape = PathGeometry::from_command(segment_start, part);
                    segment_start = part.end_point();
                    shape
                })
                .collect()
        })
    }

    /// Precise bounds: the union of every segment's tight bounding box.
    #[must_use]
    pub fn get_exact_bbox(&self) -> Rect2 {
        let boxes: Vec<Rect2> = self
            .geometry()
            .iter()
            .map(Abstract2DShape::tight_bounding_box)
            .collect();
        if boxes.is_empty() {
            return Rect2::bbox_of(&[self.start_point], 0.0);
        }
        Rect2::union_all(&boxes)
    }

    /// Distance from `point` to the path stroked with `stroke_radius`.
    ///
    /// Negative inside the stroke.
    #[must_use]
    pub fn signed_distance(&self, point: Point2, stroke_radius: f64) -> f64 {
        let geometry = self.geometry();
        if geometry.is_empty() {
            return self.start_point.distance_to(point) - stroke_radius;
        }
        geometry
            .iter()
            .map(|part| part.signed_distance(point) - stroke_radius)
            .fold(f64::INFINITY, f64::min)
    }

    /// Point at `index`. Out-of-range indices give the nearest end of the path.
    #[must_use]
    pub fn at(&self, index: CurveIndexRecord) -> Point2 {
        if index.curve_index == 0 && index.parameter_value == 0.0 {
            return self.start_point;
        }
        match self.geometry().get(index.curve_index) {
            Some(part) => part.at(index.parameter_value),
            None => self.end_point(),
        }
    }

    /// Unit tangent at `index`, or zero if `index` is out of range.
    #[must_use]
    pub fn tangent_at(&self, index: CurveIndexRecord) -> Vec2 {
        self.geometry()
            .get(index.curve_index)
            .map_or(Vec2::ZERO, |part| part.tangent_at(index.parameter_value))
    }

    /// Unit normal at `index`, or zero if `index` is out of range.
    #[must_use]
    pub fn normal_at(&self, index: CurveIndexRecord) -> Vec2 {
        self.geometry()
            .get(index.curve_index)
            .map_or(Vec2::ZERO, |part| part.normal_at(index.parameter_value))
    }

    /// Lexicographic order on `(curve_index, parameter_value)`.
    #[must_use]
    pub fn compare_curve_indices(a: &CurveIndexRecord, b: &CurveIndexRecord) -> Ordering {
        a.curve_index
            .cmp(&b.curve_index)
            .then(a.parameter_value.total_cmp(&b.parameter_value))
    }

    /// Moves `index` by `step` parameter units, carrying whole units across
    /// segment boundaries and clamping to the ends of the path.
    #[must_use]
    pub fn step_curve_index_by(&self, index: CurveIndexRecord, step: f64) -> CurveIndexRecord {
        let segment_count = self.parts.len();
        if segment_count == 0 {
            return CurveIndexRecord::new(0, 0.0);
        }
        let last = segment_count - 1;
        let mut curve_index = index.curve_index.min(last);
        let mut parameter_value = index.parameter_value + step;

        while parameter_value > 1.0 && curve_index < last {
            parameter_value -= 1.0;
            curve_index += 1;
        }
        while parameter_value < 0.0 && curve_index > 0 {
            parameter_value += 1.0;
            curve_index -= 1;
        }
        CurveIndexRecord::new(curve_index, parameter_value.clamp(0.0, 1.0))
    }

    /// Joins `other` onto the end of this path.
    ///
    /// Endpoints that already meet are joined directly. Otherwise, when
    /// [`PathUnionOptions::allow_reverse`] is set, one path may be reversed
    /// or the order swapped to avoid a gap. As a last resort a `MoveTo`
    /// bridges the two.
    #[must_use]
    pub fn union(&self, other: &Self, options: PathUnionOptions) -> Self {
        let mut parts = self.parts.clone();
        if self.end_point().fuzzy_eq(other.start_point, TOLERANCE) {
            parts.extend_from_slice(&other.parts);
        } else if options.allow_reverse && self.start_point.fuzzy_eq(other.end_point(), TOLERANCE) {
            return other.union(self, PathUnionOptions { allow_reverse: false });
        } else if options.allow_reverse && self.start_point.fuzzy_eq(other.start_point, TOLERANCE) {
            return self.union(&other.reversed(), PathUnionOptions { allow_reverse: false });
        } else {
            parts.push(PathCommand::MoveTo(other.start_point));
            parts.extend_from_slice(&other.parts);
        }
        Self::new(self.start_point, parts)
    }

    /// The same geometry traversed from end to start.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut parts = Vec::with_capacity(self.parts.len());
        let mut last_point = self.start_point;
        for part in &self.parts {
            parts.push(match *part {
                PathCommand::MoveTo(_) => PathCommand::MoveTo(last_point),
                PathCommand::LineTo(_) => PathCommand::LineTo(last_point),
                PathCommand::QuadraticBezierTo { control_point, .. } => {
                    PathCommand::QuadraticBezierTo {
                        control_point,
                        end_point: last_point,
                    }
                }
                PathCommand::CubicBezierTo {
                    control_point1,
                    control_point2,
                    ..
                } => PathCommand::CubicBezierTo {
                    control_point1: control_point2,
                    control_point2: control_point1,
                    end_point: last_point,
                },
            });
            last_point = part.end_point();
        }
        parts.reverse();
        Self::new(self.end_point(), parts)
    }

    /// Replaces internal moves with lines and returns to the start point.
    #[must_use]
    pub fn as_closed(&self) -> Self {
        let mut changed = false;
        let mut parts: Vec<PathCommand> = self
            .parts
            .iter()
            .map(|part| match *part {
                PathCommand::MoveTo(point) => {
                    changed = true;
                    PathCommand::LineTo(point)
                }
                other => other,
            })
            .collect();
        if !self.end_point().fuzzy_eq(self.start_point, TOLERANCE) {
            parts.push(PathCommand::LineTo(self.start_point));
            changed = true;
        }
        if !changed {
            return self.clone();
        }
        Self::new(self.start_point, parts)
    }

    /// Straight segments through every control point, in order.
    ///
    /// Béziers are replaced by their control polygons.
    #[must_use]
    pub fn polyline_approximation(&self) -> Vec<LineSegment2> {
        let mut previous = self.start_point;
        self.parts
            .iter()
            .flat_map(PathCommand::points)
            .map(|point| {
                let segment = LineSegment2::new(previous, point);
                previous = point;
                segment
            })
            .collect()
    }

    #[must_use]
    pub fn map_points(&self, f: impl Fn(Point2) -> Point2) -> Self {
        let parts = self.parts.iter().map(|part| part.map_points(&f)).collect();
        Self::new(f(self.start_point), parts)
    }

    #[must_use]
    pub fn transformed_by(&self, affine_transform: &Mat33) -> Self {
        if affine_transform.is_identity() {
            return self.clone();
        }
        self.map_points(|point| affine_transform.transform_vec2(point))
    }

    /// Same start point and the same commands, up to `tolerance`.
    #[must_use]
    pub fn fuzzy_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.parts.len() == other.parts.len()
            && self.start_point.fuzzy_eq(other.start_point, tolerance)
            && self
                .parts
                .iter()
                .zip(&other.parts)
                .all(|(a, b)| a.fuzzy_eq(b, tolerance))
    }

    /// Outline of `rect`, or with `line_width` the ring covered by stroking
    /// that outline.
    #[must_use]
    pub fn from_rect(rect: &Rect2, line_width: Option<f64>) -> Self {
        let (start_point, corners) = match line_width {
            Some(line_width) => {
                let corner_to_edge = vec2(line_width, line_width) * 0.5;
                let inner = Rect2::from_corners(
                    rect.top_left() + corner_to_edge,
                    rect.bottom_right() - corner_to_edge,
                );
                let outer = Rect2::from_corners(
                    rect.top_left() - corner_to_edge,
                    rect.bottom_right() + corner_to_edge,
                );
                let inner_corners = inner.corners();
                let mut outer_corners = outer.corners();
                let start_point = outer_corners[3];
                outer_corners.reverse();

                let mut corners = vec![inner_corners[3]];
                corners.extend(inner_corners);
                corners.extend(outer_corners);
                (start_point, corners)
            }
            None => {
                let corners = rect.corners();
                (corners[0], corners[1..].to_vec())
            }
        };

        let mut parts: Vec<PathCommand> = corners.into_iter().map(PathCommand::LineTo).collect();
        parts.push(PathCommand::LineTo(start_point));
        Self::new(start_point, parts)
    }

    /// Closed outline of the convex hull of `points`.
    #[must_use]
    pub fn from_convex_hull_of(points: &[Point2]) -> Self {
        let hull = convex_hull_2_of(points);
        let Some((&first, rest)) = hull.split_first() else {
            return Self::empty();
        };
        let mut parts: Vec<PathCommand> = rest.iter().copied().map(PathCommand::LineTo).collect();
        if rest.len() > 1 {
            parts.push(PathCommand::LineTo(first));
        }
        Self::new(first, parts)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_svg_string())
    }
}
