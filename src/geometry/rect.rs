use std::fmt;

use super::{Abstract2DShape, LineSegment2};
use crate::math::{vec2, Mat33, Point2, Vec2};

/// An axis-aligned rectangle with its origin at the top-left corner.
///
/// Width and height are never negative: a negative size passed to
/// [`Rect2::new`] moves the origin and keeps the absolute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect2 {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect2 {
    pub const EMPTY: Self = Self {
        x: 0.0,
        y: 0.0,
        w: 0.0,
        h: 0.0,
    };

    pub const UNIT_SQUARE: Self = Self {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        let (x, w) = if w < 0.0 { (x + w, w.abs()) } else { (x, w) };
        let (y, h) = if h < 0.0 { (y + h, h.abs()) } else { (y, h) };
        Self { x, y, w, h }
    }

    /// The rectangle spanned by two opposite corners, in either order.
    #[must_use]
    pub fn from_corners(corner1: Point2, corner2: Point2) -> Self {
        Self::new(
            corner1.x.min(corner2.x),
            corner1.y.min(corner2.y),
            (corner1.x - corner2.x).abs(),
            (corner1.y - corner2.y).abs(),
        )
    }

    /// Bounding box of `points`, grown by `margin`. Empty input gives [`Rect2::EMPTY`].
    #[must_use]
    pub fn bbox_of(points: &[Point2], margin: f64) -> Self {
        let Some(first) = points.first() else {
            return Self::EMPTY;
        };
        let (min, max) = points.iter().fold((*first, *first), |(min, max), p| {
            (min.zip(*p, f64::min), max.zip(*p, f64::max))
        });
        Self::from_corners(min, max).grown_by(margin)
    }

    /// Smallest rectangle containing every one of `rects`.
    #[must_use]
    pub fn union_all(rects: &[Self]) -> Self {
        let Some((first, rest)) = rects.split_first() else {
            return Self::EMPTY;
        };
        rest.iter().fold(*first, |acc, r| acc.union(r))
    }

    #[must_use]
    pub fn top_left(&self) -> Point2 {
        vec2(self.x, self.y)
    }

    #[must_use]
    pub fn top_right(&self) -> Point2 {
        vec2(self.x + self.w, self.y)
    }

    #[must_use]
    pub fn bottom_right(&self) -> Point2 {
        vec2(self.x + self.w, self.y + self.h)
    }

    #[must_use]
    pub fn bottom_left(&self) -> Point2 {
        vec2(self.x, self.y + self.h)
    }

    #[must_use]
    pub fn size(&self) -> Vec2 {
        vec2(self.w, self.h)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.w
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.h
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        vec2(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    #[must_use]
    pub fn max_dimension(&self) -> f64 {
        self.w.max(self.h)
    }

    #[must_use]
    pub fn min_dimension(&self) -> f64 {
        self.w.min(self.h)
    }

    /// Corners in rotational order: bottom-right, top-right, top-left, bottom-left.
    #[must_use]
    pub fn corners(&self) -> [Point2; 4] {
        [
            self.bottom_right(),
            self.top_right(),
            self.top_left(),
            self.bottom_left(),
        ]
    }

    /// Edges joining consecutive [`Rect2::corners`], wrapping around.
    #[must_use]
    pub fn edges(&self) -> [LineSegment2; 4] {
        let c = self.corners();
        [
            LineSegment2::new(c[0], c[1]),
            LineSegment2::new(c[1], c[2]),
            LineSegment2::new(c[2], c[3]),
            LineSegment2::new(c[3], c[0]),
        ]
    }

    /// Inclusive containment: boundary points count.
    #[must_use]
    pub fn contains_point(&self, point: Point2) -> bool {
        self.x <= point.x
            && self.y <= point.y
            && self.x + self.w >= point.x
            && self.y + self.h >= point.y
    }

    #[must_use]
    pub fn contains_rect(&self, other: &Self) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.x + self.w >= other.x + other.w
            && self.y + self.h >= other.y + other.h
    }

    /// Overlap test on both axis projections. Touching edges intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let (this_max_x, other_max_x) = (self.x + self.w, other.x + other.w);
        if this_max_x < other.x || self.x > other_max_x {
            return false;
        }
        let (this_max_y, other_max_y) = (self.y + self.h, other.y + other.h);
        if this_max_y < other.y || self.y > other_max_y {
            return false;
        }
        true
    }

    /// The overlapping region, if any.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        let top_left = self.top_left().zip(other.top_left(), f64::max);
        let bottom_right = self.bottom_right().zip(other.bottom_right(), f64::min);
        Some(Self::from_corners(top_left, bottom_right))
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let top_left = self.top_left().zip(other.top_left(), f64::min);
        let bottom_right = self.bottom_right().zip(other.bottom_right(), f64::max);
        Self::from_corners(top_left, bottom_right)
    }

    /// Splits into `columns × rows` equal cells, listed row by row.
    ///
    /// Non-positive counts give no cells. A zero-width (zero-height) rectangle
    /// is treated as having a single column (row).
    #[must_use]
    pub fn divide_into_grid(&self, columns: i32, rows: i32) -> Vec<Self> {
        if columns <= 0 || rows <= 0 {
            return Vec::new();
        }
        let column_width = self.w / f64::from(columns);
        let row_height = self.h / f64::from(rows);
        let columns = if column_width == 0.0 { 1 } else { columns };
        let rows = if row_height == 0.0 { 1 } else { rows };

        (0..rows)
            .flat_map(|j| {
                (0..columns).map(move |i| {
                    Self::new(
                        self.x + f64::from(i) * column_width,
                        self.y + f64::from(j) * row_height,
                        column_width,
                        row_height,
                    )
                })
            })
            .collect()
    }

    /// Grows just enough to contain `point`.
    #[must_use]
    pub fn grown_to_point(&self, point: Point2, margin: f64) -> Self {
        let point_rect = Self::new(point.x - margin, point.y - margin, margin * 2.0, margin * 2.0);
        self.union(&point_rect)
    }

    /// Pads every side by `margin`.
    ///
    /// A negative margin shrinks the rectangle, but never below zero size.
    #[must_use]
    pub fn grown_by(&self, margin: f64) -> Self {
        if margin == 0.0 {
            return *self;
        }
        if margin < 0.0 {
            let x_margin = -(-margin).min(self.w / 2.0);
            let y_margin = -(-margin).min(self.h / 2.0);
            return Self::new(
                self.x - x_margin,
                self.y - y_margin,
                self.w + x_margin * 2.0,
                self.h + y_margin * 2.0,
            );
        }
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + margin * 2.0,
            self.h + margin * 2.0,
        )
    }

    /// Pads symmetrically in each dimension smaller than `min_size`.
    #[must_use]
    pub fn grown_to_size(&self, min_size: Vec2) -> Self {
        if self.w >= min_size.x && self.h >= min_size.y {
            return *self;
        }
        let delta_w = (min_size.x - self.w).max(0.0);
        let delta_h = (min_size.y - self.h).max(0.0);
        Self::new(
            self.x - delta_w / 2.0,
            self.y - delta_h / 2.0,
            self.w + delta_w,
            self.h + delta_h,
        )
    }

    #[must_use]
    pub fn translated_by(&self, by: Vec2) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.w, self.h)
    }

    /// Same top-left corner, new size.
    #[must_use]
    pub fn resized_to(&self, size: Vec2) -> Self {
        Self::new(self.x, self.y, size.x, size.y)
    }

    /// Bounding box of this rectangle's corners after `affine_transform`.
    #[must_use]
    pub fn transformed_bounding_box(&self, affine_transform: &Mat33) -> Self {
        let corners = self.corners().map(|c| affine_transform.transform_vec2(c));
        Self::bbox_of(&corners, 0.0)
    }

    /// Nearest point on any of the four edges.
    #[must_use]
    pub fn get_closest_point_on_boundary_to(&self, target: Point2) -> Point2 {
        self.edges()
            .iter()
            .map(|edge| edge.closest_point_to(target))
            .min_by(|a, b| a.distance_to(target).total_cmp(&b.distance_to(target)))
            .unwrap_or_else(|| self.top_left())
    }

    /// Component-wise comparison of position and size.
    #[must_use]
    pub fn fuzzy_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.top_left().fuzzy_eq(other.top_left(), tolerance)
            && self.size().fuzzy_eq(other.size(), tolerance)
    }
}

impl Abstract2DShape for Rect2 {
    fn signed_distance(&self, point: Point2) -> f64 {
        let dist = point.distance_to(self.get_closest_point_on_boundary_to(point));
        if self.contains_point(point) {
            -dist
        } else {
            dist
        }
    }

    fn intersects_line_segment(&self, line: &LineSegment2) -> Vec<Point2> {
        self.edges()
            .iter()
            .filter_map(|edge| edge.intersection(line))
            .map(|i| i.point)
            .collect()
    }

    fn tight_bounding_box(&self) -> Rect2 {
        *self
    }

    fn contains_point(&self, point: Point2, epsilon: f64) -> bool {
        self.grown_by(epsilon).contains_point(point)
    }
}

impl fmt::Display for Rect2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rect(point({}, {}), w={}, h={})", self.x, self.y, self.w, self.h)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn negative_size_is_normalized() {
        for (w, h) in [(-3.0, 2.0), (3.0, -2.0), (-3.0, -2.0), (0.0, -0.5)] {
            let r = Rect2::new(1.0, 1.0, w, h);
            assert!(r.w >= 0.0 && r.h >= 0.0, "{r}");
        }
        assert_eq!(Rect2::new(5.0, 5.0, -2.0, -3.0), Rect2::new(3.0, 2.0, 2.0, 3.0));
    }

    #[test]
    fn from_corners_is_symmetric() {
        let a = vec2(-1.0, 4.0);
        let b = vec2(3.0, -2.0);
        assert_eq!(Rect2::from_corners(a, b), Rect2::from_corners(b, a));
        assert_eq!(Rect2::from_corners(a, b), Rect2::new(-1.0, -2.0, 4.0, 6.0));
    }

    #[test]
    fn unit_square_grid() {
        let cells = Rect2::UNIT_SQUARE.divide_into_grid(2, 2);
        assert_eq!(
            cells,
            vec![
                Rect2::new(0.0, 0.0, 0.5, 0.5),
                Rect2::new(0.5, 0.0, 0.5, 0.5),
                Rect2::new(0.0, 0.5, 0.5, 0.5),
                Rect2::new(0.5, 0.5, 0.5, 0.5),
            ]
        );
    }

    #[test]
    fn degenerate_grids() {
        assert!(Rect2::UNIT_SQUARE.divide_into_grid(0, 3).is_empty());
        assert!(Rect2::UNIT_SQUARE.divide_into_grid(2, -1).is_empty());
        let flat = Rect2::new(0.0, 0.0, 0.0, 4.0).divide_into_grid(5, 2);
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn touching_rects_intersect() {
        let a = Rect2::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect2::new(1.0, 0.0, 1.0, 1.0);
        let c = Rect2::new(1.5, 1.5, 1.0, 1.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.intersection(&b), Some(Rect2::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(a.intersection(&c), None);
        assert_eq!(
            Rect2::new(0.0, 0.0, 2.0, 2.0).intersection(&Rect2::new(1.0, 1.0, 5.0, 5.0)),
            Some(Rect2::new(1.0, 1.0, 1.0, 1.0))
        );
    }

    #[test]
    fn grown_by_clamps_negative_margin() {
        let r = Rect2::new(0.0, 0.0, 4.0, 2.0);
        assert_eq!(r.grown_by(1.0), Rect2::new(-1.0, -1.0, 6.0, 4.0));
        assert_eq!(r.grown_by(-0.5), Rect2::new(0.5, 0.5, 3.0, 1.0));
        let shrunk = r.grown_by(-10.0);
        assert_abs_diff_eq!(shrunk.w, 0.0);
        assert_abs_diff_eq!(shrunk.h, 0.0);
        assert!(shrunk.center().fuzzy_eq(r.center(), 1e-12));
    }

    #[test]
    fn grown_to_size_only_pads_small_dimensions() {
        let r = Rect2::new(0.0, 0.0, 4.0, 1.0);
        assert_eq!(r.grown_to_size(vec2(2.0, 3.0)), Rect2::new(0.0, -1.0, 4.0, 3.0));
        assert_eq!(r.grown_to_size(vec2(1.0, 1.0)), r);
    }

    #[test]
    fn closest_boundary_point_and_signed_distance() {
        let r = Rect2::new(0.0, 0.0, 4.0, 4.0);
        assert_eq!(r.get_closest_point_on_boundary_to(vec2(1.0, 2.0)), vec2(0.0, 2.0));
        assert_abs_diff_eq!(r.signed_distance(vec2(1.0, 2.0)), -1.0);
        assert_abs_diff_eq!(r.signed_distance(vec2(7.0, 4.0)), 3.0);
        assert_abs_diff_eq!(r.signed_distance(vec2(4.0, 4.0)), 0.0);
    }

    #[test]
    fn corners_and_edges_rotate() {
        let r = Rect2::new(0.0, 0.0, 2.0, 1.0);
        let corners = r.corners();
        assert_eq!(corners[0], vec2(2.0, 1.0));
        assert_eq!(corners[2], vec2(0.0, 0.0));
        let edges = r.edges();
        for i in 0..4 {
            assert_eq!(edges[i].p2(), edges[(i + 1) % 4].p1());
        }
    }

    #[test]
    fn bbox_union_and_transform() {
        let bbox = Rect2::bbox_of(&[vec2(1.0, 5.0), vec2(-2.0, 3.0), vec2(0.0, 7.0)], 0.0);
        assert_eq!(bbox, Rect2::new(-2.0, 3.0, 3.0, 4.0));
        assert_eq!(Rect2::bbox_of(&[], 1.0), Rect2::EMPTY);

        let u = Rect2::union_all(&[Rect2::new(0.0, 0.0, 1.0, 1.0), Rect2::new(3.0, -1.0, 1.0, 1.0)]);
        assert_eq!(u, Rect2::new(0.0, -1.0, 4.0, 2.0));

        let rotated = Rect2::UNIT_SQUARE
            .transformed_bounding_box(&Mat33::z_rotation(std::f64::consts::FRAC_PI_2, vec2(0.0, 0.0)));
        assert!(rotated.fuzzy_eq(&Rect2::new(-1.0, 0.0, 1.0, 1.0), 1e-12));
    }

    #[test]
    fn line_crossing_rect() {
        let r = Rect2::new(0.0, 0.0, 2.0, 2.0);
        let line = LineSegment2::new(vec2(-1.0, 1.0), vec2(3.0, 1.0));
        let hits = r.intersects_line_segment(&line);
        assert_eq!(hits.len(), 2);
        assert!(Abstract2DShape::contains_point(&r, vec2(2.05, 1.0), 0.1));
    }
}
