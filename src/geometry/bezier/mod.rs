//! Quadratic and cubic Bézier curves over a shared algebraic core.
//!
//! [`BezierCore`] owns the control points and lazily converts them to power
//! basis (`c0 + c1·t + c2·t² + c3·t³` per component). Evaluation, nearest
//! point search, line intersection, subdivision and exact bounds all work
//! from that representation, independent of the curve's order.

mod cubic;
mod quadratic;

use std::sync::OnceLock;

pub use cubic::CubicBezier;
pub use quadratic::QuadraticBezier;

use super::{LineSegment2, NearestPoint, Rect2};
use crate::math::{solve_cubic, Mat33, Point2, Vec2, Vec3};

/// Newton steps taken by [`BezierCore::nearest_point_to`] after seeding.
pub const NEWTON_ITERATIONS: usize = 12;

/// Evenly spaced parameter values tried before Newton refinement.
pub const NEWTON_SEED_SAMPLES: usize = 4;

/// Slack allowed on solver roots just outside `[0, 1]`.
const ROOT_TOLERANCE: f64 = 1e-10;

/// Segments used by [`BezierCore::length`].
const LENGTH_SAMPLES: usize = 64;

/// Control points of a degree `N - 1` curve plus its cached power-basis form.
#[derive(Debug, Clone)]
pub(crate) struct BezierCore<const N: usize> {
    points: [Point2; N],
    polynomial: OnceLock<[Vec2; N]>,
}

impl<const N: usize> PartialEq for BezierCore<N> {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

fn binomial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Converts Bernstein weights to power-basis coefficients.
///
/// `c_j = C(n, j) · Σ_{i ≤ j} (-1)^(j-i) · C(j, i) · w_i`
fn to_power_basis<T, const N: usize>(weights: &[T; N], zero: T) -> [T; N]
where
    T: Copy + std::ops::Add<Output = T> + std::ops::Mul<f64, Output = T>,
{
    let degree = N - 1;
    std::array::from_fn(|j| {
        let sum = (0..=j).fold(zero, |acc, i| {
            let sign = if (j - i) % 2 == 0 { 1.0 } else { -1.0 };
            acc + weights[i] * (sign * binomial(j, i))
        });
        sum * binomial(degree, j)
    })
}

impl<const N: usize> BezierCore<N> {
    pub(crate) fn new(points: [Point2; N]) -> Self {
        Self {
            points,
            polynomial: OnceLock::new(),
        }
    }

    pub(crate) fn points(&self) -> &[Point2; N] {
        &self.points
    }

    fn polynomial(&self) -> &[Vec2; N] {
        self.polynomial
            .get_or_init(|| to_power_basis(&self.points, Vec3::ZERO))
    }

    pub(crate) fn at(&self, t: f64) -> Point2 {
        self.polynomial()
            .iter()
            .rev()
            .fold(Vec3::ZERO, |acc, &c| acc * t + c)
    }

    pub(crate) fn derivative_at(&self, t: f64) -> Vec2 {
        self.polynomial()
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .fold(Vec3::ZERO, |acc, (j, &c)| acc * t + c * j as f64)
    }

    pub(crate) fn second_derivative_at(&self, t: f64) -> Vec2 {
        self.polynomial()
            .iter()
            .enumerate()
            .skip(2)
            .rev()
            .fold(Vec3::ZERO, |acc, (j, &c)| acc * t + c * (j * (j - 1)) as f64)
    }

    pub(crate) fn tangent_at(&self, t: f64) -> Vec2 {
        self.derivative_at(t).normalized()
    }

    pub(crate) fn normal_at(&self, t: f64) -> Vec2 {
        self.derivative_at(t).orthog()
    }

    /// Minimizes `|B(t) - point|²` with Newton's method on its derivative.
    ///
    /// The result is never worse than the best seed sample, so degenerate
    /// curves (coincident or collinear control points) still give a sane
    /// answer.
    pub(crate) fn nearest_point_to(&self, point: Point2) -> NearestPoint {
        let square_distance = |t: f64| self.at(t).square_distance_to(point);

        let (seed_t, seed_distance) = (0..NEWTON_SEED_SAMPLES)
            .map(|i| i as f64 / (NEWTON_SEED_SAMPLES - 1) as f64)
            .map(|t| (t, square_distance(t)))
            .fold((0.0, f64::INFINITY), |best, candidate| {
                if candidate.1 < best.1 {
                    candidate
                } else {
                    best
                }
            });

        let mut t = seed_t;
        for _ in 0..NEWTON_ITERATIONS {
            let offset = self.at(t) - point;
            let d1 = self.derivative_at(t);
            let d2 = self.second_derivative_at(t);

            // f(t) = |B(t) - p|², f' = 2(B - p)·B', f'' = 2B'·B' + 2(B - p)·B''
            let f_prime = 2.0 * offset.dot(d1);
            let f_double_prime = 2.0 * d1.dot(d1) + 2.0 * offset.dot(d2);
            if f_double_prime == 0.0 {
                continue;
            }
            t = (t - f_prime / f_double_prime).clamp(0.0, 1.0);
        }

        let t = if square_distance(t) <= seed_distance { t } else { seed_t };
        NearestPoint {
            point: self.at(t),
            parameter_value: t,
        }
    }

    pub(crate) fn distance_to(&self, point: Point2) -> f64 {
        self.nearest_point_to(point).point.distance_to(point)
    }

    /// Parameters in `[0, 1]` where the curve crosses `line`, ascending.
    pub(crate) fn arg_intersects_line_segment(&self, line: &LineSegment2) -> Vec<f64> {
        // Collinear control points: the curve traces (part of) a segment.
        if let Some(as_line) = LineSegment2::of_smallest_containing_points(&self.points) {
            return as_line
                .intersection(line)
                .map(|hit| self.nearest_point_to(hit.point).parameter_value)
                .into_iter()
                .collect();
        }
        if line.length() == 0.0 {
            return Vec::new();
        }

        // Signed distance of each control point from the line's support.
        let normal = line.direction().orthog();
        let distances: [f64; N] =
            std::array::from_fn(|i| normal.dot(self.points[i] - line.p1()));
        let c = to_power_basis(&distances, 0.0);
        let coefficient = |j: usize| c.get(j).copied().unwrap_or(0.0);

        let mut params: Vec<f64> = solve_cubic(coefficient(3), coefficient(2), coefficient(1), coefficient(0))
            .into_iter()
            .filter(|t| (-ROOT_TOLERANCE..=1.0 + ROOT_TOLERANCE).contains(t))
            .map(|t| t.clamp(0.0, 1.0))
            .filter(|&t| {
                let point = self.at(t);
                point.distance_to(line.p1()) <= line.length()
                    && point.distance_to(line.p2()) <= line.length()
            })
            .collect();
        params.sort_by(f64::total_cmp);
        params.dedup();
        params
    }

    pub(crate) fn intersects_line_segment(&self, line: &LineSegment2) -> Vec<Point2> {
        self.arg_intersects_line_segment(line)
            .into_iter()
            .map(|t| self.at(t))
            .collect()
    }

    /// De Casteljau subdivision. `None` if `t` is not strictly inside `(0, 1)`.
    pub(crate) fn split_at(&self, t: f64) -> Option<([Point2; N], [Point2; N])> {
        if t <= 0.0 || t >= 1.0 {
            return None;
        }
        let mut level = self.points;
        let mut first = self.points;
        let mut second = self.points;
        for step in 0..N {
            first[step] = level[0];
            second[N - 1 - step] = level[N - 1 - step];
            for i in 0..N - 1 - step {
                level[i] = level[i].lerp(level[i + 1], t);
            }
        }
        Some((first, second))
    }

    /// Exact bounds: endpoints plus every interior extremum of each component.
    pub(crate) fn tight_bounding_box(&self) -> Rect2 {
        let c = self.polynomial();
        let coefficient = |j: usize| c.get(j).copied().unwrap_or(Vec3::ZERO);
        let (c1, c2, c3) = (coefficient(1), coefficient(2), coefficient(3));

        let mut samples = vec![self.points[0], self.points[N - 1]];
        let components: [fn(Vec2) -> f64; 2] = [|v| v.x, |v| v.y];
        for component in components {
            // d/dt: 3·c3·t² + 2·c2·t + c1
            let roots = solve_cubic(0.0, 3.0 * component(c3), 2.0 * component(c2), component(c1));
            samples.extend(
                roots
                    .into_iter()
                    .filter(|t| *t > 0.0 && *t < 1.0)
                    .map(|t| self.at(t)),
            );
        }
        Rect2::bbox_of(&samples, 0.0)
    }

    /// Bounds of the control polygon, which always contain the curve.
    pub(crate) fn control_point_bbox(&self) -> Rect2 {
        Rect2::bbox_of(&self.points, 0.0)
    }

    /// Arc length approximated by a fine polyline.
    pub(crate) fn length(&self) -> f64 {
        let mut previous = self.points[0];
        (1..=LENGTH_SAMPLES)
            .map(|i| {
                let current = self.at(i as f64 / LENGTH_SAMPLES as f64);
                let step = previous.distance_to(current);
                previous = current;
                step
            })
            .sum()
    }

    pub(crate) fn transformed_points(&self, affine_transform: &Mat33) -> [Point2; N] {
        self.points.map(|p| affine_transform.transform_vec2(p))
    }
}
