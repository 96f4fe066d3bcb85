use std::fmt;
use std::sync::{LazyLock, OnceLock};

use nalgebra::Matrix3;
use regex::Regex;
use tracing::debug;

use super::vec3::{vec2, Point2, Vec2, Vec3};
use crate::error::TransformParseError;

/// Pivots smaller than this are treated as zero while inverting.
pub const INVERSE_PIVOT_THRESHOLD: f64 = 1e-10;

/// A 3×3 matrix, stored row-major.
///
/// Used both as a linear map of 3-vectors ([`Mat33::transform_vec3`]) and as
/// an affine map of 2D points ([`Mat33::transform_vec2`]). The inverse is
/// computed on first request and cached.
#[derive(Debug, Clone)]
pub struct Mat33 {
    m: Matrix3<f64>,
    inverse: OnceLock<Option<Matrix3<f64>>>,
}

impl Mat33 {
    /// Creates a matrix from its entries, listed row by row.
    #[allow(clippy::too_many_arguments, clippy::many_single_char_names)]
    #[must_use]
    pub fn new(
        a1: f64,
        a2: f64,
        a3: f64,
        b1: f64,
        b2: f64,
        b3: f64,
        c1: f64,
        c2: f64,
        c3: f64,
    ) -> Self {
        Self::from_matrix(Matrix3::new(a1, a2, a3, b1, b2, b3, c1, c2, c3))
    }

    fn from_matrix(m: Matrix3<f64>) -> Self {
        Self {
            m,
            inverse: OnceLock::new(),
        }
    }

    /// Builds a matrix whose rows are the given vectors.
    #[must_use]
    pub fn of_rows(r1: Vec3, r2: Vec3, r3: Vec3) -> Self {
        Self::new(r1.x, r1.y, r1.z, r2.x, r2.y, r2.z, r3.x, r3.y, r3.z)
    }

    #[must_use]
    pub fn identity() -> Self {
        Self::from_matrix(Matrix3::identity())
    }

    /// Affine translation by `amount`.
    #[must_use]
    pub fn translation(amount: Vec2) -> Self {
        Self::new(1.0, 0.0, amount.x, 0.0, 1.0, amount.y, 0.0, 0.0, 1.0)
    }

    /// Counter-clockwise rotation by `radians` about `center`.
    #[must_use]
    pub fn z_rotation(radians: f64, center: Point2) -> Self {
        if radians == 0.0 {
            return Self::identity();
        }
        let (sin, cos) = radians.sin_cos();
        let rotation = Self::new(cos, -sin, 0.0, sin, cos, 0.0, 0.0, 0.0, 1.0);
        Self::about(center, &rotation)
    }

    /// Scales by `amount` (x and y factors) about `center`.
    #[must_use]
    pub fn scaling_2d(amount: Vec2, center: Point2) -> Self {
        let scale = Self::new(amount.x, 0.0, 0.0, 0.0, amount.y, 0.0, 0.0, 0.0, 1.0);
        Self::about(center, &scale)
    }

    /// Scales uniformly by `amount` about `center`.
    #[must_use]
    pub fn uniform_scaling_2d(amount: f64, center: Point2) -> Self {
        Self::scaling_2d(vec2(amount, amount), center)
    }

    /// Conjugates `transform` so it acts about `center` instead of the origin.
    fn about(center: Point2, transform: &Self) -> Self {
        Self::translation(center)
            .right_mul(transform)
            .right_mul(&Self::translation(-center))
    }

    /// Returns `self * other`.
    #[must_use]
    pub fn right_mul(&self, other: &Self) -> Self {
        Self::from_matrix(self.m * other.m)
    }

    #[must_use]
    pub fn transposed(&self) -> Self {
        Self::from_matrix(self.m.transpose())
    }

    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.m.determinant()
    }

    /// Applies this matrix to `point` as an affine transform (`z` treated as 1).
    #[must_use]
    pub fn transform_vec2(&self, point: Vec2) -> Vec2 {
        let v = self.transform_vec3(Vec3::new(point.x, point.y, 1.0));
        vec2(v.x, v.y)
    }

    /// Applies this matrix to `v` as a linear map; no implicit translation.
    #[must_use]
    pub fn transform_vec3(&self, v: Vec3) -> Vec3 {
        (self.m * nalgebra::Vector3::from(v)).into()
    }

    /// Whether an inverse exists.
    #[must_use]
    pub fn invertable(&self) -> bool {
        self.cached_inverse().is_some()
    }

    /// The inverse of this matrix, or the identity if it is singular.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self.cached_inverse() {
            Some(inverse) => Self::from_matrix(*inverse),
            None => Self::identity(),
        }
    }

    fn cached_inverse(&self) -> Option<&Matrix3<f64>> {
        self.inverse
            .get_or_init(|| gauss_jordan_inverse(&self.m))
            .as_ref()
    }

    /// Row `index` (0, 1 or 2) as a vector.
    #[must_use]
    pub fn get_row(&self, index: usize) -> Vec3 {
        self.m.row(index).transpose().into()
    }

    /// Column `index` (0, 1 or 2) as a vector.
    #[must_use]
    pub fn get_column(&self, index: usize) -> Vec3 {
        self.m.column(index).into_owned().into()
    }

    /// Entries in row-major order.
    #[must_use]
    pub fn to_array(&self) -> [f64; 9] {
        let m = &self.m;
        [
            m[(0, 0)],
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 0)],
            m[(1, 1)],
            m[(1, 2)],
            m[(2, 0)],
            m[(2, 1)],
            m[(2, 2)],
        ]
    }

    /// Applies `f` to every entry.
    #[must_use]
    pub fn map_entries(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::from_matrix(self.m.map(f))
    }

    /// Entry-wise comparison within `fuzz`.
    #[must_use]
    pub fn fuzzy_eq(&self, other: &Self, fuzz: f64) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() <= fuzz)
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.m == Matrix3::identity()
    }

    /// How much this transform scales distances along the x-axis.
    #[must_use]
    pub fn get_scale_factor(&self) -> f64 {
        self.transform_vec3(Vec3::UNIT_X).magnitude()
    }

    /// The angle the x-axis is rotated to by this transform.
    #[must_use]
    pub fn get_rotation_angle(&self) -> f64 {
        self.transform_vec3(Vec3::UNIT_X).angle()
    }

    /// Formats the affine part as a CSS `matrix(a, b, c, d, e, f)` value.
    #[must_use]
    pub fn to_css_matrix(&self) -> String {
        let m = &self.m;
        format!(
            "matrix({},{},{},{},{},{})",
            m[(0, 0)],
            m[(1, 0)],
            m[(0, 1)],
            m[(1, 1)],
            m[(0, 2)],
            m[(1, 2)]
        )
    }

    /// Parses a CSS `transform` value.
    ///
    /// Supports `matrix(a,b,c,d,e,f)`, `scale(s)`, `scale(sx, sy)`,
    /// `translate(x)`, `translate(x, y)` and `rotate(angle)`. Each later
    /// function is right-multiplied onto the result so far. The empty string
    /// and `none` give the identity.
    ///
    /// # Errors
    ///
    /// Returns a [`TransformParseError`], wrapped in
    /// [`InkgeoError`](crate::InkgeoError), for unknown functions, wrong
    /// argument counts, non-numeric arguments, or text outside any function.
    pub fn from_css_matrix(css: &str) -> crate::Result<Self> {
        static PART: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"\s*([A-Za-z]\w*)\s*\(([^)]*)\)\s*").unwrap_or_else(|_| unreachable!())
        });

        let trimmed = css.trim();
        if trimmed.is_empty() || trimmed == "none" {
            return Ok(Self::identity());
        }

        let mut result = Self::identity();
        let mut consumed = 0;
        for captures in PART.captures_iter(trimmed) {
            let whole = captures.get(0).map_or(0..0, |m| m.range());
            if whole.start != consumed {
                return Err(TransformParseError::UnexpectedInput(
                    trimmed[consumed..whole.start].to_owned(),
                )
                .into());
            }
            consumed = whole.end;

            let action = captures[1].to_lowercase();
            let args = parse_css_arguments(&captures[2])?;
            let current = css_action_matrix(&action, &args)?;
            result = result.right_mul(&current);
        }
        if consumed != trimmed.len() {
            return Err(TransformParseError::UnexpectedInput(trimmed[consumed..].to_owned()).into());
        }

        debug!(css = trimmed, "parsed transform");
        Ok(result)
    }
}

impl Default for Mat33 {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for Mat33 {
    fn eq(&self, other: &Self) -> bool {
        self.m == other.m
    }
}

impl From<Matrix3<f64>> for Mat33 {
    fn from(m: Matrix3<f64>) -> Self {
        Self::from_matrix(m)
    }
}

impl From<&Mat33> for Matrix3<f64> {
    fn from(m: &Mat33) -> Self {
        m.m
    }
}

impl fmt::Display for Mat33 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = (0..3)
            .map(|i| {
                let r = self.get_row(i);
                format!("{}, {}, {}", r.x, r.y, r.z)
            })
            .collect::<Vec<_>>();
        write!(f, "⎡ {} ⎤\n⎢ {} ⎥\n⎣ {} ⎦", rows[0], rows[1], rows[2])
    }
}

/// Gauss-Jordan elimination on an augmented `[m | I]` pair.
///
/// Returns `None` when no usable pivot exists for some column.
fn gauss_jordan_inverse(m: &Matrix3<f64>) -> Option<Matrix3<f64>> {
    let mut work = *m;
    let mut result = Matrix3::<f64>::identity();

    for col in 0..3 {
        if work[(col, col)].abs() < INVERSE_PIVOT_THRESHOLD {
            let swap_with = (col + 1..3).find(|&row| work[(row, col)].abs() >= INVERSE_PIVOT_THRESHOLD)?;
            work.swap_rows(col, swap_with);
            result.swap_rows(col, swap_with);
        }

        let pivot = work[(col, col)];
        work.row_mut(col).scale_mut(1.0 / pivot);
        result.row_mut(col).scale_mut(1.0 / pivot);

        for row in 0..3 {
            if row == col {
                continue;
            }
            let factor = work[(row, col)];
            if factor == 0.0 {
                continue;
            }
            let work_pivot_row = work.row(col).into_owned();
            let result_pivot_row = result.row(col).into_owned();
            let mut work_row = work.row_mut(row);
            work_row -= work_pivot_row * factor;
            let mut result_row = result.row_mut(row);
            result_row -= result_pivot_row * factor;
        }
    }

    Some(result)
}

/// Splits a CSS argument list on commas/whitespace and reads each number,
/// converting angle units to radians.
fn parse_css_arguments(text: &str) -> Result<Vec<f64>, TransformParseError> {
    static ARG: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)(px|deg|rad|turn)?$")
            .unwrap_or_else(|_| unreachable!())
    });

    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let captures = ARG
                .captures(part)
                .ok_or_else(|| TransformParseError::InvalidNumber(part.to_owned()))?;
            let value: f64 = captures[1]
                .parse()
                .map_err(|_| TransformParseError::InvalidNumber(part.to_owned()))?;
            Ok(match captures.get(2).map(|m| m.as_str()) {
                Some("deg") => value.to_radians(),
                Some("turn") => value * std::f64::consts::TAU,
                _ => value,
            })
        })
        .collect()
}

fn css_action_matrix(action: &str, args: &[f64]) -> Result<Mat33, TransformParseError> {
    let count_error = || TransformParseError::ArgumentCount {
        action: action.to_owned(),
        count: args.len(),
    };

    match action {
        "matrix" => match *args {
            [a, b, c, d, e, f] => Ok(Mat33::new(a, c, e, b, d, f, 0.0, 0.0, 1.0)),
            _ => Err(count_error()),
        },
        "scale" => match *args {
            [s] => Ok(Mat33::uniform_scaling_2d(s, Vec3::ZERO)),
            [sx, sy] => Ok(Mat33::scaling_2d(vec2(sx, sy), Vec3::ZERO)),
            _ => Err(count_error()),
        },
        "translate" => match *args {
            [x] => Ok(Mat33::translation(vec2(x, 0.0))),
            [x, y] => Ok(Mat33::translation(vec2(x, y))),
            _ => Err(count_error()),
        },
        "rotate" => match *args {
            [angle] => Ok(Mat33::z_rotation(angle, Vec3::ZERO)),
            _ => Err(count_error()),
        },
        _ => Err(TransformParseError::UnsupportedAction(action.to_owned())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::InkgeoError;

    fn invertible_samples() -> Vec<Mat33> {
        vec![
            Mat33::identity(),
            Mat33::new(1.0, 2.0, 3.0, 0.0, 1.0, 4.0, 5.0, 6.0, 0.0),
            Mat33::new(0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            Mat33::z_rotation(0.3, vec2(4.0, -2.0)),
            Mat33::scaling_2d(vec2(2.0, 0.25), vec2(1.0, 1.0)),
            Mat33::translation(vec2(100.0, -40.0)).right_mul(&Mat33::z_rotation(-1.1, Vec3::ZERO)),
        ]
    }

    #[test]
    fn inverse_round_trips_to_identity() {
        let identity = Mat33::identity();
        for m in invertible_samples() {
            assert!(m.invertable(), "{m}");
            let inv = m.inverse();
            assert!(inv.right_mul(&m).fuzzy_eq(&identity, 0.01), "{m}");
            assert!(m.right_mul(&inv).fuzzy_eq(&identity, 0.01), "{m}");
        }
    }

    #[test]
    fn singular_inverse_is_identity() {
        let singular = [
            Mat33::new(1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 0.0, 1.0),
            Mat33::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            Mat33::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0),
        ];
        for m in singular {
            assert!(!m.invertable(), "{m}");
            assert!(m.inverse().is_identity());
        }
    }

    #[test]
    fn inverse_needs_row_swap() {
        // First pivot is zero; elimination must swap rows.
        let m = Mat33::new(0.0, 2.0, 0.0, 3.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let inv = m.inverse();
        assert!(inv.fuzzy_eq(
            &Mat33::new(0.0, 1.0 / 3.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.0, 1.0),
            1e-12
        ));
    }

    #[test]
    fn rotation_by_quarter_turn() {
        let p = Mat33::z_rotation(PI / 2.0, Vec3::ZERO).transform_vec2(vec2(1.0, 0.0));
        assert!(p.fuzzy_eq(vec2(0.0, 1.0), 1e-12), "{p}");
    }

    #[test]
    fn rotation_about_center_fixes_center() {
        let center = vec2(3.0, 5.0);
        let m = Mat33::z_rotation(1.234, center);
        assert!(m.transform_vec2(center).fuzzy_eq(center, 1e-12));
    }

    #[test]
    fn translation_only_affects_points() {
        let m = Mat33::translation(vec2(5.0, -1.0));
        assert!(m.transform_vec2(vec2(1.0, 1.0)).fuzzy_eq(vec2(6.0, 0.0), 0.0));
        assert!(m
            .transform_vec3(Vec3::new(1.0, 1.0, 0.0))
            .fuzzy_eq(Vec3::new(1.0, 1.0, 0.0), 0.0));
    }

    #[test]
    fn scaling_about_center() {
        let m = Mat33::uniform_scaling_2d(2.0, vec2(1.0, 1.0));
        assert!(m.transform_vec2(vec2(2.0, 2.0)).fuzzy_eq(vec2(3.0, 3.0), 1e-12));
        assert!(m.transform_vec2(vec2(1.0, 1.0)).fuzzy_eq(vec2(1.0, 1.0), 1e-12));
    }

    #[test]
    fn rows_columns_and_transpose() {
        let m = Mat33::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        assert_eq!(m.get_row(1), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(m.get_column(1), Vec3::new(2.0, 5.0, 8.0));
        assert_eq!(m.transposed().get_row(0), Vec3::new(1.0, 4.0, 7.0));
        assert_eq!(m.to_array()[5], 6.0);
    }

    // ── CSS parsing tests ──

    #[test]
    fn css_matrix_matches_constructor() {
        let m = Mat33::from_css_matrix("matrix(1, 2, 3, 4, 5, 6)").unwrap();
        assert!(m.fuzzy_eq(&Mat33::new(1.0, 3.0, 5.0, 2.0, 4.0, 6.0, 0.0, 0.0, 1.0), 0.0));
        let back = Mat33::from_css_matrix(&m.to_css_matrix()).unwrap();
        assert!(back.fuzzy_eq(&m, 1e-12));
    }

    #[test]
    fn css_composes_left_to_right() {
        let m = Mat33::from_css_matrix("translate(10px, 0) scale(2)").unwrap();
        let expected = Mat33::translation(vec2(10.0, 0.0))
            .right_mul(&Mat33::uniform_scaling_2d(2.0, Vec3::ZERO));
        assert!(m.fuzzy_eq(&expected, 1e-12));
        assert!(m.transform_vec2(vec2(1.0, 1.0)).fuzzy_eq(vec2(12.0, 2.0), 1e-12));
    }

    #[test]
    fn css_rotate_units() {
        let m = Mat33::from_css_matrix("rotate(90deg)").unwrap();
        assert!(m.transform_vec2(vec2(1.0, 0.0)).fuzzy_eq(vec2(0.0, 1.0), 1e-12));
        let m = Mat33::from_css_matrix("rotate(0.5turn)").unwrap();
        assert!(m.transform_vec2(vec2(1.0, 0.0)).fuzzy_eq(vec2(-1.0, 0.0), 1e-12));
    }

    #[test]
    fn css_none_and_empty_are_identity() {
        assert!(Mat33::from_css_matrix("").unwrap().is_identity());
        assert!(Mat33::from_css_matrix("none").unwrap().is_identity());
    }

    #[test]
    fn css_errors() {
        assert!(matches!(
            Mat33::from_css_matrix("skew(3)"),
            Err(InkgeoError::TransformParse(TransformParseError::UnsupportedAction(_)))
        ));
        assert!(matches!(
            Mat33::from_css_matrix("matrix(1, 2)"),
            Err(InkgeoError::TransformParse(TransformParseError::ArgumentCount { .. }))
        ));
        assert!(matches!(
            Mat33::from_css_matrix("scale(abc)"),
            Err(InkgeoError::TransformParse(TransformParseError::InvalidNumber(_)))
        ));
        assert!(matches!(
            Mat33::from_css_matrix("scale(2) garbage"),
            Err(InkgeoError::TransformParse(TransformParseError::UnexpectedInput(_)))
        ));
    }
}
