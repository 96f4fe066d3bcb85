use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Neg, Sub};

use nalgebra::Vector3;

/// Default tolerance for [`Vec3::fuzzy_eq`].
pub const DEFAULT_VEC_TOLERANCE: f64 = 1e-10;

/// A three-component vector backed by [`nalgebra::Vector3`].
///
/// Doubles as a 2D vector or point when `z == 0`. Every operation returns a
/// new value; nothing mutates in place. Components read through `Deref`, so
/// `v.x`, `v.y` and `v.z` work as on the nalgebra type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3(Vector3<f64>);

/// A 2D vector (`z == 0`).
pub type Vec2 = Vec3;

/// A 2D point (`z == 0`).
pub type Point2 = Vec3;

/// Shorthand for a planar vector or point.
#[must_use]
pub const fn vec2(x: f64, y: f64) -> Vec2 {
    Vec3::new(x, y, 0.0)
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a vector from its three components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// Returns this vector with `z` dropped to zero.
    #[must_use]
    pub fn xy(&self) -> Vec2 {
        vec2(self.x, self.y)
    }

    /// Component by index (`0 => x`, `1 => y`, anything else `=> z`).
    #[must_use]
    pub fn at(&self, index: usize) -> f64 {
        self.0[index.min(2)]
    }

    #[must_use]
    pub fn plus(&self, other: Self) -> Self {
        *self + other
    }

    #[must_use]
    pub fn minus(&self, other: Self) -> Self {
        *self - other
    }

    #[must_use]
    pub fn times(&self, scalar: f64) -> Self {
        *self * scalar
    }

    /// Component-wise product.
    #[must_use]
    pub fn scale(&self, other: Self) -> Self {
        Self(self.0.component_mul(&other.0))
    }

    #[must_use]
    pub fn dot(&self, other: Self) -> f64 {
        self.0.dot(&other.0)
    }

    /// 3D cross product.
    ///
    /// For two planar vectors only `z` is non-zero and equals the 2D
    /// determinant `a.x * b.y - a.y * b.x`.
    #[must_use]
    pub fn cross(&self, other: Self) -> Self {
        Self(self.0.cross(&other.0))
    }

    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.0.norm()
    }

    /// Alias of [`Vec3::magnitude`].
    #[must_use]
    pub fn length(&self) -> f64 {
        self.magnitude()
    }

    #[must_use]
    pub fn magnitude_squared(&self) -> f64 {
        self.0.norm_squared()
    }

    /// Largest absolute component.
    #[must_use]
    pub fn maximum_entry_magnitude(&self) -> f64 {
        self.0.amax()
    }

    #[must_use]
    pub fn distance_to(&self, other: Self) -> f64 {
        (self.0 - other.0).norm()
    }

    #[must_use]
    pub fn square_distance_to(&self, other: Self) -> f64 {
        (self.0 - other.0).norm_squared()
    }

    /// Counter-clockwise angle from the x-axis, `atan2(y, x)`, in `(-π, π]`.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Unit vector in the same direction. The zero vector yields NaN components.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self(self.0.normalize())
    }

    /// Like [`Vec3::normalized`], but the zero vector maps to itself.
    #[must_use]
    pub fn normalized_or_zero(&self) -> Self {
        self.0.try_normalize(0.0).map_or(Self::ZERO, Self)
    }

    /// A unit vector perpendicular to this one.
    ///
    /// Planar vectors rotate a quarter turn counter-clockwise. Vectors along
    /// the z-axis (including zero) give an arbitrary unit vector, never NaN.
    #[must_use]
    pub fn orthog(&self) -> Self {
        if self.x == 0.0 && self.y == 0.0 {
            if self.z == 0.0 {
                return Self::UNIT_X;
            }
            return self.cross(Self::UNIT_X).normalized();
        }
        self.cross(-Self::UNIT_Z).normalized()
    }

    /// Moves `distance` units from this point towards `direction`.
    #[must_use]
    pub fn extend(&self, distance: f64, direction: Self) -> Self {
        *self + direction.normalized() * distance
    }

    /// Linear interpolation: `self` at `fraction == 0`, `target` at `fraction == 1`.
    #[must_use]
    pub fn lerp(&self, target: Self, fraction: f64) -> Self {
        Self(self.0.lerp(&target.0, fraction))
    }

    /// Combines corresponding components with `f`.
    #[must_use]
    pub fn zip(&self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self(self.0.zip_map(&other.0, f))
    }

    /// Applies `f` to each component.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.map(f))
    }

    #[must_use]
    pub fn as_array(&self) -> [f64; 3] {
        self.0.into()
    }

    /// True if every component differs from `other`'s by at most `tolerance`.
    #[must_use]
    pub fn fuzzy_eq(&self, other: Self, tolerance: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Deref for Vec3 {
    type Target = Vector3<f64>;

    fn deref(&self) -> &Vector3<f64> {
        &self.0
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl From<Vector3<f64>> for Vec3 {
    fn from(v: Vector3<f64>) -> Self {
        Self(v)
    }
}

impl From<Vec3> for Vector3<f64> {
    fn from(v: Vec3) -> Self {
        v.0
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vec({}, {}, {})", self.x, self.y, self.z)
    }
}
