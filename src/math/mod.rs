pub mod color;
pub mod convex_hull;
pub mod mat33;
pub mod polynomial;
pub mod rounding;
pub mod vec3;

pub use color::Color4;
pub use convex_hull::convex_hull_2_of;
pub use mat33::Mat33;
pub use polynomial::{solve_cubic, solve_quadratic};
pub use vec3::{vec2, Point2, Vec2, Vec3};

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
