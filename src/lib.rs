pub mod error;
pub mod geometry;
pub mod math;
pub mod path;

pub use error::{InkgeoError, Result};
pub use path::{Path, PathCommand};
