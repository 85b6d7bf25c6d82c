mod vector;
mod transform;
mod segment;

pub use vector::Vector2;
pub use transform::Transform2;
pub use segment::{closest_segment_point, distance_to_line};

/// Scalar type used throughout the solver.
///
/// Sub-stepped XPBD divides compliance by `sub_dt^2`, which underflows
/// quickly in single precision, so the solver works in `f64`.
pub type Real = f64;

/// Constant for a very small number, used for comparisons
pub const EPSILON: Real = 1.0e-9;
