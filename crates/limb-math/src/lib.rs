//! Numeric building blocks for horizon geometry: tolerance constants, real
//! polynomial roots, the unit-circle quadratic vector expression, and bounding spheres.

mod bounding_sphere;
mod epsilon;
mod polynomial;
mod vector_expression;

pub use bounding_sphere::BoundingSphere;
pub use epsilon::*;
pub use polynomial::{cubic_real_roots, quadratic_real_roots, quartic_real_roots};
pub use vector_expression::quadratic_vector_expression;
