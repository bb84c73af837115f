//! Small strongly-typed building blocks shared across the crate.
//!
//! - [`Coords`]: a point in the physical domain. One-dimensional problems use
//!   the first component and leave the second at zero.
//! - [`GeometryTag`]: element-type tag persisted with every run (`"1_2"`,
//!   `"2_3"`, `"2_4"`), from which the spatial dimension is recovered.
//!
//! # Example
//!
//! ```
//! use dg_mms::types::{GeometryTag, dot};
//!
//! let gel: GeometryTag = "2_4".parse().unwrap();
//! assert_eq!(gel.dimension(), 2);
//! assert_eq!(gel.vertex_count(), 4);
//!
//! assert_eq!(dot([1.0, 2.0], [3.0, 4.0]), 11.0);
//! ```

mod geometry;

pub use geometry::GeometryTag;

/// A point in the physical domain.
pub type Coords = [f64; 2];

/// Dot product of two 2-vectors.
#[inline]
pub fn dot(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

/// Euclidean norm of a 2-vector.
#[inline]
pub fn norm(a: [f64; 2]) -> f64 {
    dot(a, a).sqrt()
}

/// Scale a 2-vector.
#[inline]
pub fn scale(a: [f64; 2], c: f64) -> [f64; 2] {
    [c * a[0], c * a[1]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_helpers() {
        assert!((norm([3.0, 4.0]) - 5.0).abs() < 1e-14);
        assert_eq!(scale([1.0, -2.0], 2.0), [2.0, -4.0]);
        assert_eq!(dot([1.0, 0.0], [0.0, 1.0]), 0.0);
    }
}
