//! Burgers-type nonlinear flux.
//!
//! f(u) = d u² / 2
//!
//! with a fixed unit direction d. In 1D (d = [1, 0]) this is the inviscid
//! Burgers flux.

use super::AdvectiveFlux;
use crate::types::{norm, scale};

/// Burgers flux along a fixed direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burgers {
    /// Unit direction of the flux
    pub direction: [f64; 2],
}

impl Burgers {
    /// Create a Burgers flux along `direction` (normalized internally).
    ///
    /// A zero direction falls back to the x-axis.
    pub fn new(direction: [f64; 2]) -> Self {
        let n = norm(direction);
        let direction = if n < 1e-14 {
            [1.0, 0.0]
        } else {
            scale(direction, 1.0 / n)
        };
        Self { direction }
    }

    /// Classic one-dimensional Burgers flux u²/2.
    pub fn one_d() -> Self {
        Self::new([1.0, 0.0])
    }
}

impl AdvectiveFlux for Burgers {
    #[inline]
    fn flux(&self, u: f64) -> [f64; 2] {
        scale(self.direction, 0.5 * u * u)
    }

    #[inline]
    fn flux_derivative(&self, u: f64) -> [f64; 2] {
        scale(self.direction, u)
    }

    fn is_linear(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "burgers"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burgers_flux() {
        let b = Burgers::one_d();
        assert!((b.flux(3.0)[0] - 4.5).abs() < 1e-14);
        assert!((b.flux_derivative(3.0)[0] - 3.0).abs() < 1e-14);
    }

    #[test]
    fn test_direction_is_normalized() {
        let b = Burgers::new([3.0, 4.0]);
        assert!((norm(b.direction) - 1.0).abs() < 1e-14);
        assert!((b.max_wave_speed(2.0) - 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_derivative_matches_difference_quotient() {
        let b = Burgers::new([1.0, 1.0]);
        let u = 0.7;
        let eps = 1e-6;
        let fd = (b.flux(u + eps)[0] - b.flux(u - eps)[0]) / (2.0 * eps);
        assert!((fd - b.flux_derivative(u)[0]).abs() < 1e-8);
    }
}
