//! Linear advection flux.
//!
//! f(u) = a u
//!
//! where a is a constant velocity vector. One-dimensional problems use
//! `a = [a_x, 0]`.

use super::AdvectiveFlux;

/// Linear advection with constant velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearAdvection {
    /// Advection velocity (a_x, a_y)
    pub velocity: [f64; 2],
}

impl LinearAdvection {
    /// Create a linear advection flux with the given velocity vector.
    pub fn new(velocity: [f64; 2]) -> Self {
        Self { velocity }
    }

    /// One-dimensional advection with speed `a`.
    pub fn one_d(a: f64) -> Self {
        Self::new([a, 0.0])
    }

    /// Velocity `base` rotated counter-clockwise by `angle` radians.
    pub fn rotated(base: [f64; 2], angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([c * base[0] - s * base[1], s * base[0] + c * base[1]])
    }
}

impl AdvectiveFlux for LinearAdvection {
    #[inline]
    fn flux(&self, u: f64) -> [f64; 2] {
        [self.velocity[0] * u, self.velocity[1] * u]
    }

    #[inline]
    fn flux_derivative(&self, _u: f64) -> [f64; 2] {
        self.velocity
    }

    fn is_linear(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "advection"
    }
}
