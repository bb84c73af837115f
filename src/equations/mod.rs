//! Target equations for manufactured-solution problems.
//!
//! Every problem solved here is a scalar advection–diffusion balance
//!
//! ∂u/∂t + ∇·f(u) − D Δu = g
//!
//! where f is an advective flux (linear or Burgers-type), D ≥ 0 a constant
//! diffusion coefficient and g the manufactured source. For smooth u the
//! divergence expands to f'(u)·∇u, which is what the source generator uses.

mod advection;
mod burgers;

pub use advection::LinearAdvection;
pub use burgers::Burgers;

use crate::types::dot;

/// Capability set of an advective flux function.
///
/// A flux has to provide both f(u) and its derivative f'(u): the interface
/// flux needs the former, the wave-speed estimate and the analytic source
/// need the latter.
pub trait AdvectiveFlux: Send + Sync {
    /// Physical flux vector f(u).
    fn flux(&self, u: f64) -> [f64; 2];

    /// Derivative f'(u) (characteristic velocity).
    fn flux_derivative(&self, u: f64) -> [f64; 2];

    /// Maximum absolute wave speed |f'(u)| used for CFL estimates.
    fn max_wave_speed(&self, u: f64) -> f64 {
        let d = self.flux_derivative(u);
        dot(d, d).sqrt()
    }

    /// Whether f is linear in u.
    fn is_linear(&self) -> bool;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Enum wrapper for the built-in flux functions.
///
/// Gives static dispatch where the flux type is picked from configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AdvectionModel {
    /// f(u) = a u
    Linear(LinearAdvection),
    /// f(u) = d u²/2
    Burgers(Burgers),
}

impl AdvectiveFlux for AdvectionModel {
    #[inline]
    fn flux(&self, u: f64) -> [f64; 2] {
        match self {
            AdvectionModel::Linear(f) => f.flux(u),
            AdvectionModel::Burgers(f) => f.flux(u),
        }
    }

    #[inline]
    fn flux_derivative(&self, u: f64) -> [f64; 2] {
        match self {
            AdvectionModel::Linear(f) => f.flux_derivative(u),
            AdvectionModel::Burgers(f) => f.flux_derivative(u),
        }
    }

    fn is_linear(&self) -> bool {
        matches!(self, AdvectionModel::Linear(_))
    }

    fn name(&self) -> &'static str {
        match self {
            AdvectionModel::Linear(f) => f.name(),
            AdvectionModel::Burgers(f) => f.name(),
        }
    }
}

impl From<LinearAdvection> for AdvectionModel {
    fn from(f: LinearAdvection) -> Self {
        AdvectionModel::Linear(f)
    }
}

impl From<Burgers> for AdvectionModel {
    fn from(f: Burgers) -> Self {
        AdvectionModel::Burgers(f)
    }
}

/// The strong-form operator a manufactured source has to balance.
///
/// L[u] = (∂u/∂t if transient) + f'(u)·∇u − D Δu
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetEquation {
    /// Advective flux, `None` for pure diffusion.
    pub advection: Option<AdvectionModel>,
    /// Diffusion coefficient D (0 disables diffusion).
    pub diffusion: f64,
    /// Whether the time derivative is part of the operator.
    pub transient: bool,
}

impl TargetEquation {
    /// Steady pure-diffusion equation −D Δu = g.
    pub fn diffusion(diffusion: f64) -> Self {
        Self {
            advection: None,
            diffusion,
            transient: false,
        }
    }

    /// Steady advection–diffusion equation.
    pub fn advection_diffusion(advection: impl Into<AdvectionModel>, diffusion: f64) -> Self {
        Self {
            advection: Some(advection.into()),
            diffusion,
            transient: false,
        }
    }

    /// Make the equation time dependent.
    pub fn with_transient(mut self, transient: bool) -> Self {
        self.transient = transient;
        self
    }

    /// Whether a Laplacian contribution is present.
    pub fn has_diffusion(&self) -> bool {
        self.diffusion != 0.0
    }

    /// Largest characteristic speed at state `u`.
    pub fn max_wave_speed(&self, u: f64) -> f64 {
        self.advection.map_or(0.0, |a| a.max_wave_speed(u))
    }

    /// Apply the operator given the pointwise derivatives of a field.
    ///
    /// # Arguments
    /// * `u` - field value
    /// * `u_t` - time derivative
    /// * `grad` - spatial gradient
    /// * `laplacian` - spatial Laplacian
    pub fn apply(&self, u: f64, u_t: f64, grad: [f64; 2], laplacian: f64) -> f64 {
        let mut residual = 0.0;
        if self.transient {
            residual += u_t;
        }
        if let Some(adv) = &self.advection {
            residual += dot(adv.flux_derivative(u), grad);
        }
        residual - self.diffusion * laplacian
    }
}
