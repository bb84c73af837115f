//! Trait-based numerical flux abstraction.
//!
//! The [`FluxKind`] chosen in a scheme selection maps onto a concrete
//! interface flux here, either through the zero-cost [`StandardFlux`] enum or
//! through a boxed trait object when the choice is only known at runtime.
//!
//! # Example
//! ```
//! use dg_mms::equations::{AdvectionModel, LinearAdvection};
//! use dg_mms::flux::{FluxContext, NumericalFlux, StandardFlux};
//!
//! let model: AdvectionModel = LinearAdvection::one_d(1.0).into();
//! let ctx = FluxContext::new([1.0, 0.0], 0.0);
//!
//! let f = StandardFlux::LaxFriedrichs.compute(&model, 2.0, 3.0, &ctx);
//! assert!((f - 2.0).abs() < 1e-14);
//! ```

use super::scalar::{central_flux, lax_friedrichs_flux, linearized_lax_friedrichs_flux};
use crate::equations::AdvectionModel;
use crate::weak_form::FluxKind;

// =============================================================================
// Flux Context
// =============================================================================

/// Geometric and scheme data needed to evaluate an interface flux.
#[derive(Clone, Copy, Debug)]
pub struct FluxContext {
    /// Outward unit normal.
    pub normal: [f64; 2],
    /// Advective-flux blend weight w ∈ [0, 1].
    pub weight: f64,
}

impl FluxContext {
    /// Create a new flux context.
    #[inline]
    pub fn new(normal: [f64; 2], weight: f64) -> Self {
        Self { normal, weight }
    }
}

// =============================================================================
// Numerical Flux Trait
// =============================================================================

/// A numerical flux F*(u⁻, u⁺; n) for scalar advection.
///
/// Implementations should be consistent (F*(u, u) = f(u)·n) and conservative
/// (F*(u⁻, u⁺; n) = −F*(u⁺, u⁻; −n)).
pub trait NumericalFlux: Send + Sync {
    /// Compute the numerical flux at an interface.
    fn compute(&self, model: &AdvectionModel, u_minus: f64, u_plus: f64, ctx: &FluxContext)
    -> f64;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Whether the flux adds upwind-type dissipation.
    fn is_dissipative(&self) -> bool {
        true
    }

    /// Whether the flux is only meaningful with a nonlinear physical flux.
    fn requires_nonlinear(&self) -> bool {
        false
    }
}

// =============================================================================
// Concrete Fluxes
// =============================================================================

/// Central (average) flux. No dissipation.
#[derive(Clone, Copy, Debug, Default)]
pub struct CentralFlux;

impl NumericalFlux for CentralFlux {
    #[inline]
    fn compute(
        &self,
        model: &AdvectionModel,
        u_minus: f64,
        u_plus: f64,
        ctx: &FluxContext,
    ) -> f64 {
        central_flux(model, u_minus, u_plus, ctx.normal)
    }

    fn name(&self) -> &'static str {
        "central"
    }

    fn is_dissipative(&self) -> bool {
        false
    }
}

/// Blended Lax–Friedrichs flux for linear advection.
///
/// The dissipation uses a single wave speed |f'(ū)·n| at the mean state,
/// which is the constant |a·n| when f is linear.
#[derive(Clone, Copy, Debug, Default)]
pub struct LaxFriedrichsFlux;

impl NumericalFlux for LaxFriedrichsFlux {
    #[inline]
    fn compute(
        &self,
        model: &AdvectionModel,
        u_minus: f64,
        u_plus: f64,
        ctx: &FluxContext,
    ) -> f64 {
        linearized_lax_friedrichs_flux(model, u_minus, u_plus, ctx.normal, ctx.weight)
    }

    fn name(&self) -> &'static str {
        "lax_friedrichs"
    }
}

/// Lax–Friedrichs flux with a state-dependent wave speed, for nonlinear f.
#[derive(Clone, Copy, Debug, Default)]
pub struct NonlinearLaxFriedrichsFlux;

impl NumericalFlux for NonlinearLaxFriedrichsFlux {
    #[inline]
    fn compute(
        &self,
        model: &AdvectionModel,
        u_minus: f64,
        u_plus: f64,
        ctx: &FluxContext,
    ) -> f64 {
        lax_friedrichs_flux(model, u_minus, u_plus, ctx.normal, ctx.weight)
    }

    fn name(&self) -> &'static str {
        "nonlinear"
    }

    fn requires_nonlinear(&self) -> bool {
        true
    }
}

// =============================================================================
// Standard Flux Enum (Zero-Cost Dispatch)
// =============================================================================

/// Enum wrapper for the built-in interface fluxes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StandardFlux {
    /// Average of the two physical fluxes
    Central,
    /// Blended Lax–Friedrichs
    #[default]
    LaxFriedrichs,
    /// Lax–Friedrichs with nonlinear wave speed
    Nonlinear,
}

impl NumericalFlux for StandardFlux {
    #[inline]
    fn compute(
        &self,
        model: &AdvectionModel,
        u_minus: f64,
        u_plus: f64,
        ctx: &FluxContext,
    ) -> f64 {
        match self {
            StandardFlux::Central => CentralFlux.compute(model, u_minus, u_plus, ctx),
            StandardFlux::LaxFriedrichs => LaxFriedrichsFlux.compute(model, u_minus, u_plus, ctx),
            StandardFlux::Nonlinear => {
                NonlinearLaxFriedrichsFlux.compute(model, u_minus, u_plus, ctx)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            StandardFlux::Central => "central",
            StandardFlux::LaxFriedrichs => "lax_friedrichs",
            StandardFlux::Nonlinear => "nonlinear",
        }
    }

    fn is_dissipative(&self) -> bool {
        !matches!(self, StandardFlux::Central)
    }

    fn requires_nonlinear(&self) -> bool {
        matches!(self, StandardFlux::Nonlinear)
    }
}

impl From<FluxKind> for StandardFlux {
    fn from(kind: FluxKind) -> Self {
        match kind {
            FluxKind::Central => StandardFlux::Central,
            FluxKind::LaxFriedrichs => StandardFlux::LaxFriedrichs,
            FluxKind::Nonlinear => StandardFlux::Nonlinear,
        }
    }
}

impl From<StandardFlux> for FluxKind {
    fn from(flux: StandardFlux) -> Self {
        match flux {
            StandardFlux::Central => FluxKind::Central,
            StandardFlux::LaxFriedrichs => FluxKind::LaxFriedrichs,
            StandardFlux::Nonlinear => FluxKind::Nonlinear,
        }
    }
}

// =============================================================================
// Boxed Flux (Runtime Polymorphism)
// =============================================================================

/// Boxed flux for runtime selection.
pub type BoxedFlux = Box<dyn NumericalFlux>;

/// Create a boxed flux from a flux kind.
pub fn create_flux(kind: FluxKind) -> BoxedFlux {
    match kind {
        FluxKind::Central => Box::new(CentralFlux),
        FluxKind::LaxFriedrichs => Box::new(LaxFriedrichsFlux),
        FluxKind::Nonlinear => Box::new(NonlinearLaxFriedrichsFlux),
    }
}
