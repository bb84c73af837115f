//! Numerical flux functions.
//!
//! Interface fluxes for the advective part of the DG weak form:
//! - Central flux
//! - Blended Lax–Friedrichs flux (weight-controlled dissipation)
//! - Lax–Friedrichs with a state-dependent wave speed for nonlinear fluxes
//!
//! These are what the external solver evaluates for the advective
//! numerical-flux term; they are exposed here so that the term selection and
//! the flux evaluation share one definition.

mod scalar;
pub mod traits;

pub use scalar::{
    central_flux, lax_friedrichs_flux, linearized_lax_friedrichs_flux, normal_wave_speed,
};
pub use traits::{
    BoxedFlux, CentralFlux, FluxContext, LaxFriedrichsFlux, NonlinearLaxFriedrichsFlux,
    NumericalFlux, StandardFlux, create_flux,
};
