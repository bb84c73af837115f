//! Scalar interface fluxes for DG advection terms.
//!
//! At an interface with outward unit normal n, interior state u⁻ and exterior
//! state u⁺, the fluxes below approximate f(u)·n:
//!
//! - central: F* = ½ (f(u⁻) + f(u⁺))·n
//! - blended Lax–Friedrichs:
//!   F* = ½ (f(u⁻) + f(u⁺))·n − (1 − w) ½ λ (u⁺ − u⁻)
//!
//! The blend weight w ∈ [0, 1] is the configured advective-flux weight:
//! w = 0 gives the full Lax–Friedrichs dissipation (upwind for linear
//! advection), w = 1 recovers the central flux. For the nonlinear flux λ is
//! the largest normal characteristic speed of the two states; the linearized
//! flux freezes it at the mean state.

use crate::equations::AdvectiveFlux;
use crate::types::dot;

/// Central flux F* = ½ (f(u⁻) + f(u⁺))·n.
///
/// # Arguments
/// * `flux` - Physical flux function
/// * `u_minus` - Interior value
/// * `u_plus` - Exterior value (neighbour or boundary trace)
/// * `normal` - Outward unit normal
pub fn central_flux<F: AdvectiveFlux + ?Sized>(
    flux: &F,
    u_minus: f64,
    u_plus: f64,
    normal: [f64; 2],
) -> f64 {
    0.5 * (dot(flux.flux(u_minus), normal) + dot(flux.flux(u_plus), normal))
}

/// Normal characteristic speed bound max(|f'(u⁻)·n|, |f'(u⁺)·n|).
pub fn normal_wave_speed<F: AdvectiveFlux + ?Sized>(
    flux: &F,
    u_minus: f64,
    u_plus: f64,
    normal: [f64; 2],
) -> f64 {
    let l_minus = dot(flux.flux_derivative(u_minus), normal).abs();
    let l_plus = dot(flux.flux_derivative(u_plus), normal).abs();
    l_minus.max(l_plus)
}

/// Blended Lax–Friedrichs flux.
///
/// Works for linear and nonlinear fluxes alike; for a linear flux λ is the
/// constant |a·n|.
///
/// # Arguments
/// * `flux` - Physical flux function
/// * `u_minus` - Interior value
/// * `u_plus` - Exterior value
/// * `normal` - Outward unit normal
/// * `weight` - Blend weight w (0 = full dissipation, 1 = central)
pub fn lax_friedrichs_flux<F: AdvectiveFlux + ?Sized>(
    flux: &F,
    u_minus: f64,
    u_plus: f64,
    normal: [f64; 2],
    weight: f64,
) -> f64 {
    let lambda = normal_wave_speed(flux, u_minus, u_plus, normal);
    central_flux(flux, u_minus, u_plus, normal) - (1.0 - weight) * 0.5 * lambda * (u_plus - u_minus)
}

/// Lax–Friedrichs flux with the wave speed frozen at the mean state.
///
/// λ = |f'(½ (u⁻ + u⁺))·n|, the constant |a·n| for linear advection.
pub fn linearized_lax_friedrichs_flux<F: AdvectiveFlux + ?Sized>(
    flux: &F,
    u_minus: f64,
    u_plus: f64,
    normal: [f64; 2],
    weight: f64,
) -> f64 {
    let lambda = dot(flux.flux_derivative(0.5 * (u_minus + u_plus)), normal).abs();
    central_flux(flux, u_minus, u_plus, normal) - (1.0 - weight) * 0.5 * lambda * (u_plus - u_minus)
}
