//! Closed-form manufactured profiles.
//!
//! Every profile provides its value together with the analytic gradient,
//! time derivative and Laplacian, so that the source term can be assembled
//! from exact derivatives for any [`TargetEquation`].
//!
//! | Profile | u(x, t) | Parameter domain |
//! |---------|---------|------------------|
//! | [`SineWave`] | e^{−λt} sin(ω·(x − a t)) | any |
//! | [`TanhFront`] | 1 − tanh((x − x₀ − c t) / 2ε) | ε > 0 |
//! | [`ArctanLayer`] | −atan(φ / √ε) | ε > 0 |
//! | [`ExponentialLayer`] | −xy + x + y + (e^{−(x−1)(y−1)/ε} − e^{−1/ε}) / (e^{−1/ε} − 1) | ε > 0 |

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::equations::TargetEquation;
use crate::error::{Result, VerificationError};
use crate::types::{Coords, dot, scale};

/// A closed-form scalar field u(x, t).
pub trait AnalyticProfile: Send + Sync + fmt::Debug {
    /// Profile family.
    fn kind(&self) -> ProfileKind;

    /// Value u(x, t).
    fn value(&self, x: Coords, t: f64) -> Result<f64>;

    /// Spatial gradient ∇u(x, t).
    fn gradient(&self, x: Coords, t: f64) -> Result<[f64; 2]>;

    /// Time derivative ∂u/∂t.
    fn time_derivative(&self, x: Coords, t: f64) -> Result<f64>;

    /// Spatial Laplacian Δu.
    fn laplacian(&self, x: Coords, t: f64) -> Result<f64>;

    /// Strong-form operator of `equation` applied to this profile.
    ///
    /// All derivatives are analytic.
    fn source(&self, equation: &TargetEquation, x: Coords, t: f64) -> Result<f64> {
        let u = self.value(x, t)?;
        let u_t = if equation.transient {
            self.time_derivative(x, t)?
        } else {
            0.0
        };
        let grad = self.gradient(x, t)?;
        let laplacian = if equation.has_diffusion() {
            self.laplacian(x, t)?
        } else {
            0.0
        };
        Ok(equation.apply(u, u_t, grad, laplacian))
    }

    /// Configuration name.
    fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Layer profiles are undefined for a non-positive width.
fn require_positive_width(kind: ProfileKind, epsilon: f64) -> Result<()> {
    if epsilon > 0.0 && epsilon.is_finite() {
        Ok(())
    } else {
        Err(VerificationError::domain(format!(
            "profile '{}' requires a positive layer width, got {epsilon}",
            kind.name()
        )))
    }
}

// =============================================================================
// Sine wave
// =============================================================================

/// Decaying travelling sine wave u = e^{−λt} sin(ω·(x − a t)).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SineWave {
    /// Wave vector ω
    pub wave_vector: [f64; 2],
    /// Transport velocity a
    pub velocity: [f64; 2],
    /// Decay rate λ
    pub decay: f64,
}

impl SineWave {
    /// Stationary wave sin(ω·x).
    pub fn new(wave_vector: [f64; 2]) -> Self {
        Self {
            wave_vector,
            velocity: [0.0, 0.0],
            decay: 0.0,
        }
    }

    /// Translate the wave with velocity `a`.
    pub fn with_velocity(mut self, velocity: [f64; 2]) -> Self {
        self.velocity = velocity;
        self
    }

    /// Damp the wave with rate λ.
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// sin(2πx), steady 1D diffusion.
    pub fn diffusion_1d() -> Self {
        Self::new([2.0 * PI, 0.0])
    }

    /// e^{−t} sin(x), the decaying heat-equation mode for D = 1.
    pub fn heat_mode() -> Self {
        Self::new([1.0, 0.0]).with_decay(1.0)
    }

    /// sin(π(x − 2y)).
    pub fn oblique() -> Self {
        Self::new([PI, -2.0 * PI])
    }

    #[inline]
    fn phase(&self, x: Coords, t: f64) -> f64 {
        let shifted = [x[0] - self.velocity[0] * t, x[1] - self.velocity[1] * t];
        dot(self.wave_vector, shifted)
    }

    #[inline]
    fn envelope(&self, t: f64) -> f64 {
        (-self.decay * t).exp()
    }
}

impl AnalyticProfile for SineWave {
    fn kind(&self) -> ProfileKind {
        ProfileKind::SineWave
    }

    fn value(&self, x: Coords, t: f64) -> Result<f64> {
        Ok(self.envelope(t) * self.phase(x, t).sin())
    }

    fn gradient(&self, x: Coords, t: f64) -> Result<[f64; 2]> {
        let c = self.envelope(t) * self.phase(x, t).cos();
        Ok(scale(self.wave_vector, c))
    }

    fn time_derivative(&self, x: Coords, t: f64) -> Result<f64> {
        let theta = self.phase(x, t);
        let e = self.envelope(t);
        let omega_a = dot(self.wave_vector, self.velocity);
        Ok(-self.decay * e * theta.sin() - e * theta.cos() * omega_a)
    }

    fn laplacian(&self, x: Coords, t: f64) -> Result<f64> {
        let k2 = dot(self.wave_vector, self.wave_vector);
        Ok(-k2 * self.envelope(t) * self.phase(x, t).sin())
    }
}

// =============================================================================
// Smoothed step
// =============================================================================

/// Smoothed step travelling along x: u = 1 − tanh((x − x₀ − c t) / 2ε).
///
/// With c = 1 and x₀ = −½ this is the exact travelling front of viscous
/// Burgers u_t + u u_x = ε u_xx.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TanhFront {
    /// Front width ε
    pub epsilon: f64,
    /// Front speed c
    pub speed: f64,
    /// Front position at t = 0
    pub offset: f64,
}

impl TanhFront {
    /// Create a front.
    pub fn new(epsilon: f64, speed: f64, offset: f64) -> Self {
        Self {
            epsilon,
            speed,
            offset,
        }
    }

    /// Viscous Burgers front for viscosity ε.
    pub fn burgers(epsilon: f64) -> Self {
        Self::new(epsilon, 1.0, -0.5)
    }

    /// tanh(s) at the point, after the width check.
    fn tanh(&self, x: Coords, t: f64) -> Result<f64> {
        require_positive_width(ProfileKind::TanhFront, self.epsilon)?;
        let s = (x[0] - self.offset - self.speed * t) / (2.0 * self.epsilon);
        Ok(s.tanh())
    }
}

impl AnalyticProfile for TanhFront {
    fn kind(&self) -> ProfileKind {
        ProfileKind::TanhFront
    }

    fn value(&self, x: Coords, t: f64) -> Result<f64> {
        Ok(1.0 - self.tanh(x, t)?)
    }

    fn gradient(&self, x: Coords, t: f64) -> Result<[f64; 2]> {
        let th = self.tanh(x, t)?;
        let sech2 = 1.0 - th * th;
        Ok([-sech2 / (2.0 * self.epsilon), 0.0])
    }

    fn time_derivative(&self, x: Coords, t: f64) -> Result<f64> {
        let th = self.tanh(x, t)?;
        let sech2 = 1.0 - th * th;
        Ok(sech2 * self.speed / (2.0 * self.epsilon))
    }

    fn laplacian(&self, x: Coords, t: f64) -> Result<f64> {
        let th = self.tanh(x, t)?;
        let sech2 = 1.0 - th * th;
        Ok(th * sech2 / (2.0 * self.epsilon * self.epsilon))
    }
}

// =============================================================================
// Internal arctangent layer
// =============================================================================

/// Circular internal layer on the unit square.
///
/// u = −atan(φ / √ε), φ = ((2x − 1)² + (2y − 1)²) / 4 − 1/16
///
/// The layer sits on the circle of radius ¼ around (½, ½).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArctanLayer {
    /// Layer width ε
    pub epsilon: f64,
}

impl ArctanLayer {
    /// Create a layer of width ε.
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// φ, ∇φ, and 1/√ε.
    fn level(&self, x: Coords) -> Result<(f64, [f64; 2], f64)> {
        require_positive_width(ProfileKind::ArctanLayer, self.epsilon)?;
        let gx = 2.0 * x[0] - 1.0;
        let gy = 2.0 * x[1] - 1.0;
        let phi = (gx * gx + gy * gy) / 4.0 - 1.0 / 16.0;
        Ok((phi, [gx, gy], 1.0 / self.epsilon.sqrt()))
    }
}

impl AnalyticProfile for ArctanLayer {
    fn kind(&self) -> ProfileKind {
        ProfileKind::ArctanLayer
    }

    fn value(&self, x: Coords, _t: f64) -> Result<f64> {
        let (phi, _, inv_r) = self.level(x)?;
        Ok(-(phi * inv_r).atan())
    }

    fn gradient(&self, x: Coords, _t: f64) -> Result<[f64; 2]> {
        let (phi, grad_phi, inv_r) = self.level(x)?;
        let z = phi * inv_r;
        Ok(scale(grad_phi, -inv_r / (1.0 + z * z)))
    }

    fn time_derivative(&self, _x: Coords, _t: f64) -> Result<f64> {
        require_positive_width(ProfileKind::ArctanLayer, self.epsilon)?;
        Ok(0.0)
    }

    fn laplacian(&self, x: Coords, _t: f64) -> Result<f64> {
        let (phi, grad_phi, inv_r) = self.level(x)?;
        let z = phi * inv_r;
        let q = 1.0 + z * z;
        // Δφ = 4
        let g = inv_r / q;
        Ok(-4.0 * g + 2.0 * z * dot(grad_phi, grad_phi) * inv_r * inv_r / (q * q))
    }
}

// =============================================================================
// Exponential corner layer
// =============================================================================

/// Exponential boundary layer at the (1, 1) corner of the unit square.
///
/// u = −xy + x + y + (e^{−(x−1)(y−1)/ε} − e^{−1/ε}) / (e^{−1/ε} − 1)
///
/// Vanishes on x = 1 and y = 1; designed for advection with a = (1, 1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExponentialLayer {
    /// Layer width ε
    pub epsilon: f64,
}

impl ExponentialLayer {
    /// Create a layer of width ε.
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// (E, K) with E = e^{−(x−1)(y−1)/ε}, K = 1 / (e^{−1/ε} − 1).
    fn layer(&self, x: Coords) -> Result<(f64, f64)> {
        require_positive_width(ProfileKind::ExponentialLayer, self.epsilon)?;
        let eps = self.epsilon;
        let e = (-(x[0] - 1.0) * (x[1] - 1.0) / eps).exp();
        let k = 1.0 / ((-1.0 / eps).exp() - 1.0);
        Ok((e, k))
    }
}

impl AnalyticProfile for ExponentialLayer {
    fn kind(&self) -> ProfileKind {
        ProfileKind::ExponentialLayer
    }

    fn value(&self, x: Coords, _t: f64) -> Result<f64> {
        let (e, k) = self.layer(x)?;
        let floor = (-1.0 / self.epsilon).exp();
        Ok(-x[0] * x[1] + x[0] + x[1] + (e - floor) * k)
    }

    fn gradient(&self, x: Coords, _t: f64) -> Result<[f64; 2]> {
        let (e, k) = self.layer(x)?;
        let eps = self.epsilon;
        Ok([
            1.0 - x[1] - k * e * (x[1] - 1.0) / eps,
            1.0 - x[0] - k * e * (x[0] - 1.0) / eps,
        ])
    }

    fn time_derivative(&self, _x: Coords, _t: f64) -> Result<f64> {
        require_positive_width(ProfileKind::ExponentialLayer, self.epsilon)?;
        Ok(0.0)
    }

    fn laplacian(&self, x: Coords, _t: f64) -> Result<f64> {
        let (e, k) = self.layer(x)?;
        let eps = self.epsilon;
        let dx = x[0] - 1.0;
        let dy = x[1] - 1.0;
        Ok(k * e * (dx * dx + dy * dy) / (eps * eps))
    }
}

// =============================================================================
// Configuration-time selection
// =============================================================================

/// Profile family, resolved from configuration by exact name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    #[default]
    SineWave,
    TanhFront,
    ArctanLayer,
    ExponentialLayer,
}

/// Recognized profile names.
pub const PROFILE_NAMES: &[(&str, ProfileKind)] = &[
    ("sine_wave", ProfileKind::SineWave),
    ("tanh_front", ProfileKind::TanhFront),
    ("arctan_layer", ProfileKind::ArctanLayer),
    ("exponential_layer", ProfileKind::ExponentialLayer),
];

impl ProfileKind {
    /// Canonical configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            ProfileKind::SineWave => "sine_wave",
            ProfileKind::TanhFront => "tanh_front",
            ProfileKind::ArctanLayer => "arctan_layer",
            ProfileKind::ExponentialLayer => "exponential_layer",
        }
    }

    /// Whether the profile has a layer width that must be positive.
    pub fn requires_width(&self) -> bool {
        !matches!(self, ProfileKind::SineWave)
    }
}

impl FromStr for ProfileKind {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self> {
        PROFILE_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| VerificationError::config(format!("unknown profile '{s}'")))
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters for building a profile from configuration.
///
/// Unset widths fall back to the problem's diffusion coefficient.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileParams {
    /// Profile family
    pub kind: ProfileKind,
    /// Layer width ε
    pub epsilon: Option<f64>,
    /// Sine-wave vector ω (default (2π, 0))
    pub wave_vector: Option<[f64; 2]>,
    /// Sine-wave transport velocity
    pub velocity: Option<[f64; 2]>,
    /// Sine-wave decay rate
    pub decay: f64,
    /// Front speed (default 1)
    pub front_speed: Option<f64>,
    /// Front offset (default −½)
    pub front_offset: Option<f64>,
}

impl ProfileParams {
    /// Default parameters for a profile family.
    pub fn new(kind: ProfileKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Set the layer width.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    /// Build the profile.
    ///
    /// # Arguments
    /// * `diffusion` - diffusion coefficient, used as width when none is set
    pub fn build(&self, diffusion: f64) -> Box<dyn AnalyticProfile> {
        let eps = self.epsilon.unwrap_or(diffusion);
        match self.kind {
            ProfileKind::SineWave => Box::new(
                SineWave::new(self.wave_vector.unwrap_or([2.0 * PI, 0.0]))
                    .with_velocity(self.velocity.unwrap_or([0.0, 0.0]))
                    .with_decay(self.decay),
            ),
            ProfileKind::TanhFront => Box::new(TanhFront::new(
                eps,
                self.front_speed.unwrap_or(1.0),
                self.front_offset.unwrap_or(-0.5),
            )),
            ProfileKind::ArctanLayer => Box::new(ArctanLayer::new(eps)),
            ProfileKind::ExponentialLayer => Box::new(ExponentialLayer::new(eps)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{Burgers, LinearAdvection};

    const TOL: f64 = 1e-12;

    #[test]
    fn test_sine_diffusion_source() {
        // −D u'' = 4π² D sin(2πx)
        let p = SineWave::diffusion_1d();
        let eq = TargetEquation::diffusion(0.3);
        let x = [0.37, 0.0];
        let expected = 4.0 * PI * PI * 0.3 * (2.0 * PI * x[0]).sin();
        assert!((p.source(&eq, x, 0.0).unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_heat_mode_balances() {
        // e^{−t} sin x solves u_t = u_xx exactly
        let p = SineWave::heat_mode();
        let eq = TargetEquation::diffusion(1.0).with_transient(true);
        for &(x, t) in &[(0.1, 0.0), (1.3, 0.5), (2.9, 2.0)] {
            assert!(p.source(&eq, [x, 0.0], t).unwrap().abs() < TOL);
        }
    }

    #[test]
    fn test_transported_wave_balances_advection() {
        let a = [3.0, 1.0];
        let p = SineWave::oblique().with_velocity(a);
        let eq = TargetEquation::advection_diffusion(LinearAdvection::new(a), 0.0)
            .with_transient(true);
        assert!(p.source(&eq, [0.2, 0.7], 0.3).unwrap().abs() < 1e-11);
    }

    #[test]
    fn test_burgers_front_is_exact() {
        let eps = 0.05;
        let p = TanhFront::burgers(eps);
        let eq = TargetEquation::advection_diffusion(Burgers::one_d(), eps).with_transient(true);
        for &x in &[-0.8, -0.5, 0.0, 0.4] {
            assert!(p.source(&eq, [x, 0.0], 0.2).unwrap().abs() < 1e-9);
        }
    }

    #[test]
    fn test_exponential_layer_boundary_values() {
        let p = ExponentialLayer::new(0.1);
        // Vanishes on the outflow edges
        assert!(p.value([1.0, 0.3], 0.0).unwrap().abs() < TOL);
        assert!(p.value([0.4, 1.0], 0.0).unwrap().abs() < TOL);
    }

    #[test]
    fn test_arctan_layer_symmetric() {
        let p = ArctanLayer::new(0.01);
        let a = p.value([0.2, 0.7], 0.0).unwrap();
        let b = p.value([0.7, 0.2], 0.0).unwrap();
        let c = p.value([0.8, 0.3], 0.0).unwrap();
        assert!((a - b).abs() < TOL);
        assert!((a - c).abs() < TOL);
    }

    #[test]
    fn test_zero_width_is_domain_error() {
        let profiles: Vec<Box<dyn AnalyticProfile>> = vec![
            Box::new(TanhFront::burgers(0.0)),
            Box::new(ArctanLayer::new(0.0)),
            Box::new(ExponentialLayer::new(0.0)),
        ];
        let eq = TargetEquation::diffusion(0.0);
        for p in profiles {
            assert!(p.value([0.5, 0.5], 0.0).unwrap_err().is_domain(), "{}", p.name());
            assert!(p.source(&eq, [0.5, 0.5], 0.0).unwrap_err().is_domain());
        }
    }

    #[test]
    fn test_profile_names() {
        for (name, kind) in PROFILE_NAMES {
            assert_eq!(name.parse::<ProfileKind>().unwrap(), *kind);
        }
        assert!("tanh".parse::<ProfileKind>().unwrap_err().is_configuration());
    }

    #[test]
    fn test_params_width_defaults_to_diffusion() {
        let p = ProfileParams::new(ProfileKind::ArctanLayer).build(1e-3);
        let direct = ArctanLayer::new(1e-3);
        let x = [0.3, 0.6];
        assert_eq!(p.value(x, 0.0).unwrap(), direct.value(x, 0.0).unwrap());
        assert_eq!(p.kind(), ProfileKind::ArctanLayer);
    }
}
