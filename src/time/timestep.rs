//! CFL-type timestep selection.
//!
//! For a mesh with smallest cell size h, transport speed |v| and diffusion
//! coefficient D the stable step is
//!
//! dt = CFL · h / (|v| + D / h)
//!
//! optionally scaled by 1 / (2N + 1) for polynomial order N, the DG
//! eigenvalue growth used by explicit integrators. The step is computed once
//! at setup and never adapted.

use std::fmt;

use crate::error::{Result, VerificationError};

/// Stable timestep for the given scales.
///
/// Returns `f64::INFINITY` when there is neither transport nor diffusion.
///
/// # Arguments
/// * `h_min` - Smallest cell size
/// * `cfl` - CFL number
/// * `velocity_magnitude` - Largest transport speed
/// * `diffusion` - Diffusion coefficient
///
/// # Errors
/// `Configuration` when a scale is non-positive or not finite.
pub fn stable_dt(h_min: f64, cfl: f64, velocity_magnitude: f64, diffusion: f64) -> Result<f64> {
    check_cfl(cfl)?;
    if !(h_min > 0.0 && h_min.is_finite()) {
        return Err(VerificationError::config(format!(
            "smallest cell size must be positive, got {h_min}"
        )));
    }
    if !velocity_magnitude.is_finite() {
        return Err(VerificationError::config(format!(
            "velocity magnitude must be finite, got {velocity_magnitude}"
        )));
    }
    if diffusion < 0.0 || !diffusion.is_finite() {
        return Err(VerificationError::config(format!(
            "diffusion coefficient must be non-negative, got {diffusion}"
        )));
    }

    let rate = velocity_magnitude.abs() + diffusion / h_min;
    if rate < 1e-14 {
        // Nothing to resolve
        return Ok(f64::INFINITY);
    }
    Ok(cfl * h_min / rate)
}

fn check_cfl(cfl: f64) -> Result<()> {
    if cfl > 0.0 && cfl.is_finite() {
        Ok(())
    } else {
        Err(VerificationError::config(format!(
            "cfl must be positive and finite, got {cfl}"
        )))
    }
}

fn check_dt(dt: f64) -> Result<()> {
    if dt > 0.0 && dt.is_finite() {
        Ok(())
    } else {
        Err(VerificationError::config(format!(
            "dt must be positive and finite, got {dt}"
        )))
    }
}

/// Where a timestep came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DtSource {
    /// Supplied directly by the configuration
    Explicit,
    /// Derived from the CFL rule
    Cfl,
}

/// Timestep derived at configuration time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimestepBudget {
    pub dt: f64,
    pub source: DtSource,
}

impl TimestepBudget {
    /// Number of steps needed to cover [t0, t1].
    ///
    /// At least one step; an unbounded dt covers the interval in one step.
    pub fn n_steps(&self, t0: f64, t1: f64) -> usize {
        let span = (t1 - t0).max(0.0);
        if !self.dt.is_finite() || span == 0.0 {
            return 1;
        }
        // Guard against 0.1 / 0.01 = 10.000000000000002
        let n = (span / self.dt * (1.0 - 1e-12)).ceil();
        (n as usize).max(1)
    }
}

impl fmt::Display for TimestepBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            DtSource::Explicit => write!(f, "dt = {:.6e} (explicit)", self.dt),
            DtSource::Cfl => write!(f, "dt = {:.6e} (cfl)", self.dt),
        }
    }
}

/// How the timestep of a transient problem is chosen.
///
/// An explicit `dt` takes precedence over `cfl`. Supplying both is accepted
/// with a warning, unless the policy is strict.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimestepPolicy {
    cfl: Option<f64>,
    explicit_dt: Option<f64>,
    order: Option<usize>,
    strict: bool,
}

impl TimestepPolicy {
    /// Policy from optional configuration values.
    pub fn new(cfl: Option<f64>, explicit_dt: Option<f64>) -> Self {
        Self {
            cfl,
            explicit_dt,
            order: None,
            strict: false,
        }
    }

    /// CFL-driven policy.
    pub fn from_cfl(cfl: f64) -> Self {
        Self::new(Some(cfl), None)
    }

    /// Fixed-step policy.
    pub fn from_dt(dt: f64) -> Self {
        Self::new(None, Some(dt))
    }

    /// Apply the 1 / (2N + 1) DG correction for polynomial order N.
    pub fn with_order_correction(mut self, order: usize) -> Self {
        self.order = Some(order);
        self
    }

    /// Reject configurations that supply both `cfl` and `dt`.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn cfl(&self) -> Option<f64> {
        self.cfl
    }

    pub fn explicit_dt(&self) -> Option<f64> {
        self.explicit_dt
    }

    /// Check the policy without any mesh information.
    ///
    /// # Errors
    /// `Configuration` when neither `cfl` nor `dt` is given, when both are
    /// given under a strict policy, or when either is non-positive.
    pub fn validate(&self) -> Result<()> {
        match (self.explicit_dt, self.cfl) {
            (Some(_), Some(_)) if self.strict => Err(VerificationError::config(
                "both cfl and dt given; supply only one",
            )),
            (Some(dt), _) => check_dt(dt),
            (None, Some(cfl)) => check_cfl(cfl),
            (None, None) => Err(VerificationError::config(
                "transient problem needs either cfl or dt",
            )),
        }
    }

    /// Derive the timestep.
    ///
    /// # Errors
    /// Everything [`validate`](Self::validate) rejects, and out-of-range
    /// mesh or transport scales.
    pub fn budget(
        &self,
        h_min: f64,
        velocity_magnitude: f64,
        diffusion: f64,
    ) -> Result<TimestepBudget> {
        self.validate()?;
        match (self.explicit_dt, self.cfl) {
            (Some(dt), cfl) => {
                if cfl.is_some() {
                    log::warn!("both cfl and dt given, using dt = {dt} and ignoring cfl");
                }
                Ok(TimestepBudget {
                    dt,
                    source: DtSource::Explicit,
                })
            }
            (None, Some(cfl)) => {
                let mut dt = stable_dt(h_min, cfl, velocity_magnitude, diffusion)?;
                if let Some(order) = self.order {
                    dt /= (2 * order + 1) as f64;
                }
                if dt.is_infinite() {
                    log::warn!("no transport or diffusion, timestep is unbounded");
                }
                log::debug!("cfl {cfl}, h_min {h_min:.4e} -> dt {dt:.4e}");
                Ok(TimestepBudget {
                    dt,
                    source: DtSource::Cfl,
                })
            }
            (None, None) => Err(VerificationError::config(
                "transient problem needs either cfl or dt",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_advection_limit() {
        let dt = stable_dt(0.1, 0.5, 2.0, 0.0).unwrap();
        assert!((dt - 0.025).abs() < 1e-15);
    }

    #[test]
    fn test_diffusion_reduces_dt() {
        let h = 0.01;
        let adv = stable_dt(h, 0.5, 1.0, 0.0).unwrap();
        let both = stable_dt(h, 0.5, 1.0, 1e-3).unwrap();
        assert!(both < adv);
        assert!(both <= 0.5 * h / 1.0);
    }

    #[test]
    fn test_no_transport_is_unbounded() {
        assert!(stable_dt(0.1, 0.5, 0.0, 0.0).unwrap().is_infinite());
    }

    #[test]
    fn test_degenerate_cell_size() {
        for h in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = stable_dt(h, 0.5, 1.0, 1e-3).unwrap_err();
            assert!(err.is_configuration(), "h = {h}");
        }
        assert!(stable_dt(0.1, 0.0, 1.0, 0.0).unwrap_err().is_configuration());
    }

    #[test]
    fn test_validate_without_mesh() {
        assert!(TimestepPolicy::from_cfl(0.4).validate().is_ok());
        assert!(TimestepPolicy::from_dt(1e-3).validate().is_ok());
        assert!(TimestepPolicy::new(Some(0.4), Some(1e-3)).validate().is_ok());

        for bad in [
            TimestepPolicy::from_cfl(-0.5),
            TimestepPolicy::from_cfl(f64::NAN),
            TimestepPolicy::from_dt(0.0),
            TimestepPolicy::from_dt(f64::INFINITY),
            TimestepPolicy::new(Some(0.4), Some(1e-3)).strict(),
            TimestepPolicy::default(),
        ] {
            assert!(bad.validate().unwrap_err().is_configuration(), "{bad:?}");
        }
    }

    #[test]
    fn test_explicit_dt_wins() {
        let b = TimestepPolicy::new(Some(0.9), Some(1e-3))
            .budget(0.1, 5.0, 1.0)
            .unwrap();
        assert_eq!(b.dt, 1e-3);
        assert_eq!(b.source, DtSource::Explicit);
    }

    #[test]
    fn test_strict_rejects_both() {
        let err = TimestepPolicy::new(Some(0.9), Some(1e-3))
            .strict()
            .budget(0.1, 1.0, 0.0)
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_missing_both() {
        assert!(TimestepPolicy::default().budget(0.1, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_order_correction() {
        let base = TimestepPolicy::from_cfl(0.5).budget(0.1, 1.0, 0.0).unwrap();
        let p2 = TimestepPolicy::from_cfl(0.5)
            .with_order_correction(2)
            .budget(0.1, 1.0, 0.0)
            .unwrap();
        assert!((p2.dt * 5.0 - base.dt).abs() < 1e-15);
    }

    #[test]
    fn test_n_steps() {
        let b = TimestepBudget {
            dt: 0.01,
            source: DtSource::Explicit,
        };
        assert_eq!(b.n_steps(0.0, 0.1), 10);
        assert_eq!(b.n_steps(0.0, 0.105), 11);
        assert_eq!(b.n_steps(1.0, 1.0), 1);
    }
}
