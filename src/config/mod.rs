//! Problem options.
//!
//! [`ProblemOptions`] is the serializable configuration surface of one
//! verification problem: polynomial order, flux and diffusion-scheme choice,
//! penalty, timestep settings and the manufactured profile. Options are read
//! from JSON and can be overridden per sweep case through [`Overrides`].
//!
//! # Example
//!
//! ```
//! use dg_mms::config::ProblemOptions;
//! use dg_mms::weak_form::DiffusionScheme;
//!
//! let opts = ProblemOptions::from_json_str(r#"{
//!     "example_name": "quart3",
//!     "approx_order": 3,
//!     "diffcoef": 0.01,
//!     "cw": 100.0,
//!     "diffscheme": "incomplete",
//!     "advection": { "kind": "linear", "velocity": [1.0, 1.0] },
//!     "profile": { "kind": "exponential_layer" }
//! }"#).unwrap();
//!
//! assert_eq!(opts.approx_order, 3);
//! assert_eq!(opts.scheme_selection().diffusion_scheme, DiffusionScheme::Incomplete);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::equations::{AdvectionModel, Burgers, LinearAdvection, TargetEquation};
use crate::error::{Result, VerificationError};
use crate::io::OutputFormat;
use crate::mms::ProfileParams;
use crate::time::TimestepPolicy;
use crate::weak_form::{DiffusionScheme, FluxKind, SchemeSelection};

/// Advective operator of a problem.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvectionOptions {
    /// f(u) = a u
    Linear { velocity: [f64; 2] },
    /// f(u) = d u²/2
    Burgers {
        #[serde(default = "x_axis")]
        direction: [f64; 2],
    },
}

fn x_axis() -> [f64; 2] {
    [1.0, 0.0]
}

impl AdvectionOptions {
    /// Resolve into a flux model.
    pub fn model(&self) -> AdvectionModel {
        match *self {
            AdvectionOptions::Linear { velocity } => LinearAdvection::new(velocity).into(),
            AdvectionOptions::Burgers { direction } => Burgers::new(direction).into(),
        }
    }
}

/// Options of one verification problem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemOptions {
    /// Name used for output trunks
    pub example_name: String,
    /// Spatial dimension (1 or 2)
    pub dim: usize,
    /// Polynomial order of the DG space
    pub approx_order: usize,
    /// Advective-flux blend weight (0 = full upwinding)
    pub adflux: f64,
    /// Whether a slope limiter runs after each step
    pub limit: bool,
    /// Interior-penalty coefficient C_w
    ///
    /// Defaults to 100 when absent from a config file, so a missing penalty
    /// is only reported when `cw` is explicitly `null`.
    pub cw: Option<f64>,
    /// Diffusion coefficient; `None` disables diffusion
    pub diffcoef: Option<f64>,
    /// Interior-penalty variant
    pub diffscheme: DiffusionScheme,
    /// Interface flux family
    pub flux_kind: FluxKind,
    /// Advective operator; `None` for pure diffusion
    pub advection: Option<AdvectionOptions>,
    /// CFL number for transient problems
    pub cfl: Option<f64>,
    /// Fixed timestep, takes precedence over `cfl`
    pub dt: Option<f64>,
    /// Reject `cfl` and `dt` given together
    pub strict_timestep: bool,
    /// Whether the problem is time dependent
    pub transient: bool,
    /// Start time
    pub t0: f64,
    /// Final time
    pub t1: f64,
    /// Snapshot file format
    pub output_format: OutputFormat,
    /// Manufactured solution
    pub profile: ProfileParams,
    /// Boundary edge labels of the mesh
    pub boundaries: Vec<String>,
}

impl Default for ProblemOptions {
    fn default() -> Self {
        Self {
            example_name: "mms".to_string(),
            dim: 1,
            approx_order: 2,
            adflux: 0.0,
            limit: false,
            cw: Some(100.0),
            diffcoef: None,
            diffscheme: DiffusionScheme::Symmetric,
            flux_kind: FluxKind::LaxFriedrichs,
            advection: None,
            cfl: None,
            dt: None,
            strict_timestep: false,
            transient: false,
            t0: 0.0,
            t1: 1.0,
            output_format: OutputFormat::Vtk,
            profile: ProfileParams::default(),
            boundaries: vec!["left".to_string(), "right".to_string()],
        }
    }
}

impl ProblemOptions {
    /// Parse options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let opts: Self = serde_json::from_str(json)?;
        Ok(opts)
    }

    /// Read options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Effective diffusion coefficient (0 when disabled).
    pub fn diffusion(&self) -> f64 {
        self.diffcoef.unwrap_or(0.0)
    }

    /// Scheme selection implied by the options.
    ///
    /// Without a diffusion coefficient no diffusion terms are assembled,
    /// whatever `diffscheme` says.
    pub fn scheme_selection(&self) -> SchemeSelection {
        let scheme = if self.diffcoef.is_some() {
            self.diffscheme
        } else {
            DiffusionScheme::None
        };
        SchemeSelection {
            flux_kind: self.flux_kind,
            diffusion_scheme: scheme,
            penalty_coefficient: self.cw,
            advective_flux_weight: self.adflux,
        }
    }

    /// Strong-form operator the manufactured source has to balance.
    pub fn target_equation(&self) -> TargetEquation {
        TargetEquation {
            advection: self.advection.map(|a| a.model()),
            diffusion: self.diffusion(),
            transient: self.transient,
        }
    }

    /// Timestep policy for transient runs.
    pub fn timestep_policy(&self) -> TimestepPolicy {
        let policy = TimestepPolicy::new(self.cfl, self.dt);
        if self.strict_timestep {
            policy.strict()
        } else {
            policy
        }
    }

    /// Check the options before any problem is built.
    ///
    /// # Errors
    /// `Configuration` on the first inconsistent value.
    pub fn validate(&self) -> Result<()> {
        if !(1..=2).contains(&self.dim) {
            return Err(VerificationError::config(format!(
                "dimension must be 1 or 2, got {}",
                self.dim
            )));
        }
        if let Some(d) = self.diffcoef {
            if !d.is_finite() || d < 0.0 {
                return Err(VerificationError::config(format!(
                    "diffcoef must be non-negative, got {d}"
                )));
            }
        }
        if self.transient {
            self.timestep_policy().validate()?;
            if self.t1 < self.t0 {
                return Err(VerificationError::config(format!(
                    "final time {} precedes start time {}",
                    self.t1, self.t0
                )));
            }
        }
        if self.flux_kind == FluxKind::Nonlinear && self.advection.is_none() {
            return Err(VerificationError::config(
                "nonlinear flux requires an advection model",
            ));
        }
        self.scheme_selection().validate()
    }

    /// Apply per-case overrides.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(order) = overrides.order {
            self.approx_order = order;
        }
        if let Some(adflux) = overrides.adflux {
            self.adflux = adflux;
        }
        if let Some(limit) = overrides.limit {
            self.limit = limit;
        }
        if let Some(cw) = overrides.cw {
            self.cw = Some(cw);
        }
        if let Some(diffcoef) = overrides.diffcoef {
            self.diffcoef = Some(diffcoef);
        }
        if let Some(scheme) = overrides.diffscheme {
            self.diffscheme = scheme;
        }
        if let Some(cfl) = overrides.cfl {
            self.cfl = Some(cfl);
        }
        if let Some(dt) = overrides.dt {
            self.dt = Some(dt);
        }
    }

    /// Copy with overrides applied.
    pub fn with_overrides(&self, overrides: &Overrides) -> Self {
        let mut opts = self.clone();
        opts.apply_overrides(overrides);
        opts
    }
}

/// Per-run parameter overrides; `None` keeps the base value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    pub order: Option<usize>,
    pub adflux: Option<f64>,
    pub limit: Option<bool>,
    pub cw: Option<f64>,
    pub diffcoef: Option<f64>,
    pub diffscheme: Option<DiffusionScheme>,
    pub cfl: Option<f64>,
    pub dt: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::AdvectiveFlux;

    #[test]
    fn test_defaults() {
        let opts = ProblemOptions::from_json_str("{}").unwrap();
        assert_eq!(opts.approx_order, 2);
        assert_eq!(opts.adflux, 0.0);
        assert!(!opts.limit);
        assert_eq!(opts.diffscheme, DiffusionScheme::Symmetric);
        assert_eq!(opts.output_format, OutputFormat::Vtk);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_no_diffcoef_disables_diffusion() {
        let opts = ProblemOptions::default();
        assert_eq!(
            opts.scheme_selection().diffusion_scheme,
            DiffusionScheme::None
        );
    }

    #[test]
    fn test_unknown_scheme_name_fails_to_parse() {
        let err = ProblemOptions::from_json_str(r#"{"diffscheme": "sym"}"#).unwrap_err();
        assert!(matches!(err, VerificationError::Json(_)));
    }

    #[test]
    fn test_symmetric_with_zero_penalty() {
        let opts = ProblemOptions {
            diffcoef: Some(0.1),
            cw: Some(0.0),
            ..Default::default()
        };
        assert!(opts.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_transient_needs_timestep() {
        let opts = ProblemOptions {
            transient: true,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
        let opts = ProblemOptions {
            cfl: Some(0.4),
            ..opts
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_bad_timestep_fails_validation() {
        let base = ProblemOptions {
            transient: true,
            ..Default::default()
        };
        for (cfl, dt) in [(Some(-0.5), None), (Some(f64::NAN), None), (None, Some(0.0))] {
            let opts = ProblemOptions {
                cfl,
                dt,
                ..base.clone()
            };
            assert!(opts.validate().unwrap_err().is_configuration(), "{cfl:?} {dt:?}");
        }

        let both = ProblemOptions {
            cfl: Some(0.4),
            dt: Some(1e-3),
            ..base
        };
        assert!(both.validate().is_ok());
        let strict = ProblemOptions {
            strict_timestep: true,
            ..both
        };
        assert!(strict.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_missing_cw_defaults_to_hundred() {
        let opts = ProblemOptions::from_json_str(r#"{"diffcoef": 0.1}"#).unwrap();
        assert_eq!(opts.cw, Some(100.0));
        assert!(opts.validate().is_ok());

        let opts = ProblemOptions::from_json_str(r#"{"diffcoef": 0.1, "cw": null}"#).unwrap();
        assert!(opts.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_overrides() {
        let base = ProblemOptions::default();
        let o = Overrides {
            order: Some(4),
            diffcoef: Some(1e-3),
            limit: Some(true),
            ..Default::default()
        };
        let opts = base.with_overrides(&o);
        assert_eq!(opts.approx_order, 4);
        assert_eq!(opts.diffcoef, Some(1e-3));
        assert!(opts.limit);
        assert_eq!(opts.cw, base.cw);
    }

    #[test]
    fn test_json_roundtrip_of_advection() {
        let opts = ProblemOptions {
            advection: Some(AdvectionOptions::Burgers {
                direction: [1.0, 0.0],
            }),
            flux_kind: FluxKind::Nonlinear,
            ..Default::default()
        };
        let back = ProblemOptions::from_json_str(&opts.to_json().unwrap()).unwrap();
        assert_eq!(back, opts);
        assert!(!back.target_equation().advection.unwrap().is_linear());
    }
}
