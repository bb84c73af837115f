//! Scheme selection and weak-form composition.
//!
//! A [`SchemeSelection`] fixes the discretization choices of one problem:
//! which interface flux the advective term uses, which interior-penalty
//! variant handles diffusion, and the penalty and flux-blend coefficients.
//! [`EquationComposer`] turns a selection into the ordered list of signed
//! weak-form terms that the external assembler evaluates.
//!
//! Scheme names coming from configuration are resolved through the static
//! tables [`FLUX_KIND_NAMES`] and [`DIFFUSION_SCHEME_NAMES`]; resolution is by
//! exact name, and anything else is a configuration error.
//!
//! # Example
//!
//! ```
//! use dg_mms::weak_form::{DiffusionScheme, EquationComposer, FluxKind, SchemeSelection, TermKind};
//! use dg_mms::equations::LinearAdvection;
//!
//! let selection = SchemeSelection::new(FluxKind::LaxFriedrichs, DiffusionScheme::Symmetric)
//!     .with_penalty(100.0);
//!
//! let form = EquationComposer::new(&selection)
//!     .with_advection(LinearAdvection::new([1.0, 1.0]))
//!     .with_diffusion(1e-2)
//!     .with_source(true)
//!     .compose(false)
//!     .unwrap();
//!
//! assert!(form.contains(TermKind::InteriorPenalty));
//! assert!(form.is_symmetric_diffusion());
//! ```

mod compose;
mod terms;

pub use compose::EquationComposer;
pub use terms::{Sign, TermCoefficient, TermKind, WeakForm, WeakFormTerm};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerificationError};

/// Interface flux family for the advective numerical-flux term.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluxKind {
    /// Central flux
    Central,
    /// Blended Lax–Friedrichs flux
    #[default]
    LaxFriedrichs,
    /// Lax–Friedrichs for a caller-supplied nonlinear flux
    Nonlinear,
}

/// Recognized flux-kind names.
pub const FLUX_KIND_NAMES: &[(&str, FluxKind)] = &[
    ("central", FluxKind::Central),
    ("lax_friedrichs", FluxKind::LaxFriedrichs),
    ("nonlinear", FluxKind::Nonlinear),
];

impl FluxKind {
    /// Canonical configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            FluxKind::Central => "central",
            FluxKind::LaxFriedrichs => "lax_friedrichs",
            FluxKind::Nonlinear => "nonlinear",
        }
    }
}

impl FromStr for FluxKind {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self> {
        FLUX_KIND_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| VerificationError::config(format!("unknown flux kind '{s}'")))
    }
}

impl fmt::Display for FluxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Interior-penalty variant used for the diffusion operator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffusionScheme {
    /// SIPG: consistency term plus its transpose, symmetric bilinear form
    #[default]
    Symmetric,
    /// IIPG: consistency term only
    Incomplete,
    /// NIPG: consistency term with the transpose sign inverted
    #[serde(alias = "non-symmetric")]
    Nonsymmetric,
    /// No diffusion terms at all
    None,
}

/// Recognized diffusion-scheme names.
///
/// `non-symmetric` is the spelling used by older problem files.
pub const DIFFUSION_SCHEME_NAMES: &[(&str, DiffusionScheme)] = &[
    ("symmetric", DiffusionScheme::Symmetric),
    ("incomplete", DiffusionScheme::Incomplete),
    ("nonsymmetric", DiffusionScheme::Nonsymmetric),
    ("non-symmetric", DiffusionScheme::Nonsymmetric),
    ("none", DiffusionScheme::None),
];

impl DiffusionScheme {
    /// Canonical configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            DiffusionScheme::Symmetric => "symmetric",
            DiffusionScheme::Incomplete => "incomplete",
            DiffusionScheme::Nonsymmetric => "nonsymmetric",
            DiffusionScheme::None => "none",
        }
    }

    /// Whether diffusion terms are assembled at all.
    pub fn is_active(&self) -> bool {
        !matches!(self, DiffusionScheme::None)
    }
}

impl FromStr for DiffusionScheme {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self> {
        DIFFUSION_SCHEME_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, scheme)| *scheme)
            .ok_or_else(|| VerificationError::config(format!("unknown diffusion scheme '{s}'")))
    }
}

impl fmt::Display for DiffusionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Discretization choices for one problem definition.
///
/// Immutable once built; [`validate`](Self::validate) checks the invariants
/// and is called by the composer before any term is produced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchemeSelection {
    /// Interface flux family.
    pub flux_kind: FluxKind,
    /// Interior-penalty variant.
    pub diffusion_scheme: DiffusionScheme,
    /// Interior-penalty coefficient C_w. Required (> 0) with diffusion.
    pub penalty_coefficient: Option<f64>,
    /// Advective-flux blend weight in [0, 1].
    pub advective_flux_weight: f64,
}

impl SchemeSelection {
    /// Create a selection without penalty and with full flux dissipation.
    pub fn new(flux_kind: FluxKind, diffusion_scheme: DiffusionScheme) -> Self {
        Self {
            flux_kind,
            diffusion_scheme,
            penalty_coefficient: None,
            advective_flux_weight: 0.0,
        }
    }

    /// Pure advection selection (no diffusion terms).
    pub fn advection(flux_kind: FluxKind) -> Self {
        Self::new(flux_kind, DiffusionScheme::None)
    }

    /// Set the interior-penalty coefficient.
    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty_coefficient = Some(penalty);
        self
    }

    /// Set the advective-flux blend weight.
    pub fn with_flux_weight(mut self, weight: f64) -> Self {
        self.advective_flux_weight = weight;
        self
    }

    /// Check the selection invariants.
    ///
    /// # Errors
    /// `Configuration` if the penalty is negative or non-finite, missing or
    /// zero while diffusion is active, or the flux weight is outside [0, 1].
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.advective_flux_weight) {
            return Err(VerificationError::config(format!(
                "advective flux weight must lie in [0, 1], got {}",
                self.advective_flux_weight
            )));
        }

        if let Some(cw) = self.penalty_coefficient {
            if !cw.is_finite() || cw < 0.0 {
                return Err(VerificationError::config(format!(
                    "penalty coefficient must be finite and non-negative, got {cw}"
                )));
            }
        }

        if self.diffusion_scheme.is_active() {
            match self.penalty_coefficient {
                Some(cw) if cw > 0.0 => {}
                Some(_) => {
                    return Err(VerificationError::config(format!(
                        "diffusion scheme '{}' requires a positive penalty coefficient, got 0",
                        self.diffusion_scheme
                    )));
                }
                None => {
                    return Err(VerificationError::config(format!(
                        "diffusion scheme '{}' requires a penalty coefficient",
                        self.diffusion_scheme
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_names_resolve_exactly() {
        assert_eq!(
            "symmetric".parse::<DiffusionScheme>().unwrap(),
            DiffusionScheme::Symmetric
        );
        assert_eq!(
            "non-symmetric".parse::<DiffusionScheme>().unwrap(),
            DiffusionScheme::Nonsymmetric
        );
        assert!("Symmetric".parse::<DiffusionScheme>().is_err());
        assert!("sym".parse::<DiffusionScheme>().is_err());
        assert!(
            "symmetric_ip"
                .parse::<DiffusionScheme>()
                .unwrap_err()
                .is_configuration()
        );
    }

    #[test]
    fn test_flux_kind_names() {
        for (name, kind) in FLUX_KIND_NAMES {
            assert_eq!(name.parse::<FluxKind>().unwrap(), *kind);
            assert_eq!(kind.name(), *name);
        }
        assert!("upwind".parse::<FluxKind>().is_err());
    }

    #[test]
    fn test_penalty_required_with_diffusion() {
        let missing = SchemeSelection::new(FluxKind::Central, DiffusionScheme::Symmetric);
        assert!(missing.validate().unwrap_err().is_configuration());

        let zero = missing.with_penalty(0.0);
        assert!(zero.validate().unwrap_err().is_configuration());

        assert!(missing.with_penalty(10.0).validate().is_ok());
    }

    #[test]
    fn test_penalty_not_required_without_diffusion() {
        let sel = SchemeSelection::advection(FluxKind::LaxFriedrichs);
        assert!(sel.validate().is_ok());
        assert!(sel.with_penalty(0.0).validate().is_ok());
        assert!(sel.with_penalty(-1.0).validate().is_err());
    }

    #[test]
    fn test_flux_weight_range() {
        let sel = SchemeSelection::advection(FluxKind::LaxFriedrichs);
        assert!(sel.with_flux_weight(1.0).validate().is_ok());
        assert!(sel.with_flux_weight(1.5).validate().is_err());
        assert!(sel.with_flux_weight(f64::NAN).validate().is_err());
    }
}
