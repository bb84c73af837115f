//! Composition of the residual from a scheme selection.

use super::terms::{Sign, TermCoefficient, TermKind, WeakForm, WeakFormTerm};
use super::{DiffusionScheme, FluxKind, SchemeSelection};
use crate::equations::AdvectionModel;
use crate::error::{Result, VerificationError};
use crate::flux::StandardFlux;

/// Builds the ordered weak-form term sequence for one problem.
///
/// Term order is fixed:
///
/// 1. time derivative (transient only)
/// 2. advective volume term (advection only)
/// 3. advective numerical flux (advection only)
/// 4. diffusion volume term (scheme ≠ none)
/// 5. diffusion correction terms, depending on the scheme
/// 6. interior penalty (scheme ≠ none)
/// 7. volume source (when a source is supplied)
///
/// `compose` has no side effects; equal inputs give equal forms.
#[derive(Clone, Debug)]
pub struct EquationComposer<'a> {
    selection: &'a SchemeSelection,
    advection: Option<AdvectionModel>,
    diffusion: f64,
    source: bool,
}

impl<'a> EquationComposer<'a> {
    /// Start composing for a scheme selection.
    pub fn new(selection: &'a SchemeSelection) -> Self {
        Self {
            selection,
            advection: None,
            diffusion: 0.0,
            source: false,
        }
    }

    /// Enable the advective operator.
    pub fn with_advection(mut self, model: impl Into<AdvectionModel>) -> Self {
        self.advection = Some(model.into());
        self
    }

    /// Set (or clear) the advective operator.
    pub fn with_advection_model(mut self, model: Option<AdvectionModel>) -> Self {
        self.advection = model;
        self
    }

    /// Set the diffusion coefficient used by the diffusion terms.
    pub fn with_diffusion(mut self, diffusion: f64) -> Self {
        self.diffusion = diffusion;
        self
    }

    /// Whether a manufactured source is supplied.
    pub fn with_source(mut self, source: bool) -> Self {
        self.source = source;
        self
    }

    /// Produce the residual.
    ///
    /// # Errors
    /// `Configuration` when the selection is invalid, when a nonlinear flux is
    /// requested without an advective flux, or when the diffusion coefficient
    /// is negative or non-finite.
    pub fn compose(&self, transient: bool) -> Result<WeakForm> {
        self.selection.validate()?;

        if !self.diffusion.is_finite() || self.diffusion < 0.0 {
            return Err(VerificationError::config(format!(
                "diffusion coefficient must be finite and non-negative, got {}",
                self.diffusion
            )));
        }

        if self.selection.flux_kind == FluxKind::Nonlinear && self.advection.is_none() {
            return Err(VerificationError::config(
                "nonlinear flux requires an advective flux and its derivative",
            ));
        }

        let mut terms = Vec::with_capacity(8);

        if transient {
            terms.push(WeakFormTerm::new(
                TermKind::TimeDerivative,
                Sign::Plus,
                TermCoefficient::None,
            ));
        }

        if self.advection.is_some() {
            terms.push(WeakFormTerm::new(
                TermKind::AdvectionVolume,
                Sign::Minus,
                TermCoefficient::Advection,
            ));
            terms.push(WeakFormTerm::new(
                TermKind::AdvectionFlux,
                Sign::Plus,
                TermCoefficient::Flux {
                    flux: StandardFlux::from(self.selection.flux_kind),
                    weight: self.selection.advective_flux_weight,
                },
            ));
        }

        let scheme = self.selection.diffusion_scheme;
        if scheme.is_active() {
            let d = self.diffusion;
            terms.push(WeakFormTerm::new(
                TermKind::DiffusionVolume,
                Sign::Plus,
                TermCoefficient::Diffusion(d),
            ));
            terms.extend(correction_terms(scheme, d));

            // validate() guarantees a positive penalty here
            let penalty = self.selection.penalty_coefficient.unwrap_or_default();
            terms.push(WeakFormTerm::new(
                TermKind::InteriorPenalty,
                Sign::Plus,
                TermCoefficient::Penalty {
                    diffusion: d,
                    penalty,
                },
            ));
        }

        if self.source {
            terms.push(WeakFormTerm::new(
                TermKind::VolumeSource,
                Sign::Minus,
                TermCoefficient::Source,
            ));
        }

        log::debug!(
            "composed {} weak-form terms (flux: {}, diffusion: {})",
            terms.len(),
            self.selection.flux_kind,
            scheme
        );

        Ok(WeakForm::from_terms(terms))
    }
}

/// Consistency and symmetrizing terms of the interior-penalty family.
fn correction_terms(scheme: DiffusionScheme, diffusion: f64) -> Vec<WeakFormTerm> {
    let consistency = WeakFormTerm::new(
        TermKind::DiffusionConsistency,
        Sign::Minus,
        TermCoefficient::Diffusion(diffusion),
    );
    let transpose = |sign| {
        WeakFormTerm::new(
            TermKind::DiffusionTranspose,
            sign,
            TermCoefficient::Diffusion(diffusion),
        )
    };

    match scheme {
        DiffusionScheme::Symmetric => vec![consistency, transpose(Sign::Minus)],
        DiffusionScheme::Incomplete => vec![consistency],
        DiffusionScheme::Nonsymmetric => vec![consistency, transpose(Sign::Plus)],
        DiffusionScheme::None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{Burgers, LinearAdvection};

    fn selection(scheme: DiffusionScheme) -> SchemeSelection {
        SchemeSelection::new(FluxKind::LaxFriedrichs, scheme).with_penalty(10.0)
    }

    fn compose(sel: &SchemeSelection) -> WeakForm {
        EquationComposer::new(sel)
            .with_advection(LinearAdvection::new([1.0, 0.0]))
            .with_diffusion(0.1)
            .with_source(true)
            .compose(true)
            .unwrap()
    }

    #[test]
    fn test_full_term_order() {
        let form = compose(&selection(DiffusionScheme::Symmetric));
        assert_eq!(
            form.kinds(),
            vec![
                TermKind::TimeDerivative,
                TermKind::AdvectionVolume,
                TermKind::AdvectionFlux,
                TermKind::DiffusionVolume,
                TermKind::DiffusionConsistency,
                TermKind::DiffusionTranspose,
                TermKind::InteriorPenalty,
                TermKind::VolumeSource,
            ]
        );
        assert!(form.is_symmetric_diffusion());
    }

    #[test]
    fn test_deterministic() {
        let sel = selection(DiffusionScheme::Incomplete);
        assert_eq!(compose(&sel), compose(&sel));
    }

    #[test]
    fn test_scheme_only_changes_correction() {
        let sym = compose(&selection(DiffusionScheme::Symmetric));
        for scheme in [DiffusionScheme::Incomplete, DiffusionScheme::Nonsymmetric] {
            let other = compose(&selection(scheme));
            let a: Vec<_> = sym.non_correction_terms().collect();
            let b: Vec<_> = other.non_correction_terms().collect();
            assert_eq!(a, b, "{scheme}");
        }
    }

    #[test]
    fn test_correction_variants() {
        let inc = compose(&selection(DiffusionScheme::Incomplete));
        assert!(inc.contains(TermKind::DiffusionConsistency));
        assert!(!inc.contains(TermKind::DiffusionTranspose));
        assert!(!inc.is_symmetric_diffusion());

        let non = compose(&selection(DiffusionScheme::Nonsymmetric));
        let c = non.term(TermKind::DiffusionConsistency).unwrap();
        let t = non.term(TermKind::DiffusionTranspose).unwrap();
        assert_eq!(c.sign, t.sign.flipped());
    }

    #[test]
    fn test_pure_advection_steady() {
        let sel = SchemeSelection::advection(FluxKind::Central);
        let form = EquationComposer::new(&sel)
            .with_advection(LinearAdvection::one_d(1.0))
            .compose(false)
            .unwrap();
        assert_eq!(
            form.kinds(),
            vec![TermKind::AdvectionVolume, TermKind::AdvectionFlux]
        );
        assert!(!form.is_transient());
    }

    #[test]
    fn test_symmetric_without_penalty_fails() {
        let sel = SchemeSelection::new(FluxKind::Central, DiffusionScheme::Symmetric);
        let err = EquationComposer::new(&sel)
            .with_diffusion(1.0)
            .compose(false)
            .unwrap_err();
        assert!(err.is_configuration());

        let zero = sel.with_penalty(0.0);
        assert!(
            EquationComposer::new(&zero)
                .with_diffusion(1.0)
                .compose(false)
                .is_err()
        );
    }

    #[test]
    fn test_nonlinear_requires_flux() {
        let sel = SchemeSelection::advection(FluxKind::Nonlinear);
        assert!(
            EquationComposer::new(&sel)
                .compose(true)
                .unwrap_err()
                .is_configuration()
        );

        let form = EquationComposer::new(&sel)
            .with_advection(Burgers::one_d())
            .compose(true)
            .unwrap();
        match form.term(TermKind::AdvectionFlux).unwrap().coefficient {
            TermCoefficient::Flux { flux, .. } => assert_eq!(flux, StandardFlux::Nonlinear),
            other => panic!("unexpected coefficient {other:?}"),
        }
    }

    #[test]
    fn test_penalty_carries_coefficients() {
        let sel = selection(DiffusionScheme::Symmetric);
        let form = compose(&sel);
        let ip = form.term(TermKind::InteriorPenalty).unwrap();
        assert_eq!(
            ip.coefficient,
            TermCoefficient::Penalty {
                diffusion: 0.1,
                penalty: 10.0
            }
        );
    }

    #[test]
    fn test_negative_diffusion_rejected() {
        let sel = selection(DiffusionScheme::Symmetric);
        assert!(
            EquationComposer::new(&sel)
                .with_diffusion(-1.0)
                .compose(false)
                .is_err()
        );
    }
}
