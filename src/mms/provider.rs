//! Manufactured-solution provider.

use std::fmt;

use super::boundary::{BoundaryEdge, BoundaryTraceRequest, Trace};
use super::profiles::AnalyticProfile;
use crate::equations::TargetEquation;
use crate::error::{Result, VerificationError};
use crate::types::Coords;

/// Exact solution, boundary traces and source for one problem.
///
/// Owns exactly one [`AnalyticProfile`] and the [`TargetEquation`] its source
/// has to balance. Optionally restricted to a set of boundary edges; a trace
/// request for an edge outside that set is a configuration error.
pub struct ManufacturedSolutionProvider {
    profile: Box<dyn AnalyticProfile>,
    equation: TargetEquation,
    edges: Vec<BoundaryEdge>,
}

impl ManufacturedSolutionProvider {
    /// Create a provider for `profile` against `equation`.
    pub fn new(profile: impl AnalyticProfile + 'static, equation: TargetEquation) -> Self {
        Self::from_boxed(Box::new(profile), equation)
    }

    /// Create a provider from an already boxed profile.
    pub fn from_boxed(profile: Box<dyn AnalyticProfile>, equation: TargetEquation) -> Self {
        Self {
            profile,
            equation,
            edges: Vec::new(),
        }
    }

    /// Restrict traces to the given edge labels.
    ///
    /// # Errors
    /// `Configuration` if a label is not a known boundary name.
    pub fn with_edges<S: AsRef<str>>(mut self, labels: &[S]) -> Result<Self> {
        self.edges = labels
            .iter()
            .map(|l| l.as_ref().parse())
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// The wrapped profile.
    pub fn profile(&self) -> &dyn AnalyticProfile {
        self.profile.as_ref()
    }

    /// The equation the source balances.
    pub fn equation(&self) -> &TargetEquation {
        &self.equation
    }

    /// Edges this provider serves; empty means all known edges.
    pub fn edges(&self) -> &[BoundaryEdge] {
        &self.edges
    }

    /// Exact solution u(x, t).
    pub fn value(&self, x: Coords, t: f64) -> Result<f64> {
        self.profile.value(x, t)
    }

    /// Exact gradient ∇u(x, t).
    pub fn gradient(&self, x: Coords, t: f64) -> Result<[f64; 2]> {
        self.profile.gradient(x, t)
    }

    /// Exact solution at the initial time, for initial conditions.
    pub fn initial_condition(&self, x: Coords, t0: f64) -> Result<f64> {
        self.profile.value(x, t0)
    }

    /// Boundary trace for a resolved request.
    ///
    /// # Errors
    /// `Configuration` if the edge is not served by this provider; `Domain`
    /// if the profile is evaluated outside its parameter domain.
    pub fn trace(&self, x: Coords, t: f64, request: &BoundaryTraceRequest) -> Result<Trace> {
        if !self.edges.is_empty() && !self.edges.contains(&request.edge) {
            return Err(VerificationError::config(format!(
                "boundary '{}' is not part of this problem",
                request.edge
            )));
        }
        let value = self.profile.value(x, t)?;
        let grad = self.profile.gradient(x, t)?;
        Ok(Trace::for_request(request, value, grad))
    }

    /// Boundary trace by edge label and derivative order (0 or 1).
    pub fn trace_labeled(&self, x: Coords, t: f64, label: &str, order: u8) -> Result<Trace> {
        let request = BoundaryTraceRequest::new(label, order)?;
        self.trace(x, t, &request)
    }

    /// Manufactured source g = L[u](x, t).
    pub fn source(&self, x: Coords, t: f64) -> Result<f64> {
        self.profile.source(&self.equation, x, t)
    }
}

impl fmt::Debug for ManufacturedSolutionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManufacturedSolutionProvider")
            .field("profile", &self.profile)
            .field("equation", &self.equation)
            .field("edges", &self.edges)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::LinearAdvection;
    use crate::mms::{ArctanLayer, ExponentialLayer, SineWave};

    #[test]
    fn test_trace_value_and_gradient() {
        let provider = ManufacturedSolutionProvider::new(
            ExponentialLayer::new(0.1),
            TargetEquation::advection_diffusion(LinearAdvection::new([1.0, 1.0]), 0.1),
        );
        let x = [0.0, 0.4];
        let v = provider.trace_labeled(x, 0.0, "left", 0).unwrap();
        assert_eq!(v, Trace::Value(provider.value(x, 0.0).unwrap()));

        let g = provider.trace_labeled(x, 0.0, "left", 1).unwrap();
        assert_eq!(g, Trace::Gradient(provider.gradient(x, 0.0).unwrap()));
    }

    #[test]
    fn test_left_and_top_left_are_distinct_edges() {
        let provider = ManufacturedSolutionProvider::new(
            ArctanLayer::new(0.01),
            TargetEquation::diffusion(0.01),
        )
        .with_edges(&["top_left", "bot_left", "right", "top", "bottom"])
        .unwrap();

        assert!(provider.trace_labeled([0.0, 0.8], 0.0, "top_left", 0).is_ok());
        let err = provider
            .trace_labeled([0.0, 0.8], 0.0, "left", 0)
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unknown_edge_label_in_set() {
        let res = ManufacturedSolutionProvider::new(SineWave::oblique(), TargetEquation::diffusion(1.0))
            .with_edges(&["left", "west"]);
        assert!(res.unwrap_err().is_configuration());
    }

    #[test]
    fn test_source_uses_equation() {
        let provider =
            ManufacturedSolutionProvider::new(SineWave::diffusion_1d(), TargetEquation::diffusion(2.0));
        let x = [0.125, 0.0];
        let expected = 2.0 * 4.0 * std::f64::consts::PI.powi(2) * (0.25 * std::f64::consts::PI).sin();
        assert!((provider.source(x, 0.0).unwrap() - expected).abs() < 1e-10);
    }
}
