//! Convergence records loaded from run-result tables.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::types::GeometryTag;

/// Scheme parameters a run was made with.
///
/// Runs are only compared with runs of equal key. Floating-point fields are
/// ordered with `total_cmp`, so keys can be used in ordered maps.
#[derive(Clone, Copy, Debug)]
pub struct ParameterKey {
    /// Diffusion coefficient, `None` for runs without diffusion
    pub diffcoef: Option<f64>,
    /// Interior-penalty coefficient
    pub cw: Option<f64>,
    /// Whether the limiter was active
    pub limit: bool,
    /// Element geometry
    pub geometry: GeometryTag,
}

impl ParameterKey {
    pub fn new(geometry: GeometryTag) -> Self {
        Self {
            diffcoef: None,
            cw: None,
            limit: false,
            geometry,
        }
    }

    pub fn with_diffcoef(mut self, diffcoef: f64) -> Self {
        self.diffcoef = Some(diffcoef);
        self
    }

    pub fn with_cw(mut self, cw: f64) -> Self {
        self.cw = Some(cw);
        self
    }

    pub fn with_limit(mut self, limit: bool) -> Self {
        self.limit = limit;
        self
    }
}

fn cmp_opt(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.total_cmp(&y),
    }
}

impl Ord for ParameterKey {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_opt(self.diffcoef, other.diffcoef)
            .then_with(|| cmp_opt(self.cw, other.cw))
            .then_with(|| self.limit.cmp(&other.limit))
            .then_with(|| self.geometry.cmp(&other.geometry))
    }
}

impl PartialOrd for ParameterKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ParameterKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParameterKey {}

impl Hash for ParameterKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.diffcoef.map(f64::to_bits).hash(state);
        self.cw.map(f64::to_bits).hash(state);
        self.limit.hash(state);
        self.geometry.hash(state);
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |x| format!("{x:e}"));
        write!(
            f,
            "gel {}, diffcoef {}, cw {}, limit {}",
            self.geometry,
            opt(self.diffcoef),
            opt(self.cw),
            self.limit
        )
    }
}

/// One persisted run: mesh size, order, parameters and error norm.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvergenceRecord {
    /// Study identifier
    pub expid: String,
    /// Number of mesh cells
    pub n_cells: usize,
    /// Characteristic cell size
    pub h: f64,
    /// Polynomial order
    pub order: usize,
    /// Scheme parameters
    pub key: ParameterKey,
    /// L2 norm of the error against the exact solution
    pub error: f64,
}

impl ConvergenceRecord {
    pub fn new(
        expid: impl Into<String>,
        n_cells: usize,
        h: f64,
        order: usize,
        key: ParameterKey,
        error: f64,
    ) -> Self {
        Self {
            expid: expid.into(),
            n_cells,
            h,
            order,
            key,
            error,
        }
    }

    /// Whether size and error are usable for order computation.
    pub fn is_valid(&self) -> bool {
        self.h > 0.0 && self.h.is_finite() && self.error >= 0.0 && self.error.is_finite()
    }

    /// 1/h², the refinement axis used in plots.
    pub fn inv_h_squared(&self) -> f64 {
        1.0 / (self.h * self.h)
    }
}
