//! Parameter sweeps.
//!
//! A sweep is the Cartesian product
//! diffusion × penalty × limiting × order × refinement. Each entry is one
//! external run.

use std::fmt;

use crate::config::Overrides;
use crate::error::{Result, VerificationError};
use crate::problem::MeshSpec;
use crate::types::GeometryTag;

/// One run of a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepCase {
    /// Refinement level (0 = coarsest)
    pub refinement: usize,
    /// Polynomial order
    pub order: usize,
    /// Options applied on top of the base problem
    pub overrides: Overrides,
    /// Mesh of this refinement level
    pub mesh: MeshSpec,
}

impl fmt::Display for SweepCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h{}/o{} ({} cells",
            self.refinement, self.order, self.mesh.n_cells
        )?;
        if let Some(d) = self.overrides.diffcoef {
            write!(f, ", diffcoef {d:e}")?;
        }
        if let Some(cw) = self.overrides.cw {
            write!(f, ", cw {cw:e}")?;
        }
        if let Some(limit) = self.overrides.limit {
            write!(f, ", limit {limit}")?;
        }
        write!(f, ")")
    }
}

/// Cartesian product of run parameters.
///
/// Parameter lists default to a single `None` entry, which keeps the base
/// problem's value.
///
/// # Example
/// ```
/// use dg_mms::study::ParameterSweep;
///
/// let sweep = ParameterSweep::new()
///     .with_orders([1, 2, 3])
///     .with_refinements(0..4)
///     .with_diffcoefs([1e-2, 1e-3]);
/// assert_eq!(sweep.cases().unwrap().len(), 3 * 4 * 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSweep {
    orders: Vec<usize>,
    refinements: Vec<usize>,
    diffcoefs: Vec<Option<f64>>,
    penalties: Vec<Option<f64>>,
    limiting: Vec<Option<bool>>,
    geometry: GeometryTag,
    base_cells: usize,
    length: f64,
}

impl Default for ParameterSweep {
    fn default() -> Self {
        Self {
            orders: vec![1],
            refinements: vec![0],
            diffcoefs: vec![None],
            penalties: vec![None],
            limiting: vec![None],
            geometry: GeometryTag::LINE,
            base_cells: 4,
            length: 1.0,
        }
    }
}

impl ParameterSweep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(mut self, orders: impl IntoIterator<Item = usize>) -> Self {
        self.orders = orders.into_iter().collect();
        self
    }

    pub fn with_refinements(mut self, levels: impl IntoIterator<Item = usize>) -> Self {
        self.refinements = levels.into_iter().collect();
        self
    }

    pub fn with_diffcoefs(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.diffcoefs = values.into_iter().map(Some).collect();
        self
    }

    pub fn with_penalties(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.penalties = values.into_iter().map(Some).collect();
        self
    }

    pub fn with_limiting(mut self, values: impl IntoIterator<Item = bool>) -> Self {
        self.limiting = values.into_iter().map(Some).collect();
        self
    }

    /// Element geometry of the generated meshes.
    pub fn with_geometry(mut self, geometry: GeometryTag) -> Self {
        self.geometry = geometry;
        self
    }

    /// Cells per direction on the coarsest level, and the domain edge length.
    pub fn with_base_mesh(mut self, base_cells: usize, length: f64) -> Self {
        self.base_cells = base_cells;
        self.length = length;
        self
    }

    /// Mesh of a refinement level; each level halves h.
    pub fn mesh(&self, refinement: usize) -> MeshSpec {
        let n = self.base_cells << refinement;
        if self.geometry.dimension() == 1 {
            MeshSpec::uniform_line(n, self.length)
        } else {
            let unit = MeshSpec::unit_square(n, self.geometry);
            MeshSpec::new(unit.n_cells, unit.h * self.length, self.geometry)
        }
    }

    /// Enumerate every case.
    ///
    /// Cases of one parameter combination are consecutive, ordered by
    /// polynomial order then refinement.
    ///
    /// # Errors
    /// `Configuration` if a list is empty or the coarsest mesh is empty.
    pub fn cases(&self) -> Result<Vec<SweepCase>> {
        if self.orders.is_empty()
            || self.refinements.is_empty()
            || self.diffcoefs.is_empty()
            || self.penalties.is_empty()
            || self.limiting.is_empty()
        {
            return Err(VerificationError::config("sweep has an empty parameter list"));
        }
        if self.base_cells == 0 || !(self.length > 0.0) {
            return Err(VerificationError::config(format!(
                "invalid base mesh: {} cells on length {}",
                self.base_cells, self.length
            )));
        }
        if self.refinements.iter().any(|&r| r >= usize::BITS as usize - 8) {
            return Err(VerificationError::config("refinement level too large"));
        }

        let mut cases = Vec::new();
        for &diffcoef in &self.diffcoefs {
            for &cw in &self.penalties {
                for &limit in &self.limiting {
                    for &order in &self.orders {
                        for &refinement in &self.refinements {
                            cases.push(SweepCase {
                                refinement,
                                order,
                                overrides: Overrides {
                                    order: Some(order),
                                    diffcoef,
                                    cw,
                                    limit,
                                    ..Default::default()
                                },
                                mesh: self.mesh(refinement),
                            });
                        }
                    }
                }
            }
        }
        Ok(cases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_count_and_order() {
        let sweep = ParameterSweep::new()
            .with_orders([1, 2])
            .with_refinements([0, 1, 2])
            .with_penalties([10.0, 100.0])
            .with_limiting([false, true]);
        let cases = sweep.cases().unwrap();
        assert_eq!(cases.len(), 2 * 3 * 2 * 2);

        let first: Vec<_> = cases[..6].iter().map(|c| (c.order, c.refinement)).collect();
        assert_eq!(first, vec![(1, 0), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)]);
        assert_eq!(cases[0].overrides.cw, Some(10.0));
        assert_eq!(cases[0].overrides.limit, Some(false));
        assert_eq!(cases[0].overrides.diffcoef, None);
    }

    #[test]
    fn test_refinement_halves_h() {
        let sweep = ParameterSweep::new().with_base_mesh(4, 2.0);
        assert_eq!(sweep.mesh(0).n_cells, 4);
        assert_eq!(sweep.mesh(2).n_cells, 16);
        assert!((sweep.mesh(0).h / sweep.mesh(1).h - 2.0).abs() < 1e-14);

        let tri = ParameterSweep::new().with_geometry(GeometryTag::TRIANGLE);
        assert_eq!(tri.mesh(1).n_cells, 2 * 8 * 8);
        assert!((tri.mesh(1).h - 0.125).abs() < 1e-14);
    }

    #[test]
    fn test_empty_list_rejected() {
        let sweep = ParameterSweep::new().with_orders([]);
        assert!(sweep.cases().unwrap_err().is_configuration());
    }

    #[test]
    fn test_case_display() {
        let sweep = ParameterSweep::new().with_diffcoefs([0.01]);
        let case = sweep.cases().unwrap()[0];
        assert_eq!(case.to_string(), "h0/o1 (4 cells, diffcoef 1e-2)");
    }
}
