//! Seam to the external finite-element engine.
//!
//! Mesh generation, quadrature and the linear and nonlinear solves all happen
//! outside this crate. An [`ExternalSolver`] takes a fully configured
//! [`ProblemDefinition`](super::ProblemDefinition) plus a mesh description
//! and reports back the error norm against the manufactured solution.

use std::path::PathBuf;

use crate::error::{Result, VerificationError};
use crate::types::GeometryTag;

use super::ProblemDefinition;

// =============================================================================
// Mesh description
// =============================================================================

/// Mesh a single run is made on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshSpec {
    /// Number of cells
    pub n_cells: usize,
    /// Characteristic (smallest) cell size
    pub h: f64,
    /// Element geometry
    pub geometry: GeometryTag,
}

impl MeshSpec {
    pub fn new(n_cells: usize, h: f64, geometry: GeometryTag) -> Self {
        Self {
            n_cells,
            h,
            geometry,
        }
    }

    /// Uniform 1D mesh of `n_cells` intervals on an interval of `length`.
    pub fn uniform_line(n_cells: usize, length: f64) -> Self {
        Self::new(n_cells, length / n_cells.max(1) as f64, GeometryTag::LINE)
    }

    /// Uniform `n × n` mesh of the unit square.
    ///
    /// Triangles split each square in two, so the cell count doubles.
    pub fn unit_square(n: usize, geometry: GeometryTag) -> Self {
        let n_cells = if geometry == GeometryTag::TRIANGLE {
            2 * n * n
        } else {
            n * n
        };
        Self::new(n_cells, 1.0 / n.max(1) as f64, geometry)
    }

    /// Spatial dimension.
    pub fn dimension(&self) -> usize {
        self.geometry.dimension()
    }

    /// Check that the mesh can be run on.
    pub fn validate(&self) -> Result<()> {
        if self.n_cells == 0 {
            return Err(VerificationError::config("mesh has no cells"));
        }
        if !(self.h > 0.0 && self.h.is_finite()) {
            return Err(VerificationError::config(format!(
                "cell size must be positive, got {}",
                self.h
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Run outcome
// =============================================================================

/// What the external solver reports for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    /// L2 norm of (numerical − exact) at the final time
    pub error_l2: f64,
    /// Number of time steps taken, `None` for stationary problems
    pub n_steps: Option<usize>,
    /// Snapshot files written
    pub snapshots: Vec<PathBuf>,
}

impl RunOutcome {
    /// Outcome of a stationary solve.
    pub fn stationary(error_l2: f64) -> Self {
        Self {
            error_l2,
            n_steps: None,
            snapshots: Vec::new(),
        }
    }

    /// Outcome of a transient solve.
    pub fn transient(error_l2: f64, n_steps: usize) -> Self {
        Self {
            error_l2,
            n_steps: Some(n_steps),
            snapshots: Vec::new(),
        }
    }

    pub fn with_snapshots(mut self, snapshots: Vec<PathBuf>) -> Self {
        self.snapshots = snapshots;
        self
    }
}

// =============================================================================
// ExternalSolver trait
// =============================================================================

/// An external FE engine that can run a manufactured problem.
///
/// Implementations should report their own failures through
/// [`VerificationError::external`], which keeps the engine's error as the
/// source without rewording it.
pub trait ExternalSolver: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Run one problem on one mesh.
    fn solve(&self, problem: &ProblemDefinition, mesh: &MeshSpec) -> Result<RunOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_constructors() {
        let m = MeshSpec::uniform_line(8, 2.0);
        assert_eq!(m.h, 0.25);
        assert_eq!(m.dimension(), 1);

        let t = MeshSpec::unit_square(4, GeometryTag::TRIANGLE);
        assert_eq!(t.n_cells, 32);
        assert_eq!(t.dimension(), 2);
        let q = MeshSpec::unit_square(4, GeometryTag::QUADRILATERAL);
        assert_eq!(q.n_cells, 16);
    }

    #[test]
    fn test_mesh_validation() {
        assert!(MeshSpec::uniform_line(4, 1.0).validate().is_ok());
        assert!(MeshSpec::new(0, 0.1, GeometryTag::LINE).validate().is_err());
        assert!(MeshSpec::new(4, 0.0, GeometryTag::LINE).validate().is_err());
    }
}
