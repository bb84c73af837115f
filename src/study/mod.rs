//! Parametric convergence studies.
//!
//! A [`ParameterSweep`] enumerates runs over orders, refinement levels and
//! scheme parameters; a [`StudyRunner`] pushes each run through an
//! [`ExternalSolver`](crate::problem::ExternalSolver) and persists the rows
//! under the [`StudyLayout`](crate::io::StudyLayout) for later analysis.

mod runner;
mod sweep;

pub use runner::{CaseFailure, StudyReport, StudyRunner};
pub use sweep::{ParameterSweep, SweepCase};
