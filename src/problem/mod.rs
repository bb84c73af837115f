//! Verification problems and the external solver seam.
//!
//! A [`ProblemDefinition`] bundles everything one external run needs:
//!
//! - the composed [`WeakForm`](crate::weak_form::WeakForm)
//! - the [`ManufacturedSolutionProvider`](crate::mms::ManufacturedSolutionProvider)
//!   with its named solver functions
//! - the timestep policy for transient problems
//!
//! [`ExternalSolver`] is the trait the FE engine implements; this crate never
//! assembles or solves anything itself.

mod builder;
mod solver;

pub use builder::{
    BOUNDARY_FN, INITIAL_FN, ProblemBuilder, ProblemDefinition, SOLUTION_FN, SOURCE_FN,
};
pub use solver::{ExternalSolver, MeshSpec, RunOutcome};
