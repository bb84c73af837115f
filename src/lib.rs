//! # dg-mms
//!
//! Method-of-manufactured-solutions verification for discontinuous Galerkin
//! discretizations of scalar advection, diffusion and nonlinear conservation
//! laws.
//!
//! This crate provides the parts of a convergence study that do not depend
//! on a particular finite-element engine:
//! - Weak-form composition for interior-penalty schemes (SIPG, IIPG, NIPG)
//! - Manufactured solutions with exact boundary traces and sources
//! - CFL-driven timestep selection
//! - Empirical convergence orders from persisted result tables
//! - Parameter sweeps driven through an external solver

pub mod analysis;
pub mod config;
pub mod equations;
pub mod error;
pub mod flux;
pub mod io;
pub mod mms;
pub mod problem;
pub mod study;
pub mod time;
pub mod types;
pub mod weak_form;

// Re-export main types for convenience
pub use error::{Result, VerificationError};
pub use types::{Coords, GeometryTag};

// Composition
pub use equations::{AdvectionModel, AdvectiveFlux, Burgers, LinearAdvection, TargetEquation};
pub use flux::{NumericalFlux, StandardFlux};
pub use weak_form::{
    DiffusionScheme, EquationComposer, FluxKind, SchemeSelection, TermKind, WeakForm,
};

// Manufactured solutions
pub use mms::{
    AnalyticProfile, BoundaryTraceRequest, FunctionRegistry, ManufacturedSolutionProvider,
    ProfileKind, Trace,
};

// Time stepping
pub use time::{TimestepBudget, TimestepPolicy, stable_dt};

// Problems and studies
pub use config::ProblemOptions;
pub use problem::{ExternalSolver, MeshSpec, ProblemBuilder, ProblemDefinition, RunOutcome};
pub use study::{ParameterSweep, StudyRunner};

// Analysis
pub use analysis::{ConvergenceAnalyzer, ConvergenceRecord, EmpiricalOrder, compute_orders};
pub use io::{StudyLayout, read_results, write_annotated};
