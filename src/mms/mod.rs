//! Method of manufactured solutions.
//!
//! A manufactured solution is a closed-form field u chosen up front; the
//! source g = L[u] is then derived analytically so that u solves
//! L[u] = g exactly. Boundary data come from traces of u on the domain edges.
//!
//! - [`AnalyticProfile`]: value, gradient, time derivative and Laplacian of a
//!   closed-form field
//! - [`ManufacturedSolutionProvider`]: one profile plus its target equation,
//!   serving boundary traces and the source
//! - [`FunctionRegistry`]: the named callables handed to the external solver
//!
//! # Example
//!
//! ```
//! use dg_mms::equations::{LinearAdvection, TargetEquation};
//! use dg_mms::mms::{ExponentialLayer, ManufacturedSolutionProvider, Trace};
//!
//! let eps = 0.1;
//! let equation = TargetEquation::advection_diffusion(LinearAdvection::new([1.0, 1.0]), eps);
//! let provider = ManufacturedSolutionProvider::new(ExponentialLayer::new(eps), equation);
//!
//! // u vanishes on the right edge
//! let trace = provider.trace_labeled([1.0, 0.5], 0.0, "right", 0).unwrap();
//! assert!(matches!(trace, Trace::Value(v) if v.abs() < 1e-12));
//!
//! let g = provider.source([0.3, 0.4], 0.0).unwrap();
//! assert!(g.is_finite());
//! ```

mod boundary;
mod profiles;
mod provider;
mod registry;

pub use boundary::{
    BOUNDARY_EDGE_NAMES, BoundaryEdge, BoundaryTraceRequest, DerivativeOrder, Trace,
};
pub use profiles::{
    AnalyticProfile, ArctanLayer, ExponentialLayer, PROFILE_NAMES, ProfileKind, ProfileParams,
    SineWave, TanhFront,
};
pub use provider::ManufacturedSolutionProvider;
pub use registry::{
    FieldFn, FunctionBody, FunctionRegistry, FunctionRole, SolverFunction, TraceFn,
};
