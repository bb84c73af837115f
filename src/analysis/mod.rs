//! Convergence analysis of persisted run results.
//!
//! This module provides tools for:
//! - Partitioning heterogeneous parameter sweeps into comparable series
//! - Computing empirical convergence orders between refinement levels
//! - Aggregating orders per study and laying results out for plots
//!
//! # Mathematical Background
//!
//! For an error model e ≈ C · N^{−q/d} with N ∝ h^{−d} cells, two
//! consecutive refinement levels give
//!
//! ```text
//! q = ln(e₂ / e₁) / ln((h₂ / h₁)^d)
//! ```
//!
//! # Example
//!
//! ```
//! use dg_mms::analysis::{ConvergenceAnalyzer, ConvergenceRecord, EmpiricalOrder, ParameterKey};
//! use dg_mms::types::GeometryTag;
//!
//! let key = ParameterKey::new(GeometryTag::LINE);
//! let records: Vec<_> = [(1, 1.0, 1e-2), (2, 0.5, 2.5e-3), (4, 0.25, 6.25e-4)]
//!     .iter()
//!     .map(|&(n, h, e)| ConvergenceRecord::new("study", n, h, 1, key, e))
//!     .collect();
//!
//! let report = ConvergenceAnalyzer::with_fixed_dimension(1).analyze(&records);
//! let orders = report.series[0].orders();
//! assert_eq!(orders[0], EmpiricalOrder::Undefined);
//! assert!((orders[2].value().unwrap() - 2.0).abs() < 1e-10);
//! ```

mod aggregate;
mod convergence;
mod records;

pub use aggregate::{FacetAxis, FacetGrid, OrderMean, mean_orders};
pub use convergence::{
    AnalysisWarning, AnnotatedRecord, ConvergenceAnalyzer, ConvergenceReport, Dimension,
    EmpiricalOrder, EmpiricalOrderSeries, GroupKey, compute_orders, empirical_order,
};
pub use records::{ConvergenceRecord, ParameterKey};
