//! Persisted run results and output file layout.
//!
//! This module provides:
//! - **Results tables**: CSV reader/writer for per-run error norms
//! - **Study layout**: `<study>/h<r>/o<p>/results.csv` discovery
//! - **Snapshot naming**: output trunks and zero-padded step file names
//!
//! # Example
//!
//! ```no_run
//! use dg_mms::analysis::compute_orders;
//! use dg_mms::io::{read_study, write_annotated, StudyLayout, ORDERS_FILE};
//!
//! let layout = StudyLayout::new("outputs/parametric/burgers");
//! let table = read_study(&layout)?;
//! let annotated = compute_orders(&table.records, 1);
//! write_annotated(layout.root().join(ORDERS_FILE), &annotated)?;
//! # Ok::<(), dg_mms::VerificationError>(())
//! ```

mod layout;
mod results;

pub use layout::{
    ORDERS_FILE, OutputFormat, RESULTS_FILE, RunLocation, StudyLayout, clear_snapshots, output_trunk,
    snapshot_name,
};
pub use results::{
    ResultsTable, parse_bool, read_results, read_study, write_annotated, write_results,
};
