//! Timestep selection for transient problems.

mod timestep;

pub use timestep::{DtSource, TimestepBudget, TimestepPolicy, stable_dt};
