//! On-disk layout of studies and run outputs.
//!
//! A study directory holds one run directory per (refinement, order) pair:
//!
//! ```text
//! <study>/h<refinement>/o<order>/results.csv
//! ```
//!
//! Snapshot files of one run share a trunk `<out>/<order>/<example><order>`
//! and are numbered `<trunk>.<step>.<ext>`, zero-padded to the width of the
//! step count so they sort lexically.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name of a per-run results table.
pub const RESULTS_FILE: &str = "results.csv";

/// Default file name of the annotated table written into a study root.
pub const ORDERS_FILE: &str = "orders.csv";

/// Snapshot file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Legacy VTK
    #[default]
    Vtk,
    /// Gmsh mesh/data
    Msh,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Vtk => "vtk",
            OutputFormat::Msh => "msh",
        }
    }
}

/// Output trunk of one run: `<out>/<order>/<example><order>`.
pub fn output_trunk(out: impl AsRef<Path>, example_name: &str, order: usize) -> PathBuf {
    out.as_ref()
        .join(order.to_string())
        .join(format!("{example_name}{order}"))
}

/// Snapshot file name `<trunk>.<step>.<ext>`.
///
/// The step is zero-padded to the number of digits of `n_steps`.
pub fn snapshot_name(trunk: &Path, step: usize, n_steps: usize, format: OutputFormat) -> PathBuf {
    let width = n_steps.max(1).to_string().len();
    let mut name = trunk.as_os_str().to_owned();
    name.push(format!(".{step:0width$}.{}", format.extension()));
    PathBuf::from(name)
}

/// Whether `path` is a snapshot of `trunk` in `format`.
fn is_snapshot_of(path: &Path, trunk_name: &str, format: OutputFormat) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let Some(rest) = name.strip_prefix(trunk_name).and_then(|r| r.strip_prefix('.')) else {
        return false;
    };
    let Some(step) = rest.strip_suffix(format.extension()).and_then(|s| s.strip_suffix('.'))
    else {
        return false;
    };
    !step.is_empty() && step.bytes().all(|b| b.is_ascii_digit())
}

/// Remove snapshots left over from an earlier run with the same trunk.
///
/// Returns the number of files removed. A missing directory is not an error.
pub fn clear_snapshots(trunk: &Path, format: OutputFormat) -> Result<usize> {
    let (Some(dir), Some(trunk_name)) = (trunk.parent(), trunk.file_name().and_then(|n| n.to_str()))
    else {
        return Ok(0);
    };
    if !dir.is_dir() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_snapshot_of(&path, trunk_name, format) {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    if removed > 0 {
        log::debug!("Removed {} stale snapshots of {}", removed, trunk.display());
    }
    Ok(removed)
}

/// Parse a numbered directory name such as `h3` or `o2`.
fn parse_level(name: &str, prefix: char) -> Option<usize> {
    name.strip_prefix(prefix)?.parse().ok()
}

/// A results table found in a study directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunLocation {
    /// Refinement level, `None` for tables stored at the study root
    pub refinement: Option<usize>,
    /// Polynomial order, `None` for tables stored at the study root
    pub order: Option<usize>,
    pub path: PathBuf,
}

/// Directory layout of one parametric study.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudyLayout {
    root: PathBuf,
}

impl StudyLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Study identifier: the last component of the study directory.
    pub fn expid(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Directory of one run.
    pub fn run_dir(&self, refinement: usize, order: usize) -> PathBuf {
        self.root
            .join(format!("h{refinement}"))
            .join(format!("o{order}"))
    }

    /// Results table of one run.
    pub fn results_path(&self, refinement: usize, order: usize) -> PathBuf {
        self.run_dir(refinement, order).join(RESULTS_FILE)
    }

    /// Find every results table of the study.
    ///
    /// Tables under `h<r>/o<p>/` come first, sorted by refinement then order;
    /// `*.csv` files directly in the study root follow in name order, except
    /// the annotated [`ORDERS_FILE`]. Directories not matching the pattern
    /// are ignored.
    pub fn discover(&self) -> Result<Vec<RunLocation>> {
        let mut nested = Vec::new();
        let mut flat = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if path.is_file() {
                if path.extension().is_some_and(|e| e == "csv") && name != ORDERS_FILE {
                    flat.push(RunLocation {
                        refinement: None,
                        order: None,
                        path,
                    });
                }
                continue;
            }

            let Some(refinement) = parse_level(&name, 'h') else {
                continue;
            };
            for order_entry in fs::read_dir(&path)? {
                let order_path = order_entry?.path();
                let Some(order) = order_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|n| parse_level(n, 'o'))
                else {
                    continue;
                };
                let results = order_path.join(RESULTS_FILE);
                if results.is_file() {
                    nested.push(RunLocation {
                        refinement: Some(refinement),
                        order: Some(order),
                        path: results,
                    });
                }
            }
        }

        nested.sort_by_key(|l| (l.refinement, l.order));
        flat.sort_by(|a, b| a.path.cmp(&b.path));
        nested.extend(flat);
        Ok(nested)
    }
}
