//! Empirical convergence orders.
//!
//! Records are partitioned by study id, parameter key and polynomial order.
//! Within a partition they are sorted by ascending cell count and each
//! consecutive pair yields
//!
//! q = ln(e₂ / e₁) / ln((h₂ / h₁)^d)
//!
//! The first point of every partition has no predecessor and carries
//! [`EmpiricalOrder::Undefined`]. Degenerate pairs (equal h, zero error)
//! yield NaN and a recorded warning. Partitions never interact; a malformed
//! partition is skipped with a warning while the others are still analyzed.

use std::collections::BTreeMap;
use std::fmt;

use super::records::{ConvergenceRecord, ParameterKey};

/// Empirical order attached to one record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EmpiricalOrder {
    /// First point of a partition
    Undefined,
    /// Order from the previous point; NaN for degenerate pairs
    Value(f64),
}

impl EmpiricalOrder {
    /// The numeric value, `None` for the undefined first point.
    pub fn value(&self) -> Option<f64> {
        match self {
            EmpiricalOrder::Undefined => None,
            EmpiricalOrder::Value(q) => Some(*q),
        }
    }

    /// Whether a finite order is available.
    pub fn is_defined(&self) -> bool {
        matches!(self, EmpiricalOrder::Value(q) if q.is_finite())
    }
}

impl fmt::Display for EmpiricalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmpiricalOrder::Undefined => f.write_str("-"),
            EmpiricalOrder::Value(q) => write!(f, "{q:.3}"),
        }
    }
}

/// How the spatial dimension d of the order formula is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dimension {
    /// Same d for every partition
    Fixed(usize),
    /// Leading digit of each partition's geometry tag
    #[default]
    FromGeometry,
}

/// Order between two consecutive refinement levels.
///
/// Returns NaN when the pair is degenerate.
pub fn empirical_order(prev_h: f64, prev_e: f64, h: f64, e: f64, dim: usize) -> f64 {
    let denominator = (h / prev_h).powi(dim as i32).ln();
    if prev_e <= 0.0 || e <= 0.0 || denominator == 0.0 || !denominator.is_finite() {
        return f64::NAN;
    }
    (e / prev_e).ln() / denominator
}

/// Partition identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub expid: String,
    pub key: ParameterKey,
    pub order: usize,
}

impl GroupKey {
    /// Partition a record belongs to.
    pub fn of(record: &ConvergenceRecord) -> Self {
        Self {
            expid: record.expid.clone(),
            key: record.key,
            order: record.order,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] order {}, {}", self.expid, self.order, self.key)
    }
}

/// A record together with its empirical order.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedRecord {
    pub record: ConvergenceRecord,
    pub order: EmpiricalOrder,
}

impl AnnotatedRecord {
    /// Numeric order: `None` when undefined, NaN when degenerate.
    pub fn num_order(&self) -> Option<f64> {
        self.order.value()
    }
}

/// Records of one partition in ascending cell count, with orders.
#[derive(Clone, Debug, PartialEq)]
pub struct EmpiricalOrderSeries {
    pub group: GroupKey,
    pub points: Vec<AnnotatedRecord>,
}

impl EmpiricalOrderSeries {
    /// Orders in refinement order.
    pub fn orders(&self) -> Vec<EmpiricalOrder> {
        self.points.iter().map(|p| p.order).collect()
    }

    /// Order of the finest pair, if finite.
    pub fn final_order(&self) -> Option<f64> {
        self.points
            .last()
            .and_then(|p| p.num_order())
            .filter(|q| q.is_finite())
    }

    /// Mean of the finite orders.
    pub fn mean_order(&self) -> Option<f64> {
        let finite: Vec<f64> = self
            .points
            .iter()
            .filter_map(|p| p.num_order())
            .filter(|q| q.is_finite())
            .collect();
        if finite.is_empty() {
            None
        } else {
            Some(finite.iter().sum::<f64>() / finite.len() as f64)
        }
    }
}

/// A problem found while analyzing one partition.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisWarning {
    pub group: GroupKey,
    pub message: String,
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.group, self.message)
    }
}

/// Analyzer output: one series per usable partition plus all warnings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConvergenceReport {
    pub series: Vec<EmpiricalOrderSeries>,
    pub warnings: Vec<AnalysisWarning>,
    /// Partitions skipped entirely
    pub skipped: Vec<GroupKey>,
}

impl ConvergenceReport {
    /// All annotated records, partition by partition.
    pub fn annotated(&self) -> impl Iterator<Item = &AnnotatedRecord> {
        self.series.iter().flat_map(|s| s.points.iter())
    }

    /// Flatten into owned annotated records.
    pub fn into_annotated(self) -> Vec<AnnotatedRecord> {
        self.series.into_iter().flat_map(|s| s.points).collect()
    }

    /// Series for a partition.
    pub fn series_for(&self, group: &GroupKey) -> Option<&EmpiricalOrderSeries> {
        self.series.iter().find(|s| &s.group == group)
    }
}

/// Computes empirical orders from heterogeneous result tables.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConvergenceAnalyzer {
    dimension: Dimension,
}

impl ConvergenceAnalyzer {
    pub fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }

    /// Use the same dimension for every partition.
    pub fn with_fixed_dimension(dim: usize) -> Self {
        Self::new(Dimension::Fixed(dim))
    }

    /// Partition, sort and difference the records.
    pub fn analyze(&self, records: &[ConvergenceRecord]) -> ConvergenceReport {
        let mut groups: BTreeMap<GroupKey, Vec<ConvergenceRecord>> = BTreeMap::new();
        for r in records {
            groups.entry(GroupKey::of(r)).or_default().push(r.clone());
        }

        let mut report = ConvergenceReport::default();
        for (group, mut members) in groups {
            match self.analyze_group(&group, &mut members, &mut report.warnings) {
                Some(points) => report.series.push(EmpiricalOrderSeries { group, points }),
                None => report.skipped.push(group),
            }
        }

        log::debug!(
            "analyzed {} records into {} series ({} skipped)",
            records.len(),
            report.series.len(),
            report.skipped.len()
        );
        report
    }

    fn analyze_group(
        &self,
        group: &GroupKey,
        members: &mut [ConvergenceRecord],
        warnings: &mut Vec<AnalysisWarning>,
    ) -> Option<Vec<AnnotatedRecord>> {
        let mut warn = |message: String| {
            log::warn!("{group}: {message}");
            warnings.push(AnalysisWarning {
                group: group.clone(),
                message,
            });
        };

        if let Some(bad) = members.iter().find(|r| !r.is_valid()) {
            warn(format!(
                "skipped, invalid row with n_cells {} (h = {}, error = {})",
                bad.n_cells, bad.h, bad.error
            ));
            return None;
        }

        members.sort_by_key(|r| r.n_cells);
        if let Some(pair) = members.windows(2).find(|w| w[0].n_cells == w[1].n_cells) {
            warn(format!(
                "skipped, duplicate runs with n_cells {}",
                pair[0].n_cells
            ));
            return None;
        }

        let dim = match self.dimension {
            Dimension::Fixed(d) => d,
            Dimension::FromGeometry => group.key.geometry.dimension(),
        };

        let mut points = Vec::with_capacity(members.len());
        let mut prev: Option<&ConvergenceRecord> = None;
        for r in members.iter() {
            let order = match prev {
                None => EmpiricalOrder::Undefined,
                Some(p) => {
                    let q = empirical_order(p.h, p.error, r.h, r.error, dim);
                    if q.is_nan() {
                        warn(format!(
                            "degenerate pair between n_cells {} and {}",
                            p.n_cells, r.n_cells
                        ));
                    }
                    EmpiricalOrder::Value(q)
                }
            };
            points.push(AnnotatedRecord {
                record: r.clone(),
                order,
            });
            prev = Some(r);
        }
        Some(points)
    }
}

/// Annotate records with empirical orders for a fixed dimension.
pub fn compute_orders(records: &[ConvergenceRecord], dim: usize) -> Vec<AnnotatedRecord> {
    ConvergenceAnalyzer::with_fixed_dimension(dim)
        .analyze(records)
        .into_annotated()
}
