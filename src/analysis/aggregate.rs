//! Aggregated and faceted views of annotated records.
//!
//! These are pure data transformations for reporting and plotting; no order
//! computation happens here.

use std::collections::BTreeMap;

use super::convergence::{AnnotatedRecord, GroupKey};

/// Mean values of one series.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderMean {
    /// Study, parameter combination and polynomial order
    pub group: GroupKey,
    /// Mean empirical order; undefined and non-finite points are skipped
    pub mean_order: Option<f64>,
    /// Number of points that contributed to `mean_order`
    pub order_count: usize,
    pub mean_h: f64,
    pub mean_error: f64,
    /// Number of records in the group
    pub count: usize,
}

/// Mean empirical order per series: (expid, parameter key, order).
///
/// Runs with different penalties, diffusion coefficients, limiting or
/// geometry never share a mean. Undefined first points and NaN or infinite
/// orders are left out of the order mean, the way a NaN-skipping mean would;
/// they still count towards the h and error means.
pub fn mean_orders(records: &[AnnotatedRecord]) -> Vec<OrderMean> {
    let mut groups: BTreeMap<GroupKey, Vec<&AnnotatedRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(GroupKey::of(&r.record)).or_default().push(r);
    }

    groups
        .into_iter()
        .map(|(group, members)| {
            let n = members.len() as f64;
            let finite: Vec<f64> = members
                .iter()
                .filter_map(|r| r.num_order())
                .filter(|q| q.is_finite())
                .collect();
            let mean_order = if finite.is_empty() {
                None
            } else {
                Some(finite.iter().sum::<f64>() / finite.len() as f64)
            };
            OrderMean {
                group,
                mean_order,
                order_count: finite.len(),
                mean_h: members.iter().map(|r| r.record.h).sum::<f64>() / n,
                mean_error: members.iter().map(|r| r.record.error).sum::<f64>() / n,
                count: members.len(),
            }
        })
        .collect()
}

/// A column of the annotated table that can split a facet grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacetAxis {
    Expid,
    Order,
    DiffCoef,
    Cw,
    Limit,
    Geometry,
}

impl FacetAxis {
    /// Column name in the result table.
    pub fn name(&self) -> &'static str {
        match self {
            FacetAxis::Expid => "expid",
            FacetAxis::Order => "order",
            FacetAxis::DiffCoef => "diffcoef",
            FacetAxis::Cw => "cw",
            FacetAxis::Limit => "limit",
            FacetAxis::Geometry => "gel",
        }
    }

    /// Label of a record on this axis.
    pub fn label(&self, r: &AnnotatedRecord) -> String {
        let opt = |v: Option<f64>| v.map_or_else(|| "none".to_string(), |x| format!("{x:e}"));
        match self {
            FacetAxis::Expid => r.record.expid.clone(),
            FacetAxis::Order => r.record.order.to_string(),
            FacetAxis::DiffCoef => opt(r.record.key.diffcoef),
            FacetAxis::Cw => opt(r.record.key.cw),
            FacetAxis::Limit => r.record.key.limit.to_string(),
            FacetAxis::Geometry => r.record.key.geometry.to_string(),
        }
    }
}

/// Distinct labels in order of first appearance.
fn unique_labels(records: &[AnnotatedRecord], axis: FacetAxis) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for r in records {
        let l = axis.label(r);
        if !labels.contains(&l) {
            labels.push(l);
        }
    }
    labels
}

/// Records laid out on a row × column grid, each cell split by colour.
#[derive(Debug)]
pub struct FacetGrid<'a> {
    pub row_axis: FacetAxis,
    pub column_axis: FacetAxis,
    pub color_axis: FacetAxis,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub colors: Vec<String>,
    cells: Vec<Vec<&'a AnnotatedRecord>>,
}

impl<'a> FacetGrid<'a> {
    /// Partition records by two axes plus a colour axis.
    ///
    /// Within a cell and colour, records keep their input order.
    pub fn new(
        records: &'a [AnnotatedRecord],
        row_axis: FacetAxis,
        column_axis: FacetAxis,
        color_axis: FacetAxis,
    ) -> Self {
        let rows = unique_labels(records, row_axis);
        let columns = unique_labels(records, column_axis);
        let colors = unique_labels(records, color_axis);

        let mut cells = vec![Vec::new(); rows.len() * columns.len() * colors.len()];
        let index = |labels: &[String], l: &str| labels.iter().position(|x| x == l);
        for r in records {
            let (Some(i), Some(j), Some(k)) = (
                index(&rows, &row_axis.label(r)),
                index(&columns, &column_axis.label(r)),
                index(&colors, &color_axis.label(r)),
            ) else {
                continue;
            };
            cells[(i * columns.len() + j) * colors.len() + k].push(r);
        }

        Self {
            row_axis,
            column_axis,
            color_axis,
            rows,
            columns,
            colors,
            cells,
        }
    }

    /// Grid shape (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Records of one cell and colour.
    pub fn cell(&self, row: usize, column: usize, color: usize) -> &[&'a AnnotatedRecord] {
        let idx = (row * self.columns.len() + column) * self.colors.len() + color;
        self.cells.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Title of a cell, e.g. `diffcoef: 1e-3, cw: 1e2`.
    pub fn title(&self, row: usize, column: usize) -> String {
        format!(
            "{}: {}, {}: {}",
            self.row_axis.name(),
            self.rows[row],
            self.column_axis.name(),
            self.columns[column]
        )
    }
}
