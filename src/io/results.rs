//! Results tables: one row per run.
//!
//! # Columns
//!
//! ```text
//! n_cells,order,diff_l2,h,gel,diffcoef,cw,limit,expid
//! 16,1,0.0123,0.0625,1_2,0.001,100.0,False,burgers
//! ```
//!
//! `n_cells`, `order`, `diff_l2`, `h` and `gel` are required. `diffcoef` and
//! `cw` may be empty, `limit` accepts `True`/`False` as well as `true`/`1`,
//! and a missing `expid` is filled from the study directory. Columns are
//! looked up by header name, so a leading unnamed index column or any other
//! extra column is ignored.
//!
//! Annotated tables add `num_order` (empty for the first point of a series,
//! `NaN` for degenerate pairs) and `h-2` (1/h²).

use std::path::Path;

use csv::StringRecord;
use serde::Serialize;

use crate::analysis::{AnnotatedRecord, ConvergenceRecord, ParameterKey};
use crate::error::{Result, VerificationError};
use crate::types::GeometryTag;

use super::layout::StudyLayout;

const REQUIRED_COLUMNS: [&str; 5] = ["n_cells", "order", "diff_l2", "h", "gel"];

/// Records read from one table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultsTable {
    pub records: Vec<ConvergenceRecord>,
    /// Rows that could not be parsed
    pub skipped_rows: usize,
}

/// Column positions resolved from the header.
struct Columns {
    n_cells: usize,
    order: usize,
    diff_l2: usize,
    h: usize,
    gel: usize,
    diffcoef: Option<usize>,
    cw: Option<usize>,
    limit: Option<usize>,
    expid: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> std::result::Result<Self, String> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| find(*c).is_none())
            .collect();
        let [Some(n_cells), Some(order), Some(diff_l2), Some(h), Some(gel)] =
            REQUIRED_COLUMNS.map(|c| find(c))
        else {
            return Err(format!(
                "missing required column(s): {}",
                missing.join(", ")
            ));
        };

        Ok(Self {
            n_cells,
            order,
            diff_l2,
            h,
            gel,
            diffcoef: find("diffcoef"),
            cw: find("cw"),
            limit: find("limit"),
            expid: find("expid"),
        })
    }
}

fn field<'a>(row: &'a StringRecord, idx: usize, name: &str) -> std::result::Result<&'a str, String> {
    row.get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("empty '{name}'"))
}

fn parse_float(s: &str, name: &str) -> std::result::Result<f64, String> {
    s.parse::<f64>()
        .map_err(|_| format!("'{name}' is not a number: '{s}'"))
}

/// Integer column, tolerating float spellings such as `16.0`.
fn parse_count(s: &str, name: &str) -> std::result::Result<usize, String> {
    if let Ok(n) = s.parse::<usize>() {
        return Ok(n);
    }
    let x = parse_float(s, name)?;
    if x >= 0.0 && x.fract() == 0.0 && x <= usize::MAX as f64 {
        Ok(x as usize)
    } else {
        Err(format!("'{name}' is not a non-negative integer: '{s}'"))
    }
}

fn parse_optional_float(
    row: &StringRecord,
    idx: Option<usize>,
    name: &str,
) -> std::result::Result<Option<f64>, String> {
    match idx.and_then(|i| row.get(i)).map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_float(s, name).map(Some),
    }
}

/// Boolean spelled the Python or the Rust way.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "True" | "true" | "TRUE" | "1" => Some(true),
        "False" | "false" | "FALSE" | "0" | "" => Some(false),
        _ => None,
    }
}

fn parse_row(
    row: &StringRecord,
    cols: &Columns,
    default_expid: &str,
) -> std::result::Result<ConvergenceRecord, String> {
    let n_cells = parse_count(field(row, cols.n_cells, "n_cells")?, "n_cells")?;
    let order = parse_count(field(row, cols.order, "order")?, "order")?;
    let error = parse_float(field(row, cols.diff_l2, "diff_l2")?, "diff_l2")?;
    let h = parse_float(field(row, cols.h, "h")?, "h")?;
    let geometry: GeometryTag = field(row, cols.gel, "gel")?
        .parse()
        .map_err(|e: VerificationError| e.to_string())?;

    let limit = match cols.limit.and_then(|i| row.get(i)) {
        None => false,
        Some(s) => parse_bool(s).ok_or_else(|| format!("'limit' is not a boolean: '{s}'"))?,
    };

    let mut key = ParameterKey::new(geometry).with_limit(limit);
    key.diffcoef = parse_optional_float(row, cols.diffcoef, "diffcoef")?;
    key.cw = parse_optional_float(row, cols.cw, "cw")?;

    let expid = cols
        .expid
        .and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_expid);

    Ok(ConvergenceRecord::new(expid, n_cells, h, order, key, error))
}

/// Read a results table.
///
/// Rows that cannot be parsed are skipped with a warning and counted in
/// [`ResultsTable::skipped_rows`].
///
/// # Errors
/// `Data` when a required column is missing, `Csv`/`Io` when the file
/// cannot be read at all.
pub fn read_results(path: impl AsRef<Path>, default_expid: &str) -> Result<ResultsTable> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let cols = Columns::resolve(reader.headers()?)
        .map_err(|e| VerificationError::data(format!("{}: {e}", path.display())))?;

    let mut table = ResultsTable::default();
    for (i, row) in reader.records().enumerate() {
        // Header is line 1
        let line = i + 2;
        let parsed = row
            .map_err(|e| e.to_string())
            .and_then(|row| parse_row(&row, &cols, default_expid));
        match parsed {
            Ok(record) => table.records.push(record),
            Err(message) => {
                log::warn!("{}:{}: skipping row: {}", path.display(), line, message);
                table.skipped_rows += 1;
            }
        }
    }

    log::debug!(
        "Read {} records from {} ({} skipped)",
        table.records.len(),
        path.display(),
        table.skipped_rows
    );
    Ok(table)
}

/// Read every results table of a study.
///
/// Rows without an `expid` are attributed to the study directory name.
/// Annotated tables in the study root (with a `num_order` column) are
/// outputs of a previous analysis and are not read back.
pub fn read_study(layout: &StudyLayout) -> Result<ResultsTable> {
    let expid = layout.expid();
    let mut all = ResultsTable::default();
    for location in layout.discover()? {
        if location.refinement.is_none() && is_annotated(&location.path)? {
            log::info!("{}: annotated table, not a run result", location.path.display());
            continue;
        }
        let table = read_results(&location.path, &expid)?;
        all.records.extend(table.records);
        all.skipped_rows += table.skipped_rows;
    }
    Ok(all)
}

/// Whether a table carries the derived `num_order` column.
fn is_annotated(path: &Path) -> Result<bool> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    Ok(reader.headers()?.iter().any(|h| h == "num_order"))
}

#[derive(Serialize)]
struct ResultRow<'a> {
    n_cells: usize,
    order: usize,
    diff_l2: f64,
    h: f64,
    gel: GeometryTag,
    diffcoef: Option<f64>,
    cw: Option<f64>,
    limit: bool,
    expid: &'a str,
}

impl<'a> From<&'a ConvergenceRecord> for ResultRow<'a> {
    fn from(r: &'a ConvergenceRecord) -> Self {
        Self {
            n_cells: r.n_cells,
            order: r.order,
            diff_l2: r.error,
            h: r.h,
            gel: r.key.geometry,
            diffcoef: r.key.diffcoef,
            cw: r.key.cw,
            limit: r.key.limit,
            expid: &r.expid,
        }
    }
}

#[derive(Serialize)]
struct AnnotatedRow<'a> {
    n_cells: usize,
    order: usize,
    diff_l2: f64,
    h: f64,
    gel: GeometryTag,
    diffcoef: Option<f64>,
    cw: Option<f64>,
    limit: bool,
    expid: &'a str,
    num_order: Option<f64>,
    #[serde(rename = "h-2")]
    inv_h_squared: f64,
}

impl<'a> From<&'a AnnotatedRecord> for AnnotatedRow<'a> {
    fn from(a: &'a AnnotatedRecord) -> Self {
        let base = ResultRow::from(&a.record);
        Self {
            n_cells: base.n_cells,
            order: base.order,
            diff_l2: base.diff_l2,
            h: base.h,
            gel: base.gel,
            diffcoef: base.diffcoef,
            cw: base.cw,
            limit: base.limit,
            expid: base.expid,
            num_order: a.num_order(),
            inv_h_squared: a.record.inv_h_squared(),
        }
    }
}

/// Write run records as a results table.
pub fn write_results(path: impl AsRef<Path>, records: &[ConvergenceRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for r in records {
        writer.serialize(ResultRow::from(r))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write annotated records with `num_order` and `h-2` columns.
pub fn write_annotated(path: impl AsRef<Path>, records: &[AnnotatedRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for r in records {
        writer.serialize(AnnotatedRow::from(r))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_pandas_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "results.csv",
            ",n_cells,order,diff_l2,h,gel,diffcoef,cw,limit\n\
             0,16,1,0.01,0.0625,1_2,0.001,100.0,False\n\
             1,32,1,0.0025,0.03125,1_2,,,True\n",
        );
        let table = read_results(&path, "burgers").unwrap();
        assert_eq!(table.skipped_rows, 0);
        assert_eq!(table.records.len(), 2);

        let first = &table.records[0];
        assert_eq!(first.expid, "burgers");
        assert_eq!(first.n_cells, 16);
        assert_eq!(first.key.diffcoef, Some(0.001));
        assert!(!first.key.limit);
        assert_eq!(first.key.geometry, GeometryTag::LINE);

        let second = &table.records[1];
        assert_eq!(second.key.diffcoef, None);
        assert_eq!(second.key.cw, None);
        assert!(second.key.limit);
    }

    #[test]
    fn test_missing_required_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "r.csv", "n_cells,order,h,gel\n4,1,0.25,1_2\n");
        let err = read_results(&path, "x").unwrap_err();
        assert!(err.is_data());
        assert!(err.to_string().contains("diff_l2"));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "r.csv",
            "n_cells,order,diff_l2,h,gel,limit,expid\n\
             4,1,0.1,0.25,1_2,False,a\n\
             8,1,,0.125,1_2,False,a\n\
             16,1,0.01,0.0625,line,False,a\n\
             32,1,0.001,0.03125,1_2,maybe,a\n\
             64.0,1,0.0001,0.015625,2_3,0,\n",
        );
        let table = read_results(&path, "fallback").unwrap();
        assert_eq!(table.skipped_rows, 3);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].expid, "a");
        assert_eq!(table.records[1].n_cells, 64);
        assert_eq!(table.records[1].expid, "fallback");
    }

    #[test]
    fn test_annotated_columns() {
        use crate::analysis::compute_orders;

        let dir = tempfile::tempdir().unwrap();
        let key = ParameterKey::new(GeometryTag::LINE).with_cw(10.0);
        let records = vec![
            ConvergenceRecord::new("a", 2, 0.5, 1, key, 0.04),
            ConvergenceRecord::new("a", 4, 0.25, 1, key, 0.01),
        ];
        let annotated = compute_orders(&records, 1);
        let path = dir.path().join("annotated.csv");
        write_annotated(&path, &annotated).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "n_cells,order,diff_l2,h,gel,diffcoef,cw,limit,expid,num_order,h-2"
        );
        assert_eq!(lines.next().unwrap(), "2,1,0.04,0.5,1_2,,10.0,false,a,,4.0");
        let last: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(&last[..9], &["4", "1", "0.01", "0.25", "1_2", "", "10.0", "false", "a"]);
        assert!((last[9].parse::<f64>().unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(last[10], "16.0");

        // Annotated tables read back as plain results
        let back = read_results(&path, "ignored").unwrap();
        assert_eq!(back.records, records);
    }
}
