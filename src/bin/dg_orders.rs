//! Compute empirical convergence orders for a study directory.
//!
//! ```text
//! dg-orders outputs/parametric/burgers --dim 1
//! ```
//!
//! Reads every results table under the study, writes the annotated table
//! with `num_order` and `h-2` columns and prints one summary line per series.

use std::path::PathBuf;

use clap::Parser;

use dg_mms::VerificationError;
use dg_mms::analysis::{ConvergenceAnalyzer, Dimension, mean_orders};
use dg_mms::io::{ORDERS_FILE, StudyLayout, read_study, write_annotated};

#[derive(Parser, Debug)]
#[command(name = "dg-orders", version, about = "Empirical DG convergence orders")]
struct Args {
    /// Study directory containing h<r>/o<p>/results.csv tables
    study: PathBuf,

    /// Spatial dimension; taken from the gel column when omitted
    #[arg(short, long)]
    dim: Option<usize>,

    /// Annotated output table (default: <study>/orders.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), VerificationError> {
    env_logger::init();
    let args = Args::parse();

    let layout = StudyLayout::new(&args.study);
    let table = read_study(&layout)?;
    if table.records.is_empty() {
        return Err(VerificationError::data(format!(
            "no result rows found under {}",
            args.study.display()
        )));
    }
    log::info!(
        "Loaded {} rows from {} ({} skipped)",
        table.records.len(),
        args.study.display(),
        table.skipped_rows
    );

    let dimension = args.dim.map_or(Dimension::FromGeometry, Dimension::Fixed);
    let report = ConvergenceAnalyzer::new(dimension).analyze(&table.records);
    if !report.skipped.is_empty() {
        log::info!("{} series skipped, see warnings above", report.skipped.len());
    }

    for series in &report.series {
        let fmt = |q: Option<f64>| q.map_or_else(|| "-".to_string(), |q| format!("{q:.3}"));
        println!(
            "{}: {} points, final order {}, mean order {}",
            series.group,
            series.points.len(),
            fmt(series.final_order()),
            fmt(series.mean_order())
        );
    }

    let annotated = report.into_annotated();
    println!();
    for mean in mean_orders(&annotated) {
        let q = mean
            .mean_order
            .map_or_else(|| "-".to_string(), |q| format!("{q:.3}"));
        println!(
            "{}: mean empirical order {} over {} pairs",
            mean.group, q, mean.order_count
        );
    }

    let output = args
        .output
        .unwrap_or_else(|| layout.root().join(ORDERS_FILE));
    write_annotated(&output, &annotated)?;
    log::info!("Wrote {}", output.display());
    Ok(())
}
