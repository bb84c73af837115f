//! Running a sweep through an external solver.

use std::collections::BTreeMap;
use std::fs;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::analysis::ConvergenceRecord;
use crate::config::ProblemOptions;
use crate::error::{Result, VerificationError};
use crate::io::{StudyLayout, write_results};
use crate::problem::{ExternalSolver, ProblemBuilder, ProblemDefinition};

use super::sweep::{ParameterSweep, SweepCase};

/// A case that did not produce a result.
#[derive(Debug)]
pub struct CaseFailure {
    pub case: SweepCase,
    pub error: VerificationError,
}

/// Results of a sweep.
#[derive(Debug, Default)]
pub struct StudyReport {
    /// Successful runs, in case order
    pub completed: Vec<(SweepCase, ConvergenceRecord)>,
    /// Failed runs, in case order
    pub failures: Vec<CaseFailure>,
}

impl StudyReport {
    /// Records of the successful runs.
    pub fn records(&self) -> Vec<ConvergenceRecord> {
        self.completed.iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs every case of a sweep and persists the result rows.
///
/// Every case is configured before the first solve, so a configuration or
/// domain error stops the study without touching the solver. Solver
/// failures are recorded per case and never retried; the remaining cases
/// still run. With the `parallel` feature cases run on the rayon pool.
pub struct StudyRunner<'a, S: ExternalSolver> {
    solver: &'a S,
    base: ProblemOptions,
    layout: StudyLayout,
}

impl<'a, S: ExternalSolver> StudyRunner<'a, S> {
    pub fn new(solver: &'a S, base: ProblemOptions, layout: StudyLayout) -> Self {
        Self {
            solver,
            base,
            layout,
        }
    }

    pub fn layout(&self) -> &StudyLayout {
        &self.layout
    }

    /// Build the problem of one case without solving it.
    pub fn configure(&self, case: &SweepCase) -> Result<ProblemDefinition> {
        case.mesh.validate()?;
        let options = self.base.with_overrides(&case.overrides);
        ProblemBuilder::new(options).build()
    }

    /// Configure, solve and record one case.
    pub fn run_case(&self, case: &SweepCase) -> Result<ConvergenceRecord> {
        let problem = self.configure(case)?;
        self.solve(case, &problem)
    }

    fn solve(&self, case: &SweepCase, problem: &ProblemDefinition) -> Result<ConvergenceRecord> {
        let outcome = self.solver.solve(problem, &case.mesh)?;
        Ok(problem.record(&self.layout.expid(), &case.mesh, &outcome))
    }

    /// Run the sweep and write `results.csv` per (refinement, order).
    ///
    /// # Errors
    /// `Configuration` for an invalid sweep, the first configuration or
    /// domain error of any case (before anything is solved), and `Io`/`Csv`
    /// when results cannot be persisted. Solver failures end up in the
    /// report instead.
    pub fn run(&self, sweep: &ParameterSweep) -> Result<StudyReport> {
        let cases = sweep.cases()?;

        let mut problems = Vec::with_capacity(cases.len());
        let mut rejected = None;
        for case in &cases {
            match self.configure(case) {
                Ok(problem) => problems.push(problem),
                Err(error) => {
                    log::error!("{case} rejected: {error}");
                    rejected.get_or_insert(error);
                }
            }
        }
        if let Some(error) = rejected {
            return Err(error);
        }

        log::info!(
            "Running {} cases of study '{}' with {}",
            cases.len(),
            self.layout.expid(),
            self.solver.name()
        );

        #[cfg(feature = "parallel")]
        let outcomes: Vec<Result<ConvergenceRecord>> = cases
            .par_iter()
            .zip(problems.par_iter())
            .map(|(c, p)| self.solve(c, p))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<Result<ConvergenceRecord>> = cases
            .iter()
            .zip(&problems)
            .map(|(c, p)| self.solve(c, p))
            .collect();

        let mut report = StudyReport::default();
        for (case, outcome) in cases.into_iter().zip(outcomes) {
            match outcome {
                Ok(record) => {
                    log::debug!("{case}: diff_l2 = {:.4e}", record.error);
                    report.completed.push((case, record));
                }
                Err(error) => {
                    log::warn!("{case} failed: {error}");
                    report.failures.push(CaseFailure { case, error });
                }
            }
        }

        self.persist(&report)?;
        log::info!(
            "Study '{}': {} runs completed, {} failed",
            self.layout.expid(),
            report.completed.len(),
            report.failures.len()
        );
        Ok(report)
    }

    fn persist(&self, report: &StudyReport) -> Result<()> {
        let mut by_run: BTreeMap<(usize, usize), Vec<ConvergenceRecord>> = BTreeMap::new();
        for (case, record) in &report.completed {
            by_run
                .entry((case.refinement, case.order))
                .or_default()
                .push(record.clone());
        }
        for ((refinement, order), records) in by_run {
            fs::create_dir_all(self.layout.run_dir(refinement, order))?;
            write_results(self.layout.results_path(refinement, order), &records)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_orders;
    use crate::io::read_study;
    use crate::problem::{MeshSpec, RunOutcome};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reports e = h^(p+1) and fails on a chosen cell count.
    struct SyntheticSolver {
        fail_on: Option<usize>,
        calls: AtomicUsize,
    }

    impl SyntheticSolver {
        fn new(fail_on: Option<usize>) -> Self {
            Self {
                fail_on,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ExternalSolver for SyntheticSolver {
        fn name(&self) -> &str {
            "synthetic"
        }

        fn solve(&self, problem: &ProblemDefinition, mesh: &MeshSpec) -> Result<RunOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(mesh.n_cells) {
                return Err(VerificationError::external(
                    self.name(),
                    "newton iteration diverged",
                ));
            }
            let p = problem.order() as i32;
            Ok(RunOutcome::stationary(mesh.h.powi(p + 1)))
        }
    }

    fn base() -> ProblemOptions {
        ProblemOptions {
            diffcoef: Some(0.1),
            ..Default::default()
        }
    }

    #[test]
    fn test_run_persists_and_recovers_orders() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StudyLayout::new(dir.path().join("diff1D"));
        let solver = SyntheticSolver::new(None);
        let sweep = ParameterSweep::new()
            .with_orders([1, 2])
            .with_refinements(0..3);

        let report = StudyRunner::new(&solver, base(), layout.clone())
            .run(&sweep)
            .unwrap();
        assert!(report.is_complete());
        assert_eq!(report.completed.len(), 6);
        assert!(layout.results_path(2, 1).is_file());

        let table = read_study(&layout).unwrap();
        assert_eq!(table.records.len(), 6);
        assert!(table.records.iter().all(|r| r.expid == "diff1D"));

        let annotated = compute_orders(&table.records, 1);
        for a in annotated.iter().filter(|a| a.order.is_defined()) {
            let q = a.num_order().unwrap();
            assert!((q - (a.record.order + 1) as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn test_failures_are_recorded_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StudyLayout::new(dir.path().join("burgers"));
        let solver = SyntheticSolver::new(Some(8));
        let sweep = ParameterSweep::new().with_refinements(0..3);

        let report = StudyRunner::new(&solver, base(), layout).run(&sweep).unwrap();
        assert_eq!(report.completed.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(solver.calls(), 3);
        assert_eq!(report.failures[0].case.refinement, 1);
        assert!(matches!(
            report.failures[0].error,
            VerificationError::ExternalSolver { .. }
        ));
    }

    #[test]
    fn test_configuration_error_stops_study_before_any_solve() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StudyLayout::new(dir.path().join("s"));
        let solver = SyntheticSolver::new(None);
        let sweep = ParameterSweep::new().with_penalties([10.0, 0.0]);

        let err = StudyRunner::new(&solver, base(), layout.clone())
            .run(&sweep)
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(solver.calls(), 0);
        assert!(!layout.results_path(0, 1).exists());
    }

    #[test]
    fn test_bad_timestep_stops_study_before_any_solve() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StudyLayout::new(dir.path().join("s"));
        let solver = SyntheticSolver::new(None);
        let options = ProblemOptions {
            transient: true,
            cfl: Some(-0.5),
            ..base()
        };
        let sweep = ParameterSweep::new().with_refinements(0..3);

        let runner = StudyRunner::new(&solver, options, layout);
        assert!(runner.configure(&sweep.cases().unwrap()[0]).is_err());
        let err = runner.run(&sweep).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(solver.calls(), 0);
    }
}
