//! Problem definition builder.
//!
//! Turns [`ProblemOptions`] into everything one external run needs: the
//! composed weak form, the manufactured-solution provider, the named solver
//! functions and the timestep policy.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::analysis::{ConvergenceRecord, ParameterKey};
use crate::config::ProblemOptions;
use crate::error::Result;
use crate::io::{OutputFormat, output_trunk, snapshot_name};
use crate::mms::{FunctionRegistry, FunctionRole, ManufacturedSolutionProvider, SolverFunction};
use crate::time::{TimestepBudget, TimestepPolicy};
use crate::weak_form::{EquationComposer, SchemeSelection, WeakForm};

use super::solver::{MeshSpec, RunOutcome};

/// Registry name of the exact solution.
pub const SOLUTION_FN: &str = "sol_fun";
/// Registry name of the boundary trace.
pub const BOUNDARY_FN: &str = "bc_fun";
/// Registry name of the manufactured source.
pub const SOURCE_FN: &str = "source_fun";
/// Registry name of the initial condition.
pub const INITIAL_FN: &str = "get_ic";

// =============================================================================
// Problem definition
// =============================================================================

/// A fully configured verification problem.
///
/// Owns its function registry; two definitions never share callables.
#[derive(Debug)]
pub struct ProblemDefinition {
    options: ProblemOptions,
    selection: SchemeSelection,
    weak_form: WeakForm,
    provider: Arc<ManufacturedSolutionProvider>,
    functions: FunctionRegistry,
    timestep: TimestepPolicy,
    reference_state: f64,
}

impl ProblemDefinition {
    pub fn options(&self) -> &ProblemOptions {
        &self.options
    }

    pub fn selection(&self) -> &SchemeSelection {
        &self.selection
    }

    pub fn weak_form(&self) -> &WeakForm {
        &self.weak_form
    }

    pub fn provider(&self) -> &ManufacturedSolutionProvider {
        &self.provider
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn timestep_policy(&self) -> &TimestepPolicy {
        &self.timestep
    }

    /// Polynomial order of the run.
    pub fn order(&self) -> usize {
        self.options.approx_order
    }

    pub fn is_transient(&self) -> bool {
        self.options.transient
    }

    /// Timestep for a mesh, `None` for stationary problems.
    ///
    /// The velocity scale is the largest characteristic speed of the
    /// advective flux at the reference state.
    ///
    /// # Errors
    /// `Configuration` from the timestep policy.
    pub fn timestep_budget(&self, mesh: &MeshSpec) -> Result<Option<TimestepBudget>> {
        if !self.options.transient {
            return Ok(None);
        }
        let velocity = self
            .provider
            .equation()
            .max_wave_speed(self.reference_state);
        let budget = self
            .timestep
            .budget(mesh.h, velocity, self.provider.equation().diffusion)?;
        Ok(Some(budget))
    }

    /// Output trunk of this problem under `out`.
    pub fn output_trunk(&self, out: impl AsRef<Path>) -> PathBuf {
        output_trunk(out, &self.options.example_name, self.order())
    }

    /// Snapshot file of one time step.
    pub fn snapshot_path(&self, out: impl AsRef<Path>, step: usize, n_steps: usize) -> PathBuf {
        snapshot_name(
            &self.output_trunk(out),
            step,
            n_steps,
            self.options.output_format,
        )
    }

    pub fn output_format(&self) -> OutputFormat {
        self.options.output_format
    }

    /// Parameter key runs of this problem are grouped under.
    pub fn parameter_key(&self, mesh: &MeshSpec) -> ParameterKey {
        let mut key = ParameterKey::new(mesh.geometry).with_limit(self.options.limit);
        key.diffcoef = self.options.diffcoef;
        key.cw = self.options.cw;
        key
    }

    /// Result row of a finished run.
    pub fn record(&self, expid: &str, mesh: &MeshSpec, outcome: &RunOutcome) -> ConvergenceRecord {
        ConvergenceRecord::new(
            expid,
            mesh.n_cells,
            mesh.h,
            self.order(),
            self.parameter_key(mesh),
            outcome.error_l2,
        )
    }
}

// =============================================================================
// Problem builder
// =============================================================================

/// Builder for [`ProblemDefinition`].
///
/// # Example
/// ```
/// use dg_mms::config::ProblemOptions;
/// use dg_mms::problem::{ProblemBuilder, SOURCE_FN};
///
/// let options = ProblemOptions {
///     diffcoef: Some(0.1),
///     ..Default::default()
/// };
/// let problem = ProblemBuilder::new(options).build().unwrap();
/// assert!(problem.functions().contains(SOURCE_FN));
/// ```
pub struct ProblemBuilder {
    options: ProblemOptions,
    extra_functions: Vec<SolverFunction>,
    reference_state: f64,
    order_correction: bool,
}

impl ProblemBuilder {
    pub fn new(options: ProblemOptions) -> Self {
        Self {
            options,
            extra_functions: Vec::new(),
            reference_state: 1.0,
            order_correction: false,
        }
    }

    /// Register an additional solver function.
    pub fn with_function(mut self, function: SolverFunction) -> Self {
        self.extra_functions.push(function);
        self
    }

    /// State at which the wave speed of a nonlinear flux is evaluated.
    pub fn with_reference_state(mut self, u: f64) -> Self {
        self.reference_state = u;
        self
    }

    /// Divide the CFL timestep by 2N + 1.
    pub fn with_order_correction(mut self, enabled: bool) -> Self {
        self.order_correction = enabled;
        self
    }

    /// Build the problem.
    ///
    /// Configuration and domain problems surface here, before any solve: the
    /// profile is probed once at the domain centre and the start time.
    ///
    /// # Errors
    /// `Configuration` for inconsistent options or colliding function names,
    /// `Domain` if the profile cannot be evaluated with these parameters.
    pub fn build(self) -> Result<ProblemDefinition> {
        let options = self.options;
        options.validate()?;

        let selection = options.scheme_selection();
        let equation = options.target_equation();

        let weak_form = EquationComposer::new(&selection)
            .with_advection_model(equation.advection)
            .with_diffusion(equation.diffusion)
            .with_source(true)
            .compose(options.transient)?;

        let profile = options.profile.build(options.diffusion());
        let provider = Arc::new(
            ManufacturedSolutionProvider::from_boxed(profile, equation)
                .with_edges(&options.boundaries)?,
        );
        provider.value([0.5, 0.5], options.t0)?;

        let mut functions = FunctionRegistry::new();
        register_standard_functions(&mut functions, &provider, options.t0)?;
        for function in self.extra_functions {
            functions.register(function)?;
        }

        let mut timestep = options.timestep_policy();
        if self.order_correction {
            timestep = timestep.with_order_correction(options.approx_order);
        }

        log::debug!(
            "Built problem '{}' (order {}): {}",
            options.example_name,
            options.approx_order,
            weak_form
        );

        Ok(ProblemDefinition {
            options,
            selection,
            weak_form,
            provider,
            functions,
            timestep,
            reference_state: self.reference_state,
        })
    }
}

fn register_standard_functions(
    registry: &mut FunctionRegistry,
    provider: &Arc<ManufacturedSolutionProvider>,
    t0: f64,
) -> Result<()> {
    let p = Arc::clone(provider);
    registry.register(SolverFunction::field(
        SOLUTION_FN,
        FunctionRole::ExactSolution,
        move |x, t| p.value(x, t),
    ))?;

    let p = Arc::clone(provider);
    registry.register(SolverFunction::trace(BOUNDARY_FN, move |x, t, request| {
        p.trace(x, t, request)
    }))?;

    let p = Arc::clone(provider);
    registry.register(SolverFunction::field(
        SOURCE_FN,
        FunctionRole::Source,
        move |x, t| p.source(x, t),
    ))?;

    let p = Arc::clone(provider);
    registry.register(SolverFunction::field(
        INITIAL_FN,
        FunctionRole::InitialCondition,
        move |x, _t| p.initial_condition(x, t0),
    ))?;

    Ok(())
}
