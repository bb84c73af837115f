//! Named solver callables for one problem definition.
//!
//! The external FE engine looks functions up by name (exact solution,
//! boundary traces, source, initial condition). Each problem definition owns
//! its own [`FunctionRegistry`]; nothing is shared between problems.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::boundary::{BoundaryTraceRequest, Trace};
use crate::error::{Result, VerificationError};
use crate::types::Coords;

/// Pointwise scalar field f(x, t).
pub type FieldFn = Arc<dyn Fn(Coords, f64) -> Result<f64> + Send + Sync>;

/// Boundary trace callable.
pub type TraceFn = Arc<dyn Fn(Coords, f64, &BoundaryTraceRequest) -> Result<Trace> + Send + Sync>;

/// What a registered function is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionRole {
    ExactSolution,
    BoundaryTrace,
    Source,
    InitialCondition,
}

/// Callable body of a solver function.
#[derive(Clone)]
pub enum FunctionBody {
    Field(FieldFn),
    Trace(TraceFn),
}

/// A named callable handed to the external solver.
#[derive(Clone)]
pub struct SolverFunction {
    name: String,
    role: FunctionRole,
    body: FunctionBody,
    registered: bool,
}

impl SolverFunction {
    /// Wrap a pointwise field.
    pub fn field(
        name: impl Into<String>,
        role: FunctionRole,
        f: impl Fn(Coords, f64) -> Result<f64> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            body: FunctionBody::Field(Arc::new(f)),
            registered: false,
        }
    }

    /// Wrap a boundary trace.
    pub fn trace(
        name: impl Into<String>,
        f: impl Fn(Coords, f64, &BoundaryTraceRequest) -> Result<Trace> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            role: FunctionRole::BoundaryTrace,
            body: FunctionBody::Trace(Arc::new(f)),
            registered: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> FunctionRole {
        self.role
    }

    pub fn body(&self) -> &FunctionBody {
        &self.body
    }

    /// Whether this record has already been through a registry.
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Evaluate a field function.
    ///
    /// # Errors
    /// `Configuration` if this is a trace function.
    pub fn eval(&self, x: Coords, t: f64) -> Result<f64> {
        match &self.body {
            FunctionBody::Field(f) => f(x, t),
            FunctionBody::Trace(_) => Err(VerificationError::config(format!(
                "'{}' is a boundary trace, not a field",
                self.name
            ))),
        }
    }

    /// Evaluate a trace function.
    ///
    /// # Errors
    /// `Configuration` if this is a field function.
    pub fn eval_trace(&self, x: Coords, t: f64, request: &BoundaryTraceRequest) -> Result<Trace> {
        match &self.body {
            FunctionBody::Trace(f) => f(x, t, request),
            FunctionBody::Field(_) => Err(VerificationError::config(format!(
                "'{}' is a field, not a boundary trace",
                self.name
            ))),
        }
    }
}

impl fmt::Debug for SolverFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverFunction")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}

/// Owned name → function table for one problem.
#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, SolverFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under its own name.
    ///
    /// Records that are already marked registered are accepted as-is: if the
    /// same name is present the call is a no-op, otherwise the record is
    /// stored without re-wrapping.
    ///
    /// # Errors
    /// `Configuration` if a fresh function reuses a taken name.
    pub fn register(&mut self, function: SolverFunction) -> Result<()> {
        if let Some(existing) = self.functions.get(&function.name) {
            if function.registered && existing.role == function.role {
                log::debug!("function '{}' already registered", function.name);
                return Ok(());
            }
            return Err(VerificationError::config(format!(
                "function '{}' is already registered",
                function.name
            )));
        }

        let mut function = function;
        function.registered = true;
        self.functions.insert(function.name.clone(), function);
        Ok(())
    }

    /// Look a function up by name.
    pub fn get(&self, name: &str) -> Option<&SolverFunction> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Functions with the given role.
    pub fn by_role(&self, role: FunctionRole) -> impl Iterator<Item = &SolverFunction> {
        self.functions.values().filter(move |f| f.role == role)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(name: &str, c: f64) -> SolverFunction {
        SolverFunction::field(name, FunctionRole::Source, move |_, _| Ok(c))
    }

    #[test]
    fn test_register_marks_record() {
        let mut reg = FunctionRegistry::new();
        let f = constant("source_fun", 1.0);
        assert!(!f.is_registered());
        reg.register(f).unwrap();
        assert!(reg.get("source_fun").unwrap().is_registered());
        assert_eq!(reg.get("source_fun").unwrap().eval([0.0, 0.0], 0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut reg = FunctionRegistry::new();
        reg.register(constant("g", 1.0)).unwrap();
        assert!(reg.register(constant("g", 2.0)).unwrap_err().is_configuration());
    }

    #[test]
    fn test_reregistering_registered_record_is_noop() {
        let mut reg = FunctionRegistry::new();
        reg.register(constant("g", 1.0)).unwrap();
        let again = reg.get("g").unwrap().clone();
        reg.register(again.clone()).unwrap();
        assert_eq!(reg.len(), 1);

        // A registered record moves into another registry unchanged
        let mut other = FunctionRegistry::new();
        other.register(again).unwrap();
        assert!(other.contains("g"));
    }

    #[test]
    fn test_body_kind_mismatch() {
        let f = SolverFunction::trace("bc_fun", |_, _, _| Ok(Trace::Value(0.0)));
        assert!(f.eval([0.0, 0.0], 0.0).is_err());
        let req = BoundaryTraceRequest::new("left", 0).unwrap();
        assert_eq!(f.eval_trace([0.0, 0.0], 0.0, &req).unwrap(), Trace::Value(0.0));
    }
}
