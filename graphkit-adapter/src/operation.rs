//! Registry of named operations and their dispatch.

use std::{collections::HashMap, fmt, time::Instant};

use tracing::{info, instrument};

use crate::{
    accessor::EntityAccessor,
    error::{OperationError, Result},
    fault::contain,
    ops,
};

/// Signature shared by every operation handler.
pub type Handler = fn(&mut dyn EntityAccessor) -> Result<()>;

/// A named unit of work that reads inputs from and writes outputs to an
/// [`EntityAccessor`].
#[derive(Clone, Copy)]
pub struct Operation {
    handler: Handler,
}

impl Operation {
    /// Wraps a handler function.
    #[must_use]
    pub const fn new(handler: Handler) -> Self {
        Self { handler }
    }

    fn run(&self, accessor: &mut dyn EntityAccessor) -> Result<()> {
        (self.handler)(accessor)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation").finish_non_exhaustive()
    }
}

/// Name-keyed table of operations.
///
/// # Examples
/// ```
/// use graphkit_adapter::{MemoryAccessor, OperationError, OperationRepository};
///
/// let repository = OperationRepository::with_defaults();
/// let mut accessor = MemoryAccessor::new();
/// let err = repository
///     .execute("ComputeVertexColouring", &mut accessor)
///     .expect_err("not registered");
/// assert!(matches!(err, OperationError::UnknownOperation { .. }));
/// ```
#[derive(Clone, Debug, Default)]
pub struct OperationRepository {
    operations: HashMap<&'static str, Operation>,
}

impl OperationRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding the built-in operations.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut repository = Self::new();
        repository.register(
            ops::edge_attribute::NAME,
            Operation::new(ops::edge_attribute::run),
        );
        repository.register(
            ops::segmentation_scalar::NAME,
            Operation::new(ops::segmentation_scalar::run),
        );
        repository
    }

    /// Adds `operation` under `name`, returning any operation it replaces.
    pub fn register(&mut self, name: &'static str, operation: Operation) -> Option<Operation> {
        self.operations.insert(name, operation)
    }

    /// Returns whether an operation is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Returns the registered operation names in lexical order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.operations.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Runs the operation registered under `name` inside a fault
    /// containment scope.
    ///
    /// # Errors
    /// Returns [`OperationError::UnknownOperation`] when `name` is not
    /// registered, otherwise whatever the operation returns, including
    /// [`OperationError::Fault`] for a contained panic.
    #[instrument(name = "adapter.execute", err, skip(self, accessor), fields(operation = name))]
    pub fn execute(&self, name: &str, accessor: &mut dyn EntityAccessor) -> Result<()> {
        let operation = self
            .operations
            .get(name)
            .ok_or_else(|| OperationError::UnknownOperation {
                name: name.to_owned(),
            })?;

        let started = Instant::now();
        record_invocation(name);
        let outcome = contain(name, || operation.run(accessor));
        let elapsed = started.elapsed();
        match &outcome {
            Ok(()) => info!(elapsed_ms = elapsed.as_millis(), "operation completed"),
            Err(err) => record_failure(name, err),
        }
        record_latency(name, elapsed.as_secs_f64());
        outcome
    }
}

#[cfg(feature = "metrics")]
fn record_invocation(name: &str) {
    metrics::counter!("operation_invocations", "operation" => name.to_owned()).increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_invocation(_name: &str) {}

#[cfg(feature = "metrics")]
fn record_failure(name: &str, err: &OperationError) {
    metrics::counter!(
        "operation_failures",
        "operation" => name.to_owned(),
        "code" => err.code().as_str()
    )
    .increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_failure(_name: &str, _err: &OperationError) {}

#[cfg(feature = "metrics")]
fn record_latency(name: &str, seconds: f64) {
    metrics::histogram!("operation_latency_seconds", "operation" => name.to_owned())
        .record(seconds);
}

#[cfg(not(feature = "metrics"))]
fn record_latency(_name: &str, _seconds: f64) {}
