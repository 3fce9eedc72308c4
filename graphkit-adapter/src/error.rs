//! Error types for the adapter layer.

use std::{fmt, sync::Arc};

use graphkit_engine::EngineError;
use thiserror::Error;

use crate::{accessor::AccessError, convert::ConversionError, options::OptionsError};

/// Outcome of a failed operation invocation.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OperationError {
    /// No operation is registered under the requested name.
    #[error("unknown operation `{name}`")]
    UnknownOperation {
        /// Requested operation name.
        name: String,
    },
    /// An input, parameter or output could not be accessed.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// The options map was malformed.
    #[error(transparent)]
    Options(#[from] OptionsError),
    /// Caller entities could not be converted for the engine.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// The `op` parameter names an algorithm the registry does not know.
    #[error("unsupported algorithm: {family} `{name}`")]
    UnsupportedAlgorithm {
        /// Algorithm family the handler dispatches over.
        family: &'static str,
        /// Requested algorithm name.
        name: String,
    },
    /// Two bundle positions resolved to the same engine edge.
    #[error(
        "edges {first} and {second} both join ({source_node}, {target_node}); \
         per-edge results would be ambiguous"
    )]
    AmbiguousEdge {
        /// Earlier bundle position.
        first: usize,
        /// Later bundle position.
        second: usize,
        /// Source endpoint shared by both edges.
        source_node: usize,
        /// Target endpoint shared by both edges.
        target_node: usize,
    },
    /// The engine returned fewer edge scores than it has edge ids.
    #[error("engine returned {scores} scores for {edge_id_bound} edge ids")]
    ScoreLength {
        /// Number of scores returned.
        scores: usize,
        /// Upper bound of engine edge ids.
        edge_id_bound: usize,
    },
    /// Engine resources were used after they had been released.
    #[error("engine resources were already released")]
    ResourcesReleased,
    /// The engine reported an error.
    #[error("engine failure: {0}")]
    Engine(#[from] EngineError),
    /// The operation panicked; the panic was contained.
    #[error("operation `{operation}` faulted: {message}")]
    Fault {
        /// Name of the faulting operation.
        operation: String,
        /// Panic payload rendered as text.
        message: String,
        /// Backtrace captured at the panic site.
        backtrace: Arc<str>,
    },
}

/// Stable codes describing [`OperationError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum OperationErrorCode {
    /// No operation is registered under the requested name.
    UnknownOperation,
    /// An input, parameter or output could not be accessed.
    Access,
    /// The options map was malformed.
    Options,
    /// Caller entities could not be converted.
    Conversion,
    /// The requested algorithm is not supported.
    UnsupportedAlgorithm,
    /// Two bundle positions resolved to the same engine edge.
    AmbiguousEdge,
    /// The engine returned too few edge scores.
    ScoreLength,
    /// Engine resources were used after release.
    ResourcesReleased,
    /// The engine reported an error.
    EngineFailure,
    /// The operation panicked.
    Fault,
}

impl OperationErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownOperation => "OPERATION_UNKNOWN",
            Self::Access => "OPERATION_ACCESS",
            Self::Options => "OPERATION_OPTIONS",
            Self::Conversion => "OPERATION_CONVERSION",
            Self::UnsupportedAlgorithm => "OPERATION_UNSUPPORTED_ALGORITHM",
            Self::AmbiguousEdge => "OPERATION_AMBIGUOUS_EDGE",
            Self::ScoreLength => "OPERATION_SCORE_LENGTH",
            Self::ResourcesReleased => "OPERATION_RESOURCES_RELEASED",
            Self::EngineFailure => "OPERATION_ENGINE_FAILURE",
            Self::Fault => "OPERATION_FAULT",
        }
    }
}

impl fmt::Display for OperationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OperationError {
    /// Retrieve the stable [`OperationErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> OperationErrorCode {
        match self {
            Self::UnknownOperation { .. } => OperationErrorCode::UnknownOperation,
            Self::Access(_) => OperationErrorCode::Access,
            Self::Options(_) => OperationErrorCode::Options,
            Self::Conversion(_) => OperationErrorCode::Conversion,
            Self::UnsupportedAlgorithm { .. } => OperationErrorCode::UnsupportedAlgorithm,
            Self::AmbiguousEdge { .. } => OperationErrorCode::AmbiguousEdge,
            Self::ScoreLength { .. } => OperationErrorCode::ScoreLength,
            Self::ResourcesReleased => OperationErrorCode::ResourcesReleased,
            Self::Engine(_) => OperationErrorCode::EngineFailure,
            Self::Fault { .. } => OperationErrorCode::Fault,
        }
    }

    /// Returns whether the error stems from a contained panic.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_fault(&self) -> bool { matches!(self, Self::Fault { .. }) }
}

/// Convenient alias for results returned by operations.
pub type Result<T> = core::result::Result<T, OperationError>;
