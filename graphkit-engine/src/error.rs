//! Error types for the graphkit engine.
//!
//! Defines the engine error enum, its stable machine-readable codes, and a
//! convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error raised by engine graph construction, partitions, and algorithms.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EngineError {
    /// A node id was outside the graph or partition bounds.
    #[error("node {node} is out of bounds (node_count is {node_count})")]
    InvalidNodeId {
        /// The offending node id.
        node: usize,
        /// Number of nodes in the graph or partition.
        node_count: usize,
    },
    /// An edge was added with a NaN or infinite weight.
    #[error("edge ({source_node}, {target_node}) has non-finite weight {weight}")]
    NonFiniteWeight {
        /// Source endpoint of the edge.
        source_node: usize,
        /// Target endpoint of the edge.
        target_node: usize,
        /// The rejected weight.
        weight: f64,
    },
    /// An operation needed edge ids before [`crate::Graph::index_edges`] ran.
    #[error("graph edges have not been indexed")]
    EdgesNotIndexed,
    /// No edge joins the requested endpoints.
    #[error("graph has no edge from {source_node} to {target_node}")]
    MissingEdge {
        /// Source endpoint of the lookup.
        source_node: usize,
        /// Target endpoint of the lookup.
        target_node: usize,
    },
    /// A partition was paired with a graph of a different size.
    #[error("partition covers {partition} nodes but the graph has {node_count}")]
    PartitionSizeMismatch {
        /// Number of entries in the partition.
        partition: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },
    /// A node was left without a subset where a total partition is required.
    #[error("node {node} is not assigned to any subset")]
    UnassignedNode {
        /// The unassigned node.
        node: usize,
    },
    /// An algorithm parameter was outside its accepted range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable description of the accepted range.
        reason: Arc<str>,
    },
    /// A quality measure is not defined for the supplied graph.
    #[error("{measure} is undefined: {reason}")]
    UndefinedQuality {
        /// Name of the measure.
        measure: &'static str,
        /// Why the measure cannot be computed.
        reason: &'static str,
    },
    /// The configured worker thread count could not be parsed.
    #[error("invalid thread count `{value}`; expected a positive integer")]
    InvalidThreadCount {
        /// Raw value that failed to parse.
        value: Arc<str>,
    },
    /// The worker pool for an algorithm run could not be created.
    #[error("failed to build worker pool: {message}")]
    ThreadPool {
        /// Message reported by the pool builder.
        message: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`EngineError`] variants.
    enum EngineErrorCode for EngineError {
        /// A node id was outside the graph or partition bounds.
        InvalidNodeId => InvalidNodeId { .. } => "ENGINE_INVALID_NODE_ID",
        /// An edge was added with a NaN or infinite weight.
        NonFiniteWeight => NonFiniteWeight { .. } => "ENGINE_NON_FINITE_WEIGHT",
        /// Edge ids were required before indexing.
        EdgesNotIndexed => EdgesNotIndexed => "ENGINE_EDGES_NOT_INDEXED",
        /// No edge joins the requested endpoints.
        MissingEdge => MissingEdge { .. } => "ENGINE_MISSING_EDGE",
        /// A partition was paired with a graph of a different size.
        PartitionSizeMismatch => PartitionSizeMismatch { .. } => "ENGINE_PARTITION_SIZE_MISMATCH",
        /// A node was left without a subset.
        UnassignedNode => UnassignedNode { .. } => "ENGINE_UNASSIGNED_NODE",
        /// An algorithm parameter was outside its accepted range.
        InvalidParameter => InvalidParameter { .. } => "ENGINE_INVALID_PARAMETER",
        /// A quality measure is not defined for the supplied graph.
        UndefinedQuality => UndefinedQuality { .. } => "ENGINE_UNDEFINED_QUALITY",
        /// The configured worker thread count could not be parsed.
        InvalidThreadCount => InvalidThreadCount { .. } => "ENGINE_INVALID_THREAD_COUNT",
        /// The worker pool could not be created.
        ThreadPool => ThreadPool { .. } => "ENGINE_THREAD_POOL",
    }
}

/// Convenient alias for results returned by the engine API.
pub type Result<T> = core::result::Result<T, EngineError>;
