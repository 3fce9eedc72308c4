//! Graphkit adapter library.
//!
//! Runs graph algorithms from [`graphkit_engine`] against caller-side
//! entities. An [`OperationRepository`] dispatches named operations; each
//! operation reads its inputs through an [`EntityAccessor`], converts them
//! into an engine graph, runs the algorithm named by its `op` parameter and
//! writes the result back, either as a per-edge [`DoubleAttribute`] keyed by
//! bundle position or as a single scalar. Panics inside an operation are
//! contained and reported as [`OperationError::Fault`].
//!
//! ```
//! use graphkit_adapter::{EdgeBundle, MemoryAccessor, OperationRepository, VertexSet};
//!
//! let mut accessor = MemoryAccessor::new()
//!     .with_input("vs", VertexSet::new(4))
//!     .with_input("es", EdgeBundle::new(vec![0, 1, 2], vec![1, 2, 3])?)
//!     .with_input("segments", VertexSet::new(1))
//!     .with_input("belongsTo", EdgeBundle::new(vec![0, 1, 2, 3], vec![0; 4])?)
//!     .with_string_param("op", "EdgeCut")
//!     .with_map_param("options", r#"{"directed": false}"#);
//! OperationRepository::with_defaults().execute("ComputeSegmentationScalar", &mut accessor)?;
//! assert_eq!(accessor.output_scalar_value("sc"), Some(0.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod accessor;
pub mod convert;
pub mod entity;
pub mod error;
pub mod fault;
pub mod logging;
pub mod operation;
pub mod ops;
pub mod options;
pub mod reconcile;
pub mod registry;
pub mod segmentation;

pub use crate::{
    accessor::{AccessError, EntityAccessor, MemoryAccessor},
    convert::ConversionError,
    entity::{DoubleAttribute, EdgeBundle, Entity, EntityError, VertexSet},
    error::{OperationError, OperationErrorCode, Result},
    operation::{Handler, Operation, OperationRepository},
    options::{Options, OptionsError},
    registry::{AlgorithmRegistry, EdgeScoreRegistry, Factory, QualityRegistry},
    segmentation::SegmentationHelper,
};
