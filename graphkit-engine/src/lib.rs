//! Graphkit engine library.
//!
//! An in-process graph-algorithms engine: an indexed adjacency-list
//! [`Graph`], node [`Partition`]s, per-edge scores ([`EdgeScore`]) and
//! partition quality measures ([`QualityMeasure`]). Randomised algorithms
//! and worker pools are configured per run through [`RunConfig`]; the engine
//! holds no process-wide configuration.
//!
//! Edge results are indexed by engine edge id, which the engine assigns when
//! [`Graph::index_edges`] runs and which need not match the order edges were
//! added in.

mod config;
mod error;
mod graph;
mod partition;
mod quality;
mod score;

pub use crate::{
    config::{DEFAULT_SEED, RunConfig, THREADS_ENV, current_worker_tag, parse_threads},
    error::{EngineError, EngineErrorCode, Result},
    graph::{EdgeId, EdgeView, Graph, NodeId},
    partition::Partition,
    quality::{Coverage, EdgeCut, HubDominance, Modularity, QualityMeasure},
    score::{EdgeScore, ForestFireScore, RandomEdgeScore, TriangleEdgeScore},
};
