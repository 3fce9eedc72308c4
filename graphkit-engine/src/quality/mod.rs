//! Partition quality measures.
//!
//! Each measure scores a total [`Partition`] of a [`Graph`] with one number.
//! Edge weights are honoured where the measure is weight-aware.

mod coverage;
mod edge_cut;
mod hub_dominance;
mod modularity;

pub use self::{
    coverage::Coverage, edge_cut::EdgeCut, hub_dominance::HubDominance, modularity::Modularity,
};

use crate::{error::Result, graph::Graph, partition::Partition};

/// A function of a partition and its graph that yields one quality value.
pub trait QualityMeasure: Send + Sync {
    /// Stable name of the measure, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Scores `partition` against `graph`.
    ///
    /// # Errors
    /// Returns [`crate::EngineError::PartitionSizeMismatch`] or
    /// [`crate::EngineError::UnassignedNode`] when the partition does not
    /// cover the graph, and [`crate::EngineError::UndefinedQuality`] when the
    /// measure has no value for the graph.
    fn quality(&self, partition: &Partition, graph: &Graph) -> Result<f64>;
}

/// Splits the total edge weight into intra-subset and total parts.
fn intra_and_total_weight(partition: &Partition, graph: &Graph) -> (f64, f64) {
    graph.edges().fold((0.0, 0.0), |(intra, total), edge| {
        let internal = partition.subset_of(edge.source) == partition.subset_of(edge.target);
        (
            if internal { intra + edge.weight } else { intra },
            total + edge.weight,
        )
    })
}
