//! Per-edge scores computed over an indexed [`Graph`].
//!
//! Every score returns a vector indexed by engine edge id, sized to
//! [`Graph::upper_edge_id_bound`]. Callers translate those ids back to their
//! own edge order by querying [`Graph::edge_id`].

mod forest_fire;
mod random;
mod triangles;

pub use self::{forest_fire::ForestFireScore, random::RandomEdgeScore, triangles::TriangleEdgeScore};

use crate::{
    config::RunConfig,
    error::{EngineError, Result},
    graph::Graph,
};

/// An algorithm that assigns one value to every edge of a graph.
pub trait EdgeScore: Send + Sync {
    /// Stable name of the score, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Computes the score of every edge, indexed by engine edge id.
    ///
    /// # Errors
    /// Returns [`EngineError::EdgesNotIndexed`] when the graph has no edge ids
    /// and algorithm-specific errors otherwise.
    fn compute(&self, graph: &Graph, config: &RunConfig) -> Result<Vec<f64>>;
}

pub(crate) fn require_indexed(graph: &Graph) -> Result<()> {
    if graph.has_edge_ids() {
        Ok(())
    } else {
        Err(EngineError::EdgesNotIndexed)
    }
}
