//! Mapping engine edge results back onto bundle positions.
//!
//! The engine numbers edges itself, so results indexed by engine edge id are
//! recovered per bundle position by looking up each position's endpoint
//! pair.

use graphkit_engine::{EngineError, Graph};
use tracing::instrument;

use crate::{
    entity::{DoubleAttribute, EdgeBundle},
    error::{OperationError, Result},
};

/// Converts per-engine-edge `scores` into a per-bundle-position attribute.
///
/// Entry `i` of the result holds the score of the engine edge joining
/// `edges.src()[i]` and `edges.dst()[i]`; NaN scores are marked undefined.
///
/// # Errors
/// Returns [`OperationError::Engine`] when `graph` has no edge ids or lacks
/// an edge of the bundle, [`OperationError::ScoreLength`] when `scores` does
/// not cover every edge id, and [`OperationError::AmbiguousEdge`] when two
/// bundle positions share an engine edge.
///
/// # Examples
/// ```
/// use graphkit_adapter::{EdgeBundle, VertexSet, convert::to_engine_graph};
/// use graphkit_adapter::reconcile::edge_scores_to_attribute;
///
/// let bundle = EdgeBundle::new(vec![1, 0], vec![0, 1])?;
/// let graph = to_engine_graph(&VertexSet::new(2), &bundle, None, true)?;
/// let scores: Vec<f64> = (0..graph.upper_edge_id_bound())
///     .map(|id| id as f64)
///     .collect();
/// let attr = edge_scores_to_attribute(&graph, &bundle, &scores)?;
/// assert_eq!(attr.values(), &[1.0, 0.0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "adapter.reconcile",
    err,
    skip_all,
    fields(edges = edges.len(), scores = scores.len())
)]
pub fn edge_scores_to_attribute(
    graph: &Graph,
    edges: &EdgeBundle,
    scores: &[f64],
) -> Result<DoubleAttribute> {
    if !graph.has_edge_ids() {
        return Err(EngineError::EdgesNotIndexed.into());
    }
    let edge_id_bound = graph.upper_edge_id_bound();
    if scores.len() < edge_id_bound {
        return Err(OperationError::ScoreLength {
            scores: scores.len(),
            edge_id_bound,
        });
    }

    let mut owners: Vec<Option<usize>> = vec![None; edge_id_bound];
    let mut values = Vec::with_capacity(edges.len());
    for (position, (source, target)) in edges.iter().enumerate() {
        let id = graph.edge_id(source, target)?;
        let owner = owners.get_mut(id).ok_or(OperationError::ScoreLength {
            scores: scores.len(),
            edge_id_bound,
        })?;
        if let Some(first) = *owner {
            return Err(OperationError::AmbiguousEdge {
                first,
                second: position,
                source_node: source,
                target_node: target,
            });
        }
        *owner = Some(position);
        values.push(scores[id]);
    }
    Ok(DoubleAttribute::from_values(values))
}
