//! Conversion of caller entities into engine graphs and partitions.

use graphkit_engine::{EngineError, Graph, Partition};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::entity::{DoubleAttribute, EdgeBundle, VertexSet};

/// Errors raised while building engine inputs from caller entities.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConversionError {
    /// An edge referenced a vertex outside its vertex set.
    #[error("edge {edge} references vertex {vertex}, but the vertex set has {vertex_count}")]
    EndpointOutOfRange {
        /// Bundle position of the edge.
        edge: usize,
        /// Offending vertex index.
        vertex: usize,
        /// Size of the vertex set.
        vertex_count: usize,
    },
    /// The weight attribute did not have one entry per edge.
    #[error("weight attribute has {weights} entries for {edges} edges")]
    WeightLengthMismatch {
        /// Length of the weight attribute.
        weights: usize,
        /// Length of the edge bundle.
        edges: usize,
    },
    /// A weight entry was marked undefined.
    #[error("edge {edge} has no defined weight")]
    UndefinedWeight {
        /// Bundle position of the edge.
        edge: usize,
    },
    /// A weight entry was infinite or NaN.
    #[error("edge {edge} has non-finite weight {weight}")]
    NonFiniteWeight {
        /// Bundle position of the edge.
        edge: usize,
        /// The rejected weight.
        weight: f64,
    },
    /// A `belongsTo` edge pointed outside the segment set.
    #[error("membership {edge} references segment {segment}, but there are {segment_count}")]
    SegmentOutOfRange {
        /// Bundle position of the membership edge.
        edge: usize,
        /// Offending segment index.
        segment: usize,
        /// Size of the segment set.
        segment_count: usize,
    },
    /// A vertex belonged to two different segments.
    #[error("vertex {vertex} belongs to segments {first} and {second}")]
    OverlappingSegments {
        /// The vertex with two memberships.
        vertex: usize,
        /// First segment seen for the vertex.
        first: usize,
        /// Conflicting segment.
        second: usize,
    },
    /// The engine rejected the converted input.
    #[error("engine rejected converted input: {0}")]
    Engine(#[from] EngineError),
}

/// Builds an engine graph with one node per vertex and one edge per bundle
/// entry, then indexes its edges.
///
/// Without a weight attribute the graph is unweighted and every edge carries
/// unit weight.
///
/// # Errors
/// Returns [`ConversionError`] when an endpoint is out of range or the
/// weight attribute is unusable.
///
/// # Examples
/// ```
/// use graphkit_adapter::{EdgeBundle, VertexSet, convert::to_engine_graph};
///
/// let bundle = EdgeBundle::new(vec![0, 1, 2], vec![1, 2, 3])?;
/// let graph = to_engine_graph(&VertexSet::new(4), &bundle, None, false)?;
/// assert_eq!(graph.node_count(), 4);
/// assert_eq!(graph.edge_count(), 3);
/// assert!(graph.has_edge_ids());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "adapter.convert",
    err,
    skip(vertices, edges, weights),
    fields(vertices = vertices.len(), edges = edges.len(), weighted = weights.is_some())
)]
pub fn to_engine_graph(
    vertices: &VertexSet,
    edges: &EdgeBundle,
    weights: Option<&DoubleAttribute>,
    directed: bool,
) -> Result<Graph, ConversionError> {
    if let Some(weights) = weights
        && weights.len() != edges.len()
    {
        return Err(ConversionError::WeightLengthMismatch {
            weights: weights.len(),
            edges: edges.len(),
        });
    }

    let vertex_count = vertices.len();
    let mut graph = Graph::new(vertex_count, weights.is_some(), directed);
    for (edge, (source, target)) in edges.iter().enumerate() {
        for vertex in [source, target] {
            if vertex >= vertex_count {
                return Err(ConversionError::EndpointOutOfRange {
                    edge,
                    vertex,
                    vertex_count,
                });
            }
        }
        let weight = match weights {
            Some(weights) => edge_weight(weights, edge)?,
            None => 1.0,
        };
        graph.add_edge(source, target, weight)?;
    }
    graph.index_edges();
    debug!(
        edge_id_bound = graph.upper_edge_id_bound(),
        "engine graph constructed"
    );
    Ok(graph)
}

fn edge_weight(weights: &DoubleAttribute, edge: usize) -> Result<f64, ConversionError> {
    let weight = weights
        .get(edge)
        .ok_or(ConversionError::UndefinedWeight { edge })?;
    if weight.is_finite() {
        Ok(weight)
    } else {
        Err(ConversionError::NonFiniteWeight { edge, weight })
    }
}

/// Builds a total engine partition from a segmentation.
///
/// Every `belongs_to` edge `(v, s)` places vertex `v` in segment `s`.
/// Vertices without a segment become singleton subsets numbered after the
/// segment set.
///
/// # Errors
/// Returns [`ConversionError::OverlappingSegments`] when a vertex belongs to
/// two different segments, and range errors for out-of-bounds memberships.
#[instrument(
    name = "adapter.convert_partition",
    err,
    skip(vertices, segments, belongs_to),
    fields(vertices = vertices.len(), segments = segments.len(), memberships = belongs_to.len())
)]
pub fn to_engine_partition(
    vertices: &VertexSet,
    segments: &VertexSet,
    belongs_to: &EdgeBundle,
) -> Result<Partition, ConversionError> {
    let vertex_count = vertices.len();
    let segment_count = segments.len();
    let mut partition = Partition::new(vertex_count);

    for (edge, (vertex, segment)) in belongs_to.iter().enumerate() {
        if vertex >= vertex_count {
            return Err(ConversionError::EndpointOutOfRange {
                edge,
                vertex,
                vertex_count,
            });
        }
        if segment >= segment_count {
            return Err(ConversionError::SegmentOutOfRange {
                edge,
                segment,
                segment_count,
            });
        }
        match partition.subset_of(vertex) {
            Some(first) if first != segment => {
                return Err(ConversionError::OverlappingSegments {
                    vertex,
                    first,
                    second: segment,
                });
            }
            Some(_) => {}
            None => partition.assign(vertex, segment)?,
        }
    }

    let mut next_singleton = segment_count;
    for vertex in 0..vertex_count {
        if partition.subset_of(vertex).is_none() {
            partition.assign(vertex, next_singleton)?;
            next_singleton += 1;
        }
    }
    if next_singleton > segment_count {
        debug!(
            unsegmented = next_singleton - segment_count,
            "placed unsegmented vertices in singleton subsets"
        );
    }
    Ok(partition)
}
