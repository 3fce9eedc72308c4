//! Adjacency-list graph used by every engine algorithm.
//!
//! Edges receive engine-internal ids only when [`Graph::index_edges`] runs.
//! Ids are assigned node-major over the adjacency lists, so they generally do
//! not follow the order in which edges were added. Callers that need to map
//! results back to their own edge order must query [`Graph::edge_id`].

use std::collections::HashMap;

use tracing::debug;

use crate::error::{EngineError, Result};

/// Position of a node within a [`Graph`].
pub type NodeId = usize;

/// Engine-internal edge identifier assigned by [`Graph::index_edges`].
pub type EdgeId = usize;

#[derive(Clone, Copy, Debug)]
struct HalfEdge {
    node: NodeId,
    weight: f64,
    // Position of the mirrored half-edge in the opposite adjacency list.
    twin: usize,
    id: Option<EdgeId>,
}

/// A single logical edge as seen through [`Graph::edges`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeView {
    /// Source endpoint. For undirected graphs this is the larger endpoint.
    pub source: NodeId,
    /// Target endpoint.
    pub target: NodeId,
    /// Edge weight; `1.0` for unweighted graphs.
    pub weight: f64,
    /// Engine edge id, present once the graph has been indexed.
    pub id: Option<EdgeId>,
}

/// In-memory graph with a fixed node count.
///
/// # Examples
/// ```
/// use graphkit_engine::Graph;
///
/// let mut graph = Graph::new(3, false, true);
/// graph.add_edge(2, 0, 1.0)?;
/// graph.add_edge(0, 1, 1.0)?;
/// graph.index_edges();
/// assert_eq!(graph.edge_count(), 2);
/// // Node 0's edge is numbered first even though it was added second.
/// assert_eq!(graph.edge_id(0, 1)?, 0);
/// assert_eq!(graph.edge_id(2, 0)?, 1);
/// # Ok::<(), graphkit_engine::EngineError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Graph {
    directed: bool,
    weighted: bool,
    outgoing: Vec<Vec<HalfEdge>>,
    // Only populated for directed graphs; undirected graphs mirror into `outgoing`.
    incoming: Vec<Vec<HalfEdge>>,
    edge_count: usize,
    edge_lookup: Option<HashMap<(NodeId, NodeId), EdgeId>>,
    upper_edge_id_bound: usize,
}

impl Graph {
    /// Creates a graph with `node_count` isolated nodes.
    #[must_use]
    pub fn new(node_count: usize, weighted: bool, directed: bool) -> Self {
        Self {
            directed,
            weighted,
            outgoing: vec![Vec::new(); node_count],
            incoming: if directed {
                vec![Vec::new(); node_count]
            } else {
                Vec::new()
            },
            edge_count: 0,
            edge_lookup: None,
            upper_edge_id_bound: 0,
        }
    }

    /// Adds an edge from `source` to `target`.
    ///
    /// Unweighted graphs ignore `weight` and store a unit weight. Adding an
    /// edge invalidates any existing edge index.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidNodeId`] when an endpoint is out of
    /// bounds and [`EngineError::NonFiniteWeight`] for NaN or infinite weights
    /// on weighted graphs.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, weight: f64) -> Result<()> {
        self.check_node(source)?;
        self.check_node(target)?;
        let weight = if self.weighted { weight } else { 1.0 };
        if !weight.is_finite() {
            return Err(EngineError::NonFiniteWeight {
                source_node: source,
                target_node: target,
                weight,
            });
        }

        if self.directed {
            let twin = self.incoming[target].len();
            let back = self.outgoing[source].len();
            self.outgoing[source].push(HalfEdge {
                node: target,
                weight,
                twin,
                id: None,
            });
            self.incoming[target].push(HalfEdge {
                node: source,
                weight,
                twin: back,
                id: None,
            });
        } else if source == target {
            let position = self.outgoing[source].len();
            self.outgoing[source].push(HalfEdge {
                node: target,
                weight,
                twin: position,
                id: None,
            });
        } else {
            let twin = self.outgoing[target].len();
            let back = self.outgoing[source].len();
            self.outgoing[source].push(HalfEdge {
                node: target,
                weight,
                twin,
                id: None,
            });
            self.outgoing[target].push(HalfEdge {
                node: source,
                weight,
                twin: back,
                id: None,
            });
        }

        self.edge_count += 1;
        self.edge_lookup = None;
        self.upper_edge_id_bound = 0;
        Ok(())
    }

    /// Assigns engine edge ids and builds the endpoint lookup table.
    ///
    /// Ids run from zero in node-major order: node `u`'s out-edges are
    /// numbered before node `u + 1`'s. An undirected edge is numbered when its
    /// larger endpoint is visited. When parallel edges share endpoints the
    /// lookup resolves to the lowest id among them.
    pub fn index_edges(&mut self) {
        let directed = self.directed;
        let mut next: EdgeId = 0;
        let mut lookup = HashMap::with_capacity(self.edge_count);
        let mut mirrored = Vec::new();

        for (source, list) in self.outgoing.iter_mut().enumerate() {
            for half in list.iter_mut() {
                if !directed && half.node > source {
                    continue;
                }
                half.id = Some(next);
                lookup
                    .entry(edge_key(directed, source, half.node))
                    .or_insert(next);
                if directed || half.node != source {
                    mirrored.push((half.node, half.twin, next));
                }
                next += 1;
            }
        }

        for (node, position, id) in mirrored {
            let list = if self.directed {
                &mut self.incoming[node]
            } else {
                &mut self.outgoing[node]
            };
            if let Some(half) = list.get_mut(position) {
                half.id = Some(id);
            }
        }

        debug!(
            nodes = self.node_count(),
            edges = self.edge_count,
            directed = self.directed,
            "indexed graph edges"
        );
        self.upper_edge_id_bound = next;
        self.edge_lookup = Some(lookup);
    }

    /// Returns whether [`Self::index_edges`] has run since the last mutation.
    #[must_use]
    pub fn has_edge_ids(&self) -> bool {
        self.edge_lookup.is_some()
    }

    /// Looks up the engine id of the edge joining `source` and `target`.
    ///
    /// For undirected graphs the endpoint order does not matter.
    ///
    /// # Errors
    /// Returns [`EngineError::EdgesNotIndexed`] before indexing,
    /// [`EngineError::InvalidNodeId`] for out-of-bounds endpoints, and
    /// [`EngineError::MissingEdge`] when no such edge exists.
    pub fn edge_id(&self, source: NodeId, target: NodeId) -> Result<EdgeId> {
        let lookup = self.edge_lookup.as_ref().ok_or(EngineError::EdgesNotIndexed)?;
        self.check_node(source)?;
        self.check_node(target)?;
        lookup
            .get(&edge_key(self.directed, source, target))
            .copied()
            .ok_or(EngineError::MissingEdge {
                source_node: source,
                target_node: target,
            })
    }

    /// Returns one past the largest assigned edge id; zero before indexing.
    #[must_use]
    pub fn upper_edge_id_bound(&self) -> usize {
        self.upper_edge_id_bound
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.outgoing.len()
    }

    /// Returns the number of logical edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns whether the graph is directed.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_directed(&self) -> bool { self.directed }

    /// Returns whether the graph stores explicit edge weights.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_weighted(&self) -> bool { self.weighted }

    /// Iterates over every logical edge exactly once.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView> + '_ {
        self.outgoing
            .iter()
            .enumerate()
            .flat_map(move |(source, list)| {
                list.iter()
                    .filter(move |half| self.directed || half.node <= source)
                    .map(move |half| EdgeView {
                        source,
                        target: half.node,
                        weight: half.weight,
                        id: half.id,
                    })
            })
    }

    /// Iterates over the out-neighbours of `node` with their edge weights and
    /// ids. Undirected graphs report every incident edge.
    pub fn neighbours(
        &self,
        node: NodeId,
    ) -> impl Iterator<Item = (NodeId, f64, Option<EdgeId>)> + '_ {
        self.outgoing
            .get(node)
            .into_iter()
            .flatten()
            .map(|half| (half.node, half.weight, half.id))
    }

    /// Iterates over the in-neighbours of `node`. Undirected graphs report
    /// the same edges as [`Self::neighbours`].
    pub fn in_neighbours(
        &self,
        node: NodeId,
    ) -> impl Iterator<Item = (NodeId, f64, Option<EdgeId>)> + '_ {
        let lists = if self.directed {
            &self.incoming
        } else {
            &self.outgoing
        };
        lists
            .get(node)
            .into_iter()
            .flatten()
            .map(|half| (half.node, half.weight, half.id))
    }

    /// Returns the number of out-edges of `node` (incident edges when
    /// undirected, a self-loop counted once).
    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.outgoing.get(node).map_or(0, Vec::len)
    }

    /// Returns the summed weight of the out-edges of `node`.
    #[must_use]
    pub fn weighted_degree(&self, node: NodeId) -> f64 {
        self.neighbours(node).map(|(_, weight, _)| weight).sum()
    }

    /// Returns the summed weight of the in-edges of `node`.
    #[must_use]
    pub fn weighted_in_degree(&self, node: NodeId) -> f64 {
        self.in_neighbours(node).map(|(_, weight, _)| weight).sum()
    }

    /// Returns the weighted degree of `node` counting self-loops twice, the
    /// convention used for undirected community volumes.
    #[must_use]
    pub fn volume(&self, node: NodeId) -> f64 {
        self.neighbours(node)
            .map(|(other, weight, _)| if other == node { 2.0 * weight } else { weight })
            .sum()
    }

    /// Returns the summed weight of all logical edges.
    #[must_use]
    pub fn total_edge_weight(&self) -> f64 {
        self.edges().map(|edge| edge.weight).sum()
    }

    fn check_node(&self, node: NodeId) -> Result<()> {
        if node < self.node_count() {
            Ok(())
        } else {
            Err(EngineError::InvalidNodeId {
                node,
                node_count: self.node_count(),
            })
        }
    }
}

fn edge_key(directed: bool, source: NodeId, target: NodeId) -> (NodeId, NodeId) {
    if directed || source >= target {
        (source, target)
    } else {
        (target, source)
    }
}

#[cfg(test)]
mod tests;
