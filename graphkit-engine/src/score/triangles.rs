//! Triangle count per edge.

use rayon::prelude::*;
use tracing::instrument;

use crate::{
    config::RunConfig,
    error::Result,
    graph::{EdgeId, Graph, NodeId},
};

use super::{EdgeScore, require_indexed};

/// Scores every edge by the number of triangles it belongs to.
///
/// Edge direction is ignored and self-loops never close a triangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriangleEdgeScore;

impl EdgeScore for TriangleEdgeScore {
    fn name(&self) -> &'static str {
        "TriangleEdgeScore"
    }

    #[instrument(
        name = "engine.triangles",
        err,
        skip(self, graph, config),
        fields(nodes = graph.node_count(), edges = graph.edge_count()),
    )]
    fn compute(&self, graph: &Graph, config: &RunConfig) -> Result<Vec<f64>> {
        require_indexed(graph)?;
        let neighbourhoods = undirected_neighbourhoods(graph);
        let edges: Vec<(NodeId, NodeId, EdgeId)> = graph
            .edges()
            .filter_map(|edge| edge.id.map(|id| (edge.source, edge.target, id)))
            .collect();

        let pool = config.thread_pool()?;
        let counts: Vec<(EdgeId, usize)> = pool.install(|| {
            edges
                .par_iter()
                .map(|&(source, target, id)| {
                    let shared = if source == target {
                        0
                    } else {
                        sorted_intersection(&neighbourhoods[source], &neighbourhoods[target])
                    };
                    (id, shared)
                })
                .collect()
        });

        let mut scores = vec![0.0; graph.upper_edge_id_bound()];
        for (id, count) in counts {
            if let Some(score) = scores.get_mut(id) {
                *score = count as f64;
            }
        }
        Ok(scores)
    }
}

fn undirected_neighbourhoods(graph: &Graph) -> Vec<Vec<NodeId>> {
    (0..graph.node_count())
        .map(|node| {
            let mut around: Vec<NodeId> = graph
                .neighbours(node)
                .chain(graph.in_neighbours(node))
                .map(|(other, _, _)| other)
                .filter(|other| *other != node)
                .collect();
            around.sort_unstable();
            around.dedup();
            around
        })
        .collect()
}

fn sorted_intersection(left: &[NodeId], right: &[NodeId]) -> usize {
    let (mut i, mut j, mut shared) = (0, 0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                shared += 1;
                i += 1;
                j += 1;
            }
        }
    }
    shared
}
