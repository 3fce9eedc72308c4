//! Uniform random edge score, mostly useful as a baseline.

use rand::Rng;

use crate::{config::RunConfig, error::Result, graph::Graph};

use super::{EdgeScore, require_indexed};

/// Assigns every edge an independent uniform value in `[0, 1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RandomEdgeScore;

impl EdgeScore for RandomEdgeScore {
    fn name(&self) -> &'static str {
        "RandomEdgeScore"
    }

    fn compute(&self, graph: &Graph, config: &RunConfig) -> Result<Vec<f64>> {
        require_indexed(graph)?;
        let mut rng = config.rng_for(0);
        Ok((0..graph.upper_edge_id_bound())
            .map(|_| rng.r#gen::<f64>())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_unit_interval_and_seeded() {
        let mut graph = Graph::new(4, false, true);
        for (source, target) in [(0, 1), (1, 2), (2, 3)] {
            graph.add_edge(source, target, 1.0).expect("edge is valid");
        }
        graph.index_edges();

        let first = RandomEdgeScore
            .compute(&graph, &RunConfig::new(3))
            .expect("graph is indexed");
        let second = RandomEdgeScore
            .compute(&graph, &RunConfig::new(3))
            .expect("graph is indexed");
        let other = RandomEdgeScore
            .compute(&graph, &RunConfig::new(4))
            .expect("graph is indexed");

        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|value| (0.0..1.0).contains(value)));
        assert_eq!(first, second);
        assert_ne!(first, other);
    }
}
