//! Forest-fire edge score.
//!
//! Repeatedly starts a fire at a random node. Each burning node spreads to a
//! geometrically distributed number of unburnt neighbours, and every edge
//! the fire travels along gains one point. Fires continue until the total
//! number of burnt edges reaches `burn_ratio` times the edge count.
//!
//! Fire `i` draws from random stream `i` of the run configuration and fires
//! are merged in index order, so a given seed yields the same scores for any
//! worker count.

use std::{collections::VecDeque, sync::Arc};

use rand::{Rng, rngs::SmallRng};
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use crate::{
    config::RunConfig,
    error::{EngineError, Result},
    graph::{EdgeId, Graph, NodeId},
};

use super::{EdgeScore, require_indexed};

const FIRES_PER_ROUND: u64 = 64;
const MAX_IDLE_ROUNDS: usize = 1024;

/// Scores edges by how often randomly started forest fires burn them.
///
/// # Examples
/// ```
/// use graphkit_engine::{EdgeScore, ForestFireScore, Graph, RunConfig};
///
/// let mut graph = Graph::new(3, false, false);
/// graph.add_edge(0, 1, 1.0)?;
/// graph.add_edge(1, 2, 1.0)?;
/// graph.index_edges();
///
/// let score = ForestFireScore::new(0.7, 5.0)?;
/// let scores = score.compute(&graph, &RunConfig::new(1))?;
/// assert_eq!(scores.len(), 2);
/// assert!(scores.iter().sum::<f64>() >= 10.0);
/// # Ok::<(), graphkit_engine::EngineError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForestFireScore {
    spread_prob: f64,
    burn_ratio: f64,
}

impl ForestFireScore {
    /// Creates the score with the probability that a fire keeps spreading from
    /// a node and the ratio of edges to burn relative to the edge count.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidParameter`] unless
    /// `0 < spread_prob < 1` and `burn_ratio` is positive and finite.
    pub fn new(spread_prob: f64, burn_ratio: f64) -> Result<Self> {
        if !(spread_prob > 0.0 && spread_prob < 1.0) {
            return Err(EngineError::InvalidParameter {
                name: "spread_prob",
                reason: Arc::from(format!("must lie strictly between 0 and 1 (got {spread_prob})")),
            });
        }
        if !(burn_ratio.is_finite() && burn_ratio > 0.0) {
            return Err(EngineError::InvalidParameter {
                name: "burn_ratio",
                reason: Arc::from(format!("must be positive and finite (got {burn_ratio})")),
            });
        }
        Ok(Self {
            spread_prob,
            burn_ratio,
        })
    }

    /// Returns the spreading probability.
    #[must_use]
    #[rustfmt::skip]
    pub fn spread_prob(&self) -> f64 { self.spread_prob }

    /// Returns the burn ratio.
    #[must_use]
    #[rustfmt::skip]
    pub fn burn_ratio(&self) -> f64 { self.burn_ratio }

    fn burn(&self, graph: &Graph, rng: &mut SmallRng) -> Vec<EdgeId> {
        let node_count = graph.node_count();
        let mut visited = vec![false; node_count];
        let start = rng.gen_range(0..node_count);
        visited[start] = true;
        let mut queue = VecDeque::from([start]);
        let mut burnt = Vec::new();

        while let Some(node) = queue.pop_front() {
            let mut budget = geometric(rng, self.spread_prob);
            let mut candidates: Vec<(NodeId, EdgeId)> = graph
                .neighbours(node)
                .filter(|(next, _, _)| !visited[*next])
                .filter_map(|(next, _, id)| id.map(|id| (next, id)))
                .collect();
            while budget > 0 && !candidates.is_empty() {
                let pick = rng.gen_range(0..candidates.len());
                let (next, id) = candidates.swap_remove(pick);
                // Parallel edges can offer a neighbour that has burnt already.
                if visited[next] {
                    continue;
                }
                visited[next] = true;
                queue.push_back(next);
                burnt.push(id);
                budget -= 1;
            }
        }
        burnt
    }
}

impl EdgeScore for ForestFireScore {
    fn name(&self) -> &'static str {
        "ForestFireScore"
    }

    #[instrument(
        name = "engine.forest_fire",
        err,
        skip(self, graph, config),
        fields(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            seed = config.seed(),
            threads = config.threads().get(),
        ),
    )]
    fn compute(&self, graph: &Graph, config: &RunConfig) -> Result<Vec<f64>> {
        require_indexed(graph)?;
        let mut scores = vec![0.0; graph.upper_edge_id_bound()];
        if graph.edge_count() == 0 {
            return Ok(scores);
        }

        let target = burn_target(self.burn_ratio, graph.edge_count());
        let pool = config.thread_pool()?;
        let mut burnt = 0_usize;
        let mut next_fire = 0_u64;
        let mut idle_rounds = 0_usize;

        while burnt < target {
            let first = next_fire;
            let fires: Vec<Vec<EdgeId>> = pool.install(|| {
                (first..first + FIRES_PER_ROUND)
                    .into_par_iter()
                    .map(|fire| self.burn(graph, &mut config.rng_for(fire)))
                    .collect()
            });
            next_fire += FIRES_PER_ROUND;

            let before = burnt;
            for fire in fires {
                if burnt >= target {
                    break;
                }
                for id in &fire {
                    if let Some(score) = scores.get_mut(*id) {
                        *score += 1.0;
                    }
                }
                burnt += fire.len();
            }

            if burnt == before {
                idle_rounds += 1;
                if idle_rounds >= MAX_IDLE_ROUNDS {
                    warn!(burnt, target, "forest fires stopped spreading, returning partial scores");
                    break;
                }
            } else {
                idle_rounds = 0;
            }
        }

        debug!(burnt, target, fires = next_fire, "forest fire score completed");
        Ok(scores)
    }
}

fn burn_target(burn_ratio: f64, edge_count: usize) -> usize {
    // Float-to-integer `as` saturates, which caps absurd ratios.
    (burn_ratio * edge_count as f64).ceil() as usize
}

fn geometric(rng: &mut SmallRng, spread_prob: f64) -> usize {
    let mut count = 0;
    while rng.r#gen::<f64>() < spread_prob {
        count += 1;
    }
    count
}
