//! Hub dominance: how well one node dominates each subset.

use crate::{
    error::{EngineError, Result},
    graph::Graph,
    partition::Partition,
};

use super::QualityMeasure;

/// Mean over non-empty subsets of the largest internal degree divided by the
/// largest possible internal degree (`size - 1`).
///
/// Degrees count distinct edges, not weights. Singleton subsets count as
/// fully dominated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HubDominance;

impl QualityMeasure for HubDominance {
    fn name(&self) -> &'static str {
        "HubDominance"
    }

    fn quality(&self, partition: &Partition, graph: &Graph) -> Result<f64> {
        partition.ensure_total(graph.node_count())?;
        let sizes = partition.subset_sizes();
        let mut max_internal = vec![0_usize; sizes.len()];

        for node in 0..graph.node_count() {
            let Some(subset) = partition.subset_of(node) else {
                continue;
            };
            let internal = graph
                .neighbours(node)
                .filter(|(other, _, _)| *other != node && partition.subset_of(*other) == Some(subset))
                .count();
            if let Some(best) = max_internal.get_mut(subset) {
                *best = (*best).max(internal);
            }
        }

        let mut dominance = 0.0;
        let mut subsets = 0_usize;
        for (size, best) in sizes.iter().zip(&max_internal) {
            match *size {
                0 => continue,
                1 => dominance += 1.0,
                size => dominance += *best as f64 / (size - 1) as f64,
            }
            subsets += 1;
        }

        if subsets == 0 {
            return Err(EngineError::UndefinedQuality {
                measure: "HubDominance",
                reason: "the partition has no subsets",
            });
        }
        Ok(dominance / subsets as f64)
    }
}
