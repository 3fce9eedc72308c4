//! Modularity: coverage minus the coverage expected by chance.

use crate::{
    error::{EngineError, Result},
    graph::Graph,
    partition::Partition,
};

use super::{QualityMeasure, intra_and_total_weight};

/// Newman modularity of a partition.
///
/// Undirected graphs compare against a configuration model where subset `c`
/// expects `(vol_c / 2m)^2` of the weight; directed graphs use
/// `out_c * in_c / m^2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modularity;

impl QualityMeasure for Modularity {
    fn name(&self) -> &'static str {
        "Modularity"
    }

    fn quality(&self, partition: &Partition, graph: &Graph) -> Result<f64> {
        partition.ensure_total(graph.node_count())?;
        let (intra, total) = intra_and_total_weight(partition, graph);
        if total == 0.0 {
            return Err(EngineError::UndefinedQuality {
                measure: "Modularity",
                reason: "the graph has no edge weight",
            });
        }

        let subsets = partition.upper_bound();
        let expected = if graph.is_directed() {
            let mut out_weight = vec![0.0; subsets];
            let mut in_weight = vec![0.0; subsets];
            for node in 0..graph.node_count() {
                if let Some(subset) = partition.subset_of(node) {
                    out_weight[subset] += graph.weighted_degree(node);
                    in_weight[subset] += graph.weighted_in_degree(node);
                }
            }
            out_weight
                .iter()
                .zip(&in_weight)
                .map(|(out, into)| out * into)
                .sum::<f64>()
                / (total * total)
        } else {
            let mut volume = vec![0.0; subsets];
            for node in 0..graph.node_count() {
                if let Some(subset) = partition.subset_of(node) {
                    volume[subset] += graph.volume(node);
                }
            }
            volume.iter().map(|vol| vol * vol).sum::<f64>() / (4.0 * total * total)
        };

        Ok(intra / total - expected)
    }
}
