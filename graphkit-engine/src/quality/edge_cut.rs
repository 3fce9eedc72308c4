//! Edge cut: the weight crossing subset boundaries.

use crate::{error::Result, graph::Graph, partition::Partition};

use super::{QualityMeasure, intra_and_total_weight};

/// Total weight of edges whose endpoints lie in different subsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeCut;

impl QualityMeasure for EdgeCut {
    fn name(&self) -> &'static str {
        "EdgeCut"
    }

    fn quality(&self, partition: &Partition, graph: &Graph) -> Result<f64> {
        partition.ensure_total(graph.node_count())?;
        let (intra, total) = intra_and_total_weight(partition, graph);
        Ok(total - intra)
    }
}
