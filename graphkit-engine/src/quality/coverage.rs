//! Coverage: the share of edge weight that stays inside subsets.

use crate::{
    error::{EngineError, Result},
    graph::Graph,
    partition::Partition,
};

use super::{QualityMeasure, intra_and_total_weight};

/// Fraction of the total edge weight carried by intra-subset edges.
///
/// # Examples
/// ```
/// use graphkit_engine::{Coverage, Graph, Partition, QualityMeasure};
///
/// let mut graph = Graph::new(3, false, false);
/// graph.add_edge(0, 1, 1.0)?;
/// graph.add_edge(1, 2, 1.0)?;
/// let mut partition = Partition::new(3);
/// partition.assign(0, 0)?;
/// partition.assign(1, 0)?;
/// partition.assign(2, 1)?;
/// assert_eq!(Coverage.quality(&partition, &graph)?, 0.5);
/// # Ok::<(), graphkit_engine::EngineError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coverage;

impl QualityMeasure for Coverage {
    fn name(&self) -> &'static str {
        "Coverage"
    }

    fn quality(&self, partition: &Partition, graph: &Graph) -> Result<f64> {
        partition.ensure_total(graph.node_count())?;
        let (intra, total) = intra_and_total_weight(partition, graph);
        if total == 0.0 {
            return Err(EngineError::UndefinedQuality {
                measure: "Coverage",
                reason: "the graph has no edge weight",
            });
        }
        Ok(intra / total)
    }
}
