//! Node partitions consumed by the quality measures.

use crate::{
    error::{EngineError, Result},
    graph::NodeId,
};

/// Assignment of nodes to numbered subsets.
///
/// A freshly created partition leaves every node unassigned. Quality measures
/// require a total partition; see [`Partition::ensure_total`].
///
/// # Examples
/// ```
/// use graphkit_engine::Partition;
///
/// let mut partition = Partition::new(3);
/// partition.assign(0, 4)?;
/// partition.assign(1, 4)?;
/// partition.assign(2, 0)?;
/// assert_eq!(partition.subset_of(1), Some(4));
/// assert_eq!(partition.subset_count(), 2);
/// # Ok::<(), graphkit_engine::EngineError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    subsets: Vec<Option<usize>>,
    upper_bound: usize,
}

impl Partition {
    /// Creates a partition over `node_count` unassigned nodes.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            subsets: vec![None; node_count],
            upper_bound: 0,
        }
    }

    /// Creates a partition that places every node in its own subset.
    #[must_use]
    pub fn all_to_singletons(node_count: usize) -> Self {
        Self {
            subsets: (0..node_count).map(Some).collect(),
            upper_bound: node_count,
        }
    }

    /// Moves `node` into `subset`, replacing any earlier assignment.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidNodeId`] when `node` is out of bounds.
    pub fn assign(&mut self, node: NodeId, subset: usize) -> Result<()> {
        let node_count = self.subsets.len();
        let slot = self
            .subsets
            .get_mut(node)
            .ok_or(EngineError::InvalidNodeId { node, node_count })?;
        *slot = Some(subset);
        self.upper_bound = self.upper_bound.max(subset.saturating_add(1));
        Ok(())
    }

    /// Returns the subset of `node`, if assigned.
    #[must_use]
    pub fn subset_of(&self, node: NodeId) -> Option<usize> {
        self.subsets.get(node).copied().flatten()
    }

    /// Returns the number of nodes covered by the partition.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    /// Returns whether the partition covers no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }

    /// Returns one past the largest subset id in use.
    #[must_use]
    pub fn upper_bound(&self) -> usize {
        self.upper_bound
    }

    /// Returns the size of every subset id below [`Self::upper_bound`].
    #[must_use]
    pub fn subset_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.upper_bound];
        for subset in self.subsets.iter().flatten() {
            if let Some(size) = sizes.get_mut(*subset) {
                *size += 1;
            }
        }
        sizes
    }

    /// Returns the number of non-empty subsets.
    #[must_use]
    pub fn subset_count(&self) -> usize {
        self.subset_sizes().iter().filter(|size| **size > 0).count()
    }

    /// Verifies that the partition assigns every node of a graph with
    /// `node_count` nodes.
    ///
    /// # Errors
    /// Returns [`EngineError::PartitionSizeMismatch`] when the sizes differ and
    /// [`EngineError::UnassignedNode`] for the first node without a subset.
    pub fn ensure_total(&self, node_count: usize) -> Result<()> {
        if self.subsets.len() != node_count {
            return Err(EngineError::PartitionSizeMismatch {
                partition: self.subsets.len(),
                node_count,
            });
        }
        match self.subsets.iter().position(Option::is_none) {
            Some(node) => Err(EngineError::UnassignedNode { node }),
            None => Ok(()),
        }
    }
}
