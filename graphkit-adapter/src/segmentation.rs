//! Shared set-up and tear-down for operations over a segmentation.

use graphkit_engine::{Graph, Partition};
use tracing::{debug, instrument};

use crate::{
    accessor::EntityAccessor,
    convert::{to_engine_graph, to_engine_partition},
    error::{OperationError, Result},
    options::Options,
    registry::QualityRegistry,
};

/// Engine graph and partition owned by one invocation.
#[derive(Debug)]
struct Resources {
    graph: Graph,
    partition: Partition,
}

/// Loads a graph and its segmentation into engine form and releases them
/// exactly once.
///
/// Reads the inputs `vs`, `es`, the optional `weight`, `segments` and
/// `belongsTo`, and the parameters `op` and `options`. Resources are released
/// by [`SegmentationHelper::cleanup`] or, if that is never reached, when the
/// helper is dropped.
#[derive(Debug)]
pub struct SegmentationHelper {
    op: String,
    options: Options,
    resources: Option<Resources>,
}

impl SegmentationHelper {
    /// Reads the invocation inputs and builds the engine graph and
    /// partition.
    ///
    /// # Errors
    /// Returns [`OperationError`] when an input is missing or cannot be
    /// converted.
    #[instrument(name = "adapter.segmentation_helper", err, skip_all)]
    pub fn new(accessor: &dyn EntityAccessor) -> Result<Self> {
        let op = accessor.string_param("op")?;
        let options = accessor.map_param("options")?;
        let directed = options.directed()?;

        let vertices = accessor.vertex_set("vs")?;
        let edges = accessor.edge_bundle("es")?;
        let weights = accessor.double_attribute_opt("weight")?;
        let segments = accessor.vertex_set("segments")?;
        let belongs_to = accessor.edge_bundle("belongsTo")?;

        let graph = to_engine_graph(&vertices, &edges, weights.as_deref(), directed)?;
        let partition = to_engine_partition(&vertices, &segments, &belongs_to)?;
        debug!(
            op = op.as_str(),
            subsets = partition.subset_count(),
            "segmentation resources acquired"
        );
        Ok(Self {
            op,
            options,
            resources: Some(Resources { graph, partition }),
        })
    }

    /// Returns the requested algorithm name.
    #[must_use]
    #[rustfmt::skip]
    pub fn op(&self) -> &str { &self.op }

    /// Returns the invocation options.
    #[must_use]
    #[rustfmt::skip]
    pub fn options(&self) -> &Options { &self.options }

    /// Returns the engine graph.
    ///
    /// # Errors
    /// Returns [`OperationError::ResourcesReleased`] after cleanup.
    pub fn graph(&self) -> Result<&Graph> {
        Ok(&self.resources()?.graph)
    }

    /// Returns the engine partition.
    ///
    /// # Errors
    /// Returns [`OperationError::ResourcesReleased`] after cleanup.
    pub fn partition(&self) -> Result<&Partition> {
        Ok(&self.resources()?.partition)
    }

    /// Computes the quality measure named by `op`.
    ///
    /// # Errors
    /// Returns [`OperationError::UnsupportedAlgorithm`] when `op` is not in
    /// `registry`, [`OperationError::ResourcesReleased`] after cleanup, and
    /// [`OperationError::Engine`] when the measure is undefined.
    pub fn quality(&self, registry: &QualityRegistry) -> Result<f64> {
        let measure = registry.build(&self.op, &self.options)?;
        let resources = self.resources()?;
        Ok(measure.quality(&resources.partition, &resources.graph)?)
    }

    /// Releases the engine graph and partition.
    ///
    /// Returns `true` when this call released them and `false` when they had
    /// already been released.
    pub fn cleanup(&mut self) -> bool {
        match self.resources.take() {
            Some(resources) => {
                drop(resources);
                debug!(op = self.op.as_str(), "segmentation resources released");
                true
            }
            None => false,
        }
    }

    /// Returns whether the resources are still held.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_live(&self) -> bool { self.resources.is_some() }

    fn resources(&self) -> Result<&Resources> {
        self.resources
            .as_ref()
            .ok_or(OperationError::ResourcesReleased)
    }
}

impl Drop for SegmentationHelper {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        accessor::MemoryAccessor,
        entity::{EdgeBundle, VertexSet},
    };

    fn single_segment_path(op: &str) -> MemoryAccessor {
        MemoryAccessor::new()
            .with_input("vs", VertexSet::new(4))
            .with_input(
                "es",
                EdgeBundle::new(vec![0, 1, 2], vec![1, 2, 3]).expect("columns match"),
            )
            .with_input("segments", VertexSet::new(1))
            .with_input(
                "belongsTo",
                EdgeBundle::new(vec![0, 1, 2, 3], vec![0, 0, 0, 0]).expect("columns match"),
            )
            .with_string_param("op", op)
            .with_map_param("options", r#"{"directed": false}"#)
    }

    #[test]
    fn helper_builds_graph_and_partition() {
        let helper = SegmentationHelper::new(&single_segment_path("Coverage")).expect("loads");
        assert_eq!(helper.op(), "Coverage");
        assert!(!helper.graph().expect("live").is_directed());
        assert_eq!(helper.partition().expect("live").subset_count(), 1);
        assert_eq!(
            helper.quality(&QualityRegistry::with_defaults()),
            Ok(1.0)
        );
    }

    #[test]
    fn cleanup_releases_once() {
        let mut helper = SegmentationHelper::new(&single_segment_path("EdgeCut")).expect("loads");
        assert!(helper.cleanup());
        assert!(!helper.cleanup());
        assert!(!helper.is_live());
        assert_eq!(
            helper.quality(&QualityRegistry::with_defaults()),
            Err(OperationError::ResourcesReleased)
        );
    }

    #[test]
    fn missing_segmentation_is_an_access_error() {
        let accessor = MemoryAccessor::new()
            .with_input("vs", VertexSet::new(1))
            .with_input("es", EdgeBundle::default())
            .with_string_param("op", "Coverage");
        let err = SegmentationHelper::new(&accessor).expect_err("segments missing");
        assert!(matches!(err, OperationError::Access(_)));
    }
}
