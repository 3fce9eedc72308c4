//! Single `f64` quality value of a segmentation.

use tracing::instrument;

use crate::{
    accessor::EntityAccessor, error::Result, registry::QualityRegistry,
    segmentation::SegmentationHelper,
};

/// Registry name of the operation.
///
/// Hosts still dispatching `NetworKitComputeSegmentationScalar` can register [`run`] under that
/// name as well with [`crate::OperationRepository::register`].
pub const NAME: &str = "ComputeSegmentationScalar";

/// Runs the operation with the built-in quality measures.
///
/// # Errors
/// See [`compute`].
pub fn run(accessor: &mut dyn EntityAccessor) -> Result<()> {
    compute(accessor, &QualityRegistry::with_defaults())
}

/// Scores the segmentation with the measure named by `op` and writes the
/// value to `sc`.
///
/// Engine resources are released before the outcome is returned, on every
/// exit path.
///
/// # Errors
/// Returns [`crate::OperationError::UnsupportedAlgorithm`] for an unknown
/// `op`, and access, options, conversion or engine errors.
#[instrument(name = "adapter.segmentation_scalar", err, skip_all)]
pub fn compute(accessor: &mut dyn EntityAccessor, registry: &QualityRegistry) -> Result<()> {
    let mut helper = SegmentationHelper::new(&*accessor)?;
    let outcome = helper.quality(registry);
    helper.cleanup();
    accessor.output_scalar("sc", outcome?)?;
    Ok(())
}
