//! Per-edge `f64` attribute computed by an engine edge score.

use tracing::{Span, field, instrument};

use crate::{
    accessor::EntityAccessor,
    convert::to_engine_graph,
    error::Result,
    reconcile::edge_scores_to_attribute,
    registry::EdgeScoreRegistry,
};

/// Registry name of the operation.
///
/// Hosts still dispatching `NetworKitComputeDoubleEdgeAttribute` can register [`run`] under that
/// name as well with [`crate::OperationRepository::register`].
pub const NAME: &str = "ComputeDoubleEdgeAttribute";

/// Runs the operation with the built-in edge scores.
///
/// # Errors
/// See [`compute`].
pub fn run(accessor: &mut dyn EntityAccessor) -> Result<()> {
    compute(accessor, &EdgeScoreRegistry::with_defaults())
}

/// Computes the edge score named by the `op` parameter over `vs`/`es`
/// (weighted by `weight` when present) and writes it to `attr`.
///
/// Nothing is written unless the whole computation succeeds.
///
/// # Errors
/// Returns [`crate::OperationError::UnsupportedAlgorithm`] for an unknown
/// `op`, and access, options, conversion, engine or reconciliation errors.
#[instrument(
    name = "adapter.edge_attribute",
    err,
    skip_all,
    fields(op = field::Empty, seed = field::Empty)
)]
pub fn compute(accessor: &mut dyn EntityAccessor, registry: &EdgeScoreRegistry) -> Result<()> {
    let op = accessor.string_param("op")?;
    Span::current().record("op", op.as_str());
    let options = accessor.map_param("options")?;
    let score = registry.build(&op, &options)?;
    let config = options.run_config()?;
    Span::current().record("seed", config.seed());

    let vertices = accessor.vertex_set("vs")?;
    let edges = accessor.edge_bundle("es")?;
    let weights = accessor.double_attribute_opt("weight")?;
    let attribute = {
        let graph = to_engine_graph(&vertices, &edges, weights.as_deref(), options.directed()?)?;
        let scores = score.compute(&graph, &config)?;
        edge_scores_to_attribute(&graph, &edges, &scores)?
    };
    accessor.output("attr", attribute.into())?;
    Ok(())
}
