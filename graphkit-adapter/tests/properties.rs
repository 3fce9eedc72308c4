//! Property tests for conversion and edge identity reconciliation.

use std::collections::HashSet;

use graphkit_adapter::{
    EdgeBundle, MemoryAccessor, OperationRepository, VertexSet, convert::to_engine_graph,
    reconcile::edge_scores_to_attribute,
};
use proptest::prelude::*;

/// Any bundle over a vertex set, parallel edges included.
fn any_bundle() -> impl Strategy<Value = (usize, Vec<usize>, Vec<usize>)> {
    (1_usize..16).prop_flat_map(|vertices| {
        proptest::collection::vec((0..vertices, 0..vertices), 0..48).prop_map(move |pairs| {
            let (src, dst): (Vec<usize>, Vec<usize>) = pairs.into_iter().unzip();
            (vertices, src, dst)
        })
    })
}

/// A bundle with no two edges joining the same ordered pair.
fn simple_bundle() -> impl Strategy<Value = (usize, Vec<usize>, Vec<usize>)> {
    any_bundle().prop_map(|(vertices, src, dst)| {
        let mut seen = HashSet::new();
        let (src, dst): (Vec<usize>, Vec<usize>) = src
            .into_iter()
            .zip(dst)
            .filter(|pair| seen.insert(*pair))
            .unzip();
        (vertices, src, dst)
    })
}

proptest! {
    #[test]
    fn conversion_preserves_vertex_and_edge_counts(
        (vertices, src, dst) in any_bundle(),
        directed in any::<bool>(),
    ) {
        let edges = EdgeBundle::new(src, dst).expect("columns match");
        let graph = to_engine_graph(&VertexSet::new(vertices), &edges, None, directed)
            .expect("generated endpoints are in range");
        prop_assert_eq!(graph.node_count(), vertices);
        prop_assert_eq!(graph.edge_count(), edges.len());
    }

    #[test]
    fn reconciliation_recovers_engine_ids((vertices, src, dst) in simple_bundle()) {
        let edges = EdgeBundle::new(src, dst).expect("columns match");
        let graph = to_engine_graph(&VertexSet::new(vertices), &edges, None, true)
            .expect("generated endpoints are in range");
        let scores: Vec<f64> = (0..graph.upper_edge_id_bound()).map(|id| id as f64).collect();
        let attr = edge_scores_to_attribute(&graph, &edges, &scores)
            .expect("simple bundles reconcile");

        prop_assert_eq!(attr.len(), edges.len());
        let mut ids = HashSet::new();
        for (position, (source, target)) in edges.iter().enumerate() {
            let id = graph.edge_id(source, target).expect("edge exists");
            prop_assert_eq!(attr.get(position), Some(id as f64));
            prop_assert!(ids.insert(id), "engine id {} reused", id);
        }
    }

    #[test]
    fn nan_marks_exactly_the_undefined_entries(
        (vertices, src, dst) in simple_bundle(),
        nan_mask in proptest::collection::vec(any::<bool>(), 48),
    ) {
        let edges = EdgeBundle::new(src, dst).expect("columns match");
        let graph = to_engine_graph(&VertexSet::new(vertices), &edges, None, true)
            .expect("generated endpoints are in range");
        let scores: Vec<f64> = (0..graph.upper_edge_id_bound())
            .map(|id| if nan_mask[id] { f64::NAN } else { 0.5 })
            .collect();
        let attr = edge_scores_to_attribute(&graph, &edges, &scores)
            .expect("simple bundles reconcile");

        for (value, defined) in attr.values().iter().zip(attr.defined()) {
            prop_assert_eq!(value.is_nan(), !defined);
        }
    }

    #[test]
    fn seeded_edge_attributes_are_repeatable(
        (vertices, src, dst) in simple_bundle(),
        seed in 0_u64..1_000,
    ) {
        let repository = OperationRepository::with_defaults();
        let run = || {
            let mut accessor = MemoryAccessor::new()
                .with_input("vs", VertexSet::new(vertices))
                .with_input("es", EdgeBundle::new(src.clone(), dst.clone()).expect("columns match"))
                .with_string_param("op", "RandomEdgeScore")
                .with_map_param("options", format!(r#"{{"seed": {seed}}}"#));
            repository
                .execute("ComputeDoubleEdgeAttribute", &mut accessor)
                .expect("simple bundles reconcile");
            accessor.output_attribute("attr").cloned().expect("`attr` is written")
        };
        prop_assert_eq!(run(), run());
    }
}
