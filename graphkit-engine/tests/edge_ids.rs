//! Property tests for engine edge indexing.

use std::collections::HashSet;

use graphkit_engine::Graph;
use proptest::prelude::*;

/// Generates a node count and a set of distinct directed endpoint pairs.
fn simple_directed_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1_usize..12).prop_flat_map(|nodes| {
        let pairs = proptest::collection::vec((0..nodes, 0..nodes), 0..40).prop_map(|pairs| {
            let mut seen = HashSet::new();
            pairs
                .into_iter()
                .filter(|pair| seen.insert(*pair))
                .collect::<Vec<_>>()
        });
        (Just(nodes), pairs)
    })
}

proptest! {
    #[test]
    fn indexing_assigns_each_edge_a_distinct_id((nodes, pairs) in simple_directed_graph()) {
        let mut graph = Graph::new(nodes, false, true);
        for &(source, target) in &pairs {
            graph.add_edge(source, target, 1.0).expect("generated edges are in bounds");
        }
        graph.index_edges();

        prop_assert_eq!(graph.node_count(), nodes);
        prop_assert_eq!(graph.edge_count(), pairs.len());
        prop_assert_eq!(graph.upper_edge_id_bound(), pairs.len());

        let ids: HashSet<usize> = pairs
            .iter()
            .map(|&(source, target)| graph.edge_id(source, target).expect("edge was added"))
            .collect();
        prop_assert_eq!(ids.len(), pairs.len());
        prop_assert!(ids.iter().all(|id| *id < pairs.len()));
    }

    #[test]
    fn edge_views_agree_with_lookups((nodes, pairs) in simple_directed_graph()) {
        let mut graph = Graph::new(nodes, false, true);
        for &(source, target) in &pairs {
            graph.add_edge(source, target, 1.0).expect("generated edges are in bounds");
        }
        graph.index_edges();

        for edge in graph.edges() {
            prop_assert_eq!(edge.id, Some(graph.edge_id(edge.source, edge.target).expect("edge exists")));
        }
    }
}
