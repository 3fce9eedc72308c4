//! Unit tests for graph construction and edge indexing.

use rstest::rstest;

use crate::EngineError;

use super::Graph;

fn build(node_count: usize, directed: bool, edges: &[(usize, usize)]) -> Graph {
    let mut graph = Graph::new(node_count, false, directed);
    for &(source, target) in edges {
        graph
            .add_edge(source, target, 1.0)
            .expect("test edges must be valid");
    }
    graph.index_edges();
    graph
}

#[test]
fn rejects_out_of_bounds_endpoints() {
    let mut graph = Graph::new(2, false, true);
    let err = graph.add_edge(0, 2, 1.0).expect_err("node 2 does not exist");
    assert_eq!(
        err,
        EngineError::InvalidNodeId {
            node: 2,
            node_count: 2
        }
    );
}

#[test]
fn rejects_non_finite_weights_on_weighted_graphs() {
    let mut graph = Graph::new(2, true, false);
    let err = graph
        .add_edge(0, 1, f64::INFINITY)
        .expect_err("infinite weight must be rejected");
    assert!(matches!(
        err,
        EngineError::NonFiniteWeight {
            source_node: 0,
            target_node: 1,
            ..
        }
    ));
}

#[test]
fn unweighted_graphs_store_unit_weights() {
    let mut graph = Graph::new(2, false, false);
    graph.add_edge(0, 1, 7.5).expect("edge must be valid");
    assert_eq!(graph.total_edge_weight(), 1.0);
}

#[test]
fn edge_lookup_requires_indexing() {
    let mut graph = Graph::new(2, false, true);
    graph.add_edge(0, 1, 1.0).expect("edge must be valid");
    assert!(!graph.has_edge_ids());
    assert_eq!(graph.edge_id(0, 1), Err(EngineError::EdgesNotIndexed));

    graph.index_edges();
    assert!(graph.has_edge_ids());
    assert_eq!(graph.edge_id(0, 1), Ok(0));
}

#[test]
fn adding_an_edge_drops_the_index() {
    let mut graph = build(3, true, &[(0, 1)]);
    graph.add_edge(1, 2, 1.0).expect("edge must be valid");
    assert!(!graph.has_edge_ids());
    assert_eq!(graph.upper_edge_id_bound(), 0);
}

#[test]
fn directed_ids_follow_node_order_not_insertion_order() {
    let graph = build(4, true, &[(2, 3), (0, 1), (1, 0)]);
    assert_eq!(graph.edge_id(0, 1), Ok(0));
    assert_eq!(graph.edge_id(1, 0), Ok(1));
    assert_eq!(graph.edge_id(2, 3), Ok(2));
    assert!(matches!(
        graph.edge_id(3, 2),
        Err(EngineError::MissingEdge {
            source_node: 3,
            target_node: 2
        })
    ));
    assert_eq!(graph.upper_edge_id_bound(), 3);
}

#[rstest]
#[case::forward(2, 3)]
#[case::backward(3, 2)]
fn undirected_lookup_ignores_endpoint_order(#[case] source: usize, #[case] target: usize) {
    let graph = build(4, false, &[(2, 3), (0, 1)]);
    assert_eq!(graph.edge_id(source, target), Ok(1));
    assert_eq!(graph.edge_id(1, 0), Ok(0));
}

#[test]
fn neighbours_carry_mirrored_ids() {
    let graph = build(3, false, &[(0, 1), (1, 2)]);
    let ids: Vec<_> = graph.neighbours(1).map(|(node, _, id)| (node, id)).collect();
    assert_eq!(ids, vec![(0, Some(0)), (2, Some(1))]);

    let directed = build(3, true, &[(0, 2), (1, 2)]);
    let incoming: Vec<_> = directed
        .in_neighbours(2)
        .map(|(node, _, id)| (node, id))
        .collect();
    assert_eq!(incoming, vec![(0, Some(0)), (1, Some(1))]);
}

#[test]
fn edges_yields_each_logical_edge_once() {
    let graph = build(3, false, &[(0, 1), (1, 2), (2, 2)]);
    let mut ids: Vec<_> = graph.edges().filter_map(|edge| edge.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn parallel_edges_resolve_to_the_lowest_id() {
    let graph = build(2, false, &[(0, 1), (1, 0)]);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.upper_edge_id_bound(), 2);
    assert_eq!(graph.edge_id(0, 1), Ok(0));
}

#[test]
fn volume_counts_self_loops_twice() {
    let mut graph = Graph::new(2, true, false);
    graph.add_edge(0, 0, 2.0).expect("loop must be valid");
    graph.add_edge(0, 1, 3.0).expect("edge must be valid");
    assert_eq!(graph.degree(0), 2);
    assert_eq!(graph.weighted_degree(0), 5.0);
    assert_eq!(graph.volume(0), 7.0);
    assert_eq!(graph.volume(1), 3.0);
}
