use std::sync::Arc;

use graphkit_engine::{EngineError, EngineErrorCode};
use rstest::rstest;

#[rstest]
#[case(
    EngineError::InvalidNodeId { node: 3, node_count: 2 },
    EngineErrorCode::InvalidNodeId,
    "ENGINE_INVALID_NODE_ID",
)]
#[case(EngineError::EdgesNotIndexed, EngineErrorCode::EdgesNotIndexed, "ENGINE_EDGES_NOT_INDEXED")]
#[case(
    EngineError::MissingEdge { source_node: 0, target_node: 1 },
    EngineErrorCode::MissingEdge,
    "ENGINE_MISSING_EDGE",
)]
#[case(
    EngineError::UnassignedNode { node: 0 },
    EngineErrorCode::UnassignedNode,
    "ENGINE_UNASSIGNED_NODE",
)]
#[case(
    EngineError::InvalidParameter { name: "spread_prob", reason: Arc::from("out of range") },
    EngineErrorCode::InvalidParameter,
    "ENGINE_INVALID_PARAMETER",
)]
#[case(
    EngineError::UndefinedQuality { measure: "Coverage", reason: "no edges" },
    EngineErrorCode::UndefinedQuality,
    "ENGINE_UNDEFINED_QUALITY",
)]
#[case(
    EngineError::InvalidThreadCount { value: Arc::from("zero") },
    EngineErrorCode::InvalidThreadCount,
    "ENGINE_INVALID_THREAD_COUNT",
)]
fn returns_expected_engine_code(
    #[case] error: EngineError,
    #[case] expected: EngineErrorCode,
    #[case] raw: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(expected.as_str(), raw);
    assert_eq!(expected.to_string(), raw);
}

#[test]
fn messages_name_the_offending_values() {
    let err = EngineError::MissingEdge {
        source_node: 4,
        target_node: 7,
    };
    assert_eq!(err.to_string(), "graph has no edge from 4 to 7");
}
