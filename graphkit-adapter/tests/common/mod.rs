//! Accessor fixtures shared by the adapter integration tests.

use graphkit_adapter::{EdgeBundle, MemoryAccessor, VertexSet};

/// Builds an edge bundle from endpoint slices.
pub fn bundle(src: &[usize], dst: &[usize]) -> EdgeBundle {
    EdgeBundle::new(src.to_vec(), dst.to_vec()).expect("fixture columns match")
}

/// Graph inputs `vs` and `es` for `vertices` vertices and the given edges.
pub fn graph_inputs(vertices: usize, src: &[usize], dst: &[usize]) -> MemoryAccessor {
    MemoryAccessor::new()
        .with_input("vs", VertexSet::new(vertices))
        .with_input("es", bundle(src, dst))
}

/// Adds a segmentation with `segments` segments and the given memberships.
pub fn with_segmentation(
    accessor: MemoryAccessor,
    segments: usize,
    members: &[usize],
    owners: &[usize],
) -> MemoryAccessor {
    accessor
        .with_input("segments", VertexSet::new(segments))
        .with_input("belongsTo", bundle(members, owners))
}

/// The 4-vertex path `0-1-2-3` with every vertex in one segment.
pub fn single_segment_path(op: &str, options: &str) -> MemoryAccessor {
    with_segmentation(
        graph_inputs(4, &[0, 1, 2], &[1, 2, 3]),
        1,
        &[0, 1, 2, 3],
        &[0, 0, 0, 0],
    )
    .with_string_param("op", op)
    .with_map_param("options", options)
}
