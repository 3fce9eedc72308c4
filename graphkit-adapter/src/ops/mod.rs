//! Built-in operation handlers.
//!
//! Each handler module exposes its registry `NAME`, a `run` entry point
//! using the default algorithm registry, and a `compute` function taking an
//! explicit registry.

pub mod edge_attribute;
pub mod segmentation_scalar;
