//! # Stroke Meshing
//!
//! The two-stage sweep pipeline: the [`StrokeModifier`] refines a raw
//! skeleton (smoothing, subdivision, rounded ends, intermediate nodes)
//! while remembering which original node every refined node descends from;
//! the [`StrokeMeshBuilder`] then sweeps a 2D cut template along the
//! refined skeleton into a quad-dominant solid.

pub mod builder;
pub mod modifier;

pub use builder::StrokeMeshBuilder;
pub use modifier::{StrokeEdge, StrokeModifier, StrokeNode};
