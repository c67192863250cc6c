//! # Skeletal Gen
//!
//! The snapshot-to-object generation pipeline.
//!
//! ## Architecture
//!
//! ```text
//! Snapshot → mirror preprocess → dirty closure → per-part stroke meshes
//!          → component-tree CSG (cached) → quad recovery → weld
//!          → post-process → Object
//! ```
//!
//! The generator owns its snapshot and mutates it exactly once (mirror
//! preprocessing). A [`GeneratedCacheContext`] may be installed to carry
//! per-part, per-component, and combination results across generations of
//! edited snapshots; it is exclusively owned by one generator at a time
//! and handed back through [`MeshGenerator::take_cache_context`].

pub mod cache;
pub mod generator;
pub mod object;
pub mod quads;

// Re-export public API
pub use cache::{GeneratedCacheContext, GeneratedComponent, GeneratedPart};
pub use generator::MeshGenerator;
pub use object::{Object, ObjectEdge, ObjectNode, PartPreview, SourceNode};
pub use quads::{collect_shared_quad_edges, recover_quads};
