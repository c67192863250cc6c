//! # Skeletal Mesh
//!
//! Geometry kernel for the skeletal mesh pipeline.
//!
//! ## Architecture
//!
//! ```text
//! stroke (sweep builder) → SolidMesh → boolean (BSP CSG) → recombine/weld
//! ```
//!
//! The crate hosts every geometric collaborator the generation pipeline
//! invokes: the combinable solid-mesh handle, the boolean engine with
//! per-vertex source labels, the recombiner, welding, triangulation,
//! vertex trimming, smooth normals, triangle source resolution, cut-face
//! presets, and the stroke modifier/builder pair.

pub mod boolean;
pub mod cut_face;
pub mod error;
pub mod position_key;
pub mod recombine;
pub mod smooth_normal;
pub mod solid;
pub mod source_resolve;
pub mod stroke;
pub mod topology;
pub mod triangulate;
pub mod trim;
pub mod weld;

// Re-export public API
pub use boolean::{combine, BooleanMethod, VertexSource};
pub use cut_face::{cut_face_points_from_nodes, CutFaceNode, CutFacePreset};
pub use error::MeshError;
pub use position_key::PositionKey;
pub use recombine::MeshRecombiner;
pub use smooth_normal::smooth_normal;
pub use solid::SolidMesh;
pub use source_resolve::resolve_triangle_source_node;
pub use stroke::{StrokeMeshBuilder, StrokeModifier};
pub use topology::is_watertight;
pub use triangulate::triangulate_faces;
pub use trim::trim_vertices;
pub use weld::weld_vertices;
