//! # Generated Object
//!
//! The final output of a generation pass, plus the per-part preview
//! artifacts surfaced alongside it.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use skeletal_model::Color;
use uuid::Uuid;

/// `(part id, node id)` pair identifying where geometry came from.
pub type SourceNode = (Uuid, Uuid);

/// Presentational view of one authored skeleton node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectNode {
    pub part_id: Uuid,
    pub node_id: Uuid,
    pub origin: DVec3,
    pub radius: f64,
    /// Direction of travel through the node during sweeping.
    pub direction: DVec3,
    pub color: Color,
    pub material_id: Uuid,
    pub countershaded: bool,
    pub color_solubility: f64,
    pub metalness: f64,
    pub roughness: f64,
    pub mirrored_by_part_id: Option<Uuid>,
    pub mirror_from_part_id: Option<Uuid>,
    /// Whether the owning part joins the combined model.
    pub joined: bool,
}

/// Presentational view of one authored skeleton edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEdge {
    pub first: SourceNode,
    pub second: SourceNode,
}

/// The generated polygonal object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Object {
    /// Opaque generation id, echoed from the generator.
    pub mesh_id: u64,
    pub nodes: Vec<ObjectNode>,
    pub edges: Vec<ObjectEdge>,
    pub vertices: Vec<DVec3>,
    pub triangles: Vec<[usize; 3]>,
    /// Faces of size 3 or 4, after quad recovery.
    pub triangle_and_quads: Vec<Vec<usize>>,
    pub triangle_normals: Vec<DVec3>,
    /// Smooth-shaded normals, three per triangle.
    pub triangle_vertex_normals: Vec<[DVec3; 3]>,
    pub triangle_colors: Vec<Color>,
    pub triangle_source_nodes: Vec<SourceNode>,
    pub vertex_source_nodes: Vec<SourceNode>,
}

/// Preview artifacts produced while building one part.
///
/// Parts targeting `CutFace` carry their extracted template polygon
/// instead of mesh data.
#[derive(Debug, Clone, Default)]
pub struct PartPreview {
    pub vertices: Vec<DVec3>,
    pub triangles: Vec<[usize; 3]>,
    pub vertex_normals: Vec<[DVec3; 3]>,
    pub color: Color,
    pub metalness: f64,
    pub roughness: f64,
    pub cut_template: Vec<DVec2>,
}
