//! # Generation Cache
//!
//! Incremental state carried across generations of an edited snapshot:
//! per-part build results, per-component combined meshes, and the
//! combination-string-keyed boolean cache.
//!
//! All mesh handles are uniquely owned by their entry; overwriting or
//! removing an entry drops them.

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec3;
use skeletal_mesh::{PositionKey, SolidMesh};

use crate::object::{ObjectEdge, ObjectNode, SourceNode};

/// Everything remembered about one built part.
#[derive(Debug, Clone, Default)]
pub struct GeneratedPart {
    pub object_nodes: Vec<ObjectNode>,
    pub object_edges: Vec<ObjectEdge>,
    /// Generated vertex positions paired with their source node.
    pub object_node_vertices: Vec<(DVec3, SourceNode)>,
    /// Raw stroke-built mesh; quads possible.
    pub vertices: Vec<DVec3>,
    pub faces: Vec<Vec<usize>>,
    pub preview_vertices: Vec<DVec3>,
    pub preview_triangles: Vec<[usize; 3]>,
    /// Combinable handle; `None` when the build produced nothing usable.
    pub mesh: Option<SolidMesh>,
    pub is_successful: bool,
    /// True iff `target == Model` and the part is not disabled.
    pub joined: bool,
}

/// Everything remembered about one combined component.
#[derive(Debug, Clone, Default)]
pub struct GeneratedComponent {
    pub mesh: Option<SolidMesh>,
    /// Diagonals of original quads, for post-boolean quad recovery.
    pub shared_quad_edges: BTreeSet<(PositionKey, PositionKey)>,
    /// Positions that existed before any boolean step; protected from
    /// welding.
    pub none_seam_vertices: BTreeSet<PositionKey>,
    pub object_nodes: Vec<ObjectNode>,
    pub object_edges: Vec<ObjectEdge>,
    pub object_node_vertices: Vec<(DVec3, SourceNode)>,
    /// Sub-meshes the boolean engine refused; emitted verbatim.
    pub incombinable_meshes: Vec<SolidMesh>,
}

/// Reusable cache context spanning generations.
#[derive(Debug, Clone, Default)]
pub struct GeneratedCacheContext {
    pub parts: BTreeMap<String, GeneratedPart>,
    pub components: BTreeMap<String, GeneratedComponent>,
    /// Combination string → combined mesh; `None` memoizes failures.
    pub cached_combination: BTreeMap<String, Option<SolidMesh>>,
    /// Mirror twin part id → source part id, so twins survive the
    /// vanished-part sweep while their source still exists.
    pub part_mirror_id_map: BTreeMap<String, String>,
}

impl GeneratedCacheContext {
    pub fn new() -> Self {
        Self::default()
    }
}
