//! # Solid Mesh Handle
//!
//! The combinable mesh handle passed between the part builder, the boolean
//! engine, and the combination cache. Construction triangulates the input
//! faces once and decides combinability up front; afterwards the handle is
//! an immutable value whose clones are explicit.

use glam::DVec3;

use crate::topology::is_watertight;
use crate::triangulate::triangulate_faces;

/// A triangulated solid suitable for boolean combination.
///
/// "Null" meshes (no usable geometry) never exist as values — constructors
/// return `None` instead, and callers thread `Option<SolidMesh>` through
/// the pipeline the same way the cache memoizes failed combinations.
#[derive(Debug, Clone)]
pub struct SolidMesh {
    vertices: Vec<DVec3>,
    triangles: Vec<[usize; 3]>,
    combinable: bool,
}

impl SolidMesh {
    /// Build from a mixed triangle/quad/n-gon face list.
    ///
    /// Returns `None` when the input has no vertices or triangulates to
    /// nothing. The mesh is combinable iff its triangulation is watertight.
    pub fn from_faces(vertices: &[DVec3], faces: &[Vec<usize>]) -> Option<Self> {
        if vertices.is_empty() || faces.is_empty() {
            return None;
        }
        let mut triangles = Vec::with_capacity(faces.len() * 2);
        triangulate_faces(vertices, faces, &mut triangles);
        Self::from_triangles(vertices.to_vec(), triangles)
    }

    /// Build from an already-triangulated face list.
    pub fn from_triangles(vertices: Vec<DVec3>, triangles: Vec<[usize; 3]>) -> Option<Self> {
        if vertices.is_empty() || triangles.is_empty() {
            return None;
        }
        let combinable = is_watertight(&triangles);
        Some(Self {
            vertices,
            triangles,
            combinable,
        })
    }

    /// Whether this mesh may enter a boolean operation.
    pub fn is_combinable(&self) -> bool {
        self.combinable
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Copy the triangulated geometry out.
    pub fn fetch(&self, vertices: &mut Vec<DVec3>, triangles: &mut Vec<[usize; 3]>) {
        vertices.clear();
        vertices.extend_from_slice(&self.vertices);
        triangles.clear();
        triangles.extend_from_slice(&self.triangles);
    }
}
