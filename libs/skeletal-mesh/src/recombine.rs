//! # Mesh Recombiner
//!
//! Regenerates clean topology after a boolean step. Plane clipping leaves
//! duplicated and near-coincident vertices along the seam; the recombiner
//! snaps seam vertices onto surviving original vertices, merges coincident
//! positions, and drops the degenerate faces that fall out.
//!
//! The caller decides whether to adopt the result: the combiner only keeps
//! a recombined mesh when it is watertight and still combinable.

use std::collections::BTreeMap;

use glam::DVec3;

use crate::boolean::VertexSource;
use crate::position_key::PositionKey;

/// Seam vertices snap onto original vertices within this distance.
const SEAM_SNAP_DISTANCE: f64 = 1e-4;

/// Topology regeneration over a combined mesh.
#[derive(Debug, Default)]
pub struct MeshRecombiner {
    vertices: Vec<DVec3>,
    sources: Vec<(VertexSource, usize)>,
    faces: Vec<[usize; 3]>,
    regenerated_vertices: Vec<DVec3>,
    regenerated_faces: Vec<Vec<usize>>,
}

impl MeshRecombiner {
    pub fn set_vertices(&mut self, vertices: &[DVec3], sources: &[(VertexSource, usize)]) {
        self.vertices = vertices.to_vec();
        self.sources = sources.to_vec();
    }

    pub fn set_faces(&mut self, faces: &[[usize; 3]]) {
        self.faces = faces.to_vec();
    }

    /// Run regeneration. Returns false when nothing usable came out.
    pub fn recombine(&mut self) -> bool {
        self.regenerated_vertices.clear();
        self.regenerated_faces.clear();
        if self.vertices.is_empty() || self.faces.is_empty() {
            return false;
        }

        // Index the original (non-seam) vertices for snapping.
        let mut original_by_key: BTreeMap<PositionKey, usize> = BTreeMap::new();
        for (i, &v) in self.vertices.iter().enumerate() {
            let is_seam = matches!(self.sources.get(i), Some((VertexSource::None, _)) | None);
            if !is_seam {
                original_by_key.entry(PositionKey::new(v)).or_insert(i);
            }
        }

        let snapped: Vec<DVec3> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let is_seam = matches!(self.sources.get(i), Some((VertexSource::None, _)) | None);
                if !is_seam {
                    return v;
                }
                match original_by_key.get(&PositionKey::new(v)) {
                    Some(&original)
                        if (self.vertices[original] - v).length() <= SEAM_SNAP_DISTANCE =>
                    {
                        self.vertices[original]
                    }
                    _ => v,
                }
            })
            .collect();

        // Merge coincident positions and rebuild faces.
        let mut index_of: BTreeMap<PositionKey, usize> = BTreeMap::new();
        let mut remap = Vec::with_capacity(snapped.len());
        for &v in &snapped {
            let index = *index_of.entry(PositionKey::new(v)).or_insert_with(|| {
                self.regenerated_vertices.push(v);
                self.regenerated_vertices.len() - 1
            });
            remap.push(index);
        }

        for face in &self.faces {
            let mapped = [remap[face[0]], remap[face[1]], remap[face[2]]];
            if mapped[0] == mapped[1] || mapped[1] == mapped[2] || mapped[2] == mapped[0] {
                continue;
            }
            self.regenerated_faces
                .push(vec![mapped[0], mapped[1], mapped[2]]);
        }

        !self.regenerated_faces.is_empty()
    }

    pub fn regenerated_vertices(&self) -> &[DVec3] {
        &self.regenerated_vertices
    }

    pub fn regenerated_faces(&self) -> &[Vec<usize>] {
        &self.regenerated_faces
    }
}
