//! # Quad Recovery
//!
//! Boolean engines triangulate everything. The stroke meshes are
//! quad-dominant, so before combination every original quad records its
//! two diagonals (by quantized position); afterwards, adjacent triangle
//! pairs whose shared edge matches a recorded diagonal are merged back
//! into the original quad.

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec3;
use skeletal_mesh::PositionKey;

/// Record the diagonals of every 4-gon face.
///
/// Triangular faces contribute nothing.
pub fn collect_shared_quad_edges(
    vertices: &[DVec3],
    faces: &[Vec<usize>],
    shared_quad_edges: &mut BTreeSet<(PositionKey, PositionKey)>,
) {
    for face in faces {
        if face.len() != 4 {
            continue;
        }
        shared_quad_edges.insert((
            PositionKey::new(vertices[face[0]]),
            PositionKey::new(vertices[face[2]]),
        ));
        shared_quad_edges.insert((
            PositionKey::new(vertices[face[1]]),
            PositionKey::new(vertices[face[3]]),
        ));
    }
}

/// Merge triangle pairs back into quads across recorded diagonals.
///
/// Each triangle is unioned at most once; triangles never unioned are
/// emitted unchanged.
pub fn recover_quads(
    vertices: &[DVec3],
    triangles: &[[usize; 3]],
    shared_quad_edges: &BTreeSet<(PositionKey, PositionKey)>,
    triangle_and_quads: &mut Vec<Vec<usize>>,
) {
    let position_keys: Vec<PositionKey> =
        vertices.iter().map(|&v| PositionKey::new(v)).collect();

    // Directed edge → (owning triangle, opposite vertex).
    let mut triangle_edge_map: BTreeMap<(usize, usize), (usize, usize)> = BTreeMap::new();
    for (i, triangle) in triangles.iter().enumerate() {
        triangle_edge_map.insert((triangle[0], triangle[1]), (i, triangle[2]));
        triangle_edge_map.insert((triangle[1], triangle[2]), (i, triangle[0]));
        triangle_edge_map.insert((triangle[2], triangle[0]), (i, triangle[1]));
    }

    let mut unioned_faces: BTreeSet<usize> = BTreeSet::new();
    for (&(edge_a, edge_b), &(triangle_index, opposite)) in &triangle_edge_map {
        if unioned_faces.contains(&triangle_index) {
            continue;
        }
        let diagonal = (position_keys[edge_a], position_keys[edge_b]);
        if !shared_quad_edges.contains(&diagonal) {
            continue;
        }
        let Some(&(other_triangle, other_opposite)) = triangle_edge_map.get(&(edge_b, edge_a))
        else {
            continue;
        };
        if unioned_faces.contains(&other_triangle) {
            continue;
        }
        unioned_faces.insert(triangle_index);
        unioned_faces.insert(other_triangle);
        triangle_and_quads.push(vec![opposite, edge_a, other_opposite, edge_b]);
    }

    for (i, triangle) in triangles.iter().enumerate() {
        if !unioned_faces.contains(&i) {
            triangle_and_quads.push(triangle.to_vec());
        }
    }
}
