//! Final object post-processing: face normals, triangle source
//! resolution, per-triangle colors, smooth vertex normals.

use std::collections::BTreeMap;

use glam::DVec3;
use skeletal_mesh::{resolve_triangle_source_node, smooth_normal};
use skeletal_model::Color;

use crate::object::{Object, SourceNode};

use super::MeshGenerator;

fn face_normal(vertices: &[DVec3], triangle: &[usize; 3]) -> DVec3 {
    (vertices[triangle[1]] - vertices[triangle[0]])
        .cross(vertices[triangle[2]] - vertices[triangle[0]])
        .normalize_or_zero()
}

impl MeshGenerator {
    pub(crate) fn postprocess_object(&self, object: &mut Object) {
        object.triangle_normals = object
            .triangles
            .iter()
            .map(|t| face_normal(&object.vertices, t))
            .collect();

        let mut triangle_sources: Vec<SourceNode> = Vec::new();
        let mut vertex_sources: Vec<SourceNode> = Vec::new();
        resolve_triangle_source_node(
            &object.vertices,
            &object.triangles,
            &self.node_vertices,
            &mut triangle_sources,
            &mut vertex_sources,
        );
        object.vertex_source_nodes = vertex_sources;

        let source_to_color: BTreeMap<SourceNode, Color> = object
            .nodes
            .iter()
            .map(|node| ((node.part_id, node.node_id), node.color))
            .collect();
        object.triangle_colors = triangle_sources
            .iter()
            .map(|source| {
                source_to_color
                    .get(source)
                    .copied()
                    .unwrap_or(Color::WHITE)
            })
            .collect();
        object.triangle_source_nodes = triangle_sources;

        object.triangle_vertex_normals = self.generate_smooth_triangle_vertex_normals(
            &object.vertices,
            &object.triangles,
            &object.triangle_normals,
        );
    }

    /// Smooth per-corner normals under the configured crease threshold,
    /// regrouped three per triangle.
    pub(crate) fn generate_smooth_triangle_vertex_normals(
        &self,
        vertices: &[DVec3],
        triangles: &[[usize; 3]],
        triangle_normals: &[DVec3],
    ) -> Vec<[DVec3; 3]> {
        let mut corner_normals = Vec::new();
        smooth_normal(
            vertices,
            triangles,
            triangle_normals,
            self.smooth_shading_threshold_angle_degrees,
            &mut corner_normals,
        );
        triangles
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let base = i * 3;
                [
                    corner_normals.get(base).copied().unwrap_or(DVec3::ZERO),
                    corner_normals.get(base + 1).copied().unwrap_or(DVec3::ZERO),
                    corner_normals.get(base + 2).copied().unwrap_or(DVec3::ZERO),
                ]
            })
            .collect()
    }
}
