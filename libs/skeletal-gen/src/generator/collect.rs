//! Collection of geometry that bypassed the main combination: parts whose
//! build failed (red error previews), components marked `Uncombined`, and
//! sub-meshes the boolean engine refused.

use skeletal_model::{Attributes, CombineMode};

use crate::cache::{GeneratedCacheContext, GeneratedComponent};
use crate::object::Object;
use crate::quads::recover_quads;

use super::{split_children, MeshGenerator};

fn offset_faces(faces: &mut [Vec<usize>], vertex_start_index: usize) {
    for face in faces {
        for index in face {
            *index += vertex_start_index;
        }
    }
}

impl MeshGenerator {
    /// Append failed joined parts as raw geometry so the author still sees
    /// them (the preview layer colors them red).
    pub(crate) fn collect_errored_parts(
        &self,
        cache: &GeneratedCacheContext,
        object: &mut Object,
    ) {
        for part_cache in cache.parts.values() {
            if part_cache.is_successful || !part_cache.joined {
                continue;
            }

            let mut error_triangle_and_quads = part_cache.faces.clone();
            offset_faces(&mut error_triangle_and_quads, object.vertices.len());
            object.vertices.extend(part_cache.vertices.iter().copied());
            object.triangle_and_quads.extend(error_triangle_and_quads);

            let vertex_start_index = object.vertices.len();
            object
                .vertices
                .extend(part_cache.preview_vertices.iter().copied());
            object.triangles.extend(
                part_cache.preview_triangles.iter().map(|t| {
                    [
                        t[0] + vertex_start_index,
                        t[1] + vertex_start_index,
                        t[2] + vertex_start_index,
                    ]
                }),
            );
        }
    }

    /// Append one incombinable mesh, recovering its quads from the owning
    /// component's diagonal records.
    fn collect_incombinable_mesh(
        object: &mut Object,
        mesh: &skeletal_mesh::SolidMesh,
        component_cache: &GeneratedComponent,
    ) {
        let mut uncombined_vertices = Vec::new();
        let mut uncombined_triangles = Vec::new();
        mesh.fetch(&mut uncombined_vertices, &mut uncombined_triangles);

        let mut uncombined_triangle_and_quads = Vec::new();
        recover_quads(
            &uncombined_vertices,
            &uncombined_triangles,
            &component_cache.shared_quad_edges,
            &mut uncombined_triangle_and_quads,
        );

        let vertex_start_index = object.vertices.len();
        offset_faces(&mut uncombined_triangle_and_quads, vertex_start_index);
        object.vertices.extend(uncombined_vertices);
        object.triangles.extend(uncombined_triangles.iter().map(|t| {
            [
                t[0] + vertex_start_index,
                t[1] + vertex_start_index,
                t[2] + vertex_start_index,
            ]
        }));
        object.triangle_and_quads.extend(uncombined_triangle_and_quads);
    }

    /// Emit `Uncombined` components verbatim, recursing past everything
    /// else.
    pub(crate) fn collect_uncombined_component(
        &mut self,
        cache: &GeneratedCacheContext,
        object: &mut Object,
        component_id: &str,
    ) {
        let Some(component) = self.find_component_attrs(component_id) else {
            return;
        };
        if Self::component_combine_mode(Some(&component)) == CombineMode::Uncombined {
            let Some(component_cache) = cache.components.get(component_id) else {
                return;
            };
            let Some(mesh) = &component_cache.mesh else {
                return;
            };

            object
                .nodes
                .extend(component_cache.object_nodes.iter().cloned());
            object
                .edges
                .extend(component_cache.object_edges.iter().cloned());
            self.node_vertices
                .extend(component_cache.object_node_vertices.iter().cloned());

            Self::collect_incombinable_mesh(object, mesh, component_cache);
            return;
        }
        for child_id in split_children(component.str_or_empty("children")) {
            self.collect_uncombined_component(cache, object, &child_id);
        }
    }

    /// Emit every sub-mesh the boolean engine refused; each one marks the
    /// generation unsuccessful.
    pub(crate) fn collect_incombinable_component_meshes(
        &mut self,
        cache: &GeneratedCacheContext,
        object: &mut Object,
        component_id: &str,
    ) {
        let Some(component) = self.find_component_attrs(component_id) else {
            return;
        };
        if Self::component_combine_mode(Some(&component)) == CombineMode::Uncombined {
            return;
        }
        if let Some(component_cache) = cache.components.get(component_id) {
            for mesh in &component_cache.incombinable_meshes {
                self.is_successful = false;
                Self::collect_incombinable_mesh(object, mesh, component_cache);
            }
        }
        for child_id in split_children(component.str_or_empty("children")) {
            self.collect_incombinable_component_meshes(cache, object, &child_id);
        }
    }
}
