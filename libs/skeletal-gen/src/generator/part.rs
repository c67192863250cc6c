//! Per-part stroke meshing.
//!
//! Builds one part's mesh from its node/edge skeleton: assembles the
//! stroke modifier, sweeps with the stroke mesh builder, fixes up mirror
//! twins, wraps the result in a combinable handle, and caches everything
//! alongside preview artifacts. Failures are reported as flags; the
//! caller owns the retry policy.

use std::collections::{BTreeMap, BTreeSet};

use config::constants::PREVIEW_SCALE;
use glam::DVec3;
use skeletal_mesh::{trim_vertices, triangulate_faces, SolidMesh, StrokeMeshBuilder, StrokeModifier};
use skeletal_model::{Attributes, Color, PartBase, PartTarget};
use uuid::Uuid;

use crate::cache::{GeneratedCacheContext, GeneratedPart};
use crate::object::{ObjectEdge, ObjectNode, PartPreview};

use super::{chamfer_face, MeshGenerator};

fn uuid_or_nil(value: &str) -> Uuid {
    Uuid::parse_str(value).unwrap_or_default()
}

#[derive(Debug, Clone, Default)]
struct NodeInfo {
    radius: f64,
    position: DVec3,
    has_cut_face_settings: bool,
    cut_rotation: f64,
    cut_face: String,
    direction: DVec3,
}

impl MeshGenerator {
    /// Build one part's mesh.
    ///
    /// Returns `(mesh, has_error, retryable)`. The mesh is `None` for
    /// disabled and non-`Model` parts even when the build succeeded (their
    /// previews are still cached); `has_error` is only raised for parts
    /// that were supposed to join the model.
    pub(crate) fn build_part_mesh(
        &mut self,
        cache: &mut GeneratedCacheContext,
        part_id: &str,
        add_intermediate_nodes: bool,
    ) -> (Option<SolidMesh>, bool, bool) {
        let Some(part) = self.snapshot.parts.get(part_id).cloned() else {
            return (None, false, true);
        };

        let mut retryable = true;

        let is_disabled = part.read_bool("disabled");
        let mirrored_by_part_id = part.str_or_empty("__mirroredByPartId").to_string();
        let mirror_from_part_id = part.str_or_empty("__mirrorFromPartId").to_string();
        let subdived = part.read_bool("subdived");
        let rounded = part.read_bool("rounded");
        let chamfered = part.read_bool("chamfered");
        let countershaded = part.read_bool("countershaded");
        let smooth = part.read_bool("smooth");
        let part_color = Color::parse(part.str_or_empty("color"))
            .unwrap_or(self.default_part_color);
        let target = PartTarget::from_attribute(part.str_or_empty("target"));
        let base = PartBase::from_attribute(part.str_or_empty("base"));

        // A twin meshes its mirror source's skeleton.
        let search_part_id = if mirror_from_part_id.is_empty() {
            part_id.to_string()
        } else {
            mirror_from_part_id.clone()
        };

        let cut_face = part.str_or_empty("cutFace").to_string();
        let mut cut_template = self.cut_template_from_string(&cut_face);
        if chamfered {
            chamfer_face(&mut cut_template);
        }
        let cut_rotation = part.read_float_or("cutRotation", 0.0);
        let hollow_thickness = part.read_float_or("hollowThickness", 0.0);
        let deform_thickness = part.read_float_or("deformThickness", 1.0);
        let deform_width = part.read_float_or("deformWidth", 1.0);
        let deform_unified = part.read_bool("deformUnified");
        let material_id = part.read_uuid("materialId");
        let color_solubility = part.read_float_or("colorSolubility", 0.0);
        let metalness = part.read_float_or("metallic", 0.0);
        let roughness = part.read_float_or("roughness", 1.0);
        if part.read_uuid("fillMesh").is_some() {
            // Externally filled parts cannot be rebuilt with different
            // interpolation, so the retry does not apply.
            retryable = false;
        }

        let mut part_cache = GeneratedPart {
            joined: target == PartTarget::Model && !is_disabled,
            ..Default::default()
        };

        let mut node_infos: BTreeMap<String, NodeInfo> = BTreeMap::new();
        if let Some(node_ids) = self.part_node_ids.get(&search_part_id) {
            for node_id in node_ids {
                let Some(node) = self.snapshot.nodes.get(node_id) else {
                    continue;
                };
                let radius = node.read_float_or("radius", 0.0);
                let x = node.read_float_or("x", 0.0) - self.main_profile_middle_x;
                let y = self.main_profile_middle_y - node.read_float_or("y", 0.0);
                let z = self.side_profile_middle_x - node.read_float_or("z", 0.0);

                let mut info = NodeInfo {
                    radius,
                    position: DVec3::new(x, y, z),
                    ..Default::default()
                };
                if let Some(node_cut_face) = node.get("cutFace") {
                    info.has_cut_face_settings = true;
                    info.cut_face = node_cut_face.clone();
                    info.cut_rotation = node.read_float_or("cutRotation", 0.0);
                }
                node_infos.insert(node_id.clone(), info);
            }
        }

        let mut edges: BTreeSet<(String, String)> = BTreeSet::new();
        if let Some(edge_ids) = self.part_edge_ids.get(&search_part_id) {
            for edge_id in edge_ids {
                let Some(edge) = self.snapshot.edges.get(edge_id) else {
                    continue;
                };
                let from = edge.str_or_empty("from").to_string();
                let to = edge.str_or_empty("to").to_string();
                if !node_infos.contains_key(&from) || !node_infos.contains_key(&to) {
                    continue;
                }
                edges.insert((from, to));
            }
        }

        let mut modifier = StrokeModifier::new();
        if smooth {
            modifier.enable_smooth();
        }
        if add_intermediate_nodes {
            modifier.enable_intermediate_addition();
        }

        let mut node_id_to_index: BTreeMap<String, usize> = BTreeMap::new();
        let mut node_index_to_id: BTreeMap<usize, String> = BTreeMap::new();
        for (node_id, info) in &node_infos {
            let node_index = if info.has_cut_face_settings {
                let mut node_template = self.cut_template_from_string(&info.cut_face);
                if chamfered {
                    chamfer_face(&mut node_template);
                }
                modifier.add_node(info.position, info.radius, node_template, info.cut_rotation)
            } else {
                modifier.add_node(
                    info.position,
                    info.radius,
                    cut_template.clone(),
                    cut_rotation,
                )
            };
            node_id_to_index.insert(node_id.clone(), node_index);
            node_index_to_id.insert(node_index, node_id.clone());
        }
        for (from, to) in &edges {
            let (Some(&from_index), Some(&to_index)) =
                (node_id_to_index.get(from), node_id_to_index.get(to))
            else {
                continue;
            };
            modifier.add_edge(from_index, to_index);
        }

        if subdived {
            modifier.subdivide();
        }
        if rounded {
            modifier.round_end();
        }
        modifier.finalize();

        let mut builder = StrokeMeshBuilder::new();
        builder.set_deform_thickness(deform_thickness);
        builder.set_deform_width(deform_width);
        builder.set_deform_unified(deform_unified);
        builder.set_hollow_thickness(hollow_thickness);
        match base {
            PartBase::YZ => builder.enable_base_normal_on_x(false),
            PartBase::Average => builder.enable_base_normal_average(true),
            PartBase::XY => builder.enable_base_normal_on_z(false),
            PartBase::ZX => builder.enable_base_normal_on_y(false),
            PartBase::XYZ => {}
        }

        for (source_index, node) in modifier.nodes().iter().enumerate() {
            let builder_index = builder.add_node(
                node.position,
                node.radius,
                node.cut_template.clone(),
                node.cut_rotation,
            );
            builder.set_node_origin_info(builder_index, source_index);
        }
        for edge in modifier.edges() {
            builder.add_edge(edge.first_node_index, edge.second_node_index);
        }

        let build_succeed = builder.build();

        for node in builder.nodes() {
            let source_node = &modifier.nodes()[node.source_node_index];
            if !source_node.is_original {
                continue;
            }
            if let Some(node_id) = node_index_to_id.get(&node.source_node_index) {
                if let Some(info) = node_infos.get_mut(node_id) {
                    info.direction = node.traverse_direction;
                }
            }
        }

        for (node_id, info) in &node_infos {
            let mut object_node = ObjectNode {
                part_id: uuid_or_nil(part_id),
                node_id: uuid_or_nil(node_id),
                origin: info.position,
                radius: info.radius,
                direction: info.direction,
                color: part_color,
                material_id: material_id.unwrap_or_default(),
                countershaded,
                color_solubility,
                metalness,
                roughness,
                mirrored_by_part_id: (!mirrored_by_part_id.is_empty())
                    .then(|| uuid_or_nil(&mirrored_by_part_id)),
                mirror_from_part_id: (!mirror_from_part_id.is_empty())
                    .then(|| uuid_or_nil(&mirror_from_part_id)),
                joined: part_cache.joined,
            };
            if object_node.mirror_from_part_id.is_some() {
                object_node.origin.x = -info.position.x;
            }
            part_cache.object_nodes.push(object_node);
        }
        for (from, to) in &edges {
            part_cache.object_edges.push(ObjectEdge {
                first: (uuid_or_nil(part_id), uuid_or_nil(from)),
                second: (uuid_or_nil(part_id), uuid_or_nil(to)),
            });
        }

        part_cache.vertices = builder.generated_vertices().to_vec();
        part_cache.faces = builder.generated_faces().to_vec();
        if !mirror_from_part_id.is_empty() {
            for vertex in &mut part_cache.vertices {
                vertex.x = -vertex.x;
            }
            for face in &mut part_cache.faces {
                face.reverse();
            }
        }
        let source_indices = builder.generated_vertices_source_node_indices();
        for (i, &position) in part_cache.vertices.iter().enumerate() {
            let origin_index = modifier.nodes()[source_indices[i]].origin_node_index;
            let Some(node_id) = node_index_to_id.get(&origin_index) else {
                continue;
            };
            part_cache
                .object_node_vertices
                .push((position, (uuid_or_nil(part_id), uuid_or_nil(node_id))));
        }

        let mut has_mesh_error = false;
        let mut mesh: Option<SolidMesh> = None;
        if build_succeed {
            mesh = SolidMesh::from_faces(&part_cache.vertices, &part_cache.faces);
            if mesh.is_none() {
                has_mesh_error = true;
            }
        } else {
            has_mesh_error = true;
        }

        let mut preview_vertices: Vec<DVec3>;
        let mut preview_color = part_color;
        if let Some(built) = &mesh {
            part_cache.mesh = Some(built.clone());
            let mut fetched_vertices = Vec::new();
            let mut fetched_triangles = Vec::new();
            built.fetch(&mut fetched_vertices, &mut fetched_triangles);
            part_cache.preview_triangles = fetched_triangles;
            part_cache.preview_vertices = fetched_vertices.clone();
            part_cache.is_successful = true;
            preview_vertices = fetched_vertices;
        } else {
            preview_vertices = Vec::new();
        }
        if part_cache.preview_triangles.is_empty() {
            preview_vertices = part_cache.vertices.clone();
            triangulate_faces(
                &preview_vertices,
                &part_cache.faces,
                &mut part_cache.preview_triangles,
            );
            part_cache.preview_vertices = preview_vertices.clone();
            preview_color = Color::RED;
            part_cache.is_successful = false;
            tracing::warn!(part = part_id, "part build failed, using error preview");
        }

        trim_vertices(&mut preview_vertices, true);
        for vertex in &mut preview_vertices {
            *vertex *= PREVIEW_SCALE;
        }
        let preview_triangle_normals: Vec<DVec3> = part_cache
            .preview_triangles
            .iter()
            .map(|t| {
                (preview_vertices[t[1]] - preview_vertices[t[0]])
                    .cross(preview_vertices[t[2]] - preview_vertices[t[0]])
                    .normalize_or_zero()
            })
            .collect();
        let preview_vertex_normals = self.generate_smooth_triangle_vertex_normals(
            &preview_vertices,
            &part_cache.preview_triangles,
            &preview_triangle_normals,
        );

        if !part_cache.preview_triangles.is_empty() {
            let part_uuid = uuid_or_nil(part_id);
            if target == PartTarget::CutFace {
                let template = self.cut_template_from_string(part_id);
                self.generated_part_previews
                    .entry(part_uuid)
                    .or_default()
                    .cut_template = template;
                self.generated_preview_image_part_ids.insert(part_uuid);
            } else {
                let preview = PartPreview {
                    vertices: preview_vertices,
                    triangles: part_cache.preview_triangles.clone(),
                    vertex_normals: preview_vertex_normals,
                    color: preview_color,
                    metalness,
                    roughness,
                    cut_template: Vec::new(),
                };
                self.generated_part_previews.insert(part_uuid, preview);
                self.generated_preview_part_ids.insert(part_uuid);
            }
        }

        if is_disabled || target != PartTarget::Model {
            mesh = None;
        }

        let has_error = has_mesh_error && target == PartTarget::Model;
        cache.parts.insert(part_id.to_string(), part_cache);
        (mesh, has_error, retryable)
    }
}

#[cfg(test)]
mod tests {
    use skeletal_model::Snapshot;

    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> skeletal_model::AttributeMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const PART: &str = "a1000000-0000-4000-8000-000000000001";
    const NODE: &str = "0000000a-0000-4000-8000-00000000000a";

    fn single_node_snapshot(extra_part_attrs: &[(&str, &str)]) -> Snapshot {
        let mut snapshot = Snapshot::new();
        let mut part = attrs(&[("id", PART)]);
        for (k, v) in extra_part_attrs {
            part.insert(k.to_string(), v.to_string());
        }
        snapshot.parts.insert(PART.to_string(), part);
        snapshot.nodes.insert(
            NODE.to_string(),
            attrs(&[
                ("partId", PART),
                ("radius", "1"),
                ("x", "0"),
                ("y", "0"),
                ("z", "0"),
            ]),
        );
        snapshot
    }

    fn build(snapshot: Snapshot) -> (MeshGenerator, GeneratedCacheContext, Option<SolidMesh>) {
        let mut generator = MeshGenerator::new(snapshot);
        generator.collect_parts();
        let mut cache = GeneratedCacheContext::new();
        let (mesh, has_error, _retryable) = generator.build_part_mesh(&mut cache, PART, true);
        assert!(!has_error);
        (generator, cache, mesh)
    }

    #[test]
    fn test_single_node_part_builds_combinable_mesh() {
        let (_generator, cache, mesh) = build(single_node_snapshot(&[]));
        let mesh = mesh.expect("model part keeps its mesh");
        assert!(mesh.is_combinable());
        let part_cache = cache.parts.get(PART).unwrap();
        assert!(part_cache.is_successful);
        assert!(part_cache.joined);
        assert!(!part_cache.preview_triangles.is_empty());
        assert_eq!(part_cache.object_nodes.len(), 1);
        // Every generated vertex maps back to the single node.
        assert_eq!(
            part_cache.object_node_vertices.len(),
            part_cache.vertices.len()
        );
    }

    #[test]
    fn test_disabled_part_discards_mesh_but_keeps_preview() {
        let (_generator, cache, mesh) = build(single_node_snapshot(&[("disabled", "true")]));
        assert!(mesh.is_none());
        let part_cache = cache.parts.get(PART).unwrap();
        assert!(!part_cache.joined);
        assert!(part_cache.is_successful);
        assert!(!part_cache.preview_triangles.is_empty());
    }

    #[test]
    fn test_cut_face_target_extracts_template_preview() {
        let (generator, _cache, mesh) =
            build(single_node_snapshot(&[("target", "CutFace")]));
        assert!(mesh.is_none());
        let part_uuid = Uuid::parse_str(PART).unwrap();
        assert!(generator
            .generated_preview_image_part_ids()
            .contains(&part_uuid));
        let preview = generator.part_preview(&part_uuid).unwrap();
        assert!(!preview.cut_template.is_empty());
    }

    #[test]
    fn test_missing_part_is_silently_skipped() {
        let mut generator = MeshGenerator::new(Snapshot::new());
        let mut cache = GeneratedCacheContext::new();
        let (mesh, has_error, retryable) =
            generator.build_part_mesh(&mut cache, "no-such-part", true);
        assert!(mesh.is_none());
        assert!(!has_error);
        assert!(retryable);
    }
}
