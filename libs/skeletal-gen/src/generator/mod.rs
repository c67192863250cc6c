//! # Mesh Generator
//!
//! Orchestrates the whole pipeline over one snapshot. The submodules hold
//! the pipeline stages as `impl MeshGenerator` blocks:
//!
//! - [`mirror`]: twin synthesis for x-mirrored parts
//! - [`dirty`]: dirty-closure analysis and cache eviction
//! - [`cut_template`]: cut-section polygon extraction
//! - [`part`]: per-part stroke meshing
//! - [`combine`]: component-tree boolean combination
//! - [`collect`]: errored/uncombined/incombinable geometry collection
//! - [`postprocess`]: normals, sources, colors

mod collect;
mod combine;
mod cut_template;
mod dirty;
mod mirror;
mod part;
mod postprocess;

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec3;
use skeletal_mesh::weld_vertices;
use skeletal_model::{nil_uuid_string, Attributes, Color, Snapshot};
use uuid::Uuid;

use crate::cache::GeneratedCacheContext;
use crate::object::{Object, PartPreview, SourceNode};
use crate::quads::recover_quads;

pub(crate) use cut_template::chamfer_face;

/// Split a `children` CSV attribute, skipping empty entries.
pub(crate) fn split_children(children: &str) -> Vec<String> {
    children
        .split(',')
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Snapshot-to-object generator.
///
/// Owns its snapshot (mutated once, by mirror preprocessing) and exactly
/// one optional cache context. `generate` runs to completion; callers
/// wanting parallelism schedule whole generations across independent
/// generator instances.
pub struct MeshGenerator {
    pub(crate) snapshot: Snapshot,
    id: u64,
    object: Option<Object>,
    pub(crate) is_successful: bool,
    cache_context: Option<GeneratedCacheContext>,
    pub(crate) cache_enabled: bool,
    weld_enabled: bool,
    pub(crate) interpolation_enabled: bool,
    pub(crate) smooth_shading_threshold_angle_degrees: f64,
    pub(crate) default_part_color: Color,
    pub(crate) part_node_ids: BTreeMap<String, BTreeSet<String>>,
    pub(crate) part_edge_ids: BTreeMap<String, BTreeSet<String>>,
    pub(crate) dirty_component_ids: BTreeSet<String>,
    pub(crate) dirty_part_ids: BTreeSet<String>,
    pub(crate) generated_preview_part_ids: BTreeSet<Uuid>,
    pub(crate) generated_preview_image_part_ids: BTreeSet<Uuid>,
    pub(crate) generated_part_previews: BTreeMap<Uuid, PartPreview>,
    pub(crate) node_vertices: Vec<(DVec3, SourceNode)>,
    pub(crate) main_profile_middle_x: f64,
    pub(crate) main_profile_middle_y: f64,
    pub(crate) side_profile_middle_x: f64,
}

impl MeshGenerator {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            id: 0,
            object: None,
            is_successful: false,
            cache_context: None,
            cache_enabled: false,
            weld_enabled: true,
            interpolation_enabled: true,
            smooth_shading_threshold_angle_degrees:
                config::constants::DEFAULT_SMOOTH_SHADING_DEGREES,
            default_part_color: Color::WHITE,
            part_node_ids: BTreeMap::new(),
            part_edge_ids: BTreeMap::new(),
            dirty_component_ids: BTreeSet::new(),
            dirty_part_ids: BTreeSet::new(),
            generated_preview_part_ids: BTreeSet::new(),
            generated_preview_image_part_ids: BTreeSet::new(),
            generated_part_previews: BTreeMap::new(),
            node_vertices: Vec::new(),
            main_profile_middle_x: 0.0,
            main_profile_middle_y: 0.0,
            side_profile_middle_x: 0.0,
        }
    }

    pub fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_successful(&self) -> bool {
        self.is_successful
    }

    /// The snapshot, including any synthesized mirror twins.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Install a reusable cache context. The generator owns it exclusively
    /// until [`take_cache_context`](Self::take_cache_context).
    pub fn set_cache_context(&mut self, cache_context: GeneratedCacheContext) {
        self.cache_context = Some(cache_context);
    }

    pub fn take_cache_context(&mut self) -> Option<GeneratedCacheContext> {
        self.cache_context.take()
    }

    pub fn set_smooth_shading_threshold_angle_degrees(&mut self, degrees: f64) {
        self.smooth_shading_threshold_angle_degrees = degrees;
    }

    /// Gates intermediate-node insertion (and therefore the build retry).
    pub fn set_interpolation_enabled(&mut self, enabled: bool) {
        self.interpolation_enabled = enabled;
    }

    pub fn set_weld_enabled(&mut self, enabled: bool) {
        self.weld_enabled = enabled;
    }

    pub fn set_default_part_color(&mut self, color: Color) {
        self.default_part_color = color;
    }

    /// Parts whose mesh preview was (re)generated this pass.
    pub fn generated_preview_part_ids(&self) -> &BTreeSet<Uuid> {
        &self.generated_preview_part_ids
    }

    /// Parts whose cut-template preview image was (re)generated this pass.
    pub fn generated_preview_image_part_ids(&self) -> &BTreeSet<Uuid> {
        &self.generated_preview_image_part_ids
    }

    pub fn part_preview(&self, part_id: &Uuid) -> Option<&PartPreview> {
        self.generated_part_previews.get(part_id)
    }

    /// Hand the generated object over; subsequent calls return `None`.
    pub fn take_object(&mut self) -> Option<Object> {
        self.object.take()
    }

    /// Index part → node ids and part → edge ids from the snapshot.
    pub(crate) fn collect_parts(&mut self) {
        for (node_id, node) in &self.snapshot.nodes {
            let part_id = node.str_or_empty("partId");
            if part_id.is_empty() {
                continue;
            }
            self.part_node_ids
                .entry(part_id.to_string())
                .or_default()
                .insert(node_id.clone());
        }
        for (edge_id, edge) in &self.snapshot.edges {
            let part_id = edge.str_or_empty("partId");
            if part_id.is_empty() {
                continue;
            }
            self.part_edge_ids
                .entry(part_id.to_string())
                .or_default()
                .insert(edge_id.clone());
        }
    }

    /// Run the full pipeline.
    pub fn generate(&mut self) {
        self.is_successful = true;

        self.main_profile_middle_x = self.snapshot.canvas.read_float_or("originX", 0.0);
        self.main_profile_middle_y = self.snapshot.canvas.read_float_or("originY", 0.0);
        self.side_profile_middle_x = self.snapshot.canvas.read_float_or("originZ", 0.0);

        self.preprocess_mirror();

        let mut object = Object {
            mesh_id: self.id,
            ..Default::default()
        };

        self.cache_enabled = self.cache_context.is_some();
        let mut cache = self.cache_context.take().unwrap_or_default();

        for (part_id, part) in &self.snapshot.parts {
            let mirror_from = part.str_or_empty("__mirrorFromPartId");
            if !mirror_from.is_empty() {
                cache
                    .part_mirror_id_map
                    .insert(part_id.clone(), mirror_from.to_string());
            }
        }

        if self.cache_enabled {
            self.evict_vanished_entries(&mut cache);
        }

        self.part_node_ids.clear();
        self.part_edge_ids.clear();
        self.dirty_component_ids.clear();
        self.dirty_part_ids.clear();
        self.collect_parts();
        self.check_dirty_flags();

        for dirty_id in self.dirty_component_ids.clone() {
            cache
                .cached_combination
                .retain(|key, _| !key.contains(&dirty_id));
        }
        tracing::debug!(
            dirty_components = self.dirty_component_ids.len(),
            dirty_parts = self.dirty_part_ids.len(),
            "dirty closure computed"
        );

        // The virtual root always recombines.
        let root_id = nil_uuid_string();
        self.dirty_component_ids.insert(root_id.clone());

        let (combined_mesh, _combine_mode) = self.combine_component_mesh(&mut cache, &root_id);

        let (shared_quad_edges, none_seam_vertices) = match cache.components.get(&root_id) {
            Some(root_cache) => {
                object.nodes = root_cache.object_nodes.clone();
                object.edges = root_cache.object_edges.clone();
                self.node_vertices = root_cache.object_node_vertices.clone();
                (
                    root_cache.shared_quad_edges.clone(),
                    root_cache.none_seam_vertices.clone(),
                )
            }
            None => Default::default(),
        };

        if let Some(mesh) = &combined_mesh {
            let mut combined_vertices = Vec::new();
            let mut combined_triangles = Vec::new();
            mesh.fetch(&mut combined_vertices, &mut combined_triangles);
            if self.weld_enabled {
                loop {
                    let mut welded_vertices = Vec::new();
                    let mut welded_triangles = Vec::new();
                    let affected = weld_vertices(
                        &combined_vertices,
                        &combined_triangles,
                        config::constants::WELD_THRESHOLD,
                        &none_seam_vertices,
                        &mut welded_vertices,
                        &mut welded_triangles,
                    );
                    combined_vertices = welded_vertices;
                    combined_triangles = welded_triangles;
                    if affected == 0 {
                        break;
                    }
                }
            }
            recover_quads(
                &combined_vertices,
                &combined_triangles,
                &shared_quad_edges,
                &mut object.triangle_and_quads,
            );
            object.vertices = combined_vertices;
            object.triangles = combined_triangles;
        }

        self.collect_uncombined_component(&cache, &mut object, &root_id);
        self.collect_incombinable_component_meshes(&cache, &mut object, &root_id);
        self.collect_errored_parts(&cache, &mut object);
        self.postprocess_object(&mut object);

        tracing::debug!(
            vertices = object.vertices.len(),
            triangles = object.triangles.len(),
            successful = self.is_successful,
            "generation finished"
        );

        self.object = Some(object);
        if self.cache_enabled {
            self.cache_context = Some(cache);
        }
    }

    /// Drop cache entries whose ids vanished from the snapshot, cascading
    /// into combination keys that mention a vanished component.
    fn evict_vanished_entries(&self, cache: &mut GeneratedCacheContext) {
        let snapshot_parts = &self.snapshot.parts;
        let mirror_map = cache.part_mirror_id_map.clone();
        cache.parts.retain(|part_id, _| {
            if snapshot_parts.contains_key(part_id) {
                return true;
            }
            // A twin survives while its mirror source still exists.
            mirror_map
                .get(part_id)
                .map(|source| snapshot_parts.contains_key(source))
                .unwrap_or(false)
        });
        cache
            .part_mirror_id_map
            .retain(|twin, source| {
                snapshot_parts.contains_key(twin) || snapshot_parts.contains_key(source)
            });

        let vanished: Vec<String> = cache
            .components
            .keys()
            .filter(|id| {
                *id != &nil_uuid_string() && !self.snapshot.components.contains_key(*id)
            })
            .cloned()
            .collect();
        for id in vanished {
            tracing::debug!(component = %id, "evicting vanished component");
            cache.components.remove(&id);
            cache.cached_combination.retain(|key, _| !key.contains(&id));
        }
    }
}
