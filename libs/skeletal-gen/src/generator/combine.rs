//! Component-tree boolean combination.
//!
//! Children combine in declared order: contiguous runs of one combine mode
//! form groups (every inversion opens its own group), groups split into
//! color subgroups, and the three levels fold through
//! [`combine_multiple_meshes`](MeshGenerator::combine_multiple_meshes)
//! with every intermediate step memoized under its combination string.

use skeletal_mesh::{
    boolean, is_watertight, BooleanMethod, MeshRecombiner, PositionKey, SolidMesh,
};
use skeletal_model::{nil_uuid_string, AttributeMap, Attributes, CombineMode};

use crate::cache::{GeneratedCacheContext, GeneratedComponent};
use crate::quads::collect_shared_quad_edges;

use super::{split_children, MeshGenerator};

impl MeshGenerator {
    pub(crate) fn find_component_attrs(&self, component_id: &str) -> Option<AttributeMap> {
        if component_id == nil_uuid_string() {
            Some(self.snapshot.root_component.clone())
        } else {
            self.snapshot.components.get(component_id).cloned()
        }
    }

    /// The component's effective combine mode; a `Normal` component with
    /// `inverse` set behaves as an inversion.
    pub(crate) fn component_combine_mode(component: Option<&AttributeMap>) -> CombineMode {
        let Some(component) = component else {
            return CombineMode::Normal;
        };
        let mut mode = CombineMode::from_attribute(component.str_or_empty("combineMode"));
        if mode == CombineMode::Normal && component.read_bool("inverse") {
            mode = CombineMode::Inversion;
        }
        mode
    }

    /// The color label used for subgrouping: `"+"` for parts carrying a
    /// color-solubility setting, `"-"` for colorless parts, the color
    /// string otherwise, empty for non-leaves.
    pub(crate) fn component_color_name(&self, component: Option<&AttributeMap>) -> String {
        let Some(component) = component else {
            return String::new();
        };
        if component.str_or_empty("linkDataType") != "partId" {
            return String::new();
        }
        let part_id = component.str_or_empty("linkData");
        let Some(part) = self.snapshot.parts.get(part_id) else {
            return String::new();
        };
        if !part.str_or_empty("colorSolubility").is_empty() {
            return "+".to_string();
        }
        let color_name = part.str_or_empty("color");
        if color_name.is_empty() {
            return "-".to_string();
        }
        color_name.to_string()
    }

    /// Combine one component (recursively for non-leaves).
    ///
    /// Returns the combined mesh and the component's own combine mode.
    pub(crate) fn combine_component_mesh(
        &mut self,
        cache: &mut GeneratedCacheContext,
        component_id: &str,
    ) -> (Option<SolidMesh>, CombineMode) {
        let Some(component) = self.find_component_attrs(component_id) else {
            return (None, CombineMode::Normal);
        };
        let combine_mode = Self::component_combine_mode(Some(&component));

        if self.cache_enabled && !self.dirty_component_ids.contains(component_id) {
            if let Some(entry) = cache.components.get(component_id) {
                if let Some(mesh) = &entry.mesh {
                    tracing::debug!(component = component_id, "component cache hit");
                    return (Some(mesh.clone()), combine_mode);
                }
            }
        }

        let mut component_cache = GeneratedComponent::default();
        let mesh: Option<SolidMesh>;

        if component.str_or_empty("linkDataType") == "partId" {
            let part_id = component.str_or_empty("linkData").to_string();
            let (built, has_error, retryable) =
                self.build_part_mesh(cache, &part_id, self.interpolation_enabled);
            let mut built = built;
            if has_error {
                built = None;
                let mut still_errored = true;
                if retryable && self.interpolation_enabled {
                    tracing::debug!(part = %part_id, "retrying without intermediate nodes");
                    let (rebuilt, retry_error, _) = self.build_part_mesh(cache, &part_id, false);
                    if !retry_error {
                        built = rebuilt;
                        still_errored = false;
                    }
                }
                if still_errored {
                    self.is_successful = false;
                }
            }
            mesh = built;

            if let Some(part_cache) = cache.parts.get(&part_id) {
                for vertex in &part_cache.vertices {
                    component_cache
                        .none_seam_vertices
                        .insert(PositionKey::new(*vertex));
                }
                collect_shared_quad_edges(
                    &part_cache.vertices,
                    &part_cache.faces,
                    &mut component_cache.shared_quad_edges,
                );
                component_cache
                    .object_nodes
                    .extend(part_cache.object_nodes.iter().cloned());
                component_cache
                    .object_edges
                    .extend(part_cache.object_edges.iter().cloned());
                component_cache
                    .object_node_vertices
                    .extend(part_cache.object_node_vertices.iter().cloned());
            }
        } else {
            // First, contiguous groups by combine mode; every inversion
            // starts its own group so subtractions are never conflated.
            let mut combine_groups: Vec<(CombineMode, Vec<(String, String)>)> = Vec::new();
            let mut last_mode: Option<CombineMode> = None;
            for child_id in split_children(component.str_or_empty("children")) {
                let child = self.find_component_attrs(&child_id);
                let color_name = self.component_color_name(child.as_ref());
                let child_mode = Self::component_combine_mode(child.as_ref());
                if last_mode != Some(child_mode) || last_mode == Some(CombineMode::Inversion) {
                    combine_groups.push((child_mode, Vec::new()));
                    last_mode = Some(child_mode);
                }
                combine_groups
                    .last_mut()
                    .expect("group opened above")
                    .1
                    .push((child_id, color_name));
            }

            // Second, subgroups by color label.
            let mut group_meshes: Vec<(SolidMesh, CombineMode, String)> = Vec::new();
            for (group_mode, entries) in combine_groups {
                let mut used: Vec<bool> = vec![false; entries.len()];
                let mut subgroup_ids: Vec<Vec<String>> = Vec::new();
                let mut last_color = String::new();
                for i in 0..entries.len() {
                    if used[i] {
                        continue;
                    }
                    // Forced constant label: color-aware grouping is
                    // deliberately inert, every entry lands in one subgroup.
                    let color_name = "white".to_string();
                    if last_color != color_name || last_color.is_empty() {
                        subgroup_ids.push(Vec::new());
                        last_color = color_name.clone();
                    }
                    used[i] = true;
                    subgroup_ids
                        .last_mut()
                        .expect("subgroup opened above")
                        .push(entries[i].0.clone());
                    for j in (i + 1)..entries.len() {
                        if used[j] {
                            continue;
                        }
                        let other_color = &entries[j].1;
                        if other_color.is_empty() || *other_color != color_name {
                            continue;
                        }
                        used[j] = true;
                        subgroup_ids
                            .last_mut()
                            .expect("subgroup opened above")
                            .push(entries[j].0.clone());
                    }
                }

                let mut multiple_meshes: Vec<(SolidMesh, CombineMode, String)> = Vec::new();
                let mut subgroup_mesh_ids: Vec<String> = Vec::new();
                for ids in &subgroup_ids {
                    let Some(child_mesh) =
                        self.combine_component_child_group_mesh(cache, ids, &mut component_cache)
                    else {
                        continue;
                    };
                    let joined_ids = ids.join("|");
                    subgroup_mesh_ids.push(joined_ids.clone());
                    multiple_meshes.push((child_mesh, CombineMode::Normal, joined_ids));
                }
                let Some(sub_group_mesh) =
                    self.combine_multiple_meshes(cache, multiple_meshes, true)
                else {
                    continue;
                };
                group_meshes.push((sub_group_mesh, group_mode, subgroup_mesh_ids.join("&")));
            }
            mesh = self.combine_multiple_meshes(cache, group_meshes, true);
        }

        if let Some(combined) = &mesh {
            component_cache.mesh = Some(combined.clone());
        }
        cache
            .components
            .insert(component_id.to_string(), component_cache);

        (mesh, combine_mode)
    }

    /// Combine the children of one color subgroup, accumulating their
    /// seam-protection and quad-recovery data into the owning component.
    pub(crate) fn combine_component_child_group_mesh(
        &mut self,
        cache: &mut GeneratedCacheContext,
        component_ids: &[String],
        component_cache: &mut GeneratedComponent,
    ) -> Option<SolidMesh> {
        let mut multiple_meshes: Vec<(SolidMesh, CombineMode, String)> = Vec::new();
        for child_id in component_ids {
            let (sub_mesh, child_mode) = self.combine_component_mesh(cache, child_id);

            if child_mode == CombineMode::Uncombined {
                continue;
            }

            if let Some(child_cache) = cache.components.get(child_id) {
                component_cache
                    .none_seam_vertices
                    .extend(child_cache.none_seam_vertices.iter().copied());
                component_cache
                    .shared_quad_edges
                    .extend(child_cache.shared_quad_edges.iter().copied());
                component_cache
                    .object_nodes
                    .extend(child_cache.object_nodes.iter().cloned());
                component_cache
                    .object_edges
                    .extend(child_cache.object_edges.iter().cloned());
                component_cache
                    .object_node_vertices
                    .extend(child_cache.object_node_vertices.iter().cloned());
            }

            let Some(sub_mesh) = sub_mesh else {
                continue;
            };
            if !sub_mesh.is_combinable() {
                component_cache.incombinable_meshes.push(sub_mesh);
                continue;
            }
            multiple_meshes.push((sub_mesh, child_mode, child_id.clone()));
        }
        self.combine_multiple_meshes(cache, multiple_meshes, false)
    }

    /// Fold submeshes in order: diff for inversions, union otherwise.
    ///
    /// Every intermediate step is memoized under a combination string of
    /// operand ids interleaved with `+`/`-`, each recombined step suffixed
    /// with `!`. A failed step keeps the accumulator, discards the
    /// sibling, and memoizes the failure.
    pub(crate) fn combine_multiple_meshes(
        &mut self,
        cache: &mut GeneratedCacheContext,
        multiple_meshes: Vec<(SolidMesh, CombineMode, String)>,
        recombine: bool,
    ) -> Option<SolidMesh> {
        let mut mesh: Option<SolidMesh> = None;
        let mut mesh_id_strings = String::new();
        for (sub_mesh, child_mode, sub_mesh_id) in multiple_meshes {
            if !sub_mesh.is_combinable() {
                continue;
            }
            match mesh.take() {
                None => {
                    mesh = Some(sub_mesh);
                    mesh_id_strings = sub_mesh_id;
                }
                Some(current) => {
                    let method = if child_mode == CombineMode::Inversion {
                        BooleanMethod::Diff
                    } else {
                        BooleanMethod::Union
                    };
                    mesh_id_strings.push(if method == BooleanMethod::Union {
                        '+'
                    } else {
                        '-'
                    });
                    mesh_id_strings.push_str(&sub_mesh_id);
                    if recombine {
                        mesh_id_strings.push('!');
                    }

                    let new_mesh = match cache.cached_combination.get(&mesh_id_strings) {
                        Some(cached) => {
                            tracing::debug!(key = %mesh_id_strings, "combination cache hit");
                            cached.clone()
                        }
                        None => {
                            let combined =
                                self.combine_two_meshes(&current, &sub_mesh, method, recombine);
                            cache
                                .cached_combination
                                .insert(mesh_id_strings.clone(), combined.clone());
                            combined
                        }
                    };
                    match new_mesh {
                        Some(combined) => mesh = Some(combined),
                        None => {
                            self.is_successful = false;
                            mesh = Some(current);
                        }
                    }
                }
            }
        }
        mesh
    }

    /// One boolean step, optionally recombined. The recombined topology is
    /// only adopted when it is watertight and still combinable; otherwise
    /// the raw boolean output stands.
    pub(crate) fn combine_two_meshes(
        &self,
        first: &SolidMesh,
        second: &SolidMesh,
        method: BooleanMethod,
        recombine: bool,
    ) -> Option<SolidMesh> {
        let mut combined_vertices_sources = Vec::new();
        let new_mesh = match boolean::combine(first, second, method, &mut combined_vertices_sources)
        {
            Ok(mesh) => mesh,
            Err(error) => {
                tracing::debug!(%error, "boolean combine failed");
                return None;
            }
        };
        if recombine {
            let mut recombiner = MeshRecombiner::default();
            recombiner.set_vertices(new_mesh.vertices(), &combined_vertices_sources);
            recombiner.set_faces(new_mesh.triangles());
            if recombiner.recombine() && is_watertight(recombiner.regenerated_faces()) {
                if let Some(regenerated) = SolidMesh::from_faces(
                    recombiner.regenerated_vertices(),
                    recombiner.regenerated_faces(),
                ) {
                    if regenerated.is_combinable() {
                        return Some(regenerated);
                    }
                }
            }
        }
        Some(new_mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> AttributeMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_combine_mode_inverse_flag() {
        let normal = attrs(&[("combineMode", "Normal")]);
        let inverse = attrs(&[("combineMode", "Normal"), ("inverse", "true")]);
        let uncombined = attrs(&[("combineMode", "Uncombined"), ("inverse", "true")]);
        assert_eq!(
            MeshGenerator::component_combine_mode(Some(&normal)),
            CombineMode::Normal
        );
        assert_eq!(
            MeshGenerator::component_combine_mode(Some(&inverse)),
            CombineMode::Inversion
        );
        // `inverse` only applies to Normal components.
        assert_eq!(
            MeshGenerator::component_combine_mode(Some(&uncombined)),
            CombineMode::Uncombined
        );
        assert_eq!(
            MeshGenerator::component_combine_mode(None),
            CombineMode::Normal
        );
    }
}
