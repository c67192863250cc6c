//! Mirror preprocessing.
//!
//! Every part flagged `xMirrored` gets a synthesized twin part and a twin
//! component, with identifiers derived by UUID reversal so regeneration is
//! stable. Twins are born dirty; the part builder later reflects their
//! node positions and reverses face windings.

use std::collections::BTreeMap;

use skeletal_model::{reverse_uuid, Attributes};

use super::{split_children, MeshGenerator};

impl MeshGenerator {
    pub(crate) fn preprocess_mirror(&mut self) {
        let mut new_parts = Vec::new();
        let mut part_old_to_new: BTreeMap<String, String> = BTreeMap::new();
        for (part_id, part) in &self.snapshot.parts {
            if !part.read_bool("xMirrored") {
                continue;
            }
            let new_part_id = reverse_uuid(part_id);
            let mut mirrored_part = part.clone();
            mirrored_part.insert("__mirrorFromPartId".to_string(), part_id.clone());
            mirrored_part.insert("id".to_string(), new_part_id.clone());
            mirrored_part.insert("__dirty".to_string(), "true".to_string());
            part_old_to_new.insert(part_id.clone(), new_part_id.clone());
            new_parts.push((new_part_id, mirrored_part));
        }

        for (old_id, new_id) in &part_old_to_new {
            if let Some(source) = self.snapshot.parts.get_mut(old_id) {
                source.insert("__mirroredByPartId".to_string(), new_id.clone());
            }
        }

        // Child component → parent component (empty string = root).
        let mut parent_map: BTreeMap<String, String> = BTreeMap::new();
        for (component_id, component) in &self.snapshot.components {
            for child_id in split_children(component.str_or_empty("children")) {
                parent_map.insert(child_id, component_id.clone());
            }
        }
        for child_id in split_children(self.snapshot.root_component.str_or_empty("children")) {
            parent_map.insert(child_id, String::new());
        }

        let mut new_components = Vec::new();
        for (component_id, component) in &self.snapshot.components {
            if component.str_or_empty("linkDataType") != "partId" {
                continue;
            }
            let part_id = component.str_or_empty("linkData");
            let Some(new_part_id) = part_old_to_new.get(part_id) else {
                continue;
            };
            let new_component_id = reverse_uuid(component_id);
            let mut mirrored_component = component.clone();
            mirrored_component.insert("linkData".to_string(), new_part_id.clone());
            mirrored_component.insert("id".to_string(), new_component_id.clone());
            mirrored_component.insert("__dirty".to_string(), "true".to_string());
            parent_map.insert(
                new_component_id.clone(),
                parent_map.get(component_id).cloned().unwrap_or_default(),
            );
            new_components.push((new_component_id, mirrored_component));
        }

        for (part_id, part) in new_parts {
            self.snapshot.parts.insert(part_id, part);
        }
        for (component_id, component) in new_components {
            let parent_id = parent_map.get(&component_id).cloned().unwrap_or_default();
            self.snapshot
                .components
                .insert(component_id.clone(), component);
            let parent_children = if parent_id.is_empty() {
                self.snapshot
                    .root_component
                    .entry("children".to_string())
                    .or_default()
            } else {
                match self.snapshot.components.get_mut(&parent_id) {
                    Some(parent) => parent.entry("children".to_string()).or_default(),
                    None => continue,
                }
            };
            if parent_children.is_empty() {
                *parent_children = component_id;
            } else {
                parent_children.push(',');
                parent_children.push_str(&component_id);
            }
        }
    }
}
