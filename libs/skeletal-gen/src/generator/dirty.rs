//! Dirty-closure analysis over the component tree.
//!
//! A component is dirty when its own `__dirty` flag is set, when its
//! linked part (or any part that part's cut faces reference) is dirty, or
//! when any child is dirty — so dirtiness propagates to every ancestor.

use skeletal_model::{nil_uuid_string, parse_non_nil_uuid, Attributes};

use super::{split_children, MeshGenerator};

impl MeshGenerator {
    pub(crate) fn check_is_part_dirty(&self, part_id: &str) -> bool {
        self.snapshot
            .parts
            .get(part_id)
            .map(|part| part.read_bool("__dirty"))
            .unwrap_or(false)
    }

    /// Whether any part referenced as a cut face (at part or node level)
    /// is dirty.
    pub(crate) fn check_is_part_dependency_dirty(&self, part_id: &str) -> bool {
        let Some(part) = self.snapshot.parts.get(part_id) else {
            return false;
        };
        let cut_face = part.str_or_empty("cutFace");
        if parse_non_nil_uuid(cut_face).is_some() && self.check_is_part_dirty(cut_face) {
            return true;
        }
        if let Some(node_ids) = self.part_node_ids.get(part_id) {
            for node_id in node_ids {
                let Some(node) = self.snapshot.nodes.get(node_id) else {
                    continue;
                };
                let node_cut_face = node.str_or_empty("cutFace");
                if parse_non_nil_uuid(node_cut_face).is_some()
                    && self.check_is_part_dirty(node_cut_face)
                {
                    return true;
                }
            }
        }
        false
    }

    pub(crate) fn check_is_component_dirty(&mut self, component_id: &str) -> bool {
        let component = if component_id == nil_uuid_string() {
            self.snapshot.root_component.clone()
        } else {
            match self.snapshot.components.get(component_id) {
                Some(component) => component.clone(),
                None => return false,
            }
        };

        let mut is_dirty = component.read_bool("__dirty");

        if component.str_or_empty("linkDataType") == "partId" {
            let part_id = component.str_or_empty("linkData").to_string();
            if self.check_is_part_dirty(&part_id) {
                self.dirty_part_ids.insert(part_id.clone());
                is_dirty = true;
            }
            if !is_dirty && self.check_is_part_dependency_dirty(&part_id) {
                is_dirty = true;
            }
        }

        for child_id in split_children(component.str_or_empty("children")) {
            if self.check_is_component_dirty(&child_id) {
                is_dirty = true;
            }
        }

        if is_dirty {
            self.dirty_component_ids.insert(component_id.to_string());
        }
        is_dirty
    }

    pub(crate) fn check_dirty_flags(&mut self) {
        self.check_is_component_dirty(&nil_uuid_string());
    }
}
