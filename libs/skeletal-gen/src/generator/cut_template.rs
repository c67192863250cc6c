//! Cut-template extraction.
//!
//! A part's `cutFace` attribute is either a preset name or the UUID of a
//! donor part whose 2D node graph supplies the section polygon. The donor
//! graph is walked from a deterministic start node (for chains, the
//! endpoint pointing most toward `normalize(-1,-1,0)` from the centroid),
//! always advancing to the first unvisited neighbor.

use std::collections::{BTreeMap, BTreeSet};

use config::constants::{CHAMFER_FAR, CHAMFER_NEAR};
use glam::{DVec2, DVec3};
use skeletal_mesh::{cut_face_points_from_nodes, CutFaceNode, CutFacePreset};
use skeletal_model::{parse_non_nil_uuid, Attributes};

use super::MeshGenerator;

/// Replace each polygon edge with its two chamfer points, doubling the
/// vertex count and preserving winding.
pub(crate) fn chamfer_face(face: &mut Vec<DVec2>) {
    let old_face = std::mem::take(face);
    for i in 0..old_face.len() {
        let j = (i + 1) % old_face.len();
        face.push(old_face[i] * CHAMFER_NEAR + old_face[j] * CHAMFER_FAR);
        face.push(old_face[i] * CHAMFER_FAR + old_face[j] * CHAMFER_NEAR);
    }
}

impl MeshGenerator {
    /// Resolve a `cutFace` attribute value into a section polygon.
    pub(crate) fn cut_template_from_string(&self, cut_face: &str) -> Vec<DVec2> {
        let mut template = Vec::new();
        if parse_non_nil_uuid(cut_face).is_some() && self.snapshot.parts.contains_key(cut_face) {
            template = self.cut_template_from_part(cut_face);
        }
        if template.len() < 3 {
            // Preset name, or the default section for anything unrecognized.
            template = CutFacePreset::from_name(cut_face)
                .unwrap_or(CutFacePreset::Quad)
                .points();
        }
        template
    }

    fn cut_template_from_part(&self, part_id: &str) -> Vec<DVec2> {
        // Donor node table: (radius, x, y) in canvas-relative 2D space.
        let mut face_nodes: BTreeMap<String, (f64, f64, f64)> = BTreeMap::new();
        if let Some(node_ids) = self.part_node_ids.get(part_id) {
            for node_id in node_ids {
                let Some(node) = self.snapshot.nodes.get(node_id) else {
                    continue;
                };
                let radius = node.read_float_or("radius", 0.0);
                let x = node.read_float_or("x", 0.0) - self.main_profile_middle_x;
                let y = self.main_profile_middle_y - node.read_float_or("y", 0.0);
                face_nodes.insert(node_id.clone(), (radius, x, y));
            }
        }

        // Undirected adjacency.
        let mut links: BTreeMap<String, Vec<String>> = BTreeMap::new();
        if let Some(edge_ids) = self.part_edge_ids.get(part_id) {
            for edge_id in edge_ids {
                let Some(edge) = self.snapshot.edges.get(edge_id) else {
                    continue;
                };
                let from = edge.str_or_empty("from").to_string();
                let to = edge.str_or_empty("to").to_string();
                links.entry(from.clone()).or_default().push(to.clone());
                links.entry(to).or_default().push(from);
            }
        }

        // Chain endpoints have degree 1; no endpoints means a ring.
        let mut endpoint_nodes: Vec<(String, (f64, f64, f64))> = Vec::new();
        for (node_id, neighbors) in &links {
            if neighbors.len() == 1 {
                if let Some(info) = face_nodes.get(node_id) {
                    endpoint_nodes.push((node_id.clone(), *info));
                }
            }
        }
        let is_ring = endpoint_nodes.is_empty();
        if is_ring {
            endpoint_nodes = face_nodes
                .iter()
                .map(|(id, info)| (id.clone(), *info))
                .collect();
        }
        if endpoint_nodes.is_empty() {
            return Vec::new();
        }

        // Pick the candidate whose direction from the centroid sits closest
        // to the reference direction; ties keep the earlier candidate.
        let mut center = DVec2::ZERO;
        for (_, (_, x, y)) in &endpoint_nodes {
            center += DVec2::new(*x, *y);
        }
        center /= endpoint_nodes.len() as f64;

        let reference_direction = DVec3::new(-1.0, -1.0, 0.0).normalize();
        let mut chosen: Option<(usize, f64)> = None;
        for (i, (_, (_, x, y))) in endpoint_nodes.iter().enumerate() {
            let direction_2d = DVec2::new(*x, *y) - center;
            let direction = DVec3::new(direction_2d.x, direction_2d.y, 0.0).normalize_or_zero();
            let radian = reference_direction.angle_between(direction);
            match chosen {
                Some((_, best)) if radian >= best => {}
                _ => chosen = Some((i, radian)),
            }
        }
        let start_node_id = endpoint_nodes[chosen.expect("candidates non-empty").0].0.clone();

        // Walk: first unvisited neighbor, emitting in walk order.
        let mut walked: Vec<CutFaceNode> = Vec::new();
        let mut visited: BTreeSet<String> = BTreeSet::new();
        let mut current = Some(start_node_id);
        while let Some(node_id) = current {
            let Some(&(radius, x, y)) = face_nodes.get(&node_id) else {
                break;
            };
            visited.insert(node_id.clone());
            walked.push(CutFaceNode {
                radius,
                x,
                y,
                id: node_id.clone(),
            });
            current = links.get(&node_id).and_then(|neighbors| {
                neighbors
                    .iter()
                    .find(|n| !visited.contains(*n) && face_nodes.contains_key(*n))
                    .cloned()
            });
        }

        cut_face_points_from_nodes(&walked, is_ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skeletal_model::Snapshot;

    #[test]
    fn test_chamfer_doubles_and_preserves_winding() {
        let mut face = CutFacePreset::Quad.points();
        let doubled_area_before: f64 = signed_area(&face);
        chamfer_face(&mut face);
        assert_eq!(face.len(), 8);
        let doubled_area_after: f64 = signed_area(&face);
        assert!(doubled_area_before > 0.0 && doubled_area_after > 0.0);
        // Chamfering shrinks the polygon, never grows it.
        assert!(doubled_area_after < doubled_area_before);
    }

    fn signed_area(face: &[DVec2]) -> f64 {
        (0..face.len())
            .map(|i| {
                let a = face[i];
                let b = face[(i + 1) % face.len()];
                a.x * b.y - b.x * a.y
            })
            .sum()
    }

    #[test]
    fn test_preset_template_lookup() {
        let generator = MeshGenerator::new(Snapshot::new());
        assert_eq!(generator.cut_template_from_string("Square").len(), 4);
        assert_eq!(generator.cut_template_from_string("Hexagon").len(), 6);
        // Unrecognized names fall back to the quad section.
        assert_eq!(generator.cut_template_from_string("").len(), 4);
        assert_eq!(generator.cut_template_from_string("NoSuch").len(), 4);
    }

    #[test]
    fn test_referenced_part_template() {
        let attrs = |pairs: &[(&str, &str)]| -> skeletal_model::AttributeMap {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };
        let donor = "d1000000-0000-4000-8000-000000000001";
        let mut snapshot = Snapshot::new();
        snapshot.parts.insert(donor.to_string(), attrs(&[("id", donor)]));
        // A three-node chain: endpoints at both ends.
        for (i, (x, y)) in [(0.0, 0.0), (1.0, 0.0), (2.0, 0.5)].iter().enumerate() {
            snapshot.nodes.insert(
                format!("n{i}"),
                attrs(&[
                    ("partId", donor),
                    ("radius", "0.2"),
                    ("x", &x.to_string()),
                    ("y", &y.to_string()),
                    ("z", "0"),
                ]),
            );
        }
        snapshot.edges.insert(
            "e0".to_string(),
            attrs(&[("partId", donor), ("from", "n0"), ("to", "n1")]),
        );
        snapshot.edges.insert(
            "e1".to_string(),
            attrs(&[("partId", donor), ("from", "n1"), ("to", "n2")]),
        );

        let mut generator = MeshGenerator::new(snapshot);
        generator.collect_parts();
        let template = generator.cut_template_from_string(donor);
        // Chain of 3 nodes outlines into 6 points.
        assert_eq!(template.len(), 6);
    }
}
