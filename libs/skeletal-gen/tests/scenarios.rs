//! End-to-end generation scenarios over programmatically built snapshots.

use std::collections::BTreeSet;

use glam::DVec3;
use skeletal_gen::{GeneratedCacheContext, MeshGenerator, Object};
use skeletal_mesh::{is_watertight, weld_vertices, PositionKey};
use skeletal_model::{reverse_uuid, AttributeMap, Attributes, Snapshot};
use uuid::Uuid;

fn attrs(pairs: &[(&str, &str)]) -> AttributeMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Deterministic UUID-shaped ids so combination strings are predictable.
fn uid(kind: char, n: u32) -> String {
    format!("{:07x}{}-0000-4000-8000-{:012x}", n, kind, n)
}

struct SnapshotBuilder {
    snapshot: Snapshot,
    next_index: u32,
    root_children: Vec<String>,
}

impl SnapshotBuilder {
    fn new() -> Self {
        let mut snapshot = Snapshot::new();
        snapshot.canvas = attrs(&[("originX", "0"), ("originY", "0"), ("originZ", "0")]);
        Self {
            snapshot,
            next_index: 1,
            root_children: Vec::new(),
        }
    }

    /// Add a part with nodes chained in order; returns (part id, component id).
    fn add_part(
        &mut self,
        part_attrs: &[(&str, &str)],
        component_attrs: &[(&str, &str)],
        nodes: &[(f64, f64, f64, f64)],
    ) -> (String, String) {
        let part_id = uid('a', self.next_index);
        let component_id = uid('c', self.next_index);
        self.next_index += 1;

        let mut part = attrs(&[("id", &part_id)]);
        for (k, v) in part_attrs {
            part.insert(k.to_string(), v.to_string());
        }
        self.snapshot.parts.insert(part_id.clone(), part);

        let mut node_ids = Vec::new();
        for &(x, y, z, radius) in nodes {
            let node_id = uid('b', self.next_index);
            self.next_index += 1;
            self.snapshot.nodes.insert(
                node_id.clone(),
                attrs(&[
                    ("partId", &part_id),
                    ("radius", &radius.to_string()),
                    ("x", &x.to_string()),
                    ("y", &y.to_string()),
                    ("z", &z.to_string()),
                ]),
            );
            node_ids.push(node_id);
        }
        for pair in node_ids.windows(2) {
            let edge_id = uid('e', self.next_index);
            self.next_index += 1;
            self.snapshot.edges.insert(
                edge_id,
                attrs(&[
                    ("partId", &part_id),
                    ("from", &pair[0]),
                    ("to", &pair[1]),
                ]),
            );
        }

        let mut component = attrs(&[
            ("id", &component_id),
            ("linkDataType", "partId"),
            ("linkData", &part_id),
        ]);
        for (k, v) in component_attrs {
            component.insert(k.to_string(), v.to_string());
        }
        self.snapshot
            .components
            .insert(component_id.clone(), component);
        self.root_children.push(component_id.clone());

        (part_id, component_id)
    }

    fn build(mut self) -> Snapshot {
        self.snapshot
            .root_component
            .insert("children".to_string(), self.root_children.join(","));
        self.snapshot
    }
}

fn generate(snapshot: Snapshot) -> (MeshGenerator, Object) {
    let mut generator = MeshGenerator::new(snapshot);
    generator.generate();
    let object = generator.take_object().expect("object generated");
    (generator, object)
}

#[test]
fn single_sphere_generates_watertight_sourced_mesh() {
    let mut builder = SnapshotBuilder::new();
    let (part_id, _) = builder.add_part(&[], &[], &[(0.0, 0.0, 0.0, 1.0)]);
    let (generator, object) = generate(builder.build());

    assert!(generator.is_successful());
    assert!(!object.triangles.is_empty());
    assert!(is_watertight(&object.triangles));

    let part_uuid = Uuid::parse_str(&part_id).unwrap();
    assert!(!object.triangle_source_nodes.is_empty());
    for (source_part, _node) in &object.triangle_source_nodes {
        assert_eq!(*source_part, part_uuid);
    }
    // Quad recovery reassembled the sphere's band quads.
    assert!(object.triangle_and_quads.iter().any(|f| f.len() == 4));
    assert!(object
        .triangle_and_quads
        .iter()
        .all(|f| f.len() == 3 || f.len() == 4));
}

#[test]
fn two_node_tube_is_watertight_and_fully_welded() {
    let mut builder = SnapshotBuilder::new();
    builder.add_part(&[], &[], &[(0.0, 0.0, 0.0, 1.0), (2.0, 0.0, 0.0, 1.0)]);
    let (generator, object) = generate(builder.build());

    assert!(generator.is_successful());
    assert!(is_watertight(&object.triangles));

    // Welding an already-welded result changes nothing.
    let mut welded_vertices = Vec::new();
    let mut welded_triangles = Vec::new();
    let affected = weld_vertices(
        &object.vertices,
        &object.triangles,
        0.025,
        &BTreeSet::new(),
        &mut welded_vertices,
        &mut welded_triangles,
    );
    assert_eq!(affected, 0);
    assert_eq!(welded_triangles.len(), object.triangles.len());
}

#[test]
fn subtraction_memoizes_diff_under_ordered_key() {
    let mut builder = SnapshotBuilder::new();
    let (_part_a, component_a) = builder.add_part(&[], &[], &[(0.0, 0.0, 0.0, 1.0)]);
    let (_part_b, component_b) = builder.add_part(
        &[],
        &[("combineMode", "Inversion")],
        &[(0.5, 0.0, 0.0, 0.6)],
    );

    let mut generator = MeshGenerator::new(builder.build());
    generator.set_cache_context(GeneratedCacheContext::new());
    generator.generate();
    let object = generator.take_object().unwrap();
    assert!(!object.vertices.is_empty());

    let cache = generator.take_cache_context().unwrap();
    let diff_key = format!("{component_a}-{component_b}!");
    let cached = cache
        .cached_combination
        .get(&diff_key)
        .expect("diff step memoized under operand-ordered key");
    assert!(cached.is_some(), "overlapping subtraction should succeed");
}

#[test]
fn mirrored_part_produces_twin_and_symmetric_mesh() {
    let mut builder = SnapshotBuilder::new();
    let (part_id, component_id) =
        builder.add_part(&[("xMirrored", "true")], &[], &[(1.0, 0.0, 0.0, 0.5)]);
    let (generator, object) = generate(builder.build());

    assert!(generator.is_successful());

    let twin_part_id = reverse_uuid(&part_id);
    let twin_part = generator
        .snapshot()
        .parts
        .get(&twin_part_id)
        .expect("twin part synthesized");
    assert_eq!(twin_part.str_or_empty("__mirrorFromPartId"), part_id);

    let root_children: Vec<&str> = generator
        .snapshot()
        .root_component
        .str_or_empty("children")
        .split(',')
        .collect();
    assert!(root_children.contains(&component_id.as_str()));
    assert!(root_children.contains(&reverse_uuid(&component_id).as_str()));

    // Geometry is symmetric in x.
    assert!(!object.vertices.is_empty());
    let keys: BTreeSet<PositionKey> = object
        .vertices
        .iter()
        .map(|&v| PositionKey::new(v))
        .collect();
    for &v in &object.vertices {
        let mirrored = DVec3::new(-v.x, v.y, v.z);
        assert!(
            keys.contains(&PositionKey::new(mirrored)),
            "no mirror partner for {v:?}"
        );
    }
}

#[test]
fn square_preset_with_chamfer_builds_octagonal_sections() {
    let mut builder = SnapshotBuilder::new();
    builder.add_part(
        &[("cutFace", "Square"), ("chamfered", "true")],
        &[],
        &[(0.0, 0.0, 0.0, 1.0), (3.0, 0.0, 0.0, 1.0)],
    );
    let (generator, object) = generate(builder.build());

    assert!(generator.is_successful());
    assert!(is_watertight(&object.triangles));
    // Chamfered square sections have 8 distinct corner heights on y/z.
    let distinct_y: BTreeSet<i64> = object
        .vertices
        .iter()
        .map(|v| (v.y * 1000.0).round() as i64)
        .collect();
    assert!(distinct_y.len() >= 4);
}

#[test]
fn dirty_part_evicts_matching_combination_keys_and_rebuilds() {
    let build_snapshot = |node_a_x: f64, a_dirty: bool| {
        let mut builder = SnapshotBuilder::new();
        let (part_a, component_a) =
            builder.add_part(&[], &[], &[(node_a_x, 0.0, 0.0, 1.0)]);
        let (_part_b, component_b) = builder.add_part(&[], &[], &[(10.0, 0.0, 0.0, 1.0)]);
        let mut snapshot = builder.build();
        if a_dirty {
            snapshot
                .parts
                .get_mut(&part_a)
                .unwrap()
                .insert("__dirty".to_string(), "true".to_string());
        }
        (snapshot, part_a, component_a, component_b)
    };

    // Sibling Normal leaves combine inside the child-group fold, which
    // does not request recombination, so the key carries no `!` suffix.
    let (snapshot, part_a, component_a, component_b) = build_snapshot(0.0, false);
    let union_key = format!("{component_a}+{component_b}");

    let mut first = MeshGenerator::new(snapshot);
    first.set_cache_context(GeneratedCacheContext::new());
    first.generate();
    let mut cache = first.take_cache_context().unwrap();
    assert!(cache.cached_combination.contains_key(&union_key));
    let first_max_x = cache.parts[&part_a]
        .vertices
        .iter()
        .map(|v| v.x)
        .fold(f64::NEG_INFINITY, f64::max);

    // Sentinel keys: one mentions the soon-dirty component, one does not.
    let stale_key = format!("{component_a}+f0000000-0000-4000-8000-00000000000f!");
    let unrelated_key = "f1+f2!".to_string();
    cache
        .cached_combination
        .insert(stale_key.clone(), None);
    cache
        .cached_combination
        .insert(unrelated_key.clone(), None);

    // Regenerate against an edited snapshot: part A moved and marked dirty.
    let (snapshot, part_a, _, _) = build_snapshot(0.5, true);
    let mut second = MeshGenerator::new(snapshot);
    second.set_cache_context(cache);
    second.generate();
    assert!(second.is_successful());
    let cache = second.take_cache_context().unwrap();

    // Every key mentioning the dirty component was evicted; the union key
    // was recreated by the new combination pass.
    assert!(!cache.cached_combination.contains_key(&stale_key));
    assert!(cache.cached_combination.contains_key(&unrelated_key));
    assert!(cache.cached_combination.contains_key(&union_key));

    // The part entry was re-evaluated against the moved node.
    let second_max_x = cache.parts[&part_a]
        .vertices
        .iter()
        .map(|v| v.x)
        .fold(f64::NEG_INFINITY, f64::max);
    assert!((second_max_x - (first_max_x + 0.5)).abs() < 1e-9);
}

#[test]
fn uncombined_component_is_emitted_separately() {
    let mut builder = SnapshotBuilder::new();
    builder.add_part(&[], &[], &[(0.0, 0.0, 0.0, 1.0)]);
    builder.add_part(
        &[],
        &[("combineMode", "Uncombined")],
        &[(10.0, 0.0, 0.0, 1.0)],
    );
    let (generator, object) = generate(builder.build());

    assert!(generator.is_successful());
    // Both the combined sphere and the uncombined one are present.
    assert!(object.vertices.iter().any(|v| v.x > 5.0));
    assert!(object.vertices.iter().any(|v| v.x < 5.0));
}

#[test]
fn disabled_part_contributes_no_geometry() {
    let mut builder = SnapshotBuilder::new();
    builder.add_part(&[("disabled", "true")], &[], &[(0.0, 0.0, 0.0, 1.0)]);
    let (generator, object) = generate(builder.build());
    assert!(generator.is_successful());
    assert!(object.vertices.is_empty());
}
