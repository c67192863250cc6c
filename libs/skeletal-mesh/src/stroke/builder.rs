//! # Stroke Mesh Builder
//!
//! Sweeps 2D cut templates along a refined skeleton into a quad-dominant
//! solid. Chains become capped tubes (optionally hollow), cycles become
//! closed rings, and isolated nodes become lat/long spheres.
//!
//! Every generated vertex remembers the skeleton node it grew from, which
//! is what lets the pipeline colorize triangles per authored node later.

use glam::{DVec2, DVec3};

use crate::cut_face::CutFacePreset;

/// A node of the skeleton being swept.
#[derive(Debug, Clone)]
pub struct BuilderNode {
    pub position: DVec3,
    pub radius: f64,
    pub cut_template: Vec<DVec2>,
    pub cut_rotation: f64,
    /// Index into the stroke modifier's node list.
    pub source_node_index: usize,
    /// Direction of travel through this node, filled in by `build`.
    pub traverse_direction: DVec3,
}

/// Sweep-mesh generation stage.
#[derive(Debug, Default)]
pub struct StrokeMeshBuilder {
    nodes: Vec<BuilderNode>,
    edges: Vec<(usize, usize)>,
    deform_thickness: f64,
    deform_width: f64,
    deform_unified: bool,
    hollow_thickness: f64,
    base_normal_on_x: bool,
    base_normal_on_y: bool,
    base_normal_on_z: bool,
    base_normal_average: bool,
    generated_vertices: Vec<DVec3>,
    generated_faces: Vec<Vec<usize>>,
    generated_sources: Vec<usize>,
}

impl StrokeMeshBuilder {
    pub fn new() -> Self {
        Self {
            deform_thickness: 1.0,
            deform_width: 1.0,
            base_normal_on_x: true,
            base_normal_on_y: true,
            base_normal_on_z: true,
            ..Default::default()
        }
    }

    pub fn add_node(
        &mut self,
        position: DVec3,
        radius: f64,
        cut_template: Vec<DVec2>,
        cut_rotation: f64,
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(BuilderNode {
            position,
            radius,
            cut_template,
            cut_rotation,
            source_node_index: index,
            traverse_direction: DVec3::ZERO,
        });
        index
    }

    /// Record which modifier node a builder node descends from.
    pub fn set_node_origin_info(&mut self, node_index: usize, source_node_index: usize) {
        self.nodes[node_index].source_node_index = source_node_index;
    }

    pub fn add_edge(&mut self, first_node_index: usize, second_node_index: usize) {
        self.edges.push((first_node_index, second_node_index));
    }

    pub fn set_deform_thickness(&mut self, thickness: f64) {
        self.deform_thickness = thickness;
    }

    pub fn set_deform_width(&mut self, width: f64) {
        self.deform_width = width;
    }

    pub fn set_deform_unified(&mut self, unified: bool) {
        self.deform_unified = unified;
    }

    pub fn set_hollow_thickness(&mut self, hollow_thickness: f64) {
        self.hollow_thickness = hollow_thickness;
    }

    pub fn enable_base_normal_on_x(&mut self, enabled: bool) {
        self.base_normal_on_x = enabled;
    }

    pub fn enable_base_normal_on_y(&mut self, enabled: bool) {
        self.base_normal_on_y = enabled;
    }

    pub fn enable_base_normal_on_z(&mut self, enabled: bool) {
        self.base_normal_on_z = enabled;
    }

    pub fn enable_base_normal_average(&mut self, enabled: bool) {
        self.base_normal_average = enabled;
    }

    pub fn nodes(&self) -> &[BuilderNode] {
        &self.nodes
    }

    pub fn generated_vertices(&self) -> &[DVec3] {
        &self.generated_vertices
    }

    pub fn generated_faces(&self) -> &[Vec<usize>] {
        &self.generated_faces
    }

    /// Per generated vertex, the modifier node it grew from.
    pub fn generated_vertices_source_node_indices(&self) -> &[usize] {
        &self.generated_sources
    }

    /// Sweep the skeleton. Returns false when there is nothing to build.
    pub fn build(&mut self) -> bool {
        self.generated_vertices.clear();
        self.generated_faces.clear();
        self.generated_sources.clear();
        if self.nodes.is_empty() {
            return false;
        }

        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for &(a, b) in &self.edges {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }

        let mut visited = vec![false; self.nodes.len()];
        for start_candidate in 0..self.nodes.len() {
            if visited[start_candidate] {
                continue;
            }
            let component = collect_component(&adjacency, start_candidate, &mut visited);
            if component.len() == 1 {
                self.build_sphere(component[0]);
                continue;
            }
            // Walk the component into polylines until every node is swept;
            // branch arms past the first junction become their own strokes.
            let mut walked = vec![false; adjacency.len()];
            loop {
                let order = match walk_next_polyline(&adjacency, &component, &mut walked) {
                    Some(order) => order,
                    None => break,
                };
                if order.len() == 1 {
                    self.build_sphere(order[0]);
                    continue;
                }
                let is_ring = order.len() == component.len()
                    && component.iter().all(|&n| adjacency[n].len() == 2);
                self.sweep_chain(&order, is_ring);
            }
        }

        !self.generated_faces.is_empty()
    }

    /// Average radius across a node set, for unified deformation.
    fn unified_radius(&self, order: &[usize]) -> f64 {
        order.iter().map(|&i| self.nodes[i].radius).sum::<f64>() / order.len() as f64
    }

    fn pick_base_axis(&self, average_direction: DVec3) -> DVec3 {
        let mut candidates = Vec::new();
        if self.base_normal_on_x {
            candidates.push(DVec3::X);
        }
        if self.base_normal_on_y {
            candidates.push(DVec3::Y);
        }
        if self.base_normal_on_z {
            candidates.push(DVec3::Z);
        }
        if candidates.is_empty() {
            candidates = vec![DVec3::X, DVec3::Y, DVec3::Z];
        }
        candidates
            .into_iter()
            .min_by(|a, b| {
                let da = a.dot(average_direction).abs();
                let db = b.dot(average_direction).abs();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("candidates never empty")
    }

    fn ring_vertices(
        &mut self,
        node_index: usize,
        forward: DVec3,
        base: DVec3,
        radius: f64,
    ) -> Vec<usize> {
        let node = self.nodes[node_index].clone();
        let template = if node.cut_template.len() >= 3 {
            node.cut_template.clone()
        } else {
            CutFacePreset::Quad.points()
        };
        let side = forward.cross(base).normalize_or_zero();
        let (sin_r, cos_r) = node.cut_rotation.sin_cos();

        let mut ring = Vec::with_capacity(template.len());
        for point in template {
            let rotated = DVec2::new(
                point.x * cos_r - point.y * sin_r,
                point.x * sin_r + point.y * cos_r,
            );
            let offset = base * (rotated.x * radius * self.deform_width)
                + side * (rotated.y * radius * self.deform_thickness);
            ring.push(self.push_vertex(node.position + offset, node.source_node_index));
        }
        ring
    }

    fn push_vertex(&mut self, position: DVec3, source: usize) -> usize {
        self.generated_vertices.push(position);
        self.generated_sources.push(source);
        self.generated_vertices.len() - 1
    }

    /// Connect two rings with quads, or stitched triangles when the cut
    /// templates disagree in vertex count.
    fn connect_rings(&mut self, lower: &[usize], upper: &[usize]) {
        if lower.len() == upper.len() {
            for k in 0..lower.len() {
                let next = (k + 1) % lower.len();
                self.generated_faces
                    .push(vec![lower[k], lower[next], upper[next], upper[k]]);
            }
            return;
        }
        let (n1, n2) = (lower.len(), upper.len());
        let (mut i, mut j) = (0usize, 0usize);
        while i < n1 || j < n2 {
            if j >= n2 || (i < n1 && (i + 1) * n2 < (j + 1) * n1) {
                self.generated_faces
                    .push(vec![lower[i % n1], lower[(i + 1) % n1], upper[j % n2]]);
                i += 1;
            } else {
                self.generated_faces
                    .push(vec![lower[i % n1], upper[(j + 1) % n2], upper[j % n2]]);
                j += 1;
            }
        }
    }

    fn sweep_chain(&mut self, order: &[usize], is_ring: bool) {
        let positions: Vec<DVec3> = order.iter().map(|&i| self.nodes[i].position).collect();
        let count = order.len();
        let direction_at = |k: usize| -> DVec3 {
            let (prev, next) = if is_ring {
                ((k + count - 1) % count, (k + 1) % count)
            } else {
                (k.saturating_sub(1), (k + 1).min(count - 1))
            };
            (positions[next] - positions[prev]).normalize_or_zero()
        };

        // Chains orient against their end-to-end direction. A cycle has no
        // net direction, so fold the tangents into one octant; for a planar
        // ring the folded sum stays in-plane and the plane normal wins the
        // axis pick below.
        let mut average_direction = if is_ring {
            DVec3::ZERO
        } else {
            (positions[count - 1] - positions[0]).normalize_or_zero()
        };
        if average_direction == DVec3::ZERO {
            let mut sum = DVec3::ZERO;
            for k in 0..count {
                sum += direction_at(k).abs();
            }
            average_direction = sum.normalize_or_zero();
        }
        if average_direction == DVec3::ZERO {
            average_direction = DVec3::Z;
        }
        let axis = self.pick_base_axis(average_direction);
        let global_base = (axis - average_direction * axis.dot(average_direction))
            .normalize_or_zero();

        let unified = self.unified_radius(order);

        let mut rings: Vec<Vec<usize>> = Vec::with_capacity(count);
        let mut inner_rings: Vec<Vec<usize>> = Vec::new();
        let hollow = !is_ring && self.hollow_thickness > 0.0;
        for (k, &node_index) in order.iter().enumerate() {
            let forward = direction_at(k);
            self.nodes[node_index].traverse_direction = forward;
            let base = if self.base_normal_average {
                global_base
            } else {
                let projected = axis - forward * axis.dot(forward);
                let projected = projected.normalize_or_zero();
                if projected == DVec3::ZERO {
                    global_base
                } else {
                    projected
                }
            };
            let radius = if self.deform_unified {
                unified
            } else {
                self.nodes[node_index].radius
            };
            rings.push(self.ring_vertices(node_index, forward, base, radius));
            if hollow {
                inner_rings.push(self.ring_vertices(
                    node_index,
                    forward,
                    base,
                    radius * (1.0 - self.hollow_thickness),
                ));
            }
        }

        let spans = if is_ring { count } else { count - 1 };
        for k in 0..spans {
            let next = (k + 1) % count;
            let lower = rings[k].clone();
            let upper = rings[next].clone();
            self.connect_rings(&lower, &upper);
            if hollow {
                let faces_before = self.generated_faces.len();
                let inner_lower = inner_rings[k].clone();
                let inner_upper = inner_rings[next].clone();
                self.connect_rings(&inner_lower, &inner_upper);
                for face in &mut self.generated_faces[faces_before..] {
                    face.reverse();
                }
            }
        }

        if is_ring {
            return;
        }

        if hollow {
            // Rim annuli instead of caps.
            let (outer_start, inner_start) = (&rings[0], &inner_rings[0]);
            if outer_start.len() == inner_start.len() {
                let n = outer_start.len();
                for k in 0..n {
                    let next = (k + 1) % n;
                    self.generated_faces.push(vec![
                        outer_start[next],
                        outer_start[k],
                        inner_start[k],
                        inner_start[next],
                    ]);
                }
            }
            let (outer_end, inner_end) = (&rings[count - 1], &inner_rings[count - 1]);
            if outer_end.len() == inner_end.len() {
                let n = outer_end.len();
                for k in 0..n {
                    let next = (k + 1) % n;
                    self.generated_faces.push(vec![
                        outer_end[k],
                        outer_end[next],
                        inner_end[next],
                        inner_end[k],
                    ]);
                }
            }
        } else {
            let mut start_cap = rings[0].clone();
            start_cap.reverse();
            self.generated_faces.push(start_cap);
            self.generated_faces.push(rings[count - 1].clone());
        }
    }

    /// Lat/long sphere for an isolated node.
    fn build_sphere(&mut self, node_index: usize) {
        let node = self.nodes[node_index].clone();
        let longitude = node.cut_template.len().max(4);
        let latitude = (longitude / 2).max(3);
        let source = node.source_node_index;
        let radius = node.radius;

        let top = self.push_vertex(node.position + DVec3::new(0.0, 0.0, radius), source);
        let mut rows: Vec<Vec<usize>> = Vec::with_capacity(latitude - 1);
        for row in 1..latitude {
            let phi = std::f64::consts::PI * row as f64 / latitude as f64;
            let z = radius * phi.cos();
            let ring_radius = radius * phi.sin();
            let mut ring = Vec::with_capacity(longitude);
            for col in 0..longitude {
                let theta = std::f64::consts::TAU * col as f64 / longitude as f64;
                ring.push(self.push_vertex(
                    node.position
                        + DVec3::new(ring_radius * theta.cos(), ring_radius * theta.sin(), z),
                    source,
                ));
            }
            rows.push(ring);
        }
        let bottom = self.push_vertex(node.position - DVec3::new(0.0, 0.0, radius), source);

        let first_row = &rows[0];
        for k in 0..longitude {
            let next = (k + 1) % longitude;
            self.generated_faces
                .push(vec![top, first_row[k], first_row[next]]);
        }
        for pair in rows.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            for k in 0..longitude {
                let next = (k + 1) % longitude;
                self.generated_faces
                    .push(vec![lower[k], lower[next], upper[next], upper[k]]);
            }
        }
        let last_row = &rows[rows.len() - 1];
        for k in 0..longitude {
            let next = (k + 1) % longitude;
            self.generated_faces
                .push(vec![bottom, last_row[next], last_row[k]]);
        }
    }
}

fn collect_component(
    adjacency: &[Vec<usize>],
    start: usize,
    visited: &mut [bool],
) -> Vec<usize> {
    let mut component = Vec::new();
    let mut stack = vec![start];
    visited[start] = true;
    while let Some(node) = stack.pop() {
        component.push(node);
        for &neighbor in &adjacency[node] {
            if !visited[neighbor] {
                visited[neighbor] = true;
                stack.push(neighbor);
            }
        }
    }
    component.sort_unstable();
    component
}

/// Walk the next unswept polyline of a component: start from the
/// lowest-index node with at most one unwalked neighbor (an endpoint, or a
/// branch arm tip), else the lowest unwalked index (a cycle), and keep
/// advancing to the first unwalked neighbor.
///
/// Returns `None` once every node has been walked.
fn walk_next_polyline(
    adjacency: &[Vec<usize>],
    component: &[usize],
    walked: &mut [bool],
) -> Option<Vec<usize>> {
    let remaining: Vec<usize> = component.iter().copied().filter(|&n| !walked[n]).collect();
    if remaining.is_empty() {
        return None;
    }
    let start = remaining
        .iter()
        .copied()
        .find(|&n| adjacency[n].iter().filter(|&&m| !walked[m]).count() <= 1)
        .unwrap_or(remaining[0]);

    let mut order = Vec::new();
    let mut current = start;
    loop {
        walked[current] = true;
        order.push(current);
        match adjacency[current].iter().find(|&&n| !walked[n]) {
            Some(&next) => current = next,
            None => break,
        }
    }
    Some(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::is_watertight;

    fn quad_template() -> Vec<DVec2> {
        CutFacePreset::Quad.points()
    }

    fn build_tube(length: f64, radius: f64) -> StrokeMeshBuilder {
        let mut builder = StrokeMeshBuilder::new();
        let a = builder.add_node(DVec3::ZERO, radius, quad_template(), 0.0);
        let b = builder.add_node(DVec3::new(length, 0.0, 0.0), radius, quad_template(), 0.0);
        builder.add_edge(a, b);
        assert!(builder.build());
        builder
    }

    #[test]
    fn test_empty_build_fails() {
        let mut builder = StrokeMeshBuilder::new();
        assert!(!builder.build());
    }

    #[test]
    fn test_two_node_tube_is_watertight() {
        let builder = build_tube(2.0, 0.5);
        // 2 rings of 4 plus two quad caps.
        assert_eq!(builder.generated_vertices().len(), 8);
        assert_eq!(builder.generated_faces().len(), 6);
        assert!(is_watertight(builder.generated_faces()));
    }

    #[test]
    fn test_tube_faces_are_quads() {
        let builder = build_tube(2.0, 0.5);
        assert!(builder.generated_faces().iter().all(|f| f.len() == 4));
    }

    #[test]
    fn test_sources_follow_rings() {
        let builder = build_tube(2.0, 0.5);
        let sources = builder.generated_vertices_source_node_indices();
        assert_eq!(sources.len(), 8);
        assert!(sources[..4].iter().all(|&s| s == 0));
        assert!(sources[4..].iter().all(|&s| s == 1));
    }

    #[test]
    fn test_isolated_node_builds_watertight_sphere() {
        let mut builder = StrokeMeshBuilder::new();
        builder.add_node(DVec3::ZERO, 1.0, quad_template(), 0.0);
        assert!(builder.build());
        assert!(is_watertight(builder.generated_faces()));
        // Every vertex sits on the sphere.
        for &v in builder.generated_vertices() {
            assert!((v.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ring_skeleton_closes_without_caps() {
        let mut builder = StrokeMeshBuilder::new();
        let nodes: Vec<usize> = (0..4)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / 4.0;
                builder.add_node(
                    DVec3::new(2.0 * angle.cos(), 2.0 * angle.sin(), 0.0),
                    0.5,
                    quad_template(),
                    0.0,
                )
            })
            .collect();
        for i in 0..4 {
            builder.add_edge(nodes[i], nodes[(i + 1) % 4]);
        }
        assert!(builder.build());
        assert!(is_watertight(builder.generated_faces()));
        assert!(builder.generated_faces().iter().all(|f| f.len() == 4));
    }

    #[test]
    fn test_hollow_tube_has_rims() {
        let mut builder = StrokeMeshBuilder::new();
        let a = builder.add_node(DVec3::ZERO, 0.5, quad_template(), 0.0);
        let b = builder.add_node(DVec3::new(2.0, 0.0, 0.0), 0.5, quad_template(), 0.0);
        builder.add_edge(a, b);
        builder.set_hollow_thickness(0.4);
        assert!(builder.build());
        // Outer shell + inner shell + two rims, no caps.
        assert_eq!(builder.generated_vertices().len(), 16);
        assert!(is_watertight(builder.generated_faces()));
    }

    #[test]
    fn test_deform_width_stretches_base_axis() {
        let mut builder = StrokeMeshBuilder::new();
        let a = builder.add_node(DVec3::ZERO, 1.0, quad_template(), 0.0);
        let b = builder.add_node(DVec3::new(4.0, 0.0, 0.0), 1.0, quad_template(), 0.0);
        builder.add_edge(a, b);
        builder.set_deform_width(2.0);
        assert!(builder.build());
        let spread = builder
            .generated_vertices()
            .iter()
            .map(|v| v.y.abs().max(v.z.abs()))
            .fold(0.0f64, f64::max);
        assert!(spread > 1.5, "deform should widen the section, got {spread}");
    }

    #[test]
    fn test_branching_skeleton_sweeps_every_arm() {
        let mut builder = StrokeMeshBuilder::new();
        let a = builder.add_node(DVec3::ZERO, 0.5, quad_template(), 0.0);
        let b = builder.add_node(DVec3::new(2.0, 0.0, 0.0), 0.5, quad_template(), 0.0);
        let c = builder.add_node(DVec3::new(4.0, 0.0, 0.0), 0.5, quad_template(), 0.0);
        let d = builder.add_node(DVec3::new(2.0, 2.0, 0.0), 0.5, quad_template(), 0.0);
        builder.add_edge(a, b);
        builder.add_edge(b, c);
        builder.add_edge(b, d);
        assert!(builder.build());
        assert!(is_watertight(builder.generated_faces()));
        // The branch arm contributes geometry near its tip too.
        assert!(builder
            .generated_vertices()
            .iter()
            .any(|v| v.y > 1.5));
    }

    #[test]
    fn test_mirrorable_output_is_deterministic() {
        let first = build_tube(2.0, 0.5);
        let second = build_tube(2.0, 0.5);
        assert_eq!(first.generated_vertices(), second.generated_vertices());
        assert_eq!(first.generated_faces(), second.generated_faces());
    }
}
