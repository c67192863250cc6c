//! # Stroke Modifier
//!
//! Skeleton refinement ahead of sweeping. All refinement steps preserve a
//! link from every produced node back to the original node it descends
//! from, so generated vertices can later be attributed to authored nodes.

use glam::{DVec2, DVec3};

/// A refined skeleton node.
#[derive(Debug, Clone)]
pub struct StrokeNode {
    /// Authored node (true) or synthesized during refinement (false).
    pub is_original: bool,
    pub position: DVec3,
    pub radius: f64,
    /// Cut template override; empty means "use the part template".
    pub cut_template: Vec<DVec2>,
    pub cut_rotation: f64,
    /// The original node this one descends from.
    pub origin_node_index: usize,
    /// Nearest original endpoint when synthesized on an edge.
    pub near_origin_node_index: Option<usize>,
    /// Opposite original endpoint when synthesized on an edge.
    pub far_origin_node_index: Option<usize>,
}

/// An edge between refined nodes.
#[derive(Debug, Clone, Copy)]
pub struct StrokeEdge {
    pub first_node_index: usize,
    pub second_node_index: usize,
}

/// Skeleton refinement stage.
#[derive(Debug, Default)]
pub struct StrokeModifier {
    nodes: Vec<StrokeNode>,
    edges: Vec<StrokeEdge>,
    smooth: bool,
    intermediate_addition: bool,
}

impl StrokeModifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Average positions of interior nodes during finalize.
    pub fn enable_smooth(&mut self) {
        self.smooth = true;
    }

    /// Insert interpolated nodes on long edges during finalize.
    pub fn enable_intermediate_addition(&mut self) {
        self.intermediate_addition = true;
    }

    pub fn add_node(
        &mut self,
        position: DVec3,
        radius: f64,
        cut_template: Vec<DVec2>,
        cut_rotation: f64,
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(StrokeNode {
            is_original: true,
            position,
            radius,
            cut_template,
            cut_rotation,
            origin_node_index: index,
            near_origin_node_index: None,
            far_origin_node_index: None,
        });
        index
    }

    pub fn add_edge(&mut self, first_node_index: usize, second_node_index: usize) {
        self.edges.push(StrokeEdge {
            first_node_index,
            second_node_index,
        });
    }

    /// Split every edge at its midpoint.
    pub fn subdivide(&mut self) {
        let old_edges = std::mem::take(&mut self.edges);
        for edge in old_edges {
            let first = self.nodes[edge.first_node_index].clone();
            let second = self.nodes[edge.second_node_index].clone();
            let middle_index = self.nodes.len();
            self.nodes.push(StrokeNode {
                is_original: false,
                position: (first.position + second.position) * 0.5,
                radius: (first.radius + second.radius) * 0.5,
                cut_template: first.cut_template.clone(),
                cut_rotation: first.cut_rotation,
                origin_node_index: first.origin_node_index,
                near_origin_node_index: Some(first.origin_node_index),
                far_origin_node_index: Some(second.origin_node_index),
            });
            self.edges.push(StrokeEdge {
                first_node_index: edge.first_node_index,
                second_node_index: middle_index,
            });
            self.edges.push(StrokeEdge {
                first_node_index: middle_index,
                second_node_index: edge.second_node_index,
            });
        }
    }

    /// Extend each chain endpoint with a small half-radius node so the
    /// swept tube tapers instead of ending flat.
    pub fn round_end(&mut self) {
        let degrees = self.node_degrees();
        let endpoint_neighbors: Vec<(usize, usize)> = self
            .edges
            .iter()
            .flat_map(|e| {
                [
                    (e.first_node_index, e.second_node_index),
                    (e.second_node_index, e.first_node_index),
                ]
            })
            .filter(|(node, _)| degrees[*node] == 1)
            .collect();
        for (endpoint, neighbor) in endpoint_neighbors {
            let node = self.nodes[endpoint].clone();
            let away = (node.position - self.nodes[neighbor].position).normalize_or_zero();
            if away == DVec3::ZERO {
                continue;
            }
            let cap_index = self.nodes.len();
            self.nodes.push(StrokeNode {
                is_original: false,
                position: node.position + away * node.radius * 0.5,
                radius: node.radius * 0.5,
                cut_template: node.cut_template.clone(),
                cut_rotation: node.cut_rotation,
                origin_node_index: node.origin_node_index,
                near_origin_node_index: Some(node.origin_node_index),
                far_origin_node_index: Some(self.nodes[neighbor].origin_node_index),
            });
            self.edges.push(StrokeEdge {
                first_node_index: endpoint,
                second_node_index: cap_index,
            });
        }
    }

    /// Apply the enabled refinements. Call after the skeleton is complete.
    pub fn finalize(&mut self) {
        if self.intermediate_addition {
            self.add_intermediate_nodes();
        }
        if self.smooth {
            self.smooth_positions();
        }
    }

    pub fn nodes(&self) -> &[StrokeNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[StrokeEdge] {
        &self.edges
    }

    fn node_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.nodes.len()];
        for edge in &self.edges {
            degrees[edge.first_node_index] += 1;
            degrees[edge.second_node_index] += 1;
        }
        degrees
    }

    /// Break edges longer than the local radius into interpolated steps.
    fn add_intermediate_nodes(&mut self) {
        let old_edges = std::mem::take(&mut self.edges);
        for edge in old_edges {
            let first = self.nodes[edge.first_node_index].clone();
            let second = self.nodes[edge.second_node_index].clone();
            let length = (second.position - first.position).length();
            let step = ((first.radius + second.radius) * 0.5).max(f64::EPSILON);
            let segments = (length / step).ceil() as usize;
            if segments <= 1 {
                self.edges.push(edge);
                continue;
            }
            let mut previous = edge.first_node_index;
            for i in 1..segments {
                let t = i as f64 / segments as f64;
                let origin = if t < 0.5 {
                    first.origin_node_index
                } else {
                    second.origin_node_index
                };
                let (near, far) = if t < 0.5 {
                    (first.origin_node_index, second.origin_node_index)
                } else {
                    (second.origin_node_index, first.origin_node_index)
                };
                let index = self.nodes.len();
                self.nodes.push(StrokeNode {
                    is_original: false,
                    position: first.position.lerp(second.position, t),
                    radius: first.radius + (second.radius - first.radius) * t,
                    cut_template: first.cut_template.clone(),
                    cut_rotation: first.cut_rotation,
                    origin_node_index: origin,
                    near_origin_node_index: Some(near),
                    far_origin_node_index: Some(far),
                });
                self.edges.push(StrokeEdge {
                    first_node_index: previous,
                    second_node_index: index,
                });
                previous = index;
            }
            self.edges.push(StrokeEdge {
                first_node_index: previous,
                second_node_index: edge.second_node_index,
            });
        }
    }

    /// One Laplacian pass over degree-2 nodes.
    fn smooth_positions(&mut self) {
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for edge in &self.edges {
            neighbors[edge.first_node_index].push(edge.second_node_index);
            neighbors[edge.second_node_index].push(edge.first_node_index);
        }
        let old_positions: Vec<DVec3> = self.nodes.iter().map(|n| n.position).collect();
        for (index, node) in self.nodes.iter_mut().enumerate() {
            if neighbors[index].len() != 2 {
                continue;
            }
            let a = old_positions[neighbors[index][0]];
            let b = old_positions[neighbors[index][1]];
            node.position = old_positions[index] * 0.5 + (a + b) * 0.25;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_modifier(length: f64, radius: f64) -> StrokeModifier {
        let mut modifier = StrokeModifier::new();
        let a = modifier.add_node(DVec3::ZERO, radius, Vec::new(), 0.0);
        let b = modifier.add_node(DVec3::new(length, 0.0, 0.0), radius, Vec::new(), 0.0);
        modifier.add_edge(a, b);
        modifier
    }

    #[test]
    fn test_subdivide_splits_edges() {
        let mut modifier = two_node_modifier(2.0, 1.0);
        modifier.subdivide();
        assert_eq!(modifier.nodes().len(), 3);
        assert_eq!(modifier.edges().len(), 2);
        let middle = &modifier.nodes()[2];
        assert!(!middle.is_original);
        assert_eq!(middle.position, DVec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_round_end_adds_taper_nodes() {
        let mut modifier = two_node_modifier(2.0, 1.0);
        modifier.round_end();
        // Both endpoints grow a cap node.
        assert_eq!(modifier.nodes().len(), 4);
        let cap = &modifier.nodes()[2];
        assert_eq!(cap.radius, 0.5);
    }

    #[test]
    fn test_intermediate_addition_preserves_chain() {
        let mut modifier = two_node_modifier(4.0, 0.5);
        modifier.enable_intermediate_addition();
        modifier.finalize();
        // Edge of length 4 with step 0.5 becomes 8 segments.
        assert_eq!(modifier.edges().len(), 8);
        assert_eq!(modifier.nodes().len(), 9);
        // Synthesized nodes keep origin links to the authored endpoints.
        for node in modifier.nodes().iter().skip(2) {
            assert!(!node.is_original);
            assert!(node.origin_node_index <= 1);
            assert!(node.near_origin_node_index.is_some());
        }
    }

    #[test]
    fn test_smooth_moves_interior_only() {
        let mut modifier = StrokeModifier::new();
        let a = modifier.add_node(DVec3::ZERO, 1.0, Vec::new(), 0.0);
        let b = modifier.add_node(DVec3::new(1.0, 1.0, 0.0), 1.0, Vec::new(), 0.0);
        let c = modifier.add_node(DVec3::new(2.0, 0.0, 0.0), 1.0, Vec::new(), 0.0);
        modifier.add_edge(a, b);
        modifier.add_edge(b, c);
        modifier.enable_smooth();
        modifier.finalize();
        assert_eq!(modifier.nodes()[0].position, DVec3::ZERO);
        assert_eq!(modifier.nodes()[2].position, DVec3::new(2.0, 0.0, 0.0));
        assert!(modifier.nodes()[1].position.y < 1.0);
    }
}
