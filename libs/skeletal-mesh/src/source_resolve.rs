//! # Triangle Source Resolution
//!
//! Maps each triangle (and vertex) of a combined mesh back to the skeleton
//! node it grew from, by quantized position lookup with corner voting.
//! Seam triangles whose corners were all introduced by booleans inherit a
//! source from an edge-adjacent resolved triangle.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;

use glam::DVec3;

use crate::position_key::PositionKey;

/// Resolve per-triangle and per-vertex sources.
///
/// `node_vertices` pairs known positions with their source labels (the
/// pipeline uses `(part id, node id)` pairs). Unresolvable entries get
/// `S::default()`.
pub fn resolve_triangle_source_node<S>(
    vertices: &[DVec3],
    triangles: &[[usize; 3]],
    node_vertices: &[(DVec3, S)],
    triangle_sources: &mut Vec<S>,
    vertex_sources: &mut Vec<S>,
) where
    S: Clone + Eq + Hash + Default,
{
    let mut source_by_key: BTreeMap<PositionKey, &S> = BTreeMap::new();
    for (position, source) in node_vertices {
        source_by_key.entry(PositionKey::new(*position)).or_insert(source);
    }

    vertex_sources.clear();
    for &v in vertices {
        vertex_sources.push(
            source_by_key
                .get(&PositionKey::new(v))
                .map(|s| (*s).clone())
                .unwrap_or_default(),
        );
    }

    // First pass: corner voting.
    triangle_sources.clear();
    let mut unresolved: Vec<usize> = Vec::new();
    for (triangle_index, triangle) in triangles.iter().enumerate() {
        let mut votes: HashMap<&S, usize> = HashMap::new();
        let mut first_seen: Option<&S> = None;
        for &corner in triangle {
            if let Some(source) = source_by_key.get(&PositionKey::new(vertices[corner])) {
                *votes.entry(*source).or_insert(0) += 1;
                if first_seen.is_none() {
                    first_seen = Some(*source);
                }
            }
        }
        let winner = votes
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(source, count)| (*source, *count));
        match winner {
            Some((source, count)) if count >= 2 => triangle_sources.push(source.clone()),
            _ => match first_seen {
                Some(source) => triangle_sources.push(source.clone()),
                None => {
                    triangle_sources.push(S::default());
                    unresolved.push(triangle_index);
                }
            },
        }
    }

    if unresolved.is_empty() {
        return;
    }

    // Second pass: flood resolved sources across shared edges.
    let mut triangles_by_edge: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (triangle_index, triangle) in triangles.iter().enumerate() {
        for i in 0..3 {
            let a = triangle[i];
            let b = triangle[(i + 1) % 3];
            let edge = (a.min(b), a.max(b));
            triangles_by_edge.entry(edge).or_default().push(triangle_index);
        }
    }
    let default = S::default();
    let mut queue: VecDeque<usize> = (0..triangles.len())
        .filter(|&i| triangle_sources[i] != default)
        .collect();
    while let Some(triangle_index) = queue.pop_front() {
        let source = triangle_sources[triangle_index].clone();
        let triangle = triangles[triangle_index];
        for i in 0..3 {
            let a = triangle[i];
            let b = triangle[(i + 1) % 3];
            let edge = (a.min(b), a.max(b));
            for &neighbor in &triangles_by_edge[&edge] {
                if triangle_sources[neighbor] == default {
                    triangle_sources[neighbor] = source.clone();
                    queue.push_back(neighbor);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_voting() {
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        let node_vertices = vec![
            (DVec3::new(0.0, 0.0, 0.0), 7u32),
            (DVec3::new(1.0, 0.0, 0.0), 7u32),
            (DVec3::new(0.0, 1.0, 0.0), 9u32),
        ];
        let mut triangle_sources = Vec::new();
        let mut vertex_sources = Vec::new();
        resolve_triangle_source_node(
            &vertices,
            &[[0, 1, 2]],
            &node_vertices,
            &mut triangle_sources,
            &mut vertex_sources,
        );
        assert_eq!(triangle_sources, vec![7]);
        assert_eq!(vertex_sources, vec![7, 7, 9]);
    }

    #[test]
    fn test_seam_triangle_inherits_from_neighbor() {
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            // Seam-only vertex, unknown to node_vertices.
            DVec3::new(1.0, 1.0, 0.0),
        ];
        let node_vertices = vec![
            (DVec3::new(0.0, 0.0, 0.0), 5u32),
            (DVec3::new(1.0, 0.0, 0.0), 5u32),
            (DVec3::new(0.0, 1.0, 0.0), 5u32),
        ];
        // Second triangle has two unknown-ish corners but shares edge 1-2.
        let triangles = [[0, 1, 2], [1, 3, 2]];
        let mut triangle_sources = Vec::new();
        let mut vertex_sources = Vec::new();
        resolve_triangle_source_node(
            &vertices,
            &triangles,
            &node_vertices,
            &mut triangle_sources,
            &mut vertex_sources,
        );
        assert_eq!(triangle_sources, vec![5, 5]);
        // The seam vertex falls back to the default.
        assert_eq!(vertex_sources[3], 0);
    }
}
