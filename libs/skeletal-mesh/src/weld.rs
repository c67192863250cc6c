//! # Vertex Welding
//!
//! Collapses short triangle edges left along boolean seams. Protected
//! vertices (interior geometry that existed before any boolean step) are
//! never merged into each other; an unprotected vertex collapses into a
//! protected partner, otherwise into the lower index.

use std::collections::BTreeSet;

use glam::DVec3;

use crate::position_key::PositionKey;

fn resolve(remap: &mut [usize], index: usize) -> usize {
    let mut root = index;
    while remap[root] != root {
        root = remap[root];
    }
    // Path compression.
    let mut walk = index;
    while remap[walk] != root {
        let next = remap[walk];
        remap[walk] = root;
        walk = next;
    }
    root
}

/// Weld vertices closer than `allowed_smallest_distance`.
///
/// Returns the number of collapses performed in this pass; callers loop
/// until a pass returns zero. Each collapse strictly decreases the vertex
/// count, so the loop terminates.
pub fn weld_vertices(
    source_vertices: &[DVec3],
    source_triangles: &[[usize; 3]],
    allowed_smallest_distance: f64,
    protected_vertices: &BTreeSet<PositionKey>,
    dest_vertices: &mut Vec<DVec3>,
    dest_triangles: &mut Vec<[usize; 3]>,
) -> usize {
    dest_vertices.clear();
    dest_triangles.clear();

    let threshold_squared = allowed_smallest_distance * allowed_smallest_distance;
    let mut remap: Vec<usize> = (0..source_vertices.len()).collect();
    let mut affected = 0;

    for triangle in source_triangles {
        for i in 0..3 {
            let a = resolve(&mut remap, triangle[i]);
            let b = resolve(&mut remap, triangle[(i + 1) % 3]);
            if a == b {
                continue;
            }
            if source_vertices[a].distance_squared(source_vertices[b]) > threshold_squared {
                continue;
            }
            let a_protected = protected_vertices.contains(&PositionKey::new(source_vertices[a]));
            let b_protected = protected_vertices.contains(&PositionKey::new(source_vertices[b]));
            if a_protected && b_protected {
                continue;
            }
            let (keep, drop) = if a_protected {
                (a, b)
            } else if b_protected {
                (b, a)
            } else if a < b {
                (a, b)
            } else {
                (b, a)
            };
            remap[drop] = keep;
            affected += 1;
        }
    }

    // Rebuild with compacted indices; degenerate triangles vanish.
    let mut compact: Vec<Option<usize>> = vec![None; source_vertices.len()];
    for triangle in source_triangles {
        let resolved = [
            resolve(&mut remap, triangle[0]),
            resolve(&mut remap, triangle[1]),
            resolve(&mut remap, triangle[2]),
        ];
        if resolved[0] == resolved[1] || resolved[1] == resolved[2] || resolved[2] == resolved[0] {
            continue;
        }
        let mut mapped = [0usize; 3];
        for (slot, &old) in mapped.iter_mut().zip(resolved.iter()) {
            *slot = match compact[old] {
                Some(new) => new,
                None => {
                    dest_vertices.push(source_vertices[old]);
                    let new = dest_vertices.len() - 1;
                    compact[old] = Some(new);
                    new
                }
            };
        }
        dest_triangles.push(mapped);
    }

    affected
}
