//! # Smooth Normals
//!
//! Per-corner normal generation with a crease threshold: a corner averages
//! the normals of surrounding triangles whose facing stays within the
//! threshold angle of its own triangle; anything sharper keeps the faceted
//! normal.

use glam::DVec3;

/// Generate one normal per triangle corner (flattened, 3 per triangle).
pub fn smooth_normal(
    vertices: &[DVec3],
    triangles: &[[usize; 3]],
    triangle_normals: &[DVec3],
    threshold_angle_degrees: f64,
    corner_normals: &mut Vec<DVec3>,
) {
    corner_normals.clear();
    corner_normals.reserve(triangles.len() * 3);

    let mut triangles_around_vertex: Vec<Vec<usize>> = vec![Vec::new(); vertices.len()];
    for (triangle_index, triangle) in triangles.iter().enumerate() {
        for &vertex_index in triangle {
            triangles_around_vertex[vertex_index].push(triangle_index);
        }
    }

    let threshold_cos = threshold_angle_degrees.to_radians().cos();
    for (triangle_index, triangle) in triangles.iter().enumerate() {
        let own_normal = triangle_normals[triangle_index];
        for &vertex_index in triangle {
            let mut sum = DVec3::ZERO;
            for &neighbor in &triangles_around_vertex[vertex_index] {
                let neighbor_normal = triangle_normals[neighbor];
                if own_normal.dot(neighbor_normal) >= threshold_cos {
                    sum += neighbor_normal;
                }
            }
            let normal = sum.normalize_or_zero();
            corner_normals.push(if normal == DVec3::ZERO { own_normal } else { normal });
        }
    }
}
