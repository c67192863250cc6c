//! # Triangulation
//!
//! Face triangulation for mixed triangle/quad/n-gon face lists.
//!
//! Quads split along the 0–2 diagonal; that diagonal is exactly what the
//! quad-recovery pass later looks up, so the two stay in sync. Larger
//! faces are ear-clipped against the face plane.

use glam::DVec3;

/// Triangulate a face list into `triangles`.
///
/// Faces with fewer than three vertices are skipped.
pub fn triangulate_faces(
    vertices: &[DVec3],
    faces: &[Vec<usize>],
    triangles: &mut Vec<[usize; 3]>,
) {
    for face in faces {
        match face.len() {
            0..=2 => {}
            3 => triangles.push([face[0], face[1], face[2]]),
            4 => {
                triangles.push([face[0], face[1], face[2]]);
                triangles.push([face[2], face[3], face[0]]);
            }
            _ => ear_clip(vertices, face, triangles),
        }
    }
}

/// Newell's method; robust for non-planar rings.
fn face_normal(vertices: &[DVec3], face: &[usize]) -> DVec3 {
    let mut normal = DVec3::ZERO;
    for i in 0..face.len() {
        let a = vertices[face[i]];
        let b = vertices[face[(i + 1) % face.len()]];
        normal += DVec3::new(
            (a.y - b.y) * (a.z + b.z),
            (a.z - b.z) * (a.x + b.x),
            (a.x - b.x) * (a.y + b.y),
        );
    }
    normal
}

fn point_in_triangle(p: DVec3, a: DVec3, b: DVec3, c: DVec3, normal: DVec3) -> bool {
    let edge_sign = |from: DVec3, to: DVec3| (to - from).cross(p - from).dot(normal);
    edge_sign(a, b) >= 0.0 && edge_sign(b, c) >= 0.0 && edge_sign(c, a) >= 0.0
}

fn ear_clip(vertices: &[DVec3], face: &[usize], triangles: &mut Vec<[usize; 3]>) {
    let normal = face_normal(vertices, face).normalize_or_zero();
    let mut ring: Vec<usize> = face.to_vec();

    while ring.len() > 3 {
        let mut clipped = false;
        for i in 0..ring.len() {
            let prev = ring[(i + ring.len() - 1) % ring.len()];
            let curr = ring[i];
            let next = ring[(i + 1) % ring.len()];
            let (a, b, c) = (vertices[prev], vertices[curr], vertices[next]);

            // Reflex corner, not an ear.
            if (b - a).cross(c - b).dot(normal) <= 0.0 {
                continue;
            }
            // Any other ring vertex inside the candidate ear?
            let blocked = ring.iter().any(|&other| {
                other != prev
                    && other != curr
                    && other != next
                    && point_in_triangle(vertices[other], a, b, c, normal)
            });
            if blocked {
                continue;
            }

            triangles.push([prev, curr, next]);
            ring.remove(i);
            clipped = true;
            break;
        }
        if !clipped {
            // Degenerate ring; fall back to a fan so no area is dropped.
            for i in 1..ring.len() - 1 {
                triangles.push([ring[0], ring[i], ring[i + 1]]);
            }
            return;
        }
    }
    if ring.len() == 3 {
        triangles.push([ring[0], ring[1], ring[2]]);
    }
}
