//! # Topology Checks
//!
//! Half-edge based watertightness test shared by the solid handle and the
//! generation pipeline.

use std::collections::BTreeSet;

/// Whether a face set is watertight.
///
/// Every directed half-edge must occur at most once and have a matching
/// opposite half-edge. Works on faces of any arity (triangles, quads,
/// n-gon caps).
///
/// # Example
///
/// ```rust
/// use skeletal_mesh::is_watertight;
///
/// // A tetrahedron.
/// let faces = vec![
///     vec![0, 2, 1],
///     vec![0, 1, 3],
///     vec![1, 2, 3],
///     vec![2, 0, 3],
/// ];
/// assert!(is_watertight(&faces));
///
/// // Remove one face and the boundary edges lose their opposites.
/// assert!(!is_watertight(&faces[..3]));
/// ```
pub fn is_watertight<F: AsRef<[usize]>>(faces: &[F]) -> bool {
    let mut half_edges = BTreeSet::new();
    for face in faces {
        let face = face.as_ref();
        for i in 0..face.len() {
            let j = (i + 1) % face.len();
            if !half_edges.insert((face[i], face[j])) {
                return false;
            }
        }
    }
    half_edges
        .iter()
        .all(|(from, to)| half_edges.contains(&(*to, *from)))
}
