//! # Vertex Trimming
//!
//! Recenters a vertex cloud on the origin and optionally normalizes it to
//! a half-unit box; part previews are trimmed then doubled so they fill
//! the unit preview cube.

use glam::DVec3;

/// Center `vertices` on the origin; when `normalize`, also scale so the
/// longest axis spans `[-0.5, 0.5]`.
pub fn trim_vertices(vertices: &mut [DVec3], normalize: bool) {
    if vertices.is_empty() {
        return;
    }
    let mut min = DVec3::splat(f64::INFINITY);
    let mut max = DVec3::splat(f64::NEG_INFINITY);
    for &v in vertices.iter() {
        min = min.min(v);
        max = max.max(v);
    }
    let center = (min + max) * 0.5;
    let size = max - min;
    let long_size = size.x.max(size.y).max(size.z);

    for v in vertices.iter_mut() {
        *v -= center;
        if normalize && long_size > 0.0 {
            *v /= long_size;
        }
    }
}
