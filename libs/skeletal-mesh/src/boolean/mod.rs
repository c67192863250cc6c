//! # Boolean Operations
//!
//! CSG combination of two solid meshes with per-vertex source labels.
//!
//! ## Operations
//!
//! - **Union**: A ∪ B
//! - **Diff**: A − B
//!
//! ## Source labels
//!
//! Every vertex of the combined result is labeled with the operand it came
//! from (or `None` when the vertex was introduced by plane splitting at the
//! seam). The recombiner uses the labels to distinguish original surface
//! from seam geometry.

mod bsp;
mod plane;
mod polygon;

use std::collections::BTreeMap;

use glam::DVec3;

use crate::error::MeshError;
use crate::position_key::PositionKey;
use crate::solid::SolidMesh;
use bsp::BspNode;
use polygon::Polygon;

/// Boolean combination method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanMethod {
    /// A ∪ B.
    Union,
    /// A − B.
    Diff,
}

/// Which operand a combined vertex originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexSource {
    /// Introduced at the seam by plane splitting.
    None,
    First,
    Second,
}

/// Combine two solid meshes.
///
/// `combined_vertices_sources` receives one `(source, original_index)`
/// entry per result vertex. Fails when either operand is not combinable or
/// the operation produces no geometry.
pub fn combine(
    first: &SolidMesh,
    second: &SolidMesh,
    method: BooleanMethod,
    combined_vertices_sources: &mut Vec<(VertexSource, usize)>,
) -> Result<SolidMesh, MeshError> {
    if !first.is_combinable() || !second.is_combinable() {
        return Err(MeshError::NotCombinable);
    }

    // Disjoint bounds: no clipping needed.
    if !bounds_overlap(first, second) {
        let result = match method {
            BooleanMethod::Union => merge_meshes(first, second),
            BooleanMethod::Diff => Some(first.clone()),
        }
        .ok_or_else(|| MeshError::BooleanFailed("merge produced no geometry".to_string()))?;
        label_sources(&result, first, second, combined_vertices_sources);
        return Ok(result);
    }

    let polys_a = mesh_to_polygons(first);
    let polys_b = mesh_to_polygons(second);
    if polys_a.is_empty() || polys_b.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let mut bsp_a = BspNode::new(polys_a);
    let mut bsp_b = BspNode::new(polys_b);

    let result_polys = match method {
        BooleanMethod::Union => {
            bsp_a.clip_to(&bsp_b);
            bsp_b.clip_to(&bsp_a);
            bsp_b.invert();
            bsp_b.clip_to(&bsp_a);
            bsp_b.invert();
            let mut polys = bsp_a.all_polygons();
            polys.extend(bsp_b.all_polygons());
            polys
        }
        BooleanMethod::Diff => {
            bsp_a.invert();
            bsp_a.clip_to(&bsp_b);
            bsp_b.clip_to(&bsp_a);
            bsp_b.invert();
            bsp_b.clip_to(&bsp_a);
            bsp_b.invert();
            bsp_a.build(bsp_b.all_polygons());
            bsp_a.invert();
            bsp_a.all_polygons()
        }
    };

    let result = polygons_to_mesh(&result_polys)
        .ok_or_else(|| MeshError::BooleanFailed("empty clip result".to_string()))?;
    label_sources(&result, first, second, combined_vertices_sources);
    Ok(result)
}

fn bounds(mesh: &SolidMesh) -> (DVec3, DVec3) {
    let mut min = DVec3::splat(f64::INFINITY);
    let mut max = DVec3::splat(f64::NEG_INFINITY);
    for &v in mesh.vertices() {
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

fn bounds_overlap(first: &SolidMesh, second: &SolidMesh) -> bool {
    let (min_a, max_a) = bounds(first);
    let (min_b, max_b) = bounds(second);
    min_a.x <= max_b.x
        && max_a.x >= min_b.x
        && min_a.y <= max_b.y
        && max_a.y >= min_b.y
        && min_a.z <= max_b.z
        && max_a.z >= min_b.z
}

/// Concatenate two solids into one (disjoint union).
fn merge_meshes(first: &SolidMesh, second: &SolidMesh) -> Option<SolidMesh> {
    let offset = first.vertices().len();
    let mut vertices = first.vertices().to_vec();
    vertices.extend_from_slice(second.vertices());
    let mut triangles = first.triangles().to_vec();
    triangles.extend(
        second
            .triangles()
            .iter()
            .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]),
    );
    SolidMesh::from_triangles(vertices, triangles)
}

fn mesh_to_polygons(mesh: &SolidMesh) -> Vec<Polygon> {
    mesh.triangles()
        .iter()
        .filter_map(|t| {
            Polygon::from_vertices(vec![
                mesh.vertices()[t[0]],
                mesh.vertices()[t[1]],
                mesh.vertices()[t[2]],
            ])
        })
        .collect()
}

/// Re-index a polygon soup into a shared-vertex mesh.
///
/// Vertices are merged by position key so the seam shares indices.
fn polygons_to_mesh(polygons: &[Polygon]) -> Option<SolidMesh> {
    let mut vertices: Vec<DVec3> = Vec::new();
    let mut index_of: BTreeMap<PositionKey, usize> = BTreeMap::new();
    let mut faces: Vec<Vec<usize>> = Vec::new();

    for poly in polygons {
        let mut face: Vec<usize> = Vec::with_capacity(poly.vertices().len());
        for &v in poly.vertices() {
            let index = *index_of.entry(PositionKey::new(v)).or_insert_with(|| {
                vertices.push(v);
                vertices.len() - 1
            });
            // Position-key merging can collapse near-coincident corners.
            if face.last() != Some(&index) {
                face.push(index);
            }
        }
        while face.len() > 1 && face.first() == face.last() {
            face.pop();
        }
        if face.len() >= 3 {
            faces.push(face);
        }
    }

    SolidMesh::from_faces(&vertices, &faces)
}

/// Label each result vertex with the operand it came from.
fn label_sources(
    result: &SolidMesh,
    first: &SolidMesh,
    second: &SolidMesh,
    combined_vertices_sources: &mut Vec<(VertexSource, usize)>,
) {
    let mut first_index: BTreeMap<PositionKey, usize> = BTreeMap::new();
    for (i, &v) in first.vertices().iter().enumerate() {
        first_index.entry(PositionKey::new(v)).or_insert(i);
    }
    let mut second_index: BTreeMap<PositionKey, usize> = BTreeMap::new();
    for (i, &v) in second.vertices().iter().enumerate() {
        second_index.entry(PositionKey::new(v)).or_insert(i);
    }

    combined_vertices_sources.clear();
    for &v in result.vertices() {
        let key = PositionKey::new(v);
        let entry = if let Some(&i) = first_index.get(&key) {
            (VertexSource::First, i)
        } else if let Some(&i) = second_index.get(&key) {
            (VertexSource::Second, i)
        } else {
            (VertexSource::None, 0)
        };
        combined_vertices_sources.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(center: DVec3, half: f64) -> SolidMesh {
        let corners: Vec<DVec3> = [
            (-1.0, -1.0, -1.0),
            (1.0, -1.0, -1.0),
            (1.0, 1.0, -1.0),
            (-1.0, 1.0, -1.0),
            (-1.0, -1.0, 1.0),
            (1.0, -1.0, 1.0),
            (1.0, 1.0, 1.0),
            (-1.0, 1.0, 1.0),
        ]
        .iter()
        .map(|&(x, y, z)| center + DVec3::new(x, y, z) * half)
        .collect();
        let faces: Vec<Vec<usize>> = vec![
            vec![3, 2, 1, 0],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![3, 0, 4, 7],
        ];
        SolidMesh::from_faces(&corners, &faces).unwrap()
    }

    #[test]
    fn test_union_disjoint_merges() {
        let a = cube(DVec3::ZERO, 1.0);
        let b = cube(DVec3::new(10.0, 0.0, 0.0), 1.0);
        let mut sources = Vec::new();
        let result = combine(&a, &b, BooleanMethod::Union, &mut sources).unwrap();
        assert_eq!(result.vertices().len(), 16);
        assert!(result.is_combinable());
        assert!(sources
            .iter()
            .all(|(s, _)| *s == VertexSource::First || *s == VertexSource::Second));
    }

    #[test]
    fn test_diff_disjoint_keeps_first() {
        let a = cube(DVec3::ZERO, 1.0);
        let b = cube(DVec3::new(10.0, 0.0, 0.0), 1.0);
        let mut sources = Vec::new();
        let result = combine(&a, &b, BooleanMethod::Diff, &mut sources).unwrap();
        assert_eq!(result.vertices().len(), a.vertices().len());
        assert!(sources.iter().all(|(s, _)| *s == VertexSource::First));
    }

    #[test]
    fn test_union_overlapping_cubes() {
        let a = cube(DVec3::ZERO, 1.0);
        let b = cube(DVec3::new(1.0, 0.0, 0.0), 1.0);
        let mut sources = Vec::new();
        let result = combine(&a, &b, BooleanMethod::Union, &mut sources).unwrap();
        assert!(!result.triangles().is_empty());
        // Union spans from -1 to 2 on x.
        let (min, max) = bounds(&result);
        assert!((min.x + 1.0).abs() < 1e-6);
        assert!((max.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_diff_overlapping_cubes() {
        let a = cube(DVec3::ZERO, 1.0);
        let b = cube(DVec3::new(1.0, 0.0, 0.0), 1.0);
        let mut sources = Vec::new();
        let result = combine(&a, &b, BooleanMethod::Diff, &mut sources).unwrap();
        assert!(!result.triangles().is_empty());
        // Everything at x > 0 was carved away.
        let (_, max) = bounds(&result);
        assert!(max.x < 0.0 + 1e-6);
    }

    #[test]
    fn test_not_combinable_operand_rejected() {
        let a = cube(DVec3::ZERO, 1.0);
        let open = SolidMesh::from_triangles(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let mut sources = Vec::new();
        assert!(combine(&a, &open, BooleanMethod::Union, &mut sources).is_err());
    }
}
