//! # BSP Tree
//!
//! Binary space partitioning tree for boolean solid operations, following
//! the csg.js formulation: clip each operand's polygons against the other
//! operand's tree, then collect what survives.

use super::plane::Plane;
use super::polygon::Polygon;

/// A node in the BSP tree.
///
/// Each node partitions space by the plane of its first polygon and keeps
/// every coplanar polygon alongside it.
#[derive(Debug, Clone, Default)]
pub struct BspNode {
    plane: Option<Plane>,
    polygons: Vec<Polygon>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Build a tree from a polygon soup.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut node = Self::default();
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    /// Insert polygons, splitting them down the existing tree.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        if polygons.is_empty() {
            return;
        }
        if self.plane.is_none() {
            self.plane = Some(*polygons[0].plane());
        }
        let plane = self.plane.expect("plane set above");

        let mut front_polys = Vec::new();
        let mut back_polys = Vec::new();
        for poly in polygons {
            // Coplanar polygons stay at this node, either orientation.
            let mut coplanar_back = Vec::new();
            poly.split(
                &plane,
                &mut self.polygons,
                &mut coplanar_back,
                &mut front_polys,
                &mut back_polys,
            );
            self.polygons.append(&mut coplanar_back);
        }

        if !front_polys.is_empty() {
            self.front
                .get_or_insert_with(Default::default)
                .build(front_polys);
        }
        if !back_polys.is_empty() {
            self.back
                .get_or_insert_with(Default::default)
                .build(back_polys);
        }
    }

    /// Convert the solid to its complement.
    pub fn invert(&mut self) {
        for poly in &mut self.polygons {
            poly.flip();
        }
        if let Some(plane) = &mut self.plane {
            plane.flip();
        }
        std::mem::swap(&mut self.front, &mut self.back);
        if let Some(front) = &mut self.front {
            front.invert();
        }
        if let Some(back) = &mut self.back {
            back.invert();
        }
    }

    /// Remove the parts of `polygons` inside this tree's solid.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let plane = match self.plane {
            Some(plane) => plane,
            None => return polygons,
        };

        let mut front_polys = Vec::new();
        let mut back_polys = Vec::new();
        for poly in polygons {
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            poly.split(
                &plane,
                &mut coplanar_front,
                &mut coplanar_back,
                &mut front_polys,
                &mut back_polys,
            );
            front_polys.extend(coplanar_front);
            back_polys.extend(coplanar_back);
        }

        front_polys = match &self.front {
            Some(front) => front.clip_polygons(front_polys),
            None => front_polys,
        };
        back_polys = match &self.back {
            Some(back) => back.clip_polygons(back_polys),
            // No back subtree: back space is solid, polygons there vanish.
            None => Vec::new(),
        };

        front_polys.extend(back_polys);
        front_polys
    }

    /// Clip this tree's polygons against another tree.
    pub fn clip_to(&mut self, other: &BspNode) {
        self.polygons = other.clip_polygons(std::mem::take(&mut self.polygons));
        if let Some(front) = &mut self.front {
            front.clip_to(other);
        }
        if let Some(back) = &mut self.back {
            back.clip_to(other);
        }
    }

    /// Collect every polygon in the tree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = self.polygons.clone();
        if let Some(front) = &self.front {
            result.extend(front.all_polygons());
        }
        if let Some(back) = &self.back {
            result.extend(back.all_polygons());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn triangle_at(z: f64) -> Polygon {
        Polygon::from_vertices(vec![
            DVec3::new(0.0, 0.0, z),
            DVec3::new(1.0, 0.0, z),
            DVec3::new(0.0, 1.0, z),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_tree() {
        let tree = BspNode::new(Vec::new());
        assert!(tree.all_polygons().is_empty());
    }

    #[test]
    fn test_build_keeps_all_polygons() {
        let tree = BspNode::new(vec![triangle_at(0.0), triangle_at(1.0), triangle_at(-1.0)]);
        assert_eq!(tree.all_polygons().len(), 3);
    }

    #[test]
    fn test_invert_flips_normals() {
        let normal = triangle_at(0.0).plane().normal;
        let mut tree = BspNode::new(vec![triangle_at(0.0)]);
        tree.invert();
        let inverted = tree.all_polygons()[0].plane().normal;
        assert!((normal + inverted).length() < 1e-9);
    }

    #[test]
    fn test_clip_discards_back_polygons() {
        let tree = BspNode::new(vec![triangle_at(0.0)]);
        // In front of the tree plane: survives.
        assert_eq!(tree.clip_polygons(vec![triangle_at(1.0)]).len(), 1);
        // Behind the tree plane: solid side, removed.
        assert_eq!(tree.clip_polygons(vec![triangle_at(-1.0)]).len(), 0);
    }
}
