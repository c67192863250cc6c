//! # Cut Faces
//!
//! The 2D cross-section polygons swept along part skeletons: named presets
//! plus the generator that derives a polygon from another part's walked
//! node graph.

use glam::DVec2;

/// Named cut-section presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutFacePreset {
    Quad,
    Triangle,
    Pentagon,
    Hexagon,
}

impl CutFacePreset {
    /// Parse a preset name. `"Square"` is accepted as an alias of `Quad`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Quad" | "Square" => Some(CutFacePreset::Quad),
            "Triangle" => Some(CutFacePreset::Triangle),
            "Pentagon" => Some(CutFacePreset::Pentagon),
            "Hexagon" => Some(CutFacePreset::Hexagon),
            _ => None,
        }
    }

    /// Canonical polygon, counter-clockwise, roughly unit sized.
    pub fn points(&self) -> Vec<DVec2> {
        match self {
            CutFacePreset::Quad => vec![
                DVec2::new(-1.0, -1.0),
                DVec2::new(1.0, -1.0),
                DVec2::new(1.0, 1.0),
                DVec2::new(-1.0, 1.0),
            ],
            CutFacePreset::Triangle => regular_polygon(3),
            CutFacePreset::Pentagon => regular_polygon(5),
            CutFacePreset::Hexagon => regular_polygon(6),
        }
    }
}

fn regular_polygon(sides: usize) -> Vec<DVec2> {
    (0..sides)
        .map(|i| {
            let angle = -std::f64::consts::FRAC_PI_2 + std::f64::consts::TAU * i as f64 / sides as f64;
            DVec2::new(angle.cos(), angle.sin())
        })
        .collect()
}

/// One walked node of a cut-face donor part.
#[derive(Debug, Clone)]
pub struct CutFaceNode {
    pub radius: f64,
    pub x: f64,
    pub y: f64,
    pub id: String,
}

/// Turn a walked node sequence into a 2D cut polygon.
///
/// A ring contributes its node positions directly. A chain is outlined:
/// one pass along the chain offset by each node's radius to the left, then
/// back along the other side, closing the loop.
pub fn cut_face_points_from_nodes(nodes: &[CutFaceNode], is_ring: bool) -> Vec<DVec2> {
    if is_ring {
        return nodes.iter().map(|n| DVec2::new(n.x, n.y)).collect();
    }
    if nodes.len() < 2 {
        return Vec::new();
    }

    let position = |i: usize| DVec2::new(nodes[i].x, nodes[i].y);
    let direction = |i: usize| -> DVec2 {
        let prev = if i == 0 { 0 } else { i - 1 };
        let next = if i + 1 == nodes.len() { i } else { i + 1 };
        (position(next) - position(prev)).normalize_or_zero()
    };

    let mut points = Vec::with_capacity(nodes.len() * 2);
    for i in 0..nodes.len() {
        let d = direction(i);
        let perpendicular = DVec2::new(-d.y, d.x);
        points.push(position(i) + perpendicular * nodes[i].radius);
    }
    for i in (0..nodes.len()).rev() {
        let d = direction(i);
        let perpendicular = DVec2::new(-d.y, d.x);
        points.push(position(i) - perpendicular * nodes[i].radius);
    }
    points
}
