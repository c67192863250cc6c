//! # Plane
//!
//! Splitting plane for BSP partitioning.

use config::constants::BOOLEAN_EPSILON;
use glam::DVec3;

/// Side of a plane, for points and whole polygons alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Front,
    Back,
    Coplanar,
    /// Polygons only: vertices on both sides.
    Spanning,
}

/// A plane defined by unit normal and signed distance from origin.
///
/// The plane equation is `normal · point = distance`.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: DVec3,
    pub distance: f64,
}

impl Plane {
    /// Plane through three points with counter-clockwise winding.
    ///
    /// Returns `None` for collinear points.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let normal = (b - a).cross(c - a);
        let len_sq = normal.length_squared();
        if len_sq < BOOLEAN_EPSILON * BOOLEAN_EPSILON {
            return None;
        }
        let normal = normal / len_sq.sqrt();
        Some(Self {
            normal,
            distance: normal.dot(a),
        })
    }

    /// Signed distance; positive is in front.
    #[inline]
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.distance
    }

    /// Classify a point against the plane.
    #[inline]
    pub fn classify_point(&self, point: DVec3) -> Classification {
        let dist = self.signed_distance(point);
        if dist > BOOLEAN_EPSILON {
            Classification::Front
        } else if dist < -BOOLEAN_EPSILON {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }

    /// Flip to face the opposite direction.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.distance = -self.distance;
    }
}
