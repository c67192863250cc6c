//! # Position Key
//!
//! Fixed-precision quantization of 3D points so that coincident
//! floating-point vertices hash and compare equal. Keys order totally,
//! which keeps sets of key pairs (quad diagonals, seam vertices)
//! deterministic across runs.

use config::constants::POSITION_KEY_SCALE;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A quantized 3D position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PositionKey {
    x: i64,
    y: i64,
    z: i64,
}

impl PositionKey {
    /// Quantize a position.
    pub fn new(position: DVec3) -> Self {
        Self {
            x: (position.x * POSITION_KEY_SCALE).round() as i64,
            y: (position.y * POSITION_KEY_SCALE).round() as i64,
            z: (position.z * POSITION_KEY_SCALE).round() as i64,
        }
    }
}

impl From<DVec3> for PositionKey {
    fn from(position: DVec3) -> Self {
        Self::new(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coincident_points_share_key() {
        let a = PositionKey::new(DVec3::new(1.0, 2.0, 3.0));
        let b = PositionKey::new(DVec3::new(1.0002, 1.9998, 3.0003));
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_points_differ() {
        let a = PositionKey::new(DVec3::new(1.0, 2.0, 3.0));
        let b = PositionKey::new(DVec3::new(1.01, 2.0, 3.0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_ordering_is_total() {
        let mut keys = vec![
            PositionKey::new(DVec3::new(1.0, 0.0, 0.0)),
            PositionKey::new(DVec3::new(-1.0, 0.0, 0.0)),
            PositionKey::new(DVec3::new(0.0, 0.0, 0.0)),
        ];
        keys.sort();
        assert!(keys[0] < keys[1] && keys[1] < keys[2]);
    }
}
