//! # Part Enumerations
//!
//! Typed views of the `target` and `base` part attributes.

use serde::{Deserialize, Serialize};

/// What a part contributes to the document.
///
/// `Model` parts join the final object; `CutFace` parts exist only to donate
/// their 2D outline as a cut template for other parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartTarget {
    /// Joined into the combined model.
    Model,
    /// Donates a cut-section polygon; never meshed into the model.
    CutFace,
}

impl PartTarget {
    /// Parse from the attribute string; anything unrecognized is `Model`.
    pub fn from_attribute(value: &str) -> Self {
        match value {
            "CutFace" => PartTarget::CutFace,
            _ => PartTarget::Model,
        }
    }
}

impl Default for PartTarget {
    fn default() -> Self {
        PartTarget::Model
    }
}

/// Base-plane preference for the stroke builder's base normal.
///
/// Selects which world axes may contribute to the sweep's base normal:
/// `YZ` disables the x contribution, `XY` disables z, `ZX` disables y,
/// `Average` switches the builder to averaged base normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartBase {
    /// No restriction (all three axes allowed).
    XYZ,
    /// Averaged base normal.
    Average,
    /// X contribution disabled.
    YZ,
    /// Z contribution disabled.
    XY,
    /// Y contribution disabled.
    ZX,
}

impl PartBase {
    /// Parse from the attribute string; anything unrecognized is `XYZ`.
    pub fn from_attribute(value: &str) -> Self {
        match value {
            "Average" => PartBase::Average,
            "YZ" => PartBase::YZ,
            "XY" => PartBase::XY,
            "ZX" => PartBase::ZX,
            _ => PartBase::XYZ,
        }
    }
}

impl Default for PartBase {
    fn default() -> Self {
        PartBase::XYZ
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_target_from_attribute() {
        assert_eq!(PartTarget::from_attribute("CutFace"), PartTarget::CutFace);
        assert_eq!(PartTarget::from_attribute("Model"), PartTarget::Model);
        assert_eq!(PartTarget::from_attribute(""), PartTarget::Model);
        assert_eq!(PartTarget::from_attribute("garbage"), PartTarget::Model);
    }

    #[test]
    fn test_part_base_from_attribute() {
        assert_eq!(PartBase::from_attribute("Average"), PartBase::Average);
        assert_eq!(PartBase::from_attribute("YZ"), PartBase::YZ);
        assert_eq!(PartBase::from_attribute(""), PartBase::XYZ);
    }
}
