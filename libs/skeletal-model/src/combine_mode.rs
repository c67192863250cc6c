//! # Combine Mode
//!
//! How a component contributes to its parent during boolean combination.

use serde::{Deserialize, Serialize};

/// Per-component boolean contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombineMode {
    /// Unioned with preceding siblings.
    Normal,
    /// Subtracted from the accumulated result.
    Inversion,
    /// Kept out of the boolean sequence; emitted as a separate sub-mesh.
    Uncombined,
}

impl CombineMode {
    /// Parse from the attribute string; anything unrecognized is `Normal`.
    pub fn from_attribute(value: &str) -> Self {
        match value {
            "Inversion" => CombineMode::Inversion,
            "Uncombined" => CombineMode::Uncombined,
            _ => CombineMode::Normal,
        }
    }
}

impl Default for CombineMode {
    fn default() -> Self {
        CombineMode::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_mode_from_attribute() {
        assert_eq!(
            CombineMode::from_attribute("Inversion"),
            CombineMode::Inversion
        );
        assert_eq!(
            CombineMode::from_attribute("Uncombined"),
            CombineMode::Uncombined
        );
        assert_eq!(CombineMode::from_attribute("Normal"), CombineMode::Normal);
        assert_eq!(CombineMode::from_attribute(""), CombineMode::Normal);
    }
}
