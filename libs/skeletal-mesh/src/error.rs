//! # Geometry Errors
//!
//! Error types for the geometry kernel. The generation pipeline maps these
//! to its success flag; nothing here unwinds through the pipeline.

use thiserror::Error;

/// Errors that can occur inside the geometry kernel.
#[derive(Debug, Clone, Error)]
pub enum MeshError {
    /// An operand mesh had no usable geometry.
    #[error("Empty mesh")]
    EmptyMesh,

    /// An operand was not watertight and cannot enter a boolean operation.
    #[error("Mesh is not combinable")]
    NotCombinable,

    /// A boolean operation produced no geometry.
    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),
}
