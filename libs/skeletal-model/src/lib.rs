//! # Skeletal Model
//!
//! Data model for the declarative scene snapshot consumed by the mesh
//! generator: string-attributed parts, nodes, edges, and the component tree.
//!
//! ## Architecture
//!
//! ```text
//! Snapshot → skeletal-gen (pipeline) → skeletal-mesh (geometry) → Object
//! ```
//!
//! Attribute values are stored as strings exactly as authored; the
//! [`attributes::Attributes`] accessor layer interprets them on read.

pub mod attributes;
pub mod color;
pub mod combine_mode;
pub mod ids;
pub mod part;
pub mod snapshot;

// Re-export public API
pub use attributes::{AttributeMap, Attributes};
pub use color::Color;
pub use combine_mode::CombineMode;
pub use ids::{nil_uuid_string, parse_non_nil_uuid, reverse_uuid};
pub use part::{PartBase, PartTarget};
pub use snapshot::Snapshot;
