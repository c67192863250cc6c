//! # Snapshot
//!
//! The immutable-in-spirit scene description handed to the generator: flat
//! tables of parts, nodes, edges, and components keyed by identifier
//! strings, plus the distinguished root component.
//!
//! The generator does mutate its owned copy in one well-defined place — the
//! mirror preprocessor synthesizes twin parts and components before any
//! meshing starts.

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeMap;
use std::collections::BTreeMap;

/// A parsed scene document.
///
/// Every entity is an attribute map; relationships are expressed as id
/// strings inside attribute values (`children` CSV on components, `from` /
/// `to` on edges, `partId` on nodes and edges).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Canvas attributes; `originX`/`originY`/`originZ` recenter node space.
    pub canvas: AttributeMap,
    /// Part id → part attributes.
    pub parts: BTreeMap<String, AttributeMap>,
    /// Node id → node attributes (`radius`, `x`, `y`, `z`, `partId`, ...).
    pub nodes: BTreeMap<String, AttributeMap>,
    /// Edge id → edge attributes (`from`, `to`, `partId`).
    pub edges: BTreeMap<String, AttributeMap>,
    /// Component id → component attributes (`children`, `linkData`, ...).
    pub components: BTreeMap<String, AttributeMap>,
    /// The virtual root; holds the top-level `children` list.
    pub root_component: AttributeMap,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }
}
