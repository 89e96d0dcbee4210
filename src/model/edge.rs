use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::node::NodeKey;

// ---------------------------------------------------------------------------
// Edge: relationships between supply chain entities
// ---------------------------------------------------------------------------

/// A directed, typed relationship. An edge carries no attributes beyond its
/// endpoints and type, so its value is also its identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    /// Source node (edge goes FROM this node).
    pub from: NodeKey,
    /// Target node (edge goes TO this node).
    pub to: NodeKey,
    /// The relationship type.
    pub rel_type: RelType,
}

impl Edge {
    pub fn new(from: NodeKey, to: NodeKey, rel_type: RelType) -> Self {
        Self { from, to, rel_type }
    }
}

// ---------------------------------------------------------------------------
// RelType: categories of relationships
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelType {
    /// Goods flow from an upstream producer to a downstream consumer.
    SuppliesTo,
    /// A consumer declares a dependency on a supplier (against the flow).
    DependsOn,
    /// A supplier or factory ships through a port.
    ShipsVia,
    /// Any entity is located in a country.
    LocatedIn,
}

impl RelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelType::SuppliesTo => "SUPPLIES_TO",
            RelType::DependsOn => "DEPENDS_ON",
            RelType::ShipsVia => "SHIPS_VIA",
            RelType::LocatedIn => "LOCATED_IN",
        }
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
