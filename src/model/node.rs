use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Node: an entity in the supply chain graph
// ---------------------------------------------------------------------------

/// A node in the supply chain graph. Companies, suppliers, factories, ports
/// and countries are all nodes, distinguished by their label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// What kind of entity this is.
    pub label: NodeLabel,
    /// Business identifier, unique within the label. Nodes without one are
    /// never part of a traversal result.
    #[serde(default)]
    pub id: Option<String>,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Supply tier (1 = direct supplier). Only meaningful for suppliers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// External reference code: ISO country code or UN/LOCODE for ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Node {
    /// Create a node with the given label, id and name and no location.
    pub fn new(label: NodeLabel, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            label,
            id: Some(id.into()),
            name: name.into(),
            tier: None,
            lat: None,
            lon: None,
            code: None,
        }
    }

    /// Set the supply tier.
    pub fn with_tier(mut self, tier: u8) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Set the map position.
    pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// The identity of this node. Two nodes with equal keys are the same
    /// graph entity regardless of their other attributes.
    pub fn key(&self) -> NodeKey {
        NodeKey {
            label: self.label,
            id: self.id.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// NodeKey: (label, id) identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    pub label: NodeLabel,
    pub id: Option<String>,
}

impl NodeKey {
    pub fn new(label: NodeLabel, id: impl Into<String>) -> Self {
        Self {
            label,
            id: Some(id.into()),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}:{}", self.label, id),
            None => write!(f, "{}:<no id>", self.label),
        }
    }
}

// ---------------------------------------------------------------------------
// NodeLabel: categories of supply chain entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeLabel {
    Company,
    Supplier,
    Factory,
    Port,
    Country,
}

impl NodeLabel {
    pub const ALL: [NodeLabel; 5] = [
        NodeLabel::Company,
        NodeLabel::Supplier,
        NodeLabel::Factory,
        NodeLabel::Port,
        NodeLabel::Country,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLabel::Company => "Company",
            NodeLabel::Supplier => "Supplier",
            NodeLabel::Factory => "Factory",
            NodeLabel::Port => "Port",
            NodeLabel::Country => "Country",
        }
    }

    /// Whether goods leave this kind of node through a port.
    pub fn is_shipper(&self) -> bool {
        matches!(self, NodeLabel::Supplier | NodeLabel::Factory)
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown node label '{}'", s))
    }
}
