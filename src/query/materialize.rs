use serde::{Deserialize, Serialize};

use crate::model::edge::RelType;
use crate::model::node::NodeLabel;
use crate::query::aggregate::Subgraph;

/// A node as rendered on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

/// An edge as rendered on the map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from_id: String,
    pub to_id: String,
    #[serde(rename = "type")]
    pub rel_type: RelType,
}

/// Result of a traversal request: everything needed to draw the network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl MapView {
    pub fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn has_edge(&self, from_id: &str, to_id: &str, rel_type: RelType) -> bool {
        self.edges
            .iter()
            .any(|e| e.from_id == from_id && e.to_id == to_id && e.rel_type == rel_type)
    }
}

/// Convert a working set into output records. Nodes without an id, and edges
/// touching one, are dropped silently. Records are sorted so identical
/// subgraphs serialize identically.
pub fn materialize(subgraph: &Subgraph) -> MapView {
    let mut nodes: Vec<NodeRecord> = subgraph
        .nodes()
        .filter_map(|node| {
            Some(NodeRecord {
                id: node.id.clone()?,
                name: node.name.clone(),
                node_type: node.label,
                tier: node.tier,
                lat: node.lat,
                lon: node.lon,
            })
        })
        .collect();

    let mut edges: Vec<EdgeRecord> = subgraph
        .edges()
        .filter_map(|edge| {
            Some(EdgeRecord {
                from_id: edge.from.id.clone()?,
                to_id: edge.to.id.clone()?,
                rel_type: edge.rel_type,
            })
        })
        .collect();

    nodes.sort_by(|a, b| (a.node_type, &a.id).cmp(&(b.node_type, &b.id)));
    edges.sort_by(|a, b| {
        (&a.from_id, &a.to_id, a.rel_type).cmp(&(&b.from_id, &b.to_id, b.rel_type))
    });

    MapView { nodes, edges }
}
