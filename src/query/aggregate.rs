use std::collections::{HashMap, HashSet};

use crate::model::edge::Edge;
use crate::model::node::{Node, NodeKey};
use crate::model::path::{Hop, Path};

/// Working node/edge set for one request, deduplicated by identity: nodes by
/// `(label, id)`, edges by `(from, to, type)`. The first copy of a node wins.
#[derive(Debug, Clone, Default)]
pub struct Subgraph {
    nodes: HashMap<NodeKey, Node>,
    edges: HashSet<Edge>,
}

impl Subgraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten every node and edge of `paths` into one deduplicated set.
    pub fn aggregate<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Self {
        let mut subgraph = Self::new();
        subgraph.absorb_paths(paths);
        subgraph
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.entry(node.key()).or_insert(node);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.insert(edge);
    }

    /// Add a hop's edge and the node it reaches.
    pub fn add_hop(&mut self, hop: Hop) {
        self.add_edge(hop.edge);
        self.add_node(hop.node);
    }

    pub fn absorb_path(&mut self, path: &Path) {
        for node in path.nodes() {
            self.add_node(node.clone());
        }
        for edge in path.edges() {
            self.add_edge(edge.clone());
        }
    }

    pub fn absorb_paths<'a>(&mut self, paths: impl IntoIterator<Item = &'a Path>) {
        for path in paths {
            self.absorb_path(path);
        }
    }

    pub fn contains_node(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::edge::RelType;
    use crate::model::node::NodeLabel;

    fn supplier(id: &str) -> Node {
        Node::new(NodeLabel::Supplier, id, id.to_uppercase())
    }

    fn chain(ids: &[&str]) -> Path {
        let mut path = Path::new(supplier(ids[0]));
        for pair in ids.windows(2) {
            let (near, far) = (supplier(pair[0]), supplier(pair[1]));
            path.hops.push(Hop {
                edge: Edge::new(far.key(), near.key(), RelType::SuppliesTo),
                node: far,
            });
        }
        path
    }

    #[test]
    fn test_shared_prefix_deduplicated() {
        let paths = vec![chain(&["a", "b"]), chain(&["a", "b", "c"])];
        let subgraph = Subgraph::aggregate(&paths);
        assert_eq!(subgraph.node_count(), 3);
        assert_eq!(subgraph.edge_count(), 2);
    }

    #[test]
    fn test_same_path_twice_is_idempotent() {
        let path = chain(&["a", "b", "c"]);
        let once = Subgraph::aggregate([&path]);
        let twice = Subgraph::aggregate([&path, &path]);
        assert_eq!(once.node_count(), twice.node_count());
        assert_eq!(once.edge_count(), twice.edge_count());
        for edge in once.edges() {
            assert!(twice.contains_edge(edge));
        }
    }

    #[test]
    fn test_identity_not_value_equality() {
        let mut subgraph = Subgraph::new();
        subgraph.add_node(supplier("a").with_tier(1));
        subgraph.add_node(Node::new(NodeLabel::Supplier, "a", "renamed"));
        assert_eq!(subgraph.node_count(), 1);
        assert_eq!(subgraph.nodes().next().unwrap().tier, Some(1));
    }

    #[test]
    fn test_empty_input() {
        let subgraph = Subgraph::aggregate(&Vec::<Path>::new());
        assert!(subgraph.is_empty());
    }

    #[test]
    fn test_zero_length_path_contributes_start() {
        let subgraph = Subgraph::aggregate([&Path::new(supplier("solo"))]);
        assert_eq!(subgraph.node_count(), 1);
        assert_eq!(subgraph.edge_count(), 0);
        assert!(subgraph.contains_node(&supplier("solo").key()));
    }
}
