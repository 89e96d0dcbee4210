use crate::model::edge::Edge;
use crate::model::node::Node;

/// Which way to follow relationships relative to their stored direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From an edge's source to its target.
    Outgoing,
    /// From an edge's target back to its source.
    Incoming,
}

/// One step of a path: the relationship crossed and the node reached.
/// `edge` keeps its stored orientation even when walked `Incoming`.
#[derive(Debug, Clone, PartialEq)]
pub struct Hop {
    pub edge: Edge,
    pub node: Node,
}

/// An ordered walk from a start node. A path with no hops is just its
/// start node.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub start: Node,
    pub hops: Vec<Hop>,
}

impl Path {
    pub fn new(start: Node) -> Self {
        Self {
            start,
            hops: Vec::new(),
        }
    }

    /// Number of relationships in the path.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// The last node reached (the start node for a zero-length path).
    pub fn end(&self) -> &Node {
        self.hops.last().map(|hop| &hop.node).unwrap_or(&self.start)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        std::iter::once(&self.start).chain(self.hops.iter().map(|hop| &hop.node))
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.hops.iter().map(|hop| &hop.edge)
    }
}
