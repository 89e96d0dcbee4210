use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};

use crate::error::{SupplyMapError, SupplyMapResult};
use crate::model::edge::{Edge, RelType};
use crate::model::node::{Node, NodeKey, NodeLabel};
use crate::model::path::{Direction, Hop, Path};

// ---------------------------------------------------------------------------
// GraphStore trait: the capabilities the traversal engine needs
// ---------------------------------------------------------------------------

/// Read-only access to a supply chain graph. Implementations must be safe to
/// share between concurrent requests.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Find a node by label and id.
    async fn lookup(&self, label: NodeLabel, id: &str) -> SupplyMapResult<Option<Node>>;

    /// Bounded multi-hop expansion from `start`, following only `rel_types`
    /// in the given direction. Returns paths of `min_hops..=max_hops`
    /// relationships; `min_hops == 0` includes the zero-length path.
    async fn expand(
        &self,
        start: &Node,
        rel_types: &[RelType],
        direction: Direction,
        min_hops: usize,
        max_hops: usize,
    ) -> SupplyMapResult<Vec<Path>>;

    /// Single-hop neighbors of `node` over one relationship type.
    async fn neighbors(
        &self,
        node: &Node,
        rel_type: RelType,
        direction: Direction,
    ) -> SupplyMapResult<Vec<Hop>>;

    /// All nodes carrying a label, in no particular order.
    async fn nodes_by_label(&self, label: NodeLabel) -> SupplyMapResult<Vec<Node>>;
}

// ---------------------------------------------------------------------------
// In-memory graph store
// ---------------------------------------------------------------------------

/// Position of a node inside an [`InMemoryGraphStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

#[derive(Debug, Clone)]
struct StoredEdge {
    from: usize,
    to: usize,
    rel_type: RelType,
}

/// Adjacency-list graph held in memory. Built once with [`add_node`] and
/// [`connect`], then shared immutably (typically behind an `Arc`), so reads
/// need no locking.
///
/// [`add_node`]: InMemoryGraphStore::add_node
/// [`connect`]: InMemoryGraphStore::connect
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    nodes: Vec<Node>,
    /// Only nodes that have an id are addressable.
    index: HashMap<NodeKey, usize>,
    edges: Vec<StoredEdge>,
    outbound: HashMap<usize, Vec<usize>>,
    inbound: HashMap<usize, Vec<usize>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. A second node with the same `(label, id)` is rejected.
    pub fn add_node(&mut self, node: Node) -> SupplyMapResult<NodeHandle> {
        let key = node.key();
        let position = self.nodes.len();

        if key.id.is_some() {
            if self.index.contains_key(&key) {
                return Err(SupplyMapError::DuplicateNode(key));
            }
            self.index.insert(key, position);
        }

        self.nodes.push(node);
        Ok(NodeHandle(position))
    }

    /// Add a relationship between two stored nodes. Adding the same
    /// `(from, to, type)` twice keeps a single edge.
    pub fn add_edge(
        &mut self,
        from: NodeHandle,
        to: NodeHandle,
        rel_type: RelType,
    ) -> SupplyMapResult<()> {
        if from.0 >= self.nodes.len() || to.0 >= self.nodes.len() {
            return Err(SupplyMapError::Internal(format!(
                "node handle out of range: {:?} -> {:?}",
                from, to
            )));
        }

        let exists = self.outbound.get(&from.0).is_some_and(|ids| {
            ids.iter().any(|&edge_idx| {
                let edge = &self.edges[edge_idx];
                edge.to == to.0 && edge.rel_type == rel_type
            })
        });
        if exists {
            return Ok(());
        }

        let edge_idx = self.edges.len();
        self.edges.push(StoredEdge {
            from: from.0,
            to: to.0,
            rel_type,
        });
        self.outbound.entry(from.0).or_default().push(edge_idx);
        self.inbound.entry(to.0).or_default().push(edge_idx);
        Ok(())
    }

    /// Add a relationship between two nodes identified by key.
    pub fn connect(&mut self, from: &NodeKey, to: &NodeKey, rel_type: RelType) -> SupplyMapResult<()> {
        let from = self
            .handle(from)
            .ok_or_else(|| SupplyMapError::UnknownNode(from.clone()))?;
        let to = self
            .handle(to)
            .ok_or_else(|| SupplyMapError::UnknownNode(to.clone()))?;
        self.add_edge(from, to, rel_type)
    }

    pub fn handle(&self, key: &NodeKey) -> Option<NodeHandle> {
        self.index.get(key).copied().map(NodeHandle)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn position(&self, node: &Node) -> Option<usize> {
        if node.id.is_none() {
            return None;
        }
        self.index.get(&node.key()).copied()
    }

    fn edge_view(&self, edge_idx: usize) -> Edge {
        let edge = &self.edges[edge_idx];
        Edge::new(
            self.nodes[edge.from].key(),
            self.nodes[edge.to].key(),
            edge.rel_type,
        )
    }

    fn hop(&self, edge_idx: usize, node_idx: usize) -> Hop {
        Hop {
            edge: self.edge_view(edge_idx),
            node: self.nodes[node_idx].clone(),
        }
    }

    /// Edges leaving `current` in `direction` whose type is in `rel_types`,
    /// as `(edge index, node on the far side)`.
    fn adjacent<'a>(
        &'a self,
        current: usize,
        rel_types: &'a [RelType],
        direction: Direction,
    ) -> impl Iterator<Item = (usize, usize)> + 'a {
        let edge_ids = match direction {
            Direction::Outgoing => self.outbound.get(&current),
            Direction::Incoming => self.inbound.get(&current),
        };

        edge_ids
            .into_iter()
            .flatten()
            .filter_map(move |&edge_idx| {
                let edge = &self.edges[edge_idx];
                if !rel_types.contains(&edge.rel_type) {
                    return None;
                }
                let next = match direction {
                    Direction::Outgoing => edge.to,
                    Direction::Incoming => edge.from,
                };
                Some((edge_idx, next))
            })
    }

    /// Hops along the BFS tree from the start node down to `target`.
    fn route(&self, target: usize, parents: &HashMap<usize, (usize, usize)>) -> Vec<Hop> {
        let mut hops = Vec::new();
        let mut current = target;
        while let Some(&(previous, edge_idx)) = parents.get(&current) {
            hops.push(self.hop(edge_idx, current));
            current = previous;
        }
        hops.reverse();
        hops
    }

    /// Breadth-first expansion with a hop counter and a visited set keyed by
    /// node. Every edge within `max_hops` yields one path: the tree route to
    /// its near endpoint plus the edge itself. The union of these paths
    /// covers every node and edge on any relationship-unique path within the
    /// bound, while each edge is examined once.
    fn expand_from(
        &self,
        start: usize,
        rel_types: &[RelType],
        direction: Direction,
        min_hops: usize,
        max_hops: usize,
    ) -> Vec<Path> {
        let start_node = &self.nodes[start];
        let mut paths = Vec::new();
        if min_hops == 0 {
            paths.push(Path::new(start_node.clone()));
        }

        let mut visited: HashMap<usize, usize> = HashMap::new();
        let mut parents: HashMap<usize, (usize, usize)> = HashMap::new();
        let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

        visited.insert(start, 0);
        queue.push_back((start, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_hops {
                continue;
            }

            for (edge_idx, next) in self.adjacent(current, rel_types, direction) {
                let mut hops = self.route(current, &parents);
                hops.push(self.hop(edge_idx, next));
                if hops.len() >= min_hops {
                    paths.push(Path {
                        start: start_node.clone(),
                        hops,
                    });
                }

                if !visited.contains_key(&next) {
                    visited.insert(next, depth + 1);
                    parents.insert(next, (current, edge_idx));
                    queue.push_back((next, depth + 1));
                }
            }
        }

        paths
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn lookup(&self, label: NodeLabel, id: &str) -> SupplyMapResult<Option<Node>> {
        let key = NodeKey::new(label, id);
        Ok(self.index.get(&key).map(|&idx| self.nodes[idx].clone()))
    }

    async fn expand(
        &self,
        start: &Node,
        rel_types: &[RelType],
        direction: Direction,
        min_hops: usize,
        max_hops: usize,
    ) -> SupplyMapResult<Vec<Path>> {
        let Some(start) = self.position(start) else {
            return Ok(Vec::new());
        };
        Ok(self.expand_from(start, rel_types, direction, min_hops, max_hops))
    }

    async fn neighbors(
        &self,
        node: &Node,
        rel_type: RelType,
        direction: Direction,
    ) -> SupplyMapResult<Vec<Hop>> {
        let Some(position) = self.position(node) else {
            return Ok(Vec::new());
        };
        Ok(self
            .adjacent(position, &[rel_type], direction)
            .map(|(edge_idx, next)| self.hop(edge_idx, next))
            .collect())
    }

    async fn nodes_by_label(&self, label: NodeLabel) -> SupplyMapResult<Vec<Node>> {
        Ok(self
            .nodes
            .iter()
            .filter(|node| node.label == label)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
