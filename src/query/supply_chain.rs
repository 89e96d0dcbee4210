use tracing::{debug, instrument};

use crate::error::SupplyMapResult;
use crate::model::edge::RelType;
use crate::model::node::{Node, NodeLabel};
use crate::model::path::Direction;
use crate::query::aggregate::Subgraph;
use crate::store::graph::GraphStore;

/// Context lookups made for every node of a chain: where it is, and which
/// port it ships through.
const CONTEXT_LOOKUPS: [(RelType, NodeLabel); 2] = [
    (RelType::LocatedIn, NodeLabel::Country),
    (RelType::ShipsVia, NodeLabel::Port),
];

/// Upstream supply chain of a company: every node that transitively supplies
/// it within `depth` tiers, plus the country and port of each chain member.
///
/// An unknown company yields an empty subgraph. `depth` is trusted; callers
/// keep it within `1..=4`.
#[instrument(skip(store))]
pub async fn resolve_supply_chain(
    store: &dyn GraphStore,
    company_id: &str,
    depth: usize,
) -> SupplyMapResult<Subgraph> {
    let Some(company) = store.lookup(NodeLabel::Company, company_id).await? else {
        debug!("company not found");
        return Ok(Subgraph::new());
    };

    let paths = store
        .expand(
            &company,
            &[RelType::SuppliesTo],
            Direction::Incoming,
            1,
            depth,
        )
        .await?;

    let mut chain = Subgraph::aggregate(&paths);
    chain.add_node(company);

    let members: Vec<Node> = chain.nodes().cloned().collect();
    for member in &members {
        for (rel_type, label) in CONTEXT_LOOKUPS {
            for hop in store.neighbors(member, rel_type, Direction::Outgoing).await? {
                if hop.node.label == label {
                    chain.add_hop(hop);
                }
            }
        }
    }

    debug!(
        paths = paths.len(),
        members = members.len(),
        nodes = chain.node_count(),
        edges = chain.edge_count(),
        "supply chain resolved"
    );
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::NodeKey;
    use crate::store::graph::InMemoryGraphStore;
    use crate::store::seed::standard_store;

    fn has(subgraph: &Subgraph, label: NodeLabel, id: &str) -> bool {
        subgraph.contains_node(&NodeKey::new(label, id))
    }

    #[tokio::test]
    async fn test_depth_one_is_direct_suppliers() {
        let store = standard_store().unwrap();
        let chain = resolve_supply_chain(&store, "techflow", 1).await.unwrap();

        assert!(has(&chain, NodeLabel::Company, "techflow"));
        assert!(has(&chain, NodeLabel::Supplier, "sup_t1_gamma"));
        assert!(has(&chain, NodeLabel::Supplier, "sup_t1_delta"));
        assert!(!has(&chain, NodeLabel::Supplier, "sup_t2_east"));
        // context: gamma is in China and ships via Shanghai
        assert!(has(&chain, NodeLabel::Country, "chn"));
        assert!(has(&chain, NodeLabel::Port, "port_shanghai"));
    }

    #[tokio::test]
    async fn test_only_supplies_to_and_context_edges() {
        let store = standard_store().unwrap();
        let chain = resolve_supply_chain(&store, "acme", 4).await.unwrap();
        assert!(chain.edge_count() > 0);
        for edge in chain.edges() {
            assert_ne!(edge.rel_type, RelType::DependsOn);
        }
    }

    #[tokio::test]
    async fn test_unknown_company_is_empty() {
        let store = standard_store().unwrap();
        let chain = resolve_supply_chain(&store, "nobody", 4).await.unwrap();
        assert!(chain.is_empty());

        // a supplier id is not a company
        let chain = resolve_supply_chain(&store, "sup_t1_gamma", 4).await.unwrap();
        assert!(chain.is_empty());
    }

    #[tokio::test]
    async fn test_company_without_suppliers_keeps_context() {
        let mut store = InMemoryGraphStore::new();
        store
            .add_node(Node::new(NodeLabel::Company, "solo", "Solo"))
            .unwrap();
        store
            .add_node(Node::new(NodeLabel::Country, "usa", "United States"))
            .unwrap();
        store
            .connect(
                &NodeKey::new(NodeLabel::Company, "solo"),
                &NodeKey::new(NodeLabel::Country, "usa"),
                RelType::LocatedIn,
            )
            .unwrap();

        let chain = resolve_supply_chain(&store, "solo", 4).await.unwrap();
        assert_eq!(chain.node_count(), 2);
        assert_eq!(chain.edge_count(), 1);
    }
}
