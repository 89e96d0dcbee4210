//! End-to-end traversal properties against the standard dataset.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use supplymap::error::{SupplyMapError, SupplyMapResult};
use supplymap::model::{Direction, Hop, Node, NodeLabel, Path, RelType};
use supplymap::query::{MapView, SupplyChainEngine};
use supplymap::store::{standard_store, GraphStore};

const COMPANIES: [&str; 3] = ["acme", "global_motors", "techflow"];
const PORTS: [&str; 5] = [
    "port_la",
    "port_shanghai",
    "port_hamburg",
    "port_rotterdam",
    "port_vungtau",
];

fn engine() -> SupplyChainEngine {
    SupplyChainEngine::new(Arc::new(standard_store().unwrap()))
}

fn node_ids(view: &MapView) -> HashSet<String> {
    view.nodes.iter().map(|n| n.id.clone()).collect()
}

fn assert_no_dangling_edges(view: &MapView) {
    let ids = node_ids(view);
    for edge in &view.edges {
        assert!(ids.contains(&edge.from_id), "dangling source in {:?}", edge);
        assert!(ids.contains(&edge.to_id), "dangling target in {:?}", edge);
    }
}

async fn supplier_ids(engine: &SupplyChainEngine) -> Vec<String> {
    engine
        .list_suppliers()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect()
}

// ---------------------------------------------------------------------------
// Concrete scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_techflow_two_tiers() {
    let view = engine().get_supply_chain("techflow", 2).await.unwrap();

    for id in [
        "techflow",
        "sup_t1_gamma",
        "sup_t1_delta",
        "sup_t2_east",
        "sup_t2_south",
    ] {
        assert!(view.has_node(id), "missing {id}");
    }
    for (id, country) in [
        ("techflow", "usa"),
        ("sup_t1_gamma", "chn"),
        ("sup_t1_delta", "usa"),
        ("sup_t2_east", "chn"),
        ("sup_t2_south", "vnm"),
    ] {
        assert!(view.has_node(country));
        assert!(view.has_edge(id, country, RelType::LocatedIn));
    }
    for (id, port) in [
        ("sup_t1_gamma", "port_shanghai"),
        ("sup_t2_east", "port_shanghai"),
        ("sup_t2_south", "port_vungtau"),
    ] {
        assert!(view.has_node(port));
        assert!(view.has_edge(id, port, RelType::ShipsVia));
    }
    assert!(view.has_edge("sup_t1_gamma", "techflow", RelType::SuppliesTo));

    // tier 3 is out of reach at depth 2
    assert!(!view.has_node("sup_t3_mining_a"));
    assert!(!view.has_node("sup_t3_chem"));
    // acme is downstream of gamma, not upstream of techflow
    assert!(!view.has_node("acme"));
}

#[tokio::test]
async fn test_raw_material_failure_reaches_companies() {
    let view = engine()
        .get_impact("supplier_failure", "sup_t4_raw_a")
        .await
        .unwrap();

    let expected: HashSet<String> = [
        "sup_t4_raw_a",
        "sup_t3_mining_a",
        "sup_t2_east",
        "sup_t1_gamma",
        "acme",
        "techflow",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(node_ids(&view), expected);
    assert_eq!(view.edges.len(), 5);
    assert!(view.edges.iter().all(|e| e.rel_type == RelType::SuppliesTo));
    assert!(view.has_edge("sup_t1_gamma", "acme", RelType::SuppliesTo));
}

#[tokio::test]
async fn test_shanghai_closure() {
    let view = engine()
        .get_impact("port_closure", "port_shanghai")
        .await
        .unwrap();

    for id in [
        "port_shanghai",
        "sup_t1_gamma",
        "sup_t2_east",
        "fac_shenzhen",
        "acme",
        "techflow",
        "sup_t2_south",
        "sup_t3_mining_a",
    ] {
        assert!(view.has_node(id), "missing {id}");
    }
    for origin in ["sup_t1_gamma", "sup_t2_east", "fac_shenzhen"] {
        assert!(view.has_edge(origin, "port_shanghai", RelType::ShipsVia));
    }
    assert!(view.has_edge("sup_t1_gamma", "techflow", RelType::SuppliesTo));
    assert!(view.has_edge("sup_t1_gamma", "sup_t2_east", RelType::DependsOn));

    for edge in &view.edges {
        match edge.rel_type {
            RelType::ShipsVia => assert_eq!(edge.to_id, "port_shanghai"),
            RelType::SuppliesTo | RelType::DependsOn => {}
            RelType::LocatedIn => panic!("unexpected context edge {:?}", edge),
        }
    }
    // ports other than the closed one are not part of the impact
    assert!(!view.has_node("port_la"));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let engine = engine();
    for company in COMPANIES {
        let a = engine.get_supply_chain(company, 3).await.unwrap();
        let b = engine.get_supply_chain(company, 3).await.unwrap();
        assert_eq!(a, b);
    }
    let a = engine.get_impact("port_closure", "port_la").await.unwrap();
    let b = engine.get_impact("port_closure", "port_la").await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_depth_monotonicity() {
    let engine = engine();
    for company in COMPANIES {
        for depth in 1..4 {
            let shallow = node_ids(&engine.get_supply_chain(company, depth).await.unwrap());
            let deep = node_ids(&engine.get_supply_chain(company, depth + 1).await.unwrap());
            assert!(
                shallow.is_subset(&deep),
                "{company}: depth {depth} not contained in depth {}",
                depth + 1
            );
        }
    }
}

#[tokio::test]
async fn test_self_inclusion_and_no_dangling_edges() {
    let engine = engine();

    for company in COMPANIES {
        for depth in 1..=4 {
            let view = engine.get_supply_chain(company, depth).await.unwrap();
            assert!(view.has_node(company));
            assert_no_dangling_edges(&view);
        }
    }

    for supplier in supplier_ids(&engine).await {
        let view = engine
            .get_impact("supplier_failure", &supplier)
            .await
            .unwrap();
        assert!(view.has_node(&supplier));
        assert_no_dangling_edges(&view);
    }

    for port in PORTS {
        let view = engine.get_impact("port_closure", port).await.unwrap();
        assert!(view.has_node(port));
        assert_no_dangling_edges(&view);
    }
}

#[tokio::test]
async fn test_unknown_targets_are_empty_not_errors() {
    let engine = engine();
    assert_eq!(
        engine.get_supply_chain("ghost_co", 4).await.unwrap(),
        MapView::default()
    );
    assert_eq!(
        engine.get_impact("supplier_failure", "ghost").await.unwrap(),
        MapView::default()
    );
    assert_eq!(
        engine.get_impact("port_closure", "ghost").await.unwrap(),
        MapView::default()
    );
}

#[tokio::test]
async fn test_concurrent_requests_share_one_store() {
    let engine = engine();
    let mut handles = Vec::new();
    for company in COMPANIES {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.get_supply_chain(company, 4).await
        }));
    }
    for handle in handles {
        let view = handle.await.unwrap().unwrap();
        assert!(!view.nodes.is_empty());
    }
}

// ---------------------------------------------------------------------------
// Stub stores
// ---------------------------------------------------------------------------

/// Counts every call and never finds anything.
#[derive(Default)]
struct CountingStore {
    calls: AtomicUsize,
}

#[async_trait]
impl GraphStore for CountingStore {
    async fn lookup(&self, _label: NodeLabel, _id: &str) -> SupplyMapResult<Option<Node>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }

    async fn expand(
        &self,
        _start: &Node,
        _rel_types: &[RelType],
        _direction: Direction,
        _min_hops: usize,
        _max_hops: usize,
    ) -> SupplyMapResult<Vec<Path>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn neighbors(
        &self,
        _node: &Node,
        _rel_type: RelType,
        _direction: Direction,
    ) -> SupplyMapResult<Vec<Hop>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn nodes_by_label(&self, _label: NodeLabel) -> SupplyMapResult<Vec<Node>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

/// Finds its start nodes but fails every expansion.
struct FailingStore;

#[async_trait]
impl GraphStore for FailingStore {
    async fn lookup(&self, label: NodeLabel, id: &str) -> SupplyMapResult<Option<Node>> {
        Ok(Some(Node::new(label, id, id)))
    }

    async fn expand(
        &self,
        _start: &Node,
        _rel_types: &[RelType],
        _direction: Direction,
        _min_hops: usize,
        _max_hops: usize,
    ) -> SupplyMapResult<Vec<Path>> {
        Err(SupplyMapError::Store("connection reset".to_string()))
    }

    async fn neighbors(
        &self,
        _node: &Node,
        _rel_type: RelType,
        _direction: Direction,
    ) -> SupplyMapResult<Vec<Hop>> {
        Err(SupplyMapError::Store("connection reset".to_string()))
    }

    async fn nodes_by_label(&self, _label: NodeLabel) -> SupplyMapResult<Vec<Node>> {
        Err(SupplyMapError::Store("connection reset".to_string()))
    }
}

#[tokio::test]
async fn test_unknown_scenario_never_touches_the_store() {
    let store = Arc::new(CountingStore::default());
    let engine = SupplyChainEngine::new(store.clone());

    for scenario in ["", "flood", "SUPPLIER_FAILURE", "port closure"] {
        let err = engine.get_impact(scenario, "port_la").await.unwrap_err();
        assert!(matches!(err, SupplyMapError::InvalidScenario(_)));
    }
    let err = engine.get_supply_chain("acme", 0).await.unwrap_err();
    assert!(matches!(err, SupplyMapError::InvalidDepth(0)));
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);

    engine.get_impact("port_closure", "port_la").await.unwrap();
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_store_failures_propagate() {
    let engine = SupplyChainEngine::new(Arc::new(FailingStore));

    let err = engine.get_supply_chain("acme", 2).await.unwrap_err();
    assert!(matches!(err, SupplyMapError::Store(_)));
    assert!(!err.is_client_error());

    for scenario in ["supplier_failure", "port_closure"] {
        let err = engine.get_impact(scenario, "x").await.unwrap_err();
        assert!(matches!(err, SupplyMapError::Store(_)));
    }
    assert!(engine.list_ports().await.is_err());
}
