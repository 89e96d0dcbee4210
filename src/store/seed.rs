//! Graph snapshots: the JSON format a store is loaded from, and the
//! standard mock dataset used by the binary when no snapshot is configured.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

use crate::error::SupplyMapResult;
use crate::model::edge::RelType;
use crate::model::node::{Node, NodeKey, NodeLabel};
use crate::store::graph::InMemoryGraphStore;

/// A relationship in a snapshot, naming its endpoints by `(label, id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: NodeKey,
    pub to: NodeKey,
    #[serde(rename = "type")]
    pub rel_type: RelType,
}

/// Complete contents of a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

impl GraphSnapshot {
    fn node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn link(&mut self, from: (NodeLabel, &str), to: (NodeLabel, &str), rel_type: RelType) {
        self.edges.push(EdgeSpec {
            from: NodeKey::new(from.0, from.1),
            to: NodeKey::new(to.0, to.1),
            rel_type,
        });
    }
}

/// Read a snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> SupplyMapResult<GraphSnapshot> {
    let raw = std::fs::read_to_string(path)?;
    let snapshot = serde_json::from_str(&raw)?;
    Ok(snapshot)
}

impl InMemoryGraphStore {
    /// Build a store from a snapshot. Fails on duplicate nodes or on edges
    /// naming nodes the snapshot does not contain.
    #[instrument(skip_all, fields(nodes = snapshot.nodes.len(), edges = snapshot.edges.len()))]
    pub fn from_snapshot(snapshot: GraphSnapshot) -> SupplyMapResult<Self> {
        let mut store = InMemoryGraphStore::new();
        for node in snapshot.nodes {
            store.add_node(node)?;
        }
        for edge in &snapshot.edges {
            store.connect(&edge.from, &edge.to, edge.rel_type)?;
        }
        info!(
            nodes = store.node_count(),
            edges = store.edge_count(),
            "graph store loaded"
        );
        Ok(store)
    }
}

// ---------------------------------------------------------------------------
// Standard dataset
// ---------------------------------------------------------------------------

use NodeLabel::{Company, Country, Factory, Port, Supplier};

/// The standard mock supply network: three companies fed by four tiers of
/// suppliers, three factories, five ports and seven countries.
pub fn standard_snapshot() -> GraphSnapshot {
    let mut s = GraphSnapshot::default();

    let countries = [
        ("usa", "United States", "US", 39.8, -98.6),
        ("chn", "China", "CN", 35.9, 104.2),
        ("deu", "Germany", "DE", 51.2, 10.5),
        ("jpn", "Japan", "JP", 36.2, 138.3),
        ("mex", "Mexico", "MX", 23.6, -102.6),
        ("vnm", "Vietnam", "VN", 14.1, 108.3),
        ("nld", "Netherlands", "NL", 52.1, 5.3),
    ];
    for (id, name, code, lat, lon) in countries {
        s.node(
            Node::new(Country, id, name)
                .with_code(code)
                .with_location(lat, lon),
        );
    }

    let ports = [
        ("port_la", "USLAX", "Port of Los Angeles", 33.75, -118.27, "usa"),
        ("port_shanghai", "CNSHA", "Port of Shanghai", 31.23, 121.47, "chn"),
        ("port_hamburg", "DEHAM", "Port of Hamburg", 53.54, 9.93, "deu"),
        ("port_rotterdam", "NLRTM", "Port of Rotterdam", 51.92, 4.48, "nld"),
        ("port_vungtau", "VNVUT", "Vung Tau Port", 10.35, 107.08, "vnm"),
    ];
    for (id, code, name, lat, lon, country) in ports {
        s.node(
            Node::new(Port, id, name)
                .with_code(code)
                .with_location(lat, lon),
        );
        s.link((Port, id), (Country, country), RelType::LocatedIn);
    }

    let companies = [
        ("acme", "Acme Corp", 37.39, -122.08, "usa"),
        ("global_motors", "Global Motors", 48.14, 11.58, "deu"),
        ("techflow", "TechFlow Inc", 40.71, -74.01, "usa"),
    ];
    for (id, name, lat, lon, country) in companies {
        s.node(Node::new(Company, id, name).with_location(lat, lon));
        s.link((Company, id), (Country, country), RelType::LocatedIn);
    }

    let suppliers = [
        ("sup_t1_alpha", "Alpha Components Inc", 1, 33.64, -117.74, "usa"),
        ("sup_t1_beta", "Beta Logistics GmbH", 1, 50.11, 8.68, "deu"),
        ("sup_t1_gamma", "Gamma Materials Co", 1, 22.28, 114.16, "chn"),
        ("sup_t1_delta", "Delta Systems LLC", 1, 29.76, -95.37, "usa"),
        ("sup_t2_east", "Eastern Foundry Ltd", 2, 31.23, 121.47, "chn"),
        ("sup_t2_west", "Western Alloys", 2, 33.75, -118.27, "usa"),
        ("sup_t2_north", "Northern Circuits", 2, 35.68, 139.69, "jpn"),
        ("sup_t2_south", "Southern Petrochem", 2, 10.82, 106.73, "vnm"),
        ("sup_t3_mining_a", "Rare Earth Mining Co", 3, 30.59, 114.31, "chn"),
        ("sup_t3_mining_b", "Pacific Ore Corp", 3, -33.87, 151.21, "usa"),
        ("sup_t3_chem", "ChemBase Industries", 3, 51.92, 4.48, "nld"),
        ("sup_t4_raw_a", "Raw Materials Global", 4, -23.55, -46.63, "usa"),
        ("sup_t4_raw_b", "Elemental Sources", 4, -26.20, 28.04, "usa"),
    ];
    for (id, name, tier, lat, lon, country) in suppliers {
        s.node(
            Node::new(Supplier, id, name)
                .with_tier(tier)
                .with_location(lat, lon),
        );
        s.link((Supplier, id), (Country, country), RelType::LocatedIn);
    }

    let factories = [
        ("fac_shenzhen", "Shenzhen Assembly Plant", 22.54, 114.06, "chn"),
        ("fac_detroit", "Detroit Manufacturing", 42.33, -83.05, "usa"),
        ("fac_vietnam", "Vietnam Electronics Hub", 10.82, 106.73, "vnm"),
    ];
    for (id, name, lat, lon, country) in factories {
        s.node(Node::new(Factory, id, name).with_location(lat, lon));
        s.link((Factory, id), (Country, country), RelType::LocatedIn);
    }

    let supplies_to = [
        ("sup_t1_alpha", (Company, "acme")),
        ("sup_t1_beta", (Company, "global_motors")),
        ("sup_t1_gamma", (Company, "acme")),
        ("sup_t1_gamma", (Company, "techflow")),
        ("sup_t1_delta", (Company, "techflow")),
        ("sup_t2_east", (Supplier, "sup_t1_gamma")),
        ("sup_t2_west", (Supplier, "sup_t1_alpha")),
        ("sup_t2_north", (Supplier, "sup_t1_beta")),
        ("sup_t2_south", (Supplier, "sup_t1_gamma")),
        ("sup_t3_mining_a", (Supplier, "sup_t2_east")),
        ("sup_t3_mining_b", (Supplier, "sup_t2_west")),
        ("sup_t3_chem", (Supplier, "sup_t2_north")),
        ("sup_t3_chem", (Supplier, "sup_t2_south")),
        ("sup_t4_raw_a", (Supplier, "sup_t3_mining_a")),
        ("sup_t4_raw_b", (Supplier, "sup_t3_mining_b")),
    ];
    for (from, to) in supplies_to {
        s.link((Supplier, from), to, RelType::SuppliesTo);
    }

    let depends_on = [
        ((Company, "acme"), "sup_t1_alpha"),
        ((Company, "acme"), "sup_t1_gamma"),
        ((Company, "global_motors"), "sup_t1_beta"),
        ((Company, "techflow"), "sup_t1_gamma"),
        ((Company, "techflow"), "sup_t1_delta"),
        ((Supplier, "sup_t1_gamma"), "sup_t2_east"),
        ((Supplier, "sup_t1_gamma"), "sup_t2_south"),
        ((Supplier, "sup_t1_alpha"), "sup_t2_west"),
        ((Supplier, "sup_t1_beta"), "sup_t2_north"),
        ((Supplier, "sup_t2_east"), "sup_t3_mining_a"),
        ((Supplier, "sup_t2_west"), "sup_t3_mining_b"),
        ((Supplier, "sup_t2_north"), "sup_t3_chem"),
        ((Supplier, "sup_t2_south"), "sup_t3_chem"),
        ((Supplier, "sup_t3_mining_a"), "sup_t4_raw_a"),
        ((Supplier, "sup_t3_mining_b"), "sup_t4_raw_b"),
    ];
    for (from, to) in depends_on {
        s.link(from, (Supplier, to), RelType::DependsOn);
    }

    let ships_via = [
        ((Supplier, "sup_t1_gamma"), "port_shanghai"),
        ((Supplier, "sup_t2_east"), "port_shanghai"),
        ((Supplier, "sup_t2_south"), "port_vungtau"),
        ((Supplier, "sup_t1_alpha"), "port_la"),
        ((Supplier, "sup_t2_west"), "port_la"),
        ((Supplier, "sup_t1_beta"), "port_hamburg"),
        ((Supplier, "sup_t2_north"), "port_hamburg"),
        ((Supplier, "sup_t3_chem"), "port_rotterdam"),
        ((Factory, "fac_shenzhen"), "port_shanghai"),
        ((Factory, "fac_detroit"), "port_la"),
        ((Factory, "fac_vietnam"), "port_vungtau"),
    ];
    for (from, port) in ships_via {
        s.link(from, (Port, port), RelType::ShipsVia);
    }

    s
}

/// A store holding the standard dataset.
pub fn standard_store() -> SupplyMapResult<InMemoryGraphStore> {
    InMemoryGraphStore::from_snapshot(standard_snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::NodeLabel::{Company, Country, Port, Supplier};
    use crate::store::graph::GraphStore;
    use std::io::Write;

    #[test]
    fn test_standard_snapshot_loads() {
        let store = standard_store().unwrap();
        assert_eq!(store.node_count(), 31);
        // 24 LOCATED_IN + 15 SUPPLIES_TO + 15 DEPENDS_ON + 11 SHIPS_VIA
        assert_eq!(store.edge_count(), 65);
    }

    #[tokio::test]
    async fn test_snapshot_file_round_trip() {
        let snapshot = standard_snapshot();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&snapshot).unwrap().as_bytes())
            .unwrap();

        let loaded = load_snapshot(file.path()).unwrap();
        assert_eq!(loaded, snapshot);

        let store = InMemoryGraphStore::from_snapshot(loaded).unwrap();
        let gamma = store
            .lookup(Supplier, "sup_t1_gamma")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(gamma.tier, Some(1));
    }

    #[tokio::test]
    async fn test_reference_codes_kept() {
        let store = standard_store().unwrap();
        let rotterdam = store.lookup(Port, "port_rotterdam").await.unwrap().unwrap();
        assert_eq!(rotterdam.code.as_deref(), Some("NLRTM"));
        let vietnam = store.lookup(Country, "vnm").await.unwrap().unwrap();
        assert_eq!(vietnam.code.as_deref(), Some("VN"));
        let acme = store.lookup(Company, "acme").await.unwrap().unwrap();
        assert_eq!(acme.code, None);
    }

    #[test]
    fn test_snapshot_json_format() {
        let raw = r#"{
            "nodes": [
                {"label": "Supplier", "id": "s1", "name": "S1", "tier": 2},
                {"label": "Company", "id": "c1", "name": "C1", "lat": 1.5, "lon": 2.5}
            ],
            "edges": [
                {"from": {"label": "Supplier", "id": "s1"},
                 "to": {"label": "Company", "id": "c1"},
                 "type": "SUPPLIES_TO"}
            ]
        }"#;
        let snapshot: GraphSnapshot = serde_json::from_str(raw).unwrap();
        let store = InMemoryGraphStore::from_snapshot(snapshot).unwrap();
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn test_snapshot_with_dangling_edge_fails() {
        let mut snapshot = GraphSnapshot::default();
        snapshot.node(Node::new(Company, "c1", "C1"));
        snapshot.link((Supplier, "missing"), (Company, "c1"), RelType::SuppliesTo);
        assert!(InMemoryGraphStore::from_snapshot(snapshot).is_err());
    }
}
