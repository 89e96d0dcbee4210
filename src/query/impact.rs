use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::error::{SupplyMapError, SupplyMapResult};
use crate::model::edge::RelType;
use crate::model::node::{Node, NodeLabel};
use crate::model::path::Direction;
use crate::query::aggregate::Subgraph;
use crate::store::graph::GraphStore;

/// How far a disruption propagates downstream.
pub const IMPACT_MAX_HOPS: usize = 4;

/// Hop bound when searching for the suppliers and factories that ship
/// through a port. Shipping is modelled as a direct relationship, so only
/// one-hop matches exist in practice.
pub const SHIPPING_ORIGIN_MAX_HOPS: usize = 2;

// ---------------------------------------------------------------------------
// Scenario: the closed set of disruption rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// A supplier stops delivering.
    SupplierFailure,
    /// A port stops handling shipments.
    PortClosure,
}

impl Scenario {
    pub const ALL: [Scenario; 2] = [Scenario::SupplierFailure, Scenario::PortClosure];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::SupplierFailure => "supplier_failure",
            Scenario::PortClosure => "port_closure",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = SupplyMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.as_str() == s)
            .ok_or_else(|| SupplyMapError::InvalidScenario(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Impact resolution
// ---------------------------------------------------------------------------

/// Everything affected by a disruption of `target_id` under `scenario`.
/// The target itself is always included when it exists; an unknown target
/// yields an empty subgraph.
#[instrument(skip(store))]
pub async fn resolve_impact(
    store: &dyn GraphStore,
    scenario: Scenario,
    target_id: &str,
) -> SupplyMapResult<Subgraph> {
    let impact = match scenario {
        Scenario::SupplierFailure => supplier_failure(store, target_id).await?,
        Scenario::PortClosure => port_closure(store, target_id).await?,
    };
    debug!(
        nodes = impact.node_count(),
        edges = impact.edge_count(),
        "impact resolved"
    );
    Ok(impact)
}

/// Everything the failing supplier feeds, transitively, over SUPPLIES_TO.
async fn supplier_failure(store: &dyn GraphStore, target_id: &str) -> SupplyMapResult<Subgraph> {
    let Some(supplier) = store.lookup(NodeLabel::Supplier, target_id).await? else {
        debug!("supplier not found");
        return Ok(Subgraph::new());
    };

    let paths = store
        .expand(
            &supplier,
            &[RelType::SuppliesTo],
            Direction::Outgoing,
            1,
            IMPACT_MAX_HOPS,
        )
        .await?;

    let mut impact = Subgraph::aggregate(&paths);
    impact.add_node(supplier);
    Ok(impact)
}

/// The suppliers and factories shipping through the port, the SHIPS_VIA
/// edges that connect them to it, and everything reachable from them over
/// SUPPLIES_TO or DEPENDS_ON.
async fn port_closure(store: &dyn GraphStore, target_id: &str) -> SupplyMapResult<Subgraph> {
    let Some(port) = store.lookup(NodeLabel::Port, target_id).await? else {
        debug!("port not found");
        return Ok(Subgraph::new());
    };

    let shipping = store
        .expand(
            &port,
            &[RelType::ShipsVia],
            Direction::Incoming,
            1,
            SHIPPING_ORIGIN_MAX_HOPS,
        )
        .await?;

    let mut impact = Subgraph::new();
    impact.add_node(port);

    let mut seen = HashSet::new();
    let mut origins: Vec<Node> = Vec::new();
    for path in &shipping {
        let origin = path.end();
        if !origin.label.is_shipper() {
            continue;
        }
        if let [direct] = path.hops.as_slice() {
            impact.add_edge(direct.edge.clone());
        }
        if seen.insert(origin.key()) {
            origins.push(origin.clone());
        }
    }
    debug!(origins = origins.len(), "shipping origins found");

    for origin in origins {
        let downstream = store
            .expand(
                &origin,
                &[RelType::SuppliesTo, RelType::DependsOn],
                Direction::Outgoing,
                0,
                IMPACT_MAX_HOPS,
            )
            .await?;
        impact.add_node(origin);
        impact.absorb_paths(&downstream);
    }

    Ok(impact)
}
