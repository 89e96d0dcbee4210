use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::{SupplyMapError, SupplyMapResult};
use crate::model::node::NodeLabel;
use crate::store::graph::GraphStore;

pub mod aggregate;
pub mod impact;
pub mod materialize;
pub mod supply_chain;

pub use aggregate::Subgraph;
pub use impact::{resolve_impact, Scenario};
pub use materialize::{materialize, EdgeRecord, MapView, NodeRecord};
pub use supply_chain::resolve_supply_chain;

// ---------------------------------------------------------------------------
// Query Engine: the request contracts offered to transports
// ---------------------------------------------------------------------------

pub const MIN_DEPTH: usize = 1;
pub const MAX_DEPTH: usize = 4;
pub const DEFAULT_DEPTH: usize = MAX_DEPTH;

/// A selectable entity in a listing (company, supplier or port).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

/// Validates requests and runs them against a shared, read-only graph store.
/// Requests are independent; one engine serves any number concurrently.
#[derive(Clone)]
pub struct SupplyChainEngine {
    store: Arc<dyn GraphStore>,
}

impl SupplyChainEngine {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Upstream supply chain of a company, `depth` tiers deep.
    #[instrument(skip(self))]
    pub async fn get_supply_chain(&self, company_id: &str, depth: usize) -> SupplyMapResult<MapView> {
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
            return Err(SupplyMapError::InvalidDepth(depth));
        }
        let chain = resolve_supply_chain(self.store.as_ref(), company_id, depth).await?;
        let view = materialize(&chain);
        info!(nodes = view.nodes.len(), edges = view.edges.len(), "supply chain");
        Ok(view)
    }

    /// Impact of a disruption. The scenario name is checked before the store
    /// is touched.
    #[instrument(skip(self))]
    pub async fn get_impact(&self, scenario: &str, target_id: &str) -> SupplyMapResult<MapView> {
        let scenario: Scenario = scenario.parse()?;
        let impact = resolve_impact(self.store.as_ref(), scenario, target_id).await?;
        let view = materialize(&impact);
        info!(nodes = view.nodes.len(), edges = view.edges.len(), "impact");
        Ok(view)
    }

    /// All companies with their map position.
    pub async fn list_companies(&self) -> SupplyMapResult<Vec<EntitySummary>> {
        self.list(NodeLabel::Company, true).await
    }

    pub async fn list_suppliers(&self) -> SupplyMapResult<Vec<EntitySummary>> {
        self.list(NodeLabel::Supplier, false).await
    }

    pub async fn list_ports(&self) -> SupplyMapResult<Vec<EntitySummary>> {
        self.list(NodeLabel::Port, false).await
    }

    async fn list(&self, label: NodeLabel, with_location: bool) -> SupplyMapResult<Vec<EntitySummary>> {
        let mut entries: Vec<EntitySummary> = self
            .store
            .nodes_by_label(label)
            .await?
            .into_iter()
            .filter_map(|node| {
                Some(EntitySummary {
                    id: node.id?,
                    name: node.name,
                    lat: node.lat.filter(|_| with_location),
                    lon: node.lon.filter(|_| with_location),
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
