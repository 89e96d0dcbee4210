pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod server;
pub mod store;

pub use config::{AppConfig, GraphConfig, LoggingConfig, ServerConfig};
pub use error::{SupplyMapError, SupplyMapResult};
pub use model::*;
pub use query::{MapView, Scenario, SupplyChainEngine};
