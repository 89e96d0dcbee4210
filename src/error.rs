use thiserror::Error;

use crate::model::node::NodeKey;

/// Central error type for SupplyMap operations.
#[derive(Error, Debug)]
pub enum SupplyMapError {
    #[error("Invalid scenario: '{0}' (expected supplier_failure or port_closure)")]
    InvalidScenario(String),

    #[error("Invalid depth: {0} (expected 1..=4)")]
    InvalidDepth(usize),

    #[error("Graph store error: {0}")]
    Store(String),

    #[error("Duplicate node: {0}")]
    DuplicateNode(NodeKey),

    #[error("Unknown node: {0}")]
    UnknownNode(NodeKey),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SupplyMapError {
    /// Errors caused by caller input rather than by the store or the host.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SupplyMapError::InvalidScenario(_) | SupplyMapError::InvalidDepth(_)
        )
    }
}

/// Convenience type alias for SupplyMap results.
pub type SupplyMapResult<T> = Result<T, SupplyMapError>;
