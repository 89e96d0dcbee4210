pub mod graph;
pub mod seed;

pub use graph::{GraphStore, InMemoryGraphStore, NodeHandle};
pub use seed::{load_snapshot, standard_snapshot, standard_store, EdgeSpec, GraphSnapshot};
