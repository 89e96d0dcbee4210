pub mod edge;
pub mod node;
pub mod path;

pub use edge::*;
pub use node::*;
pub use path::*;
