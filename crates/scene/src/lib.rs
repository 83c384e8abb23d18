pub mod anchor;
pub mod graph;
pub mod model;
pub mod placement;

pub use anchor::*;
pub use graph::*;
pub use model::*;
