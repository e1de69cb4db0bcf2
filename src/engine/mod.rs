pub mod graph;
pub mod verify;

pub use graph::{sort, topological_sort, validate};
pub use verify::verify_order;
