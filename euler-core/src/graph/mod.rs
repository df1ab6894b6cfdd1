pub mod cycles;
pub mod dual_graph;

pub use cycles::GraphCycle;
pub use dual_graph::{DualEdge, DualGraph, EdgeId, NodeId};
