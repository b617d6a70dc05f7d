//! Lowering an [`Expression`](crate::Expression) tree into a labeled graph.

mod build;
mod model;

pub use build::{build, build_with};
pub use model::{Edge, Graph, Node, NodeId, NodeKind, Role, Statistics};
