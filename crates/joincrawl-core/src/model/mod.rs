//! Module: model
//! Responsibility: static shape of a hierarchical query (query text plus joined children).
//! Does not own: execution, parameter binding, or source semantics.
//! Boundary: trees are built once, then shared read-only across crawls.

mod node;
mod path;

#[cfg(test)]
mod tests;

pub use node::QueryNode;
pub use path::{NodePath, PathSegment};
