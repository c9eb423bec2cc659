//! Concrete syntax tree produced by [`crate::grammar::AzslParser`].
mod builder;
pub(crate) mod incremental;
mod node;
mod tree;

pub(crate) use builder::{Checkpoint, TreeBuilder};
pub use node::{Descendants, Node};
pub use tree::{InputEdit, NodeId, Point, ReuseStats, SyntaxTree};
