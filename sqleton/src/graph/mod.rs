//! Graph module for sqleton
//!
//! This module turns a schema snapshot into a Graphviz DOT document.

pub mod digraph;
pub mod label;
pub mod markup;

// Re-export key functions
pub use digraph::write_digraph;
pub use label::label;
pub use markup::{quote, Markup};
