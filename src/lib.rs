//! An adaptive radix tree: an in-memory ordered associative index keyed by
//! byte strings of length 1-255, mapping each key to a caller-owned value.
//!
//! Internal nodes adapt their child-indexing representation to their current
//! fan-out (`Leaf`, `Single`, `Linear`, `Linear16`, `Span`, `Radix`), and
//! every edge may carry a compressed path shared by every key routed through
//! it. See [`tree::AdaptiveRadixTree`] for the public surface.

mod iter;
mod mapping;
mod node;
mod prefix;
pub mod tree;
mod utils;

pub use iter::Iter;
pub use tree::AdaptiveRadixTree;
