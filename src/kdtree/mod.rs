//! An implementation of an immutable, balanced K-D Tree over points of any fixed dimension.

#![warn(missing_docs)]

mod builder;
mod index;
#[cfg(feature = "rayon")]
mod parallel;
mod search;
mod r#trait;
mod traversal;

pub use builder::KDTreeBuilder;
pub use index::KDTree;
pub use r#trait::KDTreeIndex;
pub use search::{KCount, Neighbor};
pub use traversal::{Node, Preorder};
