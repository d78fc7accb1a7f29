//! Immutable, balanced k-d trees for nearest and k-nearest neighbor queries.
//!
//! ```
//! use kd_index::kdtree::{KDTree, KDTreeIndex};
//!
//! let points = [[1., 3.], [1., 8.], [2., 2.], [2., 10.], [3., 6.], [4., 1.], [5., 4.]];
//! let tree = KDTree::<f64>::build(2, &points).unwrap();
//!
//! let nearest = tree.nearest(&[4., 8.]).unwrap().unwrap();
//! assert_eq!(nearest.point, &[3., 6.]);
//! assert_eq!(nearest.distance, 5.);
//! ```

mod error;
pub mod kdtree;
pub mod metric;
pub mod queue;
mod r#type;

pub use error::{KdIndexError, Result};
pub use r#type::IndexableNum;
