use crate::error::Result;
use crate::kdtree::{KDTreeBuilder, KDTreeIndex};
use crate::r#type::IndexableNum;

/// An owned, immutable KDTree.
///
/// Points are stored in kd-sorted order: the subtree of every node occupies a contiguous range
/// of slots, the node itself sits at the middle slot of that range, and its left and right
/// children own the slots before and after it. No slot is shared between subtrees.
///
/// Usually this will be created via [`KDTree::build`] or a [`KDTreeBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct KDTree<N: IndexableNum> {
    /// Coordinates in kd-sorted order, `dimension` per slot
    pub(crate) coords: Vec<N>,
    /// Insertion id of the point in each slot
    pub(crate) ids: Vec<u32>,
    pub(crate) dimension: usize,
}

impl<N: IndexableNum> KDTree<N> {
    /// Build a tree from a collection of points with `dimension` coordinates each.
    ///
    /// All points are validated before any partitioning happens; the first point with the
    /// wrong number of coordinates (or a non-finite coordinate) fails the whole build.
    /// Insertion ids follow the iteration order of `points`.
    pub fn build<P, I>(dimension: usize, points: I) -> Result<Self>
    where
        P: AsRef<[N]>,
        I: IntoIterator<Item = P>,
    {
        let points = points.into_iter();
        let mut builder = KDTreeBuilder::with_capacity(dimension, points.size_hint().0)?;
        for point in points {
            builder.add(point.as_ref())?;
        }
        Ok(builder.finish())
    }

    /// Iterate over `(id, point)` pairs in kd-sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[N])> + '_ {
        self.ids
            .iter()
            .copied()
            .zip(self.coords.chunks_exact(self.dimension))
    }
}

impl<N: IndexableNum> KDTreeIndex<N> for KDTree<N> {
    fn coords(&self) -> &[N] {
        &self.coords
    }

    fn ids(&self) -> &[u32] {
        &self.ids
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
