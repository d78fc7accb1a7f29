use tinyvec::TinyVec;

use crate::error::{KdIndexError, Result};
use crate::kdtree::search::{self, Neighbor};
use crate::kdtree::{Node, Preorder};
use crate::metric::{DistanceMetric, SquaredEuclidean};
use crate::r#type::IndexableNum;

/// A trait for searching and accessing data out of a KDTree.
pub trait KDTreeIndex<N: IndexableNum>: Sized {
    /// The underlying coordinate buffer of this tree, in kd-sorted order
    fn coords(&self) -> &[N];

    /// The insertion id of the point in each slot of [`coords`][KDTreeIndex::coords]
    fn ids(&self) -> &[u32];

    /// The number of coordinates of every point in this tree
    fn dimension(&self) -> usize;

    /// The number of items in this KDTree
    fn num_items(&self) -> usize {
        self.ids().len()
    }

    /// Returns `true` if the tree holds no points.
    fn is_empty(&self) -> bool {
        self.num_items() == 0
    }

    /// The number of levels in the tree. Zero for an empty tree.
    fn height(&self) -> usize {
        (usize::BITS - self.num_items().leading_zeros()) as usize
    }

    /// Find the stored point closest to `query` by squared Euclidean distance.
    ///
    /// Returns `Ok(None)` if the tree is empty. Fails if `query` has the wrong dimension or a
    /// non-finite coordinate.
    fn nearest(&self, query: &[N]) -> Result<Option<Neighbor<'_, N>>> {
        self.nearest_with_metric(query, &SquaredEuclidean)
    }

    /// Find the stored point closest to `query` under `metric`.
    ///
    /// When several points are equally close, the first one visited is returned.
    fn nearest_with_metric<M: DistanceMetric<N>>(
        &self,
        query: &[N],
        metric: &M,
    ) -> Result<Option<Neighbor<'_, N>>> {
        check_query(self, query)?;
        Ok(search::nearest(self, query, metric))
    }

    /// Find the `k` stored points closest to `query` by squared Euclidean distance, ascending by
    /// distance.
    ///
    /// Returns `min(k, num_items)` neighbors.
    ///
    /// ```
    /// use kd_index::kdtree::{KDTree, KDTreeIndex};
    ///
    /// let tree = KDTree::<f64>::build(2, [[0., 0.], [3., 0.], [1., 1.], [5., 5.]]).unwrap();
    /// let ids: Vec<u32> = tree
    ///     .k_nearest(&[0., 0.], 3)
    ///     .unwrap()
    ///     .iter()
    ///     .map(|n| n.id)
    ///     .collect();
    /// assert_eq!(ids, vec![0, 2, 1]);
    /// ```
    fn k_nearest(&self, query: &[N], k: usize) -> Result<Vec<Neighbor<'_, N>>> {
        self.k_nearest_with_metric(query, k, &SquaredEuclidean)
    }

    /// Find the `k` stored points closest to `query` under `metric`, ascending by distance.
    ///
    /// Among equally distant points the one visited first is ranked first.
    fn k_nearest_with_metric<M: DistanceMetric<N>>(
        &self,
        query: &[N],
        k: usize,
        metric: &M,
    ) -> Result<Vec<Neighbor<'_, N>>> {
        check_query(self, query)?;
        Ok(search::k_nearest(self, query, k, metric))
    }

    /// Every stored point, ascending by squared Euclidean distance to `query`.
    fn ranked(&self, query: &[N]) -> Result<Vec<Neighbor<'_, N>>> {
        self.k_nearest(query, self.num_items())
    }

    /// Search the index for items within `max_distance` of `query` by squared Euclidean
    /// distance. Note that `max_distance` is therefore the *square* of the radius.
    ///
    /// Returns the matching neighbors in traversal order.
    fn within(&self, query: &[N], max_distance: N) -> Result<Vec<Neighbor<'_, N>>> {
        self.within_with_metric(query, max_distance, &SquaredEuclidean)
    }

    /// Search the index for items within `max_distance` of `query` under `metric`.
    fn within_with_metric<M: DistanceMetric<N>>(
        &self,
        query: &[N],
        max_distance: N,
        metric: &M,
    ) -> Result<Vec<Neighbor<'_, N>>> {
        check_query(self, query)?;
        Ok(search::within(self, query, max_distance, metric))
    }

    /// Search the index for items within an axis-aligned box.
    ///
    /// - min: lower corner of the box (inclusive)
    /// - max: upper corner of the box (inclusive)
    ///
    /// Returns ids of found items
    fn range(&self, min: &[N], max: &[N]) -> Result<Vec<u32>> {
        // infinite bounds are allowed here and leave the box open on that side
        check_dimension(self, min)?;
        check_dimension(self, max)?;

        let dimension = self.dimension();
        let ids = self.ids();

        // Use TinyVec to avoid heap allocations
        let mut stack: TinyVec<[(usize, usize, usize); 33]> = TinyVec::new();
        if !self.is_empty() {
            stack.push((0, self.num_items(), 0));
        }

        let mut result: Vec<u32> = vec![];

        while let Some((start, end, depth)) = stack.pop() {
            let m = start + (end - start) / 2;
            let point = slot_point(self, m);

            // include the middle item if it's in range
            let inside = point
                .iter()
                .zip(min.iter().zip(max))
                .all(|(c, (lo, hi))| lo <= c && c <= hi);
            if inside {
                result.push(ids[m]);
            }

            // queue search in halves that intersect the query
            let axis = depth % dimension;
            if min[axis] <= point[axis] && start < m {
                stack.push((start, m, depth + 1));
            }
            if max[axis] >= point[axis] && m + 1 < end {
                stack.push((m + 1, end, depth + 1));
            }
        }

        Ok(result)
    }

    /// Access the root node of the KDTree for manual traversal. `None` if the tree is empty.
    fn root(&self) -> Option<Node<'_, N, Self>> {
        Node::from_root(self)
    }

    /// Walk every node of the tree: each node first, then its left subtree, then its right
    /// subtree.
    fn preorder(&self) -> Preorder<'_, N, Self> {
        Preorder::new(self)
    }
}

/// The point stored in kd-sorted slot `slot`.
#[inline]
pub(crate) fn slot_point<N: IndexableNum, T: KDTreeIndex<N>>(tree: &T, slot: usize) -> &[N] {
    let dimension = tree.dimension();
    &tree.coords()[slot * dimension..(slot + 1) * dimension]
}

/// Fail with [`KdIndexError::DimensionMismatch`] unless `point` has the tree's dimension.
pub(crate) fn check_dimension<N: IndexableNum, T: KDTreeIndex<N>>(
    tree: &T,
    point: &[N],
) -> Result<()> {
    if point.len() != tree.dimension() {
        return Err(KdIndexError::DimensionMismatch {
            expected: tree.dimension(),
            found: point.len(),
        });
    }
    Ok(())
}

/// Validate a proximity query: the tree's dimension and only finite coordinates.
///
/// A non-finite query would make every distance infinite or NaN, so no neighbor could be ranked.
pub(crate) fn check_query<N: IndexableNum, T: KDTreeIndex<N>>(
    tree: &T,
    query: &[N],
) -> Result<()> {
    check_dimension(tree, query)?;
    if let Some(axis) = query.iter().position(|c| !c.is_finite()) {
        return Err(KdIndexError::NonFiniteQuery { axis });
    }
    Ok(())
}
