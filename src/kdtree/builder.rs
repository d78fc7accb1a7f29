use crate::error::{KdIndexError, Result};
use crate::kdtree::{KDTree, KDTreeIndex};
use crate::r#type::IndexableNum;

/// A builder to create a [`KDTree`].
///
/// Every point is validated as it is added, so by the time [`finish`][Self::finish] partitions
/// the data the whole input is known to be well formed.
#[derive(Debug, Clone)]
pub struct KDTreeBuilder<N: IndexableNum> {
    /// Points in insertion order, `dimension` coordinates each
    coords: Vec<N>,

    dimension: usize,
    num_items: usize,
}

impl<N: IndexableNum> KDTreeBuilder<N> {
    /// Create a new builder for points with `dimension` coordinates.
    pub fn new(dimension: usize) -> Result<Self> {
        Self::with_capacity(dimension, 0)
    }

    /// Create a new builder for points with `dimension` coordinates, reserving space for
    /// `num_items` points.
    pub fn with_capacity(dimension: usize, num_items: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(KdIndexError::ZeroDimension);
        }

        Ok(Self {
            coords: Vec::with_capacity(num_items.saturating_mul(dimension)),
            dimension,
            num_items: 0,
        })
    }

    /// The number of coordinates every point must have.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The number of points added so far.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Add a point to the index, returning its insertion id.
    ///
    /// The point is copied; the caller's data is never reordered.
    pub fn add(&mut self, point: &[N]) -> Result<u32> {
        if point.len() != self.dimension {
            return Err(KdIndexError::DimensionMismatch {
                expected: self.dimension,
                found: point.len(),
            });
        }

        let id = self.num_items;
        if let Some(axis) = point.iter().position(|c| !c.is_finite()) {
            return Err(KdIndexError::NonFiniteCoordinate { id, axis });
        }
        let id: u32 = id
            .try_into()
            .map_err(|_| KdIndexError::TooManyItems(id + 1))?;

        self.coords.extend_from_slice(point);
        self.num_items += 1;

        Ok(id)
    }

    /// Consume this builder, performing the k-d sort and generating a KDTree ready for queries.
    #[tracing::instrument(
        level = "debug",
        skip(self),
        fields(dimension = self.dimension, num_items = self.num_items)
    )]
    pub fn finish(self) -> KDTree<N> {
        let dimension = self.dimension;

        // `add` guarantees every insertion id fits in a u32
        let mut ids: Vec<u32> = (0..self.num_items).map(|id| id as u32).collect();

        // kd-sort the ids for efficient search
        sort(&mut ids, &self.coords, dimension, 0);

        let mut coords = Vec::with_capacity(self.coords.len());
        for &id in &ids {
            let start = id as usize * dimension;
            coords.extend_from_slice(&self.coords[start..start + dimension]);
        }

        let tree = KDTree {
            coords,
            ids,
            dimension,
        };
        tracing::debug!(height = tree.height(), "built kd-tree");
        tree
    }
}

/// Recursively place the median of `ids` (by the coordinate on `depth % dimension`) at the
/// middle position `len / 2`, then do the same for the halves on either side of it.
fn sort<N: IndexableNum>(ids: &mut [u32], coords: &[N], dimension: usize, depth: usize) {
    if ids.len() <= 1 {
        return;
    }

    let axis = depth % dimension;
    let m = ids.len() / 2;

    // afterwards [..m] is <= ids[m] and [m + 1..] is >= ids[m] on this axis
    ids.select_nth_unstable_by(m, |&a, &b| {
        let a = coords[a as usize * dimension + axis];
        let b = coords[b as usize * dimension + axis];
        a.cmp_coord(&b)
    });

    let (left, right) = ids.split_at_mut(m);
    sort(left, coords, dimension, depth + 1);
    sort(&mut right[1..], coords, dimension, depth + 1);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_zero_dimension() {
        assert_eq!(
            KDTreeBuilder::<f64>::new(0).unwrap_err(),
            KdIndexError::ZeroDimension
        );
    }

    #[test]
    fn rejects_mismatched_point() {
        let mut builder = KDTreeBuilder::<f64>::new(3).unwrap();
        builder.add(&[1., 2., 3.]).unwrap();
        let err = builder.add(&[1., 2.]).unwrap_err();
        assert_eq!(
            err,
            KdIndexError::DimensionMismatch {
                expected: 3,
                found: 2
            }
        );
        assert_eq!(builder.num_items(), 1);
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let mut builder = KDTreeBuilder::<f32>::new(2).unwrap();
        builder.add(&[0., 0.]).unwrap();
        assert_eq!(
            builder.add(&[1., f32::NAN]).unwrap_err(),
            KdIndexError::NonFiniteCoordinate { id: 1, axis: 1 }
        );
        assert_eq!(
            builder.add(&[f32::INFINITY, 1.]).unwrap_err(),
            KdIndexError::NonFiniteCoordinate { id: 1, axis: 0 }
        );
    }

    #[test]
    fn add_returns_insertion_ids() {
        let mut builder = KDTreeBuilder::<f64>::with_capacity(1, 3).unwrap();
        assert_eq!(builder.add(&[5.]).unwrap(), 0);
        assert_eq!(builder.add(&[3.]).unwrap(), 1);
        assert_eq!(builder.add(&[4.]).unwrap(), 2);
    }

    #[test]
    fn one_dimensional_tree_is_sorted_around_medians() {
        let mut builder = KDTreeBuilder::<f64>::new(1).unwrap();
        for x in [7., 1., 5., 3., 6., 2., 4.] {
            builder.add(&[x]).unwrap();
        }
        let tree = builder.finish();
        // with a single axis every level sorts on the same coordinate, so the layout is fully
        // sorted
        assert_eq!(tree.coords(), &[1., 2., 3., 4., 5., 6., 7.]);
        assert_eq!(tree.ids(), &[1, 5, 3, 6, 2, 4, 0]);
    }

    #[test]
    fn empty_builder_finishes() {
        let tree = KDTreeBuilder::<f64>::new(2).unwrap().finish();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
    }
}
