//! Branch-and-bound proximity searches over the kd-sorted layout.
//!
//! All searches walk the tree with an explicit stack instead of recursion. A node's far side is
//! pushed before its near side, together with the plane bound it must satisfy, so it is only
//! popped (and its bound checked against the current best) once the near side has been
//! searched completely.

use tinyvec::TinyVec;

use crate::error::KdIndexError;
use crate::kdtree::r#trait::slot_point;
use crate::kdtree::KDTreeIndex;
use crate::metric::DistanceMetric;
use crate::queue::BoundedPriorityQueue;
use crate::r#type::IndexableNum;

/// A stored point returned by a proximity search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a, N: IndexableNum> {
    /// Insertion id of the point
    pub id: u32,
    /// Coordinates of the point
    pub point: &'a [N],
    /// Distance to the query, in the units of the metric used (squared distance by default)
    pub distance: N,
}

/// A neighbor count validated from a signed integer.
///
/// The search API takes `usize`, which cannot be negative. Callers that hold a signed count can
/// convert through this type to fail fast instead of clamping.
///
/// ```
/// use kd_index::kdtree::KCount;
/// use kd_index::KdIndexError;
///
/// assert_eq!(KCount::try_from(3i64).unwrap().get(), 3);
/// assert_eq!(KCount::try_from(-1i64), Err(KdIndexError::InvalidK(-1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KCount(usize);

impl KCount {
    /// The validated count.
    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<i64> for KCount {
    type Error = KdIndexError;

    fn try_from(k: i64) -> Result<Self, Self::Error> {
        usize::try_from(k)
            .map(KCount)
            .map_err(|_| KdIndexError::InvalidK(k))
    }
}

/// A pending subtree on the search stack.
#[derive(Debug, Clone, Copy, Default)]
struct Frame<N> {
    start: usize,
    end: usize,
    depth: usize,
    /// Lower bound on the distance to anything in this subtree. `None` for the side of the
    /// plane the query lies on.
    bound: Option<N>,
}

/// Push the children of the node in slot `m`, far side first.
#[inline]
fn push_children<N: IndexableNum, M: DistanceMetric<N>>(
    stack: &mut TinyVec<[Frame<N>; 33]>,
    frame: &Frame<N>,
    m: usize,
    target: N,
    plane: N,
    metric: &M,
) {
    let left = (frame.start, m);
    let right = (m + 1, frame.end);

    // the logical side is the one the query would be inserted into
    let (near, far) = if target <= plane {
        (left, right)
    } else {
        (right, left)
    };

    let depth = frame.depth + 1;
    if far.0 < far.1 {
        stack.push(Frame {
            start: far.0,
            end: far.1,
            depth,
            bound: Some(metric.axis_distance(target - plane)),
        });
    }
    if near.0 < near.1 {
        stack.push(Frame {
            start: near.0,
            end: near.1,
            depth,
            bound: None,
        });
    }
}

#[inline]
fn root_frame<N: IndexableNum, T: KDTreeIndex<N>>(tree: &T) -> TinyVec<[Frame<N>; 33]> {
    let mut stack = TinyVec::new();
    if !tree.is_empty() {
        stack.push(Frame {
            start: 0,
            end: tree.num_items(),
            depth: 0,
            bound: None,
        });
    }
    stack
}

#[inline]
fn neighbor<N: IndexableNum, T: KDTreeIndex<N>>(
    tree: &T,
    slot: usize,
    distance: N,
) -> Neighbor<'_, N> {
    Neighbor {
        id: tree.ids()[slot],
        point: slot_point(tree, slot),
        distance,
    }
}

/// Single nearest neighbor. The query must already have the tree's dimension.
///
/// The first visited point is always taken, so a tree with points yields a neighbor even when
/// every distance overflows to infinity.
pub(crate) fn nearest<'a, N, T, M>(tree: &'a T, query: &[N], metric: &M) -> Option<Neighbor<'a, N>>
where
    N: IndexableNum,
    T: KDTreeIndex<N>,
    M: DistanceMetric<N>,
{
    let dimension = tree.dimension();
    let mut best: Option<usize> = None;
    let mut best_distance = N::infinity();

    let mut stack = root_frame(tree);
    while let Some(frame) = stack.pop() {
        // inclusive: a far side exactly as far away as the current best is still searched
        if frame.bound.is_some_and(|bound| bound > best_distance) {
            continue;
        }

        let m = frame.start + (frame.end - frame.start) / 2;
        let point = slot_point(tree, m);

        let d = metric.distance(point, query);
        if best.is_none() || d < best_distance {
            best = Some(m);
            best_distance = d;
        }

        let axis = frame.depth % dimension;
        push_children(&mut stack, &frame, m, query[axis], point[axis], metric);
    }

    tracing::trace!(num_items = tree.num_items(), found = best.is_some(), "nearest");
    best.map(|slot| neighbor(tree, slot, best_distance))
}

/// The `k` nearest neighbors, ascending. The query must already have the tree's dimension.
pub(crate) fn k_nearest<'a, N, T, M>(
    tree: &'a T,
    query: &[N],
    k: usize,
    metric: &M,
) -> Vec<Neighbor<'a, N>>
where
    N: IndexableNum,
    T: KDTreeIndex<N>,
    M: DistanceMetric<N>,
{
    if k == 0 || tree.is_empty() {
        return vec![];
    }

    let dimension = tree.dimension();
    // the queue never needs more room than there are points
    let mut queue: BoundedPriorityQueue<usize, N> =
        BoundedPriorityQueue::new(k.min(tree.num_items()));

    let mut stack = root_frame(tree);
    while let Some(frame) = stack.pop() {
        // until the queue is full there is no bound to prune against
        if let Some(bound) = frame.bound {
            if queue.is_full() && queue.peek_max().is_some_and(|worst| bound > worst) {
                continue;
            }
        }

        let m = frame.start + (frame.end - frame.start) / 2;
        let point = slot_point(tree, m);

        queue.insert(m, metric.distance(point, query));

        let axis = frame.depth % dimension;
        push_children(&mut stack, &frame, m, query[axis], point[axis], metric);
    }

    tracing::trace!(num_items = tree.num_items(), k, found = queue.len(), "k-nearest");
    queue
        .into_sorted_vec()
        .into_iter()
        .map(|(slot, distance)| neighbor(tree, slot, distance))
        .collect()
}

/// All neighbors with a distance of at most `max_distance`, in traversal order.
pub(crate) fn within<'a, N, T, M>(
    tree: &'a T,
    query: &[N],
    max_distance: N,
    metric: &M,
) -> Vec<Neighbor<'a, N>>
where
    N: IndexableNum,
    T: KDTreeIndex<N>,
    M: DistanceMetric<N>,
{
    let dimension = tree.dimension();
    let mut result = vec![];

    let mut stack = root_frame(tree);
    while let Some(frame) = stack.pop() {
        if frame.bound.is_some_and(|bound| bound > max_distance) {
            continue;
        }

        let m = frame.start + (frame.end - frame.start) / 2;
        let point = slot_point(tree, m);

        let d = metric.distance(point, query);
        if d <= max_distance {
            result.push(neighbor(tree, m, d));
        }

        let axis = frame.depth % dimension;
        push_children(&mut stack, &frame, m, query[axis], point[axis], metric);
    }

    result
}
