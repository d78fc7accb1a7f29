//! Utilities to traverse the KDTree structure.

use std::fmt;
use std::marker::PhantomData;

use tinyvec::TinyVec;

use crate::kdtree::r#trait::slot_point;
use crate::kdtree::KDTreeIndex;
use crate::r#type::IndexableNum;

/// A node in the KDTree.
///
/// A node owns the contiguous slot range `start..end`. Its own point sits at the middle slot;
/// the slots before it form the left subtree and the slots after it the right subtree.
pub struct Node<'a, N: IndexableNum, T: KDTreeIndex<N>> {
    /// The tree that this node is a reference onto
    tree: &'a T,

    start: usize,
    end: usize,
    depth: usize,

    phantom: PhantomData<N>,
}

impl<'a, N: IndexableNum, T: KDTreeIndex<N>> Node<'a, N, T> {
    fn new(tree: &'a T, start: usize, end: usize, depth: usize) -> Option<Self> {
        (start < end).then_some(Self {
            tree,
            start,
            end,
            depth,
            phantom: PhantomData,
        })
    }

    pub(crate) fn from_root(tree: &'a T) -> Option<Self> {
        Self::new(tree, 0, tree.num_items(), 0)
    }

    /// Note: this is the index into the kd-sorted slots, not the insertion index.
    #[inline]
    pub fn slot(&self) -> usize {
        self.start + (self.end - self.start) / 2
    }

    /// The point stored at this node.
    pub fn point(&self) -> &'a [N] {
        slot_point(self.tree, self.slot())
    }

    /// The insertion id of the point stored at this node.
    pub fn id(&self) -> u32 {
        self.tree.ids()[self.slot()]
    }

    /// Distance from the root; zero for the root itself.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The axis this node splits its children over.
    pub fn axis(&self) -> usize {
        self.depth % self.tree.dimension()
    }

    /// The number of points in the subtree rooted here, including this node.
    pub fn num_items(&self) -> usize {
        self.end - self.start
    }

    /// The child node holding points on the low side of this node's splitting plane.
    pub fn left_child(&self) -> Option<Node<'a, N, T>> {
        Self::new(self.tree, self.start, self.slot(), self.depth + 1)
    }

    /// The child node holding points on the high side of this node's splitting plane.
    pub fn right_child(&self) -> Option<Node<'a, N, T>> {
        Self::new(self.tree, self.slot() + 1, self.end, self.depth + 1)
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.num_items() == 1
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }
}

impl<N: IndexableNum, T: KDTreeIndex<N>> Clone for Node<'_, N, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: IndexableNum, T: KDTreeIndex<N>> Copy for Node<'_, N, T> {}

impl<N: IndexableNum, T: KDTreeIndex<N>> fmt::Debug for Node<'_, N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id())
            .field("point", &self.point())
            .field("depth", &self.depth)
            .field("num_items", &self.num_items())
            .finish()
    }
}

/// Iterator over the nodes of a tree in preorder: node, left subtree, right subtree.
pub struct Preorder<'a, N: IndexableNum, T: KDTreeIndex<N>> {
    tree: &'a T,
    stack: TinyVec<[(usize, usize, usize); 33]>,
    phantom: PhantomData<N>,
}

impl<'a, N: IndexableNum, T: KDTreeIndex<N>> Preorder<'a, N, T> {
    pub(crate) fn new(tree: &'a T) -> Self {
        let mut stack = TinyVec::new();
        if !tree.is_empty() {
            stack.push((0, tree.num_items(), 0));
        }
        Self {
            tree,
            stack,
            phantom: PhantomData,
        }
    }
}

impl<'a, N: IndexableNum, T: KDTreeIndex<N>> Iterator for Preorder<'a, N, T> {
    type Item = Node<'a, N, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let (start, end, depth) = self.stack.pop()?;
        let node = Node::new(self.tree, start, end, depth)?;

        // right pushed first so the left subtree is visited first
        let m = node.slot();
        if m + 1 < end {
            self.stack.push((m + 1, end, depth + 1));
        }
        if start < m {
            self.stack.push((start, m, depth + 1));
        }
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .stack
            .iter()
            .map(|(start, end, _)| end - start)
            .sum::<usize>();
        (remaining, Some(remaining))
    }
}

impl<N: IndexableNum, T: KDTreeIndex<N>> ExactSizeIterator for Preorder<'_, N, T> {}
