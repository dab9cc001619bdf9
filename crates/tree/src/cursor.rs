//! Pre-order enumeration: a borrowing iterator and a removal-capable cursor

use std::hash::Hash;

use crate::node::NodeId;
use crate::tree::Tree;

/// Borrowing pre-order iterator over a tree's labels
///
/// Visits a label, then each child subtree from left to right.
pub struct Iter<'a, E> {
    tree: &'a Tree<E>,
    stack: Vec<NodeId>,
}

impl<'a, E> Iter<'a, E> {
    fn new(tree: &'a Tree<E>) -> Self {
        Self {
            tree,
            stack: tree.root.into_iter().collect(),
        }
    }
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let slot = self.tree.node(current);

        // Add children in reverse order so they're popped in correct order
        self.stack.extend(slot.children.iter().rev().copied());

        Some(&slot.label)
    }
}

impl<'a, E> IntoIterator for &'a Tree<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(self)
    }
}

impl<E> Tree<E> {
    /// Iterate over the labels in pre-order
    pub fn iter(&self) -> Iter<'_, E> {
        Iter::new(self)
    }
}

impl<E: Clone + Eq + Hash> Tree<E> {
    /// Open a cursor that walks a pre-order snapshot and can remove the
    /// label it last yielded
    pub fn cursor(&mut self) -> Cursor<'_, E> {
        let order = self.preorder();
        Cursor {
            tree: self,
            order,
            position: 0,
            removable: false,
        }
    }
}

/// Pre-order cursor with in-place removal
///
/// The visiting order is fixed when the cursor is opened. Removing the last
/// yielded label also removes its subtree; the descendants that disappear
/// with it are dropped from the snapshot, so they are never yielded
/// afterwards.
///
/// # Example
///
/// ```
/// use labeled_tree::Tree;
///
/// let mut tree = Tree::from_labels([1, 2, 3]).unwrap();
/// let mut cursor = tree.cursor();
/// while let Some(&label) = cursor.next() {
///     if label == 2 {
///         cursor.remove();
///     }
/// }
/// assert_eq!(tree.to_vec(), vec![1, 3]);
/// ```
pub struct Cursor<'a, E> {
    tree: &'a mut Tree<E>,
    order: Vec<NodeId>,
    position: usize,
    /// Set by `next`, cleared by `remove`
    removable: bool,
}

impl<'a, E: Clone + Eq + Hash> Cursor<'a, E> {
    pub fn has_next(&self) -> bool {
        self.position < self.order.len()
    }

    /// Advance and yield the next label
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&E> {
        let id = *self.order.get(self.position)?;
        self.position += 1;
        self.removable = true;
        Some(&self.tree.node(id).label)
    }

    /// Remove the label most recently yielded by [`Cursor::next`], with its
    /// subtree
    ///
    /// Returns `false` and does nothing when no label has been yielded since
    /// the previous removal.
    pub fn remove(&mut self) -> bool {
        if !self.removable || self.position == 0 {
            return false;
        }
        self.removable = false;

        let id = self.order[self.position - 1];
        self.tree.remove_id(id);

        let tree = &*self.tree;
        self.order.retain(|&id| tree.is_live(id));
        self.position -= 1;
        true
    }

    /// Labels not yet yielded
    pub fn remaining(&self) -> usize {
        self.order.len() - self.position
    }
}
