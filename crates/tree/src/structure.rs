//! Level queries and structural operations

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use log::trace;

use crate::edge::Edge;
use crate::node::{Node, NodeId};
use crate::tree::Tree;

impl<E: Clone + Eq + Hash> Tree<E> {
    /// Number of arcs between `label` and the root; `None` if absent
    pub fn level<Q>(&self, label: &Q) -> Option<usize>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.id_of(label).map(|id| self.depth(id))
    }

    /// Level of every label, in pre-order
    pub fn level_array(&self) -> Vec<usize> {
        let mut levels = Vec::with_capacity(self.len());
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|root| (root, 0)).into_iter().collect();
        while let Some((id, level)) = stack.pop() {
            levels.push(level);
            stack.extend(
                self.node(id)
                    .children
                    .iter()
                    .rev()
                    .map(|&child| (child, level + 1)),
            );
        }
        levels
    }

    /// Greatest level in the tree; 0 for an empty or single-label tree
    pub fn height(&self) -> usize {
        self.level_array().into_iter().max().unwrap_or(0)
    }

    /// Length of the longest downward path from `label` to a leaf
    pub fn height_of<Q>(&self, label: &Q) -> Option<usize>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let start = self.id_of(label)?;
        let mut height = 0;
        let mut stack = vec![(start, 0)];
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(self.node(id).children.iter().map(|&child| (child, depth + 1)));
        }
        Some(height)
    }

    /// Number of children of `label`
    pub fn degree<Q>(&self, label: &Q) -> Option<usize>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.id_of(label).map(|id| self.node(id).children.len())
    }

    /// True if `label` is present and has no children
    pub fn is_leaf<Q>(&self, label: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.id_of(label)
            .is_some_and(|id| self.node(id).children.is_empty())
    }

    /// True if `label` is not the last child of its parent
    ///
    /// False for the root and for absent labels.
    pub fn has_right_siblings<Q>(&self, label: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.id_of(label)
            .is_some_and(|id| self.has_right_sibling_id(id))
    }

    /// Lowest common ancestor of two labels
    ///
    /// Defined only when both labels are present, neither is the root and
    /// they differ; `None` otherwise. Only proper ancestors are considered,
    /// so when `a` lies above `b` the answer is `a`'s parent rather than `a`.
    pub fn lca<Q>(&self, a: &Q, b: &Q) -> Option<&E>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let root = self.root?;
        let a = self.id_of(a)?;
        let b = self.id_of(b)?;
        if a == root || b == root || a == b {
            return None;
        }

        let above_a = self.ancestors(a);
        let mut current = self.node(b).parent;
        while let Some(candidate) = current {
            if above_a.contains(&candidate) {
                return Some(&self.node(candidate).label);
            }
            current = self.node(candidate).parent;
        }
        None
    }

    /// Copy the subtree rooted at `label` into a new tree
    ///
    /// With `detach` the subtree is also removed from this tree; detaching
    /// the root leaves this tree empty. Returns `None` if `label` is absent.
    pub fn subtree<Q>(&mut self, label: &Q, detach: bool) -> Option<Tree<E>>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let start = self.id_of(label)?;
        if Some(start) == self.root {
            let copy = self.clone();
            if detach {
                self.clear();
            }
            return Some(copy);
        }

        let mut extracted = Tree::new();
        let mut mapped: HashMap<NodeId, NodeId> = HashMap::new();
        for id in self.preorder_from(start) {
            let slot = self.node(id);
            let parent = if id == start {
                None
            } else {
                slot.parent.map(|parent| mapped[&parent])
            };
            let new_id = extracted.alloc(slot.label.clone(), parent);
            mapped.insert(id, new_id);
        }

        if detach {
            self.unlink(start);
            self.release(start);
        }
        Some(extracted)
    }

    /// Relocate the subtree rooted at `from` so it becomes the last child of
    /// `to`
    ///
    /// The move is validated before anything changes: both labels must be
    /// present, `from` must not be the root and `to` must not lie inside
    /// `from`'s subtree. A rejected move leaves the tree untouched.
    pub fn move_subtree<Q>(&mut self, from: &Q, to: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (Some(from), Some(to)) = (self.id_of(from), self.id_of(to)) else {
            trace!("move rejected: label absent");
            return false;
        };
        if Some(from) == self.root || from == to || self.ancestors(to).contains(&from) {
            trace!("move rejected: target lies inside the moved subtree");
            return false;
        }

        self.unlink(from);
        self.node_mut(from).parent = Some(to);
        self.node_mut(to).children.push(from);
        true
    }

    /// Replace the label `old` with `new`, keeping its position
    ///
    /// Fails if `old` is absent or `new` is already present.
    pub fn set<Q>(&mut self, old: &Q, new: E) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.contains::<E>(&new) {
            return false;
        }
        let Some(id) = self.id_of(old) else {
            return false;
        };
        let previous = std::mem::replace(&mut self.node_mut(id).label, new.clone());
        self.index.remove::<E>(&previous);
        self.index.insert(new, id);
        true
    }

    /// Exchange the positions of two distinct present labels
    pub fn swap<Q>(&mut self, a: &Q, b: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (Some(a), Some(b)) = (self.id_of(a), self.id_of(b)) else {
            return false;
        };
        if a == b {
            return false;
        }

        let label_a = self.node(a).label.clone();
        let label_b = std::mem::replace(&mut self.node_mut(b).label, label_a.clone());
        self.node_mut(a).label = label_b.clone();
        self.index.insert(label_a, b);
        self.index.insert(label_b, a);
        true
    }

    /// The arc that links `label` to its parent; `None` for the root
    pub fn parent_edge<Q>(&self, label: &Q) -> Option<Edge<E>>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.id_of(label)?;
        self.edge_to(id)
    }

    /// Every arc of the tree, ordered by the pre-order position of its child
    pub fn edges(&self) -> Vec<Edge<E>> {
        self.preorder()
            .into_iter()
            .filter_map(|id| self.edge_to(id))
            .collect()
    }

    fn edge_to(&self, id: NodeId) -> Option<Edge<E>> {
        let slot = self.node(id);
        let parent = self.node(slot.parent?);
        Edge::new(Node::new(parent.label.clone()), Node::new(slot.label.clone())).ok()
    }

    /// Reorder every sibling list with a caller-supplied comparison
    ///
    /// The sort is stable, so siblings that compare equal keep their
    /// relative order.
    pub fn sort_children_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&E, &E) -> Ordering,
    {
        for index in 0..self.slots.len() {
            let Some(slot) = self.slots[index].as_mut() else {
                continue;
            };
            let mut children = std::mem::take(&mut slot.children);
            children.sort_by(|&a, &b| compare(&self.node(a).label, &self.node(b).label));
            if let Some(slot) = self.slots[index].as_mut() {
                slot.children = children;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 7 ─ 8, 9 ─ 10
    fn scenario() -> Tree<u32> {
        let mut tree = Tree::from_labels([7, 8]).unwrap();
        let other = Tree::from_labels([9, 10]).unwrap();
        assert!(tree.add_tree(&other));
        tree
    }

    #[test]
    fn test_levels() {
        let tree = scenario();
        assert_eq!(tree.level(&7), Some(0));
        assert_eq!(tree.level(&10), Some(2));
        assert_eq!(tree.level(&99), None);
        assert_eq!(tree.level_array(), vec![0, 1, 1, 2]);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_height_and_degree_of_label() {
        let tree = scenario();
        assert_eq!(tree.height_of(&7), Some(2));
        assert_eq!(tree.height_of(&9), Some(1));
        assert_eq!(tree.height_of(&8), Some(0));
        assert_eq!(tree.degree(&7), Some(2));
        assert_eq!(tree.degree(&10), Some(0));
        assert_eq!(tree.degree(&1), None);
    }

    #[test]
    fn test_right_siblings() {
        let tree = scenario();
        assert!(tree.has_right_siblings(&8));
        assert!(!tree.has_right_siblings(&9));
        assert!(!tree.has_right_siblings(&7));
        assert!(!tree.has_right_siblings(&42));
    }

    #[test]
    fn test_lca_contract() {
        let tree = scenario();
        assert_eq!(tree.lca(&8, &10), Some(&7));
        assert_eq!(tree.lca(&7, &10), None);
        assert_eq!(tree.lca(&8, &8), None);
        assert_eq!(tree.lca(&8, &77), None);
        // 9 is above 10, but a label is never its own ancestor
        assert_eq!(tree.lca(&9, &10), Some(&7));
    }

    #[test]
    fn test_sort_children_by() {
        let mut tree = Tree::from_labels([0, 5, 3, 9, 1]).unwrap();
        tree.sort_children_by(|a, b| a.cmp(b));
        assert_eq!(tree.to_vec(), vec![0, 1, 3, 5, 9]);
    }

    #[test]
    fn test_edges() {
        let tree = scenario();
        let pairs: Vec<_> = tree
            .edges()
            .iter()
            .map(|edge| (*edge.src().label(), *edge.tgt().label()))
            .collect();
        assert_eq!(pairs, vec![(7, 8), (7, 9), (9, 10)]);
        assert!(tree.parent_edge(&7).is_none());
    }
}
