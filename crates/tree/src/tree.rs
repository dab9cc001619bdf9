//! The set-like labelled tree container
//!
//! Positions live in an arena of slots addressed by [`NodeId`]. Each slot
//! records its label, its parent and its ordered children; a single hash
//! index maps every label to its slot. The order of a children list is the
//! left-to-right sibling order and drives every enumeration.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use log::trace;

use crate::error::TreeError;
use crate::node::NodeId;

/// One occupied arena slot
#[derive(Debug, Clone)]
pub(crate) struct Slot<E> {
    pub(crate) label: E,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// A rooted, acyclic tree of unique labels with set semantics
///
/// The tree is empty, or it has exactly one root and every other label hangs
/// below exactly one parent. Adding a label that is already present is
/// rejected, so the tree also behaves as a set of its labels.
///
/// # Example
///
/// ```
/// use labeled_tree::Tree;
///
/// let mut tree = Tree::from_labels([7, 8]).unwrap();
/// assert!(tree.add_node(&8, 9));
/// assert_eq!(tree.to_vec(), vec![7, 8, 9]);
/// assert_eq!(tree.level_array(), vec![0, 1, 2]);
/// ```
pub struct Tree<E> {
    /// Arena storage; `None` marks a released slot
    pub(crate) slots: Vec<Option<Slot<E>>>,
    /// Released slots available for reuse
    free: Vec<NodeId>,
    /// Label -> slot lookup
    pub(crate) index: HashMap<E, NodeId>,
    pub(crate) root: Option<NodeId>,
}

impl<E> Tree<E> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            root: None,
        }
    }

    /// Number of labels in the tree
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Remove every label, keeping the container
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.root = None;
    }

    /// Label of the root, if the tree is non-empty
    pub fn root(&self) -> Option<&E> {
        self.root.map(|id| &self.node(id).label)
    }

    pub(crate) fn node(&self, id: NodeId) -> &Slot<E> {
        match self.slots.get(id.get()) {
            Some(Some(slot)) => slot,
            _ => unreachable!("{id} does not refer to a live slot"),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Slot<E> {
        match self.slots.get_mut(id.get()) {
            Some(Some(slot)) => slot,
            _ => unreachable!("{id} does not refer to a live slot"),
        }
    }

    fn label_of(&self, id: Option<NodeId>) -> Option<&E> {
        id.map(|id| &self.node(id).label)
    }

    pub(crate) fn is_live(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.get()), Some(Some(_)))
    }

    /// Slots reachable from `start`, in pre-order
    pub(crate) fn preorder_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            order.push(id);
            // Push children in reverse so the leftmost is visited first
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        order
    }

    pub(crate) fn preorder(&self) -> Vec<NodeId> {
        self.root.map(|root| self.preorder_from(root)).unwrap_or_default()
    }

    /// Proper ancestors of `id`, nearest first, ending with the root
    pub(crate) fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.node(parent).parent;
        }
        ancestors
    }

    /// Number of arcs between `id` and the root
    pub(crate) fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.node(parent).parent;
        }
        depth
    }

    /// True if a later sibling follows `id` in its parent's children list
    pub(crate) fn has_right_sibling_id(&self, id: NodeId) -> bool {
        match self.node(id).parent {
            Some(parent) => self.node(parent).children.last() != Some(&id),
            None => false,
        }
    }

    /// Detach `id` from its parent's children list
    pub(crate) fn unlink(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&child| child != id);
            self.node_mut(id).parent = None;
        }
    }
}

impl<E: Clone + Eq + Hash> Tree<E> {
    /// Create a tree holding a single label, which becomes the root
    pub fn with_root(label: E) -> Self {
        let mut tree = Self::new();
        tree.alloc(label, None);
        tree
    }

    /// Seed a tree from an ordered sequence of labels
    ///
    /// The first label becomes the root and every following label becomes a
    /// direct child of the root, giving a flat shape.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptySeed`] for an empty sequence and
    /// [`TreeError::DuplicateSeed`] when a label repeats.
    pub fn from_labels<I>(labels: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = E>,
    {
        let mut tree = Self::new();
        for (position, label) in labels.into_iter().enumerate() {
            if !tree.add(label) {
                return Err(TreeError::DuplicateSeed { position });
            }
        }
        if tree.is_empty() {
            return Err(TreeError::EmptySeed);
        }
        Ok(tree)
    }

    pub(crate) fn id_of<Q>(&self, label: &Q) -> Option<NodeId>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(label).copied()
    }

    /// Place `label` in a fresh slot under `parent` (or as root when `None`).
    /// Callers guarantee the label is not yet present.
    pub(crate) fn alloc(&mut self, label: E, parent: Option<NodeId>) -> NodeId {
        let slot = Slot {
            label: label.clone(),
            parent,
            children: Vec::new(),
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.get()] = Some(slot);
                id
            }
            None => {
                self.slots.push(Some(slot));
                NodeId::new(self.slots.len() - 1)
            }
        };
        self.index.insert(label, id);
        match parent {
            Some(parent) => self.node_mut(parent).children.push(id),
            None => {
                debug_assert_eq!(id, NodeId::ROOT);
                self.root = Some(id);
            }
        }
        id
    }

    /// Release `id` and all of its descendants. Their slots become free and
    /// their labels leave the index. `id` must already be unlinked.
    pub(crate) fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(slot) = self.slots[current.get()].take() {
                self.index.remove(&slot.label);
                self.free.push(current);
                stack.extend(slot.children);
            }
        }
    }

    /// Remove the label held in `id` together with its subtree
    pub(crate) fn remove_id(&mut self, id: NodeId) {
        if Some(id) == self.root {
            self.clear();
        } else {
            self.unlink(id);
            self.release(id);
        }
    }

    /// True if `label` is present (the root included)
    pub fn contains<Q>(&self, label: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(label)
    }

    /// True if every label yielded by `labels` is present
    pub fn contains_all<I>(&self, labels: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        labels.into_iter().all(|label| {
            let label: &E = label.borrow();
            self.contains(label)
        })
    }

    /// Add a label
    ///
    /// An empty tree takes the label as its root; otherwise the label becomes
    /// a new direct child of the root. Returns `false` if the label is
    /// already present.
    pub fn add(&mut self, label: E) -> bool {
        if self.contains(&label) {
            return false;
        }
        let parent = self.root;
        self.alloc(label, parent);
        true
    }

    /// Attach a new leaf `child` under the existing label `parent`
    ///
    /// Fails if `parent` is absent, `child` is already present, or both are
    /// the same label.
    pub fn add_node<Q>(&mut self, parent: &Q, child: E) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(parent_id) = self.id_of(parent) else {
            trace!("add_node rejected: parent absent");
            return false;
        };
        if self.contains::<E>(&child) {
            trace!("add_node rejected: child already present");
            return false;
        }
        self.alloc(child, Some(parent_id));
        true
    }

    /// Remove a label and every label below it
    ///
    /// Removing the root empties the tree. Returns `false` if the label is
    /// absent.
    pub fn remove<Q>(&mut self, label: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.id_of(label) {
            Some(id) => {
                self.remove_id(id);
                true
            }
            None => false,
        }
    }

    /// Remove each label in turn, stopping at the first one that is absent
    ///
    /// Labels removed before the failing one stay removed.
    pub fn remove_all<I>(&mut self, labels: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        labels.into_iter().all(|label| {
            let label: &E = label.borrow();
            self.remove(label)
        })
    }

    /// Keep only the labels found in `keep`
    ///
    /// Membership is checked by scanning `keep`, so the cost grows with the
    /// size of the tree times `keep.len()`. Returns `true` if anything was
    /// removed.
    pub fn retain_all(&mut self, keep: &[E]) -> bool {
        self.retain(|label| keep.contains(label))
    }

    /// Keep only the labels for which `keep` returns true
    ///
    /// Visits labels in pre-order; dropping a label drops its subtree, whose
    /// labels are then not visited. Returns `true` if anything was removed.
    pub fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(&E) -> bool,
    {
        let mut changed = false;
        let mut cursor = self.cursor();
        while let Some(label) = cursor.next() {
            if !keep(label) {
                changed |= cursor.remove();
            }
        }
        changed
    }

    /// Every present label of `incoming` must be a leaf here; those leaves
    /// are the only places a bulk insert may extend.
    fn graft_points_are_leaves<'a, I>(&self, incoming: I) -> bool
    where
        E: 'a,
        I: IntoIterator<Item = &'a E>,
    {
        incoming.into_iter().all(|label| match self.id_of(label) {
            Some(id) => self.node(id).children.is_empty(),
            None => true,
        })
    }

    /// Add a sequence of labels one at a time with [`Tree::add`]
    ///
    /// Fails for an empty sequence, and without touching the tree if a
    /// sequence element is present here as a non-leaf. Otherwise adds in
    /// order and stops at the first rejected label.
    pub fn add_all<I>(&mut self, labels: I) -> bool
    where
        I: IntoIterator<Item = E>,
    {
        let labels: Vec<E> = labels.into_iter().collect();
        if labels.is_empty() || !self.graft_points_are_leaves(&labels) {
            return false;
        }
        labels.into_iter().all(|label| self.add(label))
    }

    /// Add every label of another tree, preserving its shape
    ///
    /// An empty tree becomes a structural copy of `source`. Otherwise the
    /// source's labels are walked in pre-order: a label whose source parent
    /// is present here is attached under that parent, any other label is
    /// attached under this tree's root. Labels already present must be
    /// leaves; they act as graft points and are not duplicated.
    ///
    /// Returns `false` without changes if `source` is empty or a shared
    /// label is not a leaf here.
    pub fn add_tree(&mut self, source: &Tree<E>) -> bool {
        match self.root {
            None => {
                if source.is_empty() {
                    return false;
                }
                self.copy_from(source);
                true
            }
            Some(root) => self.graft(source, root),
        }
    }

    /// Add every label of `source` below `parent`
    ///
    /// Same rules as [`Tree::add_tree`] with `parent` as the anchor instead
    /// of the root. Fails if `parent` is absent.
    pub fn add_subtree<Q>(&mut self, parent: &Q, source: &Tree<E>) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.id_of(parent) {
            Some(anchor) => self.graft(source, anchor),
            None => false,
        }
    }

    fn graft(&mut self, source: &Tree<E>, anchor: NodeId) -> bool {
        if source.is_empty() || !self.graft_points_are_leaves(source.iter()) {
            trace!("graft rejected: empty source or non-leaf graft point");
            return false;
        }
        for source_id in source.preorder() {
            let slot = source.node(source_id);
            if self.contains(&slot.label) {
                continue;
            }
            let parent = slot
                .parent
                .and_then(|parent| self.id_of(&source.node(parent).label))
                .unwrap_or(anchor);
            self.alloc(slot.label.clone(), Some(parent));
        }
        true
    }

    /// Replace the contents of this (empty) tree with a copy of `source`
    fn copy_from(&mut self, source: &Tree<E>) {
        let mut mapped: HashMap<NodeId, NodeId> = HashMap::with_capacity(source.len());
        for source_id in source.preorder() {
            let slot = source.node(source_id);
            let parent = slot.parent.map(|parent| mapped[&parent]);
            let id = self.alloc(slot.label.clone(), parent);
            mapped.insert(source_id, id);
        }
    }

    /// Labels in pre-order
    pub fn to_vec(&self) -> Vec<E> {
        self.iter().cloned().collect()
    }

    /// The label at `index` in pre-order, if in range
    pub fn get(&self, index: usize) -> Option<&E> {
        self.iter().nth(index)
    }

    /// Parent label of `label`; `None` for the root or an absent label
    pub fn parent<Q>(&self, label: &Q) -> Option<&E>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.id_of(label)?;
        self.node(id).parent.map(|parent| &self.node(parent).label)
    }

    /// Child labels of `label` in sibling order; empty for an absent label
    pub fn children<Q>(&self, label: &Q) -> Vec<&E>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.id_of(label)
            .map(|id| {
                self.node(id)
                    .children
                    .iter()
                    .map(|&child| &self.node(child).label)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl<E> Default for Tree<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + Eq + Hash> Clone for Tree<E> {
    /// Deep copy: the clone shares no state with the original
    fn clone(&self) -> Self {
        let mut tree = Tree::new();
        tree.copy_from(self);
        tree
    }
}

impl<E: Clone + Eq + Hash> TryFrom<Vec<E>> for Tree<E> {
    type Error = TreeError;

    fn try_from(labels: Vec<E>) -> Result<Self, Self::Error> {
        Tree::from_labels(labels)
    }
}

impl<E: Eq + Hash> PartialEq for Tree<E> {
    /// Same root, and every label has the same parent and the same ordered
    /// children in both trees
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        if self.label_of(self.root) != other.label_of(other.root) {
            return false;
        }
        self.slots.iter().flatten().all(|slot| {
            let Some(&other_id) = other.index.get(&slot.label) else {
                return false;
            };
            let other_slot = other.node(other_id);
            self.label_of(slot.parent) == other.label_of(other_slot.parent)
                && slot.children.len() == other_slot.children.len()
                && slot
                    .children
                    .iter()
                    .zip(&other_slot.children)
                    .all(|(&a, &b)| self.node(a).label == other.node(b).label)
        })
    }
}

impl<E: Eq + Hash> Eq for Tree<E> {}

impl<E: fmt::Debug> fmt::Debug for Tree<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.preorder().into_iter().map(|id| &self.node(id).label))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_reused() {
        let mut tree = Tree::from_labels([1, 2, 3]).unwrap();
        assert!(tree.remove(&2));
        assert_eq!(tree.free.len(), 1);

        assert!(tree.add(4));
        assert!(tree.free.is_empty());
        assert_eq!(tree.slots.len(), 3);
        assert_eq!(tree.to_vec(), vec![1, 3, 4]);
    }

    #[test]
    fn test_root_is_first_slot() {
        let mut tree = Tree::from_labels(["a", "b"]).unwrap();
        assert_eq!(tree.root, Some(NodeId::ROOT));

        tree.clear();
        assert!(tree.add("z"));
        assert_eq!(tree.root, Some(NodeId::ROOT));
    }

    #[test]
    fn test_release_purges_descendants() {
        let mut tree = Tree::with_root(0);
        tree.add_node(&0, 1);
        tree.add_node(&1, 2);
        tree.add_node(&2, 3);

        assert!(tree.remove(&1));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.index.len(), 1);
        assert_eq!(tree.free.len(), 3);
        assert!(tree.node(NodeId::ROOT).children.is_empty());
    }

    #[test]
    fn test_debug_lists_preorder() {
        let tree = Tree::from_labels([7, 8, 9]).unwrap();
        assert_eq!(format!("{tree:?}"), "{7, 8, 9}");
    }
}
