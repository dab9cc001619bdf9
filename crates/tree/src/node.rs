//! Label units and the arena handles that locate them

use std::fmt;

use crate::error::TreeError;

/// Slot handle inside a tree's arena
///
/// Handles are only meaningful for the tree that issued them and only while
/// the label they point at is still present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

impl NodeId {
    /// The first slot handed out after a tree was emptied; always the root
    pub(crate) const ROOT: NodeId = NodeId(0);

    pub(crate) const fn new(id: usize) -> Self {
        NodeId(id)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A label wrapped for identity purposes
///
/// Equality and hashing are derived from the label alone, so two units
/// holding equal labels denote the same tree position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node<T> {
    label: T,
}

impl<T> Node<T> {
    /// Wrap a label
    pub fn new(label: T) -> Self {
        Self { label }
    }

    /// Borrow the wrapped label
    pub fn label(&self) -> &T {
        &self.label
    }

    /// Unwrap into the label
    pub fn into_label(self) -> T {
        self.label
    }

    /// Representation check. A unit can only be built around a present
    /// label, so this holds for every value of the type.
    pub fn is_valid(&self) -> bool {
        true
    }
}

impl<T> TryFrom<Option<T>> for Node<T> {
    type Error = TreeError;

    fn try_from(label: Option<T>) -> Result<Self, Self::Error> {
        label.map(Node::new).ok_or(TreeError::MissingLabel)
    }
}

impl<T> From<T> for Node<T> {
    fn from(label: T) -> Self {
        Node::new(label)
    }
}

impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.label.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_node_id() {
        assert_eq!(NodeId::ROOT, NodeId::new(0));
        assert_eq!(NodeId::new(5).get(), 5);
        assert_eq!(NodeId::new(7).to_string(), "NodeId(7)");
    }

    #[test]
    fn test_equality_follows_label() {
        let a = Node::new("src");
        let b = Node::from("src");
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b, Node::new("lib")].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_missing_label() {
        let missing = Node::<u32>::try_from(None::<u32>);
        assert_eq!(missing, Err(TreeError::MissingLabel));

        let present = Node::<u32>::try_from(Some(4)).unwrap();
        assert_eq!(*present.label(), 4);
        assert!(present.is_valid());
        assert_eq!(present.to_string(), "4");
        assert_eq!(present.into_label(), 4);
    }
}
