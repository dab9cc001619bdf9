//! Directed parent-to-child arcs

use std::fmt;

use crate::error::TreeError;
use crate::node::Node;

/// A directed arc from a parent label unit to a child label unit
///
/// An arc may carry an optional weight. Equality compares both endpoints and
/// the weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge<T, W = ()> {
    src: Node<T>,
    tgt: Node<T>,
    weight: Option<W>,
}

impl<T: PartialEq, W> Edge<T, W> {
    /// Create an unweighted arc
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::LoopEdge`] when both endpoints hold the same label.
    pub fn new(src: Node<T>, tgt: Node<T>) -> Result<Self, TreeError> {
        if src == tgt {
            return Err(TreeError::LoopEdge);
        }
        Ok(Self {
            src,
            tgt,
            weight: None,
        })
    }

    /// Attach a weight to this arc
    pub fn with_weight(mut self, weight: W) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Parent end
    pub fn src(&self) -> &Node<T> {
        &self.src
    }

    /// Child end
    pub fn tgt(&self) -> &Node<T> {
        &self.tgt
    }

    pub fn weight(&self) -> Option<&W> {
        self.weight.as_ref()
    }

    pub fn set_weight(&mut self, weight: Option<W>) {
        self.weight = weight;
    }

    /// True if `node` is the parent end
    pub fn has_src(&self, node: &Node<T>) -> bool {
        &self.src == node
    }

    /// True if `node` is the child end
    pub fn has_tgt(&self, node: &Node<T>) -> bool {
        &self.tgt == node
    }

    /// Representation check: the endpoints differ.
    pub fn is_valid(&self) -> bool {
        self.src.is_valid() && self.tgt.is_valid() && self.src != self.tgt
    }
}

impl<T: fmt::Display, W: fmt::Debug> fmt::Display for Edge<T, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.weight {
            Some(weight) => write!(f, "Edge:<{}, {}, {:?}>", self.src, self.tgt, weight),
            None => write!(f, "Edge:<{}, {}, none>", self.src, self.tgt),
        }
    }
}
