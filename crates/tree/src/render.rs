//! Text rendering and the nested (structure-preserving) snapshot

use std::fmt;

use crate::node::NodeId;
use crate::tree::Tree;

/// Connector for the line's own label when a right sibling follows
const BRANCH: &str = "├───";
/// Connector for the line's own label when it is the last child
const LAST_BRANCH: &str = "└───";
/// Continuation under an ancestor that has a right sibling
const PIPE: &str = "│   ";
/// Continuation under an ancestor that is a last child
const BLANK: &str = "    ";

impl<E> Tree<E> {
    /// Render the tree one label per line, in pre-order
    ///
    /// Each line is prefixed by one 4-character connector per ancestor below
    /// the root, followed by the connector of the label itself. Lines are
    /// joined with `\n` and there is no trailing newline. An empty tree
    /// renders as an empty string.
    ///
    /// # Example
    ///
    /// ```
    /// use labeled_tree::Tree;
    ///
    /// let mut tree = Tree::from_labels([7, 8, 9]).unwrap();
    /// tree.add_node(&8, 10);
    /// assert_eq!(tree.render(), "7\n├───8\n│   └───10\n└───9");
    /// ```
    pub fn render(&self) -> String
    where
        E: fmt::Display,
    {
        self.render_with(|label| label.to_string())
    }

    /// Render with a custom label formatter
    pub fn render_with<F>(&self, mut format_label: F) -> String
    where
        F: FnMut(&E) -> String,
    {
        let Some(root) = self.root else {
            return String::new();
        };

        let mut lines = Vec::with_capacity(self.slots.len());
        // (node, prefix contributed by its proper ancestors below the root)
        let mut stack: Vec<(NodeId, String)> = vec![(root, String::new())];
        while let Some((id, prefix)) = stack.pop() {
            let slot = self.node(id);
            let has_sibling = self.has_right_sibling_id(id);
            let connector = match (slot.parent, has_sibling) {
                (None, _) => "",
                (Some(_), true) => BRANCH,
                (Some(_), false) => LAST_BRANCH,
            };
            lines.push(format!("{prefix}{connector}{}", format_label(&slot.label)));

            let child_prefix = match (slot.parent, has_sibling) {
                (None, _) => String::new(),
                (Some(_), true) => format!("{prefix}{PIPE}"),
                (Some(_), false) => format!("{prefix}{BLANK}"),
            };
            for &child in slot.children.iter().rev() {
                stack.push((child, child_prefix.clone()));
            }
        }
        lines.join("\n")
    }

    /// Snapshot of the tree as owned nested values, preserving its shape
    pub fn to_nested(&self) -> Option<Nested<E>>
    where
        E: Clone,
    {
        self.root.map(|root| self.nested_from(root))
    }

    fn nested_from(&self, id: NodeId) -> Nested<E>
    where
        E: Clone,
    {
        let slot = self.node(id);
        Nested {
            label: slot.label.clone(),
            children: slot
                .children
                .iter()
                .map(|&child| self.nested_from(child))
                .collect(),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Tree<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A label together with its children, recursively
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nested<E> {
    pub label: E,
    pub children: Vec<Nested<E>>,
}

impl<E> Nested<E> {
    /// A nested value with no children
    pub fn leaf(label: E) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }

    /// Number of labels in this nested value
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Nested::len).sum::<usize>()
    }

    /// Always false: a nested value holds at least its own label
    pub fn is_empty(&self) -> bool {
        false
    }
}
