//! Labeled Tree
//!
//! A generic, set-like tree container: one root, no cycles and no duplicate
//! labels. Besides the usual collection operations (membership, bulk
//! insert/remove/retain, removal during iteration) it offers structural
//! operations such as subtree extraction, relocation, lowest common ancestor
//! and level queries, and renders itself as a box-drawing outline.
//!
//! # Core Concepts
//!
//! - **Tree**: the container; labels are unique and double as positions
//! - **Node**: a label wrapped for identity purposes
//! - **Edge**: a directed parent-to-child arc between two nodes
//! - **Cursor**: a pre-order walk that may remove what it just visited
//!
//! # Example
//!
//! ```
//! use labeled_tree::Tree;
//!
//! let mut tree = Tree::from_labels(["src", "lib.rs"]).unwrap();
//! tree.add_node("src", "tree");
//! tree.add_node("tree", "mod.rs");
//!
//! assert_eq!(tree.level("mod.rs"), Some(2));
//! assert_eq!(tree.render(), "src\n├───lib.rs\n└───tree\n    └───mod.rs");
//! ```

mod cursor;
mod edge;
mod error;
mod node;
mod render;
mod structure;
mod tree;

pub use cursor::{Cursor, Iter};
pub use edge::Edge;
pub use error::TreeError;
pub use node::Node;
pub use render::Nested;
pub use tree::Tree;

/// Re-export commonly used types
pub mod prelude {
    pub use super::{Cursor, Edge, Nested, Node, Tree, TreeError};
}
