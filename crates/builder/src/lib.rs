//! Tree Builder
//!
//! Populates a [`labeled_tree::Tree`] by walking a hierarchical source one
//! directory at a time. Sub-directories are expanded concurrently on a
//! dedicated rayon pool, and their subtrees are grafted back in listing
//! order, so a parallel build and a sequential build of the same input give
//! equal trees.
//!
//! If the pool cannot be created the build is retried once on a larger
//! fallback pool. A build that still fails returns an empty tree together
//! with the error instead of propagating it.

mod builder;
mod options;
mod source;

pub use builder::{BuildReport, TreeBuilder};
pub use options::{BuildMode, BuilderOptions};
pub use source::{DirectorySource, Entry, EntryKind, FsSource, MemorySource};
