//! Configuration options for the tree builder.
//!
//! `BuilderOptions` selects between the parallel and sequential expansion
//! and sizes the thread pools used by a parallel build.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How sub-directories are expanded
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BuildMode {
    /// One task per sub-directory on a dedicated thread pool
    #[default]
    Parallel,
    /// The same expansion on the calling thread
    Sequential,
}

/// Configuration options for a [`TreeBuilder`](crate::TreeBuilder).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuilderOptions {
    /// Parallel or sequential expansion.
    pub mode: BuildMode,

    /// Size of the primary pool; `0` lets rayon pick one thread per core.
    pub threads: usize,

    /// Size of the oversized pool used for the single retry.
    pub fallback_threads: usize,

    /// Prefix for worker thread names, followed by the worker index.
    pub thread_name_prefix: String,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            mode: BuildMode::Parallel,
            threads: 0,
            fallback_threads: 64,
            thread_name_prefix: "tree-builder".to_string(),
        }
    }
}

impl BuilderOptions {
    /// Create new builder options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expansion mode.
    pub fn mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for [`BuildMode::Sequential`].
    pub fn sequential(self) -> Self {
        self.mode(BuildMode::Sequential)
    }

    /// Set the primary pool size.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the fallback pool size.
    pub fn fallback_threads(mut self, threads: usize) -> Self {
        self.fallback_threads = threads;
        self
    }

    /// Set the worker thread name prefix.
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.mode == BuildMode::Parallel
    }
}
