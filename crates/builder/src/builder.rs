//! Recursive tree construction from a [`DirectorySource`]
//!
//! A directory is expanded by listing it, attaching every entry as a leaf in
//! listing order, expanding each sub-directory into a tree of its own and
//! finally grafting those trees back onto the leaves reserved for them.
//! Sub-directories of one directory are expanded concurrently on a dedicated
//! rayon pool; the sequential mode runs exactly the same steps on the calling
//! thread.

use std::fmt;

use anyhow::{anyhow, Context, Result};
use labeled_tree::Tree;
use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::options::{BuildMode, BuilderOptions};
use crate::source::DirectorySource;

type PoolFactory = Box<dyn Fn(usize) -> Result<ThreadPool> + Send + Sync>;

/// Outcome of a build
///
/// A failed build still hands back the tree assembled so far, which is empty
/// when no attempt could start.
pub struct BuildReport<L> {
    pub tree: Tree<L>,
    pub error: Option<anyhow::Error>,
    /// Number of execution attempts made; 0 when the root was rejected
    pub attempts: usize,
}

impl<L> BuildReport<L> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Drop the partial tree of a failed build
    pub fn into_result(self) -> Result<Tree<L>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.tree),
        }
    }
}

impl<L: fmt::Debug> fmt::Debug for BuildReport<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildReport")
            .field("tree", &self.tree)
            .field("error", &self.error.as_ref().map(|err| format!("{err:#}")))
            .field("attempts", &self.attempts)
            .finish()
    }
}

/// Populates a [`Tree`] from a hierarchical source
///
/// # Example
///
/// ```
/// use tree_builder::{BuilderOptions, Entry, MemorySource, TreeBuilder};
///
/// let source = MemorySource::new()
///     .with_directory("/", [Entry::directory("/src"), Entry::leaf("/README")])
///     .with_directory("/src", [Entry::leaf("/src/lib.rs")]);
///
/// let report = TreeBuilder::new(source)
///     .with_options(BuilderOptions::new().threads(2))
///     .build("/");
/// assert!(report.is_ok());
/// assert_eq!(report.tree.to_vec(), vec!["/", "/src", "/src/lib.rs", "/README"]);
/// ```
pub struct TreeBuilder<S> {
    source: S,
    options: BuilderOptions,
    pool_factory: Option<PoolFactory>,
}

impl<S: DirectorySource> TreeBuilder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: BuilderOptions::default(),
            pool_factory: None,
        }
    }

    pub fn with_options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the way thread pools are created
    ///
    /// The factory receives the requested pool size: first the primary size,
    /// then the fallback size if the first call failed.
    pub fn with_pool_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(usize) -> Result<ThreadPool> + Send + Sync + 'static,
    {
        self.pool_factory = Some(Box::new(factory));
        self
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Build the tree rooted at `root`
    ///
    /// Never panics on source or pool failures; they are reported through
    /// [`BuildReport::error`].
    pub fn build(&self, root: S::Label) -> BuildReport<S::Label> {
        if !self.source.is_directory(&root) {
            warn!("Build root {:?} is not a directory", root);
            return BuildReport {
                tree: Tree::new(),
                error: Some(anyhow!("{:?} is not a directory", root)),
                attempts: 0,
            };
        }

        match self.options.mode {
            BuildMode::Sequential => {
                info!("Building {:?} sequentially", root);
                BuildReport {
                    tree: self.expand(&root, BuildMode::Sequential),
                    error: None,
                    attempts: 1,
                }
            }
            BuildMode::Parallel => self.build_parallel(&root),
        }
    }

    fn build_parallel(&self, root: &S::Label) -> BuildReport<S::Label> {
        let sizes = [self.options.threads, self.options.fallback_threads];
        let mut error = None;

        for (attempt, &threads) in sizes.iter().enumerate() {
            if attempt == 0 {
                info!("Building {:?} with {} threads", root, threads);
            } else {
                info!("Retrying build of {:?} with {} threads", root, threads);
            }

            match self.create_pool(threads) {
                Ok(pool) => {
                    let tree = pool.install(|| self.expand(root, BuildMode::Parallel));
                    return BuildReport {
                        tree,
                        error: None,
                        attempts: attempt + 1,
                    };
                }
                Err(err) => {
                    warn!("Could not create a pool of {} threads: {:#}", threads, err);
                    error = Some(err);
                }
            }
        }

        BuildReport {
            tree: Tree::new(),
            error: error.map(|err| err.context("Build abandoned after retry")),
            attempts: sizes.len(),
        }
    }

    fn create_pool(&self, threads: usize) -> Result<ThreadPool> {
        if let Some(factory) = &self.pool_factory {
            return factory(threads);
        }

        let prefix = self.options.thread_name_prefix.clone();
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |index| format!("{prefix}-{index}"))
            .build()
            .with_context(|| format!("Failed to start a pool of {threads} threads"))
    }

    /// Subtree for `directory`, with every listed entry below it
    fn expand(&self, directory: &S::Label, mode: BuildMode) -> Tree<S::Label> {
        let mut tree = Tree::with_root(directory.clone());
        let entries = match self.source.list(directory) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Leaving {:?} unexpanded: {:#}", directory, err);
                return tree;
            }
        };
        debug!("Expanding {:?} ({} entries)", directory, entries.len());

        // Reserve every position in listing order before any sub-directory
        // is expanded
        let mut pending = Vec::new();
        for entry in &entries {
            if !tree.add(entry.label.clone()) {
                warn!("Skipping duplicate entry {:?} in {:?}", entry.label, directory);
                continue;
            }
            if entry.is_directory() {
                pending.push(&entry.label);
            }
        }

        let children: Vec<Tree<S::Label>> = match mode {
            BuildMode::Parallel => pending
                .into_par_iter()
                .map(|child| self.expand(child, mode))
                .collect(),
            BuildMode::Sequential => pending
                .into_iter()
                .map(|child| self.expand(child, mode))
                .collect(),
        };

        for child in &children {
            if !tree.add_tree(child) {
                warn!("Could not graft the listing of {:?} into {:?}", child.root(), directory);
            }
        }
        tree
    }
}
