use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rayon::ThreadPoolBuilder;
use tempfile::TempDir;
use tree_builder::{BuilderOptions, DirectorySource, Entry, FsSource, MemorySource, TreeBuilder};

fn create_test_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src/tree")).unwrap();
    fs::create_dir(root.join("docs")).unwrap();
    fs::write(root.join("Cargo.toml"), "[package]").unwrap();
    fs::write(root.join("src/lib.rs"), "").unwrap();
    fs::write(root.join("src/tree/mod.rs"), "").unwrap();
    fs::write(root.join("src/tree/node.rs"), "").unwrap();
    temp
}

fn file_name(path: &PathBuf) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[test]
fn test_filesystem_build() {
    let temp = create_test_dir();
    let root = temp.path().to_path_buf();

    let report = TreeBuilder::new(FsSource::new()).build(root.clone());
    assert!(report.is_ok());

    let tree = report.tree;
    assert_eq!(tree.root(), Some(&root));
    assert_eq!(tree.len(), 8);
    assert!(tree.contains(&root.join("src/tree/node.rs")));
    assert_eq!(tree.level(&root.join("src/tree/mod.rs")), Some(3));

    let mut rendered = tree.render_with(file_name);
    let root_name = file_name(&root);
    rendered.replace_range(..root_name.len(), "root");
    assert_eq!(
        rendered,
        [
            "root",
            "├───docs",
            "├───src",
            "│   ├───tree",
            "│   │   ├───mod.rs",
            "│   │   └───node.rs",
            "│   └───lib.rs",
            "└───Cargo.toml",
        ]
        .join("\n")
    );
}

#[test]
fn test_sequential_matches_parallel_on_disk() {
    let temp = create_test_dir();
    let root = temp.path().to_path_buf();

    let parallel = TreeBuilder::new(FsSource::new())
        .with_options(BuilderOptions::new().threads(4))
        .build(root.clone());
    let sequential = TreeBuilder::new(FsSource::new())
        .with_options(BuilderOptions::new().sequential())
        .build(root);

    assert_eq!(parallel.tree, sequential.tree);
}

#[test]
fn test_non_directory_root() {
    let temp = create_test_dir();
    let file = temp.path().join("Cargo.toml");

    let report = TreeBuilder::new(FsSource::new()).build(file);
    assert!(report.tree.is_empty());
    assert_eq!(report.attempts, 0);
    assert!(report.error.unwrap().to_string().contains("is not a directory"));

    let missing_root = Path::new("/definitely/not/here").to_path_buf();
    let missing = TreeBuilder::new(FsSource::new()).build(missing_root);
    assert!(missing.tree.is_empty());
    assert!(!missing.is_ok());
}

#[test]
fn test_failed_listing_leaves_directory_as_leaf() {
    let source = MemorySource::new()
        .with_directory("root", [Entry::directory("locked"), Entry::directory("open")])
        .with_directory("open", [Entry::leaf("inside")]);

    let report = TreeBuilder::new(source).build("root");
    assert!(report.is_ok());
    assert!(report.tree.is_leaf(&"locked"));
    assert_eq!(
        report.tree.render(),
        "root\n├───locked\n└───open\n    └───inside"
    );
}

#[test]
fn test_retry_uses_fallback_pool() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let source = MemorySource::new()
        .with_directory("root", [Entry::directory("a"), Entry::leaf("b")])
        .with_directory("a", [Entry::leaf("c")]);

    let report = TreeBuilder::new(source)
        .with_options(BuilderOptions::new().threads(1).fallback_threads(2))
        .with_pool_factory(move |threads| {
            if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(anyhow!("pool exhausted"));
            }
            Ok(ThreadPoolBuilder::new().num_threads(threads).build()?)
        })
        .build("root");

    assert!(report.is_ok());
    assert_eq!(report.attempts, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(report.tree.to_vec(), vec!["root", "a", "c", "b"]);
}

#[test]
fn test_both_attempts_fail() {
    let source = MemorySource::new().with_directory("root", [Entry::leaf("a")]);
    let report = TreeBuilder::new(source)
        .with_pool_factory(|_| Err(anyhow!("pool exhausted")))
        .build("root");

    assert_eq!(report.attempts, 2);
    assert!(report.tree.is_empty());
    let message = format!("{:#}", report.error.unwrap());
    assert!(message.contains("pool exhausted"));
}

#[test]
fn test_sequential_mode_never_touches_pools() {
    let source = MemorySource::new().with_directory("root", [Entry::leaf("a")]);
    let report = TreeBuilder::new(source)
        .with_options(BuilderOptions::new().sequential())
        .with_pool_factory(|_| Err(anyhow!("unused")))
        .build("root");

    assert!(report.is_ok());
    assert_eq!(report.attempts, 1);
    assert_eq!(report.tree.to_vec(), vec!["root", "a"]);
}

/// Delays the listing of one directory so its siblings finish first
struct SlowListing {
    inner: MemorySource<u32>,
    slow: u32,
}

impl DirectorySource for SlowListing {
    type Label = u32;

    fn is_directory(&self, label: &u32) -> bool {
        self.inner.is_directory(label)
    }

    fn list(&self, label: &u32) -> anyhow::Result<Vec<Entry<u32>>> {
        if *label == self.slow {
            thread::sleep(Duration::from_millis(200));
        }
        self.inner.list(label)
    }
}

#[test]
fn test_listing_order_survives_late_sibling() {
    let inner = MemorySource::new()
        .with_directory(0, [Entry::directory(1), Entry::directory(2), Entry::leaf(9)])
        .with_directory(1, [Entry::leaf(10)])
        .with_directory(2, [Entry::leaf(20)]);

    let report = TreeBuilder::new(SlowListing { inner, slow: 1 })
        .with_options(BuilderOptions::new().threads(4))
        .build(0);

    assert!(report.is_ok());
    assert_eq!(report.tree.to_vec(), vec![0, 1, 10, 2, 20, 9]);
    assert_eq!(
        report.tree.render(),
        "0\n├───1\n│   └───10\n├───2\n│   └───20\n└───9"
    );
}

/// Random hierarchy: directory `i` lists the entries whose parent pick is `i`
fn memory_source(parents: &[(prop::sample::Index, bool)]) -> MemorySource<u32> {
    let mut directories: Vec<Vec<Entry<u32>>> = vec![Vec::new()];
    let mut is_directory = vec![true];

    for (offset, (pick, directory)) in parents.iter().enumerate() {
        let label = offset as u32 + 1;
        let candidates: Vec<usize> = (0..directories.len())
            .filter(|&i| is_directory[i])
            .collect();
        let parent = candidates[pick.index(candidates.len())];
        directories[parent].push(if *directory {
            Entry::directory(label)
        } else {
            Entry::leaf(label)
        });
        directories.push(Vec::new());
        is_directory.push(*directory);
    }

    let mut source = MemorySource::new();
    for (label, entries) in directories.into_iter().enumerate() {
        if is_directory[label] {
            source.insert(label as u32, entries);
        }
    }
    source
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sequential_equals_parallel(
        parents in prop::collection::vec((any::<prop::sample::Index>(), any::<bool>()), 0..60)
    ) {
        let source = memory_source(&parents);

        let parallel = TreeBuilder::new(source.clone())
            .with_options(BuilderOptions::new().threads(3))
            .build(0);
        let sequential = TreeBuilder::new(source)
            .with_options(BuilderOptions::new().sequential())
            .build(0);

        prop_assert!(parallel.is_ok());
        prop_assert_eq!(parallel.tree.len(), parents.len() + 1);
        prop_assert_eq!(parallel.tree, sequential.tree);
    }
}
