//! Hierarchical data sources the builder reads from

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::hash::Hash;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

/// Whether an entry can be expanded further
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    Leaf,
}

/// One child of a listed directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<L> {
    pub label: L,
    pub kind: EntryKind,
}

impl<L> Entry<L> {
    pub fn directory(label: L) -> Self {
        Self {
            label,
            kind: EntryKind::Directory,
        }
    }

    pub fn leaf(label: L) -> Self {
        Self {
            label,
            kind: EntryKind::Leaf,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// A hierarchy that can be listed one directory at a time
///
/// Listings are returned in the order the builder should keep; the builder
/// never sorts them itself. Implementations are shared between worker
/// threads during a parallel build.
pub trait DirectorySource: Sync {
    type Label: Clone + Eq + Hash + fmt::Debug + Send + Sync;

    /// True if `label` names something that can be listed
    fn is_directory(&self, label: &Self::Label) -> bool;

    /// Children of `label`, in order
    fn list(&self, label: &Self::Label) -> Result<Vec<Entry<Self::Label>>>;
}

/// Lists real directories; labels are full paths
#[derive(Clone, Debug)]
pub struct FsSource {
    dirs_first: bool,
}

impl Default for FsSource {
    fn default() -> Self {
        Self { dirs_first: true }
    }
}

impl FsSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep entries in `read_dir` order instead of directories first, then
    /// by name
    pub fn unsorted(mut self) -> Self {
        self.dirs_first = false;
        self
    }
}

impl DirectorySource for FsSource {
    type Label = PathBuf;

    fn is_directory(&self, label: &PathBuf) -> bool {
        label.is_dir()
    }

    fn list(&self, label: &PathBuf) -> Result<Vec<Entry<PathBuf>>> {
        let mut entries = Vec::new();
        let read = fs::read_dir(label)
            .with_context(|| format!("Failed to list {}", label.display()))?;

        for entry in read {
            let entry = entry
                .with_context(|| format!("Failed to read an entry of {}", label.display()))?;
            let file_type = entry
                .file_type()
                .with_context(|| format!("Failed to stat {}", entry.path().display()))?;

            entries.push(if file_type.is_dir() {
                Entry::directory(entry.path())
            } else {
                Entry::leaf(entry.path())
            });
        }

        // Sort children: directories first, then files, by name within each group
        if self.dirs_first {
            entries.sort_by(|a, b| match (a.kind, b.kind) {
                (EntryKind::Directory, EntryKind::Leaf) => std::cmp::Ordering::Less,
                (EntryKind::Leaf, EntryKind::Directory) => std::cmp::Ordering::Greater,
                _ => a.label.file_name().cmp(&b.label.file_name()),
            });
        }

        Ok(entries)
    }
}

/// An in-memory hierarchy: every registered label is a directory
///
/// Entries flagged as directories without a listing of their own fail to
/// list, which is how a permission error looks to the builder. Listings
/// must not form a cycle.
#[derive(Clone, Debug)]
pub struct MemorySource<L> {
    listings: HashMap<L, Vec<Entry<L>>>,
}

impl<L> Default for MemorySource<L> {
    fn default() -> Self {
        Self {
            listings: HashMap::new(),
        }
    }
}

impl<L: Clone + Eq + Hash> MemorySource<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the listing of `directory`, replacing any earlier one
    pub fn insert(&mut self, directory: L, entries: impl IntoIterator<Item = Entry<L>>) {
        self.listings.insert(directory, entries.into_iter().collect());
    }

    /// Chained form of [`MemorySource::insert`]
    pub fn with_directory(
        mut self,
        directory: L,
        entries: impl IntoIterator<Item = Entry<L>>,
    ) -> Self {
        self.insert(directory, entries);
        self
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl<L> DirectorySource for MemorySource<L>
where
    L: Clone + Eq + Hash + fmt::Debug + Send + Sync,
{
    type Label = L;

    fn is_directory(&self, label: &L) -> bool {
        self.listings.contains_key(label)
    }

    fn list(&self, label: &L) -> Result<Vec<Entry<L>>> {
        self.listings
            .get(label)
            .cloned()
            .ok_or_else(|| anyhow!("No listing for {:?}", label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(entries: &[Entry<PathBuf>]) -> Vec<String> {
        entries
            .iter()
            .map(|entry| entry.label.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_fs_source_lists_dirs_first() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::create_dir(root.join("zeta")).unwrap();
        fs::create_dir(root.join("alpha")).unwrap();

        let source = FsSource::new();
        let root = root.to_path_buf();
        assert!(source.is_directory(&root));
        assert!(!source.is_directory(&root.join("a.txt")));

        let entries = source.list(&root).unwrap();
        assert_eq!(names(&entries), vec!["alpha", "zeta", "a.txt", "b.txt"]);
        assert!(entries[0].is_directory());
        assert!(!entries[3].is_directory());
    }

    #[test]
    fn test_fs_source_missing_directory() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let err = FsSource::new().list(&missing).unwrap_err();
        assert!(err.to_string().starts_with("Failed to list"));
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new()
            .with_directory("root", [Entry::directory("locked"), Entry::leaf("file")]);

        assert_eq!(source.len(), 1);
        assert!(source.is_directory(&"root"));
        assert!(!source.is_directory(&"file"));
        assert_eq!(source.list(&"root").unwrap().len(), 2);
        assert!(source.list(&"locked").is_err());
    }
}
