//! Tree materialization: flat, paginated key listings into a folder tree.
//!
//! [`TreeBuilder`] ingests listed entries one at a time, in listing order,
//! and materializes every folder on the ancestor chain of each key. The
//! finished [`FolderTree`] depends only on the overall key set, never on how
//! the listing was split into pages, and ingesting the same key twice leaves
//! the tree unchanged.
//!
//! # Responsibilities
//! - Materialize folders and all their ancestors ("ensure folder exists")
//! - Attach files to their parent folder, keyed by full key
//! - Normalize malformed keys (no separator) as direct children of the root
//!
//! # Error Handling
//! Ingestion performs no I/O and cannot fail; structurally odd keys are
//! silently normalized rather than rejected.
//!
//! # Navigation
//! - Entrypoints: [`TreeBuilder::ingest`], [`TreeBuilder::into_tree`]
//! - Read side: [`FolderTree::folders`], [`FolderTree::get`]

use std::collections::BTreeMap;

use tracing::trace;

use crate::model::{parent_path, File, FileMetadata, Folder, ROOT_PATH, SEPARATOR};

/// The finished folder tree: a flat registry of folders keyed by canonical
/// path, in lexicographic order. Built once per run, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderTree {
    folders: BTreeMap<String, Folder>,
}

impl FolderTree {
    pub fn get(&self, path: &str) -> Option<&Folder> {
        self.folders.get(path)
    }

    /// The root folder. Always present: the builder registers it up front.
    pub fn root(&self) -> Option<&Folder> {
        self.folders.get(ROOT_PATH)
    }

    /// All folders in path order.
    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders.values()
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

/// Builds a [`FolderTree`] from a stream of listed entries. Each builder
/// owns an independent tree; there is no shared or global registry.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: FolderTree,
}

impl TreeBuilder {
    /// Create a builder with the root folder already registered, so that an
    /// empty listing still yields a renderable root.
    pub fn new() -> Self {
        let mut builder = TreeBuilder {
            tree: FolderTree::default(),
        };
        builder
            .tree
            .folders
            .insert(ROOT_PATH.to_string(), Folder::new(ROOT_PATH));
        builder
    }

    /// Register one listed entry.
    ///
    /// Folder markers (separator-terminated keys with no further content)
    /// materialize the folder itself plus all ancestors. File keys are split
    /// at the last separator into parent path and filename; a key without a
    /// separator belongs directly to the root.
    pub fn ingest(&mut self, key: &str, is_folder_marker: bool, metadata: Option<FileMetadata>) {
        if is_folder_marker {
            trace!(key, "ingesting folder marker");
            self.ensure_folder(key);
            return;
        }

        let parent = match key.rfind(SEPARATOR) {
            Some(pos) => &key[..=pos],
            None => ROOT_PATH,
        };
        trace!(key, parent, "ingesting file");
        self.ensure_folder(parent);
        let file = File::new(key, metadata.unwrap_or_default());
        if let Some(folder) = self.tree.folders.get_mut(parent) {
            // Re-insertion of the same key is a no-op.
            folder.files.entry(key.to_string()).or_insert(file);
        }
    }

    /// Finish building and hand over the tree.
    pub fn into_tree(self) -> FolderTree {
        self.tree
    }

    /// Materialize the folder at `path` and every missing ancestor.
    ///
    /// The recursion terminates on the root sentinel by equality check
    /// *before* any parent-path derivation is attempted; substring
    /// arithmetic on an already-minimal path would otherwise loop.
    fn ensure_folder(&mut self, path: &str) {
        if self.tree.folders.contains_key(path) {
            return;
        }
        trace!(path, "materializing folder");
        self.tree
            .folders
            .insert(path.to_string(), Folder::new(path));

        if path == ROOT_PATH {
            return;
        }
        let parent = parent_path(path).to_string();
        self.ensure_folder(&parent);
        if let Some(folder) = self.tree.folders.get_mut(parent.as_str()) {
            folder.subfolders.insert(path.to_string());
        }
    }
}
