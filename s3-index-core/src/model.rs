//! Data model for the in-memory folder tree.
//!
//! A listing of flat object keys is materialized into [`Folder`] and [`File`]
//! records. Folders are registered in a single flat, path-keyed registry (the
//! [`FolderTree`](crate::tree::FolderTree)); each folder carries the *paths*
//! of its children so that ordering and parent/child links stay consistent
//! with the registry.
//!
//! The canonical root sentinel is the empty string ([`ROOT_PATH`]): it is the
//! one folder path that is not separator-terminated, has no parent, and
//! denotes the top of the listed bucket.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Key separator used by the object store to form the implicit hierarchy.
pub const SEPARATOR: char = '/';

/// Canonical root sentinel: the unique folder path with no parent.
pub const ROOT_PATH: &str = "";

/// Metadata attached to a listed or fetched object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Object size in bytes.
    pub size: u64,
    /// Last-modified timestamp, passed through verbatim from the store.
    pub last_modified: Option<String>,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
}

/// A single file from the bucket listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// The full key, including the filename.
    pub path: String,
    /// Just the filename portion of the key.
    pub filename: String,
    pub size: u64,
    pub last_modified: Option<String>,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
}

impl File {
    /// Build a file record from its full key and listing metadata.
    pub fn new(path: impl Into<String>, metadata: FileMetadata) -> Self {
        let path = path.into();
        let filename = leaf_name(&path).to_string();
        File {
            path,
            filename,
            size: metadata.size,
            last_modified: metadata.last_modified,
            content_type: metadata.content_type,
            cache_control: metadata.cache_control,
        }
    }
}

/// A folder node. Children are kept in lexicographic path order so that
/// rendering is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Canonical path: separator-terminated, except the root sentinel.
    pub path: String,
    /// Trailing path segment without the separator; the root's name is the
    /// sentinel value itself.
    pub name: String,
    /// Full paths of direct child folders; the folders themselves live in
    /// the tree registry.
    pub subfolders: BTreeSet<String>,
    /// Files directly inside this folder, keyed by full key.
    pub files: BTreeMap<String, File>,
}

impl Folder {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = leaf_name(&path).to_string();
        Folder {
            path,
            name,
            subfolders: BTreeSet::new(),
            files: BTreeMap::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }
}

/// Trailing segment of a key or folder path, with any trailing separator
/// stripped. The root sentinel yields itself (the empty string).
pub fn leaf_name(path: &str) -> &str {
    let trimmed = path.strip_suffix(SEPARATOR).unwrap_or(path);
    match trimmed.rfind(SEPARATOR) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

/// Parent folder path of a folder path: the key minus its own trailing
/// separator, scanned backward for the next separator. Returns the root
/// sentinel when no further separator exists.
///
/// Callers must not pass the root sentinel itself; the builder guards on it
/// before deriving parents.
pub fn parent_path(path: &str) -> &str {
    let trimmed = path.strip_suffix(SEPARATOR).unwrap_or(path);
    match trimmed.rfind(SEPARATOR) {
        Some(pos) => &path[..=pos],
        None => ROOT_PATH,
    }
}
