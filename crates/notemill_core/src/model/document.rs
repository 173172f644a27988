//! Document and directory-tree read models.
//!
//! # Responsibility
//! - Describe one indexed document (`DocumentInfo`) and one directory level
//!   of the cached tree (`DirectoryNode`).
//! - Stay a plain read model: construction and id derivation live in the
//!   index layer.
//!
//! # Invariants
//! - `id` is canonical and deterministic for a given `path`; distinct paths
//!   may collide on one id and collisions are not detected.
//! - `DirectoryNode` children are owned by value and keyed by the on-disk
//!   directory name; the tree contains no cycles and no parent pointers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity and placement metadata for one indexed document or directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Canonical, URL-safe identifier derived from `path`.
    pub id: String,
    /// Location relative to the vault root, forward slashes.
    pub path: String,
    /// Human display name with separators expanded to spaces.
    pub title: String,
    /// File stem (or directory name) exactly as written on disk.
    pub title_base: String,
    /// Containing directory relative to the root; empty at top level.
    pub directory_path: String,
    /// Number of directory levels below the root.
    pub depth: usize,
    /// Lives under one of the date-bucketed archive roots.
    pub is_temporal: bool,
    /// Lives under the resources tree.
    pub is_resource: bool,
    /// Entry describes a directory rather than a file.
    pub is_directory: bool,
}

/// One level of the cached directory tree.
///
/// Rebuilt wholesale by a full reload and per-subtree by a partial reload;
/// the only in-place mutation is splicing in a freshly created file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    /// Directory name as written on disk; empty for the root node.
    pub name: String,
    /// Documents directly contained in this directory, ordered by path.
    pub files: Vec<DocumentInfo>,
    /// Child directories keyed by on-disk name.
    pub children: BTreeMap<String, DirectoryNode>,
}

impl DirectoryNode {
    /// Creates an empty node for one directory name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    /// Returns the child for `name`, creating an empty one when absent.
    pub fn ensure_child(&mut self, name: &str) -> &mut DirectoryNode {
        self.children
            .entry(name.to_string())
            .or_insert_with(|| DirectoryNode::new(name))
    }

    /// Total number of files in this node and all descendants.
    pub fn total_files(&self) -> usize {
        self.files.len()
            + self
                .children
                .values()
                .map(DirectoryNode::total_files)
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::DirectoryNode;

    #[test]
    fn ensure_child_creates_once() {
        let mut root = DirectoryNode::new("");
        root.ensure_child("resources");
        root.ensure_child("resources");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children["resources"].name, "resources");
    }

    #[test]
    fn total_files_counts_descendants() {
        let mut root = DirectoryNode::new("");
        let child = root.ensure_child("daily");
        let year = child.ensure_child("2025");
        year.files.push(crate::model::document::DocumentInfo {
            id: "daily/2025/09-september".to_string(),
            path: "daily/2025/09-september.md".to_string(),
            title: "09 september".to_string(),
            title_base: "09-september".to_string(),
            directory_path: "daily/2025".to_string(),
            depth: 2,
            is_temporal: true,
            is_resource: false,
            is_directory: false,
        });
        assert_eq!(root.total_files(), 1);
    }
}
