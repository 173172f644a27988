//! Scoped filesystem handle rooted at one vault directory.
//!
//! # Responsibility
//! - Resolve caller paths strictly inside the root and perform the basic
//!   file operations on the resolved location.
//!
//! # Invariants
//! - `..`, absolute paths, and symlink targets outside the root are
//!   rejected with `StoreError::Escape`.
//! - Resolution runs from scratch on every call, so the boundary holds even
//!   when the root is moved or altered out-of-band between calls.
//! - `walk` ignores symlinked entries entirely; per-path operations resolve
//!   symlinks and re-check the boundary instead.

use crate::store::{StoreEntry, StoreError, StoreResult};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Path-safe file operations scoped to one root directory.
///
/// The handle itself stores only the root path. Each operation opens,
/// validates, and releases everything it needs within the call.
#[derive(Debug, Clone)]
pub struct SandboxedStore {
    root: PathBuf,
}

impl SandboxedStore {
    /// Creates a store scoped to `root`. The directory may not exist yet;
    /// call [`SandboxedStore::ensure_root`] before first use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the configured root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root directory if it is missing.
    pub fn ensure_root(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.root)
            .map_err(|err| StoreError::io("create root", self.root.to_string_lossy(), err))
    }

    /// Resolves a root-relative path to an absolute location inside the
    /// root, re-validating the sandbox boundary from the live filesystem.
    ///
    /// # Errors
    /// - `Escape` for `..` components, absolute paths, or any resolution
    ///   (including symlinks) landing outside the root.
    pub fn resolve(&self, path: &str) -> StoreResult<PathBuf> {
        let rel = Path::new(path);

        // Reject escapes that are visible before any filesystem access.
        for component in rel.components() {
            match component {
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(StoreError::Escape {
                        path: path.to_string(),
                    });
                }
                Component::CurDir | Component::Normal(_) => {}
            }
        }

        let joined = self.root.join(rel);

        // An existing target canonicalizes directly; otherwise canonicalize
        // the nearest existing ancestor and re-append the remainder.
        let resolved = if joined.exists() {
            joined
                .canonicalize()
                .map_err(|err| StoreError::io("canonicalize", path, err))?
        } else {
            match joined.parent() {
                Some(parent) if parent.exists() => {
                    let file_name = joined.file_name().ok_or_else(|| StoreError::Escape {
                        path: path.to_string(),
                    })?;
                    parent
                        .canonicalize()
                        .map_err(|err| StoreError::io("canonicalize", path, err))?
                        .join(file_name)
                }
                _ => {
                    let canon_root = self.canonical_root()?;
                    let remainder = joined.strip_prefix(&self.root).unwrap_or(rel);
                    canon_root.join(remainder)
                }
            }
        };

        let canon_root = self.canonical_root()?;
        if !resolved.starts_with(&canon_root) {
            return Err(StoreError::Escape {
                path: path.to_string(),
            });
        }

        Ok(resolved)
    }

    /// Reads the file at `path` as UTF-8 text.
    pub fn read(&self, path: &str) -> StoreResult<String> {
        let resolved = self.resolve(path)?;
        fs::read_to_string(resolved).map_err(|err| StoreError::from_io("read", path, err))
    }

    /// Writes `contents` to `path`, creating the file when absent.
    ///
    /// Parent directories are not created implicitly; use
    /// [`SandboxedStore::mkdir_all`] first for nested targets.
    pub fn write(&self, path: &str, contents: &str) -> StoreResult<()> {
        let resolved = self.resolve(path)?;
        fs::write(resolved, contents).map_err(|err| StoreError::io("write", path, err))
    }

    /// Returns whether `path` currently exists inside the root.
    pub fn exists(&self, path: &str) -> StoreResult<bool> {
        let resolved = self.resolve(path)?;
        Ok(resolved.exists())
    }

    /// Returns filesystem metadata for `path`.
    pub fn stat(&self, path: &str) -> StoreResult<fs::Metadata> {
        let resolved = self.resolve(path)?;
        fs::metadata(resolved).map_err(|err| StoreError::from_io("stat", path, err))
    }

    /// Creates the directory at `path` together with missing ancestors.
    pub fn mkdir_all(&self, path: &str) -> StoreResult<()> {
        let resolved = self.resolve(path)?;
        fs::create_dir_all(resolved).map_err(|err| StoreError::io("mkdir", path, err))
    }

    /// Removes the file at `path`.
    pub fn remove(&self, path: &str) -> StoreResult<()> {
        let resolved = self.resolve(path)?;
        fs::remove_file(resolved).map_err(|err| StoreError::from_io("remove", path, err))
    }

    /// Removes the directory at `path` with everything below it.
    pub fn remove_all(&self, path: &str) -> StoreResult<()> {
        let resolved = self.resolve(path)?;
        fs::remove_dir_all(resolved).map_err(|err| StoreError::from_io("remove", path, err))
    }

    /// Lists the immediate children of the directory at `path`, sorted by
    /// name.
    pub fn list_dir(&self, path: &str) -> StoreResult<Vec<StoreEntry>> {
        let resolved = self.resolve(path)?;
        let entries = fs::read_dir(resolved).map_err(|err| StoreError::from_io("list", path, err))?;

        let mut items = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| StoreError::io("list", path, err))?;
            let file_type = entry
                .file_type()
                .map_err(|err| StoreError::io("list", path, err))?;
            items.push(StoreEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir: file_type.is_dir(),
            });
        }
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    /// Recursively lists all files under `path` as root-relative,
    /// forward-slash paths in sorted order. Symlinked entries are skipped.
    pub fn walk(&self, path: &str) -> StoreResult<Vec<String>> {
        let start = self.resolve(path)?;
        let canon_root = self.canonical_root()?;
        let mut found = Vec::new();
        collect_files(&start, &canon_root, path, &mut found)?;
        found.sort();
        Ok(found)
    }

    fn canonical_root(&self) -> StoreResult<PathBuf> {
        self.root
            .canonicalize()
            .map_err(|err| StoreError::io("canonicalize root", self.root.to_string_lossy(), err))
    }
}

fn collect_files(
    dir: &Path,
    canon_root: &Path,
    context: &str,
    out: &mut Vec<String>,
) -> StoreResult<()> {
    let entries = fs::read_dir(dir).map_err(|err| StoreError::from_io("walk", context, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| StoreError::io("walk", context, err))?;
        let file_type = entry
            .file_type()
            .map_err(|err| StoreError::io("walk", context, err))?;
        // file_type() does not follow symlinks, so links fall through both
        // branches and are skipped.
        if file_type.is_dir() {
            collect_files(&entry.path(), canon_root, context, out)?;
        } else if file_type.is_file() {
            out.push(relative_string(&entry.path(), canon_root));
        }
    }
    Ok(())
}

fn relative_string(abs: &Path, canon_root: &Path) -> String {
    let rel = abs.strip_prefix(canon_root).unwrap_or(abs);
    rel.to_string_lossy().replace('\\', "/")
}
