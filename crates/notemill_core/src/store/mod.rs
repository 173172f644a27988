//! Sandboxed filesystem access for the vault root.
//!
//! # Responsibility
//! - Provide path-escape-proof file operations scoped to one directory.
//! - Wrap I/O failures with operation and path context.
//!
//! # Invariants
//! - Every operation re-resolves and re-validates the boundary against the
//!   live filesystem; no resolved path is cached across calls.
//! - Escape attempts fail before any filesystem mutation happens.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod sandbox;

pub use sandbox::SandboxedStore;

/// Result type used by store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from sandboxed store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Path resolution would leave the vault root.
    Escape { path: String },
    /// Target path does not exist.
    NotFound { path: String },
    /// Underlying filesystem failure with operation context.
    Io {
        op: &'static str,
        path: String,
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(op: &'static str, path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Maps missing-target I/O failures to `NotFound`, keeping context for
    /// everything else.
    pub(crate) fn from_io(op: &'static str, path: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound {
                path: path.to_string(),
            };
        }
        Self::io(op, path, source)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Escape { path } => write!(f, "path `{path}` escapes the vault root"),
            Self::NotFound { path } => write!(f, "no such path in vault: `{path}`"),
            Self::Io { op, path, source } => write!(f, "{op} failed for `{path}`: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Escape { .. } => None,
            Self::NotFound { .. } => None,
        }
    }
}

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    /// Entry name without any path component.
    pub name: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}
