//! Vault index: cached tree, flat lookup, and id resolution.
//!
//! # Responsibility
//! - Build and cache the hierarchical and flat views of all documents.
//! - Resolve canonical ids and temporal timestamps to document metadata.
//!
//! # Invariants
//! - Cached structures are replaced wholesale under a write lock; readers
//!   never observe a partially rebuilt tree.
//! - Id normalization is total and idempotent; it never touches the
//!   filesystem.

use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod canonical;
pub mod repository;

pub use repository::RepositoryIndex;

/// Result type used by index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors from index operations.
#[derive(Debug)]
pub enum IndexError {
    /// Underlying sandboxed store failure.
    Store(StoreError),
    /// No document or directory matches the id.
    NotFound { id: String },
}

impl Display for IndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::NotFound { id } => write!(f, "document not found: {id}"),
        }
    }
}

impl Error for IndexError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<StoreError> for IndexError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
