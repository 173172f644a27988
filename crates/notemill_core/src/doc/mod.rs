//! Document handles and text mutation engines.
//!
//! # Responsibility
//! - Bind one resolved document identity to lazily loaded text.
//! - Provide the entry-insertion strategies and the positional task
//!   operations over that text.
//!
//! # Invariants
//! - Every save trims the document and enforces exactly one trailing
//!   newline, then invalidates the cached task list.
//! - Malformed section headers and task lines are treated as absent, never
//!   as errors.

use crate::index::IndexError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod document;
pub mod entry;
pub mod tasks;

pub use document::Document;

/// Result type used by document operations.
pub type DocResult<T> = Result<T, DocError>;

/// Errors from document and task operations.
#[derive(Debug)]
pub enum DocError {
    /// Underlying sandboxed store failure.
    Store(StoreError),
    /// Index lookup or refresh failure.
    Index(IndexError),
    /// Ordinal outside the current task list.
    TaskNotFound { ordinal: usize, count: usize },
}

impl Display for DocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Index(err) => write!(f, "{err}"),
            Self::TaskNotFound { ordinal, count } => {
                write!(f, "task not found: ordinal {ordinal} outside 1..={count}")
            }
        }
    }
}

impl Error for DocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Index(err) => Some(err),
            Self::TaskNotFound { .. } => None,
        }
    }
}

impl From<StoreError> for DocError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<IndexError> for DocError {
    fn from(value: IndexError) -> Self {
        Self::Index(value)
    }
}
