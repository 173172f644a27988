//! Checkbox task read model.
//!
//! # Responsibility
//! - Describe one checkbox line extracted from document text, with the raw
//!   fragments needed to reconstruct that line.
//!
//! # Invariants
//! - `id` is the 1-based rank among matching lines in top-to-bottom scan
//!   order; it shifts whenever an earlier line is added or removed.
//! - A `Task` is a snapshot: it stays valid only until the next save of the
//!   owning document.

use serde::{Deserialize, Serialize};

/// One checkbox task line, addressed positionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// 1-based ordinal in scan order. Not stable across edits.
    pub id: usize,
    /// Label text with surrounding whitespace trimmed. Includes any
    /// `@done(...)` tag.
    pub label: String,
    /// Checkbox state, derived from `state`.
    pub is_checked: bool,
    /// Zero-based line number in the document text.
    pub line_index: usize,
    /// Bullet and indentation before the checkbox, as written.
    pub prefix: String,
    /// Checkbox state character as written: ` `, `x`, or `X`.
    pub state: char,
    /// Raw text after the closing bracket, as written.
    pub suffix: String,
}

impl Task {
    /// Reconstructs the source line from the stored fragments.
    pub fn line(&self) -> String {
        format!("{}[{}]{}", self.prefix, self.state, self.suffix)
    }
}
