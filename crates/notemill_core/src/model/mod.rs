//! Vault domain model.
//!
//! # Responsibility
//! - Define canonical data structures shared by index and document layers.
//! - Keep records free of filesystem and cache concerns.
//!
//! # Invariants
//! - `DocumentInfo::id` is a pure function of `DocumentInfo::path`.
//! - `DirectoryNode` owns its children by value; there are no parent links.
//! - `Task` identity is positional and valid only until the next save.

pub mod config;
pub mod document;
pub mod task;
