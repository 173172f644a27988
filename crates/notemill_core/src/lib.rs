//! Core domain logic for Notemill.
//! This crate is the single source of truth for vault invariants.

pub mod doc;
pub mod index;
pub mod logging;
pub mod model;
pub mod store;

pub use doc::document::Document;
pub use doc::entry::{AddEntryOptions, EntryFormat, EntryPlacement};
pub use doc::{DocError, DocResult};
pub use index::canonical::{canonical_id, title_from_stem, FALLBACK_DOC_ID};
pub use index::repository::RepositoryIndex;
pub use index::{IndexError, IndexResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::config::{VaultConfig, VaultConfigOverrides};
pub use model::document::{DirectoryNode, DocumentInfo};
pub use model::task::Task;
pub use store::sandbox::SandboxedStore;
pub use store::{StoreEntry, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
