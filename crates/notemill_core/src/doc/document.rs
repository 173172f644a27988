//! Document handle bound to one resolved file identity.
//!
//! # Responsibility
//! - Load content lazily, write normalized content back, and delete the
//!   underlying file with the matching cache refresh.
//! - Dispatch entry insertion to the strategy engine.
//!
//! # Invariants
//! - Content is read at most once per handle until a save replaces it.
//! - A handle is a per-caller object; concurrent use on one identifier is
//!   the caller's responsibility to serialize.

use crate::doc::entry::{self, AddEntryOptions, EntryPlacement};
use crate::doc::DocResult;
use crate::index::repository::RepositoryIndex;
use crate::model::document::DocumentInfo;
use crate::model::task::Task;
use log::info;
use std::fmt;

/// One document: resolved identity plus lazily loaded text.
///
/// The handle borrows the index for store access and cache refresh; it
/// never owns it.
pub struct Document<'a> {
    index: &'a RepositoryIndex,
    info: DocumentInfo,
    pub(crate) content: Option<String>,
    pub(crate) tasks: Option<Vec<Task>>,
}

impl<'a> Document<'a> {
    /// Binds a handle to already-resolved metadata.
    pub fn new(index: &'a RepositoryIndex, info: DocumentInfo) -> Self {
        Self {
            index,
            info,
            content: None,
            tasks: None,
        }
    }

    /// Returns the resolved metadata for this document.
    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    /// Returns the document text, reading it from the store on first
    /// access.
    pub fn content(&mut self) -> DocResult<&str> {
        self.ensure_loaded()?;
        Ok(self.content.as_deref().unwrap_or_default())
    }

    /// Writes `text` back to disk in normalized form: surrounding
    /// whitespace trimmed, exactly one trailing newline. Invalidates the
    /// cached task list.
    pub fn save(&mut self, text: &str) -> DocResult<()> {
        let normalized = normalize_content(text);
        self.index.store().write(&self.info.path, &normalized)?;
        self.content = Some(normalized);
        self.tasks = None;
        Ok(())
    }

    /// Removes the file and refreshes the index cache. Resource files
    /// refresh their subtree; everything else takes a full reload, since
    /// the cached tree is never pruned in place.
    pub fn delete(self) -> DocResult<()> {
        self.index.store().remove(&self.info.path)?;
        if self.info.is_resource {
            self.index
                .reload_subtree(&self.index.config().resources_dir)?;
        } else {
            self.index.reload_all()?;
        }
        info!(
            "event=doc_delete module=doc status=ok id={} path={}",
            self.info.id, self.info.path
        );
        Ok(())
    }

    /// Formats `text` and inserts it using the configured strategy, then
    /// saves the result.
    pub fn add_entry(&mut self, text: &str, options: &AddEntryOptions) -> DocResult<()> {
        self.ensure_loaded()?;
        let current = self.content.as_deref().unwrap_or_default();
        let formatted = options.format.render(text);

        let updated = match &options.placement {
            EntryPlacement::Prepend => entry::prepend(current, &formatted),
            EntryPlacement::Append => entry::append(current, &formatted),
            EntryPlacement::Section { header, at_top } => {
                entry::insert_in_section(current, &formatted, header, *at_top)
            }
            EntryPlacement::Chronological { timestamp } => {
                entry::insert_chronological(current, &formatted, *timestamp)
            }
        };

        self.save(&updated)
    }

    pub(crate) fn ensure_loaded(&mut self) -> DocResult<()> {
        if self.content.is_none() {
            let text = self.index.store().read(&self.info.path)?;
            self.content = Some(text);
        }
        Ok(())
    }

    /// Replaces (`Some`) or removes (`None`) one line and saves. Out of
    /// range indexes are ignored; positions come from a parse of the
    /// current content and can only go stale through our own saves.
    pub(crate) fn splice_line(
        &mut self,
        line_index: usize,
        replacement: Option<&str>,
    ) -> DocResult<()> {
        self.ensure_loaded()?;
        let current = self.content.as_deref().unwrap_or_default();
        let mut lines: Vec<&str> = current.lines().collect();
        if line_index >= lines.len() {
            return Ok(());
        }
        match replacement {
            Some(new_line) => lines[line_index] = new_line,
            None => {
                lines.remove(line_index);
            }
        }
        let updated = lines.join("\n");
        self.save(&updated)
    }
}

// Manual impl: the borrowed index guards its cache behind a lock and has
// no Debug of its own.
impl fmt::Debug for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("info", &self.info)
            .field("loaded", &self.content.is_some())
            .finish()
    }
}

/// Trims surrounding whitespace and enforces exactly one trailing newline.
pub(crate) fn normalize_content(text: &str) -> String {
    format!("{}\n", text.trim())
}

#[cfg(test)]
mod tests {
    use super::normalize_content;

    #[test]
    fn normalize_trims_and_appends_single_newline() {
        assert_eq!(normalize_content("  hello \n\n"), "hello\n");
        assert_eq!(normalize_content("hello"), "hello\n");
        assert_eq!(normalize_content("a\n\nb"), "a\n\nb\n");
    }

    #[test]
    fn normalize_empty_input_is_one_newline() {
        assert_eq!(normalize_content(""), "\n");
        assert_eq!(normalize_content("   \n "), "\n");
    }
}
