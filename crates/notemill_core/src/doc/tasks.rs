//! Checkbox task extraction and mutation over one document's text.
//!
//! # Responsibility
//! - Parse the task grammar out of document lines into ordinal-addressed
//!   [`Task`] views.
//! - Rewrite single task lines for toggle, relabel, and delete.
//! - Partition completed tasks out of the text for archival.
//!
//! # Invariants
//! - Ordinals are 1-based scan-order ranks, valid only until the next
//!   save; structural edits renumber everything after them.
//! - Lines that almost match the grammar are ordinary text, not errors.
//! - Checking a task stamps a `@done(YYYY-MM-DD)` tag; unchecking strips
//!   it.
//!
//! # See also
//! - [`crate::doc::document`] for the save path that drops the cached
//!   list.

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::doc::document::Document;
use crate::doc::{DocError, DocResult};
use crate::model::task::Task;

/// Date stamp carried by `@done` tags.
const DONE_DATE_FORMAT: &str = "%Y-%m-%d";

static TASK_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*[-*]\s+)\[([ xX])\](.*)$").expect("valid task line regex"));

static DONE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*@done\([^)]*\)").expect("valid done tag regex"));

impl Document<'_> {
    /// All tasks in the current content, in scan order.
    pub fn tasks(&mut self) -> DocResult<&[Task]> {
        self.ensure_tasks()?;
        Ok(self.tasks.as_deref().unwrap_or_default())
    }

    /// Looks up one task by its 1-based ordinal.
    pub fn get_task(&mut self, ordinal: usize) -> DocResult<Task> {
        self.ensure_tasks()?;
        let tasks = self.tasks.as_deref().unwrap_or_default();
        tasks
            .get(ordinal.wrapping_sub(1))
            .cloned()
            .ok_or(DocError::TaskNotFound {
                ordinal,
                count: tasks.len(),
            })
    }

    /// Flips a task between unchecked and checked and saves.
    ///
    /// Checking appends a dated `@done` tag unless the label already has
    /// one; unchecking strips any tag. Returns the task re-read from the
    /// saved content.
    pub fn toggle_task(&mut self, ordinal: usize) -> DocResult<Task> {
        let task = self.get_task(ordinal)?;
        let line = if task.is_checked {
            format!("{}[ ]{}", task.prefix, DONE_TAG_RE.replace_all(&task.suffix, ""))
        } else {
            let suffix = if DONE_TAG_RE.is_match(&task.suffix) {
                task.suffix.clone()
            } else {
                format!("{} {}", task.suffix.trim_end(), done_tag())
            };
            format!("{}[x]{}", task.prefix, suffix)
        };
        self.splice_line(task.line_index, Some(&line))?;
        self.get_task(ordinal)
    }

    /// Replaces a task's label and saves.
    ///
    /// A checked task keeps a `@done` tag: when the new label lacks one,
    /// today's is appended.
    pub fn update_task_label(&mut self, ordinal: usize, new_label: &str) -> DocResult<Task> {
        let task = self.get_task(ordinal)?;
        let mut label = new_label.trim().to_string();
        if task.is_checked && !DONE_TAG_RE.is_match(&label) {
            label = format!("{} {}", label, done_tag());
        }
        let line = format!("{}[{}] {}", task.prefix, task.state, label);
        self.splice_line(task.line_index, Some(&line))?;
        self.get_task(ordinal)
    }

    /// Removes a task's line entirely and saves. Later ordinals shift
    /// down by one.
    pub fn delete_task(&mut self, ordinal: usize) -> DocResult<()> {
        let task = self.get_task(ordinal)?;
        self.splice_line(task.line_index, None)
    }

    /// Removes every checked task from the content and returns the
    /// archive lines (`- ✓ <label>`) for the caller to place elsewhere.
    ///
    /// Nothing is written when no task is checked. This never touches
    /// any other document.
    pub fn archive_completed_tasks(&mut self) -> DocResult<Vec<String>> {
        self.ensure_loaded()?;
        let current = self.content.as_deref().unwrap_or_default();
        let mut kept: Vec<&str> = Vec::new();
        let mut archived: Vec<String> = Vec::new();
        for line in current.lines() {
            match TASK_LINE_RE.captures(line) {
                Some(caps) if &caps[2] != " " => {
                    archived.push(format!("- ✓ {}", caps[3].trim()));
                }
                _ => kept.push(line),
            }
        }
        if archived.is_empty() {
            return Ok(archived);
        }
        let remaining = kept.join("\n");
        self.save(&remaining)?;
        log::info!(
            "event=tasks_archived module=doc status=ok id={} count={}",
            self.info().id,
            archived.len()
        );
        Ok(archived)
    }

    fn ensure_tasks(&mut self) -> DocResult<()> {
        self.ensure_loaded()?;
        if self.tasks.is_none() {
            let parsed = parse_tasks(self.content.as_deref().unwrap_or_default());
            self.tasks = Some(parsed);
        }
        Ok(())
    }
}

fn parse_tasks(content: &str) -> Vec<Task> {
    let mut tasks = Vec::new();
    for (line_index, line) in content.lines().enumerate() {
        if let Some(caps) = TASK_LINE_RE.captures(line) {
            let state = caps[2].chars().next().unwrap_or(' ');
            tasks.push(Task {
                id: tasks.len() + 1,
                label: caps[3].trim().to_string(),
                is_checked: state != ' ',
                line_index,
                prefix: caps[1].to_string(),
                state,
                suffix: caps[3].to_string(),
            });
        }
    }
    tasks
}

fn done_tag() -> String {
    format!("@done({})", Local::now().format(DONE_DATE_FORMAT))
}
