//! Entry formatting and the four insertion strategies.
//!
//! # Responsibility
//! - Render caller text through the entry formatters.
//! - Place formatted entries: prepend, append, section-targeted, or merged
//!   into the descending date-header sequence.
//!
//! # Invariants
//! - Chronological insertion keeps `##` date headers strictly descending
//!   with at most one header per distinct day.
//! - A line that fails to parse as a date header is ordinary content, not
//!   an error.
//! - All placement functions are pure text transforms; persistence happens
//!   in the document layer.

use chrono::{DateTime, Local, NaiveDate};

/// Weekday-name day headers as written to documents: non-padded day.
const DATE_HEADER_FORMAT_OUT: &str = "%A, %B %-d, %Y";
/// Accepts padded and non-padded days on the way back in.
const DATE_HEADER_FORMAT_IN: &str = "%A, %B %d, %Y";
/// Sub-header used by timestamp blocks.
const TIME_HEADER_FORMAT: &str = "%H:%M";

const FRONT_MATTER_FENCE: &str = "---";

/// How an entry is placed into the document.
#[derive(Debug, Clone)]
pub enum EntryPlacement {
    /// Entry becomes the first line.
    Prepend,
    /// Entry becomes the last line.
    Append,
    /// Entry lands inside the named section, creating it when missing.
    Section { header: String, at_top: bool },
    /// Entry lands under the date header for `timestamp`, maintaining
    /// descending date order.
    Chronological { timestamp: DateTime<Local> },
}

/// How caller text is rendered before placement.
#[derive(Debug, Clone)]
pub enum EntryFormat {
    /// Plain line, as given.
    Note,
    /// Unchecked task-list line.
    Task,
    /// `### HH:MM` sub-header, blank line, then the text.
    TimestampBlock { timestamp: DateTime<Local> },
}

impl EntryFormat {
    /// Renders `text` in this format.
    pub fn render(&self, text: &str) -> String {
        match self {
            Self::Note => text.trim().to_string(),
            Self::Task => format!("- [ ] {}", text.trim()),
            Self::TimestampBlock { timestamp } => format!(
                "### {}\n\n{}",
                timestamp.format(TIME_HEADER_FORMAT),
                text.trim()
            ),
        }
    }
}

/// Strategy plus formatter for one `add_entry` call.
#[derive(Debug, Clone)]
pub struct AddEntryOptions {
    pub placement: EntryPlacement,
    pub format: EntryFormat,
}

impl AddEntryOptions {
    pub fn prepend(format: EntryFormat) -> Self {
        Self {
            placement: EntryPlacement::Prepend,
            format,
        }
    }

    pub fn append(format: EntryFormat) -> Self {
        Self {
            placement: EntryPlacement::Append,
            format,
        }
    }

    pub fn section(header: impl Into<String>, at_top: bool, format: EntryFormat) -> Self {
        Self {
            placement: EntryPlacement::Section {
                header: header.into(),
                at_top,
            },
            format,
        }
    }

    pub fn chronological(timestamp: DateTime<Local>, format: EntryFormat) -> Self {
        Self {
            placement: EntryPlacement::Chronological { timestamp },
            format,
        }
    }
}

/// Inserts the entry as the new first line.
pub fn prepend(current: &str, entry: &str) -> String {
    if current.trim().is_empty() {
        return entry.to_string();
    }
    format!("{entry}\n{current}")
}

/// Inserts the entry as the new last line.
pub fn append(current: &str, entry: &str) -> String {
    let trimmed = current.trim_end();
    if trimmed.is_empty() {
        return entry.to_string();
    }
    format!("{trimmed}\n{entry}")
}

/// Inserts the entry inside the section whose header line equals `header`
/// after trimming.
///
/// When the section exists, the entry lands immediately under the header
/// (`at_top`) or after its last content line. When it does not, the
/// section is synthesized after any front matter and the first `#` title;
/// a blank header falls back to prepending.
pub fn insert_in_section(current: &str, entry: &str, header: &str, at_top: bool) -> String {
    let target = header.trim();
    if target.is_empty() {
        return prepend(current, entry);
    }

    let lines: Vec<&str> = current.lines().collect();
    match lines.iter().position(|line| line.trim() == target) {
        Some(header_idx) => {
            let section_end = next_section_start(&lines, header_idx + 1);
            let insert_at = if at_top {
                header_idx + 1
            } else {
                let mut at = section_end;
                while at > header_idx + 1 && lines[at - 1].trim().is_empty() {
                    at -= 1;
                }
                at
            };
            splice_lines(&lines, insert_at, &[entry])
        }
        None => {
            let at = body_start(&lines);
            let mut insertion: Vec<&str> = Vec::new();
            if at > 0 && !lines[at - 1].trim().is_empty() {
                insertion.push("");
            }
            insertion.push(target);
            insertion.push(entry);
            if at < lines.len() && !lines[at].trim().is_empty() {
                insertion.push("");
            }
            splice_lines(&lines, at, &insertion)
        }
    }
}

/// Merges the entry into the descending sequence of date headers.
///
/// An existing header for the entry's date is reused, so each day appears
/// exactly once. Otherwise a new header is inserted directly above the
/// first older header. When every header is newer, or none exist, the new
/// day section goes to the bottom of the file.
pub fn insert_chronological(current: &str, entry: &str, timestamp: DateTime<Local>) -> String {
    let date = timestamp.date_naive();
    let lines: Vec<&str> = current.lines().collect();
    let zone_start = body_start(&lines);

    let mut headers: Vec<(usize, NaiveDate)> = Vec::new();
    for (idx, line) in lines.iter().enumerate().skip(zone_start) {
        if let Some(parsed) = parse_date_header(line) {
            headers.push((idx, parsed));
        }
    }

    if let Some(&(header_idx, _)) = headers.iter().find(|(_, day)| *day == date) {
        let section_end = next_section_start(&lines, header_idx + 1);
        let mut first_content = header_idx + 1;
        while first_content < section_end && lines[first_content].trim().is_empty() {
            first_content += 1;
        }
        return if first_content < section_end {
            // Newest entry goes on top, separated from what follows.
            splice_lines(&lines, first_content, &[entry, ""])
        } else {
            splice_lines(&lines, header_idx + 1, &["", entry])
        };
    }

    let header_line = format_date_header(date);
    if let Some(&(older_idx, _)) = headers.iter().find(|(_, day)| *day < date) {
        let mut insertion: Vec<&str> = Vec::new();
        if older_idx > 0 && !lines[older_idx - 1].trim().is_empty() {
            insertion.push("");
        }
        insertion.extend([header_line.as_str(), "", entry, ""]);
        return splice_lines(&lines, older_idx, &insertion);
    }

    // No header is older: this day ranks below everything present.
    let mut end = lines.len();
    while end > 0 && lines[end - 1].trim().is_empty() {
        end -= 1;
    }
    let mut out: Vec<&str> = Vec::with_capacity(end + 4);
    out.extend_from_slice(&lines[..end]);
    if end > 0 {
        out.push("");
    }
    out.push(header_line.as_str());
    out.push("");
    out.push(entry);
    out.join("\n")
}

/// Formats the `## Weekday, Month Day, Year` header line for a date.
pub fn format_date_header(date: NaiveDate) -> String {
    format!("## {}", date.format(DATE_HEADER_FORMAT_OUT))
}

/// Parses a `## Weekday, Month Day, Year` header line. Anything that does
/// not match, including deeper headers and inconsistent weekdays, is
/// `None`.
pub fn parse_date_header(line: &str) -> Option<NaiveDate> {
    let rest = line.strip_prefix("## ")?.trim();
    NaiveDate::parse_from_str(rest, DATE_HEADER_FORMAT_IN).ok()
}

/// Index just past the closing front-matter fence, or 0 when the document
/// does not start with a complete fence pair.
fn front_matter_end(lines: &[&str]) -> usize {
    if lines.first().map(|line| line.trim_end()) != Some(FRONT_MATTER_FENCE) {
        return 0;
    }
    for (idx, line) in lines.iter().enumerate().skip(1) {
        if line.trim_end() == FRONT_MATTER_FENCE {
            return idx + 1;
        }
    }
    0
}

/// First line of body content: past front matter, past the `#` title when
/// present, and past blank lines around both.
fn body_start(lines: &[&str]) -> usize {
    let mut idx = front_matter_end(lines);
    while idx < lines.len() && lines[idx].trim().is_empty() {
        idx += 1;
    }
    if idx < lines.len() && lines[idx].starts_with("# ") {
        idx += 1;
        while idx < lines.len() && lines[idx].trim().is_empty() {
            idx += 1;
        }
    }
    idx
}

/// Index of the next `## ` header at or after `from`, or the line count
/// when none follows.
fn next_section_start(lines: &[&str], from: usize) -> usize {
    let from = from.min(lines.len());
    lines[from..]
        .iter()
        .position(|line| line.starts_with("## "))
        .map(|offset| from + offset)
        .unwrap_or(lines.len())
}

fn splice_lines(lines: &[&str], at: usize, insertion: &[&str]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + insertion.len());
    out.extend_from_slice(&lines[..at]);
    out.extend_from_slice(insertion);
    out.extend_from_slice(&lines[at..]);
    out.join("\n")
}
