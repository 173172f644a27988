//! Canonical id normalization and title derivation.
//!
//! # Responsibility
//! - Map arbitrary path strings to canonical, URL-safe document ids.
//! - Derive human display titles from file stems.
//!
//! # Invariants
//! - `canonical_id` is total: defined for every input, never panics, never
//!   touches the filesystem.
//! - `canonical_id` is idempotent: applying it to its own output is a
//!   no-op.
//! - Distinct inputs may collapse to one id; collisions are not detected.

/// Id used when normalization strips an input down to nothing.
pub const FALLBACK_DOC_ID: &str = "untitled";

/// Normalizes a path string into a canonical document id.
///
/// Rules, applied in order per character after lowercasing:
/// - backslashes become `/`; whitespace and `_` become `-`
/// - anything outside `[a-z0-9\-./]` is dropped
/// - runs of `/`, `.`, or `-` collapse to one
/// - leading and trailing separators are trimmed
/// - an empty result falls back to [`FALLBACK_DOC_ID`]
pub fn canonical_id(path: &str) -> String {
    let lowered = path.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());

    for ch in lowered.chars() {
        let mapped = match ch {
            '\\' => '/',
            '_' => '-',
            c if c.is_whitespace() => '-',
            c if c.is_ascii_lowercase() || c.is_ascii_digit() => c,
            '-' | '.' | '/' => ch,
            _ => continue,
        };
        if matches!(mapped, '-' | '.' | '/') && out.ends_with(mapped) {
            continue;
        }
        out.push(mapped);
    }

    let trimmed = out.trim_matches(|c| matches!(c, '-' | '.' | '/'));
    if trimmed.is_empty() {
        FALLBACK_DOC_ID.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Derives the canonical id for a document path, ignoring the markdown
/// extension so that `Notes/Alpha.md` and a `[[notes/alpha]]` reference
/// land on the same id.
pub fn doc_id_for_path(path: &str) -> String {
    canonical_id(strip_markdown_extension(path))
}

/// Removes a trailing markdown extension, case-insensitively.
pub fn strip_markdown_extension(path: &str) -> &str {
    match path.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case("md") => stem,
        _ => path,
    }
}

/// Turns a file stem into a display title by expanding separators to
/// spaces: `project-ideas` becomes `project ideas`.
pub fn title_from_stem(stem: &str) -> String {
    stem.replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{canonical_id, doc_id_for_path, strip_markdown_extension, title_from_stem,
        FALLBACK_DOC_ID};

    #[test]
    fn canonical_id_is_idempotent() {
        let samples = [
            "",
            "   ",
            "Inbox.md",
            "Resources/Project Ideas.md",
            "a__b  c--d",
            "über/straße.md",
            "\\windows\\style\\path",
            "..//weird//..path..",
            "daily/2025/09-september",
            FALLBACK_DOC_ID,
        ];
        for sample in samples {
            let once = canonical_id(sample);
            assert_eq!(canonical_id(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn canonical_id_empty_input_uses_placeholder() {
        assert_eq!(canonical_id(""), FALLBACK_DOC_ID);
        assert_eq!(canonical_id("   "), FALLBACK_DOC_ID);
        assert_eq!(canonical_id("!!!"), FALLBACK_DOC_ID);
    }

    #[test]
    fn canonical_id_normalizes_case_and_separators() {
        assert_eq!(canonical_id("Resources/My Notes.md"), "resources/my-notes.md");
        assert_eq!(canonical_id("a_b c"), "a-b-c");
        assert_eq!(canonical_id("a///b"), "a/b");
        assert_eq!(canonical_id("--a--"), "a");
        assert_eq!(canonical_id("a...b"), "a.b");
        assert_eq!(canonical_id("win\\path"), "win/path");
    }

    #[test]
    fn canonical_id_strips_disallowed_characters() {
        assert_eq!(canonical_id("héllo wörld"), "hllo-wrld");
        assert_eq!(canonical_id("notes (draft)"), "notes-draft");
    }

    #[test]
    fn doc_id_ignores_markdown_extension() {
        assert_eq!(doc_id_for_path("Inbox.md"), "inbox");
        assert_eq!(doc_id_for_path("Inbox.MD"), "inbox");
        assert_eq!(doc_id_for_path("notes/alpha"), "notes/alpha");
        assert_eq!(
            doc_id_for_path("daily/2025/09-september.md"),
            "daily/2025/09-september"
        );
    }

    #[test]
    fn strip_extension_leaves_other_dots_alone() {
        assert_eq!(strip_markdown_extension("a.b.md"), "a.b");
        assert_eq!(strip_markdown_extension("archive.tar"), "archive.tar");
        assert_eq!(strip_markdown_extension("plain"), "plain");
    }

    #[test]
    fn title_expands_separators() {
        assert_eq!(title_from_stem("project-ideas"), "project ideas");
        assert_eq!(title_from_stem("weekly_review"), "weekly review");
        assert_eq!(title_from_stem("inbox"), "inbox");
    }
}
