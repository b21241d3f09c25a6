//! # Text Parsing Utilities
//!
//! This module provides the text processing utilities the suggestion pipeline
//! uses to turn semi-structured completion output into typed values.
//!
//! ## Features
//!
//! - Whitespace/case normalization for comparison keys
//! - Numbered and bulleted list parsing with a comma-split fallback
//! - `Label: value | Label: value` structured reply parsing
//! - `name - reason` line splitting for reasoned substitute replies
//!
//! Every parser here is best-effort: malformed input passes through trimmed
//! rather than producing an error.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    // Leading enumeration marker: "1. ", "- " or "• "
    static ref LIST_MARKER: Regex = Regex::new(r"^\s*\d+\.|^[-•]").unwrap();
    static ref NAME_REASON_SEPARATOR: Regex = Regex::new(r"\s+-\s+").unwrap();
}

/// Normalize text for comparison purposes: collapse whitespace runs, trim,
/// lowercase. Never used for display values.
pub fn normalize_text(text: &str) -> String {
    WHITESPACE_RUN
        .replace_all(text.trim(), " ")
        .to_lowercase()
}

/// Convert a list of values to trimmed, casefolded strings, dropping blanks
pub fn to_casefold_set<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .filter_map(|v| {
            let trimmed = v.as_ref().trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_lowercase())
            }
        })
        .collect()
}

/// Strip a leading enumeration marker ("1. ", "-", "•") from a line
pub fn strip_list_marker(line: &str) -> String {
    LIST_MARKER.replace(line, "").trim().to_string()
}

/// Parse a numbered or bulleted list from text
///
/// Splits into non-empty lines with enumeration markers stripped; when no
/// line survives, falls back to splitting the whole text on commas. Items
/// come back in original order.
pub fn parse_numbered_list(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    let any_marker = lines.iter().any(|line| LIST_MARKER.is_match(line));

    let items: Vec<String> = lines
        .iter()
        .map(|line| strip_list_marker(line))
        .filter(|line| !line.is_empty())
        .collect();

    // A single unmarked line is prose, not a list
    if items.len() > 1 || (any_marker && !items.is_empty()) {
        return items;
    }

    // Fallback to comma-separated
    let fallback: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect();

    if fallback.is_empty() {
        items
    } else {
        fallback
    }
}

/// Parse text of the form `<left>: <A> | <right>: <B>` case-insensitively
///
/// `<A>` is matched non-greedily up to the `|`; `<B>` spans the remainder
/// including newlines. Returns the two trimmed captures, or `None` when the
/// text does not match.
pub fn parse_labeled_pair(text: &str, left_label: &str, right_label: &str) -> Option<(String, String)> {
    let pattern = format!(
        r"(?is)^\s*{}:\s*(.+?)\s*\|\s*{}:\s*(.+)$",
        regex::escape(left_label),
        regex::escape(right_label)
    );
    // Labels are escaped, so the pattern always compiles
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(text.trim())?;
    Some((
        caps.get(1)?.as_str().trim().to_string(),
        caps.get(2)?.as_str().trim().to_string(),
    ))
}

/// Split a substitute line into (name, reason) on the first spaced dash
///
/// Lines without a separator yield an empty reason.
pub fn split_name_reason(line: &str) -> (String, String) {
    match NAME_REASON_SEPARATOR.splitn(line, 2).collect::<Vec<_>>()[..] {
        [name, reason] => (name.trim().to_string(), reason.trim().to_string()),
        _ => (line.trim().to_string(), String::new()),
    }
}
