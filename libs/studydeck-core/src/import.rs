//! Bulk import of delimited front/back pairs.
//!
//! # Format
//! ```text
//! What is Rust?,A systems programming language
//! "Q, with comma","A, also with comma"
//! ```
//!
//! One card per line. Fields are separated by commas outside double quotes;
//! only the first two fields are used. Lines that do not yield two fields are
//! skipped, never fatal.

use crate::types::RawCard;
use tracing::debug;

const QUOTE: char = '"';
const DELIMITER: char = ',';

/// Parse bulk text into raw front/back pairs.
pub fn parse_bulk_input(text: &str) -> Vec<RawCard> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| parse_line(line, idx + 1))
        .collect()
}

fn parse_line(line: &str, line_number: usize) -> Option<RawCard> {
    if line.trim().is_empty() {
        return None;
    }

    let fields = split_unquoted(line);
    if fields.len() < 2 {
        debug!(line_number, "skipping import line without a delimiter");
        return None;
    }

    Some(RawCard {
        front: unquote(fields[0]),
        back: unquote(fields[1]),
        line_number,
    })
}

/// Split on delimiters that are not inside a quoted run.
fn split_unquoted(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (idx, ch) in line.char_indices() {
        match ch {
            QUOTE => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => {
                fields.push(&line[start..idx]);
                start = idx + DELIMITER.len_utf8();
            }
            _ => {}
        }
    }
    fields.push(&line[start..]);

    fields
}

/// Trim a field and strip one pair of surrounding quotes.
/// Doubled quotes inside a quoted field collapse to one.
fn unquote(field: &str) -> String {
    let trimmed = field.trim();
    match trimmed
        .strip_prefix(QUOTE)
        .and_then(|rest| rest.strip_suffix(QUOTE))
    {
        Some(inner) => inner.replace("\"\"", "\"").trim().to_string(),
        None => trimmed.to_string(),
    }
}
