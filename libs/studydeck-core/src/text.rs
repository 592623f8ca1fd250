//! Text reflow applied to card faces before storage.

/// Lines shorter than this are treated as short notes and quoted.
const SHORT_LINE_CHARS: usize = 50;

const QUOTE_MARKER: &str = "> ";

/// Reflow multi-line card text.
///
/// Text with at most one non-blank line is returned untouched. Otherwise
/// blank lines are dropped and each short line is prefixed with a quote
/// marker, unless it already starts a bullet (`•` or `-`).
pub fn organize_text(text: &str) -> String {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.len() <= 1 {
        return text.to_string();
    }

    lines
        .into_iter()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with('•') || trimmed.starts_with('-') {
                line.to_string()
            } else if line.chars().count() < SHORT_LINE_CHARS {
                format!("{QUOTE_MARKER}{line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
