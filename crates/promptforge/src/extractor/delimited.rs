//! Converts row-oriented delimited text into a line-oriented readable form.

use std::sync::LazyLock;

use regex::Regex;

/// Rows beyond this count are silently dropped.
pub const MAX_ROWS: usize = 200;

static DELIMITER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;\t]+").expect("delimiter pattern is valid"));

/// Pure transformation: splits on newlines, drops blank lines, keeps the
/// first [`MAX_ROWS`] rows, and rejoins multi-field rows with `" | "`.
/// Rows without a delimiter are kept verbatim (trimmed).
pub fn normalize(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .take(MAX_ROWS)
        .map(|line| {
            let fields: Vec<&str> = DELIMITER_RUN.split(line).collect();
            if fields.len() >= 2 {
                fields.join(" | ")
            } else {
                line.trim().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
