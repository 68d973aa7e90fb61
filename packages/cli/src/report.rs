//! Plain-text rendering for the `inspect` and `verify` commands.

use unico_pdf::Row;

/// Characters of page text shown by `inspect`.
pub const TEXT_PREVIEW_CHARS: usize = 1500;

/// Returns at most `limit` characters of `text`, cut on a char boundary.
#[must_use]
pub fn preview(text: &str, limit: usize) -> &str {
    text.char_indices()
        .nth(limit)
        .map_or(text, |(end, _)| &text[..end])
}

/// Formats detected table cells, showing blank cells as `-`.
#[must_use]
pub fn format_cells(row: &Row) -> String {
    row.iter()
        .map(|cell| cell.as_deref().unwrap_or("-"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Formats spreadsheet values, keeping empty cells visible.
#[must_use]
pub fn format_values(values: &[String]) -> String {
    values
        .iter()
        .map(|v| if v.is_empty() { "-" } else { v.as_str() })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Formats titles as `index: title`, one per line.
#[must_use]
pub fn format_titles(titles: &[String]) -> String {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| format!("{i:>2}: {title}"))
        .collect::<Vec<_>>()
        .join("\n")
}
