//! Table, row and cell matchers over raw HTML

use super::text::strip_markup;
use regex::Regex;
use std::sync::LazyLock;

// Data rows on the rate page carry the name plus at least four price columns
pub const MIN_DATA_CELLS: usize = 5;

// A code-anchored row needs the code, two skipped cells and the price
pub const MIN_CODE_ROW_CELLS: usize = 4;

static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table(?:\s[^>]*)?>(.*?)</table>").expect("Invalid regex"));

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr(?:\s[^>]*)?>(.*?)</tr>").expect("Invalid regex"));

static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td(?:\s[^>]*)?>(.*?)</td>").expect("Invalid regex"));

/// Inner content of the largest `<table>` block, if there is any.
pub fn largest_table(markup: &str) -> Option<&str> {
    TABLE_RE
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .map(|inner| inner.as_str())
        .fold(None, |best: Option<&str>, inner| match best {
            Some(b) if b.len() >= inner.len() => Some(b),
            _ => Some(inner),
        })
}

/// Every `<tr>` in `html`, split into stripped cell texts.
pub fn rows(html: &str) -> impl Iterator<Item = Vec<String>> + '_ {
    ROW_RE.captures_iter(html).map(|caps| {
        CELL_RE
            .captures_iter(&caps[1])
            .map(|cell| strip_markup(&cell[1]))
            .collect()
    })
}

/// Number of rows with at least `min_cells` cells, whatever their currency.
pub fn count_data_rows(html: &str, min_cells: usize) -> usize {
    rows(html).filter(|cells| cells.len() >= min_cells).count()
}

/// Matches a cell holding exactly `code`, two more cells, then captures the
/// content of the fourth cell.
pub fn code_row_pattern(code: &str) -> Result<Regex, regex::Error> {
    let cell = r"<td(?:\s[^>]*)?>";
    // Cell content may hold inline tags but never a closing `</t..>`, so a
    // match cannot run past the end of its cell or row.
    let content = r"(?:[^<]|<[^/]|</[^tT])*";
    let skipped = format!(r"\s*{cell}{content}</td>");
    let anchor = format!(
        r"(?i){cell}(?:\s|&nbsp;)*(?-i:{code})(?:\s|&nbsp;)*</td>",
        code = regex::escape(code),
    );
    Regex::new(&format!(r"{anchor}{skipped}{skipped}\s*{cell}({content})</td>"))
}
