//! Plain-text tables for terminal output.

use std::borrow::Cow;
use std::fmt::Write as _;

/// Cells wider than this are cut and suffixed with an ellipsis.
pub const MAX_CELL_WIDTH: usize = 48;
const ELLIPSIS: char = '…';

pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let headers: Vec<Cow<'_, str>> = headers.iter().map(|h| fit_cell(h)).collect();
    let rows: Vec<Vec<Cow<'_, str>>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| fit_cell(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count().max(3)).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(&headers, &widths));
    let separator: Vec<Cow<'_, str>> = widths.iter().map(|w| Cow::Owned("-".repeat(*w))).collect();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in &rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

/// Two-column `label  value` listing used for summaries and detail views.
pub fn render_pairs(pairs: &[(&str, String)]) -> String {
    let width = pairs
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let mut output = String::new();
    for (label, value) in pairs {
        let padding = width - label.chars().count();
        let _ = writeln!(
            output,
            "{label}{}  {}",
            " ".repeat(padding),
            sanitize_cell(value)
        );
    }
    output
}

pub fn print_pairs(pairs: &[(&str, String)]) {
    print!("{}", render_pairs(pairs));
}

fn format_row(values: &[Cow<'_, str>], widths: &[usize]) -> String {
    let mut line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let padding = width.saturating_sub(value.chars().count());
            format!("{value}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.truncate(line.trim_end().len());
    line
}

fn fit_cell(value: &str) -> Cow<'_, str> {
    let sanitized = sanitize_cell(value);
    if sanitized.chars().count() <= MAX_CELL_WIDTH {
        return sanitized;
    }
    let mut cut: String = sanitized.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.truncate(cut.trim_end().len());
    cut.push(ELLIPSIS);
    Cow::Owned(cut)
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
