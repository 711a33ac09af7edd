//! Terminal output.
//!
//! Results go to stdout; status lines and prompts go to stderr so piped
//! output stays clean.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use catalog_admin::table::{Tabular, render};

/// Widest a cell may be before it is cut.
const MAX_CELL_WIDTH: usize = 48;

/// Print records as an aligned table, or a note when there are none.
pub fn table<T: Tabular>(records: &[T], empty: &str) {
    if records.is_empty() {
        note(empty);
        return;
    }
    let (headers, rows) = render(records);
    grid(&headers, &rows);
}

/// Print pre-rendered rows as an aligned table.
pub fn grid(headers: &[&str], rows: &[Vec<String>]) {
    for line in format_table(headers, rows) {
        println!("{line}");
    }
}

/// Print `label: value` pairs with the labels aligned.
pub fn fields(pairs: &[(&str, String)]) {
    let width = pairs
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    for (label, value) in pairs {
        println!("{label:<width$}  {value}");
    }
}

/// Print raw text to stdout.
pub fn text(body: &str) {
    println!("{body}");
}

pub fn success(message: &str) {
    eprintln!("✓ {message}");
}

pub fn note(message: &str) {
    eprintln!("{message}");
}

pub fn failure(message: &str) {
    eprintln!("✗ {message}");
}

fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| clip(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(pad_row(headers, &widths));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &cells {
        let values: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(pad_row(&values, &widths));
    }
    lines
}

fn pad_row(values: &[&str], widths: &[usize]) -> String {
    values
        .iter()
        .zip(widths)
        .map(|(value, &width)| format!("{value:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Collapse whitespace and cut long cells with an ellipsis.
fn clip(cell: &str) -> String {
    let flat = cell.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip() {
        assert_eq!(clip("a\n  b"), "a b");
        let long = "x".repeat(100);
        let clipped = clip(&long);
        assert_eq!(clipped.chars().count(), MAX_CELL_WIDTH);
        assert!(clipped.ends_with('…'));
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let rows = vec![
            vec!["1".to_string(), "Vision API".to_string()],
            vec!["22".to_string(), "Bot".to_string()],
        ];
        let lines = format_table(&["Id", "Name"], &rows);
        assert_eq!(
            lines,
            vec![
                "Id  Name".to_string(),
                "--  ----------".to_string(),
                "1   Vision API".to_string(),
                "22  Bot".to_string(),
            ]
        );
    }
}
