//! Tabular rendering helpers
//!
//! The backend renders previews and data pages as pipe-delimited text:
//!
//! ```text
//! | sample_id | grade | idh    |
//! |-----------|-------|--------|
//! | GSM001    | IV    | mutant |
//! ```
//!
//! `parse_rendered_table` turns that into headers and rows, and
//! `build_table_lines` lays them back out with aligned, width-capped
//! columns for the terminal.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Columns wider than this are truncated
const MAX_COLUMN_WIDTH: usize = 40;

/// Parse server-rendered pipe-delimited table text into headers and rows
pub fn parse_rendered_table(text: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut headers = Vec::new();
    let mut rows = Vec::new();
    let mut headers_found = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        // Skip separator lines (only -, |, +, whitespace)
        if trimmed
            .chars()
            .all(|c| c == '-' || c == '|' || c == '+' || c.is_whitespace())
        {
            continue;
        }

        if trimmed.contains('|') {
            let cells: Vec<String> = trimmed
                .split('|')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();

            if cells.is_empty() {
                continue;
            }

            if !headers_found {
                headers = cells;
                headers_found = true;
            } else {
                rows.push(cells);
            }
        }
    }

    (headers, rows)
}

/// Truncate `text` to at most `width` display columns, ellipsized
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}

/// Build aligned table lines from headers and rows
pub fn build_table_lines(headers: &[String], rows: &[Vec<String>]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if headers.is_empty() {
        return vec![Line::from(Span::styled(
            "No rows to display",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    // Column widths from header and cell content, capped
    let mut col_widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < col_widths.len() {
                col_widths[i] = col_widths[i].max(cell.width());
            }
        }
    }
    for width in &mut col_widths {
        *width = (*width).min(MAX_COLUMN_WIDTH);
    }

    let header_spans: Vec<Span> = headers
        .iter()
        .enumerate()
        .flat_map(|(i, h)| {
            let width = col_widths[i];
            vec![
                Span::styled(
                    pad(&fit(h, width), width),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" │ "),
            ]
        })
        .collect();
    lines.push(Line::from(header_spans));

    let separator: String = col_widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("─┼─");
    lines.push(Line::from(Span::styled(
        separator,
        Style::default().fg(Color::DarkGray),
    )));

    for row in rows {
        let row_spans: Vec<Span> = row
            .iter()
            .enumerate()
            .flat_map(|(i, cell)| {
                let width = col_widths.get(i).copied().unwrap_or(10);
                vec![
                    Span::styled(
                        pad(&fit(cell, width), width),
                        Style::default().fg(Color::White),
                    ),
                    Span::raw(" │ "),
                ]
            })
            .collect();
        lines.push(Line::from(row_spans));
    }

    lines
}

/// Format a count with thousands separators (1234567 -> "1,234,567")
pub fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rendered_table() {
        let text = "\n| id | name    | value |\n|----|---------|-------|\n| 1  | Alice   | 100   |\n| 2  | Bob     | 200   |\n";
        let (headers, rows) = parse_rendered_table(text);
        assert_eq!(headers, vec!["id", "name", "value"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["1", "Alice", "100"]);
        assert_eq!(rows[1], vec!["2", "Bob", "200"]);
    }

    #[test]
    fn test_parse_empty_input() {
        let (headers, rows) = parse_rendered_table("");
        assert!(headers.is_empty());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_headers_only() {
        let (headers, rows) = parse_rendered_table("| col1 | col2 |\n|------|------|\n");
        assert_eq!(headers, vec!["col1", "col2"]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_fit_truncates_on_display_width() {
        assert_eq!(fit("short", 10), "short");
        assert_eq!(fit("abcdefghij", 5), "abcd…");
        // Multibyte input must not split a character
        let fitted = fit("ααααααααα", 4);
        assert!(fitted.width() <= 4);
        assert!(fitted.ends_with('…'));
    }

    #[test]
    fn test_build_table_lines_has_header_separator_rows() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let rows = vec![vec!["1".to_string(), "2".to_string()]];
        let lines = build_table_lines(&headers, &rows);
        // Header + separator + one data row
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(1234567), "1,234,567");
    }
}
