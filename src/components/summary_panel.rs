//! Dataset summary rendering
//!
//! The per-dataset cards shown on the exploration page, and the status
//! lines used by the home page.

use crate::components::table::group_digits;
use crate::model::{DatasetKind, DatasetSummary, SummaryResponse};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

fn card_lines(kind: DatasetKind, summary: &DatasetSummary) -> Vec<Line<'static>> {
    let (rows, cols) = summary.shape;
    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}", kind.title().to_uppercase()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("    Samples:        ", Style::default().fg(Color::DarkGray)),
            Span::raw(group_digits(rows)),
        ]),
        Line::from(vec![
            Span::styled(
                format!("    {:<16}", format!("{}:", capitalized(kind.column_label()))),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(group_digits(cols)),
        ]),
        Line::from(vec![
            Span::styled("    Missing values: ", Style::default().fg(Color::DarkGray)),
            Span::raw(group_digits(summary.missing_values)),
        ]),
        Line::from(vec![
            Span::styled("    Duplicate rows: ", Style::default().fg(Color::DarkGray)),
            Span::raw(group_digits(summary.duplicates)),
        ]),
    ];

    if !summary.columns.is_empty() {
        let shown: Vec<&str> = summary.columns.iter().take(5).map(String::as_str).collect();
        let suffix = if summary.columns.len() > 5 { ", ..." } else { "" };
        lines.push(Line::from(vec![
            Span::styled("    First columns:  ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{}{}", shown.join(", "), suffix)),
        ]));
    }

    lines.push(Line::from(""));
    lines
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Summary cards for the exploration page
pub fn summary_lines(summary: &SummaryResponse) -> Vec<Line<'static>> {
    if summary.is_empty() {
        return vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No Data Available",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "  Upload datasets to see a data summary.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
    }

    let mut lines = vec![Line::from("")];
    for kind in DatasetKind::all() {
        if let Some(dataset) = summary.get(kind) {
            lines.extend(card_lines(kind, dataset));
        }
    }
    lines
}

/// Short status lines for the home page
pub fn home_lines(summary: &SummaryResponse) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Welcome to GliomaScope",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  Explore glioma sample metadata and gene expression data:"),
        Line::from("  upload datasets, page through them, build filters, and run"),
        Line::from("  PCA, UMAP, differential expression, and plotting analyses."),
        Line::from(""),
        Line::from(Span::styled(
            "  Loaded data",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    for kind in DatasetKind::all() {
        let line = match summary.get(kind) {
            Some(dataset) => Line::from(vec![
                Span::styled("    ✔ ", Style::default().fg(Color::Green)),
                Span::raw(format!(
                    "{}: {} samples",
                    kind.title(),
                    group_digits(dataset.shape.0)
                )),
            ]),
            None => Line::from(vec![
                Span::styled("    ○ ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{}: not loaded", kind.title()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
        };
        lines.push(line);
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Tab to focus the page, ? for keys, R to reset all data",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}
