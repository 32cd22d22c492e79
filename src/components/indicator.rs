//! Blocking busy indicator
//!
//! Shown while any guarded operation is in flight. The guard enforces a
//! hard ceiling on how long this overlay can stay up, so the UI never
//! remains permanently blocked by a request that never settles.

use std::time::Instant;

use crate::components::layout::centered_popup;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn draw_busy_indicator(frame: &mut Frame, area: Rect, since: Option<Instant>, count: usize) {
    let popup = centered_popup(area, 40, 7);
    frame.render_widget(Clear, popup);

    let elapsed = since.map(|s| s.elapsed().as_secs()).unwrap_or(0);
    let detail = if count > 1 {
        format!("{count} operations in flight")
    } else {
        "1 operation in flight".to_string()
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Working...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{detail} ({elapsed}s)"),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Requests cannot be cancelled",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(paragraph, popup);
}
