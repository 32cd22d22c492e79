//! Dataset choice dialog
//!
//! Asks which dataset to open in the paginated viewer. Selection state
//! lives in the modal itself; the app handles its keys.

use crate::components::layout::centered_popup;
use crate::model::DatasetKind;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn draw_dataset_choice(frame: &mut Frame, area: Rect, selected: DatasetKind) {
    let popup = centered_popup(area, 52, 10);
    frame.render_widget(Clear, popup);

    let entry = |kind: DatasetKind, hint: &str| {
        let is_selected = kind == selected;
        Line::from(vec![
            Span::styled(
                if is_selected { " ▶ " } else { "   " },
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("{:<16}", kind.title()),
                if is_selected {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                },
            ),
            Span::styled(hint.to_string(), Style::default().fg(Color::DarkGray)),
        ])
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Which dataset would you like to view?",
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        entry(DatasetKind::Metadata, "sample information & annotations"),
        entry(DatasetKind::Expression, "gene expression values"),
        Line::from(""),
        Line::from(vec![
            Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
            Span::raw("Choose  "),
            Span::styled(" Enter ", Style::default().fg(Color::Green)),
            Span::raw("Open  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" View Dataset ")
            .title_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::Magenta)),
    );
    frame.render_widget(paragraph, popup);
}
