//! Confirmation dialog component
//!
//! Shared by the quit and reset confirmations; Enter/y confirms, Esc/n
//! closes.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub struct ConfirmDialog {
    title: &'static str,
    message: Vec<&'static str>,
    accent: Color,
}

impl ConfirmDialog {
    pub fn quit() -> Self {
        Self {
            title: " Quit ",
            message: vec!["Quit GliomaScope?"],
            accent: Color::Yellow,
        }
    }

    pub fn reset() -> Self {
        Self {
            title: " Reset All Data ",
            message: vec![
                "This clears all loaded datasets, cached results,",
                "and saved files on the server.",
                "",
                "You will need to upload datasets again.",
            ],
            accent: Color::Red,
        }
    }
}

impl Component for ConfirmDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ConfirmModal),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') => {
                Some(Action::CloseModal)
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let height = self.message.len() as u16 + 6;
        let popup = centered_popup(area, 56, height);
        frame.render_widget(Clear, popup);

        let mut lines = vec![Line::from("")];
        for row in &self.message {
            lines.push(Line::from(Span::styled(
                *row,
                Style::default().fg(Color::White),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                " Enter/y ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Confirm  "),
            Span::styled(
                " Esc/n ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Cancel"),
        ]));

        let paragraph = Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.title)
                    .title_style(
                        Style::default()
                            .fg(self.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                    .border_style(Style::default().fg(self.accent)),
            );
        frame.render_widget(paragraph, popup);
        Ok(())
    }
}
