//! Upload page component
//!
//! Uploads a metadata or expression file by path with a declared type.
//! Validation happens locally before any request is sent.

use std::path::PathBuf;

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const FILE_TYPES: [&str; 2] = ["metadata", "expression"];

pub struct UploadPage {
    pub path: String,
    file_type: usize,
    /// 0 = path field, 1 = type selector
    focus: usize,
    pub status: Option<String>,
}

impl Default for UploadPage {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadPage {
    pub fn new() -> Self {
        Self {
            path: String::new(),
            file_type: 0,
            focus: 0,
            status: None,
        }
    }

    pub fn file_type(&self) -> &'static str {
        FILE_TYPES[self.file_type]
    }

    /// Validate the form, returning the upload target or a warning
    pub fn build_request(&self) -> std::result::Result<(PathBuf, &'static str), String> {
        let path = self.path.trim();
        if path.is_empty() {
            return Err("Please select a file to upload".to_string());
        }
        let path = PathBuf::from(path);
        if !path.is_file() {
            return Err(format!("File not found: {}", path.display()));
        }
        Ok((path, self.file_type()))
    }

    /// Whether printable keys are being consumed by the path input
    pub fn wants_text_input(&self) -> bool {
        self.focus == 0
    }

    /// Reset the form after a successful upload
    pub fn reset_form(&mut self) {
        self.path.clear();
        self.focus = 0;
    }
}

impl Component for UploadPage {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.focus = 1 - self.focus;
                None
            }
            KeyCode::Enter => Some(Action::SubmitUpload),
            KeyCode::Left | KeyCode::Right if self.focus == 1 => {
                self.file_type = 1 - self.file_type;
                None
            }
            KeyCode::Backspace if self.focus == 0 => {
                self.path.pop();
                None
            }
            KeyCode::Char(c) if self.focus == 0 => {
                self.path.push(c);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Data Upload ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let path_focused = self.focus == 0;
        let type_focused = self.focus == 1;

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Upload a CSV/TSV dataset to the backend.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    if path_focused { " ▶ " } else { "   " },
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled("File path        ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    if path_focused {
                        format!("{}_", self.path)
                    } else {
                        self.path.clone()
                    },
                    if path_focused {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    },
                ),
            ]),
            Line::from(vec![
                Span::styled(
                    if type_focused { " ▶ " } else { "   " },
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled("Dataset type     ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("‹ {} ›", self.file_type()),
                    if type_focused {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    },
                ),
            ]),
            Line::from(""),
        ];

        if let Some(status) = &self.status {
            lines.push(Line::from(Span::styled(
                format!("  {status}"),
                Style::default().fg(Color::Green),
            )));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            "  Enter upload   Tab switch field   ←/→ choose type   Esc back",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines), inner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_empty_path_is_rejected_locally() {
        let page = UploadPage::new();
        assert_eq!(
            page.build_request(),
            Err("Please select a file to upload".to_string())
        );
    }

    #[test]
    fn test_missing_file_is_rejected_locally() {
        let mut page = UploadPage::new();
        page.path = "/definitely/not/a/real/file.csv".to_string();
        assert!(page.build_request().is_err());
    }

    #[test]
    fn test_type_selector_toggles() {
        let mut page = UploadPage::new();
        assert_eq!(page.file_type(), "metadata");
        page.handle_key_event(key(KeyCode::Tab)).unwrap();
        page.handle_key_event(key(KeyCode::Right)).unwrap();
        assert_eq!(page.file_type(), "expression");
    }

    #[test]
    fn test_enter_submits() {
        let mut page = UploadPage::new();
        let action = page.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::SubmitUpload));
    }
}
