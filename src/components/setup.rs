//! Setup wizard component
//!
//! First-run configuration: where the GliomaScope backend lives.

use crate::action::Action;
use crate::component::Component;
use crate::config::Config;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Welcome,
    ServerUrl,
    Confirm,
}

impl SetupStep {
    fn title(&self) -> &str {
        match self {
            SetupStep::Welcome => "Welcome",
            SetupStep::ServerUrl => "Backend URL",
            SetupStep::Confirm => "Confirm",
        }
    }

    fn step_number(&self) -> usize {
        match self {
            SetupStep::Welcome => 1,
            SetupStep::ServerUrl => 2,
            SetupStep::Confirm => 3,
        }
    }
}

pub struct SetupComponent {
    pub step: SetupStep,
    pub config: Config,
    pub input: String,
    pub error: Option<String>,
    pub complete: bool,
}

impl Default for SetupComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupComponent {
    pub fn new() -> Self {
        Self {
            step: SetupStep::Welcome,
            config: Config::default(),
            input: String::new(),
            error: None,
            complete: false,
        }
    }

    /// Get the saved config if setup completed successfully
    pub fn get_config(&self) -> Option<&Config> {
        if self.complete {
            Some(&self.config)
        } else {
            None
        }
    }

    fn validate_url(&mut self) -> bool {
        self.error = None;
        let input = self.input.trim();

        if input.is_empty() {
            self.error = Some("Backend URL is required".to_string());
            return false;
        }
        if !input.starts_with("http://") && !input.starts_with("https://") {
            self.error = Some("URL must start with http:// or https://".to_string());
            return false;
        }
        self.config.server_url = input.trim_end_matches('/').to_string();
        true
    }

    fn save_config(&mut self) {
        match self.config.save() {
            Ok(()) => {
                self.complete = true;
            }
            Err(e) => {
                self.error = Some(format!("Failed to save config: {}", e));
            }
        }
    }
}

impl Component for SetupComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.step {
            SetupStep::Welcome => match key.code {
                KeyCode::Enter => {
                    self.step = SetupStep::ServerUrl;
                    self.input = self.config.server_url.clone();
                    Ok(None)
                }
                KeyCode::Esc => Ok(Some(Action::ForceQuit)),
                _ => Ok(None),
            },
            SetupStep::ServerUrl => match key.code {
                KeyCode::Enter => {
                    if self.validate_url() {
                        self.step = SetupStep::Confirm;
                    }
                    Ok(None)
                }
                KeyCode::Esc => {
                    self.step = SetupStep::Welcome;
                    self.error = None;
                    Ok(None)
                }
                KeyCode::Backspace => {
                    self.input.pop();
                    self.error = None;
                    Ok(None)
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                    self.error = None;
                    Ok(None)
                }
                _ => Ok(None),
            },
            SetupStep::Confirm => match key.code {
                KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.save_config();
                    if self.complete {
                        Ok(Some(Action::SetupConfirm))
                    } else {
                        Ok(None)
                    }
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Backspace => {
                    self.step = SetupStep::ServerUrl;
                    Ok(None)
                }
                _ => Ok(None),
            },
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);
        let background = Block::default().style(Style::default().bg(Color::Reset));
        frame.render_widget(background, area);

        let margin = 4;
        let content_area = Rect::new(
            margin,
            margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(2), // Progress
                Constraint::Min(8),    // Content
                Constraint::Length(3), // Help
            ])
            .split(content_area);

        let title = Paragraph::new(Line::from(Span::styled(
            " GliomaScope Setup ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let progress = format!("Step {} of 3: {}", self.step.step_number(), self.step.title());
        let progress_widget = Paragraph::new(Line::from(Span::styled(
            progress,
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(progress_widget, chunks[1]);

        self.draw_step_content(frame, chunks[2]);

        let help_text = match self.step {
            SetupStep::Welcome => " Enter  Continue   Esc  Quit",
            SetupStep::ServerUrl => " Enter  Continue   Esc  Back   Type to edit",
            SetupStep::Confirm => " Enter/y  Save & Continue   Esc/n  Go Back",
        };
        let help = Paragraph::new(Line::from(Span::styled(
            help_text,
            Style::default().fg(Color::DarkGray),
        )))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);

        Ok(())
    }
}

impl SetupComponent {
    fn draw_step_content(&self, frame: &mut Frame, area: Rect) {
        match self.step {
            SetupStep::Welcome => self.draw_welcome(frame, area),
            SetupStep::ServerUrl => self.draw_server_url(frame, area),
            SetupStep::Confirm => self.draw_confirm(frame, area),
        }
    }

    fn draw_welcome(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Welcome to GliomaScope!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("This terminal client connects to a running GliomaScope"),
            Line::from("data service to explore glioma metadata and expression data."),
            Line::from(""),
            Line::from(vec![Span::styled(
                "You will need the URL of the backend server.",
                Style::default().fg(Color::Cyan),
            )]),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to begin...",
                Style::default().fg(Color::Yellow),
            )),
        ];

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Welcome ")
                .border_style(Style::default().fg(Color::Green)),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_server_url(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(""),
            Line::from("Enter the base URL of the GliomaScope backend:"),
            Line::from("(e.g., http://127.0.0.1:5000)"),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{}_", &self.input),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )));
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Backend URL ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect) {
        let config_dir = Config::config_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.gliomascope-tui".to_string());

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Review your configuration:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Backend URL: ", Style::default().fg(Color::Cyan)),
                Span::raw(self.config.server_url.clone()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "Config will be saved to: ",
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!("{}/config.json", config_dir)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter or 'y' to save and continue...",
                Style::default().fg(Color::Yellow),
            )),
        ];

        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )));
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm Configuration ")
                .border_style(Style::default().fg(Color::Green)),
        );
        frame.render_widget(paragraph, area);
    }
}
