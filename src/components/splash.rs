//! Splash screen component
//!
//! Displays the GliomaScope banner briefly before transitioning to the
//! main app.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

pub struct SplashComponent {
    start_time: Option<Instant>,
    duration: Duration,
}

impl Default for SplashComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SplashComponent {
    pub fn new() -> Self {
        Self {
            start_time: None,
            duration: Duration::from_millis(1500),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.start_time
            .map(|t| t.elapsed() >= self.duration)
            .unwrap_or(false)
    }

    fn banner() -> Vec<&'static str> {
        vec![
            r"   ____ _ _                       ____                       ",
            r"  / ___| (_) ___  _ __ ___   __ _/ ___|  ___ ___  _ __   ___ ",
            r" | |  _| | |/ _ \| '_ ` _ \ / _` \___ \ / __/ _ \| '_ \ / _ \",
            r" | |_| | | | (_) | | | | | | (_| |___) | (_| (_) | |_) |  __/",
            r"  \____|_|_|\___/|_| |_| |_|\__,_|____/ \___\___/| .__/ \___|",
            r"                                                 |_|         ",
        ]
    }
}

impl Component for SplashComponent {
    fn init(&mut self) -> Result<()> {
        self.start_time = Some(Instant::now());
        Ok(())
    }

    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        // Any key press skips the splash screen
        Ok(Some(Action::SplashComplete))
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);
        let background = Block::default().style(Style::default().bg(Color::Reset));
        frame.render_widget(background, area);

        let banner = Self::banner();
        let banner_height = banner.len() as u16 + 4;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(banner_height),
                Constraint::Min(0),
            ])
            .split(area);

        let mut lines: Vec<Line> = banner
            .into_iter()
            .map(|row| {
                Line::from(Span::styled(
                    row,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Interactive explorer for glioma omics data",
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(paragraph, chunks[1]);

        Ok(())
    }
}
