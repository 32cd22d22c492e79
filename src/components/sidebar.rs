//! Sidebar navigation component
//!
//! Lists every page; the active page carries a marker and the cursor row
//! is highlighted when the sidebar has key focus.

use crate::action::Action;
use crate::component::Component;
use crate::model::Page;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub struct SidebarComponent {
    pages: Vec<Page>,
    cursor: usize,
    list_state: ListState,
    /// The page currently active in the app
    pub active: Page,
    /// Whether the sidebar receives key events
    pub focused: bool,
}

impl Default for SidebarComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SidebarComponent {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            pages: Page::all(),
            cursor: 0,
            list_state,
            active: Page::Home,
            focused: true,
        }
    }

    /// Keep the cursor in step with externally-driven navigation
    /// (deep links, post-reset navigation)
    pub fn sync_active(&mut self, page: Page) {
        self.active = page;
        if let Some(idx) = self.pages.iter().position(|p| *p == page) {
            self.cursor = idx;
            self.list_state.select(Some(idx));
        }
    }

    fn select_next(&mut self) {
        if self.cursor + 1 < self.pages.len() {
            self.cursor += 1;
            self.list_state.select(Some(self.cursor));
        }
    }

    fn select_prev(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.list_state.select(Some(self.cursor));
        }
    }
}

impl Component for SidebarComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Char('g') => {
                self.cursor = 0;
                self.list_state.select(Some(0));
                None
            }
            KeyCode::Char('G') => {
                self.cursor = self.pages.len().saturating_sub(1);
                self.list_state.select(Some(self.cursor));
                None
            }
            KeyCode::Enter => Some(Action::Navigate(self.pages[self.cursor])),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let items: Vec<ListItem> = self
            .pages
            .iter()
            .map(|page| {
                let is_active = *page == self.active;
                ListItem::new(Line::from(vec![
                    Span::styled(
                        if is_active { "● " } else { "  " },
                        Style::default().fg(Color::Green),
                    ),
                    Span::styled(
                        page.title(),
                        if is_active {
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::White)
                        },
                    ),
                ]))
            })
            .collect();

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" GliomaScope ")
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    )
                    .border_style(border_style),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
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
    fn test_enter_activates_cursor_page() {
        let mut sidebar = SidebarComponent::new();
        sidebar.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        sidebar.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        let action = sidebar.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::Navigate(Page::DataExploration)));
    }

    #[test]
    fn test_cursor_clamps_at_ends() {
        let mut sidebar = SidebarComponent::new();
        sidebar.handle_key_event(key(KeyCode::Char('k'))).unwrap();
        assert_eq!(sidebar.cursor, 0);

        sidebar.handle_key_event(key(KeyCode::Char('G'))).unwrap();
        let last = sidebar.cursor;
        sidebar.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        assert_eq!(sidebar.cursor, last);
    }

    #[test]
    fn test_sync_active_moves_cursor() {
        let mut sidebar = SidebarComponent::new();
        sidebar.sync_active(Page::Heatmap);
        assert_eq!(sidebar.active, Page::Heatmap);
        assert_eq!(sidebar.pages[sidebar.cursor], Page::Heatmap);
    }
}
