//! Paginated dataset viewer
//!
//! Fetches and renders windowed pages of one dataset at a time. The
//! requested page number is sent to the backend as-is; the response is
//! trusted for totals and row ranges, and an error response switches the
//! view to an error state without touching pagination.

use crate::action::Action;
use crate::component::Component;
use crate::components::table::{build_table_lines, group_digits, parse_rendered_table};
use crate::model::{
    pagination_controls, DatasetKind, PageControl, PageView, PaginationState,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Rendering state of the viewer: Idle -> Loading -> Loaded/Error -> ...
#[derive(Debug, Default)]
enum ViewerState {
    #[default]
    Idle,
    Loading {
        page: u32,
    },
    Loaded(LoadedPage),
    Error(String),
}

#[derive(Debug)]
struct LoadedPage {
    view: PageView,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct DataViewerComponent {
    /// Whether the viewer replaces the exploration sections
    pub open: bool,
    /// Pagination state; lives until a new kind is chosen or the view closes
    pub pagination: Option<PaginationState>,
    state: ViewerState,
    scroll: usize,
}

impl DataViewerComponent {
    /// Open the viewer on a dataset. Returns the initial page load.
    pub fn open(&mut self, kind: DatasetKind) -> Action {
        let keep = self
            .pagination
            .as_ref()
            .is_some_and(|p| p.kind == kind);
        if !keep {
            self.pagination = Some(PaginationState::new(kind));
        }
        self.open = true;
        self.state = ViewerState::Idle;
        self.scroll = 0;
        Action::LoadPage { kind, page: 1 }
    }

    /// Close the viewer; the pagination state's lifetime ends with it
    pub fn close(&mut self) {
        self.open = false;
        self.pagination = None;
        self.state = ViewerState::Idle;
        self.scroll = 0;
    }

    pub fn current_kind(&self) -> Option<DatasetKind> {
        self.pagination.as_ref().map(|p| p.kind)
    }

    pub fn begin_loading(&mut self, page: u32) {
        self.state = ViewerState::Loading { page };
    }

    /// Record a successful page response
    pub fn apply_view(&mut self, view: PageView) {
        if let Some(pagination) = &mut self.pagination {
            pagination.apply(&view);
        }
        let (headers, rows) = parse_rendered_table(&view.current_data);
        self.state = ViewerState::Loaded(LoadedPage { view, headers, rows });
        self.scroll = 0;
    }

    /// Record a failed page fetch; pagination state is left unchanged
    pub fn apply_error(&mut self, message: String) {
        self.state = ViewerState::Error(message);
    }

    /// Step the current page by `delta`, respecting the control bounds
    pub fn page_step(&self, delta: i64) -> Option<Action> {
        let loaded = self.loaded()?;
        let cur = i64::from(loaded.view.current_page);
        let last = i64::from(loaded.view.total_pages);
        let target = cur + delta;
        if target < 1 || target > last || target == cur {
            return None;
        }
        Some(Action::LoadPage {
            kind: self.current_kind()?,
            page: target as u32,
        })
    }

    /// Jump to the first or last page
    pub fn page_jump(&self, to_last: bool) -> Option<Action> {
        let loaded = self.loaded()?;
        let target = if to_last { loaded.view.total_pages } else { 1 };
        if target == loaded.view.current_page {
            return None;
        }
        Some(Action::LoadPage {
            kind: self.current_kind()?,
            page: target,
        })
    }

    /// Cycle the page density; always re-requests page 1
    pub fn cycle_per_page(&mut self) -> Option<Action> {
        let pagination = self.pagination.as_mut()?;
        let next = pagination.per_page.next();
        pagination.set_per_page(next);
        Some(Action::LoadPage {
            kind: pagination.kind,
            page: 1,
        })
    }

    fn loaded(&self) -> Option<&LoadedPage> {
        match &self.state {
            ViewerState::Loaded(loaded) => Some(loaded),
            _ => None,
        }
    }
}

impl Component for DataViewerComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(Action::PrevPage),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::NextPage),
            KeyCode::Home | KeyCode::Char('g') => Some(Action::FirstPage),
            KeyCode::End | KeyCode::Char('G') => Some(Action::LastPage),
            KeyCode::Char('p') => Some(Action::CyclePerPage),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseViewer),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            Action::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            Action::PageUp => self.scroll = self.scroll.saturating_sub(20),
            Action::PageDown => self.scroll = self.scroll.saturating_add(20),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let title = match self.current_kind() {
            Some(kind) => format!(" {} Dataset ", kind.title()),
            None => " Dataset ".to_string(),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match &self.state {
            ViewerState::Idle => {}
            ViewerState::Loading { page } => {
                let lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("  Loading page {page}..."),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )),
                ];
                frame.render_widget(Paragraph::new(lines), inner);
            }
            ViewerState::Error(message) => {
                let lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("  {message}"),
                        Style::default().fg(Color::Red),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        "  Esc closes the viewer",
                        Style::default().fg(Color::DarkGray),
                    )),
                ];
                frame.render_widget(Paragraph::new(lines), inner);
            }
            ViewerState::Loaded(loaded) => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Min(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                    ])
                    .split(inner);

                let view = &loaded.view;
                let header = Line::from(vec![
                    Span::styled("Total: ", Style::default().fg(Color::DarkGray)),
                    Span::raw(group_digits(view.total_rows)),
                    Span::styled(" rows • showing ", Style::default().fg(Color::DarkGray)),
                    Span::raw(format!("{}–{}", view.start_row, view.end_row)),
                    Span::styled(" • page ", Style::default().fg(Color::DarkGray)),
                    Span::raw(format!("{}/{}", view.current_page, view.total_pages)),
                    Span::styled(" • ", Style::default().fg(Color::DarkGray)),
                    Span::raw(format!("{} rows/page", view.per_page)),
                ]);
                frame.render_widget(Paragraph::new(header), chunks[0]);

                let table_lines = build_table_lines(&loaded.headers, &loaded.rows);
                let total = table_lines.len();
                let visible_height = chunks[1].height as usize;
                let max_scroll = total.saturating_sub(visible_height);
                if self.scroll > max_scroll {
                    self.scroll = max_scroll;
                }

                let table = Paragraph::new(table_lines).scroll((self.scroll as u16, 0));
                frame.render_widget(table, chunks[1]);

                if total > visible_height {
                    let mut scrollbar_state =
                        ScrollbarState::new(max_scroll).position(self.scroll);
                    frame.render_stateful_widget(
                        Scrollbar::new(ScrollbarOrientation::VerticalRight),
                        chunks[1],
                        &mut scrollbar_state,
                    );
                }

                frame.render_widget(
                    Paragraph::new(pagination_line(view.current_page, view.total_pages)),
                    chunks[2],
                );

                let help = Line::from(vec![
                    Span::styled("←/→", Style::default().fg(Color::Cyan)),
                    Span::raw(" page  "),
                    Span::styled("Home/End", Style::default().fg(Color::Cyan)),
                    Span::raw(" first/last  "),
                    Span::styled("p", Style::default().fg(Color::Cyan)),
                    Span::raw(" per-page  "),
                    Span::styled("j/k", Style::default().fg(Color::Cyan)),
                    Span::raw(" scroll  "),
                    Span::styled("Esc", Style::default().fg(Color::Cyan)),
                    Span::raw(" close"),
                ]);
                frame.render_widget(
                    Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
                    chunks[3],
                );
            }
        }

        Ok(())
    }
}

/// Render the pagination control as one line of spans
fn pagination_line(cur: u32, last: u32) -> Line<'static> {
    let mut spans = Vec::new();
    for control in pagination_controls(cur, last) {
        match control {
            PageControl::Previous { enabled } => {
                spans.push(Span::styled(
                    "‹ Prev",
                    if enabled {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    },
                ));
                spans.push(Span::raw("  "));
            }
            PageControl::Page { number, active } => {
                if active {
                    spans.push(Span::styled(
                        format!("[{number}]"),
                        Style::default()
                            .fg(Color::White)
                            .bg(Color::Blue)
                            .add_modifier(Modifier::BOLD),
                    ));
                } else {
                    spans.push(Span::styled(
                        format!(" {number} "),
                        Style::default().fg(Color::White),
                    ));
                }
                spans.push(Span::raw(" "));
            }
            PageControl::Ellipsis => {
                spans.push(Span::styled("…", Style::default().fg(Color::DarkGray)));
                spans.push(Span::raw(" "));
            }
            PageControl::Next { enabled } => {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    "Next ›",
                    if enabled {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    },
                ));
            }
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_view(cur: u32, last: u32, total_rows: u64) -> PageView {
        PageView {
            total_rows,
            total_pages: last,
            current_page: cur,
            per_page: 50,
            start_row: u64::from(cur - 1) * 50 + 1,
            end_row: (u64::from(cur) * 50).min(total_rows),
            current_data: "| id |\n|----|\n| 1  |".to_string(),
        }
    }

    #[test]
    fn test_open_starts_at_page_one() {
        let mut viewer = DataViewerComponent::default();
        let action = viewer.open(DatasetKind::Metadata);
        assert_eq!(
            action,
            Action::LoadPage {
                kind: DatasetKind::Metadata,
                page: 1
            }
        );
        assert!(viewer.open);
    }

    #[test]
    fn test_opening_other_kind_resets_pagination() {
        let mut viewer = DataViewerComponent::default();
        viewer.open(DatasetKind::Metadata);
        viewer.begin_loading(1);
        viewer.apply_view(page_view(3, 10, 500));
        assert_eq!(viewer.pagination.as_ref().unwrap().page, 3);

        viewer.open(DatasetKind::Expression);
        let pagination = viewer.pagination.as_ref().unwrap();
        assert_eq!(pagination.kind, DatasetKind::Expression);
        assert_eq!(pagination.page, 1);
    }

    #[test]
    fn test_error_response_leaves_pagination_unchanged() {
        let mut viewer = DataViewerComponent::default();
        viewer.open(DatasetKind::Metadata);
        viewer.apply_view(page_view(4, 10, 500));

        viewer.begin_loading(11);
        viewer.apply_error("No metadata loaded".to_string());

        let pagination = viewer.pagination.as_ref().unwrap();
        assert_eq!(pagination.page, 4);
        assert_eq!(pagination.total_rows, 500);
        assert!(matches!(viewer.state, ViewerState::Error(_)));
    }

    #[test]
    fn test_page_step_respects_bounds() {
        let mut viewer = DataViewerComponent::default();
        viewer.open(DatasetKind::Metadata);
        viewer.apply_view(page_view(1, 3, 150));

        assert!(viewer.page_step(-1).is_none());
        assert_eq!(
            viewer.page_step(1),
            Some(Action::LoadPage {
                kind: DatasetKind::Metadata,
                page: 2
            })
        );

        viewer.apply_view(page_view(3, 3, 150));
        assert!(viewer.page_step(1).is_none());
        assert_eq!(
            viewer.page_jump(false),
            Some(Action::LoadPage {
                kind: DatasetKind::Metadata,
                page: 1
            })
        );
    }

    #[test]
    fn test_cycle_per_page_requests_page_one() {
        let mut viewer = DataViewerComponent::default();
        viewer.open(DatasetKind::Expression);
        viewer.apply_view(page_view(5, 10, 500));

        let action = viewer.cycle_per_page();
        assert_eq!(
            action,
            Some(Action::LoadPage {
                kind: DatasetKind::Expression,
                page: 1
            })
        );
        assert_eq!(viewer.pagination.as_ref().unwrap().page, 1);
        assert_eq!(viewer.pagination.as_ref().unwrap().per_page.as_u32(), 100);
    }

    #[test]
    fn test_close_ends_pagination_lifetime() {
        let mut viewer = DataViewerComponent::default();
        viewer.open(DatasetKind::Metadata);
        viewer.apply_view(page_view(2, 5, 250));
        viewer.close();
        assert!(!viewer.open);
        assert!(viewer.pagination.is_none());
    }

    #[test]
    fn test_loaded_page_parses_rendered_rows() {
        let mut viewer = DataViewerComponent::default();
        viewer.open(DatasetKind::Metadata);
        viewer.apply_view(page_view(1, 1, 1));
        let loaded = viewer.loaded().unwrap();
        assert_eq!(loaded.headers, vec!["id"]);
        assert_eq!(loaded.rows, vec![vec!["1".to_string()]]);
    }
}
