//! Filter builder component
//!
//! Drives the column-value filter workflow on the exploration page: pick a
//! metadata column, load its distinct values, check a subset, and apply.
//! Also hosts the clinical quick filter (grade / IDH / age range) whose
//! target columns are auto-detected from the metadata summary.

use crate::action::Action;
use crate::component::Component;
use crate::components::table::{build_table_lines, group_digits, parse_rendered_table};
use crate::model::{
    detect_clinical_columns, ClinicalColumns, ColumnValues, FilterOutcome, FilterPhase,
    FilterSession,
};
use crate::services::ClinicalFilterRequest;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Columns,
    Values,
    Clinical,
}

const CLINICAL_LABELS: [&str; 3] = ["Grade", "IDH status", "Age range (e.g. 40-60)"];

pub struct FilterBuilderComponent {
    /// Metadata columns offered for filtering
    columns: Vec<String>,
    column_cursor: usize,
    pub session: FilterSession,
    value_cursor: usize,
    /// Last applied filter result; exposes the derived-dataset download
    pub outcome: Option<FilterOutcome>,
    region: Region,
    clinical_inputs: [String; 3],
    clinical_focus: usize,
    pub detected: ClinicalColumns,
}

impl Default for FilterBuilderComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterBuilderComponent {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            column_cursor: 0,
            session: FilterSession::default(),
            value_cursor: 0,
            outcome: None,
            region: Region::Columns,
            clinical_inputs: Default::default(),
            clinical_focus: 0,
            detected: ClinicalColumns::default(),
        }
    }

    /// Refresh the available columns from a new metadata summary
    pub fn set_columns(&mut self, columns: &[String]) {
        self.columns = columns.to_vec();
        self.detected = detect_clinical_columns(columns);
        if self.column_cursor >= self.columns.len() {
            self.column_cursor = self.columns.len().saturating_sub(1);
        }
    }

    /// Distinct values arrived for the pending session
    pub fn values_loaded(&mut self, values: ColumnValues) {
        self.session.values_loaded(values);
        self.value_cursor = 0;
        self.region = Region::Values;
    }

    /// A successful apply clears the session and records the result
    pub fn apply_succeeded(&mut self, outcome: FilterOutcome) {
        self.session.applied();
        self.outcome = Some(outcome);
        self.region = Region::Columns;
    }

    /// Build the quick-filter request from the inputs and detected columns
    pub fn clinical_request(&self) -> ClinicalFilterRequest {
        let field = |i: usize| {
            let text = self.clinical_inputs[i].trim();
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        };
        ClinicalFilterRequest {
            grade: field(0),
            idh: field(1),
            age_range: field(2),
            grade_column: self.detected.grade.clone(),
            idh_column: self.detected.idh.clone(),
            age_column: self.detected.age.clone(),
        }
    }

    /// Drop everything, e.g. after a backend reset
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Whether printable keys are being consumed by a text input
    pub fn wants_text_input(&self) -> bool {
        self.region == Region::Clinical
    }

    fn cursor_column(&self) -> Option<&String> {
        self.columns.get(self.column_cursor)
    }
}

impl Component for FilterBuilderComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.region {
            Region::Columns => self.handle_columns_key(key),
            Region::Values => self.handle_values_key(key),
            Region::Clinical => self.handle_clinical_key(key),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Filter Metadata ")
            .title_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns_width = 30.min(inner.width / 2);
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(columns_width), Constraint::Min(0)])
            .split(inner);

        self.draw_columns(frame, horizontal[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),
                Constraint::Length(4),
                Constraint::Length(4),
            ])
            .split(horizontal[1]);

        self.draw_values(frame, right[0]);
        self.draw_clinical(frame, right[1]);
        self.draw_outcome(frame, right[2]);

        Ok(())
    }
}

impl FilterBuilderComponent {
    fn handle_columns_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if self.column_cursor + 1 < self.columns.len() {
                    self.column_cursor += 1;
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.column_cursor = self.column_cursor.saturating_sub(1);
                None
            }
            KeyCode::Enter => self
                .cursor_column()
                .cloned()
                .map(Action::FilterLoadValues),
            KeyCode::Tab => {
                self.region = Region::Clinical;
                self.clinical_focus = 0;
                None
            }
            KeyCode::Char('d') if self.outcome.is_some() => Some(Action::DownloadFiltered),
            _ => None,
        };
        Ok(action)
    }

    fn handle_values_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if self.value_cursor + 1 < self.session.values.len() {
                    self.value_cursor += 1;
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.value_cursor = self.value_cursor.saturating_sub(1);
                None
            }
            KeyCode::Char(' ') => {
                self.session.toggle(self.value_cursor);
                None
            }
            KeyCode::Char('a') => {
                self.session.select_all();
                None
            }
            KeyCode::Char('c') => {
                self.session.clear_selection();
                None
            }
            KeyCode::Enter => Some(Action::ApplyFilter),
            KeyCode::Esc => {
                self.region = Region::Columns;
                Some(Action::CancelFilter)
            }
            KeyCode::Tab => {
                self.region = Region::Clinical;
                self.clinical_focus = 0;
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn handle_clinical_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Tab => {
                if self.clinical_focus + 1 < CLINICAL_LABELS.len() {
                    self.clinical_focus += 1;
                } else {
                    self.region = if self.session.phase == FilterPhase::ValuesLoaded {
                        Region::Values
                    } else {
                        Region::Columns
                    };
                }
                None
            }
            KeyCode::Enter => Some(Action::SubmitClinicalFilter),
            KeyCode::Backspace => {
                self.clinical_inputs[self.clinical_focus].pop();
                None
            }
            KeyCode::Char(c) => {
                self.clinical_inputs[self.clinical_focus].push(c);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw_columns(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![Line::from(Span::styled(
            " Columns",
            region_title_style(self.region == Region::Columns),
        ))];

        if self.columns.is_empty() {
            lines.push(Line::from(Span::styled(
                "  no metadata loaded",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let visible = area.height.saturating_sub(1) as usize;
        let offset = self
            .column_cursor
            .saturating_sub(visible.saturating_sub(1));
        for (i, column) in self.columns.iter().enumerate().skip(offset).take(visible) {
            let is_cursor = i == self.column_cursor;
            let is_session = self.session.column.as_deref() == Some(column.as_str());
            lines.push(Line::from(vec![
                Span::styled(
                    if is_cursor { " ▶ " } else { "   " },
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    column.clone(),
                    if is_session {
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD)
                    } else if is_cursor {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    },
                ),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_values(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![Line::from(Span::styled(
            " Values",
            region_title_style(self.region == Region::Values),
        ))];

        match self.session.phase {
            FilterPhase::Idle | FilterPhase::Applied => {
                lines.push(Line::from(Span::styled(
                    "  Select a column and press Enter to load its values",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            FilterPhase::ColumnSelected => {
                let column = self.session.column.as_deref().unwrap_or_default();
                lines.push(Line::from(Span::styled(
                    format!("  Loading values for '{column}'..."),
                    Style::default().fg(Color::Yellow),
                )));
            }
            FilterPhase::ValuesLoaded => {
                let column = self.session.column.as_deref().unwrap_or_default();
                lines.push(Line::from(Span::raw(format!(
                    "  Values in '{}' ({} total):",
                    column, self.session.total_values
                ))));
                for (i, (value, count)) in self.session.values.iter().enumerate() {
                    let checked = self.session.selected.contains(&i);
                    let is_cursor = i == self.value_cursor && self.region == Region::Values;
                    lines.push(Line::from(vec![
                        Span::styled(
                            if is_cursor { " ▶ " } else { "   " },
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::styled(
                            if checked { "[x] " } else { "[ ] " },
                            Style::default().fg(Color::Green),
                        ),
                        Span::raw(format!("{}. '{}' ({} samples)", i + 1, value, count)),
                    ]));
                }
                if self.session.hidden_values() > 0 {
                    lines.push(Line::from(Span::styled(
                        format!("   ... and {} more values", self.session.hidden_values()),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                lines.push(Line::from(Span::styled(
                    "  Space toggle  a all  c clear  Enter apply  Esc cancel",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_clinical(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![Line::from(Span::styled(
            " Quick filter",
            region_title_style(self.region == Region::Clinical),
        ))];

        let detected = [
            self.detected.grade.as_deref(),
            self.detected.idh.as_deref(),
            self.detected.age.as_deref(),
        ];
        for (i, label) in CLINICAL_LABELS.iter().enumerate() {
            let focused = self.region == Region::Clinical && self.clinical_focus == i;
            let column_hint = match detected[i] {
                Some(column) => format!(" [{column}]"),
                None => " [no column found]".to_string(),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<24}", label),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    if focused {
                        format!("{}_", self.clinical_inputs[i])
                    } else {
                        self.clinical_inputs[i].clone()
                    },
                    if focused {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    },
                ),
                Span::styled(column_hint, Style::default().fg(Color::DarkGray)),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_outcome(&self, frame: &mut Frame, area: Rect) {
        let Some(outcome) = &self.outcome else {
            return;
        };

        let mut lines = vec![Line::from(vec![
            Span::styled("  ✔ Filter applied: ", Style::default().fg(Color::Green)),
            Span::raw(format!(
                "{} → {} samples",
                group_digits(outcome.original_count),
                group_digits(outcome.filtered_count)
            )),
            Span::styled(
                "   d download filtered dataset",
                Style::default().fg(Color::DarkGray),
            ),
        ])];

        // First preview rows, if there is space for them
        let (headers, rows) = parse_rendered_table(&outcome.preview);
        if !headers.is_empty() {
            let room = area.height.saturating_sub(1) as usize;
            let preview: Vec<Vec<String>> = rows.into_iter().take(room.saturating_sub(2)).collect();
            lines.extend(build_table_lines(&headers, &preview));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }
}

fn region_title_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn builder_with_columns() -> FilterBuilderComponent {
        let mut builder = FilterBuilderComponent::new();
        builder.set_columns(&[
            "sample_id".to_string(),
            "grade".to_string(),
            "idh_status".to_string(),
        ]);
        builder
    }

    #[test]
    fn test_enter_on_column_starts_value_load() {
        let mut builder = builder_with_columns();
        builder.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        let action = builder.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::FilterLoadValues("grade".to_string())));
    }

    #[test]
    fn test_values_region_keys_drive_selection() {
        let mut builder = builder_with_columns();
        builder.session.select_column("grade");
        builder.values_loaded(ColumnValues {
            values: vec!["II".into(), "III".into(), "IV".into()],
            counts: vec![5, 10, 15],
        });
        assert_eq!(builder.region, Region::Values);

        builder.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        builder.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        builder.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert_eq!(builder.session.selected_values(), vec!["II", "III"]);

        let action = builder.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::ApplyFilter));
    }

    #[test]
    fn test_escape_in_values_region_cancels_session() {
        let mut builder = builder_with_columns();
        builder.session.select_column("grade");
        builder.values_loaded(ColumnValues {
            values: vec!["II".into()],
            counts: vec![5],
        });

        let action = builder.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(action, Some(Action::CancelFilter));
        assert_eq!(builder.region, Region::Columns);
    }

    #[test]
    fn test_apply_succeeded_clears_session_and_keeps_outcome() {
        let mut builder = builder_with_columns();
        builder.session.select_column("grade");
        builder.values_loaded(ColumnValues {
            values: vec!["II".into()],
            counts: vec![5],
        });
        builder.session.toggle(0);

        builder.apply_succeeded(FilterOutcome {
            original_count: 100,
            filtered_count: 5,
            preview: String::new(),
        });

        assert_eq!(builder.session.phase, FilterPhase::Applied);
        assert!(builder.outcome.is_some());
        assert_eq!(builder.region, Region::Columns);
    }

    #[test]
    fn test_clinical_request_uses_detected_columns() {
        let mut builder = builder_with_columns();
        builder.region = Region::Clinical;
        for c in "IV".chars() {
            builder.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }

        let request = builder.clinical_request();
        assert_eq!(request.grade.as_deref(), Some("IV"));
        assert!(request.idh.is_none());
        assert!(request.age_range.is_none());
        assert_eq!(request.grade_column.as_deref(), Some("grade"));
        assert_eq!(request.idh_column.as_deref(), Some("idh_status"));
        assert!(!request.is_empty());
    }

    #[test]
    fn test_empty_clinical_request() {
        let builder = builder_with_columns();
        assert!(builder.clinical_request().is_empty());
    }

    #[test]
    fn test_download_key_requires_an_outcome() {
        let mut builder = builder_with_columns();
        let action = builder.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(action, None);

        builder.outcome = Some(FilterOutcome {
            original_count: 10,
            filtered_count: 2,
            preview: String::new(),
        });
        let action = builder.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(action, Some(Action::DownloadFiltered));
    }
}
