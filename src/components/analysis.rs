//! Analysis form pages
//!
//! Thin forms over the backend's analysis endpoints: PCA, UMAP,
//! differential expression, gene expression, heatmap, chromosome mapping,
//! and the patient geographic map. Each page validates locally before any
//! request is sent and keeps a one-line status of its last run.

use crate::action::Action;
use crate::component::Component;
use crate::services::{split_gene_list, AnalysisKind, AnalysisRequest};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const NONE_CHOICE: &str = "(none)";

#[derive(Debug, Clone)]
enum FieldKind {
    Text,
    Choice(Vec<String>),
}

#[derive(Debug, Clone)]
struct FormField {
    label: &'static str,
    kind: FieldKind,
    value: String,
    choice: usize,
    /// Choice fields fed from the metadata column list
    column_choice: bool,
}

impl FormField {
    fn text(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Text,
            value: String::new(),
            choice: 0,
            column_choice: false,
        }
    }

    fn column_choice(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Choice(vec![NONE_CHOICE.to_string()]),
            value: String::new(),
            choice: 0,
            column_choice: true,
        }
    }

    fn fixed_choice(label: &'static str, choices: &[&str]) -> Self {
        Self {
            label,
            kind: FieldKind::Choice(choices.iter().map(|s| s.to_string()).collect()),
            value: String::new(),
            choice: 0,
            column_choice: false,
        }
    }

    /// Selected choice, with the "(none)" sentinel mapped to None
    fn selected_choice(&self) -> Option<String> {
        match &self.kind {
            FieldKind::Choice(choices) => {
                let value = choices.get(self.choice)?;
                if value == NONE_CHOICE {
                    None
                } else {
                    Some(value.clone())
                }
            }
            FieldKind::Text => None,
        }
    }

    fn display_value(&self) -> String {
        match &self.kind {
            FieldKind::Text => self.value.clone(),
            FieldKind::Choice(choices) => choices
                .get(self.choice)
                .cloned()
                .unwrap_or_else(|| NONE_CHOICE.to_string()),
        }
    }
}

pub struct AnalysisPage {
    pub kind: AnalysisKind,
    description: &'static str,
    fields: Vec<FormField>,
    focus: usize,
    /// One-line outcome of the last run
    pub status: Option<String>,
    /// How many genes the backend currently knows, for gene-entry forms
    pub gene_count: Option<usize>,
}

impl AnalysisPage {
    pub fn pca() -> Self {
        Self::new(
            AnalysisKind::Pca,
            "Principal component analysis of the expression matrix.",
            vec![FormField::column_choice("Color by")],
        )
    }

    pub fn umap() -> Self {
        Self::new(
            AnalysisKind::Umap,
            "UMAP embedding of the expression matrix.",
            vec![FormField::column_choice("Color by")],
        )
    }

    pub fn differential_expression() -> Self {
        Self::new(
            AnalysisKind::DifferentialExpression,
            "Compare expression between two groups of samples.",
            vec![
                FormField::column_choice("Group column"),
                FormField::text("Group 1"),
                FormField::text("Group 2"),
            ],
        )
    }

    pub fn gene_expression() -> Self {
        Self::new(
            AnalysisKind::GeneExpression,
            "Plot the expression of a single gene across samples.",
            vec![
                FormField::text("Gene name"),
                FormField::column_choice("Group by"),
            ],
        )
    }

    pub fn heatmap() -> Self {
        Self::new(
            AnalysisKind::Heatmap,
            "Expression heatmap over a list of genes.",
            vec![
                FormField::text("Genes (comma separated)"),
                FormField::column_choice("Group by"),
            ],
        )
    }

    pub fn chromosome_mapping() -> Self {
        Self::new(
            AnalysisKind::ChromosomeMapping,
            "Map a list of genes onto chromosome positions.",
            vec![
                FormField::text("Genes (comma separated)"),
                FormField::text("Chromosome filter (optional)"),
            ],
        )
    }

    pub fn geomap() -> Self {
        Self::new(
            AnalysisKind::Geomap,
            "Geographic map of patient sample origins.",
            vec![
                FormField::fixed_choice("Map type", &["individual", "summary"]),
                FormField::fixed_choice("Zoom", &["disabled", "enabled"]),
            ],
        )
    }

    fn new(kind: AnalysisKind, description: &'static str, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            description,
            fields,
            focus: 0,
            status: None,
            gene_count: None,
        }
    }

    /// Refresh the metadata-column selectors, keeping selections that
    /// still exist
    pub fn set_column_choices(&mut self, columns: &[String]) {
        for field in self.fields.iter_mut().filter(|f| f.column_choice) {
            let previous = field.selected_choice();
            let mut choices = vec![NONE_CHOICE.to_string()];
            choices.extend(columns.iter().cloned());
            field.choice = previous
                .and_then(|p| choices.iter().position(|c| *c == p))
                .unwrap_or(0);
            field.kind = FieldKind::Choice(choices);
        }
    }

    /// Whether printable keys are being consumed by a text input
    pub fn wants_text_input(&self) -> bool {
        matches!(self.fields[self.focus].kind, FieldKind::Text)
    }

    /// Build the request, or a user-facing validation warning
    pub fn build_request(&self) -> std::result::Result<AnalysisRequest, String> {
        match self.kind {
            AnalysisKind::Pca => Ok(AnalysisRequest::Pca {
                color_by: self.fields[0].selected_choice(),
            }),
            AnalysisKind::Umap => Ok(AnalysisRequest::Umap {
                color_by: self.fields[0].selected_choice(),
            }),
            AnalysisKind::DifferentialExpression => {
                let group_col = self.fields[0]
                    .selected_choice()
                    .ok_or("Please select a group column")?;
                let group_1 = self.fields[1].value.trim().to_string();
                let group_2 = self.fields[2].value.trim().to_string();
                if group_1.is_empty() || group_2.is_empty() {
                    return Err("Please enter both group labels".to_string());
                }
                Ok(AnalysisRequest::DifferentialExpression {
                    group_col,
                    group_1,
                    group_2,
                })
            }
            AnalysisKind::GeneExpression => {
                let gene_name = self.fields[0].value.trim().to_string();
                if gene_name.is_empty() {
                    return Err("Please enter a gene name".to_string());
                }
                Ok(AnalysisRequest::GeneExpression {
                    gene_name,
                    group_col: self.fields[1].selected_choice(),
                })
            }
            AnalysisKind::Heatmap => {
                let genes = split_gene_list(&self.fields[0].value);
                if genes.is_empty() {
                    return Err("Please enter at least one gene name".to_string());
                }
                Ok(AnalysisRequest::Heatmap {
                    genes,
                    group_col: self.fields[1].selected_choice(),
                })
            }
            AnalysisKind::ChromosomeMapping => {
                let genes = split_gene_list(&self.fields[0].value);
                if genes.is_empty() {
                    return Err("Please enter at least one gene name".to_string());
                }
                let filter = self.fields[1].value.trim();
                Ok(AnalysisRequest::ChromosomeMapping {
                    genes,
                    chromosome_filter: if filter.is_empty() {
                        None
                    } else {
                        Some(filter.to_string())
                    },
                })
            }
            AnalysisKind::Geomap => Ok(AnalysisRequest::Geomap {
                map_type: self.fields[0].display_value(),
                zoom_enabled: self.fields[1].choice == 1,
            }),
        }
    }
}

impl Component for AnalysisPage {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.fields.len();
                return Ok(None);
            }
            KeyCode::Up => {
                self.focus = self.focus.checked_sub(1).unwrap_or(self.fields.len() - 1);
                return Ok(None);
            }
            KeyCode::Enter => return Ok(Some(Action::SubmitAnalysis(self.kind))),
            _ => {}
        }

        let field = &mut self.fields[self.focus];
        match key.code {
            KeyCode::Left => {
                if let FieldKind::Choice(choices) = &field.kind {
                    field.choice = field.choice.checked_sub(1).unwrap_or(choices.len() - 1);
                }
            }
            KeyCode::Right => {
                if let FieldKind::Choice(choices) = &field.kind {
                    field.choice = (field.choice + 1) % choices.len();
                }
            }
            KeyCode::Backspace => {
                if matches!(field.kind, FieldKind::Text) {
                    field.value.pop();
                }
            }
            KeyCode::Char(c) if matches!(field.kind, FieldKind::Text) => {
                field.value.push(c);
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.kind.label()))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", self.description),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
        ];

        for (i, field) in self.fields.iter().enumerate() {
            let focused = i == self.focus;
            let marker = if focused { " ▶ " } else { "   " };
            let value = match &field.kind {
                FieldKind::Text if focused => format!("{}_", field.value),
                FieldKind::Choice(_) => format!("‹ {} ›", field.display_value()),
                _ => field.display_value(),
            };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{:<28}", field.label),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    value,
                    if focused {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    },
                ),
            ]));
        }

        lines.push(Line::from(""));
        if let Some(count) = self.gene_count {
            lines.push(Line::from(Span::styled(
                format!("  {count} genes available in the loaded expression data"),
                Style::default().fg(Color::DarkGray),
            )));
        }
        if let Some(status) = &self.status {
            lines.push(Line::from(Span::styled(
                format!("  {status}"),
                Style::default().fg(Color::Green),
            )));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            "  Enter run   Tab next field   ←/→ choose   Esc back",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines), inner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heatmap_requires_genes() {
        let page = AnalysisPage::heatmap();
        assert_eq!(
            page.build_request(),
            Err("Please enter at least one gene name".to_string())
        );
    }

    #[test]
    fn test_heatmap_splits_gene_list() {
        let mut page = AnalysisPage::heatmap();
        page.fields[0].value = "TP53, EGFR\nIDH1".to_string();
        match page.build_request().unwrap() {
            AnalysisRequest::Heatmap { genes, group_col } => {
                assert_eq!(genes, vec!["TP53", "EGFR", "IDH1"]);
                assert!(group_col.is_none());
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn test_differential_expression_validation() {
        let mut page = AnalysisPage::differential_expression();
        page.set_column_choices(&["grade".to_string()]);
        assert!(page.build_request().is_err());

        page.fields[0].choice = 1; // "grade"
        page.fields[1].value = "II".to_string();
        assert_eq!(
            page.build_request(),
            Err("Please enter both group labels".to_string())
        );

        page.fields[2].value = "IV".to_string();
        match page.build_request().unwrap() {
            AnalysisRequest::DifferentialExpression { group_col, group_1, group_2 } => {
                assert_eq!(group_col, "grade");
                assert_eq!(group_1, "II");
                assert_eq!(group_2, "IV");
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn test_pca_none_choice_maps_to_no_color() {
        let mut page = AnalysisPage::pca();
        page.set_column_choices(&["grade".to_string(), "sex".to_string()]);
        match page.build_request().unwrap() {
            AnalysisRequest::Pca { color_by } => assert!(color_by.is_none()),
            other => panic!("unexpected request {other:?}"),
        }

        page.fields[0].choice = 2;
        match page.build_request().unwrap() {
            AnalysisRequest::Pca { color_by } => assert_eq!(color_by.as_deref(), Some("sex")),
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn test_column_refresh_preserves_selection() {
        let mut page = AnalysisPage::pca();
        page.set_column_choices(&["grade".to_string(), "sex".to_string()]);
        page.fields[0].choice = 1; // "grade"

        page.set_column_choices(&["age".to_string(), "grade".to_string()]);
        assert_eq!(page.fields[0].selected_choice().as_deref(), Some("grade"));

        // A vanished column falls back to "(none)"
        page.set_column_choices(&["age".to_string()]);
        assert!(page.fields[0].selected_choice().is_none());
    }

    #[test]
    fn test_geomap_request() {
        let mut page = AnalysisPage::geomap();
        page.fields[1].choice = 1;
        match page.build_request().unwrap() {
            AnalysisRequest::Geomap { map_type, zoom_enabled } => {
                assert_eq!(map_type, "individual");
                assert!(zoom_enabled);
            }
            other => panic!("unexpected request {other:?}"),
        }
    }
}
