//! Alert overlay rendering
//!
//! Alerts stack in the top-right corner, newest first, and disappear on
//! their own once their TTL lapses; pruning happens in the app tick.

use crate::model::{AlertQueue, Severity};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const ALERT_WIDTH: u16 = 46;

fn severity_style(severity: Severity) -> (Color, &'static str) {
    match severity {
        Severity::Success => (Color::Green, "✔"),
        Severity::Warning => (Color::Yellow, "!"),
        Severity::Danger => (Color::Red, "✘"),
        Severity::Info => (Color::Cyan, "i"),
    }
}

pub fn draw_alerts(frame: &mut Frame, area: Rect, alerts: &AlertQueue) {
    if alerts.is_empty() {
        return;
    }

    let width = ALERT_WIDTH.min(area.width);
    let x = area.x + area.width.saturating_sub(width);
    let mut y = area.y;

    for alert in alerts.iter() {
        // Wrap to the inner width, at most 3 lines per alert
        let inner_width = width.saturating_sub(4) as usize;
        let mut lines: Vec<Line> = Vec::new();
        let mut current = String::new();
        for word in alert.message.split_whitespace() {
            if !current.is_empty() && current.width() + 1 + word.width() > inner_width {
                lines.push(Line::from(current.clone()));
                current.clear();
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(Line::from(current));
        }
        lines.truncate(3);

        let height = lines.len() as u16 + 2;
        if y + height > area.y + area.height {
            break;
        }

        let (color, marker) = severity_style(alert.severity);
        let alert_area = Rect::new(x, y, width, height);
        frame.render_widget(Clear, alert_area);

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Line::from(vec![
                    Span::styled(format!(" {marker} "), Style::default().fg(color)),
                    Span::styled("x dismiss ", Style::default().fg(Color::DarkGray)),
                ])),
        );
        frame.render_widget(paragraph, alert_area);

        y += height;
    }
}
