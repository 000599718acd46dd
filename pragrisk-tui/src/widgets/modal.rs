//! Centered overlay used for dialogs, help and prompts.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Text,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub struct ModalBox<'a> {
    pub title: &'a str,
    pub body: Text<'a>,
    pub border_style: Style,
    pub width_percent: u16,
    pub height: u16,
}

impl<'a> ModalBox<'a> {
    pub fn render(self, f: &mut Frame<'_>, area: Rect) {
        let area = centered(area, self.width_percent, self.height);
        f.render_widget(Clear, area);
        let widget = Paragraph::new(self.body)
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(self.border_style),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(widget, area);
    }
}

/// A `width_percent` wide, `height` tall rectangle centered in `area`.
pub fn centered(area: Rect, width_percent: u16, height: u16) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent.min(100)) / 2),
            Constraint::Percentage(width_percent.min(100)),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    horizontal[1]
}
