//! Entity list table with a detail side panel.

use crate::state::{App, EntityScreen};
use crate::theme::{mitigation_status_color, risk_value_color, tech_stack_color, SynthBruteTheme};
use crate::views::Screen;
use crate::widgets::{DetailPanel, ListStatus};
use pragrisk_core::{Actor, Entity, Environment, Mitigation, Scenario, Technology, Vulnerability};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

/// Columns shown in the table; the rest appear in the side panel.
const MAX_COLUMNS: usize = 4;

/// Optional row tint derived from an entity's state.
pub trait RowAccent: Entity {
    fn accent(&self, _theme: &SynthBruteTheme) -> Option<Color> {
        None
    }
}

impl RowAccent for Actor {}
impl RowAccent for Environment {}
impl RowAccent for Vulnerability {}

impl RowAccent for Mitigation {
    fn accent(&self, theme: &SynthBruteTheme) -> Option<Color> {
        self.status.map(|status| mitigation_status_color(status, theme))
    }
}

impl RowAccent for Scenario {
    fn accent(&self, theme: &SynthBruteTheme) -> Option<Color> {
        self.risk_value.map(|risk| risk_value_color(risk, theme))
    }
}

impl RowAccent for Technology {
    fn accent(&self, theme: &SynthBruteTheme) -> Option<Color> {
        self.tech_stack.map(|stack| tech_stack_color(stack, theme))
    }
}

pub fn render<E: Screen>(f: &mut Frame<'_>, app: &App, screen: &EntityScreen<E>, area: Rect) {
    let rows_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows_area[0]);

    let headers: Vec<&'static str> = E::default()
        .fields()
        .into_iter()
        .take(MAX_COLUMNS)
        .map(|(label, _)| label)
        .collect();
    let rows: Vec<Row> = screen
        .list
        .entities()
        .iter()
        .map(|entity| {
            let style = entity
                .accent(&app.theme)
                .map(|color| Style::default().fg(color))
                .unwrap_or_else(|| Style::default().fg(app.theme.text));
            let cells: Vec<Cell> = entity
                .fields()
                .into_iter()
                .take(MAX_COLUMNS)
                .map(|(_, value)| Cell::from(value))
                .collect();
            Row::new(cells).style(style)
        })
        .collect();

    let column_count = headers.len().max(1) as u16;
    let widths: Vec<Constraint> = headers
        .iter()
        .map(|_| Constraint::Percentage(100 / column_count))
        .collect();

    let title = match (&screen.list.entities, screen.list.is_loading) {
        (None, true) => format!("{} (loading)", E::RESOURCE),
        (Some(items), _) if items.is_empty() => format!("{} (none found)", E::RESOURCE),
        _ => E::RESOURCE.to_string(),
    };
    let table = Table::new(rows, widths)
        .header(Row::new(headers).style(Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD)))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus)),
        )
        .highlight_style(Style::default().bg(app.theme.bg_highlight).add_modifier(Modifier::BOLD));

    let mut state = TableState::default();
    state.select(screen.list.selected);
    f.render_stateful_widget(table, chunks[0], &mut state);

    let fields = screen
        .list
        .selected_entity()
        .map(Entity::fields)
        .unwrap_or_default();
    let detail = DetailPanel {
        title: "Details",
        fields,
        label_style: Style::default().fg(app.theme.secondary),
        border_style: Style::default().fg(app.theme.border),
    };
    detail.render(f, chunks[1]);

    let status = ListStatus {
        pagination: &screen.list.pagination,
        sort: &screen.list.sort,
        search: &screen.list.current_search,
        is_loading: screen.list.is_loading,
        style: Style::default().fg(app.theme.text_dim),
        accent: Style::default().fg(app.theme.warning),
    };
    status.render(f, rows_area[1]);
}
