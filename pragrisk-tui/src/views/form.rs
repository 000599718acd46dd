//! Edit form for new and existing entities.

use crate::components::UpdateComponent;
use crate::state::App;
use crate::views::Screen;
use pragrisk_core::{FieldKind, FormBinding};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render<E: Screen>(f: &mut Frame<'_>, app: &App, update: &UpdateComponent<E>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(5)])
        .split(area);

    let items: Vec<ListItem> = update
        .form
        .fields()
        .iter()
        .map(|field| {
            let value = display_value::<E>(update, field.name, field.kind, &field.value);
            let marker = if field.required { "*" } else { " " };
            let hint = match field.kind {
                FieldKind::Choice(_) | FieldKind::Reference => "  < >",
                _ => "",
            };
            let label_style = if field.is_editable() {
                Style::default().fg(app.theme.secondary)
            } else {
                Style::default().fg(app.theme.text_muted)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{:<20}", marker, field.label), label_style),
                Span::raw(value),
                Span::styled(hint, Style::default().fg(app.theme.text_muted)),
            ]))
        })
        .collect();

    let title = match (update.is_new(), update.is_saving) {
        (_, true) => format!("{} (saving...)", E::NAME),
        (true, false) => format!("Create {}", E::NAME),
        (false, false) => format!("Edit {}", E::NAME),
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus)),
        )
        .highlight_style(Style::default().bg(app.theme.bg_highlight).add_modifier(Modifier::BOLD));
    let mut state = ListState::default();
    state.select(Some(update.focused));
    f.render_stateful_widget(list, chunks[0], &mut state);

    let messages: Vec<Line> = if update.errors.is_empty() {
        vec![Line::from(Span::styled(
            "Ctrl-s save | Esc cancel | Tab next field | Left/Right change choice",
            Style::default().fg(app.theme.text_dim),
        ))]
    } else {
        update
            .errors
            .iter()
            .map(|err| Line::from(Span::styled(err.to_string(), Style::default().fg(app.theme.error))))
            .collect()
    };
    let footer = Paragraph::new(messages)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(footer, chunks[1]);
}

/// Reference fields show the related entity's label rather than its id.
fn display_value<E: FormBinding>(
    update: &UpdateComponent<E>,
    name: &str,
    kind: FieldKind,
    raw: &str,
) -> String {
    match kind {
        FieldKind::Reference if !raw.is_empty() => E::reference_options(&update.relations, name)
            .into_iter()
            .find(|(id, _)| id == raw)
            .map(|(_, label)| label)
            .unwrap_or_else(|| raw.to_string()),
        _ => raw.to_string(),
    }
}
