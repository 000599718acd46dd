//! View rendering dispatch.

pub mod dialogs;
pub mod form;
pub mod list;

pub use list::RowAccent;

use crate::components::CatalogEntity;
use crate::nav::View;
use crate::notifications::NotificationLevel;
use crate::state::{App, EntityScreen, ScreenMode};
use crate::theme::notification_color;
use crate::widgets::DetailPanel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Everything a tab needs to be drawn.
pub trait Screen: CatalogEntity + RowAccent {}

impl<E: CatalogEntity + RowAccent> Screen for E {}

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.active_view {
        View::Actors => render_screen(f, app, &app.actors, layout[1]),
        View::Environments => render_screen(f, app, &app.environments, layout[1]),
        View::Mitigations => render_screen(f, app, &app.mitigations, layout[1]),
        View::Scenarios => render_screen(f, app, &app.scenarios, layout[1]),
        View::Technologies => render_screen(f, app, &app.technologies, layout[1]),
        View::Vulnerabilities => render_screen(f, app, &app.vulnerabilities, layout[1]),
    }

    render_footer(f, app, layout[2]);

    if let Some(prompt) = &app.search {
        dialogs::render_search(f, app, prompt, layout[1]);
    }
    if let Some(modal) = &app.modal {
        let full = f.size();
        dialogs::render_help(f, app, modal, full);
    }
}

fn render_screen<E: Screen>(f: &mut Frame<'_>, app: &App, screen: &EntityScreen<E>, area: Rect) {
    match screen.mode() {
        ScreenMode::List => list::render(f, app, screen, area),
        ScreenMode::ConfirmDelete => {
            match (&screen.detail, screen.history.current().id()) {
                (Some(detail), Some(_)) => render_detail(f, app, &detail.entity, area),
                _ => list::render(f, app, screen, area),
            }
            if let Some(dialog) = &screen.delete {
                dialogs::render_delete(f, app, dialog, area);
            }
        }
        ScreenMode::Detail => {
            if let Some(detail) = &screen.detail {
                render_detail(f, app, &detail.entity, area);
            }
        }
        ScreenMode::Form => {
            if let Some(update) = &screen.update {
                form::render(f, app, update, area);
            }
        }
        ScreenMode::Resolving => {
            let loading = Paragraph::new(format!("Loading {}...", E::NAME))
                .style(Style::default().fg(app.theme.text_dim))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(loading, area);
        }
        ScreenMode::NotFound => {
            list::render(f, app, screen, area);
            dialogs::render_not_found(f, app, E::NAME, area);
        }
    }
}

fn render_detail<E: Screen>(f: &mut Frame<'_>, app: &App, entity: &E, area: Rect) {
    let title = format!("{} {} | e edit | d delete | Esc back", E::NAME, entity.label());
    let panel = DetailPanel {
        title: &title,
        fields: entity.fields(),
        label_style: Style::default().fg(app.theme.secondary),
        border_style: Style::default().fg(app.theme.border_focus),
    };
    panel.render(f, area);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let titles: Vec<Line> = View::all()
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!("{} {}", i + 1, view.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.active_view.index())
        .block(Block::default().borders(Borders::ALL).title(Span::styled(
            format!("PragRisk | {}", app.config.api_base_url),
            Style::default().fg(app.theme.primary),
        )))
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = if let Some(note) = app.notifications.last() {
        let label = match note.level {
            NotificationLevel::Info => "INFO",
            NotificationLevel::Warning => "WARN",
            NotificationLevel::Error => "ERROR",
            NotificationLevel::Success => "SUCCESS",
        };
        (
            format!("{}: {}", label, note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        )
    } else {
        (
            "j/k move | Enter view | n new | e edit | d delete | / search | ? help | q quit".to_string(),
            Style::default().fg(app.theme.text_dim),
        )
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}
