//! Overlays: delete confirmation, help, search prompt and the 404 screen.

use crate::components::DeleteDialog;
use crate::state::{App, Modal, SearchPrompt};
use crate::widgets::ModalBox;
use pragrisk_core::Entity;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    Frame,
};

pub fn render_delete<E: Entity>(f: &mut Frame<'_>, app: &App, dialog: &DeleteDialog<E>, area: Rect) {
    let prompt = if dialog.is_deleting {
        "Deleting...".to_string()
    } else {
        format!(
            "Are you sure you want to delete {} '{}'?",
            E::NAME,
            dialog.entity.label()
        )
    };
    let body = Text::from(vec![
        Line::from(prompt),
        Line::from(""),
        Line::from(Span::styled(
            "y/Enter delete | Esc cancel",
            Style::default().fg(app.theme.text_dim),
        )),
    ]);
    ModalBox {
        title: "Confirm delete operation",
        body,
        border_style: Style::default().fg(app.theme.error),
        width_percent: 50,
        height: 6,
    }
    .render(f, area);
}

pub fn render_not_found(f: &mut Frame<'_>, app: &App, entity: &str, area: Rect) {
    let body = Text::from(vec![
        Line::from(Span::styled("404", Style::default().fg(app.theme.error))),
        Line::from(format!("The requested {} does not exist.", entity)),
        Line::from(""),
        Line::from(Span::styled("Esc back to list", Style::default().fg(app.theme.text_dim))),
    ]);
    ModalBox {
        title: "Page not found",
        body,
        border_style: Style::default().fg(app.theme.warning),
        width_percent: 50,
        height: 7,
    }
    .render(f, area);
}

pub fn render_help(f: &mut Frame<'_>, app: &App, modal: &Modal, area: Rect) {
    let lines: Vec<Line> = modal.message.lines().map(Line::from).collect();
    let height = lines.len() as u16 + 2;
    ModalBox {
        title: &modal.title,
        body: Text::from(lines),
        border_style: Style::default().fg(app.theme.primary),
        width_percent: 70,
        height,
    }
    .render(f, area);
}

pub fn render_search(f: &mut Frame<'_>, app: &App, prompt: &SearchPrompt, area: Rect) {
    let body = Text::from(vec![Line::from(vec![
        Span::styled("> ", Style::default().fg(app.theme.primary)),
        Span::raw(prompt.query.as_str()),
        Span::styled("_", Style::default().fg(app.theme.text_dim)),
    ])]);
    ModalBox {
        title: "Search (Enter to run, empty clears)",
        body,
        border_style: Style::default().fg(app.theme.primary),
        width_percent: 60,
        height: 3,
    }
    .render(f, area);
}
