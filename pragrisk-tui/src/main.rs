//! PragRisk TUI entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pragrisk_tui::api_client::CatalogServices;
use pragrisk_tui::config::TuiConfig;
use pragrisk_tui::error::TuiError;
use pragrisk_tui::events::TuiEvent;
use pragrisk_tui::keys::map_key;
use pragrisk_tui::notifications::NotificationLevel;
use pragrisk_tui::persistence;
use pragrisk_tui::state::{App, Task};
use pragrisk_tui::views::render_view;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    pragrisk_tui::logging::init(&config)?;
    let services = CatalogServices::rest(&config)?;
    let mut app = App::new(config, services);
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => app.restore(state),
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unreadable UI state");
            app.notify(NotificationLevel::Warning, format!("Saved UI state ignored: {}", err));
        }
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);

    spawn_input_reader(event_tx.clone());
    spawn_tasks(app.ensure_loaded(), &event_tx);

    let tick_rate = Duration::from_millis(app.config.refresh_interval_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                app.expire_notifications();
            }
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, event, &event_tx) {
                    break;
                }
            }
        }
    }

    if let Err(err) = persistence::save(&app.config.persistence_path, &app.persisted_state()) {
        tracing::warn!(error = %err, "failed to save UI state");
    }
    tracing::info!("PragRisk TUI exiting");

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) => sender.blocking_send(TuiEvent::Input(key)),
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}

/// Run each backend call detached and post its completion to the loop.
fn spawn_tasks(tasks: Vec<Task>, sender: &mpsc::Sender<TuiEvent>) {
    for task in tasks {
        let sender = sender.clone();
        tokio::spawn(async move {
            let event = task.await;
            if sender.send(TuiEvent::Catalog(Box::new(event))).await.is_err() {
                tracing::debug!("event loop closed before request completed");
            }
        });
    }
}

/// Returns `true` when the application should exit.
fn handle_event(app: &mut App, event: TuiEvent, sender: &mpsc::Sender<TuiEvent>) -> bool {
    match event {
        TuiEvent::Input(key) => {
            if let Some(action) = map_key(key, app.input_mode()) {
                let (quit, tasks) = app.handle_action(action);
                spawn_tasks(tasks, sender);
                return quit;
            }
        }
        TuiEvent::Catalog(event) => {
            let tasks = app.apply(*event);
            spawn_tasks(tasks, sender);
        }
        TuiEvent::Resize { .. } => {}
    }
    false
}
