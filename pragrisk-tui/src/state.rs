//! Application state and per-entity screen state.

use crate::api_client::{CatalogServices, EntityService};
use crate::components::{
    CatalogEntity, DeleteDialog, DetailComponent, DialogOutcome, History, ListComponent, Pending,
    UpdateComponent,
};
use crate::config::TuiConfig;
use crate::events::{CatalogEvent, EntityEvent};
use crate::keys::{Action, InputMode};
use crate::nav::{RouteHistory, View};
use crate::notifications::{NotificationLevel, Notifications};
use crate::persistence::PersistedState;
use crate::routes::{resolve, EntityRoute, ListQuery, Resolved};
use crate::theme::SynthBruteTheme;
use pragrisk_core::{
    Actor, Entity, Environment, FieldKind, Mitigation, Scenario, Technology, Vulnerability,
};
use std::sync::Arc;

/// A backend call whose completion is routed back to one screen.
pub type Task = Pending<CatalogEvent>;

/// How long footer notifications stay visible.
pub const NOTIFICATION_TTL_SECS: i64 = 8;

/// What an entity tab is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenMode {
    List,
    /// Waiting for the resolver.
    Resolving,
    Detail,
    Form,
    ConfirmDelete,
    NotFound,
}

pub struct EntityScreen<E: CatalogEntity> {
    service: Arc<dyn EntityService<E>>,
    pub list: ListComponent<E>,
    pub history: RouteHistory<E::Id>,
    pub detail: Option<DetailComponent<E>>,
    pub update: Option<UpdateComponent<E>>,
    pub delete: Option<DeleteDialog<E>>,
    pub not_found: bool,
    /// Bumped on every navigation; save responses from an earlier visit are dropped.
    visit: u64,
}

impl<E: CatalogEntity> EntityScreen<E> {
    pub fn new(services: &CatalogServices, query: &ListQuery, items_per_page: u32) -> Self {
        let service = E::service(services);
        Self {
            list: ListComponent::new(Arc::clone(&service), query, items_per_page),
            service,
            history: RouteHistory::new(),
            detail: None,
            update: None,
            delete: None,
            not_found: false,
            visit: 0,
        }
    }

    pub fn mode(&self) -> ScreenMode {
        if self.not_found {
            return ScreenMode::NotFound;
        }
        if self.delete.is_some() {
            return ScreenMode::ConfirmDelete;
        }
        match self.history.current() {
            EntityRoute::List => ScreenMode::List,
            EntityRoute::View(_) if self.detail.is_some() => ScreenMode::Detail,
            EntityRoute::New | EntityRoute::Edit(_) if self.update.is_some() => ScreenMode::Form,
            _ => ScreenMode::Resolving,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        match self.mode() {
            ScreenMode::Form => InputMode::Text,
            _ => InputMode::Navigate,
        }
    }

    pub fn needs_load(&self) -> bool {
        self.list.entities.is_none() && !self.list.is_loading
    }

    pub fn load(&mut self) -> Task {
        let pending = self.list.load_all();
        Box::pin(async move { E::wrap(EntityEvent::Loaded(pending.await)) })
    }

    pub fn search(&mut self, query: &str) -> Task {
        let pending = self.list.search(query);
        Box::pin(async move { E::wrap(EntityEvent::Loaded(pending.await)) })
    }

    fn load_page(&mut self, page: u32) -> Task {
        let pending = self.list.load_page(page);
        Box::pin(async move { E::wrap(EntityEvent::Loaded(pending.await)) })
    }

    /// Sort by the next sortable column.
    fn cycle_sort(&mut self) -> Task {
        let columns: Vec<&'static str> = E::form()
            .fields()
            .iter()
            .filter(|f| f.kind != FieldKind::Reference)
            .map(|f| f.name)
            .collect();
        let current = columns
            .iter()
            .position(|c| *c == self.list.sort.predicate)
            .unwrap_or(0);
        let next = columns
            .get((current + 1) % columns.len().max(1))
            .copied()
            .unwrap_or(E::ID_FIELD);
        let pending = self.list.sort_by(next);
        Box::pin(async move { E::wrap(EntityEvent::Loaded(pending.await)) })
    }

    fn reverse_sort(&mut self) -> Task {
        let predicate = self.list.sort.predicate.clone();
        let pending = self.list.sort_by(&predicate);
        Box::pin(async move { E::wrap(EntityEvent::Loaded(pending.await)) })
    }

    /// Navigate to `route`, resolving its entity first.
    pub fn open(&mut self, route: EntityRoute<E::Id>) -> Task {
        self.history.push(route);
        self.activate()
    }

    /// Activate whatever route is current after a navigation.
    fn activate(&mut self) -> Task {
        self.visit = self.visit.wrapping_add(1);
        self.detail = None;
        self.update = None;
        let route = self.history.current().clone();
        if route == EntityRoute::List {
            return self.load();
        }
        let service = Arc::clone(&self.service);
        Box::pin(async move {
            let result = resolve(service.as_ref(), &route).await;
            E::wrap(EntityEvent::Resolved { route, result })
        })
    }

    fn go_back(&mut self) -> Task {
        self.history.back();
        self.activate()
    }

    fn selected_id(&self) -> Option<E::Id> {
        self.list.selected_entity().and_then(Entity::id).cloned()
    }

    /// The entity the current route points at, for edit/delete shortcuts.
    fn current_entity(&self) -> Option<&E> {
        match self.mode() {
            ScreenMode::Detail => self.detail.as_ref().map(|d| &d.entity),
            ScreenMode::List => self.list.selected_entity(),
            _ => None,
        }
    }

    pub fn apply(
        &mut self,
        event: EntityEvent<E>,
        services: &CatalogServices,
        notifications: &mut Notifications,
    ) -> Vec<Task> {
        let mut tasks = Vec::new();
        match event {
            EntityEvent::Loaded(result) => {
                if let Err(err) = self.list.on_loaded(result) {
                    notifications.push(
                        NotificationLevel::Error,
                        format!("Failed to load {}: {}", E::RESOURCE, err),
                    );
                }
            }
            EntityEvent::Resolved { route, result } => {
                if &route != self.history.current() {
                    tracing::debug!(entity = E::NAME, route = %route, "stale resolve ignored");
                    return tasks;
                }
                match result {
                    Ok(Resolved::Entity(entity)) => match route {
                        EntityRoute::View(_) => self.detail = Some(DetailComponent::new(entity)),
                        EntityRoute::New | EntityRoute::Edit(_) => {
                            let update = UpdateComponent::new(Arc::clone(&self.service), entity);
                            let pending = update.load_relationships_options(services);
                            self.update = Some(update);
                            tasks.push(Box::pin(async move {
                                E::wrap(EntityEvent::RelationsLoaded(pending.await))
                            }) as Task);
                        }
                        EntityRoute::List => {}
                    },
                    Ok(Resolved::NotFound) => {
                        self.history.back();
                        self.not_found = true;
                    }
                    Err(err) => {
                        notifications.push(
                            NotificationLevel::Error,
                            format!("Failed to open {}: {}", E::NAME, err),
                        );
                        tasks.push(self.go_back());
                    }
                }
            }
            EntityEvent::RelationsLoaded(relations) => {
                if let Some(update) = self.update.as_mut() {
                    update.on_relations_loaded(relations);
                }
            }
            EntityEvent::Saved { visit, result } => {
                if visit != self.visit {
                    tracing::debug!(entity = E::NAME, visit, "stale save response ignored");
                    return tasks;
                }
                let Some(update) = self.update.as_mut() else {
                    return tasks;
                };
                match update.on_save_response(result, &mut self.history) {
                    Ok(saved) => {
                        notifications.push(
                            NotificationLevel::Success,
                            format!("{} '{}' saved", E::NAME, saved.label()),
                        );
                        tasks.push(self.activate());
                    }
                    Err(err) => notifications.push(
                        NotificationLevel::Error,
                        format!("Failed to save {}: {}", E::NAME, err),
                    ),
                }
            }
            EntityEvent::Deleted(result) => {
                let Some(dialog) = self.delete.as_mut() else {
                    return tasks;
                };
                match dialog.on_deleted(result) {
                    DialogOutcome::Deleted => {
                        let label = dialog.entity.label();
                        self.delete = None;
                        notifications.push(
                            NotificationLevel::Success,
                            format!("{} '{}' deleted", E::NAME, label),
                        );
                        if self.mode() != ScreenMode::List {
                            self.history.replace(EntityRoute::List);
                        }
                        tasks.push(self.activate());
                    }
                    DialogOutcome::Failed(err) => notifications.push(
                        NotificationLevel::Error,
                        format!("Failed to delete {}: {}", E::NAME, err),
                    ),
                    DialogOutcome::Dismissed => self.delete = None,
                }
            }
        }
        tasks
    }

    pub fn handle_action(&mut self, action: Action, notifications: &mut Notifications) -> Vec<Task> {
        match self.mode() {
            ScreenMode::NotFound => self.handle_not_found(action),
            ScreenMode::ConfirmDelete => self.handle_delete(action),
            ScreenMode::Form => self.handle_form(action, notifications),
            ScreenMode::Detail => self.handle_detail(action),
            ScreenMode::Resolving => match action {
                Action::Cancel => vec![self.go_back()],
                _ => Vec::new(),
            },
            ScreenMode::List => self.handle_list(action),
        }
    }

    fn handle_not_found(&mut self, action: Action) -> Vec<Task> {
        match action {
            Action::Cancel | Action::Confirm => {
                self.not_found = false;
                vec![self.activate()]
            }
            _ => Vec::new(),
        }
    }

    fn handle_delete(&mut self, action: Action) -> Vec<Task> {
        match action {
            Action::Confirm => {
                let Some(dialog) = self.delete.as_mut() else {
                    return Vec::new();
                };
                if dialog.is_deleting {
                    return Vec::new();
                }
                let pending = dialog.confirm_delete();
                vec![Box::pin(async move { E::wrap(EntityEvent::Deleted(pending.await)) }) as Task]
            }
            Action::Cancel => {
                if let Some(dialog) = self.delete.take() {
                    let _ = dialog.cancel();
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_form(&mut self, action: Action, notifications: &mut Notifications) -> Vec<Task> {
        let Some(update) = self.update.as_mut() else {
            return Vec::new();
        };
        match action {
            Action::Save | Action::Confirm if !update.is_saving => match update.save() {
                Ok(pending) => {
                    let visit = self.visit;
                    return vec![Box::pin(async move {
                        E::wrap(EntityEvent::Saved {
                            visit,
                            result: pending.await,
                        })
                    }) as Task];
                }
                Err(err) => notifications.push(NotificationLevel::Warning, err.to_string()),
            },
            Action::Cancel => {
                update.previous_state(&mut self.history);
                return vec![self.activate()];
            }
            Action::NextField | Action::MoveDown => update.focus_next(),
            Action::PrevField | Action::MoveUp => update.focus_previous(),
            Action::MoveRight => update.cycle(true),
            Action::MoveLeft => update.cycle(false),
            Action::Input(c) => update.input(c),
            Action::Backspace => update.backspace(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_detail(&mut self, action: Action) -> Vec<Task> {
        match action {
            Action::Cancel => {
                if let Some(detail) = self.detail.as_ref() {
                    detail.previous_state(&mut self.history);
                }
                vec![self.activate()]
            }
            Action::EditItem => {
                let id = self.current_entity().and_then(Entity::id).cloned();
                match id {
                    Some(id) => vec![self.open(EntityRoute::Edit(id))],
                    None => Vec::new(),
                }
            }
            Action::DeleteItem => {
                self.open_delete_dialog();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_list(&mut self, action: Action) -> Vec<Task> {
        match action {
            Action::MoveDown => self.list.select_next(),
            Action::MoveUp => self.list.select_previous(),
            Action::Confirm | Action::MoveRight => {
                if let Some(id) = self.selected_id() {
                    return vec![self.open(EntityRoute::View(id))];
                }
            }
            Action::NewItem => return vec![self.open(EntityRoute::New)],
            Action::EditItem => {
                if let Some(id) = self.selected_id() {
                    return vec![self.open(EntityRoute::Edit(id))];
                }
            }
            Action::DeleteItem => self.open_delete_dialog(),
            Action::NextPage if self.list.pagination.has_next() => {
                let page = self.list.pagination.page + 1;
                return vec![self.load_page(page)];
            }
            Action::PrevPage if self.list.pagination.page > 1 => {
                let page = self.list.pagination.page - 1;
                return vec![self.load_page(page)];
            }
            Action::CycleSort => return vec![self.cycle_sort()],
            Action::ReverseSort => return vec![self.reverse_sort()],
            Action::Refresh => return vec![self.load()],
            Action::Cancel if !self.list.current_search.is_empty() => return vec![self.search("")],
            _ => {}
        }
        Vec::new()
    }

    fn open_delete_dialog(&mut self) {
        let dialog = self.current_entity().and_then(|entity| self.list.delete(entity));
        if dialog.is_some() {
            self.delete = dialog;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPrompt {
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct Modal {
    pub title: String,
    pub message: String,
}

/// Run `$body` with `$screen` bound to the active entity screen.
macro_rules! with_active_screen {
    (@bind $app:expr, $screen:ident, $body:expr, $($mutability:tt)?) => {
        match $app.active_view {
            View::Actors => {
                let $screen = &$($mutability)? $app.actors;
                $body
            }
            View::Environments => {
                let $screen = &$($mutability)? $app.environments;
                $body
            }
            View::Mitigations => {
                let $screen = &$($mutability)? $app.mitigations;
                $body
            }
            View::Scenarios => {
                let $screen = &$($mutability)? $app.scenarios;
                $body
            }
            View::Technologies => {
                let $screen = &$($mutability)? $app.technologies;
                $body
            }
            View::Vulnerabilities => {
                let $screen = &$($mutability)? $app.vulnerabilities;
                $body
            }
        }
    };
    ($app:expr, ref |$screen:ident| $body:expr) => {
        with_active_screen!(@bind $app, $screen, $body,)
    };
    ($app:expr, |$screen:ident| $body:expr) => {
        with_active_screen!(@bind $app, $screen, $body, mut)
    };
}

pub struct App {
    pub config: TuiConfig,
    pub theme: SynthBruteTheme,
    pub services: CatalogServices,
    pub active_view: View,

    pub actors: EntityScreen<Actor>,
    pub environments: EntityScreen<Environment>,
    pub mitigations: EntityScreen<Mitigation>,
    pub scenarios: EntityScreen<Scenario>,
    pub technologies: EntityScreen<Technology>,
    pub vulnerabilities: EntityScreen<Vulnerability>,

    pub notifications: Notifications,
    pub search: Option<SearchPrompt>,
    pub modal: Option<Modal>,
}

impl App {
    pub fn new(config: TuiConfig, services: CatalogServices) -> Self {
        let query = ListQuery::default();
        let per_page = config.items_per_page;
        Self {
            theme: SynthBruteTheme::synthbrute(),
            active_view: View::Actors,
            actors: EntityScreen::new(&services, &query, per_page),
            environments: EntityScreen::new(&services, &query, per_page),
            mitigations: EntityScreen::new(&services, &query, per_page),
            scenarios: EntityScreen::new(&services, &query, per_page),
            technologies: EntityScreen::new(&services, &query, per_page),
            vulnerabilities: EntityScreen::new(&services, &query, per_page),
            services,
            config,
            notifications: Notifications::new(),
            search: None,
            modal: None,
        }
    }

    /// Reopen the tab and search saved by a previous session.
    pub fn restore(&mut self, state: PersistedState) {
        self.active_view = state.active_view;
        let search = state.search.unwrap_or_default();
        with_active_screen!(self, |screen| screen.list.current_search = search);
    }

    pub fn persisted_state(&self) -> PersistedState {
        let search = with_active_screen!(self, ref |screen| screen.list.current_search.clone());
        PersistedState {
            active_view: self.active_view,
            search: Some(search).filter(|s| !s.is_empty()),
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(level, message);
    }

    pub fn expire_notifications(&mut self) {
        let ttl = chrono::Duration::seconds(NOTIFICATION_TTL_SECS);
        self.notifications.expire(chrono::Utc::now(), ttl);
    }

    pub fn input_mode(&self) -> InputMode {
        if self.search.is_some() {
            return InputMode::Text;
        }
        with_active_screen!(self, ref |screen| screen.input_mode())
    }

    pub fn active_mode(&self) -> ScreenMode {
        with_active_screen!(self, ref |screen| screen.mode())
    }

    /// Load the active tab's list if it has never been loaded.
    pub fn ensure_loaded(&mut self) -> Vec<Task> {
        with_active_screen!(self, |screen| {
            if screen.needs_load() {
                vec![screen.load()]
            } else {
                Vec::new()
            }
        })
    }

    pub fn apply(&mut self, event: CatalogEvent) -> Vec<Task> {
        let services = &self.services;
        let notifications = &mut self.notifications;
        match event {
            CatalogEvent::Actor(event) => self.actors.apply(event, services, notifications),
            CatalogEvent::Environment(event) => self.environments.apply(event, services, notifications),
            CatalogEvent::Mitigation(event) => self.mitigations.apply(event, services, notifications),
            CatalogEvent::Scenario(event) => self.scenarios.apply(event, services, notifications),
            CatalogEvent::Technology(event) => self.technologies.apply(event, services, notifications),
            CatalogEvent::Vulnerability(event) => {
                self.vulnerabilities.apply(event, services, notifications)
            }
        }
    }

    /// Returns `true` when the application should exit.
    pub fn handle_action(&mut self, action: Action) -> (bool, Vec<Task>) {
        if self.modal.is_some() {
            if matches!(action, Action::Cancel | Action::Confirm | Action::OpenHelp) {
                self.modal = None;
            }
            return (false, Vec::new());
        }
        if let Some(prompt) = self.search.clone() {
            return (false, self.handle_search_prompt(action, prompt));
        }

        let on_list = self.active_mode() == ScreenMode::List;
        match action {
            Action::Quit if self.input_mode() == InputMode::Navigate => return (true, Vec::new()),
            Action::NextView if on_list => {
                self.active_view = self.active_view.next();
                return (false, self.ensure_loaded());
            }
            Action::PrevView if on_list => {
                self.active_view = self.active_view.previous();
                return (false, self.ensure_loaded());
            }
            Action::SwitchView(index) if on_list => {
                if let Some(view) = View::from_index(index) {
                    self.active_view = view;
                }
                return (false, self.ensure_loaded());
            }
            Action::OpenHelp if self.input_mode() == InputMode::Navigate => {
                self.modal = Some(Modal {
                    title: "Keybindings".to_string(),
                    message: HELP_TEXT.to_string(),
                });
                return (false, Vec::new());
            }
            Action::OpenSearch if on_list => {
                let query = with_active_screen!(self, ref |screen| screen.list.current_search.clone());
                self.search = Some(SearchPrompt { query });
                return (false, Vec::new());
            }
            _ => {}
        }

        let notifications = &mut self.notifications;
        let tasks = match self.active_view {
            View::Actors => self.actors.handle_action(action, notifications),
            View::Environments => self.environments.handle_action(action, notifications),
            View::Mitigations => self.mitigations.handle_action(action, notifications),
            View::Scenarios => self.scenarios.handle_action(action, notifications),
            View::Technologies => self.technologies.handle_action(action, notifications),
            View::Vulnerabilities => self.vulnerabilities.handle_action(action, notifications),
        };
        (false, tasks)
    }

    fn handle_search_prompt(&mut self, action: Action, mut prompt: SearchPrompt) -> Vec<Task> {
        match action {
            Action::Input(c) => prompt.query.push(c),
            Action::Backspace => {
                prompt.query.pop();
            }
            Action::Cancel => {
                self.search = None;
                return Vec::new();
            }
            Action::Confirm => {
                self.search = None;
                let query = prompt.query;
                return with_active_screen!(self, |screen| vec![screen.search(&query)]);
            }
            _ => return Vec::new(),
        }
        self.search = Some(prompt);
        Vec::new()
    }
}

pub const HELP_TEXT: &str = "\
Tab / Shift-Tab or 1-6: switch entity
j/k or arrows: move selection
Enter: view   n: new   e: edit   d: delete
/: search   Esc: clear search or go back
s: next sort column   o: reverse sort
[ / ]: previous / next page   Ctrl-r: refresh
In forms: Tab moves between fields, Left/Right cycle choices, Ctrl-s saves
q: quit";

