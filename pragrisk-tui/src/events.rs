//! Event types for the TUI event loop.

use crate::api_client::ApiClientError;
use crate::routes::{EntityRoute, Resolved};
use crossterm::event::KeyEvent;
use pragrisk_core::{
    Actor, Environment, FormBinding, Mitigation, Page, Scenario, Technology, Vulnerability,
};

#[derive(Debug)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    /// A detached backend call finished.
    Catalog(Box<CatalogEvent>),
}

/// Completion of a backend call made on behalf of one entity screen.
#[derive(Debug)]
pub enum EntityEvent<E: FormBinding> {
    Loaded(Result<Page<E>, ApiClientError>),
    Resolved {
        route: EntityRoute<E::Id>,
        result: Result<Resolved<E>, ApiClientError>,
    },
    RelationsLoaded(E::Relations),
    /// `visit` is the screen's navigation count when the save was sent.
    Saved {
        visit: u64,
        result: Result<E, ApiClientError>,
    },
    Deleted(Result<(), ApiClientError>),
}

#[derive(Debug)]
pub enum CatalogEvent {
    Actor(EntityEvent<Actor>),
    Environment(EntityEvent<Environment>),
    Mitigation(EntityEvent<Mitigation>),
    Scenario(EntityEvent<Scenario>),
    Technology(EntityEvent<Technology>),
    Vulnerability(EntityEvent<Vulnerability>),
}
