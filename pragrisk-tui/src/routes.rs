//! Entity routes and the resolver that runs before a screen activates.

use crate::api_client::{ApiClientError, EntityService};
use pragrisk_core::{Entity, SortState};
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRoute<Id> {
    List,
    New,
    View(Id),
    Edit(Id),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("Unknown route: {0}")]
    Unknown(String),
    #[error("Invalid identifier '{0}'")]
    InvalidId(String),
}

impl<Id: FromStr> EntityRoute<Id> {
    /// Parse a route relative to an entity resource: ``, `new`,
    /// `<id>/view` or `<id>/edit`.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        match segments.as_slice() {
            [] => Ok(Self::List),
            ["new"] => Ok(Self::New),
            [id, action] => {
                let id = id
                    .parse::<Id>()
                    .map_err(|_| RouteError::InvalidId((*id).to_string()))?;
                match *action {
                    "view" => Ok(Self::View(id)),
                    "edit" => Ok(Self::Edit(id)),
                    _ => Err(RouteError::Unknown(path.to_string())),
                }
            }
            _ => Err(RouteError::Unknown(path.to_string())),
        }
    }
}

impl<Id> EntityRoute<Id> {
    pub fn id(&self) -> Option<&Id> {
        match self {
            Self::View(id) | Self::Edit(id) => Some(id),
            Self::List | Self::New => None,
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self, Self::New | Self::Edit(_))
    }
}

impl<Id: fmt::Display> fmt::Display for EntityRoute<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => Ok(()),
            Self::New => write!(f, "new"),
            Self::View(id) => write!(f, "{}/view", id),
            Self::Edit(id) => write!(f, "{}/edit", id),
        }
    }
}

/// Outcome of route resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<E> {
    Entity(E),
    /// The backend returned no entity; show the 404 screen.
    NotFound,
}

/// Fetch the entity a route needs. Routes without an identifier yield an
/// empty entity without touching the backend.
pub async fn resolve<E: Entity>(
    service: &dyn EntityService<E>,
    route: &EntityRoute<E::Id>,
) -> Result<Resolved<E>, ApiClientError> {
    let Some(id) = route.id() else {
        return Ok(Resolved::Entity(E::default()));
    };
    match service.find(id).await? {
        Some(entity) => Ok(Resolved::Entity(entity)),
        None => {
            tracing::info!(entity = E::NAME, %id, "entity not found");
            Ok(Resolved::NotFound)
        }
    }
}

/// List-screen query string: `search`, `sort` and `page`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub sort: Option<SortState>,
    pub page: Option<u32>,
}

impl ListQuery {
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        let query = query.trim_start_matches('?');
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "search" if !value.is_empty() => parsed.search = Some(value.into_owned()),
                "sort" => parsed.sort = SortState::parse(&value),
                "page" => parsed.page = value.parse().ok().filter(|p| *p > 0),
                _ => {}
            }
        }
        parsed
    }
}
