//! Query options, sort parameters and pagination for list requests.

use crate::entities::Entity;
use serde::{Deserialize, Serialize};

/// Default page size for paginated listings.
pub const ITEMS_PER_PAGE: u32 = 20;

/// Header carrying the total number of items behind a paginated listing.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Options recognised by the listing and search endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Zero-based page index.
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// Repeated `field,direction` entries; see [`SortState::params`].
    pub sort: Vec<String>,
    /// Free-text query for the search endpoint.
    pub query: Option<String>,
    /// Backend filter token such as `actor-is-null`.
    pub filter: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn filtered(filter: impl Into<String>) -> Self {
        Self {
            filter: Some(filter.into()),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: u32, size: u32) -> Self {
        self.page = Some(page);
        self.size = Some(size);
        self
    }

    pub fn with_sort(mut self, sort: Vec<String>) -> Self {
        self.sort = sort;
        self
    }

    /// Flatten into query-string pairs, one `sort` pair per entry.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        for sort in &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(query) = &self.query {
            pairs.push(("query", query.clone()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }
        pairs
    }
}

/// Filter token excluding entities already claimed as a parent, used by
/// self-referencing hierarchy pickers (`actor-is-null`).
pub fn unclaimed_parent_filter<E: Entity>() -> String {
    format!("{}-is-null", E::NAME.to_ascii_lowercase())
}

/// Build the sort parameters for a paginated query.
///
/// Sorting by anything other than the identifier appends the bare
/// identifier field as a tie-breaker so paging stays deterministic.
pub fn sort_params(predicate: &str, ascending: bool, id_field: &str) -> Vec<String> {
    let direction = if ascending { "asc" } else { "desc" };
    let mut result = vec![format!("{},{}", predicate, direction)];
    if predicate != id_field {
        result.push(id_field.to_string());
    }
    result
}

/// Column and direction a list is currently sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub predicate: String,
    pub ascending: bool,
}

impl SortState {
    /// Identifier ascending, the listing default.
    pub fn by_id<E: Entity>() -> Self {
        Self {
            predicate: E::ID_FIELD.to_string(),
            ascending: true,
        }
    }

    pub fn params<E: Entity>(&self) -> Vec<String> {
        sort_params(&self.predicate, self.ascending, E::ID_FIELD)
    }

    /// Parse a `field,asc|desc` pair as found in a query string.
    pub fn parse(value: &str) -> Option<Self> {
        let (predicate, direction) = value.split_once(',')?;
        if predicate.is_empty() {
            return None;
        }
        Some(Self {
            predicate: predicate.to_string(),
            ascending: direction != "desc",
        })
    }

    /// Clicking the active column flips the direction; a new column starts ascending.
    pub fn toggle(&mut self, predicate: &str) {
        if self.predicate == predicate {
            self.ascending = !self.ascending;
        } else {
            self.predicate = predicate.to_string();
            self.ascending = true;
        }
    }
}

/// Pagination state for a list view. Pages are numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub items_per_page: u32,
    pub total_items: u64,
}

impl Pagination {
    pub fn new(items_per_page: u32) -> Self {
        Self {
            page: 1,
            items_per_page: items_per_page.max(1),
            total_items: 0,
        }
    }

    /// Zero-based page index sent to the backend.
    pub fn request_page(&self) -> u32 {
        self.page.saturating_sub(1)
    }

    pub fn page_count(&self) -> u32 {
        let per_page = u64::from(self.items_per_page);
        let pages = self.total_items.div_ceil(per_page);
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(ITEMS_PER_PAGE)
    }
}

/// One page of a listing as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    pub items: Vec<E>,
    /// From the total-count header when the backend sends it.
    pub total_count: Option<u64>,
}

impl<E> Page<E> {
    pub fn new(items: Vec<E>) -> Self {
        Self {
            items,
            total_count: None,
        }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total_count = Some(total);
        self
    }
}
