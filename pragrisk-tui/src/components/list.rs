//! Paginated, searchable entity list.

use super::{DeleteDialog, Pending};
use crate::api_client::{ApiClientError, EntityService};
use crate::routes::ListQuery;
use pragrisk_core::{Entity, Page, Pagination, RequestOptions, SortState};
use std::sync::Arc;

pub struct ListComponent<E: Entity> {
    service: Arc<dyn EntityService<E>>,
    /// `None` until the first load completes.
    pub entities: Option<Vec<E>>,
    pub is_loading: bool,
    pub current_search: String,
    pub sort: SortState,
    pub pagination: Pagination,
    pub selected: Option<usize>,
}

impl<E: Entity> ListComponent<E> {
    pub fn new(service: Arc<dyn EntityService<E>>, query: &ListQuery, items_per_page: u32) -> Self {
        let mut pagination = Pagination::new(items_per_page);
        if let Some(page) = query.page {
            pagination.page = page;
        }
        Self {
            service,
            entities: None,
            is_loading: false,
            current_search: query.search.clone().unwrap_or_default(),
            sort: query.sort.clone().unwrap_or_else(SortState::by_id::<E>),
            pagination,
            selected: None,
        }
    }

    pub fn entities(&self) -> &[E] {
        self.entities.as_deref().unwrap_or(&[])
    }

    pub fn sort(&self) -> Vec<String> {
        self.sort.params::<E>()
    }

    /// Search requests carry only the query; listings carry paging and sort.
    pub fn request_options(&self) -> RequestOptions {
        if self.current_search.is_empty() {
            RequestOptions::new()
                .with_page(self.pagination.request_page(), self.pagination.items_per_page)
                .with_sort(self.sort())
        } else {
            RequestOptions::search(self.current_search.clone())
        }
    }

    pub fn load_all(&mut self) -> Pending<Result<Page<E>, ApiClientError>> {
        self.is_loading = true;
        let service = Arc::clone(&self.service);
        let options = self.request_options();
        let searching = !self.current_search.is_empty();
        tracing::debug!(entity = E::NAME, searching, "loading list");
        Box::pin(async move {
            if searching {
                service.search(&options).await
            } else {
                service.query(&options).await
            }
        })
    }

    /// Apply a finished load. The collection is replaced wholesale; a stale
    /// response arriving late simply wins.
    pub fn on_loaded(&mut self, result: Result<Page<E>, ApiClientError>) -> Result<(), ApiClientError> {
        self.is_loading = false;
        let page = result.map_err(|err| {
            tracing::warn!(entity = E::NAME, error = %err, "list load failed");
            err
        })?;
        self.pagination.total_items = page
            .total_count
            .unwrap_or_else(|| page.items.len() as u64);
        self.selected = match (self.selected, page.items.len()) {
            (_, 0) => None,
            (Some(index), len) => Some(index.min(len - 1)),
            (None, _) => Some(0),
        };
        self.entities = Some(page.items);
        Ok(())
    }

    /// Load and apply in place.
    pub async fn refresh(&mut self) -> Result<(), ApiClientError> {
        let result = self.load_all().await;
        self.on_loaded(result)
    }

    pub fn search(&mut self, query: &str) -> Pending<Result<Page<E>, ApiClientError>> {
        self.current_search = query.trim().to_string();
        self.pagination.page = 1;
        self.load_all()
    }

    pub fn load_page(&mut self, page: u32) -> Pending<Result<Page<E>, ApiClientError>> {
        self.pagination.page = page.clamp(1, self.pagination.page_count());
        self.load_all()
    }

    pub fn sort_by(&mut self, predicate: &str) -> Pending<Result<Page<E>, ApiClientError>> {
        self.sort.toggle(predicate);
        self.load_all()
    }

    pub fn delete(&self, entity: &E) -> Option<DeleteDialog<E>> {
        DeleteDialog::new(Arc::clone(&self.service), entity.clone())
    }

    pub fn track_id<'a>(&self, entity: &'a E) -> Option<&'a E::Id> {
        entity.id()
    }

    pub fn selected_entity(&self) -> Option<&E> {
        self.selected.and_then(|index| self.entities().get(index))
    }

    pub fn select_next(&mut self) {
        let len = self.entities().len();
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(index) if index + 1 < len => index + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        let len = self.entities().len();
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => len - 1,
            Some(index) => index - 1,
        });
    }
}
