//! Delete confirmation dialog.

use super::Pending;
use crate::api_client::{ApiClientError, EntityService};
use pragrisk_core::Entity;
use std::sync::Arc;

/// How a delete dialog closed.
#[derive(Debug)]
pub enum DialogOutcome {
    /// The entity is gone; the owning list reloads.
    Deleted,
    /// The request failed and the dialog stays open.
    Failed(ApiClientError),
    Dismissed,
}

pub struct DeleteDialog<E: Entity> {
    service: Arc<dyn EntityService<E>>,
    pub entity: E,
    id: E::Id,
    pub is_deleting: bool,
}

impl<E: Entity> DeleteDialog<E> {
    /// `None` for entities that were never persisted.
    pub fn new(service: Arc<dyn EntityService<E>>, entity: E) -> Option<Self> {
        let id = entity.id()?.clone();
        Some(Self {
            service,
            entity,
            id,
            is_deleting: false,
        })
    }

    pub fn id(&self) -> &E::Id {
        &self.id
    }

    pub fn confirm_delete(&mut self) -> Pending<Result<(), ApiClientError>> {
        self.is_deleting = true;
        let service = Arc::clone(&self.service);
        let id = self.id.clone();
        tracing::debug!(entity = E::NAME, %id, "deleting");
        Box::pin(async move { service.delete(&id).await })
    }

    pub fn on_deleted(&mut self, result: Result<(), ApiClientError>) -> DialogOutcome {
        self.is_deleting = false;
        match result {
            Ok(()) => DialogOutcome::Deleted,
            Err(err) => {
                tracing::warn!(entity = E::NAME, id = %self.id, error = %err, "delete failed");
                DialogOutcome::Failed(err)
            }
        }
    }

    pub fn cancel(self) -> DialogOutcome {
        DialogOutcome::Dismissed
    }
}
