//! Read-only view of a resolved entity.

use super::History;
use pragrisk_core::Entity;

#[derive(Debug, Clone, PartialEq)]
pub struct DetailComponent<E: Entity> {
    pub entity: E,
}

impl<E: Entity> DetailComponent<E> {
    pub fn new(entity: E) -> Self {
        Self { entity }
    }

    pub fn fields(&self) -> Vec<(&'static str, String)> {
        self.entity.fields()
    }

    pub fn previous_state(&self, history: &mut dyn History) {
        history.back();
    }
}
