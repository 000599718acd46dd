//! Create/edit form for one entity.

use super::{CatalogEntity, History, Pending};
use crate::api_client::{ApiClientError, CatalogServices, EntityService};
use pragrisk_core::{EditForm, FieldKind, FormBinding, FormError, ValidationError};
use std::sync::Arc;

pub struct UpdateComponent<E: FormBinding> {
    service: Arc<dyn EntityService<E>>,
    /// Entity the form was last patched from.
    pub entity: E,
    pub form: EditForm,
    pub relations: E::Relations,
    pub is_saving: bool,
    pub errors: Vec<ValidationError>,
    /// Index of the focused form field.
    pub focused: usize,
}

impl<E: FormBinding> UpdateComponent<E> {
    pub fn new(service: Arc<dyn EntityService<E>>, entity: E) -> Self {
        let mut component = Self {
            service,
            entity: E::default(),
            form: E::form(),
            relations: E::Relations::default(),
            is_saving: false,
            errors: Vec::new(),
            focused: 0,
        };
        component.update_form(entity);
        component.focused = component.first_editable().unwrap_or(0);
        component
    }

    /// Patch the form from `entity` and make sure its current references
    /// are offered by the pickers.
    pub fn update_form(&mut self, entity: E) {
        entity.patch_form(&mut self.form);
        entity.seed_relations(&mut self.relations);
        self.entity = entity;
        self.errors.clear();
    }

    pub fn is_new(&self) -> bool {
        self.entity.id().is_none()
    }

    pub fn on_relations_loaded(&mut self, relations: E::Relations) {
        self.relations = relations;
    }

    /// Validate the form and dispatch create or update.
    ///
    /// An invalid form dispatches nothing and leaves `is_saving` false.
    pub fn save(&mut self) -> Result<Pending<Result<E, ApiClientError>>, FormError> {
        let entity = match E::create_from_form(&self.form, &self.relations) {
            Ok(entity) => entity,
            Err(err) => {
                self.errors = match &err {
                    FormError::Invalid(errors) => errors.clone(),
                    FormError::Field(error) => vec![error.clone()],
                    _ => Vec::new(),
                };
                return Err(err);
            }
        };
        self.errors.clear();
        self.is_saving = true;
        let service = Arc::clone(&self.service);
        let creating = entity.id().is_none();
        tracing::debug!(entity = E::NAME, creating, "saving");
        Ok(Box::pin(async move {
            if creating {
                service.create(&entity).await
            } else {
                service.update(&entity).await
            }
        }))
    }

    /// Apply a finished save. Success navigates back exactly once.
    pub fn on_save_response(
        &mut self,
        result: Result<E, ApiClientError>,
        history: &mut dyn History,
    ) -> Result<E, ApiClientError> {
        self.is_saving = false;
        match result {
            Ok(saved) => {
                history.back();
                Ok(saved)
            }
            Err(err) => {
                tracing::warn!(entity = E::NAME, error = %err, "save failed");
                Err(err)
            }
        }
    }

    pub fn previous_state(&self, history: &mut dyn History) {
        history.back();
    }

    // ------------------------------------------------------------------
    // Field editing
    // ------------------------------------------------------------------

    fn first_editable(&self) -> Option<usize> {
        self.form.fields().iter().position(|f| f.is_editable())
    }

    pub fn focus_next(&mut self) {
        let fields = self.form.fields();
        let len = fields.len();
        for step in 1..=len {
            let index = (self.focused + step) % len;
            if fields[index].is_editable() {
                self.focused = index;
                return;
            }
        }
    }

    pub fn focus_previous(&mut self) {
        let fields = self.form.fields();
        let len = fields.len();
        for step in 1..=len {
            let index = (self.focused + len - step) % len;
            if fields[index].is_editable() {
                self.focused = index;
                return;
            }
        }
    }

    fn focused_field(&self) -> Option<(&'static str, FieldKind, String)> {
        self.form
            .fields()
            .get(self.focused)
            .filter(|f| f.is_editable())
            .map(|f| (f.name, f.kind, f.value.clone()))
    }

    /// Type a character into a free-text or numeric field.
    pub fn input(&mut self, c: char) {
        let Some((name, kind, mut value)) = self.focused_field() else {
            return;
        };
        if matches!(kind, FieldKind::Text | FieldKind::Number) {
            value.push(c);
            let _ = self.form.set(name, value);
        }
    }

    pub fn backspace(&mut self) {
        let Some((name, kind, mut value)) = self.focused_field() else {
            return;
        };
        match kind {
            FieldKind::Text | FieldKind::Number => {
                value.pop();
                let _ = self.form.set(name, value);
            }
            FieldKind::Choice(_) | FieldKind::Reference => {
                let _ = self.form.set(name, String::new());
            }
            FieldKind::Identifier => {}
        }
    }

    /// Step through the options of a choice or reference field. The blank
    /// entry sits before the first option.
    pub fn cycle(&mut self, forward: bool) {
        let Some((name, kind, value)) = self.focused_field() else {
            return;
        };
        let options: Vec<String> = match kind {
            FieldKind::Choice(codes) => codes.iter().map(|c| c.to_string()).collect(),
            FieldKind::Reference => E::reference_options(&self.relations, name)
                .into_iter()
                .map(|(id, _)| id)
                .collect(),
            _ => return,
        };
        let mut choices = Vec::with_capacity(options.len() + 1);
        choices.push(String::new());
        choices.extend(options);
        let current = choices
            .iter()
            .position(|c| c.eq_ignore_ascii_case(value.trim()))
            .unwrap_or(0);
        let len = choices.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        let _ = self.form.set(name, choices.swap_remove(next));
    }
}

impl<E: CatalogEntity> UpdateComponent<E> {
    /// Fetch the related collections the pickers offer.
    pub fn load_relationships_options(&self, services: &CatalogServices) -> Pending<E::Relations> {
        E::load_relations(services, &self.form, self.relations.clone())
    }
}
