//! Form binding between entities and editable field lists.
//!
//! An [`EditForm`] holds every value as text, the way a form control would.
//! [`FormBinding`] maps an entity onto a form and back, resolving reference
//! fields against the related collections loaded for the edit screen.

use crate::entities::{
    Actor, Entity, Environment, Mitigation, Scenario, Technology, Vulnerability,
};
use crate::enums::{EnvironmentKind, MitigationStatus, MitigationType, TechCategory, TechStack};
use crate::error::{FormError, ValidationError};
use crate::reconcile::add_if_missing;
use regex::Regex;
use std::fmt::Debug;
use std::str::FromStr;

/// Maximum length of free-text description fields.
pub const DESCRIPTION_MAX_LENGTH: usize = 1024;

/// Mitigation control identifiers: one or more `R` followed by a single digit.
pub const CONTROL_ID_PATTERN: &str = r"^R+\d$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Entity identifier, shown read-only.
    Identifier,
    Text,
    Number,
    /// One of a fixed set of wire codes.
    Choice(&'static [&'static str]),
    /// Identifier of a related entity picked from a loaded collection.
    Reference,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
    pub required: bool,
    pub max_length: Option<usize>,
    pub pattern: Option<&'static str>,
}

impl FormField {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            value: String::new(),
            required: false,
            max_length: None,
            pattern: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Whole value must match `pattern`.
    pub fn pattern(mut self, pattern: &'static str) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn is_editable(&self) -> bool {
        self.kind != FieldKind::Identifier
    }

    fn validate(&self) -> Option<ValidationError> {
        let value = self.value.trim();
        if value.is_empty() {
            return self.required.then(|| ValidationError::Required {
                field: self.name.to_string(),
            });
        }
        if let Some(max) = self.max_length {
            let len = value.chars().count();
            if len > max {
                return Some(ValidationError::TooLong {
                    field: self.name.to_string(),
                    max,
                    actual: len,
                });
            }
        }
        if let Some(pattern) = self.pattern {
            let matches = Regex::new(pattern).map(|re| re.is_match(value));
            if !matches.unwrap_or(false) {
                return Some(ValidationError::InvalidValue {
                    field: self.name.to_string(),
                    reason: format!("'{}' does not match {}", value, pattern),
                });
            }
        }
        match self.kind {
            FieldKind::Number if value.parse::<f64>().is_err() => Some(ValidationError::InvalidValue {
                field: self.name.to_string(),
                reason: format!("'{}' is not a number", value),
            }),
            FieldKind::Choice(options)
                if !options.iter().any(|option| option.eq_ignore_ascii_case(value)) =>
            {
                Some(ValidationError::InvalidValue {
                    field: self.name.to_string(),
                    reason: format!("'{}' is not one of {}", value, options.join(", ")),
                })
            }
            _ => None,
        }
    }
}

/// Ordered set of form fields for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    fields: Vec<FormField>,
}

impl EditForm {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Trimmed value, `None` when blank or unknown.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name)
            .map(|f| f.value.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.value(name).map(str::to_string)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        field.value = value.into();
        Ok(())
    }

    /// Patch a field from an optional value, clearing it on `None`.
    pub fn patch<T: ToString>(&mut self, name: &str, value: Option<T>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.value = value.map(|v| v.to_string()).unwrap_or_default();
        }
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, ValidationError> {
        match self.value(name) {
            None => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| ValidationError::InvalidValue {
                field: name.to_string(),
                reason: format!("cannot parse '{}'", raw),
            }),
        }
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        self.fields.iter().filter_map(FormField::validate).collect()
    }

    /// Resolve a reference field against the loaded collection.
    pub fn reference<R: Entity>(&self, name: &str, options: &[R]) -> Result<Option<R>, FormError> {
        let Some(raw) = self.value(name) else {
            return Ok(None);
        };
        options
            .iter()
            .find(|option| option.id().map(|id| id.to_string()).as_deref() == Some(raw))
            .cloned()
            .map(Some)
            .ok_or_else(|| FormError::UnknownReference {
                field: name.to_string(),
                id: raw.to_string(),
            })
    }

    fn ensure_valid(&self) -> Result<(), FormError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FormError::Invalid(errors))
        }
    }
}

fn reference_options<R: Entity>(options: &[R]) -> Vec<(String, String)> {
    options
        .iter()
        .filter_map(|option| option.id().map(|id| (id.to_string(), option.label())))
        .collect()
}

fn take_and_merge<R: Entity>(collection: &mut Vec<R>, candidate: Option<&R>) {
    let current = std::mem::take(collection);
    *collection = add_if_missing(current, [candidate]);
}

/// Maps an entity to and from its edit form.
pub trait FormBinding: Entity {
    /// Related collections offered by reference pickers.
    type Relations: Default + Clone + Debug + Send + Sync + 'static;

    /// Blank form with every field declared.
    fn form() -> EditForm;

    fn patch_form(&self, form: &mut EditForm);

    /// Merge the entity's own references into the related collections so
    /// the current selection is always offered.
    fn seed_relations(&self, _relations: &mut Self::Relations) {}

    /// `(id, label)` choices for a reference field.
    fn reference_options(_relations: &Self::Relations, _field: &str) -> Vec<(String, String)> {
        Vec::new()
    }

    fn create_from_form(form: &EditForm, relations: &Self::Relations) -> Result<Self, FormError>;
}

// ============================================================================
// ACTOR
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorRelations {
    pub inherits_froms: Vec<Actor>,
}

impl FormBinding for Actor {
    type Relations = ActorRelations;

    fn form() -> EditForm {
        EditForm::new(vec![
            FormField::new("actorID", "Actor ID", FieldKind::Identifier),
            FormField::new("firstName", "First Name", FieldKind::Text).required(),
            FormField::new("lastName", "Last Name", FieldKind::Text).required(),
            FormField::new("nickName", "Nick Name", FieldKind::Text).required(),
            FormField::new("environMent", "Environment", FieldKind::Choice(EnvironmentKind::codes()))
                .required(),
            FormField::new("description", "Description", FieldKind::Text)
                .max_length(DESCRIPTION_MAX_LENGTH),
            FormField::new("inheritsFrom", "Inherits From", FieldKind::Reference),
        ])
    }

    fn patch_form(&self, form: &mut EditForm) {
        form.patch("actorID", self.actor_id);
        form.patch("firstName", self.first_name.as_ref());
        form.patch("lastName", self.last_name.as_ref());
        form.patch("nickName", self.nick_name.as_ref());
        form.patch("environMent", self.environment.map(|e| e.as_code()));
        form.patch("description", self.description.as_ref());
        form.patch("inheritsFrom", self.inherits_from.as_ref().and_then(|a| a.actor_id));
    }

    fn seed_relations(&self, relations: &mut ActorRelations) {
        take_and_merge(&mut relations.inherits_froms, self.inherits_from.as_deref());
    }

    fn reference_options(relations: &ActorRelations, field: &str) -> Vec<(String, String)> {
        match field {
            "inheritsFrom" => reference_options(&relations.inherits_froms),
            _ => Vec::new(),
        }
    }

    fn create_from_form(form: &EditForm, relations: &ActorRelations) -> Result<Self, FormError> {
        form.ensure_valid()?;
        Ok(Actor {
            actor_id: form.parse("actorID")?,
            first_name: form.text("firstName"),
            last_name: form.text("lastName"),
            nick_name: form.text("nickName"),
            environment: form.parse::<EnvironmentKind>("environMent")?,
            description: form.text("description"),
            inherits_from: form
                .reference("inheritsFrom", &relations.inherits_froms)?
                .map(Box::new),
        })
    }
}

// ============================================================================
// ENVIRONMENT
// ============================================================================

impl FormBinding for Environment {
    type Relations = ();

    fn form() -> EditForm {
        EditForm::new(vec![
            FormField::new("id", "ID", FieldKind::Identifier),
            FormField::new("name", "Name", FieldKind::Text).required(),
            FormField::new("description", "Description", FieldKind::Text),
        ])
    }

    fn patch_form(&self, form: &mut EditForm) {
        form.patch("id", self.id);
        form.patch("name", self.name.as_ref());
        form.patch("description", self.description.as_ref());
    }

    fn create_from_form(form: &EditForm, _relations: &()) -> Result<Self, FormError> {
        form.ensure_valid()?;
        Ok(Environment {
            id: form.parse("id")?,
            name: form.text("name"),
            description: form.text("description"),
        })
    }
}

// ============================================================================
// MITIGATION
// ============================================================================

impl FormBinding for Mitigation {
    type Relations = ();

    fn form() -> EditForm {
        EditForm::new(vec![
            FormField::new("id", "ID", FieldKind::Identifier),
            FormField::new("controlID", "Control ID", FieldKind::Text)
                .required()
                .pattern(CONTROL_ID_PATTERN),
            FormField::new("title", "Title", FieldKind::Text).required(),
            FormField::new("description", "Description", FieldKind::Text),
            FormField::new("frameworkReference", "Framework Reference", FieldKind::Text),
            FormField::new("type", "Type", FieldKind::Choice(MitigationType::codes())).required(),
            FormField::new("status", "Status", FieldKind::Choice(MitigationStatus::codes()))
                .required(),
        ])
    }

    fn patch_form(&self, form: &mut EditForm) {
        form.patch("id", self.id);
        form.patch("controlID", self.control_id.as_ref());
        form.patch("title", self.title.as_ref());
        form.patch("description", self.description.as_ref());
        form.patch("frameworkReference", self.framework_reference.as_ref());
        form.patch("type", self.mitigation_type.map(|t| t.as_code()));
        form.patch("status", self.status.map(|s| s.as_code()));
    }

    fn create_from_form(form: &EditForm, _relations: &()) -> Result<Self, FormError> {
        form.ensure_valid()?;
        Ok(Mitigation {
            id: form.parse("id")?,
            control_id: form.text("controlID"),
            title: form.text("title"),
            description: form.text("description"),
            framework_reference: form.text("frameworkReference"),
            mitigation_type: form.parse::<MitigationType>("type")?,
            status: form.parse::<MitigationStatus>("status")?,
        })
    }
}

// ============================================================================
// VULNERABILITY
// ============================================================================

impl FormBinding for Vulnerability {
    type Relations = ();

    fn form() -> EditForm {
        EditForm::new(vec![
            FormField::new("id", "ID", FieldKind::Identifier),
            FormField::new("name", "Name", FieldKind::Text).required(),
            FormField::new("description", "Description", FieldKind::Text)
                .max_length(DESCRIPTION_MAX_LENGTH),
        ])
    }

    fn patch_form(&self, form: &mut EditForm) {
        form.patch("id", self.id);
        form.patch("name", self.name.as_ref());
        form.patch("description", self.description.as_ref());
    }

    fn create_from_form(form: &EditForm, _relations: &()) -> Result<Self, FormError> {
        form.ensure_valid()?;
        Ok(Vulnerability {
            id: form.parse("id")?,
            name: form.text("name"),
            description: form.text("description"),
        })
    }
}

// ============================================================================
// TECHNOLOGY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TechnologyRelations {
    pub parent_technologies: Vec<Technology>,
}

impl FormBinding for Technology {
    type Relations = TechnologyRelations;

    fn form() -> EditForm {
        EditForm::new(vec![
            FormField::new("id", "ID", FieldKind::Identifier),
            FormField::new("name", "Name", FieldKind::Text).required(),
            FormField::new("category", "Category", FieldKind::Choice(TechCategory::codes()))
                .required(),
            FormField::new("description", "Description", FieldKind::Text)
                .max_length(DESCRIPTION_MAX_LENGTH),
            FormField::new("techStackType", "Tech Stack", FieldKind::Choice(TechStack::codes()))
                .required(),
            FormField::new("parentTechnology", "Parent Technology", FieldKind::Reference),
        ])
    }

    fn patch_form(&self, form: &mut EditForm) {
        form.patch("id", self.id);
        form.patch("name", self.name.as_ref());
        form.patch("category", self.category.map(|c| c.as_code()));
        form.patch("description", self.description.as_ref());
        form.patch("techStackType", self.tech_stack.map(|s| s.as_code()));
        form.patch("parentTechnology", self.parent_technology.as_ref().and_then(|t| t.id));
    }

    fn seed_relations(&self, relations: &mut TechnologyRelations) {
        take_and_merge(&mut relations.parent_technologies, self.parent_technology.as_deref());
    }

    fn reference_options(relations: &TechnologyRelations, field: &str) -> Vec<(String, String)> {
        match field {
            "parentTechnology" => reference_options(&relations.parent_technologies),
            _ => Vec::new(),
        }
    }

    fn create_from_form(form: &EditForm, relations: &TechnologyRelations) -> Result<Self, FormError> {
        form.ensure_valid()?;
        Ok(Technology {
            id: form.parse("id")?,
            name: form.text("name"),
            category: form.parse::<TechCategory>("category")?,
            description: form.text("description"),
            tech_stack: form.parse::<TechStack>("techStackType")?,
            parent_technology: form
                .reference("parentTechnology", &relations.parent_technologies)?
                .map(Box::new),
        })
    }
}

// ============================================================================
// SCENARIO
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioRelations {
    pub actors: Vec<Actor>,
    pub technologies: Vec<Technology>,
    pub vulnerabilities: Vec<Vulnerability>,
}

impl FormBinding for Scenario {
    type Relations = ScenarioRelations;

    fn form() -> EditForm {
        EditForm::new(vec![
            FormField::new("id", "ID", FieldKind::Identifier),
            FormField::new("title", "Title", FieldKind::Text).required(),
            FormField::new("description", "Description", FieldKind::Text)
                .max_length(DESCRIPTION_MAX_LENGTH),
            FormField::new("probability", "Probability", FieldKind::Number),
            FormField::new("qonsequence", "Consequence", FieldKind::Number),
            FormField::new("riskValue", "Risk Value", FieldKind::Number),
            FormField::new("actorFK", "Actor", FieldKind::Reference),
            FormField::new("technologyFK", "Technology", FieldKind::Reference),
            FormField::new("vulnerabilityFK", "Vulnerability", FieldKind::Reference),
        ])
    }

    fn patch_form(&self, form: &mut EditForm) {
        form.patch("id", self.id);
        form.patch("title", self.title.as_ref());
        form.patch("description", self.description.as_ref());
        form.patch("probability", self.probability);
        form.patch("qonsequence", self.consequence);
        form.patch("riskValue", self.risk_value);
        form.patch("actorFK", self.actor.as_ref().and_then(|a| a.actor_id));
        form.patch("technologyFK", self.technology.as_ref().and_then(|t| t.id));
        form.patch("vulnerabilityFK", self.vulnerability.as_ref().and_then(|v| v.id));
    }

    fn seed_relations(&self, relations: &mut ScenarioRelations) {
        take_and_merge(&mut relations.actors, self.actor.as_ref());
        take_and_merge(&mut relations.technologies, self.technology.as_ref());
        take_and_merge(&mut relations.vulnerabilities, self.vulnerability.as_ref());
    }

    fn reference_options(relations: &ScenarioRelations, field: &str) -> Vec<(String, String)> {
        match field {
            "actorFK" => reference_options(&relations.actors),
            "technologyFK" => reference_options(&relations.technologies),
            "vulnerabilityFK" => reference_options(&relations.vulnerabilities),
            _ => Vec::new(),
        }
    }

    fn create_from_form(form: &EditForm, relations: &ScenarioRelations) -> Result<Self, FormError> {
        form.ensure_valid()?;
        Ok(Scenario {
            id: form.parse("id")?,
            title: form.text("title"),
            description: form.text("description"),
            probability: form.parse("probability")?,
            consequence: form.parse("qonsequence")?,
            risk_value: form.parse("riskValue")?,
            actor: form.reference("actorFK", &relations.actors)?,
            technology: form.reference("technologyFK", &relations.technologies)?,
            vulnerability: form.reference("vulnerabilityFK", &relations.vulnerabilities)?,
        })
    }
}
