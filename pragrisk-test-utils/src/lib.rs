//! PragRisk Test Utilities
//!
//! Shared test infrastructure for the PragRisk workspace:
//! - In-memory entity services that record every backend call
//! - A history stub that counts navigation
//! - Proptest generators for catalogue entities
//! - Fixtures for common scenarios

pub use pragrisk_core::{
    Actor, Entity, Environment, EnvironmentKind, Mitigation, MitigationStatus, MitigationType,
    NumericId, Page, RequestOptions, Scenario, TechCategory, TechStack, Technology, Vulnerability,
};
pub use pragrisk_tui::api_client::{ApiClientError, CatalogServices, EntityService};
pub use pragrisk_tui::components::History;

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

// ============================================================================
// IN-MEMORY SERVICE
// ============================================================================

/// One backend call observed by an [`InMemoryService`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call<Id> {
    Create,
    Update(Option<Id>),
    PartialUpdate(Option<Id>),
    Find(Id),
    Query(RequestOptions),
    Search(RequestOptions),
    Delete(Id),
}

struct ServiceState<E: Entity> {
    items: Vec<E>,
    calls: Vec<Call<E::Id>>,
    failure: Option<u16>,
    page_override: Option<Page<E>>,
}

/// Entity service backed by a `Vec`, for driving components without HTTP.
///
/// Every call is recorded. `fail_with` turns every later call into an HTTP
/// status error; `respond_with` pins the page returned by query and search.
pub struct InMemoryService<E: Entity> {
    state: Mutex<ServiceState<E>>,
}

impl<E: Entity> InMemoryService<E> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<E>) -> Self {
        Self {
            state: Mutex::new(ServiceState {
                items,
                calls: Vec::new(),
                failure: None,
                page_override: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ServiceState<E>> {
        self.state.lock().expect("in-memory service state poisoned")
    }

    pub fn fail_with(&self, status: u16) {
        self.state().failure = Some(status);
    }

    pub fn recover(&self) {
        self.state().failure = None;
    }

    pub fn respond_with(&self, page: Page<E>) {
        self.state().page_override = Some(page);
    }

    pub fn items(&self) -> Vec<E> {
        self.state().items.clone()
    }

    pub fn calls(&self) -> Vec<Call<E::Id>> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Record a call and fail it when a failure status is configured.
    fn record(&self, call: Call<E::Id>) -> Result<MutexGuard<'_, ServiceState<E>>, ApiClientError> {
        let mut state = self.state();
        state.calls.push(call);
        match state.failure {
            Some(status) => Err(ApiClientError::Status {
                status,
                message: format!("{} request failed", E::NAME),
            }),
            None => Ok(state),
        }
    }

    fn page(state: &ServiceState<E>, items: Vec<E>) -> Page<E> {
        match &state.page_override {
            Some(page) => page.clone(),
            None => {
                let total = items.len() as u64;
                Page::new(items).with_total(total)
            }
        }
    }
}

impl<E: Entity> Default for InMemoryService<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found<E: Entity>(id: &E::Id) -> ApiClientError {
    ApiClientError::Status {
        status: 404,
        message: format!("{} {} not found", E::NAME, id),
    }
}

#[async_trait]
impl<E: Entity> EntityService<E> for InMemoryService<E> {
    async fn create(&self, entity: &E) -> Result<E, ApiClientError> {
        let mut state = self.record(Call::Create)?;
        state.items.push(entity.clone());
        Ok(entity.clone())
    }

    async fn update(&self, entity: &E) -> Result<E, ApiClientError> {
        let mut state = self.record(Call::Update(entity.id().cloned()))?;
        let id = entity
            .id()
            .ok_or(ApiClientError::MissingIdentifier { entity: E::NAME })?;
        let slot = state
            .items
            .iter_mut()
            .find(|item| item.id() == Some(id))
            .ok_or_else(|| not_found::<E>(id))?;
        *slot = entity.clone();
        Ok(entity.clone())
    }

    async fn partial_update(&self, entity: &E) -> Result<E, ApiClientError> {
        let state = self.record(Call::PartialUpdate(entity.id().cloned()))?;
        let id = entity
            .id()
            .ok_or(ApiClientError::MissingIdentifier { entity: E::NAME })?;
        state
            .items
            .iter()
            .find(|item| item.id() == Some(id))
            .cloned()
            .ok_or_else(|| not_found::<E>(id))
    }

    async fn find(&self, id: &E::Id) -> Result<Option<E>, ApiClientError> {
        let state = self.record(Call::Find(id.clone()))?;
        Ok(state.items.iter().find(|item| item.id() == Some(id)).cloned())
    }

    async fn query(&self, options: &RequestOptions) -> Result<Page<E>, ApiClientError> {
        let state = self.record(Call::Query(options.clone()))?;
        let items = state.items.clone();
        Ok(Self::page(&state, items))
    }

    async fn delete(&self, id: &E::Id) -> Result<(), ApiClientError> {
        let mut state = self.record(Call::Delete(id.clone()))?;
        let before = state.items.len();
        state.items.retain(|item| item.id() != Some(id));
        if state.items.len() == before {
            return Err(not_found::<E>(id));
        }
        Ok(())
    }

    async fn search(&self, options: &RequestOptions) -> Result<Page<E>, ApiClientError> {
        let state = self.record(Call::Search(options.clone()))?;
        let needle = options.query.clone().unwrap_or_default().to_lowercase();
        let items = state
            .items
            .iter()
            .filter(|item| item.label().to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(Self::page(&state, items))
    }
}

/// In-memory services for every catalogue resource, with handles kept for
/// inspection after the components have run.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    pub actors: Arc<InMemoryService<Actor>>,
    pub environments: Arc<InMemoryService<Environment>>,
    pub mitigations: Arc<InMemoryService<Mitigation>>,
    pub scenarios: Arc<InMemoryService<Scenario>>,
    pub technologies: Arc<InMemoryService<Technology>>,
    pub vulnerabilities: Arc<InMemoryService<Vulnerability>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn services(&self) -> CatalogServices {
        CatalogServices {
            actors: self.actors.clone(),
            environments: self.environments.clone(),
            mitigations: self.mitigations.clone(),
            scenarios: self.scenarios.clone(),
            technologies: self.technologies.clone(),
            vulnerabilities: self.vulnerabilities.clone(),
        }
    }
}

// ============================================================================
// HISTORY
// ============================================================================

/// Counts how often a component navigated back.
#[derive(Debug, Default)]
pub struct RecordingHistory {
    pub backs: usize,
}

impl History for RecordingHistory {
    fn back(&mut self) {
        self.backs += 1;
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for catalogue entities.

    use super::*;
    use proptest::option;
    use proptest::prelude::*;
    use uuid::Uuid;

    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<u128>().prop_map(Uuid::from_u128)
    }

    pub fn arb_numeric_id() -> impl Strategy<Value = NumericId> {
        1i64..100_000
    }

    pub fn arb_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{0,30}"
    }

    pub fn arb_description() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 .,]{0,200}"
    }

    pub fn arb_environment_kind() -> impl Strategy<Value = EnvironmentKind> {
        prop::sample::select(EnvironmentKind::all())
    }

    pub fn arb_mitigation_type() -> impl Strategy<Value = MitigationType> {
        prop::sample::select(MitigationType::all())
    }

    pub fn arb_mitigation_status() -> impl Strategy<Value = MitigationStatus> {
        prop::sample::select(MitigationStatus::all())
    }

    pub fn arb_tech_category() -> impl Strategy<Value = TechCategory> {
        prop::sample::select(TechCategory::all())
    }

    pub fn arb_tech_stack() -> impl Strategy<Value = TechStack> {
        prop::sample::select(TechStack::all())
    }

    /// Actor without a parent.
    pub fn arb_actor() -> impl Strategy<Value = Actor> {
        (
            option::of(arb_uuid()),
            option::of(arb_name()),
            option::of(arb_name()),
            option::of(arb_name()),
            option::of(arb_environment_kind()),
            option::of(arb_description()),
        )
            .prop_map(
                |(actor_id, first_name, last_name, nick_name, environment, description)| Actor {
                    actor_id,
                    first_name,
                    last_name,
                    nick_name,
                    environment,
                    description,
                    inherits_from: None,
                },
            )
    }

    pub fn arb_persisted_actor() -> impl Strategy<Value = Actor> {
        (arb_actor(), arb_uuid()).prop_map(|(mut actor, id)| {
            actor.actor_id = Some(id);
            actor
        })
    }

    pub fn arb_environment() -> impl Strategy<Value = Environment> {
        (
            option::of(arb_numeric_id()),
            option::of(arb_name()),
            option::of(arb_description()),
        )
            .prop_map(|(id, name, description)| Environment {
                id,
                name,
                description,
            })
    }

    pub fn arb_mitigation() -> impl Strategy<Value = Mitigation> {
        (
            option::of(arb_numeric_id()),
            option::of("R{1,3}[0-9]"),
            option::of(arb_name()),
            option::of(arb_description()),
            option::of(arb_name()),
            option::of(arb_mitigation_type()),
            option::of(arb_mitigation_status()),
        )
            .prop_map(
                |(id, control_id, title, description, framework_reference, mitigation_type, status)| {
                    Mitigation {
                        id,
                        control_id,
                        title,
                        description,
                        framework_reference,
                        mitigation_type,
                        status,
                    }
                },
            )
    }

    pub fn arb_vulnerability() -> impl Strategy<Value = Vulnerability> {
        (
            option::of(arb_numeric_id()),
            option::of(arb_name()),
            option::of(arb_description()),
        )
            .prop_map(|(id, name, description)| Vulnerability {
                id,
                name,
                description,
            })
    }

    /// Technology without a parent.
    pub fn arb_technology() -> impl Strategy<Value = Technology> {
        (
            option::of(arb_numeric_id()),
            option::of(arb_name()),
            option::of(arb_tech_category()),
            option::of(arb_description()),
            option::of(arb_tech_stack()),
        )
            .prop_map(|(id, name, category, description, tech_stack)| Technology {
                id,
                name,
                category,
                description,
                tech_stack,
                parent_technology: None,
            })
    }

    pub fn arb_scenario() -> impl Strategy<Value = Scenario> {
        (
            option::of(arb_numeric_id()),
            option::of(arb_name()),
            option::of(arb_description()),
            option::of(0.0f64..10.0),
            option::of(0.0f64..10.0),
            option::of(arb_persisted_actor()),
            option::of(arb_technology()),
            option::of(arb_vulnerability()),
        )
            .prop_map(
                |(id, title, description, probability, consequence, actor, technology, vulnerability)| {
                    Scenario {
                        id,
                        title,
                        description,
                        probability,
                        consequence,
                        risk_value: probability.zip(consequence).map(|(p, c)| p * c),
                        actor,
                        technology,
                        vulnerability,
                    }
                },
            )
    }

    /// Distinct numeric identifiers, for collections without duplicates.
    pub fn arb_distinct_ids(max: usize) -> impl Strategy<Value = Vec<NumericId>> {
        prop::collection::hash_set(arb_numeric_id(), 0..=max).prop_map(|ids| ids.into_iter().collect())
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built entities and configuration.

    use super::*;
    use pragrisk_tui::config::{AuthConfig, ThemeConfig, TuiConfig};
    use std::path::Path;
    use uuid::Uuid;

    /// Valid configuration writing its state files under `dir`.
    pub fn test_config(dir: &Path) -> TuiConfig {
        TuiConfig {
            api_base_url: "http://localhost:8080".to_string(),
            auth: AuthConfig {
                api_key: Some("test-key".to_string()),
                jwt: None,
            },
            request_timeout_ms: 5_000,
            refresh_interval_ms: 1_000,
            items_per_page: 20,
            persistence_path: dir.join("state.json"),
            error_log_path: dir.join("pragrisk-tui.log"),
            log_filter: None,
            theme: ThemeConfig {
                name: "synthbrute".to_string(),
            },
        }
    }

    pub fn actor(first_name: &str) -> Actor {
        Actor {
            actor_id: Some(Uuid::new_v4()),
            first_name: Some(first_name.to_string()),
            last_name: Some("Nordmann".to_string()),
            nick_name: Some(first_name.to_ascii_lowercase()),
            environment: Some(EnvironmentKind::Kommune),
            description: Some("Municipal case handler".to_string()),
            inherits_from: None,
        }
    }

    pub fn environment(id: NumericId, name: &str) -> Environment {
        Environment {
            id: Some(id),
            name: Some(name.to_string()),
            description: None,
        }
    }

    pub fn mitigation(id: NumericId, title: &str) -> Mitigation {
        Mitigation {
            id: Some(id),
            control_id: Some(format!("R{}", id.rem_euclid(10))),
            title: Some(title.to_string()),
            description: None,
            framework_reference: Some("ISO 27002".to_string()),
            mitigation_type: Some(MitigationType::Preventive),
            status: Some(MitigationStatus::Defined),
        }
    }

    pub fn technology(id: NumericId, name: &str) -> Technology {
        Technology {
            id: Some(id),
            name: Some(name.to_string()),
            category: Some(TechCategory::Fagsystem),
            description: None,
            tech_stack: Some(TechStack::Java),
            parent_technology: None,
        }
    }

    pub fn vulnerability(id: NumericId, name: &str) -> Vulnerability {
        Vulnerability {
            id: Some(id),
            name: Some(name.to_string()),
            description: None,
        }
    }

    pub fn scenario(id: NumericId, title: &str) -> Scenario {
        Scenario {
            id: Some(id),
            title: Some(title.to_string()),
            description: None,
            probability: Some(2.0),
            consequence: Some(3.0),
            risk_value: Some(6.0),
            actor: None,
            technology: None,
            vulnerability: None,
        }
    }
}
