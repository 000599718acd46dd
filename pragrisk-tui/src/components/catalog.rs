//! Per-entity wiring: which service serves an entity and which related
//! collections its edit form loads.

use super::Pending;
use crate::api_client::{CatalogServices, EntityService};
use crate::events::{CatalogEvent, EntityEvent};
use pragrisk_core::{
    add_if_missing, unclaimed_parent_filter, Actor, ActorRelations, EditForm, Entity, Environment,
    FormBinding, Mitigation, RequestOptions, Scenario, ScenarioRelations, Technology,
    TechnologyRelations, Vulnerability,
};
use std::sync::Arc;

pub trait CatalogEntity: FormBinding {
    fn service(services: &CatalogServices) -> Arc<dyn EntityService<Self>>;

    /// Query the related resources and merge in the form's current
    /// selection. Entities without references keep what was seeded.
    fn load_relations(
        _services: &CatalogServices,
        _form: &EditForm,
        seeded: Self::Relations,
    ) -> Pending<Self::Relations> {
        Box::pin(async move { seeded })
    }

    fn wrap(event: EntityEvent<Self>) -> CatalogEvent;
}

/// The related entity a reference field currently points at.
fn selected<R: Entity>(form: &EditForm, field: &str, options: &[R]) -> Option<R> {
    form.reference(field, options).ok().flatten()
}

/// Query one related resource. On failure the previously known options
/// are kept so the picker still offers the current selection.
async fn fetch_options<R: Entity>(
    service: Arc<dyn EntityService<R>>,
    options: RequestOptions,
    selected: Option<R>,
    fallback: Vec<R>,
) -> Vec<R> {
    match service.query(&options).await {
        Ok(page) => add_if_missing(page.items, [selected.as_ref()]),
        Err(err) => {
            tracing::warn!(entity = R::NAME, error = %err, "failed to load related options");
            fallback
        }
    }
}

impl CatalogEntity for Actor {
    fn service(services: &CatalogServices) -> Arc<dyn EntityService<Self>> {
        Arc::clone(&services.actors)
    }

    fn load_relations(
        services: &CatalogServices,
        form: &EditForm,
        seeded: ActorRelations,
    ) -> Pending<ActorRelations> {
        let actors = Arc::clone(&services.actors);
        let current = selected(form, "inheritsFrom", &seeded.inherits_froms);
        Box::pin(async move {
            let options = RequestOptions::filtered(unclaimed_parent_filter::<Actor>());
            ActorRelations {
                inherits_froms: fetch_options(actors, options, current, seeded.inherits_froms).await,
            }
        })
    }

    fn wrap(event: EntityEvent<Self>) -> CatalogEvent {
        CatalogEvent::Actor(event)
    }
}

impl CatalogEntity for Environment {
    fn service(services: &CatalogServices) -> Arc<dyn EntityService<Self>> {
        Arc::clone(&services.environments)
    }

    fn wrap(event: EntityEvent<Self>) -> CatalogEvent {
        CatalogEvent::Environment(event)
    }
}

impl CatalogEntity for Mitigation {
    fn service(services: &CatalogServices) -> Arc<dyn EntityService<Self>> {
        Arc::clone(&services.mitigations)
    }

    fn wrap(event: EntityEvent<Self>) -> CatalogEvent {
        CatalogEvent::Mitigation(event)
    }
}

impl CatalogEntity for Vulnerability {
    fn service(services: &CatalogServices) -> Arc<dyn EntityService<Self>> {
        Arc::clone(&services.vulnerabilities)
    }

    fn wrap(event: EntityEvent<Self>) -> CatalogEvent {
        CatalogEvent::Vulnerability(event)
    }
}

impl CatalogEntity for Technology {
    fn service(services: &CatalogServices) -> Arc<dyn EntityService<Self>> {
        Arc::clone(&services.technologies)
    }

    fn load_relations(
        services: &CatalogServices,
        form: &EditForm,
        seeded: TechnologyRelations,
    ) -> Pending<TechnologyRelations> {
        let technologies = Arc::clone(&services.technologies);
        let current = selected(form, "parentTechnology", &seeded.parent_technologies);
        Box::pin(async move {
            let options = RequestOptions::filtered(unclaimed_parent_filter::<Technology>());
            TechnologyRelations {
                parent_technologies: fetch_options(
                    technologies,
                    options,
                    current,
                    seeded.parent_technologies,
                )
                .await,
            }
        })
    }

    fn wrap(event: EntityEvent<Self>) -> CatalogEvent {
        CatalogEvent::Technology(event)
    }
}

impl CatalogEntity for Scenario {
    fn service(services: &CatalogServices) -> Arc<dyn EntityService<Self>> {
        Arc::clone(&services.scenarios)
    }

    fn load_relations(
        services: &CatalogServices,
        form: &EditForm,
        seeded: ScenarioRelations,
    ) -> Pending<ScenarioRelations> {
        let actors = Arc::clone(&services.actors);
        let technologies = Arc::clone(&services.technologies);
        let vulnerabilities = Arc::clone(&services.vulnerabilities);
        let actor = selected(form, "actorFK", &seeded.actors);
        let technology = selected(form, "technologyFK", &seeded.technologies);
        let vulnerability = selected(form, "vulnerabilityFK", &seeded.vulnerabilities);
        Box::pin(async move {
            let (actors, technologies, vulnerabilities) = futures_util::future::join3(
                fetch_options(actors, RequestOptions::new(), actor, seeded.actors),
                fetch_options(technologies, RequestOptions::new(), technology, seeded.technologies),
                fetch_options(
                    vulnerabilities,
                    RequestOptions::new(),
                    vulnerability,
                    seeded.vulnerabilities,
                ),
            )
            .await;
            ScenarioRelations {
                actors,
                technologies,
                vulnerabilities,
            }
        })
    }

    fn wrap(event: EntityEvent<Self>) -> CatalogEvent {
        CatalogEvent::Scenario(event)
    }
}
