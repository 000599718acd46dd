//! Component behaviour against in-memory services.
//!
//! Covers list loading and search dispatch, the save lifecycle of the
//! update form, delete dialogs, and related-option loading.

use pragrisk_core::{
    unclaimed_parent_filter, Actor, Environment, FormError, Page, RequestOptions, Scenario,
    Technology,
};
use pragrisk_test_utils::fixtures;
use pragrisk_test_utils::generators::arb_environment;
use pragrisk_test_utils::{Call, InMemoryCatalog, InMemoryService, RecordingHistory};
use pragrisk_tui::components::{DeleteDialog, DialogOutcome, ListComponent, UpdateComponent};
use pragrisk_tui::routes::ListQuery;
use proptest::prelude::*;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn test_runtime() -> Result<Runtime, TestCaseError> {
    Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

fn listing(page: u32, size: u32, sort: &[&str]) -> RequestOptions {
    RequestOptions::new()
        .with_page(page, size)
        .with_sort(sort.iter().map(|s| s.to_string()).collect())
}

// ============================================================================
// LIST
// ============================================================================

proptest! {
    #[test]
    fn list_load_exposes_exactly_the_returned_item(environment in arb_environment()) {
        let rt = test_runtime()?;
        let service = Arc::new(InMemoryService::with_items(vec![environment.clone()]));
        let mut list = ListComponent::<Environment>::new(service, &ListQuery::default(), 20);

        let pending = list.load_all();
        let result = rt.block_on(pending);
        prop_assert!(list.on_loaded(result).is_ok());
        prop_assert_eq!(list.entities(), &[environment][..]);
    }
}

#[tokio::test]
async fn list_starts_empty_and_tracks_loading() {
    let service = Arc::new(InMemoryService::with_items(vec![fixtures::environment(1, "Prod")]));
    let mut list = ListComponent::<Environment>::new(service, &ListQuery::default(), 20);
    assert!(list.entities.is_none());
    assert!(!list.is_loading);

    let pending = list.load_all();
    assert!(list.is_loading);
    let result = pending.await;
    list.on_loaded(result).unwrap();

    assert!(!list.is_loading);
    assert_eq!(list.pagination.total_items, 1);
    assert_eq!(list.selected, Some(0));
}

#[tokio::test]
async fn list_queries_with_paging_and_default_sort() {
    let service = Arc::new(InMemoryService::<Environment>::new());
    let mut list = ListComponent::<Environment>::new(service.clone(), &ListQuery::default(), 20);

    list.refresh().await.unwrap();

    assert_eq!(service.calls(), vec![Call::Query(listing(0, 20, &["id,asc"]))]);
    assert!(list.entities().is_empty());
}

#[tokio::test]
async fn list_honours_query_string() {
    let service = Arc::new(InMemoryService::<Environment>::new());
    let query = ListQuery::parse("sort=name,desc&page=3");
    let mut list = ListComponent::<Environment>::new(service.clone(), &query, 10);

    list.refresh().await.unwrap();

    assert_eq!(
        service.calls(),
        vec![Call::Query(listing(2, 10, &["name,desc", "id"]))]
    );
}

#[tokio::test]
async fn search_dispatches_to_search_endpoint_and_resets_page() {
    let service = Arc::new(InMemoryService::with_items(vec![
        fixtures::environment(1, "Production"),
        fixtures::environment(2, "Staging"),
    ]));
    let mut list = ListComponent::<Environment>::new(service.clone(), &ListQuery::default(), 20);
    list.pagination.page = 4;

    let result = list.search("  prod ").await;
    list.on_loaded(result).unwrap();

    assert_eq!(list.current_search, "prod");
    assert_eq!(list.pagination.page, 1);
    assert_eq!(service.calls(), vec![Call::Search(RequestOptions::search("prod"))]);
    assert_eq!(list.entities().len(), 1);
    assert_eq!(list.entities()[0].name.as_deref(), Some("Production"));
}

#[tokio::test]
async fn clearing_search_goes_back_to_query() {
    let service = Arc::new(InMemoryService::<Environment>::new());
    let query = ListQuery::parse("search=prod");
    let mut list = ListComponent::<Environment>::new(service.clone(), &query, 20);

    let first = list.load_all().await;
    list.on_loaded(first).unwrap();
    let second = list.search("").await;
    list.on_loaded(second).unwrap();

    let calls = service.calls();
    assert!(matches!(calls[0], Call::Search(_)));
    assert!(matches!(calls[1], Call::Query(_)));
}

#[tokio::test]
async fn sort_by_same_column_flips_direction() {
    let service = Arc::new(InMemoryService::<Environment>::new());
    let mut list = ListComponent::<Environment>::new(service.clone(), &ListQuery::default(), 20);

    let _ = list.sort_by("name").await;
    let _ = list.sort_by("name").await;

    assert_eq!(
        service.calls(),
        vec![
            Call::Query(listing(0, 20, &["name,asc", "id"])),
            Call::Query(listing(0, 20, &["name,desc", "id"])),
        ]
    );
}

#[tokio::test]
async fn failed_load_keeps_previous_collection() {
    let service = Arc::new(InMemoryService::with_items(vec![fixtures::environment(1, "Prod")]));
    let mut list = ListComponent::<Environment>::new(service.clone(), &ListQuery::default(), 20);
    list.refresh().await.unwrap();

    service.fail_with(503);
    let err = list.refresh().await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(!list.is_loading);
    assert_eq!(list.entities().len(), 1);
}

#[tokio::test]
async fn total_count_drives_pagination() {
    let service = Arc::new(InMemoryService::<Environment>::new());
    service.respond_with(Page::new(vec![fixtures::environment(1, "Prod")]).with_total(45));
    let mut list = ListComponent::<Environment>::new(service.clone(), &ListQuery::default(), 20);

    list.refresh().await.unwrap();

    assert_eq!(list.pagination.page_count(), 3);
    assert!(list.pagination.has_next());
}

// ============================================================================
// UPDATE
// ============================================================================

#[tokio::test]
async fn save_creates_new_entity_and_navigates_back_once() {
    let service = Arc::new(InMemoryService::<Environment>::new());
    let mut update = UpdateComponent::<Environment>::new(service.clone(), Environment::default());
    assert!(update.is_new());
    update.form.set("name", "Production").unwrap();

    let pending = update.save().unwrap();
    assert!(update.is_saving);
    let result = pending.await;

    let mut history = RecordingHistory::default();
    let saved = update.on_save_response(result, &mut history).unwrap();

    assert!(!update.is_saving);
    assert_eq!(history.backs, 1);
    assert_eq!(saved.name.as_deref(), Some("Production"));
    assert_eq!(service.calls(), vec![Call::Create]);
}

#[tokio::test]
async fn save_updates_existing_entity() {
    let existing = fixtures::environment(7, "Prod");
    let service = Arc::new(InMemoryService::with_items(vec![existing.clone()]));
    let mut update = UpdateComponent::<Environment>::new(service.clone(), existing);
    assert!(!update.is_new());
    update.form.set("description", "Primary site").unwrap();

    let result = update.save().unwrap().await;
    let mut history = RecordingHistory::default();
    update.on_save_response(result, &mut history).unwrap();

    assert_eq!(service.calls(), vec![Call::Update(Some(7))]);
    assert_eq!(
        service.items()[0].description.as_deref(),
        Some("Primary site")
    );
    assert_eq!(history.backs, 1);
}

#[tokio::test]
async fn failed_save_clears_saving_without_navigating() {
    let service = Arc::new(InMemoryService::<Environment>::new());
    service.fail_with(500);
    let mut update = UpdateComponent::<Environment>::new(service.clone(), Environment::default());
    update.form.set("name", "Production").unwrap();

    let pending = update.save().unwrap();
    assert!(update.is_saving);
    let result = pending.await;

    let mut history = RecordingHistory::default();
    let err = update.on_save_response(result, &mut history).unwrap_err();

    assert!(!update.is_saving);
    assert_eq!(history.backs, 0);
    assert_eq!(err.status(), Some(500));
}

#[test]
fn invalid_form_dispatches_nothing() {
    let service = Arc::new(InMemoryService::<Environment>::new());
    let mut update = UpdateComponent::<Environment>::new(service.clone(), Environment::default());

    let result = update.save();

    assert!(matches!(result, Err(FormError::Invalid(_))));
    assert!(!update.is_saving);
    assert!(!update.errors.is_empty());
    assert!(service.calls().is_empty());
}

#[test]
fn update_form_patches_fields_from_entity() {
    let service = Arc::new(InMemoryService::<Environment>::new());
    let mut update = UpdateComponent::<Environment>::new(service.clone(), Environment::default());

    update.update_form(fixtures::environment(3, "Test"));

    assert_eq!(update.form.value("id"), Some("3"));
    assert_eq!(update.form.value("name"), Some("Test"));
    assert_eq!(update.form.value("description"), None);
}

#[test]
fn typing_edits_the_focused_field() {
    let service = Arc::new(InMemoryService::<Environment>::new());
    let mut update = UpdateComponent::<Environment>::new(service.clone(), Environment::default());

    for c in "Prodx".chars() {
        update.input(c);
    }
    update.backspace();

    assert_eq!(update.form.value("name"), Some("Prod"));
}

#[tokio::test]
async fn actor_relations_use_unclaimed_filter_and_keep_current_parent() {
    let sibling = fixtures::actor("Kari");
    let parent = fixtures::actor("Ola");
    let catalog = InMemoryCatalog {
        actors: Arc::new(InMemoryService::with_items(vec![sibling.clone()])),
        ..InMemoryCatalog::new()
    };
    let mut child = fixtures::actor("Per");
    child.inherits_from = Some(Box::new(parent.clone()));

    let update = UpdateComponent::<Actor>::new(catalog.actors.clone(), child);
    let relations = update.load_relationships_options(&catalog.services()).await;

    assert_eq!(
        catalog.actors.calls(),
        vec![Call::Query(RequestOptions::filtered(unclaimed_parent_filter::<Actor>()))]
    );
    assert_eq!(relations.inherits_froms, vec![parent, sibling]);
}

#[tokio::test]
async fn failed_relations_load_keeps_seeded_options() {
    let catalog = InMemoryCatalog::new();
    catalog.technologies.fail_with(502);
    let parent = fixtures::technology(1, "Platform");
    let mut child = fixtures::technology(2, "Portal");
    child.parent_technology = Some(Box::new(parent.clone()));

    let update = UpdateComponent::<Technology>::new(catalog.technologies.clone(), child);
    let relations = update.load_relationships_options(&catalog.services()).await;

    assert_eq!(relations.parent_technologies, vec![parent]);
    assert_eq!(
        catalog.technologies.calls(),
        vec![Call::Query(RequestOptions::filtered(unclaimed_parent_filter::<Technology>()))]
    );
}

#[tokio::test]
async fn scenario_relations_query_all_three_resources() {
    let catalog = InMemoryCatalog {
        vulnerabilities: Arc::new(InMemoryService::with_items(vec![fixtures::vulnerability(
            4, "Weak passwords",
        )])),
        ..InMemoryCatalog::new()
    };

    let update = UpdateComponent::<Scenario>::new(catalog.scenarios.clone(), Scenario::default());
    let relations = update.load_relationships_options(&catalog.services()).await;

    assert_eq!(catalog.actors.calls(), vec![Call::Query(RequestOptions::new())]);
    assert_eq!(catalog.technologies.calls(), vec![Call::Query(RequestOptions::new())]);
    assert_eq!(catalog.vulnerabilities.calls(), vec![Call::Query(RequestOptions::new())]);
    assert!(relations.actors.is_empty());
    assert_eq!(relations.vulnerabilities.len(), 1);
}

// ============================================================================
// DELETE
// ============================================================================

#[test]
fn delete_dialog_requires_identifier() {
    let service = Arc::new(InMemoryService::<Environment>::new());
    assert!(DeleteDialog::<Environment>::new(service, Environment::default()).is_none());
}

#[tokio::test]
async fn confirm_delete_removes_entity() {
    let service = Arc::new(InMemoryService::with_items(vec![fixtures::environment(9, "Old")]));
    let list = ListComponent::<Environment>::new(service.clone(), &ListQuery::default(), 20);
    let mut dialog = list.delete(&fixtures::environment(9, "Old")).unwrap();
    assert_eq!(*dialog.id(), 9);

    let pending = dialog.confirm_delete();
    assert!(dialog.is_deleting);
    let outcome = dialog.on_deleted(pending.await);

    assert!(matches!(outcome, DialogOutcome::Deleted));
    assert!(!dialog.is_deleting);
    assert_eq!(service.calls(), vec![Call::Delete(9)]);
    assert!(service.items().is_empty());
}

#[tokio::test]
async fn failed_delete_reports_error() {
    let service = Arc::new(InMemoryService::with_items(vec![fixtures::environment(9, "Old")]));
    service.fail_with(409);
    let mut dialog = DeleteDialog::<Environment>::new(service.clone(), fixtures::environment(9, "Old")).unwrap();

    let result = dialog.confirm_delete().await;
    let outcome = dialog.on_deleted(result);

    match outcome {
        DialogOutcome::Failed(err) => assert_eq!(err.status(), Some(409)),
        other => panic!("Expected failure, got: {:?}", other),
    }
    assert_eq!(service.items().len(), 1);
}

#[test]
fn cancel_dismisses_without_calling_backend() {
    let service = Arc::new(InMemoryService::with_items(vec![fixtures::environment(9, "Old")]));
    let dialog = DeleteDialog::<Environment>::new(service.clone(), fixtures::environment(9, "Old")).unwrap();

    assert!(matches!(dialog.cancel(), DialogOutcome::Dismissed));
    assert!(service.calls().is_empty());
}
