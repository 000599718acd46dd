//! Request construction for the REST services. Nothing here touches the
//! network; requests are built and inspected.

use pragrisk_core::{unclaimed_parent_filter, Actor, Environment, Mitigation, RequestOptions};
use pragrisk_test_utils::fixtures;
use pragrisk_tui::api_client::{ApiClientError, RestClient, MERGE_PATCH_JSON};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

fn client() -> RestClient {
    let mut config = fixtures::test_config(std::path::Path::new("tmp"));
    config.api_base_url = "http://localhost:8080/".to_string();
    RestClient::new(&config).unwrap()
}

fn query_pairs(request: &reqwest::Request) -> Vec<(String, String)> {
    request
        .url()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn json_body(request: &reqwest::Request) -> serde_json::Value {
    let bytes = request
        .body()
        .and_then(reqwest::Body::as_bytes)
        .expect("buffered body");
    serde_json::from_slice(bytes).unwrap()
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let rest = client();
    assert_eq!(rest.base_url(), "http://localhost:8080");
    assert_eq!(
        rest.service::<Environment>().resource_url(),
        "http://localhost:8080/api/environments"
    );
    assert_eq!(
        rest.service::<Mitigation>().search_url(),
        "http://localhost:8080/api/_search/mitigations"
    );
}

#[test]
fn create_posts_to_collection_with_auth() {
    let service = client().service::<Environment>();
    let mut environment = fixtures::environment(1, "Prod");
    environment.id = None;

    let request = service.create_request(&environment).unwrap();

    assert_eq!(request.method(), &Method::POST);
    assert_eq!(request.url().as_str(), "http://localhost:8080/api/environments");
    assert_eq!(request.headers().get("x-api-key").unwrap(), "test-key");
    assert_eq!(json_body(&request), serde_json::json!({ "name": "Prod" }));
}

#[test]
fn update_puts_to_item() {
    let service = client().service::<Environment>();

    let request = service.update_request(&fixtures::environment(12, "Prod")).unwrap();

    assert_eq!(request.method(), &Method::PUT);
    assert_eq!(request.url().path(), "/api/environments/12");
    assert_eq!(json_body(&request)["id"], 12);
}

#[test]
fn partial_update_uses_merge_patch() {
    let service = client().service::<Actor>();
    let actor = fixtures::actor("Kari");
    let id = actor.actor_id.unwrap();

    let request = service.partial_update_request(&actor).unwrap();

    assert_eq!(request.method(), &Method::PATCH);
    assert_eq!(request.url().path(), format!("/api/actors/{}", id));
    assert_eq!(request.headers().get(CONTENT_TYPE).unwrap(), MERGE_PATCH_JSON);
    assert_eq!(json_body(&request)["actorID"], id.to_string());
}

#[test]
fn requests_without_identifier_are_rejected() {
    let service = client().service::<Environment>();
    let environment = Environment::default();

    assert!(matches!(
        service.update_request(&environment),
        Err(ApiClientError::MissingIdentifier { entity: "Environment" })
    ));
    assert!(matches!(
        service.partial_update_request(&environment),
        Err(ApiClientError::MissingIdentifier { .. })
    ));
}

#[test]
fn find_and_delete_address_the_item() {
    let service = client().service::<Environment>();

    let find = service.find_request(&3).unwrap();
    let delete = service.delete_request(&3).unwrap();

    assert_eq!(find.method(), &Method::GET);
    assert_eq!(find.url().path(), "/api/environments/3");
    assert_eq!(delete.method(), &Method::DELETE);
    assert_eq!(delete.url().path(), "/api/environments/3");
}

#[test]
fn query_carries_paging_and_repeated_sort() {
    let service = client().service::<Environment>();
    let options = RequestOptions::new()
        .with_page(1, 20)
        .with_sort(vec!["name,desc".to_string(), "id".to_string()]);

    let request = service.query_request(&options).unwrap();

    assert_eq!(request.url().path(), "/api/environments");
    assert_eq!(
        query_pairs(&request),
        vec![
            ("page".to_string(), "1".to_string()),
            ("size".to_string(), "20".to_string()),
            ("sort".to_string(), "name,desc".to_string()),
            ("sort".to_string(), "id".to_string()),
        ]
    );
}

#[test]
fn filtered_query_sends_filter_token() {
    let service = client().service::<Actor>();

    let request = service
        .query_request(&RequestOptions::filtered(unclaimed_parent_filter::<Actor>()))
        .unwrap();

    assert_eq!(
        query_pairs(&request),
        vec![("filter".to_string(), "actor-is-null".to_string())]
    );
}

#[test]
fn search_targets_search_endpoint() {
    let service = client().service::<Mitigation>();

    let request = service.search_request(&RequestOptions::search("phishing")).unwrap();

    assert_eq!(request.method(), &Method::GET);
    assert_eq!(request.url().path(), "/api/_search/mitigations");
    assert_eq!(
        query_pairs(&request),
        vec![("query".to_string(), "phishing".to_string())]
    );
}

#[test]
fn jwt_is_sent_as_bearer_token() {
    let mut config = fixtures::test_config(std::path::Path::new("tmp"));
    config.auth.api_key = None;
    config.auth.jwt = Some("secret".to_string());
    let rest = RestClient::new(&config).unwrap();

    let request = rest.service::<Environment>().find_request(&1).unwrap();

    assert_eq!(request.headers().get("authorization").unwrap(), "Bearer secret");
    assert!(request.headers().get("x-api-key").is_none());
}
