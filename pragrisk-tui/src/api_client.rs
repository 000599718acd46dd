//! REST client for the catalogue resources.
//!
//! Every entity type is served by the same resource layout:
//! `api/<resource>` for collection and single-item calls and
//! `api/_search/<resource>` for free-text search.

use crate::config::{AuthConfig, TuiConfig};
use async_trait::async_trait;
use pragrisk_core::{
    Actor, Entity, Environment, Mitigation, Page, RequestOptions, Scenario, Technology,
    Vulnerability, TOTAL_COUNT_HEADER,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// Content type for partial updates.
pub const MERGE_PATCH_JSON: &str = "application/merge-patch+json";

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("{entity} has no identifier")]
    MissingIdentifier { entity: &'static str },
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl ApiClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// CRUD and search operations for one entity resource.
#[async_trait]
pub trait EntityService<E: Entity>: Send + Sync {
    async fn create(&self, entity: &E) -> Result<E, ApiClientError>;

    async fn update(&self, entity: &E) -> Result<E, ApiClientError>;

    /// Merge-patch: only the fields present on `entity` are changed.
    async fn partial_update(&self, entity: &E) -> Result<E, ApiClientError>;

    /// `Ok(None)` when the backend has no such entity.
    async fn find(&self, id: &E::Id) -> Result<Option<E>, ApiClientError>;

    async fn query(&self, options: &RequestOptions) -> Result<Page<E>, ApiClientError>;

    async fn delete(&self, id: &E::Id) -> Result<(), ApiClientError>;

    async fn search(&self, options: &RequestOptions) -> Result<Page<E>, ApiClientError>;
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let auth_header = build_auth_headers(&config.auth)?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn service<E: Entity>(&self) -> RestEntityService<E> {
        RestEntityService {
            rest: self.clone(),
            _entity: PhantomData,
        }
    }

    fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .headers(self.auth_header.clone())
    }
}

/// [`EntityService`] over HTTP for entity type `E`.
pub struct RestEntityService<E> {
    rest: RestClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for RestEntityService<E> {
    fn clone(&self) -> Self {
        Self {
            rest: self.rest.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> RestEntityService<E> {
    pub fn resource_url(&self) -> String {
        format!("{}/api/{}", self.rest.base_url, E::RESOURCE)
    }

    pub fn search_url(&self) -> String {
        format!("{}/api/_search/{}", self.rest.base_url, E::RESOURCE)
    }

    fn item_url(&self, id: &E::Id) -> String {
        format!("{}/{}", self.resource_url(), id)
    }

    fn require_id(entity: &E) -> Result<&E::Id, ApiClientError> {
        entity
            .id()
            .ok_or(ApiClientError::MissingIdentifier { entity: E::NAME })
    }

    pub fn create_request(&self, entity: &E) -> Result<reqwest::Request, ApiClientError> {
        Ok(self
            .rest
            .request(Method::POST, self.resource_url())
            .json(entity)
            .build()?)
    }

    pub fn update_request(&self, entity: &E) -> Result<reqwest::Request, ApiClientError> {
        let id = Self::require_id(entity)?;
        Ok(self
            .rest
            .request(Method::PUT, self.item_url(id))
            .json(entity)
            .build()?)
    }

    pub fn partial_update_request(&self, entity: &E) -> Result<reqwest::Request, ApiClientError> {
        let id = Self::require_id(entity)?;
        let body = serde_json::to_vec(entity)?;
        Ok(self
            .rest
            .request(Method::PATCH, self.item_url(id))
            .header(CONTENT_TYPE, MERGE_PATCH_JSON)
            .body(body)
            .build()?)
    }

    pub fn find_request(&self, id: &E::Id) -> Result<reqwest::Request, ApiClientError> {
        Ok(self.rest.request(Method::GET, self.item_url(id)).build()?)
    }

    pub fn query_request(&self, options: &RequestOptions) -> Result<reqwest::Request, ApiClientError> {
        Ok(self
            .rest
            .request(Method::GET, self.resource_url())
            .query(&options.to_query_pairs())
            .build()?)
    }

    pub fn delete_request(&self, id: &E::Id) -> Result<reqwest::Request, ApiClientError> {
        Ok(self.rest.request(Method::DELETE, self.item_url(id)).build()?)
    }

    pub fn search_request(&self, options: &RequestOptions) -> Result<reqwest::Request, ApiClientError> {
        Ok(self
            .rest
            .request(Method::GET, self.search_url())
            .query(&options.to_query_pairs())
            .build()?)
    }

    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, ApiClientError> {
        tracing::debug!(method = %request.method(), url = %request.url(), "api request");
        let response = self.rest.client.execute(request).await?;
        check_status(response).await
    }

    async fn fetch_page(&self, request: reqwest::Request) -> Result<Page<E>, ApiClientError> {
        let response = self.execute(request).await?;
        let total = total_count(response.headers());
        let bytes = response.bytes().await?;
        let items: Vec<E> = if bytes.is_empty() {
            Vec::new()
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(Page {
            items,
            total_count: total,
        })
    }
}

#[async_trait]
impl<E: Entity> EntityService<E> for RestEntityService<E> {
    async fn create(&self, entity: &E) -> Result<E, ApiClientError> {
        let response = self.execute(self.create_request(entity)?).await?;
        parse_body(response).await
    }

    async fn update(&self, entity: &E) -> Result<E, ApiClientError> {
        let response = self.execute(self.update_request(entity)?).await?;
        parse_body(response).await
    }

    async fn partial_update(&self, entity: &E) -> Result<E, ApiClientError> {
        let response = self.execute(self.partial_update_request(entity)?).await?;
        parse_body(response).await
    }

    async fn find(&self, id: &E::Id) -> Result<Option<E>, ApiClientError> {
        let request = self.find_request(id)?;
        let response = match self.execute(request).await {
            Ok(response) => response,
            Err(ApiClientError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn query(&self, options: &RequestOptions) -> Result<Page<E>, ApiClientError> {
        self.fetch_page(self.query_request(options)?).await
    }

    async fn delete(&self, id: &E::Id) -> Result<(), ApiClientError> {
        self.execute(self.delete_request(id)?).await?;
        Ok(())
    }

    async fn search(&self, options: &RequestOptions) -> Result<Page<E>, ApiClientError> {
        self.fetch_page(self.search_request(options)?).await
    }
}

/// One service handle per catalogue resource.
#[derive(Clone)]
pub struct CatalogServices {
    pub actors: Arc<dyn EntityService<Actor>>,
    pub environments: Arc<dyn EntityService<Environment>>,
    pub mitigations: Arc<dyn EntityService<Mitigation>>,
    pub scenarios: Arc<dyn EntityService<Scenario>>,
    pub technologies: Arc<dyn EntityService<Technology>>,
    pub vulnerabilities: Arc<dyn EntityService<Vulnerability>>,
}

impl CatalogServices {
    pub fn rest(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let rest = RestClient::new(config)?;
        Ok(Self {
            actors: Arc::new(rest.service::<Actor>()),
            environments: Arc::new(rest.service::<Environment>()),
            mitigations: Arc::new(rest.service::<Mitigation>()),
            scenarios: Arc::new(rest.service::<Scenario>()),
            technologies: Arc::new(rest.service::<Technology>()),
            vulnerabilities: Arc::new(rest.service::<Vulnerability>()),
        })
    }
}

/// Problem-details body returned by the backend on failures.
#[derive(Debug, Deserialize)]
struct ProblemDetails {
    title: Option<String>,
    detail: Option<String>,
    message: Option<String>,
}

impl ProblemDetails {
    fn into_message(self) -> Option<String> {
        match (self.title, self.detail, self.message) {
            (Some(title), Some(detail), _) => Some(format!("{}: {}", title, detail)),
            (Some(title), None, _) => Some(title),
            (None, Some(detail), _) => Some(detail),
            (None, None, message) => message,
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await?;
    let message = serde_json::from_str::<ProblemDetails>(&text)
        .ok()
        .and_then(ProblemDetails::into_message)
        .unwrap_or(text);
    Err(ApiClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn parse_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiClientError> {
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Err(ApiClientError::InvalidResponse("empty response body".to_string()));
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn total_count(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(TOTAL_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

fn build_auth_headers(auth: &AuthConfig) -> Result<HeaderMap, ApiClientError> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = &auth.api_key {
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    if let Some(jwt) = &auth.jwt {
        let value = format!("Bearer {}", jwt);
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&value).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_count_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(total_count(&headers), None);
        headers.insert("X-Total-Count", HeaderValue::from_static("42"));
        assert_eq!(total_count(&headers), Some(42));
        headers.insert("X-Total-Count", HeaderValue::from_static("many"));
        assert_eq!(total_count(&headers), None);
    }

    #[test]
    fn test_problem_details_message() {
        let problem: ProblemDetails =
            serde_json::from_str(r#"{"title":"Bad Request","detail":"name must not be null"}"#)
                .unwrap();
        assert_eq!(
            problem.into_message().as_deref(),
            Some("Bad Request: name must not be null")
        );
        let problem: ProblemDetails = serde_json::from_str(r#"{"message":"error.http.404"}"#).unwrap();
        assert_eq!(problem.into_message().as_deref(), Some("error.http.404"));
    }

    #[test]
    fn test_auth_headers() {
        let headers = build_auth_headers(&AuthConfig {
            api_key: Some("key".to_string()),
            jwt: Some("token".to_string()),
        })
        .unwrap();
        assert_eq!(headers.get("x-api-key").unwrap(), "key");
        assert_eq!(headers.get("authorization").unwrap(), "Bearer token");
    }

    #[test]
    fn test_status_accessor() {
        let err = ApiClientError::Status {
            status: 404,
            message: "missing".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(ApiClientError::Config("x".to_string()).status(), None);
    }
}
