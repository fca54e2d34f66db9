use super::{ListPage, ListSource, MutationClient};
use crate::config::DashboardConfig;
use crate::core::{AdminError, Record, RecordId, Result};
use crate::editor::UpdatePayload;
use crate::table::PageWindow;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value as Json;

/// REST client for the dashboard backend.
///
/// Endpoints, per resource:
/// - `GET /{resource}/?list&page={n}&page_size={m}` returns
///   `{"count": ..., "{resource}": [...]}`, with `n` 1-based
/// - `POST /{resource}/` creates
/// - `PATCH /{resource}/` updates, the body carries the `id`
/// - `DELETE /{resource}/?id={id}` deletes
#[derive(Debug, Clone)]
pub struct HttpResourceClient {
    client: Client,
    base_url: String,
}

impl HttpResourceClient {
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AdminError::Config(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource_url(&self, resource: &str) -> String {
        format!("{}/{}/", self.base_url, resource.trim_matches('/'))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(normalize_error(status, &body))
    }

    async fn json_body(response: Response) -> Result<Json> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Json::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Items are listed under the last path segment of the resource name.
fn items_key(resource: &str) -> &str {
    resource
        .trim_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(resource)
}

/// Turns a non-2xx response into the error taxonomy, pulling a
/// `{message}` (or `error` / `detail`) text out of the body when present.
pub fn normalize_error(status: StatusCode, body: &str) -> AdminError {
    let from_body = serde_json::from_str::<Json>(body).ok().and_then(|json| {
        ["message", "error", "detail"]
            .iter()
            .find_map(|key| json.get(*key).and_then(Json::as_str).map(str::to_string))
    });
    let message = from_body
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty() && trimmed.len() <= 200).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    if status == StatusCode::NOT_FOUND {
        AdminError::NotFound(message)
    } else {
        AdminError::Transport {
            status: Some(status.as_u16()),
            message,
        }
    }
}

#[async_trait]
impl<R: Record> ListSource<R> for HttpResourceClient {
    async fn fetch_page(&self, resource: &str, window: PageWindow) -> Result<ListPage<R>> {
        let url = format!(
            "{}?list&page={}&page_size={}",
            self.resource_url(resource),
            window.page_number(),
            window.page_size
        );
        debug!("GET {}", url);
        let response = self.send(self.client.get(&url)).await?;
        let body = Self::json_body(response).await?;

        let count = body.get("count").and_then(Json::as_u64).unwrap_or(0) as usize;
        let key = items_key(resource);
        let items = match body.get(key) {
            Some(Json::Array(items)) => items
                .iter()
                .cloned()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<R>, _>>()?,
            Some(other) => {
                return Err(AdminError::Decode(format!(
                    "'{}' is not a list: {}",
                    key, other
                )));
            }
            None => {
                warn!("list response for {} has no '{}' key", resource, key);
                Vec::new()
            }
        };
        Ok(ListPage { count, items })
    }
}

#[async_trait]
impl MutationClient for HttpResourceClient {
    async fn create(&self, resource: &str, body: Json) -> Result<Json> {
        let url = self.resource_url(resource);
        debug!("POST {}", url);
        let response = self
            .send(self.client.request(Method::POST, &url).json(&body))
            .await?;
        Self::json_body(response).await
    }

    async fn update(&self, resource: &str, payload: &UpdatePayload) -> Result<Json> {
        let url = self.resource_url(resource);
        debug!("PATCH {} id={}", url, payload.id());
        let response = self
            .send(
                self.client
                    .request(Method::PATCH, &url)
                    .json(&payload.to_json()),
            )
            .await?;
        Self::json_body(response).await
    }

    async fn delete(&self, resource: &str, id: &RecordId) -> Result<()> {
        let url = self.resource_url(resource);
        debug!("DELETE {} id={}", url, id);
        self.send(
            self.client
                .request(Method::DELETE, &url)
                .query(&[("id", id.as_str())]),
        )
        .await?;
        Ok(())
    }
}
