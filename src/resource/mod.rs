//! Remote resources
//!
//! The list and mutation endpoints are collaborators behind traits, so the
//! table and page logic can run against the HTTP client or an in-memory
//! fake.

pub mod cache;
pub mod http;
pub mod list;

pub use cache::{DEFAULT_CACHE_PAGES, PageCache};
pub use http::{HttpResourceClient, normalize_error};
pub use list::{LoadState, ResourceList};

use crate::core::{RecordId, Result};
use crate::editor::UpdatePayload;
use crate::table::PageWindow;
use async_trait::async_trait;
use serde_json::Value as Json;

/// One page of a remote list plus the total number of records.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<R> {
    pub count: usize,
    pub items: Vec<R>,
}

impl<R> ListPage<R> {
    pub fn empty() -> Self {
        Self {
            count: 0,
            items: Vec::new(),
        }
    }
}

#[async_trait]
pub trait ListSource<R>: Send + Sync {
    async fn fetch_page(&self, resource: &str, window: PageWindow) -> Result<ListPage<R>>;
}

#[async_trait]
pub trait MutationClient: Send + Sync {
    async fn create(&self, resource: &str, body: Json) -> Result<Json>;

    async fn update(&self, resource: &str, payload: &UpdatePayload) -> Result<Json>;

    async fn delete(&self, resource: &str, id: &RecordId) -> Result<()>;
}
