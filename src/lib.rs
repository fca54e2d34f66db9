// ============================================================================
// Backoffice Library
// ============================================================================

pub mod core;
pub mod schema;
pub mod table;
pub mod editor;
pub mod resource;
pub mod notify;
pub mod page;
pub mod domain;
pub mod config;

// Re-export main types for convenience
pub use core::{AdminError, DynamicRecord, FieldValue, Record, RecordId, Result, ValidationErrors};
pub use config::DashboardConfig;
pub use editor::{DrawerEditor, EditorStatus, UpdatePayload};
pub use notify::{LogNotifier, MemoryNotifier, Notification, Notifier};
pub use page::{PageMessages, ResourcePage};
pub use resource::{HttpResourceClient, ListPage, ListSource, LoadState, MutationClient, ResourceList};
pub use schema::{FieldKind, FieldSchema, FieldSchemaEntry};
pub use table::{ColumnSpec, DataTable, Nav, PageWindow, TableHandlers, TableLabels};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

// ============================================================================
// High-level Dashboard API
// ============================================================================

/// Entry point wiring the HTTP backend, the notifier and per-resource pages.
///
/// # Examples
///
/// ```no_run
/// use backoffice::{Dashboard, DashboardConfig};
/// use backoffice::domain::{product, Product, ProductUpdate};
///
/// # async fn run() -> backoffice::Result<()> {
/// let dashboard = Dashboard::connect(DashboardConfig::new("http://localhost:8000/api"))?;
/// let page = dashboard.page::<Product, ProductUpdate>(product::RESOURCE);
/// page.mount().await;
///
/// let mut table = dashboard.table(&page, product::columns(), product::schema()?)?;
/// page.sync_table(&mut table).await;
/// println!("{}", table.render());
/// # Ok(())
/// # }
/// ```
pub struct Dashboard {
    config: DashboardConfig,
    client: Arc<HttpResourceClient>,
    notifier: Arc<dyn Notifier>,
}

impl Dashboard {
    /// Connect with the given configuration, reporting through the log.
    pub fn connect(config: DashboardConfig) -> Result<Self> {
        Self::with_notifier(config, Arc::new(LogNotifier))
    }

    pub fn with_notifier(config: DashboardConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let client = Arc::new(HttpResourceClient::new(&config)?);
        Ok(Self {
            config,
            client,
            notifier,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<HttpResourceClient> {
        &self.client
    }

    pub fn initial_window(&self) -> PageWindow {
        PageWindow {
            page_index: 0,
            page_size: self.config.default_page_size,
        }
    }

    /// A page over `resource`, starting at the first window.
    pub fn page<R, U>(&self, resource: &str) -> Arc<ResourcePage<R, U>>
    where
        R: Record,
        U: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let list = ResourceList::new(
            resource,
            self.client.clone(),
            self.initial_window(),
            self.config.cache_capacity,
        );
        self.page_for(list)
    }

    /// A page over a custom list, e.g. one with post-fetch filtering.
    pub fn page_for<R, U>(&self, list: ResourceList<R>) -> Arc<ResourcePage<R, U>>
    where
        R: Record,
        U: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        Arc::new(ResourcePage::new(
            list,
            self.client.clone(),
            self.notifier.clone(),
        ))
    }

    /// A table whose callbacks go to `page`.
    pub fn table<R, U>(
        &self,
        page: &Arc<ResourcePage<R, U>>,
        columns: Vec<ColumnSpec<R>>,
        schema: FieldSchema,
    ) -> Result<DataTable<R, U>>
    where
        R: Record,
        U: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let handlers: Arc<dyn TableHandlers<R, U>> = page.clone();
        Ok(DataTable::new(columns, schema, handlers)?
            .with_page_size_options(self.config.page_size_options.clone()))
    }
}
