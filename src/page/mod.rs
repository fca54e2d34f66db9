//! Page-level wiring
//!
//! A [`ResourcePage`] connects a [`DataTable`] to a remote list and a
//! mutation client: it turns table intents into fetches and writes, and
//! reports each outcome through the notifier it was given.

use crate::core::{Record, Result};
use crate::editor::UpdatePayload;
use crate::notify::Notifier;
use crate::resource::{LoadState, MutationClient, ResourceList};
use crate::table::{DataTable, PageWindow, TableHandlers};
use async_trait::async_trait;
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

/// Texts shown after writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMessages {
    pub update_success: String,
    pub update_failure: String,
    pub delete_success: String,
    pub delete_failure: String,
}

impl Default for PageMessages {
    fn default() -> Self {
        Self {
            update_success: "Record updated successfully!".to_string(),
            update_failure: "Update failed, try again later!".to_string(),
            delete_success: "Record deleted successfully!".to_string(),
            delete_failure: "Failed to delete record".to_string(),
        }
    }
}

pub struct ResourcePage<R, U> {
    list: ResourceList<R>,
    client: Arc<dyn MutationClient>,
    notifier: Arc<dyn Notifier>,
    messages: PageMessages,
    allow_delete: bool,
    _payload: PhantomData<fn(U)>,
}

impl<R, U> ResourcePage<R, U>
where
    R: Record,
    U: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(
        list: ResourceList<R>,
        client: Arc<dyn MutationClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            list,
            client,
            notifier,
            messages: PageMessages::default(),
            allow_delete: true,
            _payload: PhantomData,
        }
    }

    pub fn with_messages(mut self, messages: PageMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Pages such as the delivery queue only update rows.
    pub fn without_delete(mut self) -> Self {
        self.allow_delete = false;
        self
    }

    pub fn list(&self) -> &ResourceList<R> {
        &self.list
    }

    /// Initial fetch on mount.
    pub async fn mount(&self) -> LoadState<R> {
        let window = self.list.window().await;
        self.list.set_window(window).await;
        // Failures are kept in the load state.
        let _ = self.list.load().await;
        self.list.state().await
    }

    /// Pushes the list's current state into the table.
    pub async fn sync_table(&self, table: &mut DataTable<R, U>) {
        let state = self.list.state().await;
        let window = self.list.window().await;
        table.apply_state(&state, window);
    }
}

#[async_trait]
impl<R, U> TableHandlers<R, U> for ResourcePage<R, U>
where
    R: Record,
    U: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn on_pagination_change(&self, window: PageWindow) {
        if self.list.set_window(window).await {
            let _ = self.list.load().await;
        }
    }

    async fn on_update(&self, original: &R, updated: U) -> Result<()> {
        let payload = UpdatePayload::from_typed(original, &updated)?;
        match self.client.update(self.list.resource(), &payload).await {
            Ok(_) => {
                self.notifier.success(&self.messages.update_success);
                Ok(())
            }
            Err(err) => {
                self.notifier
                    .error(&self.messages.update_failure, &err.user_message());
                Err(err)
            }
        }
    }

    fn supports_delete(&self) -> bool {
        self.allow_delete
    }

    async fn on_delete(&self, item: &R) -> Result<()> {
        match self.client.delete(self.list.resource(), &item.id()).await {
            Ok(()) => {
                self.notifier.success(&self.messages.delete_success);
                Ok(())
            }
            Err(err) => {
                self.notifier
                    .error(&self.messages.delete_failure, &err.user_message());
                Err(err)
            }
        }
    }

    async fn mutate(&self) {
        debug!("revalidating {}", self.list.resource());
        let _ = self.list.mutate().await;
    }
}
