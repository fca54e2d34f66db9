//! Generic Data Table
//!
//! Displays externally supplied rows and signals intent. The table never
//! fetches: navigation calls back into [`TableHandlers`] and the caller
//! hands fresh data back through [`DataTable::set_data`] or
//! [`DataTable::apply_state`]. Edits are not applied optimistically either;
//! after a successful update or delete the table asks the caller to
//! revalidate and keeps showing the old rows until new ones arrive.

pub mod column;
pub mod pagination;
pub mod render;
pub mod view;

pub use column::{ColumnSpec, currency, with_suffix};
pub use pagination::{DEFAULT_PAGE_SIZE, Nav, PAGE_SIZE_OPTIONS, PageWindow, Paginator};
pub use view::{ColumnFilter, SortKey, TableViewState};

use crate::core::{AdminError, Record, Result};
use crate::editor::DrawerEditor;
use crate::resource::LoadState;
use crate::schema::FieldSchema;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

/// Callbacks a page supplies to the table.
#[async_trait]
pub trait TableHandlers<R: Record, U: Send + 'static>: Send + Sync {
    async fn on_pagination_change(&self, window: PageWindow);

    /// Persists an edit. `updated` holds only the changed fields.
    async fn on_update(&self, original: &R, updated: U) -> Result<()>;

    fn supports_delete(&self) -> bool {
        false
    }

    async fn on_delete(&self, item: &R) -> Result<()> {
        Err(AdminError::Unsupported(format!(
            "delete is not available for record {}",
            item.id()
        )))
    }

    /// Forces the current page to be refetched.
    async fn mutate(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    Loading,
    Ready,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLabels {
    pub title: String,
    pub empty_message: String,
    pub save_text: String,
    pub saving_text: String,
}

impl Default for TableLabels {
    fn default() -> Self {
        Self {
            title: String::new(),
            empty_message: "No results.".to_string(),
            save_text: "Save changes".to_string(),
            saving_text: "Saving...".to_string(),
        }
    }
}

pub struct DataTable<R: Record, U: Send + 'static> {
    columns: Vec<ColumnSpec<R>>,
    schema: FieldSchema,
    handlers: Arc<dyn TableHandlers<R, U>>,
    data: Vec<R>,
    total_count: usize,
    window: PageWindow,
    page_size_options: Vec<usize>,
    view: TableViewState,
    status: TableStatus,
    editor: Option<DrawerEditor<R>>,
    labels: TableLabels,
    _payload: PhantomData<fn() -> U>,
}

impl<R, U> DataTable<R, U>
where
    R: Record,
    U: DeserializeOwned + Send + 'static,
{
    pub fn new(
        columns: Vec<ColumnSpec<R>>,
        schema: FieldSchema,
        handlers: Arc<dyn TableHandlers<R, U>>,
    ) -> Result<Self> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.id == column.id) {
                return Err(AdminError::Schema(format!(
                    "duplicate column id '{}'",
                    column.id
                )));
            }
        }
        Ok(Self {
            columns,
            schema,
            handlers,
            data: Vec::new(),
            total_count: 0,
            window: PageWindow::default(),
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            view: TableViewState::new(),
            status: TableStatus::Loading,
            editor: None,
            labels: TableLabels::default(),
            _payload: PhantomData,
        })
    }

    pub fn with_labels(mut self, labels: TableLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options.into_iter().filter(|n| *n > 0).collect();
        self
    }

    pub fn labels(&self) -> &TableLabels {
        &self.labels
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Replaces the displayed rows with data supplied by the caller.
    pub fn set_data(&mut self, data: Vec<R>, total_count: usize, window: PageWindow) {
        self.data = data;
        self.total_count = total_count;
        self.window = window;
        self.status = TableStatus::Ready;
    }

    /// Mirrors a list's fetch state. While the same window is refetched its
    /// rows stay in place; rows of another window are dropped so they are
    /// never shown under the new page number.
    pub fn apply_state(&mut self, state: &LoadState<R>, window: PageWindow) {
        match state {
            LoadState::Idle | LoadState::Loading => {
                if window != self.window {
                    self.data.clear();
                }
                self.window = window;
                self.status = TableStatus::Loading;
            }
            LoadState::Loaded(page) => {
                self.set_data(page.items.clone(), page.count, window);
            }
            LoadState::Error(message) => {
                self.window = window;
                self.status = TableStatus::Error(message.clone());
            }
        }
    }

    pub fn data(&self) -> &[R] {
        &self.data
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    pub fn status(&self) -> &TableStatus {
        &self.status
    }

    pub fn paginator(&self) -> Paginator {
        Paginator::new(self.total_count, self.window)
    }

    pub fn page_count(&self) -> usize {
        self.paginator().page_count()
    }

    /// Page sizes outside the configured choices are disabled.
    pub fn can_navigate(&self, nav: Nav) -> bool {
        if matches!(nav, Nav::PageSize(size) if !self.page_size_options.contains(&size)) {
            return false;
        }
        self.paginator().is_enabled(nav)
    }

    /// Signals a window change to the caller. Displayed data and the
    /// table's own window are left alone until the caller supplies them.
    pub async fn navigate(&self, nav: Nav) -> Option<PageWindow> {
        if !self.can_navigate(nav) {
            return None;
        }
        let next = self.paginator().resolve(nav)?;
        self.handlers.on_pagination_change(next).await;
        Some(next)
    }

    pub fn view(&self) -> &TableViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TableViewState {
        &mut self.view
    }

    pub fn columns(&self) -> &[ColumnSpec<R>] {
        &self.columns
    }

    pub fn visible_columns(&self) -> Vec<&ColumnSpec<R>> {
        self.columns
            .iter()
            .filter(|c| !c.can_hide || self.view.is_visible(&c.id))
            .collect()
    }

    /// Columns offered in the visibility menu.
    pub fn hideable_columns(&self) -> Vec<&ColumnSpec<R>> {
        self.columns.iter().filter(|c| c.can_hide).collect()
    }

    /// Filtered and sorted rows of the loaded page.
    pub fn row_model(&self) -> Vec<&R> {
        self.view.row_model(&self.data, &self.columns)
    }

    pub fn editor(&self) -> Option<&DrawerEditor<R>> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut DrawerEditor<R>> {
        self.editor.as_mut()
    }

    /// Opens the drawer for a row. An already open drawer is replaced and
    /// its draft discarded.
    pub fn open_editor(&mut self, row_id: &str) -> Result<&mut DrawerEditor<R>> {
        let record = self
            .data
            .iter()
            .find(|r| r.id() == row_id)
            .cloned()
            .ok_or_else(|| AdminError::NotFound(format!("row {} is not on this page", row_id)))?;
        let editor = DrawerEditor::open(record, self.schema.clone())?;
        Ok(self.editor.insert(editor))
    }

    /// Closes the drawer, dropping the draft.
    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    pub fn edit_field(&mut self, key: &str, raw: &str) -> Result<()> {
        self.editor
            .as_mut()
            .ok_or_else(|| AdminError::Unsupported("no editor is open".to_string()))?
            .set_input(key, raw)
    }

    /// Validates the draft and hands the changes to `on_update`. The drawer
    /// closes on success; on any failure it stays open with the draft.
    pub async fn save(&mut self) -> Result<()> {
        let handlers = Arc::clone(&self.handlers);
        let editor = self
            .editor
            .as_mut()
            .ok_or_else(|| AdminError::Unsupported("no editor is open".to_string()))?;

        let update: U = editor.prepare()?;
        editor.begin_save();
        let original = editor.original().clone();

        match handlers.on_update(&original, update).await {
            Ok(()) => {
                self.editor = None;
                handlers.mutate().await;
                Ok(())
            }
            Err(err) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.fail(&err);
                }
                Err(err)
            }
        }
    }

    /// Asks the caller to delete a row, then to revalidate. The row stays
    /// displayed until the caller supplies fresh data.
    pub async fn delete(&mut self, row_id: &str) -> Result<()> {
        if !self.handlers.supports_delete() {
            return Err(AdminError::Unsupported(
                "this table does not delete rows".to_string(),
            ));
        }
        let record = self
            .data
            .iter()
            .find(|r| r.id() == row_id)
            .cloned()
            .ok_or_else(|| AdminError::NotFound(format!("row {} is not on this page", row_id)))?;

        let handlers = Arc::clone(&self.handlers);
        handlers.on_delete(&record).await?;
        if self
            .editor
            .as_ref()
            .is_some_and(|e| e.record_id() == row_id)
        {
            self.editor = None;
        }
        handlers.mutate().await;
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.labels.title.is_empty() {
            out.push_str(&self.labels.title);
            out.push('\n');
        }

        match &self.status {
            TableStatus::Loading => {
                out.push_str("Loading...\n");
                if self.data.is_empty() {
                    return out;
                }
            }
            TableStatus::Error(message) => {
                out.push_str(&format!("Error loading data: {}\n", message));
                return out;
            }
            _ => {}
        }

        let columns = self.visible_columns();
        let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
        let rows = self.row_model();
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| columns.iter().map(|c| c.render(row)).collect())
            .collect();

        out.push_str(&render::render_grid(&headers, &cells));
        if rows.is_empty() {
            out.push_str(&self.labels.empty_message);
            out.push('\n');
        }
        out.push_str(&format!(
            "Showing {} row(s). Page {} of {}\n",
            rows.len(),
            self.window.page_number(),
            self.page_count()
        ));
        out
    }
}
