use crate::core::{FieldValue, Record};
use std::fmt;
use std::sync::Arc;

pub type Accessor<R> = Arc<dyn Fn(&R) -> FieldValue + Send + Sync>;
pub type CellFormatter = Arc<dyn Fn(&FieldValue) -> String + Send + Sync>;

/// Describes one table column: where its value comes from and how the
/// cell is displayed.
pub struct ColumnSpec<R> {
    pub id: String,
    pub header: String,
    accessor: Accessor<R>,
    cell: Option<CellFormatter>,
    pub can_hide: bool,
    pub can_filter: bool,
    pub can_sort: bool,
}

impl<R: Record> ColumnSpec<R> {
    pub fn new<F>(id: impl Into<String>, header: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            header: header.into(),
            accessor: Arc::new(accessor),
            cell: None,
            can_hide: true,
            can_filter: true,
            can_sort: true,
        }
    }

    /// Column reading the record attribute named `key`.
    pub fn field(key: impl Into<String>, header: impl Into<String>) -> Self {
        let key = key.into();
        let lookup = key.clone();
        Self::new(key, header, move |record: &R| record.field(&lookup))
    }

    pub fn cell<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&FieldValue) -> String + Send + Sync + 'static,
    {
        self.cell = Some(Arc::new(formatter));
        self
    }

    pub fn always_visible(mut self) -> Self {
        self.can_hide = false;
        self
    }

    pub fn no_filter(mut self) -> Self {
        self.can_filter = false;
        self
    }

    pub fn no_sort(mut self) -> Self {
        self.can_sort = false;
        self
    }

    pub fn value(&self, record: &R) -> FieldValue {
        (self.accessor)(record)
    }

    pub fn render(&self, record: &R) -> String {
        let value = self.value(record);
        match &self.cell {
            Some(format) => format(&value),
            None => value.to_string(),
        }
    }
}

impl<R> Clone for ColumnSpec<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: Arc::clone(&self.accessor),
            cell: self.cell.clone(),
            can_hide: self.can_hide,
            can_filter: self.can_filter,
            can_sort: self.can_sort,
        }
    }
}

impl<R> fmt::Debug for ColumnSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("can_hide", &self.can_hide)
            .field("can_filter", &self.can_filter)
            .field("can_sort", &self.can_sort)
            .finish()
    }
}

/// `"R$ 12.50"` style cells. Non-numeric values render as-is.
pub fn currency(prefix: &'static str) -> impl Fn(&FieldValue) -> String + Send + Sync + 'static {
    move |value| match value.as_f64() {
        Some(n) => format!("{} {:.2}", prefix, n),
        None => value.to_string(),
    }
}

/// `"4 pacotes"` style cells.
pub fn with_suffix(suffix: &'static str) -> impl Fn(&FieldValue) -> String + Send + Sync + 'static {
    move |value| {
        if value.is_null() {
            String::new()
        } else {
            format!("{} {}", value, suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DynamicRecord;
    use serde_json::json;

    fn row() -> DynamicRecord {
        DynamicRecord::from_json(json!({"id": 1, "preco": 12.5, "pacotes": 4, "nome": "Broa"}))
            .unwrap()
    }

    #[test]
    fn test_field_column_reads_attribute() {
        let col = ColumnSpec::<DynamicRecord>::field("nome", "Nome");
        assert_eq!(col.value(&row()), FieldValue::from("Broa"));
        assert_eq!(col.render(&row()), "Broa");
        assert!(col.can_hide && col.can_filter && col.can_sort);
    }

    #[test]
    fn test_cell_formatters() {
        let price = ColumnSpec::<DynamicRecord>::field("preco", "Preço").cell(currency("R$"));
        assert_eq!(price.render(&row()), "R$ 12.50");

        let packs = ColumnSpec::<DynamicRecord>::field("pacotes", "Pacotes/Fornada")
            .cell(with_suffix("pacotes"));
        assert_eq!(packs.render(&row()), "4 pacotes");
    }

    #[test]
    fn test_computed_column() {
        let col = ColumnSpec::<DynamicRecord>::new("total", "Total", |r: &DynamicRecord| {
            let price = r.field("preco").as_f64().unwrap_or(0.0);
            let packs = r.field("pacotes").as_f64().unwrap_or(0.0);
            FieldValue::Number(price * packs)
        })
        .always_visible();
        assert_eq!(col.render(&row()), "50");
        assert!(!col.can_hide);
    }
}
