use crate::core::{Record, RecordId, Result};
use crate::schema::{FieldSchema, FieldSchemaEntry};
use crate::table::{ColumnSpec, currency, with_suffix};
use serde::{Deserialize, Serialize};

pub const RESOURCE: &str = "products";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "pacotesFornada")]
    pub packs_per_batch: f64,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "pesoUnidade")]
    pub unit_weight: String,
}

impl Record for Product {
    fn id(&self) -> RecordId {
        self.id.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "pacotesFornada", skip_serializing_if = "Option::is_none")]
    pub packs_per_batch: Option<f64>,
    #[serde(rename = "preco", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "pesoUnidade", skip_serializing_if = "Option::is_none")]
    pub unit_weight: Option<String>,
}

pub fn schema() -> Result<FieldSchema> {
    FieldSchema::new(vec![
        FieldSchemaEntry::text("nome", "Nome").required().max_length(120),
        FieldSchemaEntry::number("pacotesFornada", "Pacotes/Fornada").min(0.0),
        FieldSchemaEntry::number("preco", "Preço (R$)").min(0.0),
        FieldSchemaEntry::text("pesoUnidade", "Peso/unidade"),
    ])
}

pub fn columns() -> Vec<ColumnSpec<Product>> {
    vec![
        ColumnSpec::field("nome", "Nome"),
        ColumnSpec::field("pacotesFornada", "Pacotes/Fornada").cell(with_suffix("pacotes")),
        ColumnSpec::field("preco", "Preço").cell(currency("R$")),
        ColumnSpec::field("pesoUnidade", "Peso/unidade"),
    ]
}
