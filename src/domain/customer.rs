use crate::core::{Record, RecordId, Result};
use crate::schema::{FieldSchema, FieldSchemaEntry};
use crate::table::ColumnSpec;
use serde::{Deserialize, Serialize};

pub const RESOURCE: &str = "customers";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// CPF or CNPJ, digits only.
    #[serde(default)]
    pub document: String,
}

impl Record for Customer {
    fn id(&self) -> RecordId {
        self.id.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

pub fn schema() -> Result<FieldSchema> {
    FieldSchema::new(vec![
        FieldSchemaEntry::text("name", "Nome").required().min_length(2),
        FieldSchemaEntry::text("email", "E-mail")
            .pattern(r"^[^@\s]+@[^@\s]+\.[^@\s]+$", "invalid e-mail address")?,
        FieldSchemaEntry::text("phone", "Telefone")
            .pattern(r"^\+?[\d\s()-]{8,20}$", "invalid phone number")?,
        FieldSchemaEntry::text("document", "CPF/CNPJ")
            .pattern(r"^(\d{11}|\d{14})$", "must have 11 (CPF) or 14 (CNPJ) digits")?,
    ])
}

pub fn columns() -> Vec<ColumnSpec<Customer>> {
    vec![
        ColumnSpec::field("name", "Nome").always_visible(),
        ColumnSpec::field("email", "E-mail"),
        ColumnSpec::field("phone", "Telefone"),
        ColumnSpec::field("document", "CPF/CNPJ").no_sort(),
    ]
}
