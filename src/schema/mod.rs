//! Field Schema
//!
//! Declarative description of a record's editable fields. The same schema
//! drives form rendering (order, labels, input kinds) and payload
//! validation before anything is sent to the backend.

pub mod field;
pub mod rules;

pub use field::{FieldKind, FieldSchemaEntry, SelectOption, lenient_number};
pub use rules::{ValidationRule, RuleResult};

use crate::core::{AdminError, FieldValue, Result, ValidationErrors};
use serde_json::{Map, Value as Json};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    entries: Vec<FieldSchemaEntry>,
}

impl FieldSchema {
    /// Builds a schema, rejecting duplicate keys.
    pub fn new(entries: Vec<FieldSchemaEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.key.is_empty() {
                return Err(AdminError::Schema("field key cannot be empty".to_string()));
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(AdminError::Schema(format!(
                    "duplicate field key '{}'",
                    entry.key
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[FieldSchemaEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&FieldSchemaEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every schema key must exist on the record.
    pub fn check_record(&self, fields: &Map<String, Json>) -> Result<()> {
        let missing: Vec<&str> = self
            .keys()
            .filter(|key| !fields.contains_key(*key))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AdminError::Schema(format!(
                "schema keys not present on record: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn validate_values(
        &self,
        values: &BTreeMap<String, FieldValue>,
    ) -> std::result::Result<(), ValidationErrors> {
        self.validate_with(|key| values.get(key).cloned().unwrap_or(FieldValue::Null))
    }

    pub fn validate_json(
        &self,
        fields: &Map<String, Json>,
    ) -> std::result::Result<(), ValidationErrors> {
        self.validate_with(|key| {
            fields
                .get(key)
                .map(FieldValue::from_json)
                .unwrap_or(FieldValue::Null)
        })
    }

    fn validate_with<F>(&self, lookup: F) -> std::result::Result<(), ValidationErrors>
    where
        F: Fn(&str) -> FieldValue,
    {
        let mut errors = ValidationErrors::new();
        for entry in &self.entries {
            let value = lookup(&entry.key);
            for message in entry.check(&value) {
                errors.push(entry.key.clone(), message);
            }
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSchemaEntry::text("nome", "Nome").required(),
            FieldSchemaEntry::number("preco", "Preço").min(0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = FieldSchema::new(vec![
            FieldSchemaEntry::text("nome", "Nome"),
            FieldSchemaEntry::text("nome", "Outro"),
        ]);
        assert!(matches!(result, Err(AdminError::Schema(msg)) if msg.contains("nome")));
    }

    #[test]
    fn test_check_record_reports_missing_keys() {
        let schema = product_schema();
        let ok = json!({"id": 1, "nome": "Pão", "preco": 2.0});
        assert!(schema.check_record(ok.as_object().unwrap()).is_ok());

        let missing = json!({"id": 1, "nome": "Pão"});
        let err = schema.check_record(missing.as_object().unwrap()).unwrap_err();
        assert!(err.to_string().contains("preco"));
    }

    #[test]
    fn test_validate_reports_in_schema_order() {
        let schema = product_schema();
        let fields = json!({"nome": "", "preco": -1});
        let errors = schema.validate_json(fields.as_object().unwrap()).unwrap_err();
        let keys: Vec<&str> = errors.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["nome", "preco"]);
    }

    #[test]
    fn test_validate_values_passes() {
        let schema = product_schema();
        let mut values = BTreeMap::new();
        values.insert("nome".to_string(), FieldValue::from("Broa"));
        values.insert("preco".to_string(), FieldValue::Number(3.5));
        assert!(schema.validate_values(&values).is_ok());
    }
}
