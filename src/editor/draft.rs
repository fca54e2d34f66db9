use crate::core::{FieldValue, Result};
use crate::schema::FieldSchema;
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;

/// Working copy of a record's schema fields while an editor is open.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    original: BTreeMap<String, FieldValue>,
    values: BTreeMap<String, FieldValue>,
}

impl Draft {
    /// Seeds the draft from the record's attributes. Every schema key must
    /// be present on the record.
    pub fn seed(schema: &FieldSchema, fields: &Map<String, Json>) -> Result<Self> {
        schema.check_record(fields)?;
        let original: BTreeMap<String, FieldValue> = schema
            .keys()
            .map(|key| {
                let value = fields
                    .get(key)
                    .map(FieldValue::from_json)
                    .unwrap_or(FieldValue::Null);
                (key.to_string(), value)
            })
            .collect();
        Ok(Self {
            values: original.clone(),
            original,
        })
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: &str, value: FieldValue) {
        self.values.insert(key.to_string(), value);
    }

    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.original
    }

    pub fn is_changed(&self, key: &str) -> bool {
        self.values.get(key) != self.original.get(key)
    }

    /// Changed fields in schema order, as JSON.
    pub fn changed_fields(&self, schema: &FieldSchema) -> Map<String, Json> {
        schema
            .keys()
            .filter(|key| self.is_changed(key))
            .filter_map(|key| self.values.get(key).map(|v| (key.to_string(), v.to_json())))
            .collect()
    }

    /// Throws away edits.
    pub fn reset(&mut self) {
        self.values = self.original.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchemaEntry;
    use serde_json::json;

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSchemaEntry::text("nome", "Nome"),
            FieldSchemaEntry::number("preco", "Preço"),
        ])
        .unwrap()
    }

    #[test]
    fn test_seed_copies_only_schema_fields() {
        let fields = json!({"id": 5, "nome": "Broa", "preco": 8, "extra": true});
        let draft = Draft::seed(&schema(), fields.as_object().unwrap()).unwrap();
        assert_eq!(draft.values().len(), 2);
        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_changed_fields_is_minimal() {
        let fields = json!({"id": 5, "nome": "Broa", "preco": 8});
        let mut draft = Draft::seed(&schema(), fields.as_object().unwrap()).unwrap();
        draft.set("preco", FieldValue::Number(9.5));
        let changed = draft.changed_fields(&schema());
        assert_eq!(Json::Object(changed), json!({"preco": 9.5}));

        draft.set("preco", FieldValue::Number(8.0));
        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_reset_discards_edits() {
        let fields = json!({"id": 5, "nome": "Broa", "preco": 8});
        let mut draft = Draft::seed(&schema(), fields.as_object().unwrap()).unwrap();
        draft.set("nome", FieldValue::from("Bolo"));
        assert!(draft.is_dirty());
        draft.reset();
        assert_eq!(draft.get("nome"), Some(&FieldValue::from("Broa")));
    }
}
