//! Drawer Editor
//!
//! A side-panel form bound to one row. It keeps a [`Draft`] of the row's
//! schema fields, validates it on save, and turns the edits into an
//! [`UpdatePayload`] holding only the fields that changed.

pub mod draft;
pub mod payload;

pub use draft::Draft;
pub use payload::UpdatePayload;

use crate::core::{AdminError, FieldValue, Record, Result, ValidationErrors};
use crate::schema::FieldSchema;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorStatus {
    Editing,
    Saving,
    Failed(String),
}

/// One rendered form input.
#[derive(Debug, Clone, PartialEq)]
pub struct FormInput {
    pub key: String,
    pub label: String,
    pub input_type: &'static str,
    pub value: String,
    pub required: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DrawerEditor<R> {
    original: R,
    schema: FieldSchema,
    draft: Draft,
    status: EditorStatus,
    errors: ValidationErrors,
}

impl<R: Record> DrawerEditor<R> {
    pub fn open(record: R, schema: FieldSchema) -> Result<Self> {
        let draft = Draft::seed(&schema, &record.fields()?)?;
        log::debug!("editor opened for record {}", record.id());
        Ok(Self {
            original: record,
            schema,
            draft,
            status: EditorStatus::Editing,
            errors: ValidationErrors::new(),
        })
    }

    pub fn original(&self) -> &R {
        &self.original
    }

    pub fn record_id(&self) -> String {
        self.original.id()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn status(&self) -> &EditorStatus {
        &self.status
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_dirty(&self) -> bool {
        self.draft.is_dirty()
    }

    pub fn inputs(&self) -> Vec<FormInput> {
        self.schema
            .entries()
            .iter()
            .map(|entry| FormInput {
                key: entry.key.clone(),
                label: entry.label.clone(),
                input_type: entry.kind.input_type(),
                value: self
                    .draft
                    .get(&entry.key)
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                required: entry.is_required(),
                errors: self
                    .errors
                    .for_field(&entry.key)
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }

    /// Applies raw form input. Numeric fields never fail here: input that
    /// does not parse becomes `0`.
    pub fn set_input(&mut self, key: &str, raw: &str) -> Result<()> {
        let entry = self
            .schema
            .get(key)
            .ok_or_else(|| AdminError::Schema(format!("no field '{}' in form", key)))?;
        let value = entry.coerce(raw);
        self.draft.set(key, value);
        Ok(())
    }

    pub fn set_value(&mut self, key: &str, value: FieldValue) -> Result<()> {
        if self.schema.get(key).is_none() {
            return Err(AdminError::Schema(format!("no field '{}' in form", key)));
        }
        self.draft.set(key, value);
        Ok(())
    }

    pub fn payload(&self) -> UpdatePayload {
        UpdatePayload::new(&self.original, self.draft.changed_fields(&self.schema))
    }

    /// Validates the whole draft and decodes the changed fields into the
    /// caller's update type. On failure the draft stays untouched and the
    /// field errors are kept for display.
    pub fn prepare<U: DeserializeOwned>(&mut self) -> Result<U> {
        if let Err(errors) = self.schema.validate_values(self.draft.values()) {
            self.errors = errors.clone();
            self.status = EditorStatus::Failed(errors.to_string());
            return Err(AdminError::Validation(errors));
        }

        match self.payload().typed::<U>() {
            Ok(update) => {
                self.errors = ValidationErrors::new();
                Ok(update)
            }
            Err(err) => {
                let mut errors = ValidationErrors::new();
                errors.push("payload", err.to_string());
                self.errors = errors.clone();
                self.status = EditorStatus::Failed(errors.to_string());
                Err(AdminError::Validation(errors))
            }
        }
    }

    pub fn begin_save(&mut self) {
        self.status = EditorStatus::Saving;
    }

    /// Keeps the draft open with the failure visible.
    pub fn fail(&mut self, err: &AdminError) {
        if let Some(errors) = err.validation_errors() {
            self.errors = errors.clone();
        }
        log::warn!("save failed for record {}: {}", self.original.id(), err);
        self.status = EditorStatus::Failed(err.user_message());
    }

    /// Discards edits without closing.
    pub fn reset(&mut self) {
        self.draft.reset();
        self.errors = ValidationErrors::new();
        self.status = EditorStatus::Editing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DynamicRecord;
    use crate::schema::FieldSchemaEntry;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct ProductUpdate {
        nome: Option<String>,
        #[serde(rename = "pacotesFornada")]
        pacotes_fornada: Option<u32>,
        preco: Option<f64>,
    }

    fn editor() -> DrawerEditor<DynamicRecord> {
        let record = DynamicRecord::from_json(
            json!({"id": 42, "nome": "Broa", "pacotesFornada": 4, "preco": 8.0}),
        )
        .unwrap();
        let schema = FieldSchema::new(vec![
            FieldSchemaEntry::text("nome", "Nome").required(),
            FieldSchemaEntry::number("pacotesFornada", "Pacotes/Fornada").min(0.0),
            FieldSchemaEntry::number("preco", "Preço (R$)").min(0.0),
        ])
        .unwrap();
        DrawerEditor::open(record, schema).unwrap()
    }

    #[test]
    fn test_inputs_prefilled_in_schema_order() {
        let editor = editor();
        let inputs = editor.inputs();
        let keys: Vec<&str> = inputs.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["nome", "pacotesFornada", "preco"]);
        assert_eq!(inputs[0].value, "Broa");
        assert!(inputs[0].required);
        assert_eq!(inputs[1].input_type, "number");
        assert_eq!(inputs[2].value, "8");
    }

    #[test]
    fn test_non_numeric_input_coerces_to_zero() {
        let mut editor = editor();
        editor.set_input("preco", "abc").unwrap();
        assert_eq!(editor.draft().get("preco"), Some(&FieldValue::Number(0.0)));

        let update: ProductUpdate = editor.prepare().unwrap();
        assert_eq!(
            update,
            ProductUpdate {
                nome: None,
                pacotes_fornada: None,
                preco: Some(0.0)
            }
        );
    }

    #[test]
    fn test_invalid_draft_is_kept_with_errors() {
        let mut editor = editor();
        editor.set_input("nome", "").unwrap();
        editor.set_input("preco", "-2").unwrap();

        let err = editor.prepare::<ProductUpdate>().unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert!(errors.has_field("nome"));
        assert!(errors.has_field("preco"));
        assert_eq!(editor.draft().get("nome"), Some(&FieldValue::from("")));
        assert!(matches!(editor.status(), EditorStatus::Failed(_)));
        assert_eq!(editor.inputs()[0].errors, vec!["is required"]);
    }

    #[test]
    fn test_payload_contains_only_changes() {
        let mut editor = editor();
        editor.set_input("pacotesFornada", "6").unwrap();
        assert_eq!(
            editor.payload().to_json(),
            json!({"id": 42, "pacotesFornada": 6})
        );
    }

    #[test]
    fn test_decode_failure_reported_as_validation() {
        let mut editor = editor();
        editor.set_input("pacotesFornada", "2.5").unwrap();
        let err = editor.prepare::<ProductUpdate>().unwrap_err();
        assert!(err.validation_errors().unwrap().has_field("payload"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut editor = editor();
        assert!(matches!(
            editor.set_input("peso", "1kg"),
            Err(AdminError::Schema(_))
        ));
    }

    #[test]
    fn test_fail_keeps_draft() {
        let mut editor = editor();
        editor.set_input("nome", "Broa integral").unwrap();
        editor.begin_save();
        editor.fail(&AdminError::transport("Servidor indisponível"));
        assert_eq!(
            editor.status(),
            &EditorStatus::Failed("Servidor indisponível".into())
        );
        assert!(editor.is_dirty());
    }
}
