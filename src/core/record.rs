use super::error::{AdminError, Result};
use super::value::FieldValue;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

pub type RecordId = String;

/// An entity owned by the remote resource, identified by a stable `id`.
///
/// Attributes are reached through the record's JSON object form, so any
/// `Serialize` struct whose fields match the schema keys can be edited.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> RecordId;

    /// The record's attributes as a JSON object.
    fn fields(&self) -> Result<Map<String, Json>> {
        match serde_json::to_value(self)? {
            Json::Object(map) => Ok(map),
            other => Err(AdminError::Decode(format!(
                "record {} did not serialize to an object: {}",
                self.id(),
                other
            ))),
        }
    }

    /// One attribute. The default goes through `fields()`, which serializes
    /// the whole record; records with cheap lookups override it.
    fn field(&self, key: &str) -> FieldValue {
        self.fields()
            .ok()
            .and_then(|map| map.get(key).map(FieldValue::from_json))
            .unwrap_or(FieldValue::Null)
    }
}

/// A record whose shape is only known at runtime, e.g. a resource listed
/// from the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicRecord(pub Map<String, Json>);

impl DynamicRecord {
    pub fn from_json(value: Json) -> Result<Self> {
        match value {
            Json::Object(map) => Ok(Self(map)),
            other => Err(AdminError::Decode(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Record for DynamicRecord {
    fn id(&self) -> RecordId {
        self.0.get("id").and_then(id_from_json).unwrap_or_default()
    }

    fn fields(&self) -> Result<Map<String, Json>> {
        Ok(self.0.clone())
    }

    fn field(&self, key: &str) -> FieldValue {
        self.0
            .get(key)
            .map(FieldValue::from_json)
            .unwrap_or(FieldValue::Null)
    }
}

/// Renders a JSON id (string or number) the way it appears in URLs.
pub fn id_from_json(value: &Json) -> Option<RecordId> {
    match value {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
