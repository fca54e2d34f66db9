use crate::core::{AdminError, Record, RecordId, Result, id_from_json};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as Json};

/// `{id} + changed fields`, as sent in a PATCH body.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePayload {
    id: Json,
    fields: Map<String, Json>,
}

impl UpdatePayload {
    /// Keeps the record's own JSON id so numeric ids stay numeric.
    pub fn new<R: Record>(original: &R, fields: Map<String, Json>) -> Self {
        let id = original
            .fields()
            .ok()
            .and_then(|map| map.get("id").cloned())
            .filter(|id| !id.is_null())
            .unwrap_or_else(|| Json::String(original.id()));
        let mut fields = fields;
        fields.remove("id");
        Self { id, fields }
    }

    /// Builds the payload from a caller's typed update value.
    pub fn from_typed<R: Record, U: Serialize>(original: &R, updated: &U) -> Result<Self> {
        match serde_json::to_value(updated)? {
            Json::Object(fields) => Ok(Self::new(original, fields)),
            Json::Null => Ok(Self::new(original, Map::new())),
            other => Err(AdminError::Decode(format!(
                "update payload must be an object, got {}",
                other
            ))),
        }
    }

    pub fn id(&self) -> RecordId {
        id_from_json(&self.id).unwrap_or_default()
    }

    pub fn fields(&self) -> &Map<String, Json> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The changed fields decoded into the caller's update type.
    pub fn typed<U: DeserializeOwned>(&self) -> Result<U> {
        Ok(serde_json::from_value(Json::Object(self.fields.clone()))?)
    }

    pub fn to_json(&self) -> Json {
        let mut body = Map::with_capacity(self.fields.len() + 1);
        body.insert("id".to_string(), self.id.clone());
        body.extend(self.fields.clone());
        Json::Object(body)
    }
}
