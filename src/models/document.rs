use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::AppError;

pub type FieldMap = Map<String, Value>;

/// A raw document from the backing store: an identifier plus an untyped
/// field bag.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub fields: FieldMap,
}

impl Document {
    pub fn new(id: Uuid, fields: FieldMap) -> Self {
        Self { id, fields }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field bag with the identifier merged under the fixed `id` key.
    pub fn merged(&self) -> FieldMap {
        let mut map = self.fields.clone();
        map.insert("id".into(), Value::String(self.id.to_string()));
        map
    }

    /// Decode into a typed record. Missing optional fields take their
    /// defaults; a type mismatch is a deserialization error.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_value(Value::Object(self.merged()))
            .map_err(|e| AppError::Deserialization(e.to_string()))
    }
}

/// View a JSON object literal as a store field bag.
pub fn fields_of(value: Value) -> Result<FieldMap, AppError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::Serialization("expected a map of fields".into())),
    }
}
