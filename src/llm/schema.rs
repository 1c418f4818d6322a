//! Response schemas the model output is constrained to.

use serde::Serialize;
use serde_json::{Map, Value};

use super::ModelError;

/// A named JSON Schema for a structured model response.
///
/// `parameters` is an object schema in the same shape providers accept for
/// tool/function parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ResponseSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Check a model response against this schema.
    ///
    /// Covers the subset of JSON Schema used here: an object at the top level,
    /// `required` keys present and non-null, primitive `type` per property and
    /// `enum` membership. Unknown properties are ignored.
    pub fn validate(&self, value: &Value) -> Result<(), ModelError> {
        let object = value
            .as_object()
            .ok_or_else(|| {
                self.violation(format!("expected an object, got {}", type_name(value)))
            })?;

        for key in self.required() {
            match object.get(key) {
                None | Some(Value::Null) => {
                    return Err(self.violation(format!("missing required field `{}`", key)));
                }
                Some(_) => {}
            }
        }

        let Some(properties) = self.parameters.get("properties").and_then(Value::as_object) else {
            return Ok(());
        };

        for (key, property) in properties {
            match object.get(key) {
                None | Some(Value::Null) => continue,
                Some(field) => self.check_property(key, property, field)?,
            }
        }

        Ok(())
    }

    /// Names of the properties the model must always fill.
    pub fn required(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|keys| keys.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    fn check_property(&self, key: &str, property: &Value, field: &Value) -> Result<(), ModelError> {
        if let Some(expected) = property.get("type").and_then(Value::as_str) {
            if !matches_type(expected, field) {
                return Err(self.violation(format!(
                    "field `{}` should be {}, got {}",
                    key,
                    expected,
                    type_name(field)
                )));
            }
        }

        if let Some(allowed) = property.get("enum").and_then(Value::as_array) {
            if !allowed.contains(field) {
                return Err(self.violation(format!(
                    "field `{}` must be one of {}, got {}",
                    key,
                    Value::Array(allowed.clone()),
                    field
                )));
            }
        }

        Ok(())
    }

    fn violation(&self, reason: String) -> ModelError {
        ModelError::SchemaValidation {
            schema: self.name.clone(),
            reason,
        }
    }

    /// The schema as a plain JSON object, for embedding in prompts.
    pub(crate) fn to_prompt_json(&self) -> String {
        let mut object = Map::new();
        object.insert("title".to_string(), Value::String(self.name.clone()));
        object.insert("description".to_string(), Value::String(self.description.clone()));
        if let Some(parameters) = self.parameters.as_object() {
            for (k, v) in parameters {
                object.insert(k.clone(), v.clone());
            }
        }
        serde_json::to_string_pretty(&Value::Object(object)).unwrap_or_default()
    }
}

fn matches_type(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
