//! Anthropic Messages API wire format.

use serde_json::{json, Value};

use super::provider::Provider;
use super::{ModelError, ResponseSchema};
use crate::types::ModelConfig;

pub(crate) const API_VERSION: &str = "2023-06-01";

/// Build a Messages request that forces a single `tool_use` shaped by `schema`.
pub(crate) fn build_request(
    config: &ModelConfig,
    schema: &ResponseSchema,
    system: &str,
    message: &str,
) -> Value {
    json!({
        "model": config.model,
        "max_tokens": config.max_tokens,
        "temperature": config.temperature,
        "system": system,
        "messages": [
            {"role": "user", "content": message}
        ],
        "tools": [{
            "name": schema.name,
            "description": schema.description,
            "input_schema": schema.parameters,
        }],
        "tool_choice": {"type": "tool", "name": schema.name},
    })
}

/// Pull the forced tool input out of a Messages response.
pub(crate) fn extract_tool_input(
    response: &Value,
    schema: &ResponseSchema,
) -> Result<Value, ModelError> {
    let blocks = response
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("response has no `content` array"))?;

    blocks
        .iter()
        .find(|block| {
            block.get("type").and_then(Value::as_str) == Some("tool_use")
                && block.get("name").and_then(Value::as_str) == Some(schema.name.as_str())
        })
        .and_then(|block| block.get("input"))
        .cloned()
        .ok_or_else(|| malformed(&format!("no `tool_use` block for `{}`", schema.name)))
}

fn malformed(reason: &str) -> ModelError {
    ModelError::MalformedResponse {
        provider: Provider::Anthropic,
        reason: reason.to_string(),
    }
}
