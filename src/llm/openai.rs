//! OpenAI-compatible chat completions wire format (OpenAI, Together, Groq).

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::provider::Provider;
use super::{ModelError, ResponseSchema};
use crate::types::ModelConfig;

static JSON_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("valid json fence regex"));

/// Build a chat completion request that forces a function call shaped by `schema`.
pub(crate) fn build_tools_request(
    config: &ModelConfig,
    schema: &ResponseSchema,
    system: &str,
    message: &str,
) -> Value {
    json!({
        "model": config.model,
        "max_tokens": config.max_tokens,
        "temperature": config.temperature,
        "messages": [
            {"role": "system", "content": system},
            {"role": "user", "content": message}
        ],
        "tools": [{
            "type": "function",
            "function": {
                "name": schema.name,
                "description": schema.description,
                "parameters": schema.parameters,
            }
        }],
        "tool_choice": {"type": "function", "function": {"name": schema.name}},
    })
}

/// Build a chat completion request that asks for the answer in a ```json block.
pub(crate) fn build_markdown_json_request(
    config: &ModelConfig,
    schema: &ResponseSchema,
    system: &str,
    message: &str,
) -> Value {
    let system = format!(
        "{system}\n\nAnswer by producing a JSON object that conforms to this JSON schema:\n{}\n\
         Return an instance of the schema, not the schema itself.",
        schema.to_prompt_json()
    );

    json!({
        "model": config.model,
        "max_tokens": config.max_tokens,
        "temperature": config.temperature,
        "messages": [
            {"role": "system", "content": system},
            {"role": "user", "content": message},
            {"role": "user", "content": "Return the JSON object inside a ```json code block."}
        ],
    })
}

/// Decode the forced function call arguments.
pub(crate) fn extract_tool_arguments(
    provider: Provider,
    response: &Value,
    schema: &ResponseSchema,
) -> Result<Value, ModelError> {
    let call = first_message(provider, response)?
        .get("tool_calls")
        .and_then(Value::as_array)
        .and_then(|calls| {
            calls.iter().find(|call| {
                call.pointer("/function/name").and_then(Value::as_str) == Some(schema.name.as_str())
            })
        })
        .ok_or_else(|| malformed(provider, format!("no tool call for `{}`", schema.name)))?;

    match call.pointer("/function/arguments") {
        // Arguments are normally a JSON-encoded string.
        Some(Value::String(raw)) => serde_json::from_str(raw)
            .map_err(|e| malformed(provider, format!("tool arguments are not JSON: {}", e))),
        Some(value @ Value::Object(_)) => Ok(value.clone()),
        _ => Err(malformed(provider, "tool call has no arguments".to_string())),
    }
}

/// Decode a JSON object from the assistant's text content.
pub(crate) fn extract_markdown_json(
    provider: Provider,
    response: &Value,
) -> Result<Value, ModelError> {
    let content = first_message(provider, response)?
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(provider, "message has no text content".to_string()))?;

    let candidate = JSON_FENCE_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .or_else(|| outermost_object(content))
        .ok_or_else(|| malformed(provider, "no JSON object in response".to_string()))?;

    serde_json::from_str(candidate)
        .map_err(|e| malformed(provider, format!("response JSON is invalid: {}", e)))
}

fn first_message(provider: Provider, response: &Value) -> Result<&Value, ModelError> {
    response
        .pointer("/choices/0/message")
        .ok_or_else(|| malformed(provider, "response has no `choices[0].message`".to_string()))
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn malformed(provider: Provider, reason: String) -> ModelError {
    ModelError::MalformedResponse { provider, reason }
}
