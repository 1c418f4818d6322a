//! Model invocation: send one prompt to a hosted model and get back a value
//! validated against a response schema.

mod anthropic;
mod client;
mod openai;
mod provider;
mod schema;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use client::ProviderClient;
pub use provider::{Provider, StructuredMode};
pub use schema::ResponseSchema;

/// Errors from a model call. None of these are swallowed; the caller decides.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Unsupported model provider: {0}")]
    UnsupportedProvider(String),

    #[error("No API key for {provider}: set `{env_var}` or pass one explicitly")]
    MissingApiKey {
        provider: Provider,
        env_var: &'static str,
    },

    #[error("{provider} request failed: {source}")]
    Http {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API error (status {status}): {body}")]
    Api {
        provider: Provider,
        status: u16,
        body: String,
    },

    #[error("Malformed {provider} response: {reason}")]
    MalformedResponse { provider: Provider, reason: String },

    #[error("Response does not match schema `{schema}`: {reason}")]
    SchemaValidation { schema: String, reason: String },
}

/// Anything that can answer a prompt with a JSON value shaped by a schema.
///
/// Implementations return the raw structured value; validation against the
/// schema happens in [`structured_response`].
#[async_trait]
pub trait StructuredModel: Send + Sync {
    async fn complete(
        &self,
        schema: &ResponseSchema,
        system: &str,
        message: &str,
    ) -> Result<Value, ModelError>;
}

/// Ask `model` for a response, validate it against `schema` and decode it.
pub async fn structured_response<T>(
    model: &dyn StructuredModel,
    schema: &ResponseSchema,
    system: &str,
    message: &str,
) -> Result<T, ModelError>
where
    T: DeserializeOwned,
{
    let value = model.complete(schema, system, message).await?;
    schema.validate(&value)?;
    serde_json::from_value(value).map_err(|e| ModelError::SchemaValidation {
        schema: schema.name.clone(),
        reason: e.to_string(),
    })
}

/// Trim provider error bodies before they end up in error messages.
fn truncate_body(body: &str) -> String {
    const MAX_ERROR_TEXT_CHARS: usize = 1_024;

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty error response body>".to_string();
    }
    if trimmed.chars().count() <= MAX_ERROR_TEXT_CHARS {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(MAX_ERROR_TEXT_CHARS).collect();
    format!("{}... [truncated]", head)
}
