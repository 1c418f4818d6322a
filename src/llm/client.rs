//! HTTP client dispatching structured requests to the configured provider.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::instrument;

use super::provider::{Provider, StructuredMode};
use super::{anthropic, openai, truncate_body, ModelError, ResponseSchema, StructuredModel};
use crate::config::resolve_api_key;
use crate::types::ModelConfig;

/// Model client for the provider named in a [`ModelConfig`].
///
/// The provider tag is resolved on every call, so an unsupported tag or a
/// missing API key is reported by the call that needs it.
pub struct ProviderClient {
    config: ModelConfig,
    http_client: Client,
    api_key: Option<String>,
    base_url: Option<String>,
}

impl ProviderClient {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
            api_key: None,
            base_url: None,
        }
    }

    /// Use this key instead of the provider's environment variable.
    ///
    /// A blank key is ignored and the environment variable is used instead.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Send requests to a different endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    fn key_for(&self, provider: Provider) -> Result<String, ModelError> {
        let env_var = provider.api_key_env();
        resolve_api_key(self.api_key.clone(), env_var, |key| std::env::var(key).ok())
            .ok_or(ModelError::MissingApiKey {
                provider,
                env_var,
            })
    }

    fn base_url(&self, provider: Provider) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| provider.default_base_url().to_string())
    }

    async fn post_json(
        &self,
        provider: Provider,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, ModelError> {
        let response = request
            .send()
            .await
            .map_err(|source| ModelError::Http { provider, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                provider,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ModelError::MalformedResponse {
                provider,
                reason: format!("response body is not JSON: {}", e),
            })
    }
}

#[async_trait]
impl StructuredModel for ProviderClient {
    #[instrument(
        skip(self, schema, system, message),
        fields(schema = %schema.name),
        level = "debug"
    )]
    async fn complete(
        &self,
        schema: &ResponseSchema,
        system: &str,
        message: &str,
    ) -> Result<Value, ModelError> {
        let provider: Provider = self.config.provider.parse()?;
        let api_key = self.key_for(provider)?;
        let base_url = self.base_url(provider);

        tracing::debug!(%provider, model = %self.config.model, "Calling model");

        match provider.structured_mode() {
            StructuredMode::AnthropicTools => {
                let body = anthropic::build_request(&self.config, schema, system, message);
                let request = self
                    .http_client
                    .post(format!("{}/v1/messages", base_url))
                    .header("x-api-key", api_key)
                    .header("anthropic-version", anthropic::API_VERSION)
                    .json(&body);
                let response = self.post_json(provider, request).await?;
                anthropic::extract_tool_input(&response, schema)
            }
            StructuredMode::OpenAiTools => {
                let body = openai::build_tools_request(&self.config, schema, system, message);
                let request = self
                    .http_client
                    .post(format!("{}/chat/completions", base_url))
                    .bearer_auth(api_key)
                    .json(&body);
                let response = self.post_json(provider, request).await?;
                openai::extract_tool_arguments(provider, &response, schema)
            }
            StructuredMode::MarkdownJson => {
                let body =
                    openai::build_markdown_json_request(&self.config, schema, system, message);
                let request = self
                    .http_client
                    .post(format!("{}/chat/completions", base_url))
                    .bearer_auth(api_key)
                    .json(&body);
                let response = self.post_json(provider, request).await?;
                openai::extract_markdown_json(provider, &response)
            }
        }
    }
}
