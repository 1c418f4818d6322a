//! Supported model providers.

use std::fmt;
use std::str::FromStr;

use super::ModelError;

/// Hosted model APIs the adapter can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    Together,
    Groq,
    OpenAi,
}

/// How a provider is coaxed into returning structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredMode {
    /// Anthropic Messages API with a forced `tool_use`
    AnthropicTools,
    /// OpenAI-compatible chat completions with a forced function call
    OpenAiTools,
    /// OpenAI-compatible chat completions answering in a ```json block
    MarkdownJson,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Anthropic => "https://api.anthropic.com",
            Self::Together => "https://api.together.xyz/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
            Self::OpenAi => "https://api.openai.com/v1",
        }
    }

    /// Environment variable holding the API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Together => "TOGETHER_API_KEY",
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn structured_mode(&self) -> StructuredMode {
        match self {
            Self::Anthropic => StructuredMode::AnthropicTools,
            Self::Together | Self::OpenAi => StructuredMode::OpenAiTools,
            // Groq's tool calling is unreliable for forced schemas.
            Self::Groq => StructuredMode::MarkdownJson,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anthropic => write!(f, "anthropic"),
            Self::Together => write!(f, "together"),
            Self::Groq => write!(f, "groq"),
            Self::OpenAi => write!(f, "openai"),
        }
    }
}

impl FromStr for Provider {
    type Err = ModelError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "together" => Ok(Self::Together),
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAi),
            _ => Err(ModelError::UnsupportedProvider(tag.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags_case_insensitively() {
        assert_eq!("anthropic".parse::<Provider>().ok(), Some(Provider::Anthropic));
        assert_eq!(" Groq ".parse::<Provider>().ok(), Some(Provider::Groq));
        assert_eq!("OPENAI".parse::<Provider>().ok(), Some(Provider::OpenAi));
    }

    #[test]
    fn unknown_tags_are_an_explicit_error() {
        let err = "cohere".parse::<Provider>().expect_err("unsupported");
        assert!(matches!(err, ModelError::UnsupportedProvider(ref tag) if tag == "cohere"));
        assert_eq!(err.to_string(), "Unsupported model provider: cohere");
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for provider in [
            Provider::Anthropic,
            Provider::Together,
            Provider::Groq,
            Provider::OpenAi,
        ] {
            assert_eq!(provider.to_string().parse::<Provider>().ok(), Some(provider));
        }
    }

    #[test]
    fn groq_uses_markdown_json() {
        assert_eq!(Provider::Groq.structured_mode(), StructuredMode::MarkdownJson);
        assert_eq!(Provider::Together.structured_mode(), StructuredMode::OpenAiTools);
    }
}
