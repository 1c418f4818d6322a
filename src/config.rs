//! Configuration management for agentica.
//!
//! Configuration can be set via environment variables:
//! - `AGENTICA_PROVIDER` - Optional. Model provider tag. Defaults to `anthropic`.
//! - `AGENTICA_MODEL` - Optional. Model identifier. Defaults to `claude-3-opus-20240229`.
//! - `AGENTICA_TEMPERATURE` - Optional. Sampling temperature. Defaults to `0.3`.
//! - `AGENTICA_MAX_TOKENS` - Optional. Maximum tokens per response. Defaults to `4096`.
//! - `AGENTICA_VERBOSE` - Optional. Log every turn's action and outcome. Defaults to `false`.
//! - `MAX_TURNS` - Optional. Upper bound on agent turns. Unbounded when unset.
//!
//! Provider API keys (`ANTHROPIC_API_KEY`, `TOGETHER_API_KEY`, `GROQ_API_KEY`,
//! `OPENAI_API_KEY`) are read lazily by [`crate::llm::ProviderClient`], and
//! `SERP_API_KEY` by [`crate::environment::SearchEnvironment`]. For both, an
//! explicitly passed key wins unless it is blank; a blank key in either place
//! counts as missing.

use thiserror::Error;

use crate::types::ModelConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Process-scoped configuration handed to the agent and its environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model selection and sampling parameters
    pub model: ModelConfig,

    /// Maximum number of turns before the run is aborted (`None` = unbounded)
    pub max_turns: Option<usize>,

    /// Log each turn's action, environment response and judgment
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            max_turns: None,
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a numeric or boolean variable
    /// cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ModelConfig::default();

        let provider = lookup("AGENTICA_PROVIDER").unwrap_or(defaults.provider);
        let model = lookup("AGENTICA_MODEL").unwrap_or(defaults.model);

        let temperature = lookup("AGENTICA_TEMPERATURE")
            .map(|v| {
                v.trim().parse::<f32>().map_err(|e| {
                    ConfigError::InvalidValue("AGENTICA_TEMPERATURE".to_string(), format!("{}", e))
                })
            })
            .transpose()?
            .unwrap_or(defaults.temperature);

        let max_tokens = lookup("AGENTICA_MAX_TOKENS")
            .map(|v| {
                v.trim().parse::<u32>().map_err(|e| {
                    ConfigError::InvalidValue("AGENTICA_MAX_TOKENS".to_string(), format!("{}", e))
                })
            })
            .transpose()?
            .unwrap_or(defaults.max_tokens);

        let max_turns = lookup("MAX_TURNS")
            .map(|v| {
                v.trim().parse::<usize>().map_err(|e| {
                    ConfigError::InvalidValue("MAX_TURNS".to_string(), format!("{}", e))
                })
            })
            .transpose()?;

        if max_turns == Some(0) {
            return Err(ConfigError::InvalidValue(
                "MAX_TURNS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let verbose = lookup("AGENTICA_VERBOSE")
            .map(|v| {
                parse_bool(&v)
                    .map_err(|e| ConfigError::InvalidValue("AGENTICA_VERBOSE".to_string(), e))
            })
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            model: ModelConfig {
                provider,
                model,
                temperature,
                max_tokens,
            },
            max_turns,
            verbose,
        })
    }
}

/// Pick an API key: the explicit one unless blank, else `env_var` unless blank.
pub(crate) fn resolve_api_key<F>(
    explicit: Option<String>,
    env_var: &str,
    lookup: F,
) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .filter(|key| !key.trim().is_empty())
        .or_else(|| lookup(env_var).filter(|key| !key.trim().is_empty()))
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected boolean-like value, got: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).expect("defaults load");
        assert_eq!(config.model.provider, "anthropic");
        assert_eq!(config.model.model, "claude-3-opus-20240229");
        assert_eq!(config.model.max_tokens, 4096);
        assert!((config.model.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.max_turns, None);
        assert!(!config.verbose);
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("AGENTICA_PROVIDER", "groq"),
            ("AGENTICA_MODEL", "llama3-70b-8192"),
            ("AGENTICA_TEMPERATURE", "0.0"),
            ("AGENTICA_MAX_TOKENS", "1024"),
            ("MAX_TURNS", "12"),
            ("AGENTICA_VERBOSE", "yes"),
        ]))
        .expect("overrides load");

        assert_eq!(config.model.provider, "groq");
        assert_eq!(config.model.model, "llama3-70b-8192");
        assert_eq!(config.model.max_tokens, 1024);
        assert_eq!(config.max_turns, Some(12));
        assert!(config.verbose);
    }

    #[test]
    fn invalid_numbers_are_reported_with_variable_name() {
        let err = Config::from_lookup(lookup_from(&[("AGENTICA_MAX_TOKENS", "lots")]))
            .expect_err("should fail");
        match err {
            ConfigError::InvalidValue(name, _) => assert_eq!(name, "AGENTICA_MAX_TOKENS"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_turn_bound_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("MAX_TURNS", "0")])).expect_err("should fail");
        assert_eq!(
            err,
            ConfigError::InvalidValue("MAX_TURNS".to_string(), "must be at least 1".to_string())
        );
    }

    #[test]
    fn api_key_prefers_explicit_and_skips_blanks() {
        let env = lookup_from(&[("SERP_API_KEY", "from-env"), ("GROQ_API_KEY", " ")]);
        assert_eq!(
            resolve_api_key(Some("explicit".to_string()), "SERP_API_KEY", &env),
            Some("explicit".to_string())
        );
        assert_eq!(
            resolve_api_key(Some("  ".to_string()), "SERP_API_KEY", &env),
            Some("from-env".to_string())
        );
        assert_eq!(
            resolve_api_key(None, "SERP_API_KEY", &env),
            Some("from-env".to_string())
        );
        assert_eq!(resolve_api_key(Some(String::new()), "GROQ_API_KEY", &env), None);
        assert_eq!(resolve_api_key(None, "OPENAI_API_KEY", &env), None);
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("ON"), Ok(true));
        assert_eq!(parse_bool(" 0 "), Ok(false));
        assert!(parse_bool("maybe").is_err());
    }
}
