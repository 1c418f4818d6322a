//! Core agent loop implementation.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::environment::Environment;
use crate::llm::{structured_response, ModelError, ProviderClient, ResponseSchema, StructuredModel};
use crate::types::{EnvironmentResponse, ModelConfig, TaskOutcome};

use super::prompt::{format_action_message, format_context, format_judgment_message, next_command};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Failed to encode the turn for the model: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Turn limit ({0}) reached without completion")]
    TurnLimitReached(usize),
}

/// Knobs for a run.
#[derive(Debug, Clone, Default)]
pub struct AgentOptions {
    /// Log each turn's command, action, response and judgment at `info`
    pub verbose: bool,

    /// Abort after this many turns (`None` = run until the model says done)
    pub max_turns: Option<usize>,
}

impl From<&Config> for AgentOptions {
    fn from(config: &Config) -> Self {
        Self {
            verbose: config.verbose,
            max_turns: config.max_turns,
        }
    }
}

/// The agent: proposes actions with a model and runs them in an environment.
pub struct Agent<E: Environment> {
    system_prompt: String,
    model: Arc<dyn StructuredModel>,
    environment: E,
    options: AgentOptions,
}

impl<E: Environment> Agent<E> {
    /// Create an agent talking to the provider named in `model_config`.
    pub fn new(
        system_prompt: impl Into<String>,
        model_config: ModelConfig,
        environment: E,
    ) -> Self {
        Self::with_model(
            system_prompt,
            Arc::new(ProviderClient::new(model_config)),
            environment,
        )
    }

    /// Create an agent with any structured model.
    pub fn with_model(
        system_prompt: impl Into<String>,
        model: Arc<dyn StructuredModel>,
        environment: E,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            model,
            environment,
            options: AgentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AgentOptions) -> Self {
        self.options = options;
        self
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    /// Run turns until the model judges the task done.
    ///
    /// Each turn: snapshot the environment, ask for an action, execute it, ask
    /// for a judgment. The returned outcome is the final judgment as given.
    pub async fn run(&mut self, command: &str) -> Result<TaskOutcome, AgentError> {
        let mut command = command.to_string();
        let mut turn = 0usize;

        loop {
            if let Some(max_turns) = self.options.max_turns {
                if turn >= max_turns {
                    return Err(AgentError::TurnLimitReached(max_turns));
                }
            }
            turn += 1;
            debug!("Agent turn {}", turn);
            if self.options.verbose {
                info!(turn, "user_command - {}", command);
            }

            // Snapshot before acting: the context only reflects earlier turns.
            let context = format_context(&self.environment.describe_state());
            let schema = self.environment.build_action_schema();
            let action = self.propose_action(&schema, &command, &context).await?;

            let response = self.environment.execute(&action).await;
            let outcome = self.judge(&action, &response).await?;

            if self.options.verbose {
                info!(turn, "Agent Action: {}", serde_json::to_string(&action)?);
                info!(turn, "Environment Outcome: {}", serde_json::to_string(&response)?);
                info!(turn, "Task Outcome: {}", serde_json::to_string(&outcome)?);
            }

            if outcome.is_done() {
                self.environment.on_completion().await;
                return Ok(outcome);
            }

            command = next_command(&outcome, &response);
        }
    }

    async fn propose_action(
        &self,
        schema: &ResponseSchema,
        command: &str,
        context: &str,
    ) -> Result<E::Action, AgentError> {
        let message = format_action_message(command, context);
        let action =
            structured_response(&*self.model, schema, &self.system_prompt, &message).await?;
        Ok(action)
    }

    async fn judge(
        &self,
        action: &E::Action,
        response: &EnvironmentResponse,
    ) -> Result<TaskOutcome, AgentError> {
        let message = format_judgment_message(
            &serde_json::to_string(action)?,
            &serde_json::to_string(response)?,
        );
        let outcome = structured_response(
            &*self.model,
            &TaskOutcome::schema(),
            &self.system_prompt,
            &message,
        )
        .await?;
        Ok(outcome)
    }
}
