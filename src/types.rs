//! Message records exchanged between the agent, the model and environments.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::llm::ResponseSchema;

/// Model selection and sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider tag (`anthropic`, `together`, `groq`, `openai`)
    pub provider: String,

    /// Model identifier sent to the provider
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens the provider may generate
    pub max_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-3-opus-20240229".to_string(),
            temperature: 0.3,
            max_tokens: 4096,
        }
    }
}

/// Result of executing one action inside an environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentResponse {
    /// Free-form status label (e.g. "Search Executed", "error")
    pub status: String,

    /// Payload on success
    #[serde(default)]
    pub return_value: Option<Value>,

    /// Error detail on failure
    #[serde(default)]
    pub error: Option<Value>,
}

impl EnvironmentResponse {
    /// A response carrying only a status.
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            return_value: None,
            error: None,
        }
    }

    /// A successful response with a payload.
    pub fn success(status: impl Into<String>, value: Value) -> Self {
        Self {
            status: status.into(),
            return_value: Some(value),
            error: None,
        }
    }

    /// A failed response.
    pub fn failure(status: impl Into<String>, error: impl Into<Value>) -> Self {
        Self {
            status: status.into(),
            return_value: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Whether the overall task still needs work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// More actions are required
    #[default]
    Running,
    /// The task is finished
    Done,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// The model's judgment after each turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    #[serde(default)]
    pub status: TaskStatus,

    /// Message to communicate to the user about the outcome
    #[serde(default)]
    pub message: Option<String>,

    /// Scratch notes the model keeps for itself across turns
    #[serde(default)]
    pub notes: Option<String>,
}

impl TaskOutcome {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Schema the judging call is constrained to.
    pub fn schema() -> ResponseSchema {
        ResponseSchema::new(
            "TaskOutcome",
            "Judge whether the task is complete after the latest action.",
            json!({
                "type": "object",
                "properties": {
                    "status": {
                        "type": "string",
                        "enum": ["running", "done"],
                        "description": "Set this to `running` if there are more tasks to take \
                            or `done` if there are no more tasks to take."
                    },
                    "message": {
                        "type": "string",
                        "description": "The message regarding the outcome of the task and \
                            what you'd like to communicate to the user."
                    },
                    "notes": {
                        "type": "string",
                        "description": "Notes for yourself, write down anything you want to \
                            remember for an ongoing task."
                    }
                }
            }),
        )
    }
}
