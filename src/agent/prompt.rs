//! Prompt templates for the agent.

use serde_json::Value;

use crate::types::{EnvironmentResponse, TaskOutcome};

/// System prompt for the web research agent.
pub const WEB_RESEARCH_SYSTEM_PROMPT: &str = "You are a web research agent who will search \
    the web and assist the user in all of their web search needs.";

const ONGOING_TASK: &str = "Ongoing task:";

/// Wrap the environment snapshot for the action proposal.
pub fn format_context(state: &str) -> String {
    format!("Environment state: {}", state)
}

/// Message asking the model for its next action.
pub fn format_action_message(command: &str, context: &str) -> String {
    let mut message = format!("Message:\n {}", command);
    if !context.is_empty() {
        message.push_str(&format!("\n use the following context:\n{}", context));
    }
    message
}

/// Message asking the model to judge the turn that just ran.
pub fn format_judgment_message(action: &str, outcome: &str) -> String {
    format!("Agent Action: {}\nOutcome: {}", action, outcome)
}

/// Instruction for the next turn, built from the judgment and the last response.
pub fn next_command(outcome: &TaskOutcome, response: &EnvironmentResponse) -> String {
    let mut command = outcome
        .message
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(ONGOING_TASK)
        .to_string();

    if let Some(notes) = outcome.notes.as_deref().filter(|n| !n.is_empty()) {
        command.push_str(&format!("\nnotes: {}", notes));
    }

    if let Some(value) = present(&response.return_value) {
        command.push_str(&format!("\nprevious task outcome: {}", render(value)));
    } else if let Some(error) = present(&response.error) {
        command.push_str(&format!("\nprevious task error: {}", render(error)));
    }

    command
}

/// The value, unless it is missing or empty.
fn present(value: &Option<Value>) -> Option<&Value> {
    value.as_ref().filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    })
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
