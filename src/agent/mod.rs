//! Agent module - the propose/execute/judge loop.
//!
//! Each turn:
//! 1. Snapshot the environment state as context
//! 2. Ask the model for the next action, constrained to the environment's schema
//! 3. Execute the action in the environment
//! 4. Ask the model to judge the outcome; stop on `done`, otherwise feed the
//!    judgment and the environment response into the next turn

mod agent_loop;
mod prompt;

pub use agent_loop::{Agent, AgentError, AgentOptions};
pub use prompt::WEB_RESEARCH_SYSTEM_PROMPT;
