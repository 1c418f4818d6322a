//! Environments: the world an agent acts upon.
//!
//! An environment tells the model which actions it accepts
//! ([`Environment::build_action_schema`]), summarizes what it has accumulated so
//! far ([`Environment::describe_state`]), and performs one action at a time
//! ([`Environment::execute`]). Failures inside an environment are reported as
//! [`EnvironmentResponse`] errors so the model can correct course on the next
//! turn.

mod page;
mod search;

use std::fmt::Debug;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::llm::ResponseSchema;
use crate::types::EnvironmentResponse;

pub use page::PageContent;
pub use search::{SearchAction, SearchEnvironment, SearchResult};

#[async_trait]
pub trait Environment: Send {
    /// The record the model fills in to pick the next action.
    type Action: Serialize + DeserializeOwned + Debug + Send + Sync;

    /// Schema the model is constrained to when proposing an action.
    ///
    /// Must only admit actions that [`Environment::execute`] understands.
    fn build_action_schema(&self) -> ResponseSchema;

    /// Model-readable snapshot of accumulated state.
    fn describe_state(&self) -> String;

    /// Perform one action. Never fails; problems come back as error responses.
    async fn execute(&mut self, action: &Self::Action) -> EnvironmentResponse;

    /// Called once after the agent decides the task is done.
    async fn on_completion(&mut self) {}
}
