//! # agentica
//!
//! A minimal agent loop: a language model picks actions, an environment runs
//! them, and the model judges when the task is finished.
//!
//! ## Architecture
//!
//! - [`llm`] sends a prompt to a hosted model and validates the structured answer
//! - [`environment`] defines what an agent can act upon, with a web
//!   search/scrape implementation
//! - [`agent`] drives the propose → execute → judge loop until the model says done
//!
//! ## Example
//!
//! ```rust,ignore
//! use agentica::{agent::Agent, environment::SearchEnvironment, Config};
//!
//! let config = Config::from_env()?;
//! let env = SearchEnvironment::new(None)?;
//! let mut agent = Agent::new("You are a web research agent.", config.model, env);
//! let outcome = agent.run("Find me events in Austin today").await?;
//! ```

pub mod agent;
pub mod config;
pub mod environment;
pub mod llm;
pub mod types;

pub use config::Config;
