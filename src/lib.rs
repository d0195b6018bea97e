//! # Persona Brainstorm
//!
//! HTTP backend for a multi-perspective brainstorming front-end.
//!
//! This library provides:
//! - One HTTP endpoint per brainstorming step
//! - Prompt templates and a per-request agent factory
//! - Integration with a local OpenAI-compatible LLM server
//!
//! ## Workflow
//!
//! The front-end drives the steps and keeps all state:
//! 1. Rephrase the problem statement as a question
//! 2. Generate contrasting personas
//! 3. Collect each persona's solution and merge them
//! 4. Collect each persona's critique and revise the solution
//!
//! ## Example
//!
//! ```rust,ignore
//! use persona_brainstorm::{api, config::Config};
//!
//! let config = Config::from_env()?;
//! api::serve(config).await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;

pub use config::Config;
