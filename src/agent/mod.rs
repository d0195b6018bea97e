//! Agent module - one-shot conversational agents.
//!
//! Every brainstorming step follows the same pattern:
//! 1. Render the user message from a template
//! 2. Build a fresh agent with a fixed or persona system prompt
//! 3. Send one message and take the first reply
//! 4. Pass the reply through, or extract a persona list from it

mod assistant;
pub mod extract;
pub mod prompt;

pub use assistant::{AgentFactory, AgentSpec, AssistantAgent, Exchange, DEFAULT_AUTO_REPLY, MAX_TURNS_CAP};
pub use extract::{extract_persona_list, parse_persona_list, passthrough, ExtractError, Persona};
pub use prompt::{build_message, MessageKind};
