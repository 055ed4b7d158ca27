//! LLM abstractions and provider clients.
//!
//! - [`base_llm`] - The trait every model client implements
//! - [`providers`] - Concrete provider clients

pub mod base_llm;
pub mod providers;

pub use base_llm::{BaseLLM, BaseLLMState, LLMError, LLMMessage};
