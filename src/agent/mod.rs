//! Agent module.
//!
//! An [`Agent`] is a role-played persona bound to a shared LLM. It turns a
//! task prompt (plus optional context from earlier tasks) into one LLM call.

pub mod core;

// Re-export the main Agent type.
pub use self::core::Agent;
