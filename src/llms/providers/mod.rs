//! LLM provider implementations.
//!
//! | Provider | Module |
//! |----------|--------|
//! | OpenAI-compatible (OpenAI, NVIDIA NIM) | [`openai`] |

pub mod openai;
