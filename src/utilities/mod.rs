//! Shared utilities: JSON repair, validation errors, templating and
//! artifact files.

pub mod converter;
pub mod errors;
pub mod file_handler;
pub mod string_utils;
