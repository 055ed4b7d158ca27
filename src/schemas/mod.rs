//! Output schemas and the JSON validator.
//!
//! A schema names the keys a generation output must carry and the per-field
//! constraints on them. [`OutputSchema::parse_and_validate`] is the single
//! entry point: parse, check presence, check shape, and hand the object back
//! untouched (unknown keys included).

pub mod blog;
pub mod product;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utilities::errors::ValidationError;

pub use blog::BlogPost;
pub use product::ProductDescription;

/// A parsed JSON object.
pub type JsonObject = Map<String, Value>;

/// Identifies which schema a pipeline validates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSchema {
    /// E-commerce product listing.
    Product,
    /// Store blog post.
    Blog,
}

impl OutputSchema {
    /// Keys that must be present in the generated object.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            OutputSchema::Product => product::REQUIRED_FIELDS,
            OutputSchema::Blog => blog::REQUIRED_FIELDS,
        }
    }

    /// Parse repaired text and enforce this schema.
    pub fn parse_and_validate(&self, text: &str) -> Result<JsonObject, ValidationError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ValidationError::invalid_json(&e, text))?;
        self.validate(value)
    }

    /// Enforce this schema on an already parsed value.
    pub fn validate(&self, value: Value) -> Result<JsonObject, ValidationError> {
        let object = match value {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        };

        if !self
            .required_fields()
            .iter()
            .all(|field| object.contains_key(*field))
        {
            return Err(ValidationError::MissingFields {
                found: object.keys().cloned().collect(),
            });
        }

        match self {
            OutputSchema::Product => product::check_fields(&object)?,
            OutputSchema::Blog => blog::check_fields(&object)?,
        }

        Ok(object)
    }
}

impl fmt::Display for OutputSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputSchema::Product => write!(f, "product"),
            OutputSchema::Blog => write!(f, "blog"),
        }
    }
}

pub(crate) fn expect_string(object: &JsonObject, field: &str) -> Result<(), ValidationError> {
    match object.get(field) {
        Some(Value::String(_)) => Ok(()),
        _ => Err(ValidationError::invalid_type(field, "a string")),
    }
}

pub(crate) fn expect_optional_string(
    object: &JsonObject,
    field: &str,
) -> Result<(), ValidationError> {
    match object.get(field) {
        Some(Value::String(_)) | Some(Value::Null) | None => Ok(()),
        _ => Err(ValidationError::invalid_type(field, "a string or null")),
    }
}
