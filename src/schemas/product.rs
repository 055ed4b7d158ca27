//! Product listing schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{expect_optional_string, expect_string, JsonObject};
use crate::utilities::errors::ValidationError;

pub const REQUIRED_FIELDS: &[&str] = &[
    "title",
    "description",
    "category",
    "price_suggestion",
    "sku_suggestion",
];

/// A generated product listing, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDescription {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price_suggestion: Option<f64>,
    #[serde(default)]
    pub sku_suggestion: Option<String>,
}

impl ProductDescription {
    /// Build the response model from an object that passed validation.
    pub fn from_validated(object: JsonObject) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(object))
    }
}

/// Per-field checks run after presence has been established.
pub(crate) fn check_fields(object: &JsonObject) -> Result<(), ValidationError> {
    if !object.get("price_suggestion").is_some_and(Value::is_number) {
        return Err(ValidationError::invalid_type("price_suggestion", "a number"));
    }

    expect_string(object, "title")?;
    expect_string(object, "description")?;
    expect_optional_string(object, "category")?;
    expect_optional_string(object, "sku_suggestion")?;
    Ok(())
}
