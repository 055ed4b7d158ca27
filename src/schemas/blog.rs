//! Blog post schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{expect_string, JsonObject};
use crate::utilities::errors::ValidationError;

pub const REQUIRED_FIELDS: &[&str] = &["title", "content", "meta_description", "tags", "category"];

/// Minimum number of tags a post must carry.
pub const MIN_TAGS: usize = 3;

/// Minimum number of whitespace-separated words in `content`.
pub const MIN_CONTENT_WORDS: usize = 200;

/// A generated blog post, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    /// Markdown body.
    pub content: String,
    pub meta_description: String,
    pub tags: Vec<String>,
    pub category: String,
}

impl BlogPost {
    /// Build the response model from an object that passed validation.
    pub fn from_validated(object: JsonObject) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(object))
    }
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

pub(crate) fn check_fields(object: &JsonObject) -> Result<(), ValidationError> {
    let tags = match object.get("tags") {
        Some(Value::Array(tags)) if tags.len() >= MIN_TAGS => tags,
        Some(Value::Array(tags)) => {
            return Err(ValidationError::InvalidTags {
                found: format!("{} items", tags.len()),
                min: MIN_TAGS,
            })
        }
        other => {
            return Err(ValidationError::InvalidTags {
                found: describe(other),
                min: MIN_TAGS,
            })
        }
    };

    let content = match object.get("content") {
        Some(Value::String(content)) => content,
        _ => return Err(ValidationError::invalid_type("content", "a string")),
    };
    let words = count_words(content);
    if words < MIN_CONTENT_WORDS {
        return Err(ValidationError::ContentTooShort {
            words,
            min: MIN_CONTENT_WORDS,
        });
    }

    if !tags.iter().all(Value::is_string) {
        return Err(ValidationError::invalid_type("tags", "a list of strings"));
    }
    expect_string(object, "title")?;
    expect_string(object, "meta_description")?;
    expect_string(object, "category")?;
    Ok(())
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(_)) => "a boolean".to_string(),
        Some(Value::Number(_)) => "a number".to_string(),
        Some(Value::String(_)) => "a string".to_string(),
        Some(Value::Object(_)) => "an object".to_string(),
        Some(Value::Array(items)) => format!("{} items", items.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::OutputSchema;
    use serde_json::json;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn post() -> Value {
        json!({
            "title": "Five Ways to Style a Linen Throw",
            "content": format!("## Intro\n\n{}", words(250)),
            "meta_description": "Simple styling ideas for linen throws.",
            "tags": ["linen", "home", "styling"],
            "category": "Home Decor"
        })
    }

    #[test]
    fn test_valid_post() {
        let object = OutputSchema::Blog.validate(post()).unwrap();
        let post = BlogPost::from_validated(object).unwrap();
        assert_eq!(post.tags, vec!["linen", "home", "styling"]);
        assert_eq!(post.category, "Home Decor");
    }

    #[test]
    fn test_two_tags_rejected() {
        let mut value = post();
        value["tags"] = json!(["a", "b"]);
        let err = OutputSchema::Blog.validate(value).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidTags {
                found: "2 items".to_string(),
                min: MIN_TAGS
            }
        );
    }

    #[test]
    fn test_tags_must_be_a_list() {
        let mut value = post();
        value["tags"] = json!("a, b, c, d");
        let err = OutputSchema::Blog.validate(value).unwrap_err();
        assert_eq!(err.kind(), "invalid_tags");
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn test_short_content_rejected() {
        let mut value = post();
        value["content"] = json!(words(150));
        let err = OutputSchema::Blog.validate(value).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ContentTooShort {
                words: 150,
                min: MIN_CONTENT_WORDS
            }
        );
    }

    #[test]
    fn test_exactly_minimum_words_accepted() {
        let mut value = post();
        value["content"] = json!(words(MIN_CONTENT_WORDS));
        assert!(OutputSchema::Blog.validate(value).is_ok());
    }

    #[test]
    fn test_count_words_splits_on_any_whitespace() {
        assert_eq!(count_words("  one\ttwo\n\nthree  "), 3);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_non_string_tag_rejected() {
        let mut value = post();
        value["tags"] = json!(["a", "b", 3]);
        let err = OutputSchema::Blog.validate(value).unwrap_err();
        assert_eq!(err, ValidationError::invalid_type("tags", "a list of strings"));
    }

    #[test]
    fn test_missing_meta_description() {
        let mut value = post();
        value.as_object_mut().unwrap().remove("meta_description");
        let err = OutputSchema::Blog.validate(value).unwrap_err();
        assert_eq!(err.kind(), "missing_fields");
    }
}
