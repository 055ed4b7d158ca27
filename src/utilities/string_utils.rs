//! Template interpolation for task descriptions.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_\-]*)\}").unwrap());

/// Interpolate placeholders (e.g., `{key}`) in a string while leaving JSON untouched.
///
/// Only `{variable_name}` placeholders are replaced, where `variable_name`
/// starts with a letter or underscore and contains only alphanumerics,
/// underscores and hyphens. Substituted values are never re-scanned, so a
/// value containing `{other}` is inserted literally.
///
/// # Errors
/// Returns an error if a template variable is not found in `inputs`.
pub fn interpolate_only(
    input_string: Option<&str>,
    inputs: &HashMap<String, String>,
) -> Result<String, String> {
    let input = match input_string {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(String::new()),
    };

    if let Some(missing) = VARIABLE_PATTERN
        .captures_iter(input)
        .map(|cap| cap[1].to_string())
        .find(|var| !inputs.contains_key(var))
    {
        return Err(format!(
            "Template variable '{}' not found in inputs dictionary",
            missing
        ));
    }

    Ok(VARIABLE_PATTERN
        .replace_all(input, |cap: &Captures| inputs[&cap[1]].clone())
        .into_owned())
}
