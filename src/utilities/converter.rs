//! Output converter: repairs raw LLM text into strict JSON.
//!
//! Generation calls tend to wrap JSON in markdown fences, leak control
//! characters, emit invalid escapes or leave trailing commas. The functions
//! here undo those specific defects before the text is handed to the schema
//! validator. None of them fail.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static OPENING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```[A-Za-z0-9_+\-]*").unwrap());
static INLINE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```json|```").unwrap());
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Characters that may legally follow a backslash inside a JSON string.
const JSON_ESCAPES: &[char] = &['\\', '/', '"', 'b', 'f', 'n', 'r', 't', 'u'];

const FENCE: &str = "```";

/// Strip markdown code fences around (and inside) the text.
///
/// An opening fence may carry a language tag (`json`, `JSON`, ...). Inline
/// ```` ```json ```` / ```` ``` ```` markers elsewhere are removed as well.
/// The result is trimmed.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();

    let text: Cow<'_, str> = if is_fenced(trimmed) {
        OPENING_FENCE.replace(&trimmed[..trimmed.len() - FENCE.len()], "")
    } else {
        Cow::Borrowed(trimmed)
    };

    INLINE_FENCE.replace_all(&text, "").trim().to_string()
}

/// Remove defects that make otherwise sensible text fail strict JSON parsing.
///
/// Runs, in order: non-printable character removal, invalid escape repair and
/// trailing comma removal.
pub fn sanitize_json_text(text: &str) -> String {
    let printable = strip_non_printable(text);
    let escaped = repair_invalid_escapes(&printable);
    remove_trailing_commas(&escaped)
}

/// The full repair pipeline: fence stripping followed by sanitization.
pub fn repair_json_text(raw: &str) -> String {
    sanitize_json_text(&strip_code_fences(raw))
}

/// Drop every non-printable character except newline, tab and carriage return.
pub fn strip_non_printable(text: &str) -> String {
    text.chars()
        .filter(|&c| matches!(c, '\n' | '\t' | '\r') || is_printable(c))
        .collect()
}

/// Double every backslash that does not start a legal JSON escape.
///
/// Each backslash is judged only by the character right after it, so in
/// `\\x` the second backslash is doubled even though the first one already
/// escaped it. A backslash at the very end of the text is doubled too.
pub fn repair_invalid_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        if c == '\\' {
            let legal = chars.peek().is_some_and(|next| JSON_ESCAPES.contains(next));
            if !legal {
                out.push('\\');
            }
        }
    }

    out
}

/// Collapse `,` + optional whitespace before `}` or `]` into the bracket.
pub fn remove_trailing_commas(text: &str) -> String {
    TRAILING_COMMA.replace_all(text, "$1").into_owned()
}

fn is_fenced(text: &str) -> bool {
    text.len() >= 2 * FENCE.len() && text.starts_with(FENCE) && text.ends_with(FENCE)
}

fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !(c.is_control() || c.is_whitespace() || is_format_char(c) || is_private_or_noncharacter(c))
}

// Unicode "Cf" format characters. Unassigned code points are not detected:
// there is no general-category table here, so they pass as printable.
fn is_format_char(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{0890}'..='\u{0891}'
            | '\u{08E2}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{110BD}'
            | '\u{110CD}'
            | '\u{13430}'..='\u{1343F}'
            | '\u{1BCA0}'..='\u{1BCA3}'
            | '\u{1D173}'..='\u{1D17A}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
    )
}

// Private use areas and the BMP noncharacters.
fn is_private_or_noncharacter(c: char) -> bool {
    matches!(
        c,
        '\u{E000}'..='\u{F8FF}'
            | '\u{F0000}'..='\u{FFFFD}'
            | '\u{100000}'..='\u{10FFFD}'
            | '\u{FFFE}'
            | '\u{FFFF}'
    )
}
