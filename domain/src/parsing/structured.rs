//! Tolerant recovery of JSON from model output.
//!
//! Generation is frequently decorated (markdown fences, prose preambles) or
//! cut off at the output token limit. [`parse_structured`] tries, in order:
//!
//! | # | Strategy | Recovers |
//! |---|----------|----------|
//! | 1 | strict parse | clean output |
//! | 2 | strip code fences | ```` ```json ```` wrappers |
//! | 3 | first `{` … last `}` | prose before/after the object |
//! | 4 | balance | truncated output (unclosed strings and brackets) |
//!
//! A final failure is always explicit; no default value is ever invented.

use crate::core::error::DomainError;
use crate::core::string::truncate;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Recover a JSON value from possibly truncated or decorated text.
pub fn parse_structured(text: &str) -> Result<Value, DomainError> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let unfenced = strip_code_fences(trimmed);
    if let Ok(value) = serde_json::from_str::<Value>(unfenced) {
        return Ok(value);
    }

    if let Some(start) = unfenced.find('{')
        && let Some(end) = unfenced.rfind('}')
        && end > start
        && let Ok(value) = serde_json::from_str::<Value>(&unfenced[start..=end])
    {
        return Ok(value);
    }

    if let Some(start) = unfenced.find(['{', '['])
        && let Ok(value) = serde_json::from_str::<Value>(&balance_json(&unfenced[start..]))
    {
        return Ok(value);
    }

    Err(DomainError::UnparsableOutput(truncate(trimmed, 200)))
}

/// [`parse_structured`] followed by typed deserialization.
pub fn parse_structured_as<T: DeserializeOwned>(text: &str) -> Result<T, DomainError> {
    let value = parse_structured(text)?;
    serde_json::from_value(value).map_err(|e| DomainError::UnparsableOutput(e.to_string()))
}

/// Remove a markdown code fence around the payload.
///
/// Handles a fence preceded by prose and a fence whose closing marker was
/// never emitted. Text without a fence is returned unchanged.
pub fn strip_code_fences(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };
    let after_marker = &text[open + 3..];
    // Skip the info string (e.g. `json`) up to the end of the line.
    let body = match after_marker.find('\n') {
        Some(newline) => &after_marker[newline + 1..],
        None => after_marker.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

/// Complete a truncated JSON skeleton.
///
/// Scans tracking string-literal state (with escapes) and a stack of open
/// `{`/`[`. At the end an open string literal is closed, a dangling `,` is
/// dropped, a dangling `:` gets `null`, and the missing closers are appended
/// innermost first.
pub fn balance_json(text: &str) -> String {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.last() == Some(&c) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    let mut out = text.trim_end().to_string();
    if in_string {
        if escaped {
            // A lone trailing backslash would escape the closing quote.
            out.pop();
        }
        out.push('"');
    } else {
        while out.ends_with(',') || out.ends_with(char::is_whitespace) {
            out.pop();
        }
        if out.ends_with(':') {
            out.push_str("null");
        }
    }

    while let Some(closer) = stack.pop() {
        out.push(closer);
    }
    out
}
