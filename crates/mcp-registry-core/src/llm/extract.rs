//! JSON extraction from free-text model replies
//!
//! The reply is expected to contain one JSON object, possibly wrapped in
//! prose or a code fence. The object is located by scanning from the first
//! `{` to its matching `}`, tracking string literals so that braces inside
//! strings do not end the object early.

use serde_json::Value;
use thiserror::Error;

/// Line prefix the model uses to decline generating a spec
pub const FAILURE_MARKER: &str = "Failed to extract package spec";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("The URL does not appear to be a valid repository for an MCP server{}", reason_suffix(.0))]
    Refused(String),

    #[error(
        "Could not extract valid JSON from the LLM response. The model may not have generated a proper JSON structure."
    )]
    NoJsonFound,

    #[error("Invalid JSON in LLM response: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

fn reason_suffix(reason: &str) -> String {
    if reason.is_empty() {
        String::new()
    } else {
        format!(": {}", reason)
    }
}

/// Extract and parse the JSON object in a model reply
pub fn extract_json(reply: &str) -> Result<Value, ExtractError> {
    if let Some(reason) = refusal_reason(reply) {
        return Err(ExtractError::Refused(reason));
    }

    let candidate = find_json_object(reply).ok_or(ExtractError::NoJsonFound)?;
    Ok(serde_json::from_str(candidate)?)
}

/// Explanation following the failure marker, if the reply contains it
fn refusal_reason(reply: &str) -> Option<String> {
    let start = reply.find(FAILURE_MARKER)? + FAILURE_MARKER.len();
    let rest = &reply[start..];
    let line = rest.lines().next().unwrap_or("");
    Some(line.trim().trim_start_matches(':').trim().to_string())
}

/// Slice from the first `{` to its balancing `}`
fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}
