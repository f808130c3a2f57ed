//! Recovery of the JSON report embedded in free-form model output
//!
//! Replies often wrap the object in prose or markdown fences. The scanner
//! below walks the text tracking brace depth and string literals, so braces
//! inside JSON strings and unrelated `{...}` fragments in the prose are
//! handled without a regular expression.

use log::{debug, warn};
use serde_json::Value;

use super::report::AnalysisReport;
use crate::error::{AuditError, Result};

/// End offset (exclusive) of the balanced object starting at `start`, if any
///
/// `text[start]` must be `{`. Braces inside string literals are ignored and
/// backslash escapes inside strings are honoured.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Iterates over the balanced `{...}` candidates of `text`, left to right
///
/// After a candidate is yielded the search resumes past its end, so nested
/// objects of a rejected candidate are never offered on their own.
struct Candidates<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Candidates<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for Candidates<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while let Some(found) = self.text[self.pos..].find('{') {
            let start = self.pos + found;
            match balanced_end(self.text, start) {
                Some(end) => {
                    self.pos = end;
                    return Some(&self.text[start..end]);
                }
                // unterminated; an inner `{` may still close
                None => self.pos = start + 1,
            }
        }
        None
    }
}

/// The first balanced `{...}` span of `text`, ignoring braces in strings
pub fn find_json_span(text: &str) -> Option<&str> {
    Candidates::new(text).next()
}

/// Locates and decodes the JSON object embedded in `raw`
///
/// The first candidate carrying a `vulnerabilities` array wins; failing that,
/// the first candidate that decodes at all. `file` only labels errors and log
/// lines.
pub fn recover(raw: &str, file: &str) -> Result<Value> {
    let mut first_error: Option<(String, &str)> = None;
    let mut first_decoded: Option<Value> = None;

    for candidate in Candidates::new(raw) {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) if has_report_shape(&value) => return Ok(value),
            Ok(value) => {
                debug!("Passing over JSON candidate without a report for {}", file);
                first_decoded.get_or_insert(value);
            }
            Err(e) => {
                debug!("Rejected JSON candidate for {}: {}", file, e);
                if first_error.is_none() {
                    first_error = Some((e.to_string(), candidate));
                }
            }
        }
    }

    if let Some(value) = first_decoded {
        return Ok(value);
    }

    let (message, candidate) = match first_error {
        Some(found) => found,
        None => match raw.find('{') {
            // only unterminated objects; the decoder explains what is missing
            Some(start) => {
                let tail = &raw[start..];
                let message = serde_json::from_str::<Value>(tail)
                    .err()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unterminated JSON object".to_string());
                (message, tail)
            }
            None => {
                warn!("No valid JSON found in response for {}", file);
                debug!("Raw response: {}", raw);
                return Err(AuditError::NoJsonFound(file.to_string()));
            }
        },
    };

    warn!("JSON decode error for {}: {}", file, message);
    debug!("Extracted JSON content: {}", candidate);
    debug!("Raw response: {}", raw);
    Err(AuditError::InvalidJson {
        file: file.to_string(),
        message,
    })
}

/// Recovers the reply and checks it has the `{"vulnerabilities": [...]}` shape
pub fn recover_report(raw: &str, file: &str) -> Result<AnalysisReport> {
    let value = recover(raw, file)?;

    if !has_report_shape(&value) {
        let message = match &value {
            Value::Object(_) => "missing \"vulnerabilities\" array".to_string(),
            other => format!("expected an object, got {}", kind(other)),
        };
        warn!("Unexpected report shape for {}: {}", file, message);
        return Err(AuditError::UnexpectedShape {
            file: file.to_string(),
            message,
        });
    }

    serde_json::from_value(value).map_err(|e| AuditError::UnexpectedShape {
        file: file.to_string(),
        message: e.to_string(),
    })
}

fn has_report_shape(value: &Value) -> bool {
    value
        .get("vulnerabilities")
        .map(Value::is_array)
        .unwrap_or(false)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
