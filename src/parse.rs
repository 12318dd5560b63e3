//! Thin parser collaborator: source text in, value tree + diagnostics out.
//!
//! No inference logic lives here. Errors are reported as diagnostics with a
//! best-effort line/column location and JSON-path context
//! (`serde_path_to_error`); `value` is `None` exactly when parsing failed or
//! the input was empty/whitespace-only.

use serde_json::Value;

use crate::ir::Diagnostic;

/// Inputs past this many bytes get a performance advisory.
pub const SIZE_WARNING_BYTES: usize = 1024 * 1024;

#[derive(Debug)]
pub struct Parsed {
    pub value: Option<Value>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn parse_source(text: &str) -> Parsed {
    if text.trim().is_empty() {
        return Parsed { value: None, diagnostics: Vec::new() };
    }

    let mut diagnostics = Vec::new();
    if text.len() > SIZE_WARNING_BYTES {
        diagnostics.push(Diagnostic::warning(
            format!(
                "input is {} bytes (over {} KiB); inference may be slow",
                text.len(),
                SIZE_WARNING_BYTES / 1024
            ),
            "",
        ));
    }

    let mut de = serde_json::Deserializer::from_str(text);
    match serde_path_to_error::deserialize::<_, Value>(&mut de) {
        // a document followed by trailing content is still malformed source
        Ok(value) => match de.end() {
            Ok(()) => Parsed { value: Some(value), diagnostics },
            Err(err) => {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "syntax error at line {}, column {}: {err}",
                        err.line(),
                        err.column(),
                    ),
                    "",
                ));
                Parsed { value: None, diagnostics }
            }
        },
        Err(err) => {
            let path = err.path().to_string();
            let inner = err.into_inner();
            let message = format!(
                "syntax error at line {}, column {}: {inner} (at JSON path {path})",
                inner.line(),
                inner.column(),
            );
            diagnostics.push(Diagnostic::error(message, ""));
            Parsed { value: None, diagnostics }
        }
    }
}
