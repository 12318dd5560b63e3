//! Pipeline orchestration: parse → infer → emit all three text blocks.
//!
//! The driving application re-runs the whole pipeline on every input change
//! (after a debounce), so runs can overlap when formatting is slow.
//! [`RunSequence`] gives each run a monotonically increasing token; a run
//! commits its result only if its token is still current, and superseded
//! results are silently discarded — never surfaced as errors.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::emit::{example, typescript, zod};
use crate::infer::infer;
use crate::ir::{Diagnostic, InferResult};
use crate::parse::parse_source;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitKind {
    Declarations,
    Schema,
    Example,
}

/// Seam for the external pretty-printer collaborator. Failure is recovered
/// locally: the pipeline falls back to the unformatted text.
pub trait Formatter {
    fn format(&self, kind: EmitKind, text: &str) -> Result<String, FormatError>;
}

#[derive(Debug, Error)]
#[error("formatter failed: {0}")]
pub struct FormatError(pub String);

/// Formatter that returns its input unchanged.
pub struct PassthroughFormatter;

impl Formatter for PassthroughFormatter {
    fn format(&self, _kind: EmitKind, text: &str) -> Result<String, FormatError> {
        Ok(text.to_string())
    }
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub declarations: String,
    pub schema: String,
    pub example: String,
    pub inference: InferResult,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input was empty or whitespace-only; nothing to infer.
    #[error("input is empty")]
    EmptyInput,
    /// Malformed source text; no IR exists. Terminal for this run.
    #[error("input could not be parsed")]
    Parse { diagnostics: Vec<Diagnostic> },
    /// Root shape is not an object or array. A best-effort IR is attached,
    /// but the run must be treated as failed.
    #[error("root value must be an object or array")]
    UnsupportedRoot { result: InferResult },
}

/// Run the full pipeline over one source text.
///
/// Advisory diagnostics (empty arrays, mixed types, size notices, recognized
/// dates) never block generation; only a parse failure or an unsupported root
/// shape does.
pub fn run(
    source: &str,
    settings: &Settings,
    formatter: &dyn Formatter,
) -> Result<PipelineOutput, PipelineError> {
    let parsed = parse_source(source);
    let Some(value) = parsed.value else {
        if parsed.diagnostics.iter().any(|d| d.level == crate::ir::Level::Error) {
            return Err(PipelineError::Parse { diagnostics: parsed.diagnostics });
        }
        return Err(PipelineError::EmptyInput);
    };

    let mut inference = infer(&value, settings);
    // parse-stage advisories (size notice) lead the diagnostic list
    if !parsed.diagnostics.is_empty() {
        let mut diagnostics = parsed.diagnostics;
        diagnostics.append(&mut inference.diagnostics);
        inference.diagnostics = diagnostics;
    }
    if inference.has_errors() {
        return Err(PipelineError::UnsupportedRoot { result: inference });
    }

    let declarations = format_or_raw(formatter, EmitKind::Declarations,
        typescript::emit(&inference.ty, settings));
    let schema = format_or_raw(formatter, EmitKind::Schema, zod::emit(&inference.ty, settings));
    let example = format_or_raw(formatter, EmitKind::Example, example::emit(&inference.ty, settings));

    Ok(PipelineOutput { declarations, schema, example, inference })
}

fn format_or_raw(formatter: &dyn Formatter, kind: EmitKind, raw: String) -> String {
    match formatter.format(kind, &raw) {
        Ok(formatted) => formatted,
        Err(_) => raw,
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RUN SUPERSESSION
// ————————————————————————————————————————————————————————————————————————————

/// Monotonically increasing sequence token for overlapping pipeline runs.
///
/// There is no cancellation: an in-flight run always finishes, and the
/// discard decision is made purely at commit time.
#[derive(Debug, Default)]
pub struct RunSequence(AtomicU64);

impl RunSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, superseding every run begun earlier.
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commit a finished run's output: `Some` if the token is still current,
    /// `None` if a later run has begun in the meantime.
    pub fn commit<T>(&self, token: u64, output: T) -> Option<T> {
        if self.0.load(Ordering::SeqCst) == token {
            Some(output)
        } else {
            None
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
