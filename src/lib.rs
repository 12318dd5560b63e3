//! Infer a structural schema from example JSON and render it three ways from
//! one shared IR: type declarations, a runtime-validating schema, and a
//! representative example value.
//!
//! Pipeline: parse → infer → merge/normalize → name → emit. Inference and
//! merging are pure and single-threaded; every piece of traversal state (the
//! name allocator included) is scoped to one inference call.

pub mod cli;
pub mod emit;
pub mod infer;
pub mod ir;
pub mod merge;
pub mod names;
pub mod parse;
pub mod pipeline;
pub mod settings;

pub use infer::{infer, infer_many};
pub use ir::{Diagnostic, InferResult, InferredType, Level, Primitive, PropertyInfo};
pub use pipeline::{
    run, EmitKind, Formatter, PassthroughFormatter, PipelineError, PipelineOutput, RunSequence,
};
pub use settings::{OutputStyle, Settings};
