// Strongly-typed IR shared by inference, merging, and all three emitters.
// No serde_json::Value past this point.

use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InferredType {
    Primitive(Primitive),
    DateString,              // ISO-8601 string (opt-in detection)
    Unknown,                 // shape could not be determined
    Array(Box<InferredType>),
    Object {
        properties: IndexMap<String, PropertyInfo>,
        type_name: String,   // unique within one inference run
    },
    Union(Vec<InferredType>), // flat, pairwise structurally distinct
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    pub ty: InferredType,
    pub optional: bool, // key absent from at least one sibling sample
    pub nullable: bool, // value observed as literal null at least once
}

impl PropertyInfo {
    pub fn required(ty: InferredType) -> Self {
        Self { ty, optional: false, nullable: false }
    }
}

impl InferredType {
    /// Structural equality: same shape, ignoring `Object` type names and each
    /// property's optional/nullable flags. `Union` comparison is
    /// order-sensitive; callers must canonicalize first.
    pub fn same_shape(&self, other: &InferredType) -> bool {
        use InferredType::*;
        match (self, other) {
            (Primitive(a), Primitive(b)) => a == b,
            (DateString, DateString) => true,
            (Unknown, Unknown) => true,
            (Array(a), Array(b)) => a.same_shape(b),
            (Union(a), Union(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
            }
            (
                Object { properties: a, .. },
                Object { properties: b, .. },
            ) => {
                a.len() == b.len()
                    && a.iter().all(|(k, pa)| {
                        b.get(k).is_some_and(|pb| pa.ty.same_shape(&pb.ty))
                    })
            }
            _ => false,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, InferredType::Object { .. })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DIAGNOSTICS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
    Info,
}

/// A pure observation attached to a structural path; never control flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    /// Dotted/bracketed path (`user.addresses[0].zip`), empty for root scope.
    pub path: String,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self { level: Level::Error, message: message.into(), path: path.into() }
    }
    pub fn warning(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self { level: Level::Warning, message: message.into(), path: path.into() }
    }
    pub fn info(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self { level: Level::Info, message: message.into(), path: path.into() }
    }
}

#[derive(Debug, Clone)]
pub struct InferResult {
    pub ty: InferredType,
    pub diagnostics: Vec<Diagnostic>,
    /// Every key visited across every object encountered, merged duplicates
    /// across array elements counted individually.
    pub field_count: usize,
}

impl InferResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == Level::Error)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
