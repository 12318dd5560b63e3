//! Emitters: three independent consumers of the same finished IR.
//!
//! They share one discovery pass (depth-first, first-visit collection of every
//! `Object` node) and emit declarations in reverse discovery order, so every
//! named reference is declared before its first use and no forward-reference
//! resolution is needed downstream.

pub mod example;
pub mod typescript;
pub mod zod;

use crate::ir::InferredType;

/// Collect every `Object` node reachable from `root` in depth-first
/// first-visit order (the root itself first, if it is one).
pub fn discover_objects(root: &InferredType) -> Vec<&InferredType> {
    let mut found = Vec::new();
    visit(root, &mut found);
    found
}

fn visit<'a>(ty: &'a InferredType, found: &mut Vec<&'a InferredType>) {
    match ty {
        InferredType::Object { properties, .. } => {
            found.push(ty);
            for prop in properties.values() {
                visit(&prop.ty, found);
            }
        }
        InferredType::Array(element) => visit(element, found),
        InferredType::Union(variants) => {
            for v in variants {
                visit(v, found);
            }
        }
        InferredType::Primitive(_) | InferredType::DateString | InferredType::Unknown => {}
    }
}

/// True if `key` can be written bare in JS/TS property position.
pub fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// `user_name` → `userName`. Keys without underscores pass through untouched,
/// and sigil underscores at either end survive (`_private` stays `_private`).
pub fn snake_to_camel(key: &str) -> String {
    if !key.contains('_') {
        return key.to_string();
    }
    let start = key.len() - key.trim_start_matches('_').len();
    let end = key.trim_end_matches('_').len();
    if start >= end {
        return key.to_string(); // nothing but underscores
    }
    let mut parts = key[start..end].split('_').filter(|p| !p.is_empty());
    let mut out = String::with_capacity(key.len());
    out.push_str(&key[..start]);
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    for part in parts {
        let mut chars = part.chars();
        if let Some(c) = chars.next() {
            out.extend(c.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out.push_str(&key[end..]);
    out
}

/// Rendered property key plus the original it was rewritten from, if the
/// camelCase setting changed it.
pub struct FieldKey {
    pub rendered: String,
    pub rewritten_from: Option<String>,
}

pub fn field_key(key: &str, camel: bool) -> FieldKey {
    if camel {
        let rewritten = snake_to_camel(key);
        if rewritten != key && is_identifier(&rewritten) {
            return FieldKey { rendered: rewritten, rewritten_from: Some(key.to_string()) };
        }
    }
    let rendered = if is_identifier(key) {
        key.to_string()
    } else {
        format!("{:?}", key) // JSON-style quoting
    };
    FieldKey { rendered, rewritten_from: None }
}
