//! Declaration emitter: TypeScript-style type declarations.
//!
//! Dates are a validation concern, not a structural one, so `DateString`
//! renders as plain `string` here regardless of settings.

use crate::emit::{discover_objects, field_key};
use crate::ir::{InferredType, Primitive, PropertyInfo};
use crate::settings::{OutputStyle, Settings};

pub fn emit(root: &InferredType, settings: &Settings) -> String {
    let objects = discover_objects(root);
    let mut blocks: Vec<String> = objects
        .iter()
        .rev()
        .map(|obj| declaration(obj, settings))
        .collect();

    // a non-object root still needs an outermost declaration; interfaces
    // cannot alias arrays or unions, so this is always an alias
    if !root.is_object() {
        blocks.push(format!(
            "type {} = {};\n",
            settings.root_type_name,
            reference(root)
        ));
    }

    blocks.join("\n")
}

fn declaration(obj: &InferredType, settings: &Settings) -> String {
    let InferredType::Object { properties, type_name } = obj else {
        unreachable!("discovery collects only objects");
    };

    let mut out = String::new();
    match settings.output_style {
        OutputStyle::Type => out.push_str(&format!("type {type_name} = {{\n")),
        OutputStyle::Interface => out.push_str(&format!("interface {type_name} {{\n")),
    }
    for (key, prop) in properties {
        out.push_str(&property_line(key, prop, settings));
    }
    match settings.output_style {
        OutputStyle::Type => out.push_str("};\n"),
        OutputStyle::Interface => out.push_str("}\n"),
    }
    out
}

fn property_line(key: &str, prop: &PropertyInfo, settings: &Settings) -> String {
    let name = field_key(key, settings.snake_to_camel);
    let marker = if prop.optional { "?" } else { "" };
    let mut ty = reference(&prop.ty);
    if prop.nullable && !matches!(prop.ty, InferredType::Primitive(Primitive::Null)) {
        ty.push_str(" | null");
    }
    match name.rewritten_from {
        Some(original) => format!("  {}{marker}: {ty}; // \"{original}\"\n", name.rendered),
        None => format!("  {}{marker}: {ty};\n", name.rendered),
    }
}

/// A use-site rendering of a type: primitives by keyword, objects by name.
pub fn reference(ty: &InferredType) -> String {
    match ty {
        InferredType::Primitive(Primitive::String) => "string".to_string(),
        InferredType::Primitive(Primitive::Number) => "number".to_string(),
        InferredType::Primitive(Primitive::Boolean) => "boolean".to_string(),
        InferredType::Primitive(Primitive::Null) => "null".to_string(),
        InferredType::DateString => "string".to_string(),
        InferredType::Unknown => "unknown".to_string(),
        InferredType::Array(element) => {
            if matches!(element.as_ref(), InferredType::Union(_)) {
                format!("({})[]", reference(element))
            } else {
                format!("{}[]", reference(element))
            }
        }
        InferredType::Union(variants) => variants
            .iter()
            .map(reference)
            .collect::<Vec<_>>()
            .join(" | "),
        InferredType::Object { type_name, .. } => type_name.clone(),
    }
}
