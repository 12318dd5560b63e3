//! Example-value emitter: one representative value per shape, rendered as a
//! JS object literal so rewritten keys can carry their original-key
//! annotation in a trailing comment.

use crate::emit::field_key;
use crate::ir::{InferredType, Primitive, PropertyInfo};
use crate::settings::Settings;

/// Placeholder for recognized date strings.
pub const DATE_PLACEHOLDER: &str = "2024-01-01T00:00:00.000Z";

pub fn emit(root: &InferredType, settings: &Settings) -> String {
    let mut text = render(root, 0, settings);
    text.push('\n');
    text
}

fn render(ty: &InferredType, indent: usize, settings: &Settings) -> String {
    match ty {
        InferredType::Primitive(Primitive::String) => "\"\"".to_string(),
        InferredType::Primitive(Primitive::Number) => "0".to_string(),
        InferredType::Primitive(Primitive::Boolean) => "false".to_string(),
        InferredType::Primitive(Primitive::Null) => "null".to_string(),
        InferredType::Unknown => "undefined".to_string(),
        InferredType::DateString => format!("\"{DATE_PLACEHOLDER}\""),
        InferredType::Array(element) => {
            let inner = render(element, indent + 1, settings);
            if inner.contains('\n') {
                format!(
                    "[\n{pad}{inner}\n{close}]",
                    pad = "  ".repeat(indent + 1),
                    close = "  ".repeat(indent)
                )
            } else {
                format!("[{inner}]")
            }
        }
        InferredType::Union(variants) => {
            // first non-null variant, falling back to the first
            let pick = variants
                .iter()
                .find(|v| !matches!(v, InferredType::Primitive(Primitive::Null)))
                .or_else(|| variants.first());
            match pick {
                Some(v) => render(v, indent, settings),
                None => "undefined".to_string(),
            }
        }
        InferredType::Object { properties, .. } => render_object(properties, indent, settings),
    }
}

fn render_object(
    properties: &indexmap::IndexMap<String, PropertyInfo>,
    indent: usize,
    settings: &Settings,
) -> String {
    if properties.is_empty() {
        return "{}".to_string();
    }
    let pad = "  ".repeat(indent + 1);
    let mut out = String::from("{\n");
    let last = properties.len() - 1;
    for (i, (key, prop)) in properties.iter().enumerate() {
        let name = field_key(key, settings.snake_to_camel);
        let value = if prop.nullable {
            "null".to_string()
        } else {
            render(&prop.ty, indent + 1, settings)
        };
        let comma = if i == last { "" } else { "," };
        match name.rewritten_from {
            Some(original) => out.push_str(&format!(
                "{pad}{}: {value}{comma} // \"{original}\"\n",
                name.rendered
            )),
            None => out.push_str(&format!("{pad}{}: {value}{comma}\n", name.rendered)),
        }
    }
    out.push_str(&"  ".repeat(indent));
    out.push('}');
    out
}
