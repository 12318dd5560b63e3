//! Validating-schema emitter: Zod-style runtime schemas.
//!
//! Property keys are emitted exactly as they appear in the sample — never
//! camelized — because the schema must validate unmodified input.

use crate::emit::{discover_objects, is_identifier};
use crate::ir::{InferredType, Primitive, PropertyInfo};
use crate::settings::Settings;

pub fn emit(root: &InferredType, settings: &Settings) -> String {
    let objects = discover_objects(root);
    let mut blocks: Vec<String> = objects
        .iter()
        .rev()
        .map(|obj| declaration(obj, settings))
        .collect();

    if !root.is_object() {
        blocks.push(format!(
            "const {} = {};\n",
            settings.root_type_name,
            reference(root, settings)
        ));
    }

    blocks.join("\n")
}

fn declaration(obj: &InferredType, settings: &Settings) -> String {
    let InferredType::Object { type_name, .. } = obj else {
        unreachable!("discovery collects only objects");
    };
    format!("const {type_name} = {};\n", object_literal(obj, settings))
}

fn object_literal(obj: &InferredType, settings: &Settings) -> String {
    let InferredType::Object { properties, .. } = obj else {
        unreachable!();
    };
    if properties.is_empty() {
        return with_strict("z.object({})".to_string(), settings);
    }
    let mut out = String::from("z.object({\n");
    for (key, prop) in properties {
        let rendered_key = if is_identifier(key) { key.clone() } else { format!("{key:?}") };
        out.push_str(&format!("  {rendered_key}: {},\n", property_schema(prop, settings)));
    }
    out.push_str("})");
    with_strict(out, settings)
}

fn with_strict(schema: String, settings: &Settings) -> String {
    if settings.strict_objects {
        format!("{schema}.strict()")
    } else {
        schema
    }
}

fn property_schema(prop: &PropertyInfo, settings: &Settings) -> String {
    let mut schema = reference(&prop.ty, settings);
    if prop.nullable && !matches!(prop.ty, InferredType::Primitive(Primitive::Null)) {
        schema.push_str(".nullable()");
    }
    if prop.optional {
        schema.push_str(".optional()");
    }
    schema
}

fn reference(ty: &InferredType, settings: &Settings) -> String {
    match ty {
        InferredType::Primitive(Primitive::String) => "z.string()".to_string(),
        InferredType::Primitive(Primitive::Number) => "z.number()".to_string(),
        InferredType::Primitive(Primitive::Boolean) => "z.boolean()".to_string(),
        InferredType::Primitive(Primitive::Null) => "z.null()".to_string(),
        InferredType::DateString => {
            if settings.detect_dates {
                "z.string().datetime()".to_string()
            } else {
                "z.string()".to_string()
            }
        }
        InferredType::Unknown => "z.unknown()".to_string(),
        InferredType::Array(element) => format!("z.array({})", reference(element, settings)),
        InferredType::Union(variants) => {
            let rendered: Vec<String> =
                variants.iter().map(|v| reference(v, settings)).collect();
            format!("z.union([{}])", rendered.join(", "))
        }
        InferredType::Object { type_name, .. } => type_name.clone(),
    }
}
