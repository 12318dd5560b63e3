//! Inference engine: walk a sample value, produce an IR tree plus diagnostics
//! and a field count.
//!
//! Deterministic: the same value and settings always produce the same IR,
//! diagnostics, and type names. All traversal state (name allocator, path
//! segments, counters) lives in a per-run context created at the top of each
//! call; nothing is process-wide.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::ir::{Diagnostic, InferResult, InferredType, Primitive, PropertyInfo};
use crate::merge::{merge_objects, merge_types};
use crate::names::NameAllocator;
use crate::settings::Settings;

/// Full date, optional time-of-day with optional seconds/fraction, optional
/// `Z` or numeric offset.
static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(?:[Tt]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:[Zz]|[+-]\d{2}:?\d{2})?)?$")
        .expect("date pattern is valid")
});

pub fn is_iso_date(s: &str) -> bool {
    ISO_DATE.is_match(s)
}

/// Infer the structural type of one sample value.
///
/// A root whose outermost shape is not an object or array yields an
/// error-level diagnostic alongside a best-effort IR; callers must treat that
/// as a failed inference.
pub fn infer(value: &Value, settings: &Settings) -> InferResult {
    let mut run = Run::new(settings);
    if !matches!(value, Value::Object(_) | Value::Array(_)) {
        run.diagnostics
            .push(Diagnostic::error("root value must be an object or array", ""));
    }
    let ty = run.value(value, &Path::root(), Naming::Named);
    run.finish(ty)
}

/// Infer across several top-level sample documents, merging them as if they
/// were sibling elements of one collection: all-object documents merge into a
/// single object named `root_type_name`, anything else union-merges.
///
/// A single document behaves exactly like [`infer`].
pub fn infer_many(values: &[Value], settings: &Settings) -> InferResult {
    match values {
        [] => {
            let mut run = Run::new(settings);
            run.diagnostics.push(Diagnostic::error("no input documents", ""));
            run.finish(InferredType::Unknown)
        }
        [single] => infer(single, settings),
        many => {
            let mut run = Run::new(settings);
            for (i, doc) in many.iter().enumerate() {
                if !matches!(doc, Value::Object(_) | Value::Array(_)) {
                    run.diagnostics.push(Diagnostic::error(
                        "root value must be an object or array",
                        Path::root().index(i).to_string(),
                    ));
                }
            }
            let elements: Vec<InferredType> = many
                .iter()
                .enumerate()
                .map(|(i, doc)| run.value(doc, &Path::root().index(i), Naming::Deferred))
                .collect();
            let ty = run.merge_siblings(elements, &Path::root(), SiblingName::Root);
            run.finish(ty)
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PER-RUN CONTEXT
// ————————————————————————————————————————————————————————————————————————————

/// Whether the object rule should allocate a type name itself, or leave it to
/// the enclosing array merge (sibling elements share one `parent.item` name).
#[derive(Clone, Copy, PartialEq)]
enum Naming {
    Named,
    Deferred,
}

enum SiblingName {
    /// Merged top-level documents take the root type name.
    Root,
    /// Merged array elements take a name allocated at `parent.item`.
    Item,
}

struct Run<'s> {
    settings: &'s Settings,
    names: NameAllocator,
    diagnostics: Vec<Diagnostic>,
    field_count: usize,
    /// Structural name path: object keys only, array indices contribute
    /// nothing. Feeds the allocator.
    segments: Vec<String>,
    /// The outermost identifier, reserved up front so a nested object whose
    /// key capitalizes to the same base can never collide with it (emitters
    /// use it for the root declaration even when the root is not an object).
    root_name: Option<String>,
}

impl<'s> Run<'s> {
    fn new(settings: &'s Settings) -> Self {
        let mut names = NameAllocator::new(settings.root_type_name.clone());
        let root_name = names.allocate(&[]);
        Self {
            settings,
            names,
            diagnostics: Vec::new(),
            field_count: 0,
            segments: Vec::new(),
            root_name: Some(root_name),
        }
    }

    fn finish(self, ty: InferredType) -> InferResult {
        InferResult { ty, diagnostics: self.diagnostics, field_count: self.field_count }
    }

    fn value(&mut self, v: &Value, path: &Path, naming: Naming) -> InferredType {
        match v {
            Value::Null => InferredType::Primitive(Primitive::Null),
            Value::Bool(_) => InferredType::Primitive(Primitive::Boolean),
            Value::Number(_) => InferredType::Primitive(Primitive::Number),
            Value::String(s) => {
                if self.settings.detect_dates && is_iso_date(s) {
                    self.diagnostics.push(Diagnostic::info(
                        "recognized ISO-8601 date string",
                        path.to_string(),
                    ));
                    InferredType::DateString
                } else {
                    InferredType::Primitive(Primitive::String)
                }
            }
            Value::Array(xs) => self.array(xs, path),
            Value::Object(map) => self.object(map, path, naming),
        }
    }

    fn array(&mut self, xs: &[Value], path: &Path) -> InferredType {
        if xs.is_empty() {
            self.diagnostics.push(Diagnostic::warning(
                "empty array, defaulting to unknown element type",
                path.to_string(),
            ));
            return InferredType::Array(Box::new(InferredType::Unknown));
        }

        let elements: Vec<InferredType> = xs
            .iter()
            .enumerate()
            .map(|(i, el)| self.value(el, &path.index(i), Naming::Deferred))
            .collect();

        let element = self.merge_siblings(elements, path, SiblingName::Item);
        InferredType::Array(Box::new(element))
    }

    /// Array rule, shared with multi-document inference: merge all object
    /// siblings into one named object, union-merge everything else, warn on
    /// mixed element types.
    fn merge_siblings(
        &mut self,
        elements: Vec<InferredType>,
        path: &Path,
        name: SiblingName,
    ) -> InferredType {
        let (objects, others): (Vec<InferredType>, Vec<InferredType>) =
            elements.into_iter().partition(InferredType::is_object);

        if others.is_empty() {
            let type_name = self.sibling_name(name);
            return merge_objects(take_properties(objects), type_name);
        }

        if objects.is_empty() {
            let merged = merge_types(others);
            if matches!(merged, InferredType::Union(_)) {
                self.diagnostics
                    .push(Diagnostic::warning("mixed element types", path.to_string()));
            }
            return merged;
        }

        self.diagnostics.push(Diagnostic::warning(
            "mixed element types (objects and primitives)",
            path.to_string(),
        ));
        let type_name = self.sibling_name(name);
        let merged_object = merge_objects(take_properties(objects), type_name);
        let mut variants = vec![merged_object];
        variants.extend(others);
        merge_types(variants)
    }

    fn sibling_name(&mut self, name: SiblingName) -> String {
        match name {
            SiblingName::Root => self.allocate(),
            SiblingName::Item => {
                self.segments.push("item".to_string());
                let type_name = self.allocate();
                self.segments.pop();
                type_name
            }
        }
    }

    fn object(
        &mut self,
        map: &serde_json::Map<String, Value>,
        path: &Path,
        naming: Naming,
    ) -> InferredType {
        // Allocate before descending so parents precede children in counter
        // order. Deferred elements are named by the enclosing merge instead.
        let type_name = match naming {
            Naming::Named => self.allocate(),
            Naming::Deferred => String::new(),
        };

        let mut properties = indexmap::IndexMap::with_capacity(map.len());
        for (key, value) in map {
            self.field_count += 1;
            if value.is_null() {
                // at the property level, a literal null is an observation of
                // nullability, never a type variant
                properties.insert(
                    key.clone(),
                    PropertyInfo { ty: InferredType::Unknown, optional: false, nullable: true },
                );
                continue;
            }
            self.segments.push(key.clone());
            let ty = self.value(value, &path.key(key), Naming::Named);
            self.segments.pop();
            properties.insert(key.clone(), PropertyInfo::required(ty));
        }
        InferredType::Object { properties, type_name }
    }

    fn allocate(&mut self) -> String {
        if self.segments.is_empty() {
            if let Some(reserved) = self.root_name.take() {
                return reserved;
            }
        }
        let segments: Vec<&str> = self.segments.iter().map(String::as_str).collect();
        self.names.allocate(&segments)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// STRUCTURAL PATHS
// ————————————————————————————————————————————————————————————————————————————

/// Dotted/bracketed position of a value in the original sample, for
/// diagnostics (`user.addresses[0].zip`). Root is the empty path.
#[derive(Debug, Clone)]
pub struct Path(String);

impl Path {
    pub fn root() -> Self {
        Path(String::new())
    }

    pub fn key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Path(key.to_string())
        } else {
            Path(format!("{}.{key}", self.0))
        }
    }

    pub fn index(&self, i: usize) -> Self {
        Path(format!("{}[{i}]", self.0))
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn take_properties(
    objects: Vec<InferredType>,
) -> Vec<indexmap::IndexMap<String, PropertyInfo>> {
    objects
        .into_iter()
        .filter_map(|ty| match ty {
            InferredType::Object { properties, .. } => Some(properties),
            _ => None,
        })
        .collect()
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Level;
    use serde_json::json;

    fn infer_default(v: &Value) -> InferResult {
        infer(v, &Settings::default())
    }

    fn expect_object(ty: &InferredType) -> &indexmap::IndexMap<String, PropertyInfo> {
        match ty {
            InferredType::Object { properties, .. } => properties,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn flat_object_of_primitives() {
        // Scenario A
        let v = json!({"name": "Alice", "age": 30});
        let result = infer_default(&v);
        assert!(!result.has_errors());
        assert_eq!(result.field_count, 2);
        let props = expect_object(&result.ty);
        assert_eq!(props["name"].ty, InferredType::Primitive(Primitive::String));
        assert_eq!(props["age"].ty, InferredType::Primitive(Primitive::Number));
    }

    #[test]
    fn array_of_objects_merges_with_optionality() {
        // Scenario B
        let v = json!([
            {"id": 1, "name": "Alice", "phone": "555-0100"},
            {"id": 2, "name": "Bob"},
            {"id": 3, "name": "Charlie", "phone": "555-0300"}
        ]);
        let result = infer_default(&v);
        let InferredType::Array(element) = &result.ty else { panic!("expected array") };
        let props = expect_object(element);
        assert!(!props["id"].optional);
        assert!(!props["name"].optional);
        assert!(props["phone"].optional);
        assert_eq!(props["phone"].ty, InferredType::Primitive(Primitive::String));
        // 3 + 2 + 3 keys visited, merged duplicates counted individually
        assert_eq!(result.field_count, 8);
    }

    #[test]
    fn empty_array_defaults_to_unknown_with_warning() {
        // Scenario C
        let v = json!({"items": []});
        let result = infer_default(&v);
        let props = expect_object(&result.ty);
        assert_eq!(
            props["items"].ty,
            InferredType::Array(Box::new(InferredType::Unknown))
        );
        assert!(result.diagnostics.iter().any(|d| {
            d.level == Level::Warning && d.message.contains("empty array") && d.path == "items"
        }));
    }

    #[test]
    fn mixed_primitive_array_becomes_union_with_warning() {
        // Scenario D
        let v = json!({"values": [1, "two", true]});
        let result = infer_default(&v);
        let props = expect_object(&result.ty);
        assert_eq!(
            props["values"].ty,
            InferredType::Array(Box::new(InferredType::Union(vec![
                InferredType::Primitive(Primitive::Number),
                InferredType::Primitive(Primitive::String),
                InferredType::Primitive(Primitive::Boolean),
            ])))
        );
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.level == Level::Warning && d.message.contains("mixed")));
    }

    #[test]
    fn date_detection_is_opt_in() {
        // Scenario E
        let v = json!({"createdAt": "2025-01-15T09:30:00.000Z"});

        let off = infer_default(&v);
        let props = expect_object(&off.ty);
        assert_eq!(props["createdAt"].ty, InferredType::Primitive(Primitive::String));

        let settings = Settings { detect_dates: true, ..Settings::default() };
        let on = infer(&v, &settings);
        let props = expect_object(&on.ty);
        assert_eq!(props["createdAt"].ty, InferredType::DateString);
        assert!(on.diagnostics.iter().any(|d| {
            d.level == Level::Info && d.path == "createdAt" && d.message.contains("date")
        }));
    }

    #[test]
    fn date_pattern_accepts_iso_shapes_and_rejects_near_misses() {
        for ok in [
            "2025-01-15",
            "2025-01-15T09:30",
            "2025-01-15T09:30:00",
            "2025-01-15T09:30:00.000Z",
            "2025-01-15T09:30:00+02:00",
            "2025-01-15T09:30:00-0700",
        ] {
            assert!(is_iso_date(ok), "should accept {ok}");
        }
        for bad in ["2025-1-15", "20250115", "2025-01-15 09:30", "not a date", "555-0100"] {
            assert!(!is_iso_date(bad), "should reject {bad}");
        }
    }

    #[test]
    fn non_container_root_errors_but_returns_best_effort_ir() {
        let v = json!("just a string");
        let result = infer_default(&v);
        assert!(result.has_errors());
        assert_eq!(result.ty, InferredType::Primitive(Primitive::String));
    }

    #[test]
    fn null_property_is_nullable_unknown_not_a_null_type() {
        let v = json!({"gone": null});
        let result = infer_default(&v);
        let props = expect_object(&result.ty);
        assert_eq!(props["gone"].ty, InferredType::Unknown);
        assert!(props["gone"].nullable);
        assert!(!props["gone"].optional);
        assert_eq!(result.field_count, 1);
    }

    #[test]
    fn null_inside_primitive_array_stays_a_union_variant() {
        // the documented position asymmetry: [1, null, "x"] keeps a null
        // variant, while {"k": null} folds into the nullable flag
        let v = json!({"xs": [1, null, "x"]});
        let result = infer_default(&v);
        let props = expect_object(&result.ty);
        assert_eq!(
            props["xs"].ty,
            InferredType::Array(Box::new(InferredType::Union(vec![
                InferredType::Primitive(Primitive::Number),
                InferredType::Primitive(Primitive::Null),
                InferredType::Primitive(Primitive::String),
            ])))
        );
    }

    #[test]
    fn nested_objects_get_path_derived_names() {
        let v = json!({"user": {"shipping_address": {"zip": "12345"}}});
        let result = infer_default(&v);
        let root = expect_object(&result.ty);
        let InferredType::Object { type_name, properties } = &root["user"].ty else {
            panic!("expected object");
        };
        assert_eq!(type_name, "User");
        let InferredType::Object { type_name, .. } = &properties["shipping_address"].ty else {
            panic!("expected object");
        };
        assert_eq!(type_name, "UserShippingAddress");
    }

    #[test]
    fn merged_array_elements_share_one_item_name() {
        let v = json!({"addresses": [{"zip": "1"}, {"zip": "2"}]});
        let result = infer_default(&v);
        let props = expect_object(&result.ty);
        let InferredType::Array(element) = &props["addresses"].ty else {
            panic!("expected array");
        };
        let InferredType::Object { type_name, .. } = element.as_ref() else {
            panic!("expected object");
        };
        assert_eq!(type_name, "AddressesItem");
    }

    #[test]
    fn root_name_is_reserved_even_when_the_root_is_not_an_object() {
        // a nested key that capitalizes to the root identifier must not take
        // it; the emitters need it free for the outermost declaration
        let v = json!([{"root": {"a": 1}}]);
        let result = infer_default(&v);
        let InferredType::Array(element) = &result.ty else { panic!("expected array") };
        let props = expect_object(element);
        let InferredType::Object { type_name, .. } = &props["root"].ty else {
            panic!("expected object");
        };
        assert_eq!(type_name, "Root2");
    }

    #[test]
    fn root_object_takes_the_configured_root_name() {
        let settings = Settings { root_type_name: "ApiPayload".to_string(), ..Settings::default() };
        let v = json!({"x": 1});
        let result = infer(&v, &settings);
        let InferredType::Object { type_name, .. } = &result.ty else { panic!() };
        assert_eq!(type_name, "ApiPayload");
    }

    #[test]
    fn mixed_objects_and_primitives_in_array() {
        let v = json!([{"id": 1}, "stray"]);
        let result = infer_default(&v);
        let InferredType::Array(element) = &result.ty else { panic!("expected array") };
        let InferredType::Union(variants) = element.as_ref() else { panic!("expected union") };
        assert_eq!(variants.len(), 2);
        assert!(variants[0].is_object());
        assert_eq!(variants[1], InferredType::Primitive(Primitive::String));
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.message.contains("objects and primitives")));
    }

    #[test]
    fn sibling_objects_with_equal_shape_deduplicate_in_unions() {
        // object structural equality ignores optional/nullable, so shapes
        // differing only in flags collapse to the first occurrence
        let v = json!({"slots": [[{"x": 1}], [{"x": 2}]]});
        let result = infer_default(&v);
        let props = expect_object(&result.ty);
        let InferredType::Array(outer) = &props["slots"].ty else { panic!() };
        // inner arrays are non-object elements of the outer array; equal
        // shapes merge to a single array type, not a union
        assert!(matches!(outer.as_ref(), InferredType::Array(_)));
    }

    #[test]
    fn determinism_same_input_same_run_twice() {
        let v = json!({"a": [{"b": [1, "x"]}, {"b": []}], "c": {"d": null}});
        let settings = Settings { detect_dates: true, ..Settings::default() };
        let one = infer(&v, &settings);
        let two = infer(&v, &settings);
        assert_eq!(one.ty, two.ty);
        assert_eq!(one.diagnostics, two.diagnostics);
        assert_eq!(one.field_count, two.field_count);
    }

    #[test]
    fn infer_many_merges_object_documents_under_the_root_name() {
        let docs = vec![json!({"id": 1, "name": "a"}), json!({"id": 2})];
        let result = infer_many(&docs, &Settings::default());
        let InferredType::Object { type_name, properties } = &result.ty else {
            panic!("expected object");
        };
        assert_eq!(type_name, "Root");
        assert!(!properties["id"].optional);
        assert!(properties["name"].optional);
    }

    #[test]
    fn infer_many_single_document_matches_infer() {
        let doc = json!({"x": [1, 2]});
        let a = infer(&doc, &Settings::default());
        let b = infer_many(std::slice::from_ref(&doc), &Settings::default());
        assert_eq!(a.ty, b.ty);
        assert_eq!(a.field_count, b.field_count);
    }

    #[test]
    fn infer_many_rejects_empty_input() {
        let result = infer_many(&[], &Settings::default());
        assert!(result.has_errors());
    }
}
