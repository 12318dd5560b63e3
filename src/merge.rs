//! Merge engine: combines IR trees from sibling array elements into one node.
//!
//! Two layers: `merge_types` (union-merge with flattening + structural
//! dedup) and `merge_objects` (key-union with optional/nullable accounting).
//! Both are pure; all state lives in the arguments.

use indexmap::IndexMap;

use crate::ir::{InferredType, Primitive, PropertyInfo};

/// Union-merge a list of types into one canonical type.
///
/// Nested unions are flattened transitively, duplicates are dropped by
/// structural equality (first occurrence wins), and `Unknown` is discarded
/// whenever a concrete shape survives alongside it. A single remaining type is
/// returned unwrapped, never as a singleton `Union`.
pub fn merge_types(types: Vec<InferredType>) -> InferredType {
    let mut flat = Vec::new();
    for ty in types {
        flatten_into(ty, &mut flat);
    }

    let mut distinct: Vec<InferredType> = Vec::new();
    for ty in flat {
        if !distinct.iter().any(|seen| seen.same_shape(&ty)) {
            distinct.push(ty);
        }
    }

    if distinct.len() > 1 && distinct.iter().any(|t| matches!(t, InferredType::Unknown)) {
        let concrete: Vec<InferredType> = distinct
            .iter()
            .filter(|t| !matches!(t, InferredType::Unknown))
            .cloned()
            .collect();
        if !concrete.is_empty() {
            distinct = concrete;
        }
    }

    match distinct.len() {
        0 => InferredType::Unknown,
        1 => distinct.remove(0),
        _ => InferredType::Union(distinct),
    }
}

fn flatten_into(ty: InferredType, out: &mut Vec<InferredType>) {
    match ty {
        InferredType::Union(variants) => {
            for v in variants {
                flatten_into(v, out);
            }
        }
        other => out.push(other),
    }
}

/// Merge sibling object samples that describe the same logical entity.
///
/// Computes the union of all keys; a key missing from some sample becomes
/// `optional`, a key observed as literal null becomes `nullable`. Per-key
/// types are union-merged, and a `null` primitive surfacing inside that union
/// is folded back into the `nullable` flag.
pub fn merge_objects(
    objects: Vec<IndexMap<String, PropertyInfo>>,
    type_name: String,
) -> InferredType {
    let total = objects.len();
    if total == 1 {
        let properties = objects.into_iter().next().unwrap_or_default();
        return InferredType::Object { properties, type_name };
    }

    // key union in first-seen order across all samples
    let mut keys: Vec<String> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.clone());
            }
        }
    }

    let mut properties = IndexMap::with_capacity(keys.len());
    for key in keys {
        let occurrences: Vec<&PropertyInfo> =
            objects.iter().filter_map(|obj| obj.get(&key)).collect();

        let optional = occurrences.len() < total;
        let mut nullable = occurrences.iter().any(|p| p.nullable);
        let merged = merge_types(occurrences.iter().map(|p| p.ty.clone()).collect());

        // a null variant inside the union is an observation of the literal
        // null value; fold it into the nullable flag instead
        let ty = match merged {
            InferredType::Union(variants) => {
                let had_null = variants
                    .iter()
                    .any(|v| matches!(v, InferredType::Primitive(Primitive::Null)));
                if had_null {
                    nullable = true;
                    let mut rest: Vec<InferredType> = variants
                        .into_iter()
                        .filter(|v| !matches!(v, InferredType::Primitive(Primitive::Null)))
                        .collect();
                    match rest.len() {
                        0 => InferredType::Primitive(Primitive::Null),
                        1 => rest.remove(0),
                        _ => InferredType::Union(rest),
                    }
                } else {
                    InferredType::Union(variants)
                }
            }
            other => other,
        };

        properties.insert(key, PropertyInfo { ty, optional, nullable });
    }

    InferredType::Object { properties, type_name }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    fn string() -> InferredType {
        InferredType::Primitive(Primitive::String)
    }
    fn number() -> InferredType {
        InferredType::Primitive(Primitive::Number)
    }
    fn boolean() -> InferredType {
        InferredType::Primitive(Primitive::Boolean)
    }
    fn null() -> InferredType {
        InferredType::Primitive(Primitive::Null)
    }

    #[test]
    fn distinct_types_become_a_union_in_first_seen_order() {
        let merged = merge_types(vec![number(), string(), boolean()]);
        assert_eq!(merged, InferredType::Union(vec![number(), string(), boolean()]));
    }

    #[test]
    fn equal_types_collapse_to_one_unwrapped_type() {
        let merged = merge_types(vec![string(), string(), string()]);
        assert_eq!(merged, string());
    }

    #[test]
    fn nested_unions_are_flattened_and_deduplicated() {
        let merged = merge_types(vec![
            InferredType::Union(vec![number(), string()]),
            InferredType::Union(vec![string(), boolean()]),
        ]);
        assert_eq!(merged, InferredType::Union(vec![number(), string(), boolean()]));
    }

    #[test]
    fn unknown_is_dropped_when_a_concrete_shape_remains() {
        let merged = merge_types(vec![InferredType::Unknown, number()]);
        assert_eq!(merged, number());
    }

    #[test]
    fn all_unknown_stays_unknown() {
        let merged = merge_types(vec![InferredType::Unknown, InferredType::Unknown]);
        assert_eq!(merged, InferredType::Unknown);
    }

    #[test]
    fn identical_objects_merge_with_nothing_optional() {
        let sample = indexmap! {
            "id".to_string() => PropertyInfo::required(number()),
            "name".to_string() => PropertyInfo::required(string()),
        };
        let merged = merge_objects(vec![sample.clone(), sample.clone(), sample], "Item".into());
        let InferredType::Object { properties, type_name } = merged else {
            panic!("expected object");
        };
        assert_eq!(type_name, "Item");
        assert!(properties.values().all(|p| !p.optional && !p.nullable));
    }

    #[test]
    fn key_missing_from_some_samples_becomes_optional() {
        let with_phone = indexmap! {
            "id".to_string() => PropertyInfo::required(number()),
            "phone".to_string() => PropertyInfo::required(string()),
        };
        let without_phone = indexmap! {
            "id".to_string() => PropertyInfo::required(number()),
        };
        let merged = merge_objects(vec![with_phone, without_phone], "Item".into());
        let InferredType::Object { properties, .. } = merged else {
            panic!("expected object");
        };
        assert!(!properties["id"].optional);
        assert!(properties["phone"].optional);
        assert_eq!(properties["phone"].ty, string());
    }

    #[test]
    fn null_union_variant_is_folded_into_the_nullable_flag() {
        let a = indexmap! {
            "x".to_string() => PropertyInfo::required(null()),
        };
        let b = indexmap! {
            "x".to_string() => PropertyInfo::required(string()),
        };
        let merged = merge_objects(vec![a, b], "Item".into());
        let InferredType::Object { properties, .. } = merged else {
            panic!("expected object");
        };
        let x = &properties["x"];
        assert!(x.nullable);
        assert_eq!(x.ty, string());
    }

    #[test]
    fn nullable_observations_survive_the_merge() {
        // element-level inference records literal null as Unknown + nullable;
        // merging against a concrete sibling recovers the concrete type
        let saw_null = indexmap! {
            "x".to_string() => PropertyInfo { ty: InferredType::Unknown, optional: false, nullable: true },
        };
        let saw_number = indexmap! {
            "x".to_string() => PropertyInfo::required(number()),
        };
        let merged = merge_objects(vec![saw_null, saw_number], "Item".into());
        let InferredType::Object { properties, .. } = merged else {
            panic!("expected object");
        };
        assert!(properties["x"].nullable);
        assert!(!properties["x"].optional);
        assert_eq!(properties["x"].ty, number());
    }

    #[test]
    fn single_object_passes_through_with_renaming_only() {
        let sample = indexmap! {
            "x".to_string() => PropertyInfo { ty: string(), optional: true, nullable: true },
        };
        let merged = merge_objects(vec![sample.clone()], "Renamed".into());
        assert_eq!(
            merged,
            InferredType::Object { properties: sample, type_name: "Renamed".into() }
        );
    }

    #[test]
    fn zero_objects_yield_an_empty_object() {
        let merged = merge_objects(vec![], "Empty".into());
        let InferredType::Object { properties, type_name } = merged else {
            panic!("expected object");
        };
        assert!(properties.is_empty());
        assert_eq!(type_name, "Empty");
    }
}
