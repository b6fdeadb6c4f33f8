//! Schema inference: derive a named, typed Class Schema from example data.
//!
//! A single sample tree walks top-down; every object (and every object found
//! as the first element of an array) synthesizes a nested class, appended in
//! first-encounter order so traversal is depth-first and deterministic. Class
//! names are unique across the whole document: the same shape reappearing in
//! another branch reuses its first definition, and a different shape under a
//! colliding name gets a numeric suffix. Array element types are read from the
//! first element only — the canonical strategy here; heterogeneous tails are
//! deliberately ignored.

pub mod naming;

use indexmap::IndexMap;

use crate::value::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
    /// Unknown from the sample (null, or an empty array's element type).
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape {
    Scalar(ScalarKind),
    List(Box<FieldShape>),
    /// Resolves to exactly one class in the document: names are unique across
    /// every `nested` list, so the referent may live in a sibling branch when
    /// an identical shape was reused.
    ClassRef(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub source_key: String,
    pub generated_name: String,
    pub shape: FieldShape,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassSchema {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    /// Children-first emission order: everything here is fully defined before
    /// the declaring class references it.
    pub nested: Vec<ClassSchema>,
}

// ————————————————————————————————————————————————————————————————————————————
// INFERENCE
// ————————————————————————————————————————————————————————————————————————————

/// Infer a class schema from a sample value. Objects map directly; an array
/// whose first element is an object is treated as a list of the root class;
/// any other root gets a single-field wrapper class.
pub fn infer(value: &Value, root_name: &str) -> ClassSchema {
    let name = naming::class_name(root_name);
    let mut registry = NameRegistry::default();
    registry.reserve(&name);
    match value {
        Value::Object(m) => build_class_in(m, &name, &mut registry),
        Value::Array(xs) => match xs.first() {
            Some(Value::Object(m)) => build_class_in(m, &name, &mut registry),
            _ => wrapper_class(value, &name, &mut registry),
        },
        other => wrapper_class(other, &name, &mut registry),
    }
}

fn wrapper_class(value: &Value, name: &str, registry: &mut NameRegistry) -> ClassSchema {
    let mut nested = Vec::new();
    let field = analyze_in(value, "value", &mut nested, registry);
    ClassSchema { name: name.to_string(), fields: vec![field], nested }
}

/// Build a class from an object's members, in insertion order.
pub fn build_class(map: &IndexMap<String, Value>, class_name: &str) -> ClassSchema {
    let mut registry = NameRegistry::default();
    registry.reserve(class_name);
    build_class_in(map, class_name, &mut registry)
}

/// Derive one field descriptor, appending any synthesized classes to `nested`.
/// Names already assigned anywhere under `nested` stay unique.
pub fn analyze(value: &Value, key: &str, nested: &mut Vec<ClassSchema>) -> FieldDescriptor {
    let mut registry = NameRegistry::default();
    registry.absorb(nested);
    analyze_in(value, key, nested, &mut registry)
}

fn build_class_in(
    map: &IndexMap<String, Value>,
    class_name: &str,
    registry: &mut NameRegistry,
) -> ClassSchema {
    let mut nested = Vec::new();
    let fields = map.iter().map(|(k, v)| analyze_in(v, k, &mut nested, registry)).collect();
    ClassSchema { name: class_name.to_string(), fields, nested }
}

fn analyze_in(
    value: &Value,
    key: &str,
    nested: &mut Vec<ClassSchema>,
    registry: &mut NameRegistry,
) -> FieldDescriptor {
    let (shape, nullable) = shape_of(value, key, nested, registry);
    FieldDescriptor {
        source_key: key.to_string(),
        generated_name: naming::field_name(key),
        shape,
        nullable,
    }
}

fn shape_of(
    value: &Value,
    key: &str,
    nested: &mut Vec<ClassSchema>,
    registry: &mut NameRegistry,
) -> (FieldShape, bool) {
    match value {
        Value::Null => (FieldShape::Scalar(ScalarKind::Any), true),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            (FieldShape::Scalar(scalar_kind(value)), false)
        }
        Value::Object(m) => {
            let candidate = build_class_in(m, &naming::class_name(key), registry);
            let name = add_nested(nested, candidate, registry);
            (FieldShape::ClassRef(name), false)
        }
        Value::Array(xs) => match xs.first() {
            // empty array: cardinality is known, the element type is not
            None => (FieldShape::List(Box::new(FieldShape::Scalar(ScalarKind::Any))), false),
            Some(Value::Object(m)) => {
                let candidate = build_class_in(m, &naming::element_class_name(key), registry);
                let name = add_nested(nested, candidate, registry);
                (FieldShape::List(Box::new(FieldShape::ClassRef(name))), false)
            }
            Some(first) => {
                let (elem, _) = shape_of(first, &naming::singularize(key), nested, registry);
                (FieldShape::List(Box::new(elem)), false)
            }
        },
    }
}

// Document-wide class name ledger: one entry per assigned name, carrying the
// source-key signature used for shape reuse. `None` marks a name that can
// never be reused (the root class).
#[derive(Default)]
struct NameRegistry {
    entries: Vec<(String, Option<Vec<String>>)>,
}

impl NameRegistry {
    fn reserve(&mut self, name: &str) {
        self.entries.push((name.to_string(), None));
    }

    fn absorb(&mut self, nested: &[ClassSchema]) {
        for class in nested {
            self.entries.push((class.name.clone(), Some(source_keys(class))));
            self.absorb(&class.nested);
        }
    }
}

fn source_keys(class: &ClassSchema) -> Vec<String> {
    class.fields.iter().map(|f| f.source_key.clone()).collect()
}

// Register a synthesized class unless an identical one (same name, same
// source keys) exists anywhere in the document — then its name is reused and
// the candidate is dropped. Distinct shapes under a colliding name get a
// numeric suffix, keeping every class name unique document-wide.
fn add_nested(
    nested: &mut Vec<ClassSchema>,
    mut candidate: ClassSchema,
    registry: &mut NameRegistry,
) -> String {
    let keys = source_keys(&candidate);
    let base = candidate.name.clone();
    let mut n = 2usize;
    loop {
        match registry.entries.iter().find(|(name, _)| *name == candidate.name) {
            None => {
                let name = candidate.name.clone();
                registry.entries.push((name.clone(), Some(keys)));
                nested.push(candidate);
                return name;
            }
            Some((name, Some(existing_keys))) if *existing_keys == keys => {
                return name.clone();
            }
            Some(_) => {
                candidate.name = format!("{base}{n}");
                n += 1;
            }
        }
    }
}

fn scalar_kind(value: &Value) -> ScalarKind {
    match value {
        Value::Bool(_) => ScalarKind::Boolean,
        Value::Number(n) => {
            if n.fract() == 0.0 && n.is_finite() {
                ScalarKind::Integer
            } else {
                ScalarKind::Float
            }
        }
        Value::String(s) => {
            if chrono::DateTime::parse_from_rfc3339(s).is_ok() {
                ScalarKind::DateTime
            } else {
                ScalarKind::String
            }
        }
        _ => ScalarKind::Any,
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn schema_of(src: &str) -> ClassSchema {
        infer(&parse(src).unwrap(), "Root")
    }

    #[test]
    fn scalars_map_to_kinds() {
        let s = schema_of(
            r#"{"name":"x","age":30,"score":4.5,"ok":true,"gone":null,"at":"2024-05-01T10:00:00Z"}"#,
        );
        let shapes: Vec<&FieldShape> = s.fields.iter().map(|f| &f.shape).collect();
        assert_eq!(shapes[0], &FieldShape::Scalar(ScalarKind::String));
        assert_eq!(shapes[1], &FieldShape::Scalar(ScalarKind::Integer));
        assert_eq!(shapes[2], &FieldShape::Scalar(ScalarKind::Float));
        assert_eq!(shapes[3], &FieldShape::Scalar(ScalarKind::Boolean));
        assert_eq!(shapes[4], &FieldShape::Scalar(ScalarKind::Any));
        assert!(s.fields[4].nullable);
        assert_eq!(shapes[5], &FieldShape::Scalar(ScalarKind::DateTime));
    }

    #[test]
    fn field_names_are_sanitized_camel_case() {
        let s = schema_of(r#"{"first name":"a","2nd":"b","":"c"}"#);
        let names: Vec<&str> = s.fields.iter().map(|f| f.generated_name.as_str()).collect();
        assert_eq!(names, ["firstName", "_2nd", "field"]);
        assert_eq!(s.fields[0].source_key, "first name");
    }

    #[test]
    fn nested_object_synthesizes_class() {
        let s = schema_of(r#"{"address":{"street":"s","zip":"z"}}"#);
        assert_eq!(s.fields[0].shape, FieldShape::ClassRef("Address".into()));
        assert_eq!(s.nested.len(), 1);
        assert_eq!(s.nested[0].name, "Address");
        assert_eq!(s.nested[0].fields.len(), 2);
    }

    #[test]
    fn object_array_uses_singularized_first_element() {
        let s = schema_of(r#"{"users":[{"id":1,"name":"a"},{"id":2,"extra":true}]}"#);
        assert_eq!(
            s.fields[0].shape,
            FieldShape::List(Box::new(FieldShape::ClassRef("User".into())))
        );
        // first-element-only: `extra` from the second element is ignored
        let user = &s.nested[0];
        assert_eq!(user.name, "User");
        let keys: Vec<&str> = user.fields.iter().map(|f| f.source_key.as_str()).collect();
        assert_eq!(keys, ["id", "name"]);
    }

    #[test]
    fn empty_and_scalar_arrays() {
        let s = schema_of(r#"{"tags":["a","b"],"empty":[]}"#);
        assert_eq!(
            s.fields[0].shape,
            FieldShape::List(Box::new(FieldShape::Scalar(ScalarKind::String)))
        );
        assert_eq!(
            s.fields[1].shape,
            FieldShape::List(Box::new(FieldShape::Scalar(ScalarKind::Any)))
        );
    }

    #[test]
    fn nested_classes_collect_depth_first() {
        let s = schema_of(r#"{"a":{"inner":{"x":1}},"b":{"y":2}}"#);
        // `A` carries its own child; `B` follows at this level
        assert_eq!(s.nested.len(), 2);
        assert_eq!(s.nested[0].name, "A");
        assert_eq!(s.nested[0].nested[0].name, "Inner");
        assert_eq!(s.nested[1].name, "B");
    }

    #[test]
    fn identical_shapes_dedupe_and_distinct_ones_suffix() {
        let s = schema_of(r#"{"home":{"city":"a"},"homes":[{"city":"b"}]}"#);
        // `home` → Home, `homes` → singularized Home with the same keys: reused
        assert_eq!(s.nested.len(), 1);
        let s2 = schema_of(r#"{"item":{"x":1},"items":[{"y":2}]}"#);
        assert_eq!(s2.nested.len(), 2);
        assert_eq!(s2.nested[1].name, "Item2");
    }

    #[test]
    fn sibling_branches_reuse_one_definition_for_identical_shapes() {
        let s = schema_of(r#"{"a":{"loc":{"x":1}},"b":{"loc":{"x":2}}}"#);
        let a = &s.nested[0];
        let b = &s.nested[1];
        assert_eq!(a.nested.len(), 1);
        assert_eq!(a.nested[0].name, "Loc");
        // the second branch references the first definition instead of
        // declaring a colliding class of its own
        assert!(b.nested.is_empty());
        assert_eq!(b.fields[0].shape, FieldShape::ClassRef("Loc".into()));
    }

    #[test]
    fn sibling_branches_with_differing_shapes_get_distinct_names() {
        let s = schema_of(r#"{"a":{"inner":{"x":1}},"b":{"inner":{"y":"s"}}}"#);
        assert_eq!(s.nested[0].nested[0].name, "Inner");
        assert_eq!(s.nested[1].nested[0].name, "Inner2");
        assert_eq!(s.nested[0].fields[0].shape, FieldShape::ClassRef("Inner".into()));
        assert_eq!(s.nested[1].fields[0].shape, FieldShape::ClassRef("Inner2".into()));
    }

    #[test]
    fn nested_class_never_shadows_the_root_name() {
        let s = schema_of(r#"{"root":{"x":1}}"#);
        assert_eq!(s.name, "Root");
        assert_eq!(s.nested[0].name, "Root2");
        assert_eq!(s.fields[0].shape, FieldShape::ClassRef("Root2".into()));
    }

    #[test]
    fn array_root_infers_from_first_object() {
        let s = schema_of(r#"[{"id":1},{"id":2}]"#);
        assert_eq!(s.name, "Root");
        assert_eq!(s.fields[0].source_key, "id");
    }

    #[test]
    fn scalar_root_wraps_into_single_field() {
        let s = schema_of("[1,2,3]");
        assert_eq!(s.fields.len(), 1);
        assert_eq!(
            s.fields[0].shape,
            FieldShape::List(Box::new(FieldShape::Scalar(ScalarKind::Integer)))
        );
    }
}
