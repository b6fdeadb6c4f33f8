//! JSON Schema "emitter": serializes the inferred shape as a draft-07 schema
//! document rather than executable code. Nested classes land under
//! `definitions` and are referenced with `$ref`, so ordering is by key, not
//! by declaration.

use serde_json::{json, Value};

use crate::infer::{ClassSchema, FieldShape, ScalarKind};

pub fn emit(schema: &ClassSchema) -> String {
    let mut definitions = serde_json::Map::new();
    for child in &schema.nested {
        collect_definitions(child, &mut definitions);
    }

    let mut root = class_schema(schema);
    if let Value::Object(m) = &mut root {
        m.insert("$schema".into(), Value::from("http://json-schema.org/draft-07/schema#"));
        m.insert("title".into(), Value::from(schema.name.clone()));
        if !definitions.is_empty() {
            m.insert("definitions".into(), Value::Object(definitions));
        }
    }
    let mut text = serde_json::to_string_pretty(&root).unwrap_or_else(|_| "{}".to_string());
    text.push('\n');
    text
}

fn collect_definitions(schema: &ClassSchema, definitions: &mut serde_json::Map<String, Value>) {
    for child in &schema.nested {
        collect_definitions(child, definitions);
    }
    // unnamed classes cannot be referenced; leave them out
    if !schema.name.is_empty() {
        definitions.insert(schema.name.clone(), class_schema(schema));
    }
}

fn class_schema(schema: &ClassSchema) -> Value {
    let mut props = serde_json::Map::new();
    let mut required: Vec<String> = Vec::new();
    for f in &schema.fields {
        let mut prop = shape_schema(&f.shape);
        if f.nullable {
            prop = json!({ "oneOf": [prop, { "type": "null" }] });
        } else {
            required.push(f.source_key.clone());
        }
        props.insert(f.source_key.clone(), prop);
    }
    let mut out = json!({ "type": "object", "properties": props });
    if !required.is_empty() {
        out["required"] = Value::Array(required.into_iter().map(Value::from).collect());
    }
    out
}

fn shape_schema(shape: &FieldShape) -> Value {
    match shape {
        FieldShape::Scalar(ScalarKind::String) => json!({ "type": "string" }),
        FieldShape::Scalar(ScalarKind::Integer) => json!({ "type": "integer" }),
        FieldShape::Scalar(ScalarKind::Float) => json!({ "type": "number" }),
        FieldShape::Scalar(ScalarKind::Boolean) => json!({ "type": "boolean" }),
        FieldShape::Scalar(ScalarKind::DateTime) => {
            json!({ "type": "string", "format": "date-time" })
        }
        FieldShape::Scalar(ScalarKind::Any) => json!({}),
        FieldShape::List(elem) => json!({ "type": "array", "items": shape_schema(elem) }),
        FieldShape::ClassRef(name) => json!({ "$ref": format!("#/definitions/{name}") }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::infer;
    use crate::parse::parse;

    #[test]
    fn nested_classes_become_definitions() {
        let v = parse(r#"{"vendor":{"city":"x"},"tags":["a"],"gone":null}"#).unwrap();
        let text = emit(&infer(&v, "Root"));
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["properties"]["vendor"]["$ref"], "#/definitions/Vendor");
        assert_eq!(doc["definitions"]["Vendor"]["properties"]["city"]["type"], "string");
        assert_eq!(doc["properties"]["tags"]["items"]["type"], "string");
        // nullable fields are not required and allow null
        let required: Vec<&str> =
            doc["required"].as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect();
        assert!(!required.contains(&"gone"));
    }

    #[test]
    fn sibling_refs_resolve_to_their_own_shapes() {
        let v = parse(r#"{"a":{"inner":{"x":1}},"b":{"inner":{"y":"s"}}}"#).unwrap();
        let text = emit(&infer(&v, "Root"));
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["definitions"]["A"]["properties"]["inner"]["$ref"], "#/definitions/Inner");
        assert_eq!(doc["definitions"]["B"]["properties"]["inner"]["$ref"], "#/definitions/Inner2");
        assert_eq!(doc["definitions"]["Inner"]["properties"]["x"]["type"], "integer");
        assert_eq!(doc["definitions"]["Inner2"]["properties"]["y"]["type"], "string");
    }
}
