//! Go emitter: exported struct fields with JSON tags; nullable fields become
//! pointers.

use crate::error::EngineError;
use crate::infer::{ClassSchema, FieldShape, ScalarKind};

pub fn emit(schema: &ClassSchema) -> String {
    let mut header = String::from("package model\n\n");
    if uses_datetime(schema) {
        header.push_str("import \"time\"\n\n");
    }
    let body = super::render_document(schema, "//", render_class);
    format!("{header}{body}")
}

fn uses_datetime(schema: &ClassSchema) -> bool {
    fn shape_has(shape: &FieldShape) -> bool {
        match shape {
            FieldShape::Scalar(ScalarKind::DateTime) => true,
            FieldShape::List(elem) => shape_has(elem),
            _ => false,
        }
    }
    schema.fields.iter().any(|f| shape_has(&f.shape))
        || schema.nested.iter().any(uses_datetime)
}

fn render_class(schema: &ClassSchema) -> Result<String, EngineError> {
    let mut out = format!("type {} struct {{\n", schema.name);
    for f in &schema.fields {
        let ty = type_name(&f.shape, f.nullable);
        out.push_str(&format!(
            "\t{} {ty} `json:\"{}\"`\n",
            exported(&f.generated_name),
            f.source_key
        ));
    }
    out.push_str("}\n");
    Ok(out)
}

fn exported(generated: &str) -> String {
    let trimmed = generated.trim_start_matches('_');
    let mut chars = trimmed.chars();
    match chars.next() {
        // identifiers cannot start with a digit once the underscores are gone
        Some(c) if c.is_ascii_digit() => format!("Field{trimmed}"),
        Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
        None => format!("Field{generated}"),
    }
}

fn type_name(shape: &FieldShape, nullable: bool) -> String {
    let base = match shape {
        FieldShape::Scalar(ScalarKind::String) => "string".to_string(),
        FieldShape::Scalar(ScalarKind::Integer) => "int64".to_string(),
        FieldShape::Scalar(ScalarKind::Float) => "float64".to_string(),
        FieldShape::Scalar(ScalarKind::Boolean) => "bool".to_string(),
        FieldShape::Scalar(ScalarKind::DateTime) => "time.Time".to_string(),
        FieldShape::Scalar(ScalarKind::Any) => "interface{}".to_string(),
        FieldShape::List(elem) => format!("[]{}", type_name(elem, false)),
        FieldShape::ClassRef(name) => name.clone(),
    };
    if nullable && !matches!(shape, FieldShape::Scalar(ScalarKind::Any)) {
        format!("*{base}")
    } else {
        base
    }
}
