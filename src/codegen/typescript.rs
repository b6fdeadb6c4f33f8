//! TypeScript emitter: exported interfaces. Date/time stays `string` — that
//! is what `JSON.parse` hands back.

use crate::error::EngineError;
use crate::infer::{ClassSchema, FieldShape, ScalarKind};

pub fn emit(schema: &ClassSchema) -> String {
    super::render_document(schema, "//", render_class)
}

fn render_class(schema: &ClassSchema) -> Result<String, EngineError> {
    let mut out = format!("export interface {} {{\n", schema.name);
    for f in &schema.fields {
        let ty = type_name(&f.shape);
        let ty = if f.nullable { format!("{ty} | null") } else { ty };
        out.push_str(&format!("  {}: {ty};\n", f.generated_name));
    }
    out.push_str("}\n");
    Ok(out)
}

fn type_name(shape: &FieldShape) -> String {
    match shape {
        FieldShape::Scalar(ScalarKind::String) => "string".to_string(),
        FieldShape::Scalar(ScalarKind::Integer | ScalarKind::Float) => "number".to_string(),
        FieldShape::Scalar(ScalarKind::Boolean) => "boolean".to_string(),
        FieldShape::Scalar(ScalarKind::DateTime) => "string".to_string(),
        FieldShape::Scalar(ScalarKind::Any) => "unknown".to_string(),
        FieldShape::List(elem) => format!("{}[]", type_name(elem)),
        FieldShape::ClassRef(name) => name.clone(),
    }
}
