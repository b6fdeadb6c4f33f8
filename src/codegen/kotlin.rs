//! Kotlin emitter: data classes (equality/hash/string come with the idiom).

use crate::error::EngineError;
use crate::infer::{ClassSchema, FieldShape, ScalarKind};

pub fn emit(schema: &ClassSchema) -> String {
    let header = "import java.time.OffsetDateTime\n\n";
    let body = super::render_document(schema, "//", render_class);
    format!("{header}{body}")
}

fn render_class(schema: &ClassSchema) -> Result<String, EngineError> {
    if schema.fields.is_empty() {
        return Ok(format!("class {}\n", schema.name));
    }
    let mut out = format!("data class {}(\n", schema.name);
    for f in &schema.fields {
        let ty = type_name(&f.shape, f.nullable);
        if f.nullable {
            out.push_str(&format!("    val {}: {ty} = null,\n", f.generated_name));
        } else {
            out.push_str(&format!("    val {}: {ty},\n", f.generated_name));
        }
    }
    out.push_str(")\n");
    Ok(out)
}

fn type_name(shape: &FieldShape, nullable: bool) -> String {
    let base = match shape {
        FieldShape::Scalar(ScalarKind::String) => "String".to_string(),
        FieldShape::Scalar(ScalarKind::Integer) => "Int".to_string(),
        FieldShape::Scalar(ScalarKind::Float) => "Double".to_string(),
        FieldShape::Scalar(ScalarKind::Boolean) => "Boolean".to_string(),
        FieldShape::Scalar(ScalarKind::DateTime) => "OffsetDateTime".to_string(),
        FieldShape::Scalar(ScalarKind::Any) => "Any".to_string(),
        FieldShape::List(elem) => format!("List<{}>", type_name(elem, false)),
        FieldShape::ClassRef(name) => name.clone(),
    };
    if nullable { format!("{base}?") } else { base }
}
