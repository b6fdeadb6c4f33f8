//! Swift emitter: Codable structs, with a CodingKeys enum whenever a field
//! name diverges from its source key.

use crate::error::EngineError;
use crate::infer::{ClassSchema, FieldShape, ScalarKind};

pub fn emit(schema: &ClassSchema) -> String {
    let header = "import Foundation\n\n";
    let body = super::render_document(schema, "//", render_class);
    format!("{header}{body}")
}

fn render_class(schema: &ClassSchema) -> Result<String, EngineError> {
    let mut out = format!("struct {}: Codable {{\n", schema.name);
    for f in &schema.fields {
        let ty = type_name(&f.shape, f.nullable);
        out.push_str(&format!("    let {}: {ty}\n", f.generated_name));
    }

    let renamed: Vec<_> =
        schema.fields.iter().filter(|f| f.generated_name != f.source_key).collect();
    if !renamed.is_empty() {
        out.push_str("\n    enum CodingKeys: String, CodingKey {\n");
        for f in &schema.fields {
            if f.generated_name == f.source_key {
                out.push_str(&format!("        case {}\n", f.generated_name));
            } else {
                out.push_str(&format!(
                    "        case {} = \"{}\"\n",
                    f.generated_name, f.source_key
                ));
            }
        }
        out.push_str("    }\n");
    }

    out.push_str("}\n");
    Ok(out)
}

fn type_name(shape: &FieldShape, nullable: bool) -> String {
    let base = match shape {
        FieldShape::Scalar(ScalarKind::String) => "String".to_string(),
        FieldShape::Scalar(ScalarKind::Integer) => "Int".to_string(),
        FieldShape::Scalar(ScalarKind::Float) => "Double".to_string(),
        FieldShape::Scalar(ScalarKind::Boolean) => "Bool".to_string(),
        FieldShape::Scalar(ScalarKind::DateTime) => "Date".to_string(),
        FieldShape::Scalar(ScalarKind::Any) => "Any".to_string(),
        FieldShape::List(elem) => format!("[{}]", type_name(elem, false)),
        FieldShape::ClassRef(name) => name.clone(),
    };
    if nullable { format!("{base}?") } else { base }
}
