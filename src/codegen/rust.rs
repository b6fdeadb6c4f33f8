//! Rust emitter: serde-ready structs with snake_case fields and renames back
//! to the source keys.

use crate::error::EngineError;
use crate::infer::{ClassSchema, FieldShape, ScalarKind};

pub fn emit(schema: &ClassSchema) -> String {
    let header = "use serde::{Deserialize, Serialize};\n\n";
    let body = super::render_document(schema, "//", render_class);
    format!("{header}{body}")
}

fn render_class(schema: &ClassSchema) -> Result<String, EngineError> {
    let mut out = format!(
        "#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\npub struct {} {{\n",
        schema.name
    );
    for f in &schema.fields {
        let field = snake_case(&f.generated_name);
        if field != f.source_key {
            out.push_str(&format!("    #[serde(rename = \"{}\")]\n", f.source_key));
        }
        let ty = type_name(&f.shape);
        let ty = if f.nullable { format!("Option<{ty}>") } else { ty };
        out.push_str(&format!("    pub {field}: {ty},\n"));
    }
    out.push_str("}\n");
    Ok(out)
}

fn snake_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for (i, c) in camel.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn type_name(shape: &FieldShape) -> String {
    match shape {
        FieldShape::Scalar(ScalarKind::String) => "String".to_string(),
        FieldShape::Scalar(ScalarKind::Integer) => "i64".to_string(),
        FieldShape::Scalar(ScalarKind::Float) => "f64".to_string(),
        FieldShape::Scalar(ScalarKind::Boolean) => "bool".to_string(),
        FieldShape::Scalar(ScalarKind::DateTime) => {
            "chrono::DateTime<chrono::Utc>".to_string()
        }
        FieldShape::Scalar(ScalarKind::Any) => "serde_json::Value".to_string(),
        FieldShape::List(elem) => format!("Vec<{}>", type_name(elem)),
        FieldShape::ClassRef(name) => name.clone(),
    }
}
