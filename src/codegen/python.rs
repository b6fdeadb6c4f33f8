//! Python emitter: dataclasses with typing annotations. No field defaults, so
//! ordering never trips the defaults-after-non-defaults rule.

use crate::error::EngineError;
use crate::infer::{ClassSchema, FieldShape, ScalarKind};

pub fn emit(schema: &ClassSchema) -> String {
    let header = "from __future__ import annotations\n\nfrom dataclasses import dataclass\nfrom datetime import datetime\nfrom typing import Any, List, Optional\n\n\n";
    let body = super::render_document(schema, "#", render_class);
    format!("{header}{body}")
}

fn render_class(schema: &ClassSchema) -> Result<String, EngineError> {
    let mut out = format!("@dataclass\nclass {}:\n", schema.name);
    if schema.fields.is_empty() {
        out.push_str("    pass\n");
        return Ok(out);
    }
    for f in &schema.fields {
        let ty = type_name(&f.shape);
        let ty = if f.nullable { format!("Optional[{ty}]") } else { ty };
        out.push_str(&format!("    {}: {ty}\n", f.generated_name));
    }
    Ok(out)
}

fn type_name(shape: &FieldShape) -> String {
    match shape {
        FieldShape::Scalar(ScalarKind::String) => "str".to_string(),
        FieldShape::Scalar(ScalarKind::Integer) => "int".to_string(),
        FieldShape::Scalar(ScalarKind::Float) => "float".to_string(),
        FieldShape::Scalar(ScalarKind::Boolean) => "bool".to_string(),
        FieldShape::Scalar(ScalarKind::DateTime) => "datetime".to_string(),
        FieldShape::Scalar(ScalarKind::Any) => "Any".to_string(),
        FieldShape::List(elem) => format!("List[{}]", type_name(elem)),
        FieldShape::ClassRef(name) => name.clone(),
    }
}
