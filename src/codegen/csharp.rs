//! C# emitter: auto-properties with `System.Text.Json` name mapping, a no-arg
//! constructor, and a fully-parameterized constructor.

use crate::error::EngineError;
use crate::infer::{ClassSchema, FieldShape, ScalarKind};

pub fn emit(schema: &ClassSchema) -> String {
    let header = "using System;\nusing System.Collections.Generic;\nusing System.Text.Json.Serialization;\n\n";
    let body = super::render_document(schema, "//", render_class);
    format!("{header}{body}")
}

fn render_class(schema: &ClassSchema) -> Result<String, EngineError> {
    let mut out = format!("public class {}\n{{\n", schema.name);

    for f in &schema.fields {
        let prop = property_name(&f.generated_name);
        if prop != f.source_key {
            out.push_str(&format!("    [JsonPropertyName(\"{}\")]\n", f.source_key));
        }
        out.push_str(&format!(
            "    public {} {} {{ get; set; }}\n",
            type_name(&f.shape, f.nullable),
            prop
        ));
    }

    out.push_str(&format!("\n    public {}() {{ }}\n", schema.name));

    if !schema.fields.is_empty() {
        let params: Vec<String> = schema
            .fields
            .iter()
            .map(|f| format!("{} {}", type_name(&f.shape, f.nullable), f.generated_name))
            .collect();
        out.push_str(&format!("\n    public {}({})\n    {{\n", schema.name, params.join(", ")));
        for f in &schema.fields {
            out.push_str(&format!(
                "        {} = {};\n",
                property_name(&f.generated_name),
                f.generated_name
            ));
        }
        out.push_str("    }\n");
    }

    out.push_str("}\n");
    Ok(out)
}

fn property_name(generated: &str) -> String {
    let mut chars = generated.chars();
    match chars.next() {
        Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
        None => generated.to_string(),
    }
}

fn type_name(shape: &FieldShape, nullable: bool) -> String {
    let base = match shape {
        FieldShape::Scalar(ScalarKind::String) => "string".to_string(),
        FieldShape::Scalar(ScalarKind::Integer) => "int".to_string(),
        FieldShape::Scalar(ScalarKind::Float) => "double".to_string(),
        FieldShape::Scalar(ScalarKind::Boolean) => "bool".to_string(),
        FieldShape::Scalar(ScalarKind::DateTime) => "DateTime".to_string(),
        FieldShape::Scalar(ScalarKind::Any) => "object".to_string(),
        FieldShape::List(elem) => format!("List<{}>", type_name(elem, false)),
        FieldShape::ClassRef(name) => name.clone(),
    };
    // only value types take the `?` suffix
    if nullable && matches!(shape, FieldShape::Scalar(ScalarKind::Integer | ScalarKind::Float | ScalarKind::Boolean | ScalarKind::DateTime))
    {
        format!("{base}?")
    } else {
        base
    }
}
