//! Java emitter: the full POJO idiom — private fields, both constructors,
//! getters/setters, `equals`/`hashCode`/`toString` over the field list.

use crate::error::EngineError;
use crate::infer::{ClassSchema, FieldShape, ScalarKind};

pub fn emit(schema: &ClassSchema) -> String {
    let header =
        "import java.time.OffsetDateTime;\nimport java.util.List;\nimport java.util.Objects;\n\n";
    let body = super::render_document(schema, "//", render_class);
    format!("{header}{body}")
}

fn render_class(schema: &ClassSchema) -> Result<String, EngineError> {
    let name = &schema.name;
    let mut out = format!("public class {name} {{\n");

    for f in &schema.fields {
        out.push_str(&format!(
            "    private {} {};\n",
            type_name(&f.shape, f.nullable),
            f.generated_name
        ));
    }

    out.push_str(&format!("\n    public {name}() {{\n    }}\n"));

    if !schema.fields.is_empty() {
        let params: Vec<String> = schema
            .fields
            .iter()
            .map(|f| format!("{} {}", type_name(&f.shape, f.nullable), f.generated_name))
            .collect();
        out.push_str(&format!("\n    public {name}({}) {{\n", params.join(", ")));
        for f in &schema.fields {
            out.push_str(&format!(
                "        this.{0} = {0};\n",
                f.generated_name
            ));
        }
        out.push_str("    }\n");
    }

    for f in &schema.fields {
        let ty = type_name(&f.shape, f.nullable);
        let accessor = upper_first(&f.generated_name);
        out.push_str(&format!(
            "\n    public {ty} get{accessor}() {{\n        return {};\n    }}\n",
            f.generated_name
        ));
        out.push_str(&format!(
            "\n    public void set{accessor}({ty} {0}) {{\n        this.{0} = {0};\n    }}\n",
            f.generated_name
        ));
    }

    // equals / hashCode / toString from the field list
    out.push_str("\n    @Override\n    public boolean equals(Object o) {\n");
    out.push_str("        if (this == o) return true;\n");
    out.push_str(&format!(
        "        if (!(o instanceof {name})) return false;\n        {name} other = ({name}) o;\n"
    ));
    if schema.fields.is_empty() {
        out.push_str("        return true;\n    }\n");
    } else {
        let cmps: Vec<String> = schema
            .fields
            .iter()
            .map(|f| format!("Objects.equals({0}, other.{0})", f.generated_name))
            .collect();
        out.push_str(&format!("        return {};\n    }}\n", cmps.join("\n            && ")));
    }

    let hash_args: Vec<&str> =
        schema.fields.iter().map(|f| f.generated_name.as_str()).collect();
    out.push_str(&format!(
        "\n    @Override\n    public int hashCode() {{\n        return Objects.hash({});\n    }}\n",
        hash_args.join(", ")
    ));

    out.push_str("\n    @Override\n    public String toString() {\n");
    out.push_str(&format!("        return \"{name}{{\"\n"));
    for (i, f) in schema.fields.iter().enumerate() {
        let sep = if i == 0 { "" } else { ", " };
        out.push_str(&format!(
            "            + \"{sep}{0}=\" + {0}\n",
            f.generated_name
        ));
    }
    out.push_str("            + \"}\";\n    }\n");

    out.push_str("}\n");
    Ok(out)
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
        None => s.to_string(),
    }
}

fn type_name(shape: &FieldShape, nullable: bool) -> String {
    match shape {
        FieldShape::Scalar(ScalarKind::String) => "String".to_string(),
        FieldShape::Scalar(ScalarKind::Integer) => {
            if nullable { "Integer".to_string() } else { "int".to_string() }
        }
        FieldShape::Scalar(ScalarKind::Float) => {
            if nullable { "Double".to_string() } else { "double".to_string() }
        }
        FieldShape::Scalar(ScalarKind::Boolean) => {
            if nullable { "Boolean".to_string() } else { "boolean".to_string() }
        }
        FieldShape::Scalar(ScalarKind::DateTime) => "OffsetDateTime".to_string(),
        FieldShape::Scalar(ScalarKind::Any) => "Object".to_string(),
        FieldShape::List(elem) => format!("List<{}>", boxed_name(elem)),
        FieldShape::ClassRef(name) => name.clone(),
    }
}

// generic positions always take the boxed spelling
fn boxed_name(shape: &FieldShape) -> String {
    match shape {
        FieldShape::Scalar(ScalarKind::Integer) => "Integer".to_string(),
        FieldShape::Scalar(ScalarKind::Float) => "Double".to_string(),
        FieldShape::Scalar(ScalarKind::Boolean) => "Boolean".to_string(),
        other => type_name(other, false),
    }
}
