//! Multi-target code generation: render an inferred `ClassSchema` as source
//! text in one of a closed set of target languages.
//!
//! One emitter module per target, each a pure function of the schema with the
//! same obligations: a scalar type table, list wrapper syntax, member and
//! constructor/accessor rendering per the target's idiom, and children-first
//! nested-class emission so a type is always defined before first use.
//! Adding a language is one variant plus one module, checked exhaustively.

pub mod csharp;
pub mod go;
pub mod java;
pub mod json_schema;
pub mod kotlin;
pub mod python;
pub mod rust;
pub mod swift;
pub mod typescript;

use crate::error::EngineError;
use crate::infer::ClassSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Language {
    #[value(name = "csharp")]
    CSharp,
    Java,
    Kotlin,
    #[value(name = "typescript")]
    TypeScript,
    Python,
    Go,
    Swift,
    Rust,
    /// Serializes the inferred shape as a schema document instead of code.
    #[value(name = "json-schema")]
    JsonSchema,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::CSharp,
        Language::Java,
        Language::Kotlin,
        Language::TypeScript,
        Language::Python,
        Language::Go,
        Language::Swift,
        Language::Rust,
        Language::JsonSchema,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Language::CSharp => "csharp",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Go => "go",
            Language::Swift => "swift",
            Language::Rust => "rust",
            Language::JsonSchema => "json-schema",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            Language::CSharp => "cs",
            Language::Java => "java",
            Language::Kotlin => "kt",
            Language::TypeScript => "ts",
            Language::Python => "py",
            Language::Go => "go",
            Language::Swift => "swift",
            Language::Rust => "rs",
            Language::JsonSchema => "json",
        }
    }
}

/// Render `schema` for `target`. Always returns a document: a nested class
/// that fails to render degrades to an inline comment while its siblings and
/// the declaring class still render.
pub fn emit(schema: &ClassSchema, target: Language) -> String {
    match target {
        Language::CSharp => csharp::emit(schema),
        Language::Java => java::emit(schema),
        Language::Kotlin => kotlin::emit(schema),
        Language::TypeScript => typescript::emit(schema),
        Language::Python => python::emit(schema),
        Language::Go => go::emit(schema),
        Language::Swift => swift::emit(schema),
        Language::Rust => rust::emit(schema),
        Language::JsonSchema => json_schema::emit(schema),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SHARED RENDER WALK
// ————————————————————————————————————————————————————————————————————————————

/// Children-first walk with per-class failure isolation. `comment_prefix` is
/// the target's line-comment marker, used for the degraded form.
pub(crate) fn render_document<F>(
    schema: &ClassSchema,
    comment_prefix: &str,
    render_one: F,
) -> String
where
    F: Fn(&ClassSchema) -> Result<String, EngineError> + Copy,
{
    let mut out = String::new();
    push_class(&mut out, schema, comment_prefix, render_one);
    out
}

fn push_class<F>(out: &mut String, schema: &ClassSchema, comment_prefix: &str, render_one: F)
where
    F: Fn(&ClassSchema) -> Result<String, EngineError> + Copy,
{
    for child in &schema.nested {
        push_class(out, child, comment_prefix, render_one);
    }
    match check_renderable(schema).and_then(|_| render_one(schema)) {
        Ok(text) => {
            out.push_str(&text);
            out.push('\n');
        }
        Err(err) => {
            out.push_str(comment_prefix);
            out.push(' ');
            out.push_str(&err.to_string());
            out.push_str("\n\n");
        }
    }
}

fn check_renderable(schema: &ClassSchema) -> Result<(), EngineError> {
    if schema.name.is_empty() {
        return Err(EngineError::Emit {
            class: "<unnamed>".to_string(),
            reason: "class has no name".to_string(),
        });
    }
    for field in &schema.fields {
        if field.generated_name.is_empty() {
            return Err(EngineError::Emit {
                class: schema.name.clone(),
                reason: format!("field `{}` has no generated name", field.source_key),
            });
        }
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::{infer, FieldDescriptor, FieldShape, ScalarKind};
    use crate::parse::parse;

    const SAMPLE: &str = r#"{
        "id": 7,
        "name": "widget",
        "price": 9.99,
        "active": true,
        "tags": ["a", "b"],
        "vendor": {"city": "x", "rating": 4.5},
        "orders": [{"qty": 2, "placed_at": "2024-05-01T10:00:00Z"}]
    }"#;

    fn sample_schema() -> crate::infer::ClassSchema {
        infer(&parse(SAMPLE).unwrap(), "Product")
    }

    #[test]
    fn every_target_reproduces_the_field_set() {
        let schema = sample_schema();
        for lang in Language::ALL {
            let out = emit(&schema, lang);
            for needle in ["id", "name", "price", "active", "tags", "vendor", "orders"] {
                assert!(
                    out.to_ascii_lowercase().contains(needle),
                    "{} output missing field `{needle}`:\n{out}",
                    lang.name()
                );
            }
            // nested classes render too, ahead of or inside the declaring type
            for class in ["Vendor", "Order"] {
                assert!(
                    out.contains(class),
                    "{} output missing class `{class}`:\n{out}",
                    lang.name()
                );
            }
        }
    }

    #[test]
    fn nested_classes_render_before_the_declaring_class() {
        let schema = sample_schema();
        for lang in Language::ALL {
            if lang == Language::JsonSchema {
                continue; // definitions are keyed, not ordered
            }
            let out = emit(&schema, lang);
            let vendor = out.find("Vendor").unwrap();
            let product = out.find("Product").unwrap();
            assert!(vendor < product, "{}: Vendor must precede Product", lang.name());
        }
    }

    #[test]
    fn same_key_in_sibling_branches_declares_one_class() {
        let v = parse(r#"{"a":{"loc":{"x":1}},"b":{"loc":{"x":2}}}"#).unwrap();
        let schema = infer(&v, "Root");
        // one declaration, two references
        let java = emit(&schema, Language::Java);
        assert_eq!(java.matches("public class Loc").count(), 1);
        let rust = emit(&schema, Language::Rust);
        assert_eq!(rust.matches("pub struct Loc").count(), 1);
        let go = emit(&schema, Language::Go);
        assert_eq!(go.matches("type Loc struct").count(), 1);
    }

    #[test]
    fn one_bad_nested_class_does_not_abort_the_document() {
        let mut schema = sample_schema();
        schema.nested.push(crate::infer::ClassSchema {
            name: String::new(),
            fields: vec![FieldDescriptor {
                source_key: "x".into(),
                generated_name: "x".into(),
                shape: FieldShape::Scalar(ScalarKind::String),
                nullable: false,
            }],
            nested: Vec::new(),
        });
        for lang in Language::ALL {
            if lang == Language::JsonSchema {
                continue; // schema documents skip unnamed definitions instead
            }
            let out = emit(&schema, lang);
            assert!(out.contains("Vendor"), "{}: siblings must survive", lang.name());
            assert!(out.contains("Product"), "{}: root must survive", lang.name());
            assert!(
                out.contains("class has no name"),
                "{}: degraded comment expected",
                lang.name()
            );
        }
    }
}
