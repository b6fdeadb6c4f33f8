//! JSON structural engine: an immutable path-addressed tree editor, a syntax
//! recovery engine with exact positions, schema inference from example data,
//! and a multi-target class-definition generator.
//!
//! All operations are synchronous pure functions over immutable inputs; no
//! component holds state between calls, performs I/O, or can block. Callers
//! may fan out across threads freely — every call owns its inputs and returns
//! a fresh result.

pub mod cli;
pub mod codegen;
pub mod editor;
pub mod error;
pub mod infer;
pub mod parse;
pub mod recover;
pub mod value;

pub use codegen::Language;
pub use error::EngineError;
pub use infer::ClassSchema;
pub use recover::{ErrorCategory, FixChange, RepairOutcome, SyntaxError};
pub use value::{Kind, PathSegment, Value};

/// Parse → infer → emit in one call. Callers wanting several targets from one
/// sample should `parse` + `infer` once and call `codegen::emit` per target to
/// avoid redundant traversal.
pub fn generate(
    sample_text: &str,
    root_class_name: &str,
    target: Language,
) -> Result<String, EngineError> {
    let value = parse::parse(sample_text)?;
    let schema = infer::infer(&value, root_class_name);
    Ok(codegen::emit(&schema, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_composes_parse_infer_emit() {
        let out = generate(r#"{"id": 1, "tags": ["a"]}"#, "thing", Language::TypeScript).unwrap();
        assert!(out.contains("export interface Thing"));
        assert!(out.contains("id: number;"));
        assert!(out.contains("tags: string[];"));
    }

    #[test]
    fn generate_surfaces_parse_errors() {
        let err = generate("{bad", "Root", Language::Java).unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
    }

    #[test]
    fn repaired_text_feeds_generation() {
        let fixed = recover::repair_simple("{id: 1 name: 'x'}");
        assert!(fixed.remaining.is_empty());
        let out = generate(&fixed.fixed_text, "Root", Language::Python).unwrap();
        assert!(out.contains("class Root:"));
        assert!(out.contains("name: str"));
    }
}
