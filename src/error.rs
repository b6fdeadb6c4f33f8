//! Library error taxonomy. Nothing here is fatal: every failure surfaces as a
//! returned value and the caller decides whether to retry, escalate, or show
//! the message.

use crate::value::Kind;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Source text failed strict parsing. The recovery engine (`recover`) is
    /// the fallback path for this case.
    #[error("parse error: {0}")]
    Parse(String),

    /// An operation was handed a value of the wrong shape, e.g. an array
    /// transform applied to an object.
    #[error("expected {expected}, found {found}")]
    Shape { expected: &'static str, found: Kind },

    /// A single nested class could not be rendered. The generator downgrades
    /// this to an inline comment; it only escapes as an error for callers
    /// driving emitters directly.
    #[error("cannot render class `{class}`: {reason}")]
    Emit { class: String, reason: String },
}

impl EngineError {
    pub fn shape(expected: &'static str, found: Kind) -> Self {
        EngineError::Shape { expected, found }
    }
}
