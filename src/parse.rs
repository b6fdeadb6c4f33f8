//! Strict JSON parsing into the Tree Model, with JSON-path context in error
//! messages. On failure the recovery engine (`crate::recover`) is the caller's
//! fallback path; this module never repairs anything.

use crate::error::EngineError;
use crate::value::Value;

/// Parse strict JSON into a tree value, preserving object member order.
pub fn parse(src: &str) -> Result<Value, EngineError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, serde_json::Value>(de) {
        Ok(v) => Ok(Value::from_json(&v)),
        Err(err) => {
            let path = err.path().to_string();
            let inner = err.into_inner();
            if path == "." {
                Err(EngineError::Parse(inner.to_string()))
            } else {
                Err(EngineError::Parse(format!("at JSON path {path} → {inner}")))
            }
        }
    }
}
