//! Structural editor: pure, path-addressed mutation over tree values.
//!
//! Every operation is `(root, path, …) -> new root` and never touches the
//! input. Unresolved paths are no-ops returning an input-equal value — editing
//! a tree that changed underfoot is expected and recoverable — with one
//! deliberate exception: `array_transform` on a non-array is a reported shape
//! error, not a silent no-op.

use once_cell::sync::Lazy;
use ordered_float::OrderedFloat;
use regex::Regex;

use crate::error::EngineError;
use crate::value::{Kind, PathSegment, Value};

// ————————————————————————————————————————————————————————————————————————————
// LOOKUP / REPLACE / REMOVE
// ————————————————————————————————————————————————————————————————————————————

/// Resolve `path` against `root`. `None` when any segment fails to resolve
/// (missing key, out-of-range index, or indexing into a scalar).
pub fn get<'a>(root: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    let mut cur = root;
    for seg in path {
        cur = match (cur, seg) {
            (Value::Object(m), PathSegment::Key(k)) => m.get(k)?,
            (Value::Array(xs), PathSegment::Index(i)) => xs.get(*i)?,
            _ => return None,
        };
    }
    Some(cur)
}

/// Replace the value at `path`. The empty path replaces the whole document.
/// Containers along the path are rebuilt, never shared with `root`.
pub fn set(root: &Value, path: &[PathSegment], value: Value) -> Value {
    let Some((seg, rest)) = path.split_first() else {
        return value;
    };
    match (root, seg) {
        (Value::Object(m), PathSegment::Key(k)) if m.contains_key(k) => Value::Object(
            m.iter()
                .map(|(key, v)| {
                    if key == k {
                        (key.clone(), set(v, rest, value.clone()))
                    } else {
                        (key.clone(), v.clone())
                    }
                })
                .collect(),
        ),
        (Value::Array(xs), PathSegment::Index(i)) if *i < xs.len() => Value::Array(
            xs.iter()
                .enumerate()
                .map(|(j, v)| if j == *i { set(v, rest, value.clone()) } else { v.clone() })
                .collect(),
        ),
        _ => root.clone(),
    }
}

/// Delete the entry named by the final segment from its parent. Array removal
/// shifts later indices down. The empty path is a no-op.
pub fn remove(root: &Value, path: &[PathSegment]) -> Value {
    let Some((seg, rest)) = path.split_first() else {
        return root.clone();
    };
    if rest.is_empty() {
        return match (root, seg) {
            (Value::Object(m), PathSegment::Key(k)) if m.contains_key(k) => Value::Object(
                m.iter()
                    .filter(|(key, _)| key.as_str() != k)
                    .map(|(key, v)| (key.clone(), v.clone()))
                    .collect(),
            ),
            (Value::Array(xs), PathSegment::Index(i)) if *i < xs.len() => Value::Array(
                xs.iter()
                    .enumerate()
                    .filter(|(j, _)| j != i)
                    .map(|(_, v)| v.clone())
                    .collect(),
            ),
            _ => root.clone(),
        };
    }
    descend(root, seg, |child| remove(child, rest))
}

// Rebuild `root` with `f` applied to the child named by `seg`; no-op when the
// segment does not resolve.
fn descend(root: &Value, seg: &PathSegment, f: impl Fn(&Value) -> Value) -> Value {
    match (root, seg) {
        (Value::Object(m), PathSegment::Key(k)) if m.contains_key(k) => Value::Object(
            m.iter()
                .map(|(key, v)| {
                    if key == k {
                        (key.clone(), f(v))
                    } else {
                        (key.clone(), v.clone())
                    }
                })
                .collect(),
        ),
        (Value::Array(xs), PathSegment::Index(i)) if *i < xs.len() => Value::Array(
            xs.iter()
                .enumerate()
                .map(|(j, v)| if j == *i { f(v) } else { v.clone() })
                .collect(),
        ),
        _ => root.clone(),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DUPLICATE / RENAME
// ————————————————————————————————————————————————————————————————————————————

/// Insert a deep copy of the addressed node immediately after it. Array
/// parents insert at `index + 1`; object parents synthesize `{key}_copy`,
/// then `{key}_copy2`, `{key}_copy3`, … on collision, positioned right after
/// the original key.
pub fn duplicate_adjacent(root: &Value, path: &[PathSegment]) -> Value {
    let Some((seg, rest)) = path.split_first() else {
        return root.clone();
    };
    if !rest.is_empty() {
        return descend(root, seg, |child| duplicate_adjacent(child, rest));
    }
    match (root, seg) {
        (Value::Array(xs), PathSegment::Index(i)) if *i < xs.len() => {
            let mut out = xs.clone();
            out.insert(i + 1, xs[*i].clone());
            Value::Array(out)
        }
        (Value::Object(m), PathSegment::Key(k)) if m.contains_key(k) => {
            let copy_key = first_free_copy_key(m.keys().map(|s| s.as_str()), k);
            let mut out = indexmap::IndexMap::new();
            for (key, v) in m {
                out.insert(key.clone(), v.clone());
                if key == k {
                    out.insert(copy_key.clone(), v.clone());
                }
            }
            Value::Object(out)
        }
        _ => root.clone(),
    }
}

fn first_free_copy_key<'a>(existing: impl Iterator<Item = &'a str> + Clone, key: &str) -> String {
    let taken = |candidate: &str| existing.clone().any(|k| k == candidate);
    let base = format!("{key}_copy");
    if !taken(&base) {
        return base;
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{key}_copy{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Rename the final segment's key in its object parent, preserving position.
/// No-op when the key is unchanged or empty, or the parent is an array.
/// Collisions with sibling keys get `_1`, `_2`, … appended until unique.
pub fn rename_key(root: &Value, path: &[PathSegment], new_key: &str) -> Value {
    let Some((seg, rest)) = path.split_first() else {
        return root.clone();
    };
    if !rest.is_empty() {
        return descend(root, seg, |child| rename_key(child, rest, new_key));
    }
    let (Value::Object(m), PathSegment::Key(old)) = (root, seg) else {
        return root.clone();
    };
    if new_key.is_empty() || new_key == old || !m.contains_key(old) {
        return root.clone();
    }
    let mut chosen = new_key.to_string();
    let mut n = 1usize;
    while m.keys().any(|k| k != old && k == &chosen) {
        chosen = format!("{new_key}_{n}");
        n += 1;
    }
    Value::Object(
        m.iter()
            .map(|(key, v)| {
                if key == old {
                    (chosen.clone(), v.clone())
                } else {
                    (key.clone(), v.clone())
                }
            })
            .collect(),
    )
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE CONVERSION
// ————————————————————————————————————————————————————————————————————————————

/// Coerce a value to the target kind. Conversion to a container discards the
/// prior value and yields an empty container: this is a "change the shape"
/// operation, not a cast. Converting to the value's own kind is the identity.
pub fn convert_type(value: &Value, target: Kind) -> Value {
    if value.kind() == target {
        return value.clone();
    }
    match target {
        Kind::Null => Value::Null,
        Kind::Bool => Value::Bool(value.is_truthy()),
        Kind::Number => Value::Number(coerce_number(value)),
        Kind::String => Value::String(value.to_display_string()),
        Kind::Array => Value::Array(Vec::new()),
        Kind::Object => Value::Object(indexmap::IndexMap::new()),
    }
}

fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        Value::Bool(true) => 1.0,
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ARRAY TRANSFORMS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayTransform {
    /// Drop `null` elements only; `false`/`0`/`""` survive.
    FilterNulls,
    /// Drop every falsy element.
    FilterFalsy,
    SortAsc,
    SortDesc,
    /// Dedupe on the canonical string key; first occurrence wins.
    Unique,
    /// Concatenate one level of nested arrays; non-arrays pass through.
    Flatten1,
    /// Parse numeric-looking strings to numbers; everything else untouched.
    MapNumber,
    /// Stringify every element.
    MapString,
}

static NUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").unwrap());

/// Apply `mode` to an array value, returning a new array. A non-array input
/// is a shape error, never a silent no-op.
pub fn array_transform(value: &Value, mode: ArrayTransform) -> Result<Value, EngineError> {
    let Value::Array(xs) = value else {
        return Err(EngineError::shape("array", value.kind()));
    };
    let out = match mode {
        ArrayTransform::FilterNulls => {
            xs.iter().filter(|v| !matches!(v, Value::Null)).cloned().collect()
        }
        ArrayTransform::FilterFalsy => xs.iter().filter(|v| v.is_truthy()).cloned().collect(),
        ArrayTransform::SortAsc => {
            let mut out = xs.clone();
            out.sort_by(compare_elements);
            out
        }
        ArrayTransform::SortDesc => {
            let mut out = xs.clone();
            out.sort_by(|a, b| compare_elements(b, a));
            out
        }
        ArrayTransform::Unique => {
            let mut seen = std::collections::HashSet::new();
            xs.iter().filter(|v| seen.insert(v.canonical_key())).cloned().collect()
        }
        ArrayTransform::Flatten1 => {
            let mut out = Vec::with_capacity(xs.len());
            for v in xs {
                match v {
                    Value::Array(inner) => out.extend(inner.iter().cloned()),
                    other => out.push(other.clone()),
                }
            }
            out
        }
        ArrayTransform::MapNumber => xs
            .iter()
            .map(|v| match v {
                Value::String(s) if NUMERIC_RE.is_match(s.trim()) => {
                    Value::Number(s.trim().parse().unwrap_or(0.0))
                }
                other => other.clone(),
            })
            .collect(),
        ArrayTransform::MapString => {
            xs.iter().map(|v| Value::String(v.to_display_string())).collect()
        }
    };
    Ok(Value::Array(out))
}

// Numbers order numerically and ahead of everything else; the rest compares
// lexicographically over the textual form. Total, so the stable sort never
// sees an inconsistent comparator on mixed-type arrays.
fn compare_elements(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => OrderedFloat(*x).cmp(&OrderedFloat(*y)),
        (Value::Number(_), _) => std::cmp::Ordering::Less,
        (_, Value::Number(_)) => std::cmp::Ordering::Greater,
        _ => a.to_display_string().cmp(&b.to_display_string()),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// REORDERING
// ————————————————————————————————————————————————————————————————————————————

/// Move the element at `src` to just before the element currently at `dst`.
/// No-op when either index is out of range.
pub fn reorder_array(parent: &Value, src: usize, dst: usize) -> Value {
    let Value::Array(xs) = parent else {
        return parent.clone();
    };
    if src >= xs.len() || dst >= xs.len() || src == dst {
        return parent.clone();
    }
    let mut out = xs.clone();
    let elem = out.remove(src);
    out.insert(dst.min(out.len()), elem);
    Value::Array(out)
}

/// Move `src_key` to just before `dst_key`'s current position. No-op when
/// either key is absent.
pub fn reorder_object(parent: &Value, src_key: &str, dst_key: &str) -> Value {
    let Value::Object(m) = parent else {
        return parent.clone();
    };
    let (Some(src), Some(dst)) = (m.get_index_of(src_key), m.get_index_of(dst_key)) else {
        return parent.clone();
    };
    if src == dst {
        return parent.clone();
    }
    let mut pairs: Vec<(String, Value)> =
        m.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    let entry = pairs.remove(src);
    let at = dst.min(pairs.len());
    pairs.insert(at, entry);
    Value::Object(pairs.into_iter().collect())
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn v(src: &str) -> Value {
        parse(src).unwrap()
    }

    fn keys(value: &Value) -> Vec<String> {
        value.as_object().unwrap().keys().cloned().collect()
    }

    #[test]
    fn get_resolves_nested_paths() {
        let root = v(r#"{"a":{"b":[10,20]}}"#);
        let path = [PathSegment::key("a"), PathSegment::key("b"), PathSegment::index(1)];
        assert_eq!(get(&root, &path), Some(&Value::Number(20.0)));
        assert_eq!(get(&root, &[PathSegment::key("missing")]), None);
        assert_eq!(get(&root, &[PathSegment::index(0)]), None);
    }

    #[test]
    fn set_replaces_without_touching_input() {
        let root = v(r#"{"a":1,"b":2}"#);
        let out = set(&root, &[PathSegment::key("b")], Value::Number(9.0));
        assert_eq!(get(&out, &[PathSegment::key("b")]), Some(&Value::Number(9.0)));
        assert_eq!(get(&root, &[PathSegment::key("b")]), Some(&Value::Number(2.0)));
    }

    #[test]
    fn set_on_empty_path_replaces_document() {
        let root = v("[1]");
        assert_eq!(set(&root, &[], Value::Null), Value::Null);
    }

    #[test]
    fn unresolved_paths_are_noops() {
        let root = v(r#"{"a":[1,2],"b":3}"#);
        assert_eq!(set(&root, &[PathSegment::key("x")], Value::Null), root);
        assert_eq!(remove(&root, &[PathSegment::key("a"), PathSegment::index(5)]), root);
        assert_eq!(remove(&root, &[]), root);
        assert_eq!(reorder_array(&v("[0,1]"), 0, 7), v("[0,1]"));
        assert_eq!(reorder_object(&root, "a", "zz"), root);
    }

    #[test]
    fn remove_shifts_array_indices() {
        let out = remove(&v("[1,2,3]"), &[PathSegment::index(1)]);
        assert_eq!(out, v("[1,3]"));
    }

    #[test]
    fn rename_preserves_order() {
        let root = v(r#"{"a":1,"b":2,"c":3}"#);
        let out = rename_key(&root, &[PathSegment::key("b")], "x");
        assert_eq!(keys(&out), ["a", "x", "c"]);
        assert_eq!(get(&out, &[PathSegment::key("x")]), Some(&Value::Number(2.0)));
    }

    #[test]
    fn rename_collision_appends_suffix() {
        let root = v(r#"{"a":1,"b":2}"#);
        let out = rename_key(&root, &[PathSegment::key("b")], "a");
        assert_eq!(keys(&out), ["a", "a_1"]);
        // renaming to itself, to "", or on an array parent are no-ops
        assert_eq!(rename_key(&root, &[PathSegment::key("b")], "b"), root);
        assert_eq!(rename_key(&root, &[PathSegment::key("b")], ""), root);
        assert_eq!(rename_key(&v("[1]"), &[PathSegment::index(0)], "x"), v("[1]"));
    }

    #[test]
    fn duplicate_object_entry_synthesizes_free_key() {
        let root = v(r#"{"a":1,"b":2,"c":3}"#);
        let once = duplicate_adjacent(&root, &[PathSegment::key("b")]);
        assert_eq!(keys(&once), ["a", "b", "b_copy", "c"]);
        let twice = duplicate_adjacent(&once, &[PathSegment::key("b")]);
        assert_eq!(keys(&twice), ["a", "b", "b_copy2", "b_copy", "c"]);
    }

    #[test]
    fn duplicate_array_entry_inserts_after() {
        let out = duplicate_adjacent(&v("[10,20,30]"), &[PathSegment::index(1)]);
        assert_eq!(out, v("[10,20,20,30]"));
    }

    #[test]
    fn convert_type_rules() {
        assert_eq!(convert_type(&Value::Number(1.5), Kind::String), Value::String("1.5".into()));
        assert_eq!(convert_type(&Value::String("42".into()), Kind::Number), Value::Number(42.0));
        assert_eq!(convert_type(&Value::String("nope".into()), Kind::Number), Value::Number(0.0));
        assert_eq!(convert_type(&Value::String("".into()), Kind::Bool), Value::Bool(false));
        assert_eq!(convert_type(&v("[1,2]"), Kind::Object), v("{}"));
        assert_eq!(convert_type(&v(r#"{"a":1}"#), Kind::Array), v("[]"));
    }

    #[test]
    fn transform_on_non_array_is_an_error() {
        let err = array_transform(&v(r#"{"a":1}"#), ArrayTransform::Unique).unwrap_err();
        assert!(matches!(err, EngineError::Shape { .. }));
    }

    #[test]
    fn filter_modes() {
        let seed = v(r#"[1,null,2,"3",3,3,false,"x"]"#);
        assert_eq!(
            array_transform(&seed, ArrayTransform::FilterNulls).unwrap(),
            v(r#"[1,2,"3",3,3,false,"x"]"#)
        );
        assert_eq!(
            array_transform(&seed, ArrayTransform::FilterFalsy).unwrap(),
            v(r#"[1,2,"3",3,3,"x"]"#)
        );
    }

    #[test]
    fn unique_collapses_on_canonical_key() {
        let seed = v(r#"[1,1,"1",{"a":1},{"a":1}]"#);
        assert_eq!(array_transform(&seed, ArrayTransform::Unique).unwrap(), v(r#"[1,{"a":1}]"#));
    }

    #[test]
    fn sort_is_numeric_then_lexicographic() {
        let seed = v(r#"[3,1,2]"#);
        assert_eq!(array_transform(&seed, ArrayTransform::SortAsc).unwrap(), v("[1,2,3]"));
        assert_eq!(array_transform(&seed, ArrayTransform::SortDesc).unwrap(), v("[3,2,1]"));
        let mixed = v(r#"["b",2,"a",10]"#);
        // numbers sort numerically ahead of non-numbers; the rest as text
        assert_eq!(
            array_transform(&mixed, ArrayTransform::SortAsc).unwrap(),
            v(r#"[2,10,"a","b"]"#)
        );
    }

    #[test]
    fn flatten_one_level_only() {
        let seed = v(r#"[[1,2],3,[[4]],5]"#);
        assert_eq!(
            array_transform(&seed, ArrayTransform::Flatten1).unwrap(),
            v("[1,2,3,[4],5]")
        );
    }

    #[test]
    fn map_number_and_map_string() {
        let seed = v(r#"["1","2.5","x",3,null]"#);
        assert_eq!(
            array_transform(&seed, ArrayTransform::MapNumber).unwrap(),
            v(r#"[1,2.5,"x",3,null]"#)
        );
        let seed = v(r#"[null,1,true,{"a":1},[2]]"#);
        assert_eq!(
            array_transform(&seed, ArrayTransform::MapString).unwrap(),
            v(r#"["null","1","true","{\"a\":1}","[2]"]"#)
        );
    }

    #[test]
    fn reorder_array_splices_before_destination() {
        assert_eq!(reorder_array(&v("[0,1,2,3]"), 1, 3), v("[0,2,3,1]"));
        assert_eq!(reorder_array(&v("[0,1,2,3]"), 3, 1), v("[0,3,1,2]"));
    }

    #[test]
    fn reorder_object_splices_before_destination() {
        let root = v(r#"{"a":1,"b":2,"c":3,"d":4}"#);
        let out = reorder_object(&root, "b", "d");
        assert_eq!(keys(&out), ["a", "c", "d", "b"]);
    }
}
